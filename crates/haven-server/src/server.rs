//! HTTP server: configuration, shared state, router, and lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use haven_core::{OrgProfile, Result};
use haven_mailer::providers::GmailSmtp;
use haven_mailer::MailerChain;

use crate::cache::{self, TtlCache};
use crate::handlers;
use crate::ratelimit::{self, SlidingWindowLimiter};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS (any origin, matching the public form endpoints).
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    #[must_use]
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    #[must_use]
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            cors: self.cors.unwrap_or(defaults.cors),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Organization identity used in letters and email footers.
    pub org: OrgProfile,
    /// Contact-form rate limiter.
    pub limiter: SlidingWindowLimiter,
    /// Cache for automation GET responses.
    pub cache: TtlCache,
    /// Ordered free-tier email fallback chain.
    pub chain: MailerChain,
    /// Gmail path, separate from the chain.
    pub gmail: GmailSmtp,
    /// Automation webhook; contact submissions are forwarded when set.
    pub webhook: Option<String>,
    /// Client for the webhook call.
    pub http: reqwest::Client,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Creates app state with providers and webhook read from the
    /// environment.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let org = OrgProfile::default();
        let chain = MailerChain::free_tier(&org);
        let webhook = std::env::var("N8N_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.is_empty() && !url.contains("your-n8n"));
        Self {
            config,
            org,
            limiter: SlidingWindowLimiter::default(),
            cache: TtlCache::default(),
            chain,
            gmail: GmailSmtp::from_env(),
            webhook,
            http: reqwest::Client::new(),
            start_time: Instant::now(),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(config.clone()));
        Self { config, state }
    }

    /// Creates the router.
    fn router(&self) -> Router {
        let mna = handlers::method_not_allowed;
        let mut router = Router::new()
            // Health endpoints
            .route("/health", get(handlers::health))
            .route("/api/status", get(handlers::server_status))
            .route("/api/hello", get(handlers::hello))
            // Contact form and document generation
            .route(
                "/api/submit-form",
                axum::routing::post(handlers::submit_form).fallback(mna),
            )
            .route(
                "/api/documents",
                axum::routing::post(handlers::generate_documents).fallback(mna),
            )
            .route(
                "/api/donations",
                get(handlers::donation_analytics)
                    .post(handlers::process_donation)
                    .fallback(mna),
            )
            // Appointments and automation take the action from the query
            .route(
                "/api/appointments",
                get(handlers::appointments_get)
                    .post(handlers::appointments_post)
                    .fallback(mna),
            )
            .route(
                "/api/automation",
                get(handlers::automation_get)
                    .post(handlers::automation_post)
                    .fallback(mna),
            )
            // Email endpoints
            .route(
                "/api/email-free",
                axum::routing::post(handlers::email_free).fallback(mna),
            )
            .route(
                "/api/email-gmail",
                axum::routing::post(handlers::email_gmail).fallback(mna),
            )
            .route(
                "/api/send-email",
                axum::routing::post(handlers::send_email).fallback(mna),
            )
            // Documentation
            .route("/api/docs", get(handlers::api_docs).fallback(mna))
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Spawns the background sweeps for the rate limiter and the cache.
    fn spawn_sweepers(&self) {
        let state = self.state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(ratelimit::SWEEP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                state.limiter.sweep();
                tracing::debug!(tracked = state.limiter.tracked(), "Rate limit sweep");
            }
        });

        let state = self.state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(cache::SWEEP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                state.cache.sweep();
                tracing::debug!(entries = state.cache.len(), "Cache sweep");
            }
        });
    }

    /// Runs the server until ctrl-c or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails.
    pub async fn run(self) -> Result<()> {
        self.spawn_sweepers();
        let router = self.router();

        tracing::info!(addr = %self.config.addr, "Starting Haven server");
        eprintln!(
            "\n\x1b[32m✓\x1b[0m Server listening on http://{}",
            self.config.addr
        );
        eprintln!("  Press Ctrl+C to stop\n");

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(haven_core::Error::Io)?;

        let shutdown_signal = async {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received Ctrl+C, shutting down gracefully...");
                },
                () = terminate => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received SIGTERM, shutting down gracefully...");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| haven_core::Error::Internal {
                message: e.to_string(),
            })?;

        tracing::info!("Server shutdown complete");
        eprintln!("\x1b[32m✓\x1b[0m Server stopped");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = ServerConfig::builder().build();
        assert_eq!(config.addr.port(), 3000);
        assert!(config.cors);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = ServerConfig::builder()
            .addr(SocketAddr::from(([127, 0, 0, 1], 8080)))
            .cors(false)
            .build();
        assert_eq!(config.addr.port(), 8080);
        assert!(!config.cors);
    }
}
