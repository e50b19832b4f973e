//! Configuration management for the Haven CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (HAVEN_*)
//! 3. Config file (~/.config/haven/config.toml)
//! 4. Default values
//!
//! Email provider credentials stay in their own environment variables
//! (WEB3FORMS_ACCESS_KEY, RESEND_API_KEY, ...) and are read by the
//! providers directly.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Appointment book JSON file.
    #[serde(default = "default_appointments_file")]
    pub appointments_file: PathBuf,

    /// Donor ledger JSON file.
    #[serde(default = "default_donors_file")]
    pub donors_file: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_appointments_file() -> PathBuf {
    Config::data_dir().join("appointments.json")
}

fn default_donors_file() -> PathBuf {
    Config::data_dir().join("donors.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_host(),
            server_port: default_port(),
            appointments_file: default_appointments_file(),
            donors_file: default_donors_file(),
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("HAVEN_"));

        match figment.extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                eprintln!("  To fix, edit or delete the config file:");
                eprintln!("    rm {}", config_path.display());
                eprintln!();
                Config::default()
            }
        }
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("haven")
            .join("config.toml")
    }

    /// Returns the directory holding the workflow JSON files.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("haven")
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("Haven Configuration");
    println!("===================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);
    println!("  appointments_file: {}", config.appointments_file.display());
    println!("  donors_file: {}", config.donors_file.display());

    println!("\nEnvironment variables:");
    println!("  HAVEN_SERVER_HOST");
    println!("  HAVEN_SERVER_PORT");
    println!("  HAVEN_APPOINTMENTS_FILE");
    println!("  HAVEN_DONORS_FILE");

    println!("\nProvider credentials (read by the mail providers):");
    println!("  WEB3FORMS_ACCESS_KEY");
    println!("  RESEND_API_KEY");
    println!("  EMAILJS_SERVICE_ID / EMAILJS_TEMPLATE_ID / EMAILJS_USER_ID");
    println!("  GMAIL_USER / GMAIL_APP_PASSWORD");
    println!("  N8N_WEBHOOK_URL / ADMIN_EMAIL");
}
