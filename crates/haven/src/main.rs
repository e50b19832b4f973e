//! # Haven CLI
//!
//! Command-line interface for the Haven automation suite: the HTTP API
//! server plus the local appointment book and donor ledger workflows.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "haven")]
#[command(author = "Haven House Engineering")]
#[command(version)]
#[command(about = "Automation suite for transitional housing operations", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage the local appointment book
    Appointments {
        /// Appointment book JSON file (defaults to the configured path)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: AppointmentAction,
    },

    /// Manage the local donor ledger
    Donors {
        /// Donor ledger JSON file (defaults to the configured path)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        action: DonorAction,
    },

    /// Display version information
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AppointmentAction {
    /// Schedule a new appointment
    Schedule {
        /// Resident name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Phone number for the SMS reminder
        #[arg(long)]
        phone: Option<String>,

        /// Appointment time (RFC 3339)
        #[arg(long)]
        time: String,

        /// Appointment type (defaults to Initial Consultation)
        #[arg(long = "type")]
        appointment_type: Option<String>,
    },

    /// List upcoming appointments
    Upcoming {
        /// Days ahead to include
        #[arg(short, long, default_value = "7")]
        days: i64,
    },

    /// Cancel an appointment
    Cancel {
        /// Appointment id (APT-...)
        id: String,
    },

    /// Show appointment statistics
    Stats,
}

#[derive(Subcommand)]
enum DonorAction {
    /// Record a donation
    Record {
        /// Donor name
        #[arg(long)]
        name: String,

        /// Donor email
        #[arg(long)]
        email: String,

        /// Amount in dollars
        #[arg(long)]
        amount: f64,

        /// Donation category (general, memorial, corporate, ...)
        #[arg(long = "type")]
        donation_type: Option<String>,

        /// Mark as part of a recurring pledge
        #[arg(long)]
        recurring: bool,
    },

    /// Show donor ledger statistics
    Stats,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let telemetry_config =
        haven_telemetry::TelemetryConfig::new("haven").with_log_level(&cli.log_level);
    let telemetry_config = if cli.json_logs {
        telemetry_config.with_json_logs()
    } else {
        telemetry_config
    };
    haven_telemetry::init_logging(&telemetry_config);

    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(cfg.server_host);
            let port = port.unwrap_or(cfg.server_port);
            commands::serve(host, port).await?;
        }

        Commands::Appointments { file, action } => {
            let file = file.unwrap_or(cfg.appointments_file);
            match action {
                AppointmentAction::Schedule {
                    name,
                    email,
                    phone,
                    time,
                    appointment_type,
                } => {
                    commands::appointment_schedule(
                        file,
                        name,
                        email,
                        phone,
                        time,
                        appointment_type,
                    )?;
                }
                AppointmentAction::Upcoming { days } => {
                    commands::appointment_upcoming(file, days)?;
                }
                AppointmentAction::Cancel { id } => {
                    commands::appointment_cancel(file, id)?;
                }
                AppointmentAction::Stats => {
                    commands::appointment_stats(file)?;
                }
            }
        }

        Commands::Donors { file, action } => {
            let file = file.unwrap_or(cfg.donors_file);
            match action {
                DonorAction::Record {
                    name,
                    email,
                    amount,
                    donation_type,
                    recurring,
                } => {
                    commands::donor_record(file, name, email, amount, donation_type, recurring)?;
                }
                DonorAction::Stats => {
                    commands::donor_stats(file)?;
                }
            }
        }

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}
