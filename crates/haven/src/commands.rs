//! CLI command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Result};

use haven_core::OrgProfile;
use haven_workflows::appointments::ScheduleRequest;
use haven_workflows::donors::DonationRequest;
use haven_workflows::{AppointmentBook, DonorLedger};

/// Start the HTTP API server.
pub async fn serve(host: String, port: u16) -> Result<()> {
    use haven_server::{Server, ServerConfig};

    let addr = format!("{}:{}", host, port).parse()?;
    let config = ServerConfig::builder().addr(addr).build();

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}

/// Schedule an appointment in the local book.
pub fn appointment_schedule(
    file: PathBuf,
    name: String,
    email: String,
    phone: Option<String>,
    time: String,
    appointment_type: Option<String>,
) -> Result<()> {
    let when: DateTime<Utc> = time
        .parse()
        .map_err(|_| eyre!("Invalid time '{}': expected an RFC 3339 timestamp", time))?;

    let mut book = AppointmentBook::open(file, OrgProfile::default());
    let scheduled = book.schedule(ScheduleRequest {
        veteran_name: name,
        email,
        phone,
        appointment_type,
        scheduled_time: when,
    })?;

    println!("Scheduled {}", scheduled.appointment.id);
    println!("\n--- Confirmation email ---");
    println!("To: {}", scheduled.confirmation_email.to);
    println!("Subject: {}", scheduled.confirmation_email.subject);
    println!("{}", scheduled.confirmation_email.body);
    if let Some(sms) = scheduled.confirmation_sms {
        println!("\n--- SMS ---\n{}", sms);
    }

    Ok(())
}

/// List upcoming appointments.
pub fn appointment_upcoming(file: PathBuf, days: i64) -> Result<()> {
    let book = AppointmentBook::open(file, OrgProfile::default());
    let upcoming = book.upcoming(days);

    if upcoming.is_empty() {
        println!("No appointments in the next {} days", days);
        return Ok(());
    }

    println!("Upcoming appointments (next {} days):", days);
    for appointment in upcoming {
        println!(
            "  {}  {}  {} <{}>",
            appointment.id,
            appointment.scheduled_time.format("%Y-%m-%d %H:%M"),
            appointment.veteran_name,
            appointment.email
        );
    }

    Ok(())
}

/// Print appointment book statistics.
pub fn appointment_stats(file: PathBuf) -> Result<()> {
    let book = AppointmentBook::open(file, OrgProfile::default());
    let stats = book.stats();

    println!("Appointments: {}", stats.total_appointments);
    println!("  scheduled: {}", stats.scheduled);
    println!("  completed: {}", stats.completed);
    println!("  cancelled: {}", stats.cancelled);

    Ok(())
}

/// Cancel an appointment by id.
pub fn appointment_cancel(file: PathBuf, id: String) -> Result<()> {
    let mut book = AppointmentBook::open(file, OrgProfile::default());
    book.cancel(&id)?;
    println!("Cancelled {}", id);
    Ok(())
}

/// Record a donation in the local ledger.
pub fn donor_record(
    file: PathBuf,
    name: String,
    email: String,
    amount: f64,
    donation_type: Option<String>,
    recurring: bool,
) -> Result<()> {
    if amount <= 0.0 {
        return Err(eyre!("Donation amount must be positive"));
    }

    let mut ledger = DonorLedger::open(file, OrgProfile::default());
    let receipt = ledger.record(DonationRequest {
        donor_name: name,
        email,
        amount,
        donation_type,
        is_recurring: recurring,
    })?;

    println!("Receipt {}", receipt.receipt_number);
    println!("Lifetime total: ${:.2}", receipt.total_given);
    println!("\n--- {} ---", receipt.thank_you_letter.title);
    println!("{}", receipt.thank_you_letter.content);
    println!("\n--- {} ---", receipt.tax_receipt.title);
    println!("{}", receipt.tax_receipt.content);

    Ok(())
}

/// Print donor ledger statistics.
pub fn donor_stats(file: PathBuf) -> Result<()> {
    let ledger = DonorLedger::open(file, OrgProfile::default());
    let stats = ledger.stats();

    println!("Donors: {}", stats.total_donors);
    println!("Total donations: ${:.2}", stats.total_donations);
    println!("Average donation: ${:.2}", stats.average_donation);

    Ok(())
}

/// Display version information.
pub fn version() {
    println!("haven {}", env!("CARGO_PKG_VERSION"));
}
