//! Appointment scheduling with confirmation message generation.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use haven_core::{timestamp_id, Error, OrgProfile, Result};
use haven_mailer::Message;
use serde::{Deserialize, Serialize};

use crate::store;

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    /// Booked, awaiting the scheduled time.
    Scheduled,
    /// Attended and finished.
    Completed,
    /// Cancelled by either party.
    Cancelled,
}

/// A scheduled appointment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Identifier, `apt-<epoch-ms>`.
    pub id: String,
    /// Who the appointment is for.
    pub veteran_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Appointment category.
    pub appointment_type: String,
    /// Scheduled start time.
    pub scheduled_time: DateTime<Utc>,
    /// Current status.
    pub status: AppointmentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Reminder messages sent so far.
    pub reminders_sent: u32,
}

/// A new appointment to schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Who the appointment is for.
    pub veteran_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Category; defaults to an initial assessment.
    #[serde(default)]
    pub appointment_type: Option<String>,
    /// Scheduled start time.
    pub scheduled_time: DateTime<Utc>,
}

/// Result of scheduling: the record plus ready-to-send confirmations.
#[derive(Debug, Clone)]
pub struct Scheduled {
    /// The stored appointment.
    pub appointment: Appointment,
    /// Confirmation email for the veteran.
    pub confirmation_email: Message,
    /// Short confirmation text for SMS, when a phone number exists.
    pub confirmation_sms: Option<String>,
}

/// Aggregate counts over the book.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    /// All appointments ever recorded.
    pub total_appointments: usize,
    /// Currently scheduled.
    pub scheduled: usize,
    /// Completed.
    pub completed: usize,
    /// Cancelled.
    pub cancelled: usize,
}

/// The appointment book: one JSON file, rewritten on every mutation.
pub struct AppointmentBook {
    path: PathBuf,
    org: OrgProfile,
    appointments: HashMap<String, Appointment>,
}

impl AppointmentBook {
    /// Opens the book, loading any existing records from `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, org: OrgProfile) -> Self {
        let path = path.into();
        let appointments = store::load_map(&path);
        Self {
            path,
            org,
            appointments,
        }
    }

    /// Schedules an appointment and generates confirmation messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten store cannot be saved.
    pub fn schedule(&mut self, request: ScheduleRequest) -> Result<Scheduled> {
        let appointment = Appointment {
            id: timestamp_id("apt"),
            veteran_name: request.veteran_name,
            email: request.email,
            phone: request.phone,
            appointment_type: request
                .appointment_type
                .unwrap_or_else(|| "Initial Assessment".to_string()),
            scheduled_time: request.scheduled_time,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
            reminders_sent: 0,
        };

        self.appointments
            .insert(appointment.id.clone(), appointment.clone());
        store::save_map(&self.path, &self.appointments)?;

        tracing::info!(id = %appointment.id, veteran = %appointment.veteran_name, "Appointment scheduled");

        let confirmation_email = self.confirmation_email(&appointment);
        let confirmation_sms = appointment
            .phone
            .as_ref()
            .map(|_| self.confirmation_sms(&appointment));

        Ok(Scheduled {
            appointment,
            confirmation_email,
            confirmation_sms,
        })
    }

    /// Appointments scheduled within the next `days` days, soonest first.
    #[must_use]
    pub fn upcoming(&self, days: i64) -> Vec<&Appointment> {
        let now = Utc::now();
        let horizon = now + Duration::days(days);
        let mut matches: Vec<&Appointment> = self
            .appointments
            .values()
            .filter(|a| {
                a.status == AppointmentStatus::Scheduled
                    && a.scheduled_time >= now
                    && a.scheduled_time <= horizon
            })
            .collect();
        matches.sort_by_key(|a| a.scheduled_time);
        matches
    }

    /// Cancels an appointment by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the store cannot be saved.
    pub fn cancel(&mut self, id: &str) -> Result<()> {
        let appointment = self
            .appointments
            .get_mut(id)
            .ok_or_else(|| Error::validation(format!("Unknown appointment: {id}")))?;
        appointment.status = AppointmentStatus::Cancelled;
        store::save_map(&self.path, &self.appointments)
    }

    /// Aggregate counts over all records.
    #[must_use]
    pub fn stats(&self) -> BookStats {
        let count = |status: AppointmentStatus| {
            self.appointments
                .values()
                .filter(|a| a.status == status)
                .count()
        };
        BookStats {
            total_appointments: self.appointments.len(),
            scheduled: count(AppointmentStatus::Scheduled),
            completed: count(AppointmentStatus::Completed),
            cancelled: count(AppointmentStatus::Cancelled),
        }
    }

    fn confirmation_email(&self, appointment: &Appointment) -> Message {
        let date = appointment.scheduled_time.format("%A, %B %-d, %Y");
        let time = appointment.scheduled_time.format("%-I:%M %p");
        let body = format!(
            "Dear {name},\n\nYour appointment with {org} has been confirmed:\n\n\
             Type: {kind}\nDate: {date}\nTime: {time}\nLocation: {org} Office, {address}\n\n\
             What to bring: photo ID, DD-214 if available, any relevant medical or financial \
             documents, and a list of questions.\n\n\
             Need to reschedule? Call us at {phone} at least 24 hours in advance.\n\n\
             We look forward to meeting with you!\n\n{footer}",
            name = appointment.veteran_name,
            org = self.org.name,
            kind = appointment.appointment_type,
            address = self.org.address,
            phone = self.org.phone,
            footer = self.org.footer(),
        );

        Message::new(
            &appointment.email,
            format!("Appointment Confirmed - {}", appointment.appointment_type),
            body,
        )
    }

    fn confirmation_sms(&self, appointment: &Appointment) -> String {
        format!(
            "{}: appointment confirmed for {} at {}. Questions? {}",
            self.org.name,
            appointment.scheduled_time.format("%b %-d"),
            appointment.scheduled_time.format("%-I:%M %p"),
            self.org.phone,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, offset_hours: i64) -> ScheduleRequest {
        ScheduleRequest {
            veteran_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: Some("(555) 123-4567".to_string()),
            appointment_type: None,
            scheduled_time: Utc::now() + Duration::hours(offset_hours),
        }
    }

    #[test]
    fn test_schedule_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.json");

        let id = {
            let mut book = AppointmentBook::open(&path, OrgProfile::default());
            book.schedule(request("John Smith", 24)).unwrap().appointment.id
        };

        let book = AppointmentBook::open(&path, OrgProfile::default());
        let stats = book.stats();
        assert_eq!(stats.total_appointments, 1);
        assert_eq!(stats.scheduled, 1);
        assert!(book.upcoming(7).iter().any(|a| a.id == id));
    }

    #[test]
    fn test_upcoming_respects_horizon_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = AppointmentBook::open(dir.path().join("a.json"), OrgProfile::default());

        book.schedule(request("Near", 12)).unwrap();
        book.schedule(request("Far", 24 * 30)).unwrap();

        let upcoming = book.upcoming(7);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].veteran_name, "Near");
    }

    #[test]
    fn test_cancel_updates_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = AppointmentBook::open(dir.path().join("a.json"), OrgProfile::default());

        let id = book.schedule(request("Jane Doe", 48)).unwrap().appointment.id;
        book.cancel(&id).unwrap();

        assert_eq!(book.stats().cancelled, 1);
        assert!(book.upcoming(7).is_empty());
        assert!(book.cancel("apt-0").is_err());
    }

    #[test]
    fn test_confirmation_messages() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = AppointmentBook::open(dir.path().join("a.json"), OrgProfile::default());

        let scheduled = book.schedule(request("John Smith", 24)).unwrap();
        assert!(scheduled
            .confirmation_email
            .body
            .contains("John Smith"));
        assert!(scheduled
            .confirmation_email
            .subject
            .contains("Initial Assessment"));
        assert!(scheduled.confirmation_sms.is_some());

        let mut without_phone = request("No Phone", 24);
        without_phone.phone = None;
        let scheduled = book.schedule(without_phone).unwrap();
        assert!(scheduled.confirmation_sms.is_none());
    }
}
