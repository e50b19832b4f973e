//! Document and email text templates.
//!
//! Templates are plain string interpolation. The generated artifacts are
//! disposable records returned to the caller, never stored server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::OrgProfile;

/// A generated document: a titled block of text with a generation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Human-readable title.
    pub title: String,
    /// Letter body.
    pub content: String,
    /// Generation timestamp.
    pub generated: DateTime<Utc>,
}

impl Document {
    /// Creates a document generated now.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            generated: Utc::now(),
        }
    }
}

/// Welcome letter for a new resident.
#[must_use]
pub fn welcome_letter(org: &OrgProfile, name: &str) -> Document {
    Document::new(
        format!("Welcome Letter - {name}"),
        format!(
            "Welcome to {}, {name}. We're here to support your journey to independence.",
            org.name
        ),
    )
}

/// Housing agreement, with the move-in date when known.
#[must_use]
pub fn housing_agreement(name: &str, move_in_date: Option<&str>) -> Document {
    Document::new(
        format!("Housing Agreement - {name}"),
        format!(
            "Housing agreement prepared for {name} with move-in date {}.",
            move_in_date.unwrap_or("TBD")
        ),
    )
}

/// Intake checklist covering required documentation.
#[must_use]
pub fn intake_checklist(name: &str) -> Document {
    Document::new(
        format!("Intake Checklist - {name}"),
        format!("Complete intake checklist for {name} including all required documentation."),
    )
}

/// Thank-you letter for a donor, with an amount-tiered impact message.
#[must_use]
pub fn thank_you_letter(org: &OrgProfile, donor_name: &str, amount: f64) -> Document {
    Document::new(
        format!("Thank You Letter - {donor_name}"),
        format!(
            "Dear {donor_name}, thank you for your generous donation of ${amount}. {}\n\n{}",
            impact_message(amount),
            org.footer()
        ),
    )
}

/// Tax receipt text for a donation.
#[must_use]
pub fn tax_receipt(org: &OrgProfile, donor_name: &str, amount: f64, receipt_number: &str) -> Document {
    Document::new(
        format!("Tax Receipt {receipt_number}"),
        format!(
            "Official tax receipt for {donor_name} - ${amount} donation on {}.\n{} | Tax ID {}",
            Utc::now().format("%B %-d, %Y"),
            org.name,
            org.tax_id
        ),
    )
}

/// Impact message tiered by donation amount.
#[must_use]
pub fn impact_message(amount: f64) -> &'static str {
    if amount >= 1000.0 {
        "Your generous gift can provide a full month of transitional housing for a veteran, \
         including case management, life skills training, and job placement support."
    } else if amount >= 500.0 {
        "Your donation can provide two weeks of transitional housing support, helping a veteran \
         build the foundation for independent living."
    } else if amount >= 100.0 {
        "Your contribution can provide several nights of safe housing and meals for a veteran \
         working toward stability."
    } else {
        "Every dollar makes a difference in helping veterans transition from homelessness to \
         independent living."
    }
}

/// Wraps plain text in the minimal branded HTML shell used for emails.
#[must_use]
pub fn wrap_html(org: &OrgProfile, text: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family: Arial, sans-serif; max-width: 600px; \
         margin: 0 auto; padding: 20px; line-height: 1.6;\">\n<h2>{}</h2>\n<p>{}</p>\n<hr>\n\
         <p style=\"font-size: 12px; color: #666;\">{}</p>\n</body>\n</html>",
        org.name,
        text.replace('\n', "<br>"),
        org.footer().replace('\n', "<br>")
    )
}
