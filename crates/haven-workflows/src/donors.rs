//! Donor ledger: thank-you letters, tax receipts, and giving history.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use haven_core::{letters, timestamp_id, Document, OrgProfile, Result};
use serde::{Deserialize, Serialize};

use crate::store;

/// One recorded donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    /// Receipt number, `HH-<epoch-ms>`.
    pub receipt_number: String,
    /// Amount in dollars.
    pub amount: f64,
    /// Donation category (general, memorial, corporate, ...).
    pub donation_type: String,
    /// Whether this is part of a recurring pledge.
    pub recurring: bool,
    /// When the donation was recorded.
    pub date: DateTime<Utc>,
}

/// A donor and their giving history, keyed in the ledger by lowercase email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// All recorded donations, oldest first.
    pub donations: Vec<DonationRecord>,
    /// Lifetime total in dollars.
    pub total_given: f64,
    /// First recorded donation.
    pub first_donation: DateTime<Utc>,
}

/// A donation to record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Donor display name.
    pub donor_name: String,
    /// Donor email.
    pub email: String,
    /// Amount in dollars; must be positive.
    pub amount: f64,
    /// Donation category; defaults to `general`.
    #[serde(default)]
    pub donation_type: Option<String>,
    /// Recurring pledge flag.
    #[serde(default)]
    pub is_recurring: bool,
}

/// Result of recording a donation.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// Receipt number, `HH-<epoch-ms>`.
    pub receipt_number: String,
    /// Amount recorded.
    pub amount: f64,
    /// Generated thank-you letter.
    pub thank_you_letter: Document,
    /// Generated tax receipt.
    pub tax_receipt: Document,
    /// The donor's updated lifetime total.
    pub total_given: f64,
}

/// Aggregate ledger numbers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    /// Distinct donors.
    pub total_donors: usize,
    /// Sum of all donations in dollars.
    pub total_donations: f64,
    /// Mean donation amount, zero when empty.
    pub average_donation: f64,
}

/// The donor ledger: one JSON file, rewritten on every mutation.
pub struct DonorLedger {
    path: PathBuf,
    org: OrgProfile,
    donors: HashMap<String, Donor>,
}

impl DonorLedger {
    /// Opens the ledger, loading any existing donors from `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, org: OrgProfile) -> Self {
        let path = path.into();
        let donors = store::load_map(&path);
        Self { path, org, donors }
    }

    /// Records a donation, updating the donor's history and generating the
    /// thank-you letter and tax receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten store cannot be saved.
    pub fn record(&mut self, request: DonationRequest) -> Result<Receipt> {
        let now = Utc::now();
        let receipt_number = timestamp_id("HH");
        let record = DonationRecord {
            receipt_number: receipt_number.clone(),
            amount: request.amount,
            donation_type: request
                .donation_type
                .unwrap_or_else(|| "general".to_string()),
            recurring: request.is_recurring,
            date: now,
        };

        let key = request.email.to_lowercase();
        let donor = self.donors.entry(key).or_insert_with(|| Donor {
            name: request.donor_name.clone(),
            email: request.email.clone(),
            donations: Vec::new(),
            total_given: 0.0,
            first_donation: now,
        });
        donor.name = request.donor_name.clone();
        donor.total_given += record.amount;
        donor.donations.push(record);
        let total_given = donor.total_given;

        store::save_map(&self.path, &self.donors)?;

        tracing::info!(donor = %request.donor_name, amount = request.amount, %receipt_number, "Donation recorded");

        Ok(Receipt {
            thank_you_letter: letters::thank_you_letter(
                &self.org,
                &request.donor_name,
                request.amount,
            ),
            tax_receipt: letters::tax_receipt(
                &self.org,
                &request.donor_name,
                request.amount,
                &receipt_number,
            ),
            receipt_number,
            amount: request.amount,
            total_given,
        })
    }

    /// Looks up a donor by email, case-insensitively.
    #[must_use]
    pub fn donor(&self, email: &str) -> Option<&Donor> {
        self.donors.get(&email.to_lowercase())
    }

    /// Aggregate numbers over the ledger.
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        let total_donors = self.donors.len();
        let count: usize = self.donors.values().map(|d| d.donations.len()).sum();
        let total_donations: f64 = self.donors.values().map(|d| d.total_given).sum();
        let average_donation = if count == 0 {
            0.0
        } else {
            total_donations / count as f64
        };
        LedgerStats {
            total_donors,
            total_donations,
            average_donation,
        }
    }
}
