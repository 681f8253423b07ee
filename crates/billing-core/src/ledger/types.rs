//! Ledger data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            other => Err(BillingError::InvalidInput(format!(
                "Unknown entry kind '{}' (expected income, expense)",
                other
            ))),
        }
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    /// Recorded automatically when a bill was issued
    Bill,
    /// Entered by hand
    Manual,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::Bill => "bill",
            EntrySource::Manual => "manual",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical ledger record produced by normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub kind: EntryKind,
    pub source: EntrySource,
    /// Always finite and non-negative
    pub amount: f64,
    pub note: String,
    /// Originating bill number; only set for bill-sourced entries
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub bill_ref: Option<String>,
    /// ISO-8601 timestamp as stored
    pub occurred_at: String,
}

impl LedgerEntry {
    /// Parsed `occurred_at`, if it is a valid RFC 3339 timestamp.
    pub fn occurred_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.occurred_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Reporting window for ledger summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Day,
    Month,
    Year,
}

impl FromStr for Period {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Period::All),
            "day" => Ok(Period::Day),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(BillingError::InvalidInput(format!(
                "Unknown period '{}' (expected all, day, month, year)",
                other
            ))),
        }
    }
}

/// Filter for ledger summaries and listings.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub period: Period,

    /// Vehicle number substring, matched case-insensitively against the
    /// bill an income entry refers to
    pub vehicle: Option<String>,
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn vehicle(mut self, vehicle: impl Into<String>) -> Self {
        let vehicle = vehicle.into();
        self.vehicle = if vehicle.trim().is_empty() {
            None
        } else {
            Some(vehicle)
        };
        self
    }
}

/// Totals over a set of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}
