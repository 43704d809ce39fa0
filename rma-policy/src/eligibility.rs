//! Return-eligibility calculation.
//!
//! A pure function from (purchase date, product category, reference date)
//! to a [`Verdict`]. The category-to-window table is the authoritative
//! policy: general 30 days, electronics 15, clothing 60, food and
//! perishables 7. Unknown categories fall back to the general window
//! rather than erroring; the only failure mode is a malformed date.
//!
//! The boundary day counts: a return on exactly the deadline date is
//! eligible with zero days remaining, and the first day past it is
//! overdue by one.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::error::{PolicyError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Return windows in days by normalized category name.
const RETURN_WINDOWS: [(&str, i64); 5] =
    [("general", 30), ("electronics", 15), ("clothing", 60), ("food", 7), ("perishables", 7)];

const DEFAULT_WINDOW: i64 = 30;

/// Look up the return window for a product category.
///
/// Matching is case-insensitive; an unrecognized category gets the
/// general window.
pub fn return_window_days(category: &str) -> i64 {
    let normalized = category.to_lowercase();
    RETURN_WINDOWS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, days)| *days)
        .unwrap_or(DEFAULT_WINDOW)
}

/// Whether a return is inside or past its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReturnStatus {
    /// The reference date is on or before the deadline.
    Eligible { days_remaining: i64 },
    /// The reference date is past the deadline.
    Expired { days_overdue: i64 },
}

/// The outcome of an eligibility evaluation.
///
/// Computed fresh per call and fully determined by its inputs. The
/// `purchase_date` and `category` fields echo the caller's input
/// spelling; [`Display`](std::fmt::Display) renders the verdict as the
/// human-readable block downstream consumers quote to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// The purchase date as the caller provided it.
    pub purchase_date: String,
    /// The product category as the caller provided it.
    pub category: String,
    /// The applicable return window in days.
    pub window_days: i64,
    /// Days from purchase to the reference date. Negative when the
    /// purchase date lies in the future.
    pub days_since_purchase: i64,
    /// The last day on which a return is accepted.
    pub deadline: NaiveDate,
    /// Eligibility with the remaining or overdue day count.
    pub status: ReturnStatus,
}

impl Verdict {
    /// Whether the return is within its window.
    pub fn is_eligible(&self) -> bool {
        matches!(self.status, ReturnStatus::Eligible { .. })
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            ReturnStatus::Eligible { days_remaining } => write!(
                f,
                "✓ ELIGIBLE FOR RETURN\n\
                 Purchase Date: {}\n\
                 Product Category: {}\n\
                 Return Window: {} days\n\
                 Days Since Purchase: {}\n\
                 Days Remaining: {}\n\
                 Deadline: {}",
                self.purchase_date,
                self.category,
                self.window_days,
                self.days_since_purchase,
                days_remaining,
                self.deadline.format(DATE_FORMAT),
            ),
            ReturnStatus::Expired { days_overdue } => write!(
                f,
                "✗ NOT ELIGIBLE FOR RETURN\n\
                 Purchase Date: {}\n\
                 Product Category: {}\n\
                 Return Window: {} days\n\
                 Days Since Purchase: {}\n\
                 Days Overdue: {}\n\
                 Deadline Was: {}\n\
                 Note: Customer may contact support for special consideration",
                self.purchase_date,
                self.category,
                self.window_days,
                self.days_since_purchase,
                days_overdue,
                self.deadline.format(DATE_FORMAT),
            ),
        }
    }
}

/// Evaluate return eligibility from string inputs.
///
/// Dates must be `YYYY-MM-DD`. `reference_date` defaults to today when
/// omitted.
///
/// # Errors
///
/// Returns [`PolicyError::InvalidDateFormat`] naming the offending field
/// if either date fails to parse. This is the only error case; any
/// parseable date/category combination produces a verdict, including
/// future purchase dates.
pub fn evaluate(
    purchase_date: &str,
    category: &str,
    reference_date: Option<&str>,
) -> Result<Verdict> {
    debug!(purchase_date, category, "calculating return eligibility");

    let purchase = parse_date(purchase_date, "purchase_date")?;
    let reference = match reference_date {
        Some(raw) => parse_date(raw, "reference_date")?,
        None => Local::now().date_naive(),
    };

    let mut verdict = evaluate_dates(purchase, category, reference);
    // Echo the caller's spelling rather than the canonical form.
    verdict.purchase_date = purchase_date.to_string();
    Ok(verdict)
}

/// Evaluate return eligibility from already-parsed dates.
pub fn evaluate_dates(purchase: NaiveDate, category: &str, reference: NaiveDate) -> Verdict {
    let window_days = return_window_days(category);
    let deadline = purchase + Duration::days(window_days);
    let days_since_purchase = reference.signed_duration_since(purchase).num_days();

    let status = if reference <= deadline {
        ReturnStatus::Eligible {
            days_remaining: deadline.signed_duration_since(reference).num_days(),
        }
    } else {
        ReturnStatus::Expired { days_overdue: days_since_purchase - window_days }
    };

    Verdict {
        purchase_date: purchase.format(DATE_FORMAT).to_string(),
        category: category.to_string(),
        window_days,
        days_since_purchase,
        deadline,
        status,
    }
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| PolicyError::InvalidDateFormat { field, value: value.to_string() })
}
