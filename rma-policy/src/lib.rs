//! Deterministic policy rules for the returns assistant.
//!
//! Two independent rule engines:
//!
//! - [`eligibility`] computes whether a purchase is still inside its
//!   category's return window and by how many days.
//! - [`summarizer`] extracts keyword-matched key points from policy
//!   text for a chosen focus area.
//!
//! Both are pure functions over their inputs with no I/O, so the same
//! call produces the same answer in tests, in the CLI, and behind a
//! service.
//!
//! ```
//! use rma_policy::{evaluate, summarize, FocusArea};
//!
//! let verdict = evaluate("2024-01-01", "electronics", Some("2024-01-10")).unwrap();
//! assert!(verdict.is_eligible());
//!
//! let points = summarize("Returns are accepted within 30 days.", FocusArea::Timeframes);
//! assert_eq!(points.len(), 1);
//! ```

pub mod eligibility;
pub mod error;
pub mod summarizer;

pub use eligibility::{evaluate, evaluate_dates, return_window_days, ReturnStatus, Verdict};
pub use error::{PolicyError, Result};
pub use summarizer::{summarize, FocusArea};
