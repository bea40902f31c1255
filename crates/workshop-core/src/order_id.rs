//! # Work Order IDs
//!
//! Pure rules for the daily `YYMMDD-NN` identifier.
//!
//! ## Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  local date 2025-06-15 ──► date_prefix() ──► "250615"                   │
//! │                                                  │                      │
//! │  stored counter (kv: ot_counter)                 ▼                      │
//! │    None                    ──► DailyCounter::advance ──► {250615, 1}    │
//! │    {250614, 7}  (new day)  ──►                        ──► {250615, 1}    │
//! │    {250615, 3}  (same day) ──►                        ──► {250615, 4}    │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                   persist, then "250615-04"             │
//! │                                                                         │
//! │  storage broken? ──► fallback_order_id("250615", random 1..=99)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reading the clock, loading/saving the counter, and drawing the random
//! number are the caller's job (see `workshop_db::OrderIdGenerator`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Key under which the counter is persisted.
pub const COUNTER_KEY: &str = "ot_counter";

/// Highest sequence the two-digit format was designed for.
pub const MAX_TWO_DIGIT_SEQUENCE: u32 = 99;

/// Persisted counter state: which day it belongs to and how many orders
/// were issued on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyCounter {
    /// `YYMMDD` of the local calendar day.
    pub date: String,
    /// Orders issued so far on `date`, starting at 1.
    pub count: u32,
}

impl DailyCounter {
    /// First counter of a day.
    pub fn first_of(date_prefix: impl Into<String>) -> Self {
        DailyCounter {
            date: date_prefix.into(),
            count: 1,
        }
    }

    /// Computes the counter to persist for the next allocation.
    ///
    /// Rollover is decided purely by comparing prefixes, so a counter left
    /// over from yesterday resets even if the app never restarted.
    pub fn advance(stored: Option<DailyCounter>, date_prefix: &str) -> DailyCounter {
        match stored {
            Some(counter) if counter.date == date_prefix => DailyCounter {
                date: counter.date,
                count: counter.count.saturating_add(1),
            },
            _ => DailyCounter::first_of(date_prefix),
        }
    }

    /// The identifier this counter state stands for.
    pub fn order_id(&self) -> String {
        format_order_id(&self.date, self.count)
    }
}

/// `YYMMDD` for a local calendar day.
///
/// ```rust
/// use chrono::NaiveDate;
/// use workshop_core::order_id::date_prefix;
///
/// let day = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
/// assert_eq!(date_prefix(day), "250615");
/// ```
pub fn date_prefix(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Joins a prefix and a sequence, zero-padding to two digits.
///
/// Sequences above 99 keep all their digits (`250615-100`) instead of
/// wrapping around.
pub fn format_order_id(date_prefix: &str, sequence: u32) -> String {
    format!("{}-{:02}", date_prefix, sequence)
}

/// Best-effort ID used when the counter store cannot be read or written.
///
/// `sequence` is clamped into `1..=99`. The result may collide with an ID
/// already issued today.
pub fn fallback_order_id(date_prefix: &str, sequence: u32) -> String {
    format_order_id(date_prefix, sequence.clamp(1, MAX_TWO_DIGIT_SEQUENCE))
}

// =============================================================================
// Unit Tests
// =============================================================================
