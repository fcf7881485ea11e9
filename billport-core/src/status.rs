//! Calendar-day bill status classification.
//!
//! Status is derived from `(due_date, is_paid, today)` and never stored, so it
//! stays correct for bills created long ago. Both dates must be calendar dates
//! normalized to the same timezone (see [`crate::time`]); a bill due today is
//! never overdue just because part of the day has passed.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::bill::Bill;

/// Derived urgency of a bill. Ordering is display priority: most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillStatus {
    Overdue,
    DueSoon,
    Upcoming,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Overdue => "overdue",
            BillStatus::DueSoon => "due-soon",
            BillStatus::Upcoming => "upcoming",
            BillStatus::Paid => "paid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Overdue => "Overdue",
            BillStatus::DueSoon => "Due Soon",
            BillStatus::Upcoming => "Upcoming",
            BillStatus::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overdue" => Some(BillStatus::Overdue),
            "due-soon" | "due_soon" | "duesoon" => Some(BillStatus::DueSoon),
            "upcoming" => Some(BillStatus::Upcoming),
            "paid" => Some(BillStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far ahead an unpaid bill counts as "due soon".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPolicy {
    /// Inclusive window in days, never negative; `today + lead_window_days`
    /// is still due soon.
    lead_window_days: i64,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self { lead_window_days: 3 }
    }
}

impl StatusPolicy {
    pub fn with_lead_window(days: i64) -> Self {
        Self {
            lead_window_days: days.max(0),
        }
    }

    /// Secondary "due this week" view.
    pub fn week() -> Self {
        Self::with_lead_window(7)
    }

    pub fn lead_window_days(&self) -> i64 {
        self.lead_window_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub status: BillStatus,
    /// Whole calendar days from today to the due date; negative once overdue.
    /// `None` when the bill has no usable due date.
    pub days_until_due: Option<i64>,
}

impl Classification {
    /// Human-readable due text for badges and list rows.
    pub fn due_text(&self) -> String {
        if self.status == BillStatus::Paid {
            return "Paid".to_string();
        }
        match self.days_until_due {
            None => "No due date".to_string(),
            Some(0) => "Due today".to_string(),
            Some(-1) => "1 day overdue".to_string(),
            Some(d) if d < 0 => format!("{} days overdue", -d),
            Some(1) => "Due in 1 day".to_string(),
            Some(d) => format!("Due in {} days", d),
        }
    }
}

/// Classify a bill.
///
/// A missing due date on an unpaid bill is `Upcoming` with no day count:
/// showing a bill as falsely urgent is worse than under-stating it.
pub fn classify(
    due_date: Option<NaiveDate>,
    is_paid: bool,
    today: NaiveDate,
    policy: StatusPolicy,
) -> Classification {
    let days_until_due = due_date.map(|due| days_until_due(due, today));

    let status = if is_paid {
        BillStatus::Paid
    } else {
        match days_until_due {
            None => BillStatus::Upcoming,
            Some(d) if d < 0 => BillStatus::Overdue,
            Some(d) if d <= policy.lead_window_days => BillStatus::DueSoon,
            Some(_) => BillStatus::Upcoming,
        }
    };

    Classification {
        status,
        days_until_due,
    }
}

/// Signed whole days between two calendar dates.
pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Dashboard ordering: status priority, then earliest due date.
/// Bills without a due date go last within their status.
pub fn sort_bills(bills: &mut [Bill], today: NaiveDate, tz: Tz, policy: StatusPolicy) {
    bills.sort_by_cached_key(|b| {
        let due = b.due_date_in(tz);
        let c = classify(due, b.is_paid, today, policy);
        (c.status, due.is_none(), due)
    });
}
