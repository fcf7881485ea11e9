//! Reminder policy + projection primitives for bill reminders.
//!
//! A bill gets at most one reminder per type: a week ahead, two days ahead,
//! on the due date, and the day after it lapses. Delivery belongs to the
//! notification sender; this module only decides what to send and when.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::bill::{format_amount, Bill};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReminderType {
    #[serde(rename = "7-days")]
    SevenDays,
    #[serde(rename = "2-days")]
    TwoDays,
    #[serde(rename = "due-today")]
    DueToday,
    #[serde(rename = "overdue")]
    Overdue,
}

/// Fixed copy for one reminder type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderCopy {
    pub subject: &'static str,
    pub header: &'static str,
    pub message: &'static str,
}

impl ReminderType {
    /// Projection order, earliest send date first.
    pub const ALL: [ReminderType; 4] = [
        ReminderType::SevenDays,
        ReminderType::TwoDays,
        ReminderType::DueToday,
        ReminderType::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderType::SevenDays => "7-days",
            ReminderType::TwoDays => "2-days",
            ReminderType::DueToday => "due-today",
            ReminderType::Overdue => "overdue",
        }
    }

    /// Days until due on which this reminder goes out.
    pub fn days_before_due(&self) -> i64 {
        match self {
            ReminderType::SevenDays => 7,
            ReminderType::TwoDays => 2,
            ReminderType::DueToday => 0,
            ReminderType::Overdue => -1,
        }
    }

    pub fn copy(&self) -> ReminderCopy {
        match self {
            ReminderType::SevenDays => ReminderCopy {
                subject: "Upcoming Bill",
                header: "Bill Due in 7 Days",
                message: "You have a bill coming up in 7 days. Plan ahead to avoid missing the due date.",
            },
            ReminderType::TwoDays => ReminderCopy {
                subject: "Bill Due Soon",
                header: "Bill Due in 2 Days",
                message: "Your bill is due in 2 days. Don't forget to make your payment!",
            },
            ReminderType::DueToday => ReminderCopy {
                subject: "Bill Due Today",
                header: "Bill Due Today",
                message: "Your bill is due today. Make sure to pay it to avoid late fees.",
            },
            ReminderType::Overdue => ReminderCopy {
                subject: "Overdue Bill",
                header: "Bill Overdue",
                message: "Your bill is now overdue. Please pay as soon as possible to avoid additional fees.",
            },
        }
    }
}

impl std::fmt::Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the notification sender receives: `(recipient, bill, reminder type)`
/// plus the rendered copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderIntent {
    pub intent_id: String,
    pub bill_id: String,
    pub owner_id: String,
    pub recipient: String,
    pub reminder_type: ReminderType,
    pub subject: String,
    pub body: String,
    pub send_on: NaiveDate,
    pub dedupe_key: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReminderPolicy {
    pub max_per_bill: usize,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self { max_per_bill: 4 }
    }
}

/// Deterministically project a bill into the reminders still ahead of `today`.
/// Send dates are calendar days in `tz`.
pub fn project_bill_reminders(
    bill: &Bill,
    recipient: &str,
    today: NaiveDate,
    tz: Tz,
    policy: ReminderPolicy,
) -> Vec<ReminderIntent> {
    let Some(due) = bill.due_date_in(tz) else {
        return vec![];
    };
    if bill.is_paid {
        return vec![];
    }

    ReminderType::ALL
        .iter()
        .map(|rt| (*rt, due - Duration::days(rt.days_before_due())))
        .filter(|(_, send_on)| *send_on >= today)
        .take(policy.max_per_bill)
        .map(|(rt, send_on)| render(bill, recipient, rt, due, send_on))
        .collect()
}

/// Reminders that go out on `today` across a set of bills.
pub fn due_reminders(
    bills: &[Bill],
    recipient: &str,
    today: NaiveDate,
    tz: Tz,
    policy: ReminderPolicy,
) -> Vec<ReminderIntent> {
    bills
        .iter()
        .flat_map(|b| project_bill_reminders(b, recipient, today, tz, policy))
        .filter(|ri| ri.send_on == today)
        .collect()
}

fn render(
    bill: &Bill,
    recipient: &str,
    rt: ReminderType,
    due: NaiveDate,
    send_on: NaiveDate,
) -> ReminderIntent {
    let copy = rt.copy();
    let body = format!(
        "{}\n{}: {} due {}",
        copy.message,
        bill.provider_name,
        format_amount(bill.amount),
        due.format("%A, %B %-d, %Y")
    );
    ReminderIntent {
        intent_id: format!("ri-{}-{}", bill.id, rt.as_str()),
        bill_id: bill.id.clone(),
        owner_id: bill.owner_id.clone(),
        recipient: recipient.to_string(),
        reminder_type: rt,
        subject: format!("{}: {}", copy.subject, bill.provider_name),
        body,
        send_on,
        // One reminder of each type per bill, however often planning runs.
        dedupe_key: format!("{}:{}", bill.id, rt.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{Category, NewBill};
    use chrono::{TimeZone, Utc};
    use chrono_tz::UTC;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
    }

    fn bill_due_in(days: i64) -> Bill {
        let created = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        NewBill::new("u1", "Toronto Hydro", Category::Utilities, 120.0, today() + Duration::days(days))
            .into_bill("bill-0001".into(), created)
    }

    #[test]
    fn test_type_wire_names() {
        let days: Vec<i64> = ReminderType::ALL.iter().map(|rt| rt.days_before_due()).collect();
        assert_eq!(days, vec![7, 2, 0, -1]);
        assert_eq!(serde_json::to_string(&ReminderType::SevenDays).unwrap(), "\"7-days\"");
    }

    #[test]
    fn test_far_bill_gets_all_four() {
        let out = project_bill_reminders(&bill_due_in(10), "a@b.ca", today(), UTC, ReminderPolicy::default());
        let types: Vec<ReminderType> = out.iter().map(|r| r.reminder_type).collect();
        assert_eq!(types, ReminderType::ALL.to_vec());
        assert_eq!(out[0].send_on, today() + Duration::days(3));
        assert_eq!(out[3].send_on, today() + Duration::days(11));
        assert_eq!(out[0].dedupe_key, "bill-0001:7-days");
        assert_eq!(out[0].subject, "Upcoming Bill: Toronto Hydro");
        assert!(out[0].body.contains("$120.00 CAD"));
    }

    #[test]
    fn test_stored_instant_uses_local_day() {
        // 02:30 UTC on Aug 11 is the evening of Aug 10 in Toronto: due today there.
        let mut bill = bill_due_in(5);
        bill.due_date = crate::bill::DueDate::parse("2025-08-11T02:30:00Z");
        let toronto: Tz = "America/Toronto".parse().unwrap();

        let out = due_reminders(&[bill.clone()], "a@b.ca", today(), toronto, ReminderPolicy::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].reminder_type, ReminderType::DueToday);

        let out = due_reminders(&[bill], "a@b.ca", today(), UTC, ReminderPolicy::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_past_slots_are_skipped() {
        let out = project_bill_reminders(&bill_due_in(1), "a@b.ca", today(), UTC, ReminderPolicy::default());
        let types: Vec<ReminderType> = out.iter().map(|r| r.reminder_type).collect();
        assert_eq!(types, vec![ReminderType::DueToday, ReminderType::Overdue]);
    }

    #[test]
    fn test_policy_caps_count() {
        let policy = ReminderPolicy { max_per_bill: 2 };
        let out = project_bill_reminders(&bill_due_in(10), "a@b.ca", today(), UTC, policy);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_paid_or_undated_emit_none() {
        let mut paid = bill_due_in(2);
        paid.is_paid = true;
        assert!(project_bill_reminders(&paid, "a@b.ca", today(), UTC, ReminderPolicy::default()).is_empty());

        let mut undated = bill_due_in(2);
        undated.due_date = None;
        assert!(project_bill_reminders(&undated, "a@b.ca", today(), UTC, ReminderPolicy::default()).is_empty());
    }

    #[test]
    fn test_due_reminders_for_today() {
        let mut bills = vec![bill_due_in(7), bill_due_in(2), bill_due_in(0), bill_due_in(-1), bill_due_in(5)];
        for (i, b) in bills.iter_mut().enumerate() {
            b.id = format!("bill-{i}");
        }
        let out = due_reminders(&bills, "a@b.ca", today(), UTC, ReminderPolicy::default());
        let types: Vec<ReminderType> = out.iter().map(|r| r.reminder_type).collect();
        assert_eq!(
            types,
            vec![ReminderType::SevenDays, ReminderType::TwoDays, ReminderType::DueToday, ReminderType::Overdue]
        );
        assert!(out.iter().all(|r| r.send_on == today()));
    }
}
