//! Bucketed dashboard view over one owner's bills.

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;

use crate::bill::Bill;
use crate::status::{sort_bills, BillStatus, Classification, StatusPolicy};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassifiedBill {
    pub bill: Bill,
    /// Due date resolved in the dashboard's timezone
    pub due_on: Option<NaiveDate>,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Dashboard {
    pub overdue: Vec<ClassifiedBill>,
    pub due_soon: Vec<ClassifiedBill>,
    pub upcoming: Vec<ClassifiedBill>,
    pub paid: Vec<ClassifiedBill>,
    /// Sum of amounts across every unpaid bill
    pub total_unpaid: f64,
    pub total_overdue: f64,
}

impl Dashboard {
    /// `today` must be the current calendar date in `tz`.
    pub fn build(bills: &[Bill], today: NaiveDate, tz: Tz, policy: StatusPolicy) -> Self {
        let mut sorted = bills.to_vec();
        sort_bills(&mut sorted, today, tz, policy);

        let mut dash = Dashboard::default();
        for bill in sorted {
            let due_on = bill.due_date_in(tz);
            let classification = bill.classify(today, tz, policy);
            if !bill.is_paid {
                dash.total_unpaid += bill.amount;
            }
            if classification.status == BillStatus::Overdue {
                dash.total_overdue += bill.amount;
            }
            let entry = ClassifiedBill {
                bill,
                due_on,
                classification,
            };
            match classification.status {
                BillStatus::Overdue => dash.overdue.push(entry),
                BillStatus::DueSoon => dash.due_soon.push(entry),
                BillStatus::Upcoming => dash.upcoming.push(entry),
                BillStatus::Paid => dash.paid.push(entry),
            }
        }
        dash
    }

    pub fn bucket(&self, status: BillStatus) -> &[ClassifiedBill] {
        match status {
            BillStatus::Overdue => &self.overdue,
            BillStatus::DueSoon => &self.due_soon,
            BillStatus::Upcoming => &self.upcoming,
            BillStatus::Paid => &self.paid,
        }
    }

    pub fn count(&self, status: BillStatus) -> usize {
        self.bucket(status).len()
    }

    /// All bills in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedBill> {
        self.overdue
            .iter()
            .chain(&self.due_soon)
            .chain(&self.upcoming)
            .chain(&self.paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{Category, NewBill};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_buckets_and_totals() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
        let created = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let mk = |id: &str, amount: f64, offset: i64, paid: bool| {
            let mut b = NewBill::new("u1", id, Category::Other, amount, today + Duration::days(offset))
                .into_bill(id.to_string(), created);
            b.is_paid = paid;
            b
        };
        let bills = vec![
            mk("a", 100.0, -2, false),
            mk("b", 50.0, 1, false),
            mk("c", 25.0, 6, false),
            mk("d", 10.0, -10, true),
            mk("e", 40.0, -1, false),
        ];

        let dash = Dashboard::build(&bills, today, chrono_tz::UTC, StatusPolicy::default());
        assert_eq!(dash.count(BillStatus::Overdue), 2);
        assert_eq!(dash.count(BillStatus::DueSoon), 1);
        assert_eq!(dash.count(BillStatus::Upcoming), 1);
        assert_eq!(dash.count(BillStatus::Paid), 1);
        assert_eq!(dash.total_unpaid, 215.0);
        assert_eq!(dash.total_overdue, 140.0);
        assert_eq!(dash.overdue[0].bill.id, "a");

        let order: Vec<&str> = dash.iter().map(|c| c.bill.id.as_str()).collect();
        assert_eq!(order, vec!["a", "e", "b", "c", "d"]);

        // Wider window pulls the 6-day bill into due-soon.
        let week = Dashboard::build(&bills, today, chrono_tz::UTC, StatusPolicy::week());
        assert_eq!(week.count(BillStatus::DueSoon), 2);
        assert_eq!(week.count(BillStatus::Upcoming), 0);
    }

    #[test]
    fn test_stored_timestamp_near_local_midnight() {
        // Stored at 02:30 UTC on Aug 12: still the evening of Aug 11 in Toronto.
        let bill: Bill = serde_json::from_str(
            r#"{"id":"b1","ownerId":"u1","providerName":"Toronto Hydro","amount":"120.00",
                "dueDate":"2025-08-12T02:30:00Z","createdAt":"2025-08-01T12:00:00Z"}"#,
        )
        .unwrap();
        let toronto: Tz = "America/Toronto".parse().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 8, 12).unwrap();

        let dash = Dashboard::build(&[bill], today, toronto, StatusPolicy::default());
        assert_eq!(dash.count(BillStatus::Overdue), 1);
        assert_eq!(dash.overdue[0].due_on, NaiveDate::from_ymd_opt(2025, 8, 11));
        assert_eq!(dash.overdue[0].classification.due_text(), "1 day overdue");
        assert_eq!(dash.total_overdue, 120.0);
    }
}
