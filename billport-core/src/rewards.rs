//! Reward points earned by paying bills, and the redemption catalog.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bill::Bill;

/// One point per this many dollars paid.
pub const DOLLARS_PER_POINT: f64 = 10.0;

/// Points earned for a payment: `floor(amount / 10)`.
pub fn points_for_payment(amount: f64) -> u32 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    (amount / DOLLARS_PER_POINT).floor() as u32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: String,
    pub owner_id: String,
    pub points: u32,
    pub title: String,
    pub description: String,
    pub is_redeemed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reward {
    /// The reward written when `bill` is paid.
    pub fn for_payment(id: impl Into<String>, bill: &Bill, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            owner_id: bill.owner_id.clone(),
            points: points_for_payment(bill.amount),
            title: "Payment Reward".to_string(),
            description: format!("Earned for paying {}", bill.provider_name),
            is_redeemed: false,
            created_at: now,
        }
    }

    pub fn redeem(&mut self) -> Result<()> {
        if self.is_redeemed {
            bail!("reward {} was already redeemed", self.id);
        }
        self.is_redeemed = true;
        Ok(())
    }
}

/// Sum of points on rewards not yet redeemed.
pub fn available_points(rewards: &[Reward]) -> u32 {
    rewards
        .iter()
        .filter(|r| !r.is_redeemed)
        .map(|r| r.points)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardTier {
    pub name: &'static str,
    pub cost: u32,
}

pub const REWARD_CATALOG: [RewardTier; 3] = [
    RewardTier { name: "$5 Bill Credit", cost: 500 },
    RewardTier { name: "$10 Bill Credit", cost: 1000 },
    RewardTier { name: "Premium Features", cost: 2500 },
];

pub fn affordable_tiers(balance: u32) -> Vec<RewardTier> {
    REWARD_CATALOG
        .iter()
        .copied()
        .filter(|t| t.cost <= balance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{Category, NewBill};
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_points_floor() {
        assert_eq!(points_for_payment(247.80), 24);
        assert_eq!(points_for_payment(1245.30), 124);
        assert_eq!(points_for_payment(9.99), 0);
        assert_eq!(points_for_payment(10.0), 1);
        assert_eq!(points_for_payment(0.0), 0);
        assert_eq!(points_for_payment(-50.0), 0);
    }

    #[test]
    fn test_redeem_once() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let due = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let bill = NewBill::new("u1", "Spectrum", Category::Internet, 89.99, due)
            .into_bill("bill-0001".into(), now);
        let mut reward = Reward::for_payment("rwd-0001", &bill, now);
        assert_eq!(reward.points, 8);
        assert_eq!(reward.description, "Earned for paying Spectrum");

        reward.redeem().unwrap();
        assert!(reward.is_redeemed);
        assert!(reward.redeem().is_err());
    }

    #[test]
    fn test_available_points_and_catalog() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let mk = |id: &str, points: u32, redeemed: bool| Reward {
            id: id.into(),
            owner_id: "u1".into(),
            points,
            title: "Payment Reward".into(),
            description: String::new(),
            is_redeemed: redeemed,
            created_at: now,
        };
        let rewards = vec![mk("a", 700, false), mk("b", 400, true), mk("c", 350, false)];
        let balance = available_points(&rewards);
        assert_eq!(balance, 1050);

        let names: Vec<&str> = affordable_tiers(balance).iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["$5 Bill Credit", "$10 Bill Credit"]);
        assert!(affordable_tiers(499).is_empty());
    }
}
