//! Owner-scoped bill storage.
//!
//! `BillStore` is the seam a hosted backend would implement. `MemoryStore`
//! is the local implementation: plain vectors, serializable so the CLI can
//! keep it in a JSON file between runs.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bill::{Bill, NewBill};
use crate::rewards::Reward;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub bill_id: String,
    pub owner_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Everything recorded by a successful payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub bill: Bill,
    pub payment: Payment,
    pub reward: Reward,
}

pub trait BillStore {
    fn create_bill(&mut self, new: NewBill, now: DateTime<Utc>) -> Result<Bill>;

    fn bills_for_owner(&self, owner_id: &str) -> Vec<Bill>;

    /// `None` both for unknown ids and for bills owned by someone else.
    fn get_bill(&self, owner_id: &str, bill_id: &str) -> Option<Bill>;

    /// Record a payment, mark the bill paid, and award points. A bill can be
    /// paid once.
    fn pay_bill(&mut self, owner_id: &str, bill_id: &str, now: DateTime<Utc>) -> Result<PaymentReceipt>;

    fn payments_for_owner(&self, owner_id: &str) -> Vec<Payment>;

    fn rewards_for_owner(&self, owner_id: &str) -> Vec<Reward>;

    fn redeem_reward(&mut self, owner_id: &str, reward_id: &str) -> Result<Reward>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    bills: Vec<Bill>,
    #[serde(default)]
    payments: Vec<Payment>,
    #[serde(default)]
    rewards: Vec<Reward>,
    #[serde(default)]
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_seq += 1;
        format!("{}-{:04}", prefix, self.next_seq)
    }
}

impl BillStore for MemoryStore {
    fn create_bill(&mut self, new: NewBill, now: DateTime<Utc>) -> Result<Bill> {
        new.validate()?;
        let id = self.next_id("bill");
        let bill = new.into_bill(id, now);
        debug!(bill_id = %bill.id, owner = %bill.owner_id, amount = bill.amount, "created bill");
        self.bills.push(bill.clone());
        Ok(bill)
    }

    fn bills_for_owner(&self, owner_id: &str) -> Vec<Bill> {
        self.bills
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn get_bill(&self, owner_id: &str, bill_id: &str) -> Option<Bill> {
        self.bills
            .iter()
            .find(|b| b.id == bill_id && b.owner_id == owner_id)
            .cloned()
    }

    fn pay_bill(&mut self, owner_id: &str, bill_id: &str, now: DateTime<Utc>) -> Result<PaymentReceipt> {
        let idx = self
            .bills
            .iter()
            .position(|b| b.id == bill_id && b.owner_id == owner_id)
            .ok_or_else(|| anyhow!("bill not found: {bill_id}"))?;

        if self.bills[idx].is_paid {
            bail!("bill {bill_id} is already paid");
        }
        if !self.bills[idx].is_actionable() {
            bail!("bill {bill_id} has no amount to pay");
        }

        let payment_id = self.next_id("pay");
        let reward_id = self.next_id("rwd");

        let bill = &mut self.bills[idx];
        bill.is_paid = true;
        let bill = bill.clone();

        let payment = Payment {
            id: payment_id,
            bill_id: bill.id.clone(),
            owner_id: bill.owner_id.clone(),
            amount: bill.amount,
            status: PaymentStatus::Completed,
            created_at: now,
        };
        let reward = Reward::for_payment(reward_id, &bill, now);

        debug!(bill_id = %bill.id, points = reward.points, "bill paid");
        self.payments.push(payment.clone());
        self.rewards.push(reward.clone());

        Ok(PaymentReceipt {
            bill,
            payment,
            reward,
        })
    }

    fn payments_for_owner(&self, owner_id: &str) -> Vec<Payment> {
        self.payments
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn rewards_for_owner(&self, owner_id: &str) -> Vec<Reward> {
        self.rewards
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn redeem_reward(&mut self, owner_id: &str, reward_id: &str) -> Result<Reward> {
        let reward = self
            .rewards
            .iter_mut()
            .find(|r| r.id == reward_id && r.owner_id == owner_id)
            .ok_or_else(|| anyhow!("reward not found: {reward_id}"))?;
        reward.redeem()?;
        debug!(reward_id, points = reward.points, "reward redeemed");
        Ok(reward.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::Category;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 10, 15, 0, 0).unwrap()
    }

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 12).unwrap()
    }

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .create_bill(NewBill::new("alice", "Toronto Hydro", Category::Utilities, 247.80, due()), now())
            .unwrap();
        store
            .create_bill(NewBill::new("bob", "Rogers", Category::Phone, 89.99, due()), now())
            .unwrap();
        store
    }

    #[test]
    fn test_owner_isolation() {
        let store = seeded();
        let alice = store.bills_for_owner("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].provider_name, "Toronto Hydro");

        let bob_bill = &store.bills_for_owner("bob")[0];
        assert!(store.get_bill("alice", &bob_bill.id).is_none());
        assert!(store.get_bill("bob", &bob_bill.id).is_some());
        assert!(store.bills_for_owner("carol").is_empty());
    }

    #[test]
    fn test_create_rejects_invalid() {
        let mut store = MemoryStore::new();
        let err = store.create_bill(NewBill::new("alice", "", Category::Other, 5.0, due()), now());
        assert!(err.is_err());
        assert!(store.bills_for_owner("alice").is_empty());
    }

    #[test]
    fn test_pay_once() {
        let mut store = seeded();
        let id = store.bills_for_owner("alice")[0].id.clone();

        let receipt = store.pay_bill("alice", &id, now()).unwrap();
        assert!(receipt.bill.is_paid);
        assert_eq!(receipt.payment.amount, 247.80);
        assert_eq!(receipt.payment.status, PaymentStatus::Completed);
        assert_eq!(receipt.reward.points, 24);
        assert!(store.get_bill("alice", &id).unwrap().is_paid);

        assert!(store.pay_bill("alice", &id, now()).is_err());
        assert_eq!(store.payments_for_owner("alice").len(), 1);
        assert_eq!(store.rewards_for_owner("alice").len(), 1);
    }

    #[test]
    fn test_cannot_pay_foreign_or_zero_bill() {
        let mut store = seeded();
        let bob_id = store.bills_for_owner("bob")[0].id.clone();
        assert!(store.pay_bill("alice", &bob_id, now()).is_err());
        assert!(!store.get_bill("bob", &bob_id).unwrap().is_paid);

        let free = store
            .create_bill(NewBill::new("alice", "Trial", Category::Subscription, 0.0, due()), now())
            .unwrap();
        assert!(store.pay_bill("alice", &free.id, now()).is_err());
    }

    #[test]
    fn test_redeem_reward() {
        let mut store = seeded();
        let id = store.bills_for_owner("bob")[0].id.clone();
        let receipt = store.pay_bill("bob", &id, now()).unwrap();

        assert!(store.redeem_reward("alice", &receipt.reward.id).is_err());
        let redeemed = store.redeem_reward("bob", &receipt.reward.id).unwrap();
        assert!(redeemed.is_redeemed);
        assert!(store.redeem_reward("bob", &receipt.reward.id).is_err());
    }

    #[test]
    fn test_store_survives_json() {
        let mut store = seeded();
        let id = store.bills_for_owner("alice")[0].id.clone();
        store.pay_bill("alice", &id, now()).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let mut back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bills_for_owner("alice"), store.bills_for_owner("alice"));

        // Ids keep counting after reload.
        let next = back
            .create_bill(NewBill::new("alice", "Netflix", Category::Subscription, 15.99, due()), now())
            .unwrap();
        assert!(store.get_bill("alice", &next.id).is_none());
    }
}
