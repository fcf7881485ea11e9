//! billport-core: bill records, status classification, reminders and rewards

pub mod bill;
pub mod dashboard;
pub mod reminders;
pub mod rewards;
pub mod status;
pub mod store;
pub mod time;

pub use bill::{format_amount, Bill, Category, DueDate, NewBill, CURRENCY};
pub use dashboard::{ClassifiedBill, Dashboard};
pub use reminders::{
    due_reminders, project_bill_reminders, ReminderCopy, ReminderIntent, ReminderPolicy,
    ReminderType,
};
pub use rewards::{
    affordable_tiers, available_points, points_for_payment, Reward, RewardTier, REWARD_CATALOG,
};
pub use status::{classify, days_until_due, sort_bills, BillStatus, Classification, StatusPolicy};
pub use store::{BillStore, MemoryStore, Payment, PaymentReceipt, PaymentStatus};
