use anyhow::{anyhow, Result};
use billport_core::{
    format_amount, time, BillStatus, BillStore, Category, ClassifiedBill, Dashboard, MemoryStore,
    NewBill,
};
use chrono::Utc;
use clap::Subcommand;
use tracing::info;

use crate::config::Config;
use crate::state::{save_store, Profile};

#[derive(Subcommand, Debug)]
pub enum BillsCommand {
    /// Add a bill
    Add {
        #[arg(long)]
        provider: String,

        #[arg(long)]
        amount: f64,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// utilities, internet, phone, insurance, subscription, credit-card, banking, housing, other
        #[arg(long, default_value = "other")]
        category: String,
    },

    /// List bills, most urgent first
    List {
        /// Due-soon window in days (default from config)
        #[arg(long)]
        lead_days: Option<i64>,

        /// Only show one status: overdue, due-soon, upcoming, paid
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a bill paid and collect reward points
    Pay { id: String },
}

pub fn run(cmd: BillsCommand, cfg: &Config, profile: &Profile, store: &mut MemoryStore) -> Result<()> {
    match cmd {
        BillsCommand::Add {
            provider,
            amount,
            due,
            category,
        } => add(cfg, profile, store, provider, amount, &due, &category),
        BillsCommand::List { lead_days, status } => list(cfg, profile, store, lead_days, status),
        BillsCommand::Pay { id } => pay(profile, store, &id),
    }
}

fn add(
    cfg: &Config,
    profile: &Profile,
    store: &mut MemoryStore,
    provider: String,
    amount: f64,
    due: &str,
    category: &str,
) -> Result<()> {
    let tz = cfg.timezone()?;
    let due_date = time::parse_due_date(due, tz)
        .ok_or_else(|| anyhow!("invalid due date '{due}' (expected YYYY-MM-DD)"))?;

    let new = NewBill::new(
        profile.owner_id.clone(),
        provider,
        Category::from_label(category),
        amount,
        due_date,
    );
    let bill = store.create_bill(new, Utc::now())?;
    save_store(store)?;

    info!(bill_id = %bill.id, "bill added");
    println!(
        "Added {} | {} | {} | due {} | {}",
        bill.id,
        bill.provider_name,
        format_amount(bill.amount),
        due_date,
        bill.category
    );
    Ok(())
}

fn list(
    cfg: &Config,
    profile: &Profile,
    store: &MemoryStore,
    lead_days: Option<i64>,
    status: Option<String>,
) -> Result<()> {
    let filter = status
        .map(|s| BillStatus::parse(&s).ok_or_else(|| anyhow!("unknown status '{s}'")))
        .transpose()?;

    let tz = cfg.timezone()?;
    let today = time::today_in(tz);
    let bills = store.bills_for_owner(&profile.owner_id);
    let dash = Dashboard::build(&bills, today, tz, cfg.status_policy(lead_days));

    let rows: Vec<&ClassifiedBill> = dash
        .iter()
        .filter(|c| filter.is_none_or(|f| c.classification.status == f))
        .collect();

    if rows.is_empty() {
        println!("No bills.");
        return Ok(());
    }
    for c in rows {
        print_row(c);
    }
    Ok(())
}

fn pay(profile: &Profile, store: &mut MemoryStore, id: &str) -> Result<()> {
    let receipt = store.pay_bill(&profile.owner_id, id, Utc::now())?;
    save_store(store)?;

    info!(bill_id = %receipt.bill.id, payment_id = %receipt.payment.id, "payment recorded");
    println!(
        "Paid {} ({}). Payment {}.",
        receipt.bill.provider_name,
        format_amount(receipt.payment.amount),
        receipt.payment.id
    );
    println!("Earned {} points ({}).", receipt.reward.points, receipt.reward.id);
    Ok(())
}

pub fn dashboard(cfg: &Config, profile: &Profile, store: &MemoryStore, lead_days: Option<i64>) -> Result<()> {
    let tz = cfg.timezone()?;
    let today = time::today_in(tz);
    let bills = store.bills_for_owner(&profile.owner_id);
    let dash = Dashboard::build(&bills, today, tz, cfg.status_policy(lead_days));

    println!("# Bills for {} ({})\n", profile.owner_id, today);
    println!(
        "Overdue: {} | Due soon: {} | Upcoming: {} | Paid: {}",
        dash.count(BillStatus::Overdue),
        dash.count(BillStatus::DueSoon),
        dash.count(BillStatus::Upcoming),
        dash.count(BillStatus::Paid)
    );
    println!(
        "Unpaid total: {} | Overdue total: {}\n",
        format_amount(dash.total_unpaid),
        format_amount(dash.total_overdue)
    );

    for status in [BillStatus::Overdue, BillStatus::DueSoon, BillStatus::Upcoming] {
        let bucket = dash.bucket(status);
        if bucket.is_empty() {
            continue;
        }
        println!("## {} ({})", status.label(), bucket.len());
        for c in bucket.iter().take(3) {
            print_row(c);
        }
        if bucket.len() > 3 {
            println!("  +{} more", bucket.len() - 3);
        }
        println!();
    }
    Ok(())
}

fn print_row(c: &ClassifiedBill) {
    let due = c
        .due_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- [{}] {} | {} | {} | {} | {}",
        c.classification.status,
        c.bill.id,
        c.bill.provider_name,
        format_amount(c.bill.amount),
        due,
        c.classification.due_text()
    );
}
