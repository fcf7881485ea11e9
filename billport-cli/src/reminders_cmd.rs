use anyhow::{anyhow, Result};
use billport_core::{due_reminders, time, BillStore, MemoryStore};
use tracing::info;

use crate::config::Config;
use crate::state::Profile;

/// Print the reminders a dispatch run would hand to the mail sender on `date`.
pub fn run(
    cfg: &Config,
    profile: &Profile,
    store: &MemoryStore,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let tz = cfg.timezone()?;
    let day = match date {
        Some(d) => time::parse_due_date(&d, tz).ok_or_else(|| anyhow!("invalid date '{d}'"))?,
        None => time::today_in(tz),
    };

    let recipient = cfg
        .reminders
        .recipient
        .clone()
        .or_else(|| profile.email.clone())
        .ok_or_else(|| {
            anyhow!("No recipient set. Set [reminders].recipient in config.toml or add an email in `billport setup`")
        })?;

    let bills = store.bills_for_owner(&profile.owner_id);
    let intents = due_reminders(&bills, &recipient, day, tz, cfg.reminder_policy());
    info!(count = intents.len(), %day, "reminders planned");

    if json {
        for ri in &intents {
            println!("{}", serde_json::to_string(ri)?);
        }
        return Ok(());
    }

    if intents.is_empty() {
        println!("No reminders due on {}.", day);
        return Ok(());
    }
    for ri in &intents {
        println!("[{}] {} -> {}", ri.reminder_type, ri.subject, ri.recipient);
        println!("    {}", ri.body.replace('\n', "\n    "));
    }
    Ok(())
}
