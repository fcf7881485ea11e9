use anyhow::Result;
use billport_core::{affordable_tiers, available_points, BillStore, MemoryStore, REWARD_CATALOG};
use clap::Subcommand;

use crate::state::{save_store, Profile};

#[derive(Subcommand, Debug)]
pub enum RewardsCommand {
    /// List earned rewards and the available balance
    List,

    /// Redeem one reward
    Redeem { id: String },

    /// Show what points can buy
    Catalog,
}

pub fn run(cmd: RewardsCommand, profile: &Profile, store: &mut MemoryStore) -> Result<()> {
    match cmd {
        RewardsCommand::List => {
            let rewards = store.rewards_for_owner(&profile.owner_id);
            for r in &rewards {
                let state = if r.is_redeemed { "redeemed" } else { "available" };
                println!("- {} | {} pts | {} | {}", r.id, r.points, r.description, state);
            }
            println!("\nAvailable points: {}", available_points(&rewards));
        }
        RewardsCommand::Redeem { id } => {
            let reward = store.redeem_reward(&profile.owner_id, &id)?;
            save_store(store)?;
            println!("Redeemed {} ({} pts)", reward.id, reward.points);
        }
        RewardsCommand::Catalog => {
            let balance = available_points(&store.rewards_for_owner(&profile.owner_id));
            let affordable = affordable_tiers(balance);
            for tier in REWARD_CATALOG {
                let mark = if affordable.contains(&tier) { "*" } else { " " };
                println!("{} {} - {} points", mark, tier.name, tier.cost);
            }
            println!("\nBalance: {} points (* = within reach)", balance);
        }
    }
    Ok(())
}
