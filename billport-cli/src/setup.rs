use anyhow::{bail, Result};
use std::io::{self, Write};

use crate::config::init_config;
use crate::state::{profile_path, write_profile, Profile};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn run_setup() -> Result<()> {
    println!("BillPort setup\n");
    let owner_id = prompt("Username")?;
    if owner_id.is_empty() {
        bail!("username is required");
    }
    let email = prompt("Email for reminders (optional)")?;

    let profile = Profile {
        owner_id,
        email: if email.is_empty() { None } else { Some(email) },
        created_at_utc: Some(chrono::Utc::now().to_rfc3339()),
    };
    write_profile(&profile)?;
    init_config()?;

    println!("\nWrote {}", profile_path()?.display());
    println!("\nNext:");
    println!("- billport bills add --provider \"Toronto Hydro\" --amount 120.50 --due 2025-08-12 --category utilities");
    println!("- billport scan --csv mail.csv");
    println!("- billport dashboard");

    Ok(())
}
