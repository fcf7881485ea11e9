use anyhow::{Context, Result};
use billport_core::{ReminderPolicy, StatusPolicy};
use billport_ingest::ScanPolicy;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_billport_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub scan: ScanSection,
    #[serde(default)]
    pub reminders: RemindersSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSection {
    /// Days ahead an unpaid bill counts as due soon (inclusive)
    pub lead_window_days: i64,
    /// IANA zone used for both "today" and due dates
    pub timezone: String,
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            lead_window_days: 3,
            timezone: "America/Toronto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanSection {
    pub threshold: f64,
    pub max_messages: usize,
    pub min_amount: f64,
    pub max_amount: f64,
}

impl Default for ScanSection {
    fn default() -> Self {
        let p = ScanPolicy::default();
        Self {
            threshold: p.threshold,
            max_messages: 20,
            min_amount: p.min_amount,
            max_amount: p.max_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemindersSection {
    /// Falls back to the profile email when unset
    pub recipient: Option<String>,
    pub max_per_bill: usize,
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            recipient: None,
            max_per_bill: ReminderPolicy::default().max_per_bill,
        }
    }
}

impl Config {
    pub fn status_policy(&self, lead_days: Option<i64>) -> StatusPolicy {
        StatusPolicy::with_lead_window(lead_days.unwrap_or(self.dashboard.lead_window_days))
    }

    pub fn scan_policy(&self, threshold: Option<f64>) -> ScanPolicy {
        ScanPolicy {
            threshold: threshold.unwrap_or(self.scan.threshold),
            min_amount: self.scan.min_amount,
            max_amount: self.scan.max_amount,
        }
    }

    pub fn reminder_policy(&self) -> ReminderPolicy {
        ReminderPolicy {
            max_per_bill: self.reminders.max_per_bill,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        billport_core::time::parse_tz(&self.dashboard.timezone)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_billport_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.status_policy(None).lead_window_days(), 3);
        assert_eq!(cfg.scan_policy(None).threshold, 0.3);
        assert!(cfg.timezone().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[dashboard]
lead_window_days = 7

[scan]
threshold = 0.5
"#,
        )
        .unwrap();
        assert_eq!(cfg.dashboard.lead_window_days, 7);
        assert_eq!(cfg.dashboard.timezone, "America/Toronto");
        assert_eq!(cfg.scan.threshold, 0.5);
        assert_eq!(cfg.scan.max_messages, 20);
        assert_eq!(cfg.status_policy(Some(1)).lead_window_days(), 1);
        assert_eq!(cfg.scan_policy(Some(0.1)).threshold, 0.1);
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut cfg = Config::default();
        cfg.reminders.recipient = Some("me@example.ca".to_string());
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(parse_config(&s).unwrap(), cfg);
    }

    #[test]
    fn test_old_currency_key_is_ignored() {
        // Amounts are always CAD; older files may still carry the key.
        let cfg = parse_config("[dashboard]\ncurrency = \"USD\"\nlead_window_days = -4\n").unwrap();
        assert_eq!(cfg.dashboard.timezone, "America/Toronto");
        assert!(!toml::to_string_pretty(&cfg).unwrap().contains("currency"));
        assert_eq!(cfg.status_policy(None).lead_window_days(), 0);
    }

    #[test]
    fn test_bad_timezone() {
        let cfg = parse_config("[dashboard]\ntimezone = \"Nowhere/Land\"\n").unwrap();
        assert!(cfg.timezone().is_err());
    }
}
