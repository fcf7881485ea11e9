use anyhow::{bail, Context, Result};
use billport_core::MemoryStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// `$BILLPORT_HOME`, or `~/.billport`.
pub fn billport_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BILLPORT_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".billport"))
}

pub fn ensure_billport_home() -> Result<PathBuf> {
    let dir = billport_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub owner_id: String,
    pub email: Option<String>,
    pub created_at_utc: Option<String>,
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_billport_home()?.join("profile.json"))
}

pub fn store_path() -> Result<PathBuf> {
    Ok(ensure_billport_home()?.join("store.json"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        bail!("No profile found at {}. Run: billport setup", p.display());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn load_store() -> Result<MemoryStore> {
    let p = store_path()?;
    if !p.exists() {
        return Ok(MemoryStore::new());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_store(store: &MemoryStore) -> Result<()> {
    let p = store_path()?;
    let json = serde_json::to_string_pretty(store)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
