//! Sandbox configuration: state file location and acting identity

use std::path::PathBuf;

use anyhow::{Context, Result};
use oraclelend::AccountId;

pub struct SandboxConfig {
    pub state_path: PathBuf,
    pub actor_name: String,
    pub actor: AccountId,
}

impl SandboxConfig {
    pub fn new(state_path: Option<PathBuf>, actor: &str) -> Result<Self> {
        let state_path = match state_path {
            Some(path) => path,
            None => {
                let home = std::env::var("HOME").context("HOME environment variable not set")?;
                PathBuf::from(home).join(".oraclelend/state.json")
            }
        };
        Ok(Self {
            state_path,
            actor_name: actor.to_string(),
            actor: AccountId::from_seed(actor),
        })
    }
}
