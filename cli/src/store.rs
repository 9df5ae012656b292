//! On-disk sandbox state: the whole engine serialized as JSON.
//!
//! Every command loads the state, applies one engine operation and writes
//! the state back. Actor names are remembered alongside the engine so scans
//! can print something friendlier than raw account ids.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use oraclelend::{AccountId, InMemoryEngine, Token, SCALE};
use serde::{Deserialize, Serialize};

/// Borrowable supply minted to the deployer at genesis (10M ORACLE).
const GENESIS_ORACLE_SUPPLY: u128 = 10_000_000;

/// Native balance credited to the deployer at genesis (10k TRUST).
const GENESIS_TRUST_BALANCE: u128 = 10_000;

#[derive(Serialize, Deserialize)]
pub struct SandboxState {
    pub engine: InMemoryEngine,
    /// Human names seen so far, for display only.
    pub actors: BTreeMap<String, AccountId>,
}

impl SandboxState {
    /// Fresh sandbox: deployer holds the minter role, the initial ORACLE
    /// supply and a native float.
    fn genesis() -> Result<Self> {
        let mut engine = InMemoryEngine::default();
        let deployer = AccountId::from_seed("deployer");

        engine.token_mut().grant_minter(deployer);
        engine
            .token_mut()
            .mint(&deployer, &deployer, GENESIS_ORACLE_SUPPLY * SCALE)?;
        engine.bank_mut().deposit(&deployer, GENESIS_TRUST_BALANCE * SCALE);

        let mut actors = BTreeMap::new();
        actors.insert("deployer".to_string(), deployer);
        Ok(SandboxState { engine, actors })
    }

    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing state file {}", path.display()))
        } else {
            info!("no state at {}, starting a fresh sandbox", path.display());
            Self::genesis()
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("serializing sandbox state")?;
        fs::write(path, raw).with_context(|| format!("writing state file {}", path.display()))
    }

    /// Remember a name -> id mapping for later display.
    pub fn register_actor(&mut self, name: &str, id: AccountId) {
        self.actors.entry(name.to_string()).or_insert(id);
    }

    /// Best-effort reverse lookup of an account id.
    pub fn name_of(&self, id: &AccountId) -> String {
        self.actors
            .iter()
            .find(|(_, known)| *known == id)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| format!("{id:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_funds_the_deployer() {
        let state = SandboxState::genesis().unwrap();
        let deployer = AccountId::from_seed("deployer");
        assert!(state.engine.token().is_minter(&deployer));
        assert_eq!(
            state.engine.token().balance_of(&deployer),
            GENESIS_ORACLE_SUPPLY * SCALE
        );
        assert_eq!(
            state.engine.bank().balance_of(&deployer),
            GENESIS_TRUST_BALANCE * SCALE
        );
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SandboxState::load_or_init(&path).unwrap();
        let alice = AccountId::from_seed("alice");
        state.engine.bank_mut().deposit(&alice, 7 * SCALE);
        state.register_actor("alice", alice);
        state.save(&path).unwrap();

        let reloaded = SandboxState::load_or_init(&path).unwrap();
        assert_eq!(reloaded.engine, state.engine);
        assert_eq!(reloaded.name_of(&alice), "alice");
    }
}
