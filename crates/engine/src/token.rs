//! External asset collaborators, made explicit.
//!
//! The engine never moves value implicitly: the borrowable asset goes
//! through a [`Token`] implementation (balances, allowances, a minter
//! capability gate) and the native asset through a [`NativeBank`]. Both are
//! in-process here, but the engine only relies on the call boundary, so a
//! different backing can be swapped in behind the [`Token`] trait.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Opaque 32-byte account identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Deterministic id from a human-readable seed. Seed bytes are folded
    /// onto the 32-byte buffer, so distinct short names stay distinct.
    pub fn from_seed(seed: &str) -> Self {
        let mut bytes = [0u8; 32];
        for (i, b) in seed.as_bytes().iter().enumerate() {
            bytes[i % 32] ^= b.rotate_left((i / 32) as u32);
        }
        bytes[31] ^= seed.len() as u8;
        AccountId(bytes)
    }

    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for b in self.0 {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(AccountId(bytes))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({}..)", &self.to_hex()[..8])
    }
}

// Hex-string serde so AccountId can key JSON maps.
impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = AccountId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 64-character hex account id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<AccountId, E> {
                AccountId::from_hex(v)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// Failures surfaced by the borrowable-token collaborator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token balance too low: required {required}, available {available}")]
    InsufficientBalance { required: u128, available: u128 },

    #[error("token allowance too low: required {required}, available {available}")]
    InsufficientAllowance { required: u128, available: u128 },

    #[error("account is not a minter")]
    NotMinter,
}

/// Failures surfaced by the native value-transfer collaborator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BankError {
    #[error("native balance too low: required {required}, available {available}")]
    InsufficientFunds { required: u128, available: u128 },
}

/// Fungible borrowable-asset collaborator: the call boundary the engine
/// assumes of the token it lends out.
pub trait Token {
    fn balance_of(&self, account: &AccountId) -> u128;
    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;
    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: u128);
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), TokenError>;
    /// Spend `from`'s prior approval to `spender`, moving tokens to `to`.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError>;
    fn is_minter(&self, account: &AccountId) -> bool;
    fn mint(&mut self, minter: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), TokenError>;
}

/// In-process token ledger with allowances and a minter set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryToken {
    balances: BTreeMap<AccountId, u128>,
    allowances: BTreeMap<AccountId, BTreeMap<AccountId, u128>>,
    minters: BTreeSet<AccountId>,
}

impl InMemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant_minter(&mut self, account: AccountId) {
        self.minters.insert(account);
    }

    fn debit(&mut self, from: &AccountId, amount: u128) -> Result<(), TokenError> {
        let balance = self.balances.entry(*from).or_default();
        if *balance < amount {
            return Err(TokenError::InsufficientBalance {
                required: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, to: &AccountId, amount: u128) {
        let balance = self.balances.entry(*to).or_default();
        *balance = balance.saturating_add(amount);
    }
}

impl Token for InMemoryToken {
    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: u128) {
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), TokenError>
    {
        self.debit(from, amount)?;
        self.credit(to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount,
                available: allowed,
            });
        }
        self.debit(from, amount)?;
        // Burn the allowance only after the debit succeeded.
        self.allowances
            .entry(*from)
            .or_default()
            .insert(*spender, allowed - amount);
        self.credit(to, amount);
        Ok(())
    }

    fn is_minter(&self, account: &AccountId) -> bool {
        self.minters.contains(account)
    }

    fn mint(&mut self, minter: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), TokenError>
    {
        if !self.is_minter(minter) {
            return Err(TokenError::NotMinter);
        }
        self.credit(to, amount);
        Ok(())
    }
}

/// Native-asset balances. Deposits saturate (a faucet, not an invariant);
/// transfers fail cleanly on insufficient funds and cannot partially apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeBank {
    balances: BTreeMap<AccountId, u128>,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn deposit(&mut self, account: &AccountId, amount: u128) {
        let balance = self.balances.entry(*account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u128)
        -> Result<(), BankError>
    {
        let available = self.balance_of(from);
        if available < amount {
            return Err(BankError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        self.deposit(to, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::from_seed("alice")
    }

    fn bob() -> AccountId {
        AccountId::from_seed("bob")
    }

    #[test]
    fn seeds_are_deterministic_and_distinct() {
        assert_eq!(alice(), AccountId::from_seed("alice"));
        assert_ne!(alice(), bob());
        assert_ne!(AccountId::from_seed("ab"), AccountId::from_seed("ba"));
    }

    #[test]
    fn hex_round_trip() {
        let id = alice();
        assert_eq!(AccountId::from_hex(&id.to_hex()), Some(id));
        assert_eq!(AccountId::from_hex("zz"), None);
    }

    #[test]
    fn transfer_moves_balance() {
        let mut token = InMemoryToken::new();
        token.grant_minter(alice());
        token.mint(&alice(), &alice(), 100).unwrap();

        token.transfer(&alice(), &bob(), 40).unwrap();
        assert_eq!(token.balance_of(&alice()), 60);
        assert_eq!(token.balance_of(&bob()), 40);

        let err = token.transfer(&alice(), &bob(), 61).unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                required: 61,
                available: 60
            }
        );
    }

    #[test]
    fn transfer_from_requires_and_burns_allowance() {
        let mut token = InMemoryToken::new();
        token.grant_minter(alice());
        token.mint(&alice(), &alice(), 100).unwrap();

        let spender = bob();
        let err = token
            .transfer_from(&spender, &alice(), &spender, 10)
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                required: 10,
                available: 0
            }
        );

        token.approve(&alice(), &spender, 30);
        token.transfer_from(&spender, &alice(), &spender, 10).unwrap();
        assert_eq!(token.allowance(&alice(), &spender), 20);
        assert_eq!(token.balance_of(&spender), 10);
    }

    #[test]
    fn mint_is_gated() {
        let mut token = InMemoryToken::new();
        assert_eq!(
            token.mint(&alice(), &alice(), 1),
            Err(TokenError::NotMinter)
        );
        token.grant_minter(alice());
        token.mint(&alice(), &bob(), 5).unwrap();
        assert_eq!(token.balance_of(&bob()), 5);
    }

    #[test]
    fn bank_transfer_is_all_or_nothing() {
        let mut bank = NativeBank::new();
        bank.deposit(&alice(), 50);

        let err = bank.transfer(&alice(), &bob(), 51).unwrap_err();
        assert_eq!(
            err,
            BankError::InsufficientFunds {
                required: 51,
                available: 50
            }
        );
        assert_eq!(bank.balance_of(&alice()), 50);
        assert_eq!(bank.balance_of(&bob()), 0);

        bank.transfer(&alice(), &bob(), 50).unwrap();
        assert_eq!(bank.balance_of(&bob()), 50);
    }
}
