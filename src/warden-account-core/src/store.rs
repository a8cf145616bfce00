//! Explicit per-account state repository.
//!
//! One `AccountStore` holds the full mutable state of a single account:
//! session records, spending policies, the pending upgrade and the identity.
//! It replaces on-chain key-value storage with an in-memory repository that is
//! passed to every component; the hosting ledger serializes transactions per
//! account, so access is single-writer.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use warden_account_types::{
    AccountIdentity, PendingUpgrade, SessionKeyRecord, SignatureMode, SpendingPolicy,
};

#[derive(Clone, Debug)]
pub struct AccountStore {
    pub identity: AccountIdentity,
    /// Reference to the currently active account code.
    pub code: B256,
    /// Configured timelock delay applied to the next `schedule_upgrade`.
    pub upgrade_delay: u64,
    pub pending_upgrade: Option<PendingUpgrade>,
    sessions: BTreeMap<B256, SessionKeyRecord>,
    policies: BTreeMap<(B256, Address), SpendingPolicy>,
}

impl AccountStore {
    pub fn new(owner_key: B256, code: B256, upgrade_delay: u64) -> Self {
        Self {
            identity: AccountIdentity {
                owner_key,
                mode: SignatureMode::V1Legacy,
                agent_id: U256::ZERO,
            },
            code,
            upgrade_delay,
            pending_upgrade: None,
            sessions: BTreeMap::new(),
            policies: BTreeMap::new(),
        }
    }

    /// Look up a session record; a record with `valid_until == 0` is absent.
    pub fn session(&self, key: B256) -> Option<&SessionKeyRecord> {
        self.sessions.get(&key).filter(|r| r.valid_until != 0)
    }

    pub fn session_mut(&mut self, key: B256) -> Option<&mut SessionKeyRecord> {
        self.sessions.get_mut(&key).filter(|r| r.valid_until != 0)
    }

    /// Replaces any previous record wholesale, dropping its entrypoint list.
    pub fn insert_session(&mut self, key: B256, record: SessionKeyRecord) {
        self.sessions.insert(key, record);
    }

    pub fn remove_session(&mut self, key: B256) -> Option<SessionKeyRecord> {
        self.sessions.remove(&key)
    }

    pub fn clear_sessions(&mut self) {
        self.sessions.clear();
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn policy(&self, session_key: B256, token: Address) -> Option<&SpendingPolicy> {
        self.policies.get(&(session_key, token))
    }

    pub fn insert_policy(&mut self, session_key: B256, token: Address, policy: SpendingPolicy) {
        self.policies.insert((session_key, token), policy);
    }

    pub fn remove_policy(&mut self, session_key: B256, token: Address) -> Option<SpendingPolicy> {
        self.policies.remove(&(session_key, token))
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }
}
