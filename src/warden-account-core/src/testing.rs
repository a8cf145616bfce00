//! Test doubles shared by the module tests.

use std::collections::BTreeSet;

use alloy_primitives::{Address, B256, U256};
use warden_account_types::{
    entrypoint_selector, Call, DispatchError, Ledger, Selector, SignatureVerifier,
};

pub fn key(byte: u8) -> B256 {
    B256::repeat_byte(byte)
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn selector_of(name: &str) -> Selector {
    entrypoint_selector(name)
}

/// Scripted ledger: fixed clock/caller, per-target dispatch failures, and a
/// log of everything dispatched.
pub struct MockLedger {
    pub now: u64,
    pub caller: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub tx_hash: B256,
    pub failing_targets: BTreeSet<Address>,
    pub dispatched: Vec<Call>,
}

impl MockLedger {
    pub fn new(now: u64, caller: Address) -> Self {
        Self {
            now,
            caller,
            chain_id: 1,
            nonce: 0,
            tx_hash: B256::repeat_byte(0x55),
            failing_targets: BTreeSet::new(),
            dispatched: Vec::new(),
        }
    }
}

impl Ledger for MockLedger {
    fn timestamp(&self) -> u64 {
        self.now
    }

    fn caller(&self) -> Address {
        self.caller
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn account_nonce(&self) -> u64 {
        self.nonce
    }

    fn transaction_hash(&self) -> B256 {
        self.tx_hash
    }

    fn dispatch(&mut self, call: &Call) -> Result<Vec<U256>, DispatchError> {
        self.dispatched.push(call.clone());
        if self.failing_targets.contains(&call.target) {
            Err(DispatchError::Reverted)
        } else {
            Ok(vec![U256::from(1)])
        }
    }
}

/// Verifier accepting exactly the `(digest, key, r, s)` tuples it was primed
/// with.
#[derive(Default)]
pub struct StaticVerifier {
    pub accepted: BTreeSet<(B256, B256, U256, U256)>,
}

impl StaticVerifier {
    pub fn accept(&mut self, digest: B256, key: B256, r: U256, s: U256) {
        self.accepted.insert((digest, key, r, s));
    }
}

impl SignatureVerifier for StaticVerifier {
    fn verify(&self, digest: B256, key: B256, r: U256, s: U256) -> bool {
        self.accepted.contains(&(digest, key, r, s))
    }
}
