//! Collaborator traits the core is evaluated against.
//!
//! The core never talks to a chain, a database, or a crypto library directly:
//! time, caller identity, call dispatch, signature verification and field
//! hashing all arrive through these seams so the policy logic stays pure and
//! testable off-chain.

use alloy_primitives::{Address, B256, U256};

use crate::call::Call;

/// Errors surfaced by the ledger when dispatching an individual call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The target reverted or rejected the call.
    Reverted,
    /// The target does not exist or could not be reached.
    TargetUnreachable,
}

/// Runtime collaborator: clock, caller identity and per-call dispatch.
///
/// The ledger delivers transactions for one account serialized and in order,
/// so the core never observes concurrent mutation of one account's state. The
/// clock is read once per transaction and never re-read mid-execution.
pub trait Ledger {
    /// Current time in epoch seconds.
    fn timestamp(&self) -> u64;

    /// Identity of the caller of the current entrypoint.
    fn caller(&self) -> Address;

    /// Chain identifier, bound into domain-separated digests.
    fn chain_id(&self) -> u64;

    /// Current transaction nonce of the account.
    fn account_nonce(&self) -> u64;

    /// Hash of the in-flight transaction, as computed by the protocol.
    fn transaction_hash(&self) -> B256;

    /// Dispatch a single outbound call, returning its result words.
    fn dispatch(&mut self, call: &Call) -> Result<Vec<U256>, DispatchError>;
}

/// External signature verification primitive.
pub trait SignatureVerifier {
    fn verify(&self, digest: B256, key: B256, r: U256, s: U256) -> bool;
}

/// Order-sensitive digest over an ordered field list.
///
/// Used for both the legacy and the domain-separated session message hashes;
/// reordering the fields must change the digest.
pub trait FieldHasher {
    fn hash_fields(&self, fields: &[U256]) -> B256;
}
