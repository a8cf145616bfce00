//! Shared types for the Warden smart-account session-policy core.
//!
//! This crate carries the plain data model (calls, session records, spending
//! policies, upgrade state) plus the collaborator traits the core is evaluated
//! against (ledger runtime, signature verifier, field hasher). It deliberately
//! contains no policy logic so that off-core tooling can build and sign
//! transactions without pulling in the authorization core itself.

pub mod call;
pub mod provider;
pub mod records;

pub use call::{entrypoint_selector, Call, CallOutcome, Selector};
pub use provider::{DispatchError, FieldHasher, Ledger, SignatureVerifier};
pub use records::{
    AccountIdentity, PendingUpgrade, SessionKeyRecord, SignatureMode, SpendingPolicy,
};
