//! Transaction-authorization core for the Warden smart account.
//!
//! The account decides whether a requested batch of outbound calls is
//! permitted, under either full owner authority or a scoped, time-boxed
//! session key, and enforces per-token rolling spending caps on session
//! traffic. It also governs the timelocked code-upgrade process.
//!
//! Design notes:
//! - Storage is an explicit [`store::AccountStore`] repository passed to every
//!   component; there is no hidden process-global state.
//! - Authorization is pure functions over plain [`Call`] data evaluated
//!   against injected collaborators ([`Ledger`], [`SignatureVerifier`],
//!   [`FieldHasher`]).
//! - The ledger serializes transactions per account, so the core is
//!   single-writer over one account's state. A concurrent host must guard each
//!   account's full state behind one lock; never finer.
//!
//! [`Call`]: warden_account_types::Call
//! [`Ledger`]: warden_account_types::Ledger
//! [`SignatureVerifier`]: warden_account_types::SignatureVerifier
//! [`FieldHasher`]: warden_account_types::FieldHasher

pub mod account;
pub mod digest;
pub mod errors;
pub mod executor;
pub mod guard;
pub mod registry;
pub mod selectors;
pub mod signature;
pub mod spending;
pub mod store;
pub mod timelock;

#[cfg(test)]
pub(crate) mod testing;

pub use account::SmartAccount;
pub use digest::KeccakFieldHasher;
pub use errors::{AccountError, CapScope};
pub use signature::Authorization;
pub use store::AccountStore;
pub use timelock::DelayBounds;
