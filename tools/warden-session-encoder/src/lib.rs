//! Off-core helpers for building Warden account transactions.
//!
//! Mirrors what a wallet frontend does: encode token calls as word-array
//! calldata, assemble owner/session signature arrays, and sign digests with a
//! real ECDSA keypair. Lives outside the core so tooling and tests share one
//! implementation.

pub mod encoder;
pub mod keyring;


pub use encoder::{
    approve_call, owner_signature, session_signature, split_amount, transfer_call,
    transfer_from_call,
};
pub use keyring::{Keyring, KeyringError};
