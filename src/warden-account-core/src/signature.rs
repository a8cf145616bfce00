//! Transaction signature classification.
//!
//! The signature is an ordered word array; its length selects the authority
//! being claimed:
//! - length 0: self-call re-entry marker, valid only while the coordinator's
//!   executing flag is set,
//! - length 2: `[r, s]` owner signature over the transaction hash,
//! - length 4: `[session_key, r, s, valid_until]` session token,
//! - anything else is rejected.
//!
//! Classification is read-only: it never consumes call budget and never
//! debits spending, so authorization stays idempotent under simulation.

use alloy_primitives::{Address, B256, U256};
use warden_account_types::{Call, FieldHasher, SignatureMode, SignatureVerifier};

use crate::digest::{domain_session_digest, legacy_session_digest, word_to_key};
use crate::errors::AccountError;
use crate::guard;
use crate::store::AccountStore;

/// Authority granted to a validated transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authorization {
    Owner,
    Session(B256),
}

/// Per-transaction environment, captured once from the ledger.
#[derive(Clone, Copy, Debug)]
pub struct ValidationContext {
    pub account: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub now: u64,
    /// Set while the coordinator is dispatching a batch; admits the empty
    /// re-entry signature.
    pub executing: bool,
}

/// Classify a transaction as Owner / Session / rejected.
pub fn validate_signature<V: SignatureVerifier, H: FieldHasher>(
    store: &AccountStore,
    ctx: &ValidationContext,
    tx_hash: B256,
    signature: &[U256],
    calls: &[Call],
    verifier: &V,
    hasher: &H,
) -> Result<Authorization, AccountError> {
    match signature {
        [] => {
            if ctx.executing {
                Ok(Authorization::Owner)
            } else {
                Err(AccountError::Unauthorized)
            }
        }
        [r, s] => {
            if verifier.verify(tx_hash, store.identity.owner_key, *r, *s) {
                Ok(Authorization::Owner)
            } else {
                Err(AccountError::SignatureVerificationFailed)
            }
        }
        [session_word, r, s, valid_until_word] => {
            let session_key = word_to_key(*session_word);
            let valid_until =
                u64::try_from(*valid_until_word).map_err(|_| AccountError::MalformedSignature)?;
            if ctx.now > valid_until {
                return Err(AccountError::SessionExpired {
                    valid_until,
                    now: ctx.now,
                });
            }
            guard::authorize_batch(store, ctx.account, session_key, ctx.now, calls)?;

            let digest = match store.identity.mode {
                SignatureMode::V1Legacy => {
                    legacy_session_digest(hasher, tx_hash, session_key, valid_until)
                }
                SignatureMode::V2Domain => domain_session_digest(
                    hasher,
                    ctx.chain_id,
                    ctx.account,
                    ctx.nonce,
                    session_key,
                    valid_until,
                    calls,
                ),
            };
            if verifier.verify(digest, session_key, *r, *s) {
                Ok(Authorization::Session(session_key))
            } else {
                Err(AccountError::SignatureVerificationFailed)
            }
        }
        other => Err(AccountError::InvalidSignatureLength(other.len())),
    }
}
