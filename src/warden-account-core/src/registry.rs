//! Session-key registry.
//!
//! Owns the lifecycle of delegated credentials: registration, revocation and
//! call-budget consumption. Owner-only enforcement for the mutating
//! entrypoints lives on the account facade; this module assumes an authorised
//! caller and guards the record invariants.

use alloy_primitives::B256;
use tracing::debug;
use warden_account_types::{Selector, SessionKeyRecord};

use crate::errors::AccountError;
use crate::store::AccountStore;

/// Register a session key or overwrite an existing record.
///
/// Overwriting clears the previously stored entrypoint list and resets the
/// consumed call budget to zero.
pub fn add_or_update(
    store: &mut AccountStore,
    key: B256,
    valid_until: u64,
    max_calls: u32,
    allowed_entrypoints: Vec<Selector>,
) -> Result<(), AccountError> {
    if key == B256::ZERO || valid_until == 0 || max_calls == 0 {
        return Err(AccountError::InvalidSessionParameters);
    }
    let record = SessionKeyRecord {
        valid_until,
        max_calls,
        calls_used: 0,
        allowed_entrypoints: allowed_entrypoints.into_iter().collect(),
    };
    debug!(key = %key, valid_until, max_calls, "session key registered");
    store.insert_session(key, record);
    Ok(())
}

/// Revoke a session key. The key must currently exist.
pub fn revoke(store: &mut AccountStore, key: B256) -> Result<(), AccountError> {
    store
        .remove_session(key)
        .ok_or(AccountError::SessionUnknown(key))?;
    debug!(key = %key, "session key revoked");
    Ok(())
}

/// Emergency revocation of every session key on the account.
pub fn revoke_all(store: &mut AccountStore) {
    let dropped = store.session_count();
    store.clear_sessions();
    debug!(dropped, "all session keys revoked");
}

/// Consume one unit of the session's call budget.
///
/// Called by the execution coordinator exactly once per validated
/// session-authorized transaction, never during read-only validation.
pub fn consume(store: &mut AccountStore, key: B256) -> Result<(), AccountError> {
    let record = store
        .session_mut(key)
        .ok_or(AccountError::SessionUnknown(key))?;
    if record.budget_exhausted() {
        return Err(AccountError::SessionBudgetExhausted {
            used: record.calls_used,
            max: record.max_calls,
        });
    }
    record.calls_used += 1;
    Ok(())
}

/// Read-only lookup.
pub fn get(store: &AccountStore, key: B256) -> Option<&SessionKeyRecord> {
    store.session(key)
}
