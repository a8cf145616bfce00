//! Call-batch authorization for session keys.
//!
//! Check order is part of the security contract:
//! 1. session liveness (present, unexpired, budget left),
//! 2. admin-selector blocklist, enforced unconditionally,
//! 3. self-call guard, enforced unconditionally,
//! 4. open-allowance block on policy-bound tokens,
//! 5. whitelist (deny-by-default once non-empty).
//!
//! Steps 2-4 run even when a whitelist would permit the selector; explicitly
//! whitelisting an admin selector does not make it callable.

use alloy_primitives::{Address, B256};
use warden_account_types::Call;

use crate::errors::AccountError;
use crate::selectors::{is_admin_selector, APPROVE};
use crate::store::AccountStore;

/// Decide whether `session_key` may run this batch. Read-only.
pub fn authorize_batch(
    store: &AccountStore,
    account: Address,
    session_key: B256,
    now: u64,
    calls: &[Call],
) -> Result<(), AccountError> {
    let record = store
        .session(session_key)
        .ok_or(AccountError::SessionUnknown(session_key))?;
    if record.is_expired(now) {
        return Err(AccountError::SessionExpired {
            valid_until: record.valid_until,
            now,
        });
    }
    if record.budget_exhausted() {
        return Err(AccountError::SessionBudgetExhausted {
            used: record.calls_used,
            max: record.max_calls,
        });
    }

    for call in calls {
        if is_admin_selector(&call.selector) {
            return Err(AccountError::SelectorBlocked(call.selector));
        }
        if call.target == account {
            return Err(AccountError::SelfCallForbidden);
        }
        // An open allowance on a policy-bound token would bypass future
        // window accounting; blocked here in addition to the debit-time
        // deny-unknown.
        if call.selector == *APPROVE && store.policy(session_key, call.target).is_some() {
            return Err(AccountError::OpenAllowanceForbidden);
        }
        if !record.allowed_entrypoints.is_empty()
            && !record.allowed_entrypoints.contains(&call.selector)
        {
            return Err(AccountError::SelectorNotWhitelisted(call.selector));
        }
    }
    Ok(())
}

/// Convenience predicate mirroring [`authorize_batch`].
pub fn allows(
    store: &AccountStore,
    account: Address,
    session_key: B256,
    now: u64,
    calls: &[Call],
) -> bool {
    authorize_batch(store, account, session_key, now, calls).is_ok()
}
