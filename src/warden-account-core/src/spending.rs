//! Per-(session key, token) rolling spending limits.
//!
//! Policies are mutated only during execution, never during read-only
//! validation. Debits for a batch are staged first and committed only once
//! every debit passes, so dispatch never begins after a partial debit.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, U256};
use tracing::debug;
use warden_account_types::{Call, SpendingPolicy};

use crate::errors::{AccountError, CapScope};
use crate::selectors::{APPROVE, TRANSFER, TRANSFER_FROM};
use crate::store::AccountStore;

/// Create or replace the policy for `(session_key, token)`.
///
/// Replacing resets the window accounting.
pub fn set_policy(
    store: &mut AccountStore,
    session_key: B256,
    token: Address,
    max_per_call: U256,
    max_per_window: U256,
    window_seconds: u64,
) -> Result<(), AccountError> {
    if window_seconds == 0 || max_per_call.is_zero() || max_per_call > max_per_window {
        return Err(AccountError::InvalidSpendingParameters);
    }
    store.insert_policy(
        session_key,
        token,
        SpendingPolicy {
            max_per_call,
            max_per_window,
            window_seconds,
            spent_in_window: U256::ZERO,
            window_start: 0,
        },
    );
    debug!(session = %session_key, token = %token, "spending policy set");
    Ok(())
}

/// Remove the policy for `(session_key, token)`. The policy must exist.
pub fn remove_policy(
    store: &mut AccountStore,
    session_key: B256,
    token: Address,
) -> Result<(), AccountError> {
    store
        .remove_policy(session_key, token)
        .map(|_| ())
        .ok_or(AccountError::PolicyUnknown)
}

/// Extract the moved amount from a call targeting a policy-bound token.
///
/// Amount words are `(low, high)` 128-bit halves: transfer/approve-shaped
/// calldata carries them at word offset 1, transfer_from-shaped calldata at
/// offset 2. Any other selector on a policy token is denied outright.
pub fn extract_amount(call: &Call) -> Result<U256, AccountError> {
    let offset = if call.selector == *TRANSFER || call.selector == *APPROVE {
        1
    } else if call.selector == *TRANSFER_FROM {
        2
    } else {
        return Err(AccountError::UnknownSpendingSelector(call.selector));
    };
    if call.calldata.len() < offset + 2 {
        return Err(AccountError::MalformedCalldata);
    }
    let low = call.calldata[offset];
    let high = call.calldata[offset + 1];
    let half_max = U256::from(u128::MAX);
    if low > half_max || high > half_max {
        return Err(AccountError::MalformedCalldata);
    }
    Ok(low | (high << 128))
}

/// Roll the window if elapsed, then debit `amount` against the caps.
pub fn check_and_debit(
    policy: &mut SpendingPolicy,
    amount: U256,
    now: u64,
) -> Result<(), AccountError> {
    if policy.window_elapsed(now) {
        policy.window_start = now;
        policy.spent_in_window = U256::ZERO;
    }
    if amount > policy.max_per_call {
        return Err(AccountError::SpendingCapExceeded {
            scope: CapScope::PerCall,
        });
    }
    let spent = policy.spent_in_window.saturating_add(amount);
    if spent > policy.max_per_window {
        return Err(AccountError::SpendingCapExceeded {
            scope: CapScope::PerWindow,
        });
    }
    policy.spent_in_window = spent;
    Ok(())
}

/// Stage the debits for a whole batch without touching the store.
///
/// Returns the updated policy state per token, to be committed with
/// [`commit_debits`] once the batch as a whole is admitted.
pub fn stage_debits(
    store: &AccountStore,
    session_key: B256,
    calls: &[Call],
    now: u64,
) -> Result<BTreeMap<Address, SpendingPolicy>, AccountError> {
    let mut staged: BTreeMap<Address, SpendingPolicy> = BTreeMap::new();
    for call in calls {
        let current = match staged.get(&call.target) {
            Some(policy) => Some(policy.clone()),
            None => store.policy(session_key, call.target).cloned(),
        };
        // Calls to targets without a bound policy carry no spending meaning.
        let Some(mut policy) = current else { continue };
        let amount = extract_amount(call)?;
        check_and_debit(&mut policy, amount, now)?;
        staged.insert(call.target, policy);
    }
    Ok(staged)
}

/// Write staged debits back into the repository.
pub fn commit_debits(
    store: &mut AccountStore,
    session_key: B256,
    staged: BTreeMap<Address, SpendingPolicy>,
) {
    for (token, policy) in staged {
        debug!(session = %session_key, token = %token, spent = %policy.spent_in_window,
            "spending window debited");
        store.insert_policy(session_key, token, policy);
    }
}
