//! Execution coordination: validate -> authorize -> debit -> dispatch.
//!
//! Ordering is check-effects-interactions: the session budget is consumed and
//! all spending debits are committed before the first call is dispatched.
//! Dispatch itself is fail-closed: a call that fails is reported in place
//! with an empty result, its debit stays applied and the remaining batch
//! still runs. Failing a call on purpose therefore cannot dodge spend
//! accounting.

use alloy_primitives::B256;
use tracing::warn;
use warden_account_types::{Call, CallOutcome, Ledger};

use crate::errors::AccountError;
use crate::registry;
use crate::spending;
use crate::store::AccountStore;

/// Run a session-authorized batch: stage every debit, consume the budget
/// once, commit, then dispatch. A rejection anywhere leaves the store as it
/// was.
pub fn run_session<L: Ledger>(
    store: &mut AccountStore,
    ledger: &mut L,
    session_key: B256,
    now: u64,
    calls: &[Call],
) -> Result<Vec<CallOutcome>, AccountError> {
    let staged = spending::stage_debits(store, session_key, calls, now)?;
    registry::consume(store, session_key)?;
    spending::commit_debits(store, session_key, staged);
    Ok(dispatch_all(ledger, calls))
}

/// Dispatch every call, tolerating individual failures.
pub fn dispatch_all<L: Ledger>(ledger: &mut L, calls: &[Call]) -> Vec<CallOutcome> {
    calls
        .iter()
        .map(|call| match ledger.dispatch(call) {
            Ok(return_data) => CallOutcome::succeeded(return_data),
            Err(err) => {
                warn!(target_contract = %call.target, ?err, "call dispatch failed");
                CallOutcome::failed()
            }
        })
        .collect()
}
