//! Timelocked code-upgrade state machine.
//!
//! Idle -> Scheduled -> {Executed (terminal for that upgrade), Cancelled ->
//! Idle}. At most one upgrade is pending at a time, and the delay configured
//! at scheduling time cannot be changed under it.

use alloy_primitives::B256;
use tracing::info;
use warden_account_types::PendingUpgrade;

use crate::errors::AccountError;
use crate::store::AccountStore;

/// Allowed range for the configured upgrade delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayBounds {
    pub min: u64,
    pub max: u64,
}

impl DelayBounds {
    /// Profile for a high-value owner account: 5 minutes to 30 days.
    pub fn standard() -> Self {
        Self {
            min: 300,
            max: 30 * 86_400,
        }
    }

    /// Lower-friction profile for a session-driven account: 1 minute minimum.
    pub fn low_friction() -> Self {
        Self {
            min: 60,
            max: 30 * 86_400,
        }
    }
}

/// Schedule an upgrade to `new_code` with the currently configured delay.
pub fn schedule(store: &mut AccountStore, new_code: B256, now: u64) -> Result<(), AccountError> {
    if store.pending_upgrade.is_some() {
        return Err(AccountError::UpgradeAlreadyPending);
    }
    if new_code == B256::ZERO {
        return Err(AccountError::InvalidCodeReference);
    }
    let delay = store.upgrade_delay;
    store.pending_upgrade = Some(PendingUpgrade {
        new_code,
        scheduled_at: now,
        delay,
    });
    info!(new_code = %new_code, ready_at = now.saturating_add(delay), "upgrade scheduled");
    Ok(())
}

/// Execute the pending upgrade once the timelock has expired.
///
/// Swaps the code reference atomically and clears the pending state; returns
/// the now-active code reference.
pub fn execute(store: &mut AccountStore, now: u64) -> Result<B256, AccountError> {
    let pending = store
        .pending_upgrade
        .as_ref()
        .ok_or(AccountError::NoPendingUpgrade)?;
    let ready_at = pending.ready_at();
    if now < ready_at {
        return Err(AccountError::TimelockNotExpired { ready_at, now });
    }
    let new_code = pending.new_code;
    store.code = new_code;
    store.pending_upgrade = None;
    info!(new_code = %new_code, "upgrade executed");
    Ok(new_code)
}

/// Cancel the pending upgrade, returning the machine to idle.
pub fn cancel(store: &mut AccountStore) -> Result<(), AccountError> {
    if store.pending_upgrade.take().is_none() {
        return Err(AccountError::NoPendingUpgrade);
    }
    info!("upgrade cancelled");
    Ok(())
}

/// Reconfigure the delay applied to future schedules.
///
/// Rejected while an upgrade is pending, so a scheduled upgrade can never be
/// fast-tracked after the fact.
pub fn set_delay(
    store: &mut AccountStore,
    new_delay: u64,
    bounds: DelayBounds,
) -> Result<(), AccountError> {
    if store.pending_upgrade.is_some() {
        return Err(AccountError::UpgradeAlreadyPending);
    }
    if new_delay < bounds.min || new_delay > bounds.max {
        return Err(AccountError::DelayOutOfRange {
            requested: new_delay,
            min: bounds.min,
            max: bounds.max,
        });
    }
    store.upgrade_delay = new_delay;
    Ok(())
}
