use std::collections::BTreeSet;

use alloy_primitives::{B256, U256};

use crate::call::Selector;

/// Signature-hash mode of an account.
///
/// `V1Legacy` hashes the plain field concatenation; `V2Domain` uses the
/// domain-separated session digest. The mode may be advanced v1 -> v2 but
/// never reverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignatureMode {
    V1Legacy,
    V2Domain,
}

/// Owner identity of an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountIdentity {
    pub owner_key: B256,
    pub mode: SignatureMode,
    /// Opaque agent identity tag; mutable only through the admin surface.
    pub agent_id: U256,
}

/// A delegated session credential.
///
/// Invariants: `calls_used <= max_calls`; a record with `valid_until == 0` is
/// treated as absent. An empty `allowed_entrypoints` set means allow-all minus
/// the admin blocklist and the self-call guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionKeyRecord {
    pub valid_until: u64,
    pub max_calls: u32,
    pub calls_used: u32,
    pub allowed_entrypoints: BTreeSet<Selector>,
}

impl SessionKeyRecord {
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.valid_until
    }

    pub fn budget_exhausted(&self) -> bool {
        self.calls_used >= self.max_calls
    }
}

/// Rolling spending limit for one (session key, token) pair.
///
/// `spent_in_window` never exceeds `max_per_window` within an active window;
/// the window resets only once `now` passes `window_start + window_seconds`,
/// never retroactively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendingPolicy {
    pub max_per_call: U256,
    pub max_per_window: U256,
    pub window_seconds: u64,
    pub spent_in_window: U256,
    pub window_start: u64,
}

impl SpendingPolicy {
    /// True when the current window is over (or was never started) and the
    /// counters must be reset before the next debit.
    pub fn window_elapsed(&self, now: u64) -> bool {
        self.window_start == 0 || now > self.window_start.saturating_add(self.window_seconds)
    }
}

/// A scheduled, not yet executed, code upgrade. At most one exists at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpgrade {
    pub new_code: B256,
    pub scheduled_at: u64,
    /// Delay captured at scheduling time; `set_delay` is blocked while a
    /// pending upgrade exists, so this cannot change under the schedule.
    pub delay: u64,
}

impl PendingUpgrade {
    pub fn ready_at(&self) -> u64 {
        self.scheduled_at.saturating_add(self.delay)
    }
}
