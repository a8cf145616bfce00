//! Selector constants and the administrative blocklist.
//!
//! The blocklist is a fixed enumeration of the account's own administrative
//! entrypoints. It is built once at startup and enforced unconditionally for
//! session traffic, even when a whitelist would otherwise permit the selector.
//! Any new administrative entrypoint must be appended here, or it becomes
//! callable by session keys.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use warden_account_types::{entrypoint_selector, Selector};

/// Token entrypoints with a spending interpretation.
pub static TRANSFER: LazyLock<Selector> = LazyLock::new(|| entrypoint_selector("transfer"));
pub static APPROVE: LazyLock<Selector> = LazyLock::new(|| entrypoint_selector("approve"));
pub static TRANSFER_FROM: LazyLock<Selector> =
    LazyLock::new(|| entrypoint_selector("transfer_from"));

/// Administrative entrypoints of the account itself.
const ADMIN_ENTRYPOINTS: [&str; 14] = [
    // Upgrade timelock.
    "schedule_upgrade",
    "execute_upgrade",
    "cancel_upgrade",
    "set_upgrade_delay",
    // Session key registry.
    "register_session_key",
    "revoke_session_key",
    "revoke_all_session_keys",
    // Spending policies.
    "set_spending_policy",
    "remove_spending_policy",
    // Identity.
    "rotate_owner_key",
    "set_signature_mode",
    "set_agent_identity",
    // Re-entrant transaction surface.
    "validate",
    "execute",
];

/// Selectors a session key may never invoke, whitelisted or not.
pub static ADMIN_SELECTORS: LazyLock<BTreeSet<Selector>> = LazyLock::new(|| {
    ADMIN_ENTRYPOINTS
        .iter()
        .map(|name| entrypoint_selector(name))
        .collect()
});

/// True when the selector belongs to the administrative surface.
pub fn is_admin_selector(selector: &Selector) -> bool {
    ADMIN_SELECTORS.contains(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocklist_covers_every_admin_entrypoint() {
        assert_eq!(ADMIN_SELECTORS.len(), ADMIN_ENTRYPOINTS.len());
        for name in ADMIN_ENTRYPOINTS {
            assert!(is_admin_selector(&entrypoint_selector(name)), "{name}");
        }
    }

    #[test]
    fn token_selectors_are_not_admin() {
        assert!(!is_admin_selector(&TRANSFER));
        assert!(!is_admin_selector(&APPROVE));
        assert!(!is_admin_selector(&TRANSFER_FROM));
    }

    #[test]
    fn selector_derivation_is_stable() {
        assert_eq!(entrypoint_selector("transfer"), *TRANSFER);
        assert_ne!(*TRANSFER, *TRANSFER_FROM);
        assert_ne!(*TRANSFER, *APPROVE);
    }
}
