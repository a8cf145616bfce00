//! Word-array call and signature encoding.
//!
//! Amounts are encoded as `(low, high)` 128-bit word pairs, the layout the
//! core's spending policy decodes: transfer/approve carry them at word offset
//! 1, transfer_from at offset 2.

use alloy_primitives::{Address, B256, U256};
use warden_account_types::{entrypoint_selector, Call};

fn address_word(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

fn key_word(key: B256) -> U256 {
    U256::from_be_bytes(key.0)
}

/// Split an amount into its `(low, high)` 128-bit halves.
pub fn split_amount(amount: U256) -> (U256, U256) {
    let mask = (U256::from(1) << 128) - U256::from(1);
    (amount & mask, amount >> 128)
}

/// `transfer(recipient, amount_low, amount_high)` on `token`.
pub fn transfer_call(token: Address, recipient: Address, amount: U256) -> Call {
    let (low, high) = split_amount(amount);
    Call::new(
        token,
        entrypoint_selector("transfer"),
        vec![address_word(recipient), low, high],
    )
}

/// `approve(spender, amount_low, amount_high)` on `token`.
pub fn approve_call(token: Address, spender: Address, amount: U256) -> Call {
    let (low, high) = split_amount(amount);
    Call::new(
        token,
        entrypoint_selector("approve"),
        vec![address_word(spender), low, high],
    )
}

/// `transfer_from(from, to, amount_low, amount_high)` on `token`.
pub fn transfer_from_call(token: Address, from: Address, to: Address, amount: U256) -> Call {
    let (low, high) = split_amount(amount);
    Call::new(
        token,
        entrypoint_selector("transfer_from"),
        vec![address_word(from), address_word(to), low, high],
    )
}

/// Owner signature array: `[r, s]`.
pub fn owner_signature(r: U256, s: U256) -> Vec<U256> {
    vec![r, s]
}

/// Session signature array: `[session_key, r, s, valid_until]`.
pub fn session_signature(session_key: B256, r: U256, s: U256, valid_until: u64) -> Vec<U256> {
    vec![key_word(session_key), r, s, U256::from(valid_until)]
}
