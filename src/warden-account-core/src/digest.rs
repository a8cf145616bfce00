//! Session message digests.
//!
//! Two generations coexist:
//! - v1 "legacy": a plain concatenation hash over `{tx hash, session key,
//!   valid_until}`.
//! - v2 "domain-separated": a typed digest binding `{chain id, account}` into
//!   a domain hash and `{nonce, valid_until, calls hash, session key}` into
//!   the message, so a signature cannot be replayed across accounts, chains
//!   or differently shaped batches.
//!
//! The actual hash primitive stays behind the [`FieldHasher`] seam; the
//! default [`KeccakFieldHasher`] concatenates the 32-byte big-endian words.

use std::sync::LazyLock;

use alloy_primitives::{keccak256, Address, B256, U256};
use warden_account_types::{Call, FieldHasher};

/// Domain type tag, hashed once at startup.
static DOMAIN_TAG: LazyLock<U256> = LazyLock::new(|| {
    word(keccak256(
        b"WardenDomain(uint64 chainId,address account,uint16 version)",
    ))
});

/// Session message type tag, hashed once at startup.
static MESSAGE_TAG: LazyLock<U256> = LazyLock::new(|| {
    word(keccak256(
        b"WardenSessionToken(uint256 nonce,uint64 validUntil,bytes32 callsHash,bytes32 sessionKey)",
    ))
});

const DOMAIN_VERSION: u64 = 2;

/// Default field hasher: keccak over the concatenated big-endian words.
pub struct KeccakFieldHasher;

impl FieldHasher for KeccakFieldHasher {
    fn hash_fields(&self, fields: &[U256]) -> B256 {
        let mut buf = Vec::with_capacity(32 * fields.len());
        for field in fields {
            buf.extend_from_slice(&field.to_be_bytes::<32>());
        }
        keccak256(buf)
    }
}

/// Reinterpret a 32-byte digest as a field word.
pub fn word(value: B256) -> U256 {
    U256::from_be_bytes(value.0)
}

/// Reinterpret a field word as a 32-byte key identifier.
pub fn word_to_key(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// v1 digest: plain ordered concatenation, no domain separation.
pub fn legacy_session_digest<H: FieldHasher>(
    hasher: &H,
    tx_hash: B256,
    session_key: B256,
    valid_until: u64,
) -> B256 {
    hasher.hash_fields(&[word(tx_hash), word(session_key), U256::from(valid_until)])
}

/// Hash the ordered call fields of a batch: per call `{target, selector,
/// calldata length, calldata words}`.
pub fn calls_digest<H: FieldHasher>(hasher: &H, calls: &[Call]) -> B256 {
    let mut fields = Vec::new();
    for call in calls {
        fields.push(U256::from_be_slice(call.target.as_slice()));
        fields.push(U256::from_be_slice(&call.selector));
        fields.push(U256::from(call.calldata.len() as u64));
        fields.extend_from_slice(&call.calldata);
    }
    hasher.hash_fields(&fields)
}

/// v2 digest: domain-separated over account, chain, nonce and call shape.
pub fn domain_session_digest<H: FieldHasher>(
    hasher: &H,
    chain_id: u64,
    account: Address,
    nonce: u64,
    session_key: B256,
    valid_until: u64,
    calls: &[Call],
) -> B256 {
    let domain = hasher.hash_fields(&[
        *DOMAIN_TAG,
        U256::from(chain_id),
        U256::from_be_slice(account.as_slice()),
        U256::from(DOMAIN_VERSION),
    ]);
    let calls_hash = calls_digest(hasher, calls);
    hasher.hash_fields(&[
        *MESSAGE_TAG,
        word(domain),
        U256::from(nonce),
        U256::from(valid_until),
        word(calls_hash),
        word(session_key),
    ])
}
