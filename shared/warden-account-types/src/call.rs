use alloy_primitives::{keccak256, Address, U256};

/// Canonical identifier of a callable entrypoint on a target contract.
pub type Selector = [u8; 4];

/// Derive the selector for an entrypoint name.
///
/// Selectors are the first four bytes of `keccak256(name)`. Names are the bare
/// entrypoint identifiers (`"transfer"`, `"register_session_key"`), not full
/// typed signatures.
pub fn entrypoint_selector(name: &str) -> Selector {
    let digest = keccak256(name.as_bytes());
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&digest[0..4]);
    sel
}

/// One outbound invocation inside a transaction batch.
///
/// Calldata is an ordered word sequence; the core only partially decodes it
/// (amount extraction on policy-bound tokens) and otherwise treats it as
/// opaque. Amounts ride as `(low, high)` 128-bit word pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub target: Address,
    pub selector: Selector,
    pub calldata: Vec<U256>,
}

impl Call {
    pub fn new(target: Address, selector: Selector, calldata: Vec<U256>) -> Self {
        Self {
            target,
            selector,
            calldata,
        }
    }
}

/// Per-call result of a dispatched batch.
///
/// A failed dispatch is reported in place (empty return data) rather than
/// aborting the batch; see the execution coordinator for the fail-closed
/// rationale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallOutcome {
    pub success: bool,
    pub return_data: Vec<U256>,
}

impl CallOutcome {
    pub fn succeeded(return_data: Vec<U256>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            return_data: Vec::new(),
        }
    }
}
