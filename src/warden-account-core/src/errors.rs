use alloy_primitives::B256;
use thiserror::Error;
use warden_account_types::Selector;

/// Which spending cap a debit ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapScope {
    PerCall,
    PerWindow,
}

/// Rejection reasons of the authorization core.
///
/// Validation-time errors reject the whole transaction, terminally and
/// non-retryably; the caller must resubmit with a corrected signature or
/// scope. Execution-time per-call dispatch failures are not errors at this
/// level, they are reported in place as failed [`CallOutcome`]s.
///
/// [`CallOutcome`]: warden_account_types::CallOutcome
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("caller is not the account itself")]
    InvalidCaller,

    #[error("unsupported signature length {0}")]
    InvalidSignatureLength(usize),

    #[error("signature word out of range")]
    MalformedSignature,

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("unknown session key {0}")]
    SessionUnknown(B256),

    #[error("session expired at {valid_until}, now {now}")]
    SessionExpired { valid_until: u64, now: u64 },

    #[error("session call budget exhausted ({used}/{max})")]
    SessionBudgetExhausted { used: u32, max: u32 },

    #[error("selector 0x{} is an administrative entrypoint", hex::encode(.0))]
    SelectorBlocked(Selector),

    #[error("selector 0x{} is not whitelisted for this session", hex::encode(.0))]
    SelectorNotWhitelisted(Selector),

    #[error("session keys may not call the account itself")]
    SelfCallForbidden,

    #[error("open allowances are forbidden on policy-bound tokens")]
    OpenAllowanceForbidden,

    #[error("spending cap exceeded ({scope:?})")]
    SpendingCapExceeded { scope: CapScope },

    #[error("selector 0x{} has no spending interpretation on a policy token", hex::encode(.0))]
    UnknownSpendingSelector(Selector),

    #[error("calldata too short or amount words out of range")]
    MalformedCalldata,

    #[error("an upgrade is already pending")]
    UpgradeAlreadyPending,

    #[error("no upgrade is pending")]
    NoPendingUpgrade,

    #[error("timelock not expired, ready at {ready_at}, now {now}")]
    TimelockNotExpired { ready_at: u64, now: u64 },

    #[error("upgrade delay {requested} outside [{min}, {max}]")]
    DelayOutOfRange { requested: u64, min: u64, max: u64 },

    #[error("invalid session key parameters")]
    InvalidSessionParameters,

    #[error("invalid spending policy parameters")]
    InvalidSpendingParameters,

    #[error("no spending policy for that session and token")]
    PolicyUnknown,

    #[error("null code reference")]
    InvalidCodeReference,

    #[error("signature-hash mode cannot be downgraded")]
    SignatureModeDowngrade,

    #[error("owner key must be non-zero")]
    InvalidOwnerKey,

    #[error("unauthorized")]
    Unauthorized,
}
