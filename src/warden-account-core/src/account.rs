//! Account facade: public transaction surface plus the owner-only admin
//! surface.
//!
//! Administrative entrypoints require the caller to be the account itself:
//! the only way to reach them is an owner-authorized transaction that the
//! coordinator dispatches back into the account, which is exactly what the
//! session-key blocklist and self-call guard prevent delegated credentials
//! from doing.

use alloy_primitives::{Address, B256, U256};
use tracing::{debug, info};
use warden_account_types::{
    Call, CallOutcome, FieldHasher, Ledger, Selector, SignatureMode, SignatureVerifier,
};

use crate::errors::AccountError;
use crate::executor;
use crate::registry;
use crate::signature::{validate_signature, Authorization, ValidationContext};
use crate::spending;
use crate::store::AccountStore;
use crate::timelock::{self, DelayBounds};

pub struct SmartAccount<L, V, H> {
    address: Address,
    ledger: L,
    verifier: V,
    hasher: H,
    store: AccountStore,
    delay_bounds: DelayBounds,
    /// Re-entry marker: set while a validated batch is being dispatched.
    executing: bool,
}

impl<L: Ledger, V: SignatureVerifier, H: FieldHasher> SmartAccount<L, V, H> {
    pub fn new(
        address: Address,
        owner_key: B256,
        code: B256,
        delay_bounds: DelayBounds,
        ledger: L,
        verifier: V,
        hasher: H,
    ) -> Result<Self, AccountError> {
        if owner_key == B256::ZERO {
            return Err(AccountError::InvalidOwnerKey);
        }
        if code == B256::ZERO {
            return Err(AccountError::InvalidCodeReference);
        }
        Ok(Self {
            address,
            ledger,
            verifier,
            hasher,
            store: AccountStore::new(owner_key, code, delay_bounds.min),
            delay_bounds,
            executing: false,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    fn context(&self) -> ValidationContext {
        ValidationContext {
            account: self.address,
            chain_id: self.ledger.chain_id(),
            nonce: self.ledger.account_nonce(),
            now: self.ledger.timestamp(),
            executing: self.executing,
        }
    }

    fn assert_self_call(&self) -> Result<(), AccountError> {
        if self.ledger.caller() != self.address {
            return Err(AccountError::InvalidCaller);
        }
        Ok(())
    }

    // ----- public transaction surface -----

    /// Classify the in-flight transaction. Read-only: consumes no call budget
    /// and debits no spending, so validation is idempotent under simulation.
    pub fn validate(
        &self,
        signature: &[U256],
        calls: &[Call],
    ) -> Result<Authorization, AccountError> {
        let ctx = self.context();
        validate_signature(
            &self.store,
            &ctx,
            self.ledger.transaction_hash(),
            signature,
            calls,
            &self.verifier,
            &self.hasher,
        )
    }

    /// Pure signature check over an arbitrary hash. Session signatures are
    /// evaluated against the active-mode digest with an empty call list, as
    /// no batch exists on this surface.
    pub fn is_valid_signature(
        &self,
        hash: B256,
        signature: &[U256],
    ) -> Result<Authorization, AccountError> {
        let ctx = self.context();
        validate_signature(
            &self.store,
            &ctx,
            hash,
            signature,
            &[],
            &self.verifier,
            &self.hasher,
        )
    }

    /// Validate, then run the batch with fail-closed dispatch semantics.
    pub fn execute(
        &mut self,
        signature: &[U256],
        calls: &[Call],
    ) -> Result<Vec<CallOutcome>, AccountError> {
        // One clock reading covers validation and execution.
        let ctx = self.context();
        let authorization = validate_signature(
            &self.store,
            &ctx,
            self.ledger.transaction_hash(),
            signature,
            calls,
            &self.verifier,
            &self.hasher,
        )?;
        debug!(account = %self.address, ?authorization, calls = calls.len(), "batch authorized");

        self.executing = true;
        let result = match authorization {
            Authorization::Session(session_key) => executor::run_session(
                &mut self.store,
                &mut self.ledger,
                session_key,
                ctx.now,
                calls,
            ),
            Authorization::Owner => Ok(executor::dispatch_all(&mut self.ledger, calls)),
        };
        // Cleared on success and on partial failure alike.
        self.executing = false;
        result
    }

    // ----- owner-only admin surface -----

    pub fn register_session_key(
        &mut self,
        key: B256,
        valid_until: u64,
        max_calls: u32,
        allowed_entrypoints: Vec<Selector>,
    ) -> Result<(), AccountError> {
        self.assert_self_call()?;
        registry::add_or_update(
            &mut self.store,
            key,
            valid_until,
            max_calls,
            allowed_entrypoints,
        )
    }

    pub fn revoke_session_key(&mut self, key: B256) -> Result<(), AccountError> {
        self.assert_self_call()?;
        registry::revoke(&mut self.store, key)
    }

    pub fn revoke_all_session_keys(&mut self) -> Result<(), AccountError> {
        self.assert_self_call()?;
        registry::revoke_all(&mut self.store);
        Ok(())
    }

    pub fn set_spending_policy(
        &mut self,
        session_key: B256,
        token: Address,
        max_per_call: U256,
        max_per_window: U256,
        window_seconds: u64,
    ) -> Result<(), AccountError> {
        self.assert_self_call()?;
        spending::set_policy(
            &mut self.store,
            session_key,
            token,
            max_per_call,
            max_per_window,
            window_seconds,
        )
    }

    pub fn remove_spending_policy(
        &mut self,
        session_key: B256,
        token: Address,
    ) -> Result<(), AccountError> {
        self.assert_self_call()?;
        spending::remove_policy(&mut self.store, session_key, token)
    }

    pub fn schedule_upgrade(&mut self, new_code: B256) -> Result<(), AccountError> {
        self.assert_self_call()?;
        timelock::schedule(&mut self.store, new_code, self.ledger.timestamp())
    }

    pub fn execute_upgrade(&mut self) -> Result<B256, AccountError> {
        self.assert_self_call()?;
        timelock::execute(&mut self.store, self.ledger.timestamp())
    }

    pub fn cancel_upgrade(&mut self) -> Result<(), AccountError> {
        self.assert_self_call()?;
        timelock::cancel(&mut self.store)
    }

    pub fn set_upgrade_delay(&mut self, new_delay: u64) -> Result<(), AccountError> {
        self.assert_self_call()?;
        timelock::set_delay(&mut self.store, new_delay, self.delay_bounds)
    }

    /// Advance the signature-hash mode. v2 -> v1 is refused; re-setting the
    /// current mode is a no-op.
    pub fn set_signature_mode(&mut self, mode: SignatureMode) -> Result<(), AccountError> {
        self.assert_self_call()?;
        if mode < self.store.identity.mode {
            return Err(AccountError::SignatureModeDowngrade);
        }
        if mode != self.store.identity.mode {
            info!(account = %self.address, ?mode, "signature mode advanced");
            self.store.identity.mode = mode;
        }
        Ok(())
    }

    pub fn rotate_owner_key(&mut self, new_key: B256) -> Result<(), AccountError> {
        self.assert_self_call()?;
        if new_key == B256::ZERO {
            return Err(AccountError::InvalidOwnerKey);
        }
        info!(account = %self.address, "owner key rotated");
        self.store.identity.owner_key = new_key;
        Ok(())
    }

    pub fn set_agent_identity(&mut self, agent_id: U256) -> Result<(), AccountError> {
        self.assert_self_call()?;
        self.store.identity.agent_id = agent_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{domain_session_digest, legacy_session_digest, word, KeccakFieldHasher};
    use crate::testing::{addr, key, MockLedger, StaticVerifier};
    use warden_account_types::entrypoint_selector;

    const NOW: u64 = 1_000;

    fn account_addr() -> Address {
        addr(0x0A)
    }

    fn new_account(caller: Address) -> SmartAccount<MockLedger, StaticVerifier, KeccakFieldHasher> {
        let ledger = MockLedger::new(NOW, caller);
        SmartAccount::new(
            account_addr(),
            key(0xAA),
            key(0xC0),
            DelayBounds::standard(),
            ledger,
            StaticVerifier::default(),
            KeccakFieldHasher,
        )
        .unwrap()
    }

    fn session_sig(session: B256, r: U256, s: U256, valid_until: u64) -> Vec<U256> {
        vec![word(session), r, s, U256::from(valid_until)]
    }

    #[test]
    fn admin_surface_requires_the_account_as_caller() {
        let mut account = new_account(addr(0xEE));
        assert_eq!(
            account.register_session_key(key(1), NOW + 100, 5, vec![]),
            Err(AccountError::InvalidCaller)
        );
        assert_eq!(
            account.schedule_upgrade(key(0xC1)),
            Err(AccountError::InvalidCaller)
        );
        assert_eq!(
            account.rotate_owner_key(key(0xBB)),
            Err(AccountError::InvalidCaller)
        );
    }

    #[test]
    fn signature_mode_is_monotonic() {
        let mut account = new_account(account_addr());
        account.set_signature_mode(SignatureMode::V2Domain).unwrap();
        // Idempotent re-set is fine, downgrade is not.
        account.set_signature_mode(SignatureMode::V2Domain).unwrap();
        assert_eq!(
            account.set_signature_mode(SignatureMode::V1Legacy),
            Err(AccountError::SignatureModeDowngrade)
        );
    }

    #[test]
    fn validation_is_read_only() {
        let mut account = new_account(account_addr());
        account
            .register_session_key(key(1), NOW + 100, 5, vec![])
            .unwrap();
        account
            .set_spending_policy(
                key(1),
                addr(0x70),
                U256::from(100),
                U256::from(250),
                86_400,
            )
            .unwrap();

        let h = KeccakFieldHasher;
        let (r, s) = (U256::from(1), U256::from(2));
        let digest = legacy_session_digest(&h, account.ledger.tx_hash, key(1), NOW + 50);
        account.verifier.accept(digest, key(1), r, s);

        let calls = [Call::new(
            addr(0x70),
            entrypoint_selector("transfer"),
            vec![U256::from(0xBEu64), U256::from(40), U256::ZERO],
        )];
        let sig = session_sig(key(1), r, s, NOW + 50);

        for _ in 0..3 {
            assert_eq!(
                account.validate(&sig, &calls),
                Ok(Authorization::Session(key(1)))
            );
        }
        assert_eq!(account.store().session(key(1)).unwrap().calls_used, 0);
        assert_eq!(
            account.store().policy(key(1), addr(0x70)).unwrap().spent_in_window,
            U256::ZERO
        );
    }

    #[test]
    fn session_execute_consumes_debits_and_dispatches() {
        let mut account = new_account(account_addr());
        account
            .register_session_key(key(1), NOW + 100, 5, vec![])
            .unwrap();
        account
            .set_spending_policy(
                key(1),
                addr(0x70),
                U256::from(100),
                U256::from(250),
                86_400,
            )
            .unwrap();

        let h = KeccakFieldHasher;
        let (r, s) = (U256::from(1), U256::from(2));
        let digest = legacy_session_digest(&h, account.ledger.tx_hash, key(1), NOW + 50);
        account.verifier.accept(digest, key(1), r, s);

        let calls = [Call::new(
            addr(0x70),
            entrypoint_selector("transfer"),
            vec![U256::from(0xBEu64), U256::from(40), U256::ZERO],
        )];
        let outcomes = account
            .execute(&session_sig(key(1), r, s, NOW + 50), &calls)
            .unwrap();

        assert!(outcomes[0].success);
        assert_eq!(account.store().session(key(1)).unwrap().calls_used, 1);
        assert_eq!(
            account.store().policy(key(1), addr(0x70)).unwrap().spent_in_window,
            U256::from(40)
        );
        assert!(!account.executing);
    }

    #[test]
    fn partial_dispatch_failure_clears_executing_and_keeps_debit() {
        let mut account = new_account(account_addr());
        account
            .register_session_key(key(1), NOW + 100, 5, vec![])
            .unwrap();
        account
            .set_spending_policy(
                key(1),
                addr(0x70),
                U256::from(100),
                U256::from(250),
                86_400,
            )
            .unwrap();
        account.ledger.failing_targets.insert(addr(0x70));

        let h = KeccakFieldHasher;
        let (r, s) = (U256::from(1), U256::from(2));
        let digest = legacy_session_digest(&h, account.ledger.tx_hash, key(1), NOW + 50);
        account.verifier.accept(digest, key(1), r, s);

        let calls = [
            Call::new(
                addr(0x70),
                entrypoint_selector("transfer"),
                vec![U256::from(0xBEu64), U256::from(40), U256::ZERO],
            ),
            Call::new(addr(0x71), entrypoint_selector("ping"), vec![]),
        ];
        let outcomes = account
            .execute(&session_sig(key(1), r, s, NOW + 50), &calls)
            .unwrap();

        assert!(!outcomes[0].success);
        assert!(outcomes[1].success);
        assert_eq!(
            account.store().policy(key(1), addr(0x70)).unwrap().spent_in_window,
            U256::from(40)
        );
        assert!(!account.executing);
    }

    #[test]
    fn owner_execute_skips_session_accounting() {
        let mut account = new_account(account_addr());
        let (r, s) = (U256::from(9), U256::from(8));
        account
            .verifier
            .accept(account.ledger.tx_hash, key(0xAA), r, s);

        let calls = [Call::new(addr(0x70), entrypoint_selector("transfer"), vec![])];
        let outcomes = account.execute(&[r, s], &calls).unwrap();
        assert!(outcomes[0].success);
    }

    #[test]
    fn v2_mode_execute_uses_domain_digest() {
        let mut account = new_account(account_addr());
        account.set_signature_mode(SignatureMode::V2Domain).unwrap();
        account
            .register_session_key(key(1), NOW + 100, 5, vec![])
            .unwrap();

        let h = KeccakFieldHasher;
        let (r, s) = (U256::from(1), U256::from(2));
        let calls = [Call::new(addr(0x71), entrypoint_selector("ping"), vec![])];
        let digest = domain_session_digest(&h, 1, account_addr(), 0, key(1), NOW + 50, &calls);
        account.verifier.accept(digest, key(1), r, s);

        let outcomes = account
            .execute(&session_sig(key(1), r, s, NOW + 50), &calls)
            .unwrap();
        assert!(outcomes[0].success);
    }

    #[test]
    fn is_valid_signature_never_mutates_state() {
        let mut account = new_account(account_addr());
        account
            .register_session_key(key(1), NOW + 100, 5, vec![])
            .unwrap();
        let before = account.store().session(key(1)).unwrap().clone();

        let _ = account.is_valid_signature(key(0x33), &[U256::from(1), U256::from(2)]);
        let _ = account.is_valid_signature(
            key(0x33),
            &session_sig(key(1), U256::from(1), U256::from(2), NOW + 50),
        );
        assert_eq!(account.store().session(key(1)).unwrap(), &before);
    }

    #[test]
    fn end_to_end_session_flow_with_real_signatures() {
        use warden_session_encoder::{owner_signature, session_signature, transfer_call, Keyring};

        let mut keyring = Keyring::new();
        let owner = keyring.generate(1);
        let session = keyring.generate(2);

        let ledger = MockLedger::new(NOW, account_addr());
        let mut account = SmartAccount::new(
            account_addr(),
            owner,
            key(0xC0),
            DelayBounds::standard(),
            ledger,
            keyring,
            KeccakFieldHasher,
        )
        .unwrap();
        account
            .register_session_key(session, NOW + 50, 5, vec![entrypoint_selector("transfer")])
            .unwrap();
        account
            .set_spending_policy(
                session,
                addr(0x70),
                U256::from(100),
                U256::from(250),
                86_400,
            )
            .unwrap();

        let calls = [transfer_call(addr(0x70), addr(0xBE), U256::from(60))];
        let digest =
            legacy_session_digest(&KeccakFieldHasher, account.ledger.tx_hash, session, NOW + 50);
        let (r, s) = account.verifier.sign(session, digest).unwrap();
        let outcomes = account
            .execute(&session_signature(session, r, s, NOW + 50), &calls)
            .unwrap();
        assert!(outcomes[0].success);
        assert_eq!(
            account.store().policy(session, addr(0x70)).unwrap().spent_in_window,
            U256::from(60)
        );
        assert_eq!(account.store().session(session).unwrap().calls_used, 1);

        // Owner authority over the same batch: no session accounting.
        let (r, s) = account.verifier.sign(owner, account.ledger.tx_hash).unwrap();
        let outcomes = account.execute(&owner_signature(r, s), &calls).unwrap();
        assert!(outcomes[0].success);
        assert_eq!(account.store().session(session).unwrap().calls_used, 1);
    }

    #[test]
    fn upgrade_round_trip_through_the_facade() {
        let mut account = new_account(account_addr());
        account.schedule_upgrade(key(0xC1)).unwrap();
        assert_eq!(
            account.execute_upgrade(),
            Err(AccountError::TimelockNotExpired {
                ready_at: NOW + 300,
                now: NOW
            })
        );
        account.ledger.now = NOW + 300;
        assert_eq!(account.execute_upgrade().unwrap(), key(0xC1));
        assert_eq!(account.store().code, key(0xC1));
    }
}
