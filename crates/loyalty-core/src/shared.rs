use loyalty_canonical::PrincipalId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::LedgerError;
use crate::events::{EventSink, Transition};
use crate::ledger::{LedgerStore, Points, RewardId};

struct Inner<S> {
    ledger: LedgerStore,
    sink: S,
}

/// A [`LedgerStore`] shared between threads behind one lock.
///
/// Every operation runs to completion while holding the lock, and its events
/// reach the sink before the lock is released, so the sink observes events
/// in the same total order as the state changes.
pub struct SharedLedger<S> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: EventSink> SharedLedger<S> {
    /// Wraps `ledger`, delivering its events to `sink`.
    pub fn new(ledger: LedgerStore, sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { ledger, sink })),
        }
    }

    // Ledger operations mutate only after every check passes, so a panic in
    // another holder cannot leave a half-applied transition behind.
    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `op` under the lock and forwards its events to the sink.
    pub fn execute<T, F>(&self, op: F) -> Result<Transition<T>, LedgerError>
    where
        F: FnOnce(&mut LedgerStore) -> Result<Transition<T>, LedgerError>,
    {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let transition = op(&mut inner.ledger)?;
        for event in &transition.events {
            inner.sink.emit(event);
        }
        Ok(transition)
    }

    /// See [`LedgerStore::set_owner`].
    pub fn set_owner(
        &self,
        caller: &PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<Transition<()>, LedgerError> {
        self.execute(|ledger| ledger.set_owner(caller, new_owner))
    }

    /// See [`LedgerStore::add_reward`].
    pub fn add_reward(
        &self,
        caller: &PrincipalId,
        description: impl Into<String>,
    ) -> Result<Transition<RewardId>, LedgerError> {
        self.execute(|ledger| ledger.add_reward(caller, description))
    }

    /// See [`LedgerStore::earn_points`].
    pub fn earn_points(
        &self,
        caller: &PrincipalId,
        user: &PrincipalId,
        amount: Points,
    ) -> Result<Transition<Points>, LedgerError> {
        self.execute(|ledger| ledger.earn_points(caller, user, amount))
    }

    /// See [`LedgerStore::redeem_points`].
    pub fn redeem_points(
        &self,
        caller: &PrincipalId,
        reward_id: RewardId,
    ) -> Result<Transition<Points>, LedgerError> {
        self.execute(|ledger| ledger.redeem_points(caller, reward_id))
    }

    /// Current owner.
    pub fn owner(&self) -> PrincipalId {
        self.lock().ledger.owner().clone()
    }

    /// See [`LedgerStore::get_reward`].
    pub fn get_reward(&self, reward_id: RewardId) -> String {
        self.lock().ledger.get_reward(reward_id).to_string()
    }

    /// See [`LedgerStore::get_points`].
    pub fn get_points(&self, user: &PrincipalId) -> Points {
        self.lock().ledger.get_points(user)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> LedgerStore {
        self.lock().ledger.clone()
    }

    /// Reads the sink under the lock.
    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().sink)
    }
}
