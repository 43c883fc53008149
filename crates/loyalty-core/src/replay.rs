use loyalty_canonical::Canonicalizer;
use tracing::debug;

use crate::errors::ReplayError;
use crate::events::LedgerEvent;
use crate::ledger::{LedgerStore, REDEMPTION_COST};
use crate::record::{LedgerRecord, RecordChain};

/// Rebuilds a ledger from its records, checking the chain as it goes.
pub fn replay<I>(
    records: I,
    canonicalizer: Canonicalizer,
) -> Result<(LedgerStore, RecordChain), ReplayError>
where
    I: IntoIterator<Item = LedgerRecord>,
{
    let mut replayer = Replayer::new(canonicalizer);
    for record in records {
        replayer.push(&record)?;
    }
    replayer.finish()
}

/// Incremental form of [`replay`] for callers that stream records.
#[derive(Debug)]
pub struct Replayer {
    chain: RecordChain,
    ledger: Option<LedgerStore>,
}

impl Replayer {
    /// Starts an empty replay.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self {
            chain: RecordChain::new(canonicalizer),
            ledger: None,
        }
    }

    /// Verifies `record` against the chain and applies its event.
    pub fn push(&mut self, record: &LedgerRecord) -> Result<(), ReplayError> {
        self.chain.accept(record)?;
        let sequence = record.sequence;
        match &record.event {
            LedgerEvent::LedgerCreated { owner } => {
                if self.ledger.is_some() {
                    return Err(ReplayError::DuplicateGenesis { sequence });
                }
                self.ledger = Some(LedgerStore::new(owner.clone()));
            }
            event => match self.ledger.as_mut() {
                None => return Err(ReplayError::MissingGenesis(event.event_type().to_string())),
                Some(ledger) => ledger
                    .apply(event)
                    .map_err(|reason| ReplayError::Inconsistent { sequence, reason })?,
            },
        }
        debug!(sequence, event_type = record.event.event_type(), "replayed record");
        Ok(())
    }

    /// Returns the rebuilt ledger and the chain positioned after the last record.
    pub fn finish(self) -> Result<(LedgerStore, RecordChain), ReplayError> {
        let ledger = self.ledger.ok_or(ReplayError::Empty)?;
        Ok((ledger, self.chain))
    }
}

impl LedgerStore {
    /// Re-applies a recorded event.
    ///
    /// Authorization is not re-checked; the event records an effect that was
    /// already authorized. The effect must still be consistent with the
    /// current state.
    pub fn apply(&mut self, event: &LedgerEvent) -> Result<(), String> {
        match event {
            LedgerEvent::LedgerCreated { .. } => {
                return Err("ledger_created on an existing ledger".to_string());
            }
            LedgerEvent::OwnerChanged {
                previous_owner,
                new_owner,
            } => {
                if *previous_owner != self.owner {
                    return Err(format!(
                        "owner is {}, record claims {}",
                        self.owner, previous_owner
                    ));
                }
                self.owner = new_owner.clone();
            }
            LedgerEvent::NewRewardAdded {
                reward_id,
                description,
            } => {
                if *reward_id != self.next_reward_id {
                    return Err(format!(
                        "reward id {} out of order, expected {}",
                        reward_id, self.next_reward_id
                    ));
                }
                self.rewards.insert(*reward_id, description.clone());
                self.next_reward_id += 1;
            }
            LedgerEvent::PointsEarned {
                user,
                amount,
                balance,
            } => {
                let current = self.get_points(user);
                if current.checked_add(*amount) != Some(*balance) {
                    return Err(format!(
                        "{} holds {}, crediting {} cannot yield {}",
                        user, current, amount, balance
                    ));
                }
                if *amount > 0 {
                    self.balances.insert(user.clone(), *balance);
                }
            }
            LedgerEvent::PointsRedeemed {
                user,
                reward_id,
                reward_description,
            } => {
                match self.rewards.get(reward_id) {
                    Some(stored) if stored == reward_description => {}
                    Some(stored) => {
                        return Err(format!(
                            "reward {} is '{}', record claims '{}'",
                            reward_id, stored, reward_description
                        ))
                    }
                    None => return Err(format!("reward {} does not exist", reward_id)),
                }
                let remaining = self
                    .get_points(user)
                    .checked_sub(REDEMPTION_COST)
                    .ok_or_else(|| format!("{} cannot cover redemption", user))?;
                self.balances.insert(user.clone(), remaining);
            }
        }
        Ok(())
    }

    /// Undoes events produced by an accepted operation, newest first.
    ///
    /// Used when an operation's records could not be persisted.
    pub fn revert(&mut self, events: &[LedgerEvent]) {
        for event in events.iter().rev() {
            match event {
                LedgerEvent::LedgerCreated { .. } => {}
                LedgerEvent::OwnerChanged { previous_owner, .. } => {
                    self.owner = previous_owner.clone();
                }
                LedgerEvent::NewRewardAdded { reward_id, .. } => {
                    self.rewards.remove(reward_id);
                    self.next_reward_id = *reward_id;
                }
                LedgerEvent::PointsEarned {
                    user,
                    amount,
                    balance,
                } => {
                    // Zero credits never touch the map.
                    if *amount > 0 {
                        let restored = self.get_points(user).saturating_sub(*amount);
                        if restored == 0 && balance == amount {
                            // The credit created the entry.
                            self.balances.remove(user);
                        } else {
                            self.balances.insert(user.clone(), restored);
                        }
                    }
                }
                LedgerEvent::PointsRedeemed { user, .. } => {
                    let restored = self.get_points(user).saturating_add(REDEMPTION_COST);
                    self.balances.insert(user.clone(), restored);
                }
            }
        }
    }
}
