use loyalty_canonical::PrincipalId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::errors::LedgerError;
use crate::events::{LedgerEvent, Transition};

/// Reward identifier; assigned from 1.
pub type RewardId = u64;

/// Point amount.
pub type Points = u64;

/// Points debited by one redemption.
pub const REDEMPTION_COST: Points = 1;

/// The ledger aggregate: owner, reward catalog, and balances.
///
/// Mutations take `&mut self`, so a single `LedgerStore` is trivially
/// single-writer. Use [`SharedLedger`](crate::SharedLedger) to share one
/// between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    pub(crate) owner: PrincipalId,
    pub(crate) rewards: BTreeMap<RewardId, String>,
    pub(crate) next_reward_id: RewardId,
    pub(crate) balances: HashMap<PrincipalId, Points>,
}

impl LedgerStore {
    /// Creates an empty ledger owned by `owner`.
    pub fn new(owner: PrincipalId) -> Self {
        Self {
            owner,
            rewards: BTreeMap::new(),
            next_reward_id: 1,
            balances: HashMap::new(),
        }
    }

    /// Current owner.
    pub fn owner(&self) -> &PrincipalId {
        &self.owner
    }

    /// Id the next `add_reward` will assign.
    pub fn next_reward_id(&self) -> RewardId {
        self.next_reward_id
    }

    /// Number of rewards in the catalog.
    pub fn reward_count(&self) -> usize {
        self.rewards.len()
    }

    /// Catalog entries in id order.
    pub fn rewards(&self) -> impl Iterator<Item = (RewardId, &str)> {
        self.rewards.iter().map(|(id, d)| (*id, d.as_str()))
    }

    /// Users with a recorded balance: everyone credited a non-zero amount,
    /// including balances since drained to zero.
    pub fn balances(&self) -> impl Iterator<Item = (&PrincipalId, Points)> {
        self.balances.iter().map(|(user, points)| (user, *points))
    }

    fn ensure_owner(&self, caller: &PrincipalId, op: &'static str) -> Result<(), LedgerError> {
        if *caller != self.owner {
            warn!(%caller, owner = %self.owner, op, "rejected owner-only operation");
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Transfers ownership. Only the current owner may call this.
    pub fn set_owner(
        &mut self,
        caller: &PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<Transition<()>, LedgerError> {
        self.ensure_owner(caller, "set_owner")?;
        let previous_owner = std::mem::replace(&mut self.owner, new_owner.clone());
        debug!(%previous_owner, %new_owner, "owner changed");
        Ok(Transition::new(
            (),
            LedgerEvent::OwnerChanged {
                previous_owner,
                new_owner,
            },
        ))
    }

    /// Registers a reward and returns its id.
    ///
    /// Descriptions are stored as given; empty and duplicate descriptions
    /// still receive a fresh id.
    pub fn add_reward(
        &mut self,
        caller: &PrincipalId,
        description: impl Into<String>,
    ) -> Result<Transition<RewardId>, LedgerError> {
        self.ensure_owner(caller, "add_reward")?;
        let reward_id = self.next_reward_id;
        let next = reward_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::InvalidArgument("reward id space exhausted".into()))?;
        let description = description.into();
        self.rewards.insert(reward_id, description.clone());
        self.next_reward_id = next;
        debug!(reward_id, %description, "reward added");
        Ok(Transition::new(
            reward_id,
            LedgerEvent::NewRewardAdded {
                reward_id,
                description,
            },
        ))
    }

    /// Description of `reward_id`, or `""` if it was never assigned.
    pub fn get_reward(&self, reward_id: RewardId) -> &str {
        self.rewards.get(&reward_id).map(String::as_str).unwrap_or("")
    }

    /// Credits `amount` points to `user` and returns the new balance.
    pub fn earn_points(
        &mut self,
        caller: &PrincipalId,
        user: &PrincipalId,
        amount: Points,
    ) -> Result<Transition<Points>, LedgerError> {
        self.ensure_owner(caller, "earn_points")?;
        let balance = self.get_points(user).checked_add(amount).ok_or_else(|| {
            LedgerError::InvalidArgument(format!("crediting {} points to {} overflows", amount, user))
        })?;
        if amount > 0 {
            self.balances.insert(user.clone(), balance);
        }
        debug!(%user, amount, balance, "points earned");
        Ok(Transition::new(
            balance,
            LedgerEvent::PointsEarned {
                user: user.clone(),
                amount,
                balance,
            },
        ))
    }

    /// Balance of `user`; zero if never credited.
    pub fn get_points(&self, user: &PrincipalId) -> Points {
        self.balances.get(user).copied().unwrap_or(0)
    }

    /// Redeems [`REDEMPTION_COST`] points of the caller's own balance for
    /// `reward_id` and returns the remaining balance.
    pub fn redeem_points(
        &mut self,
        caller: &PrincipalId,
        reward_id: RewardId,
    ) -> Result<Transition<Points>, LedgerError> {
        let reward_description = self
            .rewards
            .get(&reward_id)
            .cloned()
            .ok_or(LedgerError::NotFound { reward_id })?;
        let balance = self.get_points(caller);
        let remaining =
            balance
                .checked_sub(REDEMPTION_COST)
                .ok_or_else(|| LedgerError::InsufficientBalance {
                    user: caller.clone(),
                    balance,
                    required: REDEMPTION_COST,
                })?;
        self.balances.insert(caller.clone(), remaining);
        debug!(user = %caller, reward_id, remaining, "points redeemed");
        Ok(Transition::new(
            remaining,
            LedgerEvent::PointsRedeemed {
                user: caller.clone(),
                reward_id,
                reward_description,
            },
        ))
    }
}
