use loyalty_canonical::PrincipalId;
use serde::{Deserialize, Serialize};

use crate::ledger::{Points, RewardId};

/// Notification emitted by an accepted state transition.
///
/// `NewRewardAdded` and `PointsRedeemed` are the program's public
/// notifications. The other variants record the remaining state changes so
/// that a ledger can be rebuilt from its event history alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Ledger constructed with its first owner.
    LedgerCreated {
        /// Initial owner.
        owner: PrincipalId,
    },
    /// Ownership transferred.
    OwnerChanged {
        /// Owner before the transfer.
        previous_owner: PrincipalId,
        /// Owner after the transfer.
        new_owner: PrincipalId,
    },
    /// Reward registered in the catalog.
    NewRewardAdded {
        /// Assigned id.
        reward_id: RewardId,
        /// Description as stored.
        description: String,
    },
    /// Points credited to a user.
    PointsEarned {
        /// Credited user.
        user: PrincipalId,
        /// Amount credited.
        amount: Points,
        /// Balance after the credit.
        balance: Points,
    },
    /// Points redeemed against a reward.
    PointsRedeemed {
        /// Redeeming user.
        user: PrincipalId,
        /// Redeemed reward.
        reward_id: RewardId,
        /// Catalog description at redemption time.
        reward_description: String,
    },
}

impl LedgerEvent {
    /// Stable `event_type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::LedgerCreated { .. } => "ledger_created",
            LedgerEvent::OwnerChanged { .. } => "owner_changed",
            LedgerEvent::NewRewardAdded { .. } => "new_reward_added",
            LedgerEvent::PointsEarned { .. } => "points_earned",
            LedgerEvent::PointsRedeemed { .. } => "points_redeemed",
        }
    }
}

/// Result of an accepted operation: its output and the events it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<T> {
    /// Operation output (e.g. the assigned reward id).
    pub output: T,
    /// Events, in emission order.
    pub events: Vec<LedgerEvent>,
}

impl<T> Transition<T> {
    pub(crate) fn new(output: T, event: LedgerEvent) -> Self {
        Self {
            output,
            events: vec![event],
        }
    }
}

/// Receiver for ledger notifications.
///
/// Delivery happens synchronously with the state change that produced the
/// event; the ledger makes no promise beyond that call.
pub trait EventSink {
    /// Receives one event.
    fn emit(&mut self, event: &LedgerEvent);
}

impl EventSink for Vec<LedgerEvent> {
    fn emit(&mut self, event: &LedgerEvent) {
        self.push(event.clone());
    }
}
