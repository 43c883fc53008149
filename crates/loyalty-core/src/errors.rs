use loyalty_canonical::PrincipalId;
use thiserror::Error;

use crate::ledger::{Points, RewardId};

/// Rejections returned by ledger operations.
///
/// Every variant is a pure rejection: the ledger is left exactly as it was
/// and no event is emitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller is not the current owner.
    #[error("unauthorized: {caller} is not the ledger owner")]
    Unauthorized {
        /// Identity that attempted the call.
        caller: PrincipalId,
    },
    /// Reward id was never assigned.
    #[error("reward {reward_id} not found")]
    NotFound {
        /// Requested reward id.
        reward_id: RewardId,
    },
    /// Balance does not cover the redemption cost.
    #[error("insufficient balance: {user} holds {balance} points, {required} required")]
    InsufficientBalance {
        /// Redeeming user.
        user: PrincipalId,
        /// Current balance.
        balance: Points,
        /// Points required.
        required: Points,
    },
    /// Malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised while rebuilding a ledger from records.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// No records at all.
    #[error("journal holds no records")]
    Empty,
    /// The first record is not a `ledger_created` record.
    #[error("record 0 must be ledger_created, found {0}")]
    MissingGenesis(String),
    /// A `ledger_created` record appeared after the first position.
    #[error("record {sequence}: ledger_created may only appear first")]
    DuplicateGenesis {
        /// Offending sequence number.
        sequence: u64,
    },
    /// Sequence number or previous-record link does not continue the chain.
    #[error("record {sequence}: broken chain: {reason}")]
    BrokenChain {
        /// Offending sequence number.
        sequence: u64,
        /// What did not line up.
        reason: String,
    },
    /// Stored event id does not match the record's content.
    #[error("record {sequence}: event id does not match content")]
    EventIdMismatch {
        /// Offending sequence number.
        sequence: u64,
    },
    /// Record is well-formed but its effect contradicts the state built so far.
    #[error("record {sequence}: inconsistent with ledger state: {reason}")]
    Inconsistent {
        /// Offending sequence number.
        sequence: u64,
        /// What did not apply.
        reason: String,
    },
    /// Event id could not be computed.
    #[error("event id computation failed: {0}")]
    EventId(#[from] loyalty_canonical::EventIdError),
}
