//! Durable ledger: every accepted operation is sealed into a record and
//! appended before it is reported.

use crate::error::StoreError;
use crate::journal::{JournalBackendReader, JournalBackendWriter};
use crate::traits::StoreWriter;
use crate::typed::RecordReader;
use loyalty_canonical::{Canonicalizer, Digest, PrincipalId, Timestamp};
use loyalty_core::{
    LedgerError, LedgerEvent, LedgerRecord, LedgerStore, Points, RecordChain, Replayer, RewardId,
    Transition,
};
use loyalty_journal::{JournalWriter, ReadMode, WriteOptions};
use std::path::Path;
use tracing::{debug, info, warn};

/// Options for creating or opening a [`JournalLedger`].
#[derive(Debug, Clone)]
pub struct LedgerOptions {
    /// Options for the journal writer.
    pub write: WriteOptions,
    /// How a torn final entry is treated on open.
    ///
    /// `Permissive` discards it and resumes appending after the last
    /// complete entry; `Strict` refuses to open.
    pub read_mode: ReadMode,
    /// Canonicalizer used to seal and verify records.
    pub canonicalizer: Canonicalizer,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            write: WriteOptions::default(),
            read_mode: ReadMode::Permissive,
            canonicalizer: Canonicalizer::default_profile(),
        }
    }
}

/// A [`LedgerStore`] whose accepted operations are persisted to a
/// [`StoreWriter`].
///
/// An operation is applied in memory, sealed into records and appended.
/// If sealing or appending fails the in-memory effect is reverted, so
/// the ledger and its journal never diverge.
pub struct DurableLedger<W: StoreWriter> {
    ledger: LedgerStore,
    chain: RecordChain,
    writer: W,
}

/// A durable ledger backed by a journal file.
pub type JournalLedger = DurableLedger<JournalBackendWriter>;

impl<W: StoreWriter> DurableLedger<W> {
    /// Starts a new ledger owned by `owner`, writing its genesis record.
    pub fn genesis(
        mut writer: W,
        owner: PrincipalId,
        canonicalizer: Canonicalizer,
    ) -> Result<Self, StoreError> {
        let mut chain = RecordChain::new(canonicalizer);
        let record = chain.seal(
            &owner,
            Timestamp::now(),
            LedgerEvent::LedgerCreated {
                owner: owner.clone(),
            },
        )?;
        write_records(&mut writer, std::slice::from_ref(&record))?;
        info!(%owner, event_id = %record.event_id, "ledger created");
        Ok(Self {
            ledger: LedgerStore::new(owner),
            chain,
            writer,
        })
    }

    /// Continues a ledger rebuilt by replay. `chain` must be positioned
    /// after the last record `writer` holds.
    pub fn resume(writer: W, ledger: LedgerStore, chain: RecordChain) -> Self {
        Self {
            ledger,
            chain,
            writer,
        }
    }

    /// Current state.
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Current owner.
    pub fn owner(&self) -> &PrincipalId {
        self.ledger.owner()
    }

    /// Description of `reward_id`, or `""` if it was never assigned.
    pub fn get_reward(&self, reward_id: RewardId) -> &str {
        self.ledger.get_reward(reward_id)
    }

    /// Balance of `user`.
    pub fn get_points(&self, user: &PrincipalId) -> Points {
        self.ledger.get_points(user)
    }

    /// Id of the last persisted record.
    pub fn head(&self) -> Option<&Digest> {
        self.chain.head()
    }

    /// Number of persisted records.
    pub fn record_count(&self) -> u64 {
        self.chain.next_sequence()
    }

    /// See [`LedgerStore::set_owner`].
    pub fn set_owner(
        &mut self,
        caller: &PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<Transition<()>, StoreError> {
        self.commit(caller, |ledger| ledger.set_owner(caller, new_owner))
    }

    /// See [`LedgerStore::add_reward`].
    pub fn add_reward(
        &mut self,
        caller: &PrincipalId,
        description: impl Into<String>,
    ) -> Result<Transition<RewardId>, StoreError> {
        self.commit(caller, |ledger| ledger.add_reward(caller, description))
    }

    /// See [`LedgerStore::earn_points`].
    pub fn earn_points(
        &mut self,
        caller: &PrincipalId,
        user: &PrincipalId,
        amount: Points,
    ) -> Result<Transition<Points>, StoreError> {
        self.commit(caller, |ledger| ledger.earn_points(caller, user, amount))
    }

    /// See [`LedgerStore::redeem_points`].
    pub fn redeem_points(
        &mut self,
        caller: &PrincipalId,
        reward_id: RewardId,
    ) -> Result<Transition<Points>, StoreError> {
        self.commit(caller, |ledger| ledger.redeem_points(caller, reward_id))
    }

    /// Flushes and releases the writer.
    pub fn finish(self) -> Result<(), StoreError> {
        self.writer.finish()
    }

    fn commit<T, F>(&mut self, caller: &PrincipalId, op: F) -> Result<Transition<T>, StoreError>
    where
        F: FnOnce(&mut LedgerStore) -> Result<Transition<T>, LedgerError>,
    {
        let transition = op(&mut self.ledger)?;
        if let Err(err) = self.persist(caller, &transition.events) {
            warn!(%caller, error = %err, "persisting operation failed, reverting");
            self.ledger.revert(&transition.events);
            return Err(err);
        }
        Ok(transition)
    }

    fn persist(&mut self, caller: &PrincipalId, events: &[LedgerEvent]) -> Result<(), StoreError> {
        let mut staged = self.chain.clone();
        let records = staged.seal_all(caller, &Timestamp::now(), events)?;
        write_records(&mut self.writer, &records)?;
        self.chain = staged;
        Ok(())
    }
}

/// Appends and flushes `records` as one unit. On failure the writer is cut
/// back to where it stood, so the journal holds all of them or none.
fn write_records<W: StoreWriter>(writer: &mut W, records: &[LedgerRecord]) -> Result<(), StoreError> {
    let mark = writer.position();
    let result = records
        .iter()
        .try_for_each(|record| -> Result<(), StoreError> {
            writer.append(&serde_json::to_value(record)?)?;
            debug!(sequence = record.sequence, event_type = record.event.event_type(), "record appended");
            Ok(())
        })
        .and_then(|()| writer.flush());
    if let Err(err) = result {
        if let Err(rollback_err) = writer.rollback(mark) {
            warn!(error = %rollback_err, "rolling back partial write failed");
        }
        return Err(err);
    }
    Ok(())
}

/// Replays the journal at `path`, returning the reader so the caller can
/// inspect where it stopped.
fn replay_journal(
    path: &Path,
    options: &LedgerOptions,
) -> Result<(LedgerStore, RecordChain, JournalBackendReader), StoreError> {
    let reader = JournalBackendReader::open(path, options.read_mode)?;
    let mut records = RecordReader::new(reader);
    let mut replayer = Replayer::new(options.canonicalizer.clone());
    for record in records.by_ref() {
        replayer.push(&record?)?;
    }
    let (ledger, chain) = replayer.finish()?;
    Ok((ledger, chain, records.into_inner()))
}

impl DurableLedger<JournalBackendWriter> {
    /// Creates a ledger in the journal at `path`.
    ///
    /// The file may be absent or empty; a journal that already holds
    /// entries is rejected with [`StoreError::AlreadyInitialized`].
    pub fn create<P: AsRef<Path>>(
        path: P,
        owner: PrincipalId,
        options: LedgerOptions,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let write = WriteOptions {
            create: true,
            ..options.write
        };
        let writer = JournalBackendWriter::open(path, write)?;
        if !writer.is_empty() {
            return Err(StoreError::AlreadyInitialized(path.display().to_string()));
        }
        Self::genesis(writer, owner, options.canonicalizer)
    }

    /// Opens an existing ledger, rebuilding its state by replaying and
    /// verifying every record.
    pub fn open<P: AsRef<Path>>(path: P, options: LedgerOptions) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let (ledger, chain, reader) = replay_journal(path, &options)?;
        if reader.hit_torn_tail() {
            JournalWriter::truncate(path, reader.position())?;
        }

        let write = WriteOptions {
            create: false,
            ..options.write
        };
        let writer = JournalBackendWriter::open(path, write)?;
        info!(
            path = %path.display(),
            records = chain.next_sequence(),
            owner = %ledger.owner(),
            "ledger opened"
        );
        Ok(Self::resume(writer, ledger, chain))
    }

    /// Rebuilds the state of the ledger at `path` without opening it for
    /// writing. The file is never modified; in permissive mode a torn final
    /// entry is ignored rather than cut off.
    pub fn load<P: AsRef<Path>>(path: P, options: &LedgerOptions) -> Result<LedgerStore, StoreError> {
        let path = path.as_ref();
        let (ledger, chain, reader) = replay_journal(path, options)?;
        if reader.hit_torn_tail() {
            warn!(path = %path.display(), position = reader.position(), "ignoring torn journal tail");
        }
        debug!(path = %path.display(), records = chain.next_sequence(), "ledger loaded");
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryJson;
    use loyalty_core::replay;

    /// In-memory writer that can be told to fail.
    #[derive(Default)]
    struct MemoryWriter {
        entries: Vec<EntryJson>,
        fail: bool,
        fail_flush: bool,
    }

    impl StoreWriter for MemoryWriter {
        fn append(&mut self, entry: &EntryJson) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.entries.push(entry.clone());
            Ok(())
        }

        fn position(&self) -> u64 {
            self.entries.len() as u64
        }

        fn rollback(&mut self, position: u64) -> Result<(), StoreError> {
            self.entries.truncate(position as usize);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), StoreError> {
            if self.fail_flush {
                return Err(StoreError::Io(std::io::Error::other("fsync failed")));
            }
            Ok(())
        }

        fn finish(self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn p(name: &str) -> PrincipalId {
        PrincipalId::new(name)
    }

    #[test]
    fn operations_append_one_record_each() {
        let mut ledger =
            DurableLedger::genesis(MemoryWriter::default(), p("owner"), Canonicalizer::default_profile())
                .unwrap();
        ledger.add_reward(&p("owner"), "coffee").unwrap();
        ledger.earn_points(&p("owner"), &p("alice"), 3).unwrap();
        ledger.redeem_points(&p("alice"), 1).unwrap();

        assert_eq!(ledger.record_count(), 4);
        assert_eq!(ledger.writer.entries.len(), 4);
        assert_eq!(ledger.writer.entries[3]["event_type"], "points_redeemed");
        assert_eq!(ledger.writer.entries[3]["principal_id"], "alice");
    }

    #[test]
    fn rejected_operation_appends_nothing() {
        let mut ledger =
            DurableLedger::genesis(MemoryWriter::default(), p("owner"), Canonicalizer::default_profile())
                .unwrap();
        let err = ledger.add_reward(&p("mallory"), "free stuff").unwrap_err();
        assert!(matches!(err, StoreError::Ledger(LedgerError::Unauthorized { .. })));
        assert_eq!(ledger.writer.entries.len(), 1);
        assert_eq!(ledger.record_count(), 1);
    }

    #[test]
    fn failed_append_reverts_state_and_chain() {
        let mut ledger =
            DurableLedger::genesis(MemoryWriter::default(), p("owner"), Canonicalizer::default_profile())
                .unwrap();
        ledger.earn_points(&p("owner"), &p("alice"), 2).unwrap();
        let head = ledger.head().cloned();

        ledger.writer.fail = true;
        assert!(ledger.add_reward(&p("owner"), "mug").is_err());
        assert!(ledger.earn_points(&p("owner"), &p("alice"), 5).is_err());
        assert!(ledger.set_owner(&p("owner"), p("bob")).is_err());

        assert_eq!(ledger.ledger().next_reward_id(), 1);
        assert_eq!(ledger.get_points(&p("alice")), 2);
        assert_eq!(ledger.owner(), &p("owner"));
        assert_eq!(ledger.head().cloned(), head);

        ledger.writer.fail = false;
        assert_eq!(ledger.add_reward(&p("owner"), "mug").unwrap().output, 1);

        let records = ledger
            .writer
            .entries
            .iter()
            .map(|e| crate::parse_record(e).unwrap())
            .collect::<Vec<_>>();
        let (rebuilt, _) = replay(records, Canonicalizer::default_profile()).unwrap();
        assert_eq!(rebuilt.get_reward(1), "mug");
        assert_eq!(rebuilt.get_points(&p("alice")), 2);
    }

    #[test]
    fn failed_flush_leaves_no_record_behind() {
        let mut ledger =
            DurableLedger::genesis(MemoryWriter::default(), p("owner"), Canonicalizer::default_profile())
                .unwrap();

        ledger.writer.fail_flush = true;
        assert!(ledger.add_reward(&p("owner"), "mug").is_err());
        assert_eq!(ledger.ledger().next_reward_id(), 1);
        assert_eq!(ledger.writer.entries.len(), 1);

        ledger.writer.fail_flush = false;
        assert_eq!(ledger.add_reward(&p("owner"), "mug").unwrap().output, 1);

        let sequences: Vec<_> = ledger
            .writer
            .entries
            .iter()
            .map(|e| e["sequence"].as_u64().unwrap())
            .collect();
        assert_eq!(sequences, vec![0, 1]);

        let records = ledger
            .writer
            .entries
            .iter()
            .map(|e| crate::parse_record(e).unwrap())
            .collect::<Vec<_>>();
        let (rebuilt, _) = replay(records, Canonicalizer::default_profile()).unwrap();
        assert_eq!(&rebuilt, ledger.ledger());
    }

    #[test]
    fn failed_genesis_is_an_error() {
        let writer = MemoryWriter {
            fail: true,
            ..MemoryWriter::default()
        };
        assert!(DurableLedger::genesis(writer, p("owner"), Canonicalizer::default_profile()).is_err());
    }
}
