use loyalty_journal::frame::MAX_PAYLOAD_SIZE;
use loyalty_journal::{
    EntryJson, FrameKind, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use serde_json::json;
use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::TempDir;

fn entry(sequence: u64) -> EntryJson {
    json!({
        "event_type": "new_reward_added",
        "sequence": sequence,
        "reward_id": sequence,
        "description": "Free Coffee"
    })
}

fn write_entries(path: &Path, count: u64) {
    let mut writer = JournalWriter::open(path, WriteOptions::default()).unwrap();
    for sequence in 0..count {
        writer.append_entry(&entry(sequence)).unwrap();
    }
    writer.finish().unwrap();
}

#[test]
fn test_oversized_payload_rejected_and_not_written() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);
    let before = fs::metadata(&path).unwrap().len();

    let oversized = vec![0u8; MAX_PAYLOAD_SIZE as usize + 1];
    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    match writer.append_raw(FrameKind::Json, &oversized).unwrap_err() {
        JournalError::PayloadTooLarge { size, max } => {
            assert_eq!(size, MAX_PAYLOAD_SIZE as usize + 1);
            assert_eq!(max, MAX_PAYLOAD_SIZE);
        }
        other => panic!("expected PayloadTooLarge, got {:?}", other),
    }
    writer.finish().unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), before);
}

#[test]
fn test_frame_reserved_bytes_must_be_zero() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);

    let mut file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.seek(SeekFrom::Start(16 + 1)).unwrap();
    file.write_all(&[0x01]).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(matches!(
        reader.read_frame(),
        Err(JournalError::InvalidFrame { offset: 16, .. })
    ));
}

#[test]
fn test_torn_tail_strict_vs_permissive() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 2);

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    reader.read_entry().unwrap().unwrap();
    let first_end = reader.position();
    drop(reader);

    // Cut ten bytes into the second frame's payload.
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(first_end + 10).unwrap();
    drop(file);

    let mut strict = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(strict.read_entry().unwrap().is_some());
    assert!(matches!(
        strict.read_entry(),
        Err(JournalError::TruncatedFrame { offset }) if offset == first_end
    ));

    let mut permissive = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    assert!(permissive.read_entry().unwrap().is_some());
    assert!(permissive.read_entry().unwrap().is_none());
    assert!(permissive.hit_torn_tail());
    assert_eq!(permissive.position(), first_end);
}

#[test]
fn test_truncate_repairs_torn_tail() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 2);
    let full = fs::metadata(&path).unwrap().len();

    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(full - 3).unwrap();
    drop(file);

    let mut reader = JournalReader::open(&path, ReadMode::Permissive).unwrap();
    while reader.read_entry().unwrap().is_some() {}
    JournalWriter::truncate(&path, reader.position()).unwrap();

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_entry(&entry(1)).unwrap();
    writer.finish().unwrap();

    let entries: Vec<_> = JournalReader::open(&path, ReadMode::Strict)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries, vec![entry(0), entry(1)]);
}

#[test]
fn test_truncate_refuses_to_cut_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);
    assert!(JournalWriter::truncate(&path, 8).is_err());
}

#[test]
fn test_rollback_discards_later_frames() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    let mark = writer.len();
    writer.append_entry(&entry(1)).unwrap();
    writer.append_entry(&entry(2)).unwrap();
    writer.rollback_to(mark).unwrap();
    assert_eq!(writer.len(), mark);
    assert_eq!(fs::metadata(&path).unwrap().len(), mark);

    writer.append_entry(&entry(3)).unwrap();
    writer.finish().unwrap();
    let entries: Vec<_> = JournalReader::open(&path, ReadMode::Strict)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries, vec![entry(0), entry(3)]);
}

#[test]
fn test_rollback_rejects_out_of_range_targets() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    let len = writer.len();
    assert!(matches!(
        writer.rollback_to(len + 1),
        Err(JournalError::InvalidRollback { .. })
    ));
    assert!(writer.rollback_to(4).is_err());
    assert_eq!(fs::metadata(&path).unwrap().len(), len);
}

#[test]
fn test_unknown_frame_kind_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");
    write_entries(&path, 1);

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Unknown(0x7F), b"opaque").unwrap();
    writer.append_entry(&entry(1)).unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert_eq!(reader.read_entry().unwrap().unwrap(), entry(0));
    assert_eq!(reader.read_entry().unwrap().unwrap(), entry(1));
    assert!(reader.read_entry().unwrap().is_none());
}

#[test]
fn test_invalid_json_payload_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ledger.lrj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer.append_raw(FrameKind::Json, b"{not json").unwrap();
    writer.finish().unwrap();

    let mut reader = JournalReader::open(&path, ReadMode::Strict).unwrap();
    assert!(matches!(reader.read_entry(), Err(JournalError::Json(_))));
}
