//! Verify command implementation.

use super::{CommandResult, Context};
use crate::output::truncate;
use loyalty_store::{verify_chain, JournalBackendReader, ReadMode, Verdict};

pub fn run(ctx: &Context, strict: bool, json_output: bool) -> CommandResult {
    let mut reader = JournalBackendReader::open(&ctx.journal, ReadMode::Strict)
        .map_err(|e| format!("Failed to open journal {}: {}", ctx.journal.display(), e))?;
    let report = verify_chain(&mut reader, ctx.options.canonicalizer.clone())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        println!("{:<5} {:<44} {:<16} {}", "SEQ", "EVENT_ID", "TYPE", "VERDICT");
        println!("{}", "-".repeat(80));
        for record in &report.records {
            let verdict = match &record.verdict {
                Verdict::Ok => "ok".to_string(),
                Verdict::Invalid(reason) => format!("INVALID: {}", reason),
                Verdict::Unchecked => "unchecked".to_string(),
            };
            println!(
                "{:<5} {:<44} {:<16} {}",
                record.index,
                truncate(record.event_id.as_deref().unwrap_or("?"), 44),
                record.event_type.as_deref().unwrap_or("?"),
                verdict
            );
        }
        if report.is_valid() {
            println!("Chain OK: {} records", report.records.len());
        } else {
            println!("Chain INVALID");
        }
    }

    if strict && !report.is_valid() {
        return Err("journal failed verification".into());
    }
    Ok(())
}
