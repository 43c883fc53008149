//! List command implementation.

use super::{CommandResult, Context};
use crate::output;
use loyalty_store::{
    AndFilter, EntryFilter, EventTypeFilter, FilteredReader, JournalBackendReader,
    PrincipalFilter, ReadMode, StoreReader, UserFilter,
};

/// Which entries to show.
pub struct ListArgs {
    pub json: bool,
    pub event_type: Option<String>,
    pub principal: Option<String>,
    pub user: Option<String>,
    pub max_events: Option<u64>,
}

pub fn run(ctx: &Context, args: ListArgs) -> CommandResult {
    let reader = JournalBackendReader::open(&ctx.journal, ReadMode::Strict)
        .map_err(|e| format!("Failed to open journal {}: {}", ctx.journal.display(), e))?;

    let mut filters: Vec<Box<dyn EntryFilter>> = Vec::new();
    if let Some(event_type) = args.event_type {
        filters.push(Box::new(EventTypeFilter { event_type }));
    }
    if let Some(principal_id) = args.principal {
        filters.push(Box::new(PrincipalFilter { principal_id }));
    }
    if let Some(user) = args.user {
        filters.push(Box::new(UserFilter { user }));
    }
    let mut reader = FilteredReader::new(reader, AndFilter { filters });

    if !args.json {
        output::print_table_header();
    }

    let mut count: u64 = 0;
    while let Some(entry) = reader.read_next()? {
        if args.max_events.is_some_and(|max| count >= max) {
            break;
        }
        if args.json {
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("{}", output::format_table_row(&entry));
        }
        count += 1;
    }

    Ok(())
}
