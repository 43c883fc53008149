//! Init command implementation.

use super::{principal, CommandResult, Context};
use loyalty_store::JournalLedger;
use tracing::info;

pub fn run(ctx: &Context, owner: &str) -> CommandResult {
    let owner = principal(owner)?;
    let ledger = JournalLedger::create(&ctx.journal, owner.clone(), ctx.options.clone())?;
    info!(journal = %ctx.journal.display(), %owner, "ledger initialised");
    ledger.finish()?;
    println!("Created ledger {} owned by {}", ctx.journal.display(), owner);
    Ok(())
}
