//! Read-only commands. They replay the journal without writing to it.

use super::{non_negative, principal, CommandResult, Context};

pub fn owner(ctx: &Context) -> CommandResult {
    let ledger = ctx.load_ledger()?;
    println!("{}", ledger.owner());
    Ok(())
}

/// Prints the description, or an empty line for an unknown id.
pub fn reward(ctx: &Context, reward_id: &str) -> CommandResult {
    let reward_id = non_negative("reward id", reward_id)?;
    let ledger = ctx.load_ledger()?;
    println!("{}", ledger.get_reward(reward_id));
    Ok(())
}

pub fn points(ctx: &Context, user: &str) -> CommandResult {
    let user = principal(user)?;
    let ledger = ctx.load_ledger()?;
    println!("{}", ledger.get_points(&user));
    Ok(())
}
