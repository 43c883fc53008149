//! Mutating commands. Each opens the ledger, applies one operation as
//! `caller`, and persists it before printing the result.

use super::{non_negative, principal, CommandResult, Context};
use loyalty_core::LedgerEvent;
use tracing::info;

fn log_events(events: &[LedgerEvent]) {
    for event in events {
        info!(event_type = event.event_type(), ?event, "event emitted");
    }
}

pub fn set_owner(ctx: &Context, caller: &str, new_owner: &str) -> CommandResult {
    let caller = principal(caller)?;
    let new_owner = principal(new_owner)?;
    let mut ledger = ctx.open_ledger()?;
    let transition = ledger.set_owner(&caller, new_owner.clone())?;
    log_events(&transition.events);
    ledger.finish()?;
    println!("Owner is now {}", new_owner);
    Ok(())
}

pub fn add_reward(ctx: &Context, caller: &str, description: &str) -> CommandResult {
    let caller = principal(caller)?;
    let mut ledger = ctx.open_ledger()?;
    let transition = ledger.add_reward(&caller, description)?;
    log_events(&transition.events);
    ledger.finish()?;
    println!("{}", transition.output);
    Ok(())
}

pub fn earn(ctx: &Context, caller: &str, user: &str, amount: &str) -> CommandResult {
    let caller = principal(caller)?;
    let user = principal(user)?;
    let amount = non_negative("amount", amount)?;
    let mut ledger = ctx.open_ledger()?;
    let transition = ledger.earn_points(&caller, &user, amount)?;
    log_events(&transition.events);
    ledger.finish()?;
    println!("{}", transition.output);
    Ok(())
}

pub fn redeem(ctx: &Context, caller: &str, reward_id: &str) -> CommandResult {
    let caller = principal(caller)?;
    let reward_id = non_negative("reward id", reward_id)?;
    let mut ledger = ctx.open_ledger()?;
    let transition = ledger.redeem_points(&caller, reward_id)?;
    log_events(&transition.events);
    ledger.finish()?;
    println!("{}", transition.output);
    Ok(())
}
