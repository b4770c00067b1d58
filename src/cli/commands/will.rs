use anyhow::Result;
use serde_json::json;

use crate::{ PrincipalId, PropertyId };

use super::property::report;
use super::CommandContext;
use crate::cli::ui;
use crate::cli::WillAction;

pub fn execute(ctx: &CommandContext, action: &WillAction) -> Result<()> {
    match action {
        WillAction::Add { id, will_owner } => add(ctx, PropertyId(*id), will_owner),
        WillAction::Remove { id, will_owner } => remove(ctx, PropertyId(*id), will_owner),
        WillAction::List { id } => list(ctx, PropertyId(*id)),
        WillAction::Check { id, principal } => check(ctx, PropertyId(*id), principal),
    }
}

fn add(ctx: &CommandContext, id: PropertyId, will_owner: &PrincipalId) -> Result<()> {
    ctx.registry.add_will_ownership(ctx.caller()?, id, will_owner)?;
    report(ctx, id, &format!("Added {} as a will owner of property {}", will_owner, id))
}

fn remove(ctx: &CommandContext, id: PropertyId, will_owner: &PrincipalId) -> Result<()> {
    let was_listed = ctx.registry.is_will_owner(id, will_owner)?;
    ctx.registry.remove_will_ownership(ctx.caller()?, id, will_owner)?;
    if !was_listed && !ctx.is_json() {
        ui::print_info(&format!("{} is not a will owner of property {}; nothing removed", will_owner, id));
        return Ok(());
    }
    report(ctx, id, &format!("Removed {} from the will owners of property {}", will_owner, id))
}

fn list(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let will_owners = ctx.registry.get_will_owners(id)?;
    if ctx.is_json() {
        return ctx.emit_json(&json!({ "id": id, "will_owners": will_owners }));
    }
    if will_owners.is_empty() {
        ui::print_info(&format!("Property {} has no will owners", id));
        return Ok(());
    }
    ui::print_header(&format!("Will owners of property {}", id));
    for (i, will_owner) in will_owners.iter().enumerate() {
        println!("{:>4}. {}", i + 1, will_owner);
    }
    Ok(())
}

fn check(ctx: &CommandContext, id: PropertyId, principal: &PrincipalId) -> Result<()> {
    let listed = ctx.registry.is_will_owner(id, principal)?;
    if ctx.is_json() {
        return ctx.emit_json(&json!({ "id": id, "principal": principal, "will_owner": listed }));
    }
    ui::print_result(&format!("{} is a will owner of {}", principal, id), if listed { "yes" } else { "no" });
    Ok(())
}
