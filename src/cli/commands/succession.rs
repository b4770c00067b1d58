use anyhow::Result;
use serde_json::json;

use crate::{ PrincipalId, PropertyId };

use super::property::report;
use super::{ parse_timestamp, CommandContext };
use crate::cli::ui;

pub fn bequeath(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let beneficiary = ctx.registry.get_property(id)?.beneficiary;
    ctx.registry.transfer_ownership_to_beneficiary(ctx.caller()?, id)?;
    report(ctx, id, &format!("Property {} handed to its beneficiary {}", id, beneficiary))
}

pub fn auto_transfer(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let beneficiary = ctx.registry.get_property(id)?.beneficiary;
    ctx.registry.auto_transfer(ctx.caller()?, id)?;
    report(ctx, id, &format!("Renewal lapsed; property {} passed to {}", id, beneficiary))
}

pub fn status(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let standing = ctx.registry.standing(id)?;
    if ctx.is_json() {
        return ctx.emit_json(
            &json!({
                "id": id,
                "expired": ctx.registry.is_property_expired(id)?,
                "renewable": ctx.registry.is_property_renewable(id)?,
                "standing": standing,
            })
        );
    }
    if ctx.registry.get_property(id)?.is_vacant() {
        ui::print_warning(&format!("Property {} does not exist or has been cleared", id));
    }
    ui::print_header(&format!("Status of property {}", id));
    ui::display_standing(&standing);
    Ok(())
}

pub fn set_expiry(ctx: &CommandContext, id: PropertyId, expiry: &str) -> Result<()> {
    let expiry = parse_timestamp(expiry)?;
    ctx.registry.update_property_expiry(ctx.caller()?, id, expiry)?;
    report(ctx, id, &format!("Property {} now expires at {}", id, expiry))
}

pub fn renew(ctx: &CommandContext, id: PropertyId, at: Option<&str>) -> Result<()> {
    let renewed_at = match at {
        Some(at) => parse_timestamp(at)?,
        None => ctx.registry.now(),
    };
    ctx.registry.update_last_renewal(ctx.caller()?, id, renewed_at)?;
    report(ctx, id, &format!("Property {} renewed at {}", id, renewed_at))
}

pub fn set_beneficiary(ctx: &CommandContext, id: PropertyId, beneficiary: &PrincipalId, expiry: &str) -> Result<()> {
    let expiry = parse_timestamp(expiry)?;
    ctx.registry.update_beneficiary_and_expiry(ctx.caller()?, id, beneficiary, expiry)?;
    report(ctx, id, &format!("Property {} now passes to {} and expires at {}", id, beneficiary, expiry))
}
