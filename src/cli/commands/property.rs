use anyhow::{ anyhow, Result };
use serde::Serialize;
use serde_json::json;

use crate::{ NewProperty, PrincipalId, PropertyDetails, PropertyId };

use super::{ parse_timestamp, CommandContext };
use crate::cli::ui;

// u128 fields must go through a typed serializer; `json!` cannot hold them
#[derive(Serialize)]
struct PropertyView {
    id: PropertyId,
    property: PropertyDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    will_owners: Option<Vec<PrincipalId>>,
}

#[derive(Serialize)]
struct ValueView {
    id: PropertyId,
    value: u128,
}

/// Fields accepted by `estate add`
pub struct AddArgs<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub price: u128,
    pub value: u128,
    pub location: &'a str,
    pub description: &'a str,
    pub expiry: &'a str,
    pub beneficiary: &'a PrincipalId,
}

pub fn add(ctx: &CommandContext, args: AddArgs<'_>) -> Result<()> {
    let caller = ctx.caller()?;
    let details = NewProperty {
        name: args.name.to_string(),
        kind: args.kind.to_string(),
        price: args.price,
        value: args.value,
        location: args.location.to_string(),
        description: args.description.to_string(),
        expiry: parse_timestamp(args.expiry)?,
        beneficiary: args.beneficiary.clone(),
    };
    let expired = details.expiry < ctx.registry.now();

    let id = ctx.registry.add_property(caller, details)?;

    if ctx.is_json() {
        return ctx.emit_json(&json!({ "id": id, "owner": caller }));
    }
    if expired {
        ui::print_warning(&format!("Property {} was registered already expired", id));
    }
    ui::print_success(&format!("Registered property {} owned by {}", id, caller));
    Ok(())
}

pub fn show(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let details = ctx.registry.get_property(id)?;
    let will_owners = ctx.registry.get_will_owners(id)?;

    if ctx.is_json() {
        return ctx.emit_json(
            &(PropertyView {
                id,
                property: details,
                will_owners: Some(will_owners),
            })
        );
    }
    ui::display_property(id, &details, &will_owners);
    Ok(())
}

pub fn value(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    let value = ctx.registry.get_property_value(id)?;
    if ctx.is_json() {
        return ctx.emit_json(&(ValueView { id, value }));
    }
    ui::print_result("Value", &value.to_string());
    Ok(())
}

pub fn list(ctx: &CommandContext, owner: Option<&PrincipalId>) -> Result<()> {
    let ids = match owner {
        Some(owner) => ctx.registry.properties_owned_by(owner)?,
        None => ctx.registry.property_ids()?,
    };

    if ctx.is_json() {
        let mut rows = Vec::with_capacity(ids.len());
        for id in &ids {
            rows.push(PropertyView {
                id: *id,
                property: ctx.registry.get_property(*id)?,
                will_owners: None,
            });
        }
        return ctx.emit_json(&rows);
    }

    if ids.is_empty() {
        ui::print_info("No properties registered");
        return Ok(());
    }
    ui::print_header("Properties");
    for id in ids {
        let details = ctx.registry.get_property(id)?;
        println!("{:>6}  {:<24} {:<12} owner={} expiry={}", id, details.name, details.kind, details.owner, details.expiry);
    }
    Ok(())
}

pub fn transfer(ctx: &CommandContext, id: PropertyId, to: &PrincipalId) -> Result<()> {
    ctx.registry.transfer_property(ctx.caller()?, id, to)?;
    report(ctx, id, &format!("Transferred property {} to {}", id, to))
}

pub fn expire(ctx: &CommandContext, id: PropertyId) -> Result<()> {
    ctx.registry.expire_property(ctx.caller()?, id)?;
    report(ctx, id, &format!("Property {} expired and cleared", id))
}

pub fn delete(ctx: &CommandContext, id: PropertyId, assume_yes: bool) -> Result<()> {
    let caller = ctx.caller()?;
    if !assume_yes && !ctx.is_json() {
        let proceed = ui::confirm(&format!("Delete property {}? This cannot be undone", id))
            .map_err(|e| anyhow!("Failed to read confirmation: {}", e))?;
        if !proceed {
            ui::print_info("Deletion cancelled");
            return Ok(());
        }
    }
    ctx.registry.delete_property(caller, id)?;
    report(ctx, id, &format!("Property {} deleted", id))
}

/// Which descriptive field `set-*` commands update
pub enum Field<'a> {
    PriceAndValue(u128, u128),
    Location(&'a str),
    Description(&'a str),
    Kind(&'a str),
    Name(&'a str),
}

pub fn update_field(ctx: &CommandContext, id: PropertyId, field: Field<'_>) -> Result<()> {
    let caller = ctx.caller()?;
    let label = match field {
        Field::PriceAndValue(price, value) => {
            ctx.registry.update_price_and_value(caller, id, price, value)?;
            "price and value"
        }
        Field::Location(location) => {
            ctx.registry.update_location(caller, id, location)?;
            "location"
        }
        Field::Description(description) => {
            ctx.registry.update_description(caller, id, description)?;
            "description"
        }
        Field::Kind(kind) => {
            ctx.registry.update_kind(caller, id, kind)?;
            "kind"
        }
        Field::Name(name) => {
            ctx.registry.update_name(caller, id, name)?;
            "name"
        }
    };
    report(ctx, id, &format!("Updated {} of property {}", label, id))
}

pub(super) fn report(ctx: &CommandContext, id: PropertyId, message: &str) -> Result<()> {
    if ctx.is_json() {
        return ctx.emit_json(&json!({ "id": id, "ok": true }));
    }
    ui::print_success(message);
    Ok(())
}
