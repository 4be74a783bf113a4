use crate::commands::{print_json, Context};
use crate::error::{from_lookup, invalid_input};
use crate::util::{now_utc, parse_order_id};
use anyhow::{Context as _, Result};
use clap::Args;
use deercheck_core::dto::ReorderDto;
use deercheck_store::lookup::{previous_order_by_id, previous_order_by_phone};
use deercheck_store::repo::OrderNew;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviousOrderArgs {
    pub order_id: String,
}

#[derive(Debug, Args)]
pub struct FindOrderArgs {
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Args)]
pub struct CheckInArgs {
    /// JSON file holding a single order document
    #[arg(long)]
    pub file: PathBuf,
    /// Keep this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,
}

pub fn previous_order(ctx: &Context<'_>, args: PreviousOrderArgs) -> Result<()> {
    let dto = previous_order_by_id(ctx.store, &args.order_id).map_err(from_lookup)?;
    print_reorder(ctx, &dto)
}

pub fn find_order(ctx: &Context<'_>, args: FindOrderArgs) -> Result<()> {
    let dto = previous_order_by_phone(ctx.store, &args.phone).map_err(from_lookup)?;
    print_reorder(ctx, &dto)
}

pub fn check_in(ctx: &Context<'_>, args: CheckInArgs) -> Result<()> {
    let contents = fs::read_to_string(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse {}", args.file.display()))?;
    if !value.is_object() {
        return Err(invalid_input("order document must be a JSON object"));
    }
    let id = match args.id {
        Some(raw) => Some(parse_order_id(&raw)?),
        None => None,
    };

    let order = ctx
        .store
        .orders()
        .create(now_utc(), OrderNew::from_value(id, value)?)?;

    if ctx.json {
        print_json(&order)?;
    } else {
        println!("checked in {}", order.id);
    }
    Ok(())
}

fn print_reorder(ctx: &Context<'_>, dto: &ReorderDto) -> Result<()> {
    if ctx.json {
        return print_json(dto);
    }
    println!("customer:");
    print_section(&dto.customer_info);
    println!("preferences:");
    print_section(&dto.preferences);
    Ok(())
}

fn print_section(fields: &Map<String, Value>) {
    if fields.is_empty() {
        println!("  (none)");
        return;
    }
    for (key, value) in fields {
        match value {
            Value::String(text) => println!("  {key}: {text}"),
            other => println!("  {key}: {other}"),
        }
    }
}
