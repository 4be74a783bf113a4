use crate::commands::print_json;
use anyhow::Result;
use clap::{Args, Subcommand};
use deercheck_core::dto::PhoneDto;

#[derive(Debug, Subcommand)]
pub enum PhoneCommand {
    /// Print the canonical digit string
    Normalize(PhoneArgs),
    /// Print the number as (AAA) PPP-LLLL
    Format(PhoneArgs),
    /// Print the search pattern used to match stored numbers
    Pattern(PhoneArgs),
}

#[derive(Debug, Args)]
pub struct PhoneArgs {
    pub phone: String,
}

pub fn run(cmd: PhoneCommand, json: bool) -> Result<()> {
    let (dto, text) = match cmd {
        PhoneCommand::Normalize(args) => {
            let dto = PhoneDto::from_input(&args.phone);
            let text = dto.normalized.clone();
            (dto, text)
        }
        PhoneCommand::Format(args) => {
            let dto = PhoneDto::from_input(&args.phone);
            let text = dto.display.clone();
            (dto, text)
        }
        PhoneCommand::Pattern(args) => {
            let dto = PhoneDto::from_input(&args.phone);
            let text = dto.pattern.clone();
            (dto, text)
        }
    };
    if json {
        print_json(&dto)?;
    } else {
        println!("{text}");
        if !dto.valid {
            tracing::debug!(digits = dto.normalized.len(), "phone is not 10 digits");
        }
    }
    Ok(())
}
