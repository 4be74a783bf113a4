use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{parse_order_id, parse_vars};
use anyhow::Result;
use clap::Args;
use deercheck_core::template::{order_variables, EmailTemplate};

#[derive(Debug, Args)]
pub struct RenderTemplateArgs {
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub body: String,
    /// Fill variables from a stored order (contact and preference fields only)
    #[arg(long)]
    pub order: Option<String>,
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

pub fn render_template(ctx: &Context<'_>, args: RenderTemplateArgs) -> Result<()> {
    let mut vars = match args.order.as_deref() {
        Some(raw) => {
            let id = parse_order_id(raw)?;
            let order = ctx
                .store
                .orders()
                .get(&id)?
                .ok_or_else(|| not_found(format!("order {id}")))?;
            order_variables(&order, &ctx.config.notifications.business_name)
        }
        None => Default::default(),
    };
    vars.entry("businessName".to_string())
        .or_insert_with(|| ctx.config.notifications.business_name.clone());
    vars.extend(parse_vars(&args.vars)?);

    let template = EmailTemplate {
        subject: args.subject,
        body: args.body,
    };
    let missing: Vec<String> = template
        .placeholders()
        .into_iter()
        .filter(|name| !vars.contains_key(name))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "template has unfilled placeholders");
    }

    let rendered = template.render(&vars);
    if ctx.json {
        print_json(&rendered)?;
    } else {
        println!("Subject: {}", rendered.subject);
        println!();
        println!("{}", rendered.body);
    }
    Ok(())
}
