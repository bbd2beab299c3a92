use anyhow::{Result, bail};
use colored::Colorize;
use veil_core::gateway::Gateway;
use veil_core::media::OperationKind;

use crate::context::AppContext;

pub async fn health(ctx: &AppContext) -> Result<()> {
    if ctx.gateway().health_check().await {
        println!("{} {} is reachable", "✓".green(), ctx.config.base_url);
        Ok(())
    } else {
        bail!("{} is not reachable", ctx.config.base_url)
    }
}

pub fn operations() {
    for kind in OperationKind::ALL {
        println!("{}", kind.title().bold());
        println!("  {}", kind.description());

        let mut inputs: Vec<&str> = kind.slots().iter().map(|slot| slot.label()).collect();
        if kind.takes_message() {
            inputs.push("message");
        }
        println!("  inputs: {}", inputs.join(", ").dimmed());
    }
}
