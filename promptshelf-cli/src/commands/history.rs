//! Variable history commands

use crate::cli::HistoryCommands;
use crate::context::CliContext;
use crate::display::history_table;
use anyhow::{bail, Result};
use colored::Colorize;

pub async fn run(ctx: &mut CliContext, command: HistoryCommands) -> Result<()> {
    match command {
        HistoryCommands::List { name } => {
            let history = ctx.library.history();
            let names: Vec<&str> = match &name {
                Some(name) => vec![name.as_str()],
                None => history.names().collect(),
            };
            if names.iter().all(|name| history.values(name).is_empty()) {
                println!("No remembered values");
                return Ok(());
            }
            println!("{}", history_table(history, names));
            Ok(())
        }
        HistoryCommands::Delete { name, index } => {
            let Some(position) = index.checked_sub(1) else {
                bail!("History entries are numbered from 1");
            };
            match ctx.library.delete_history_value(&name, position).await? {
                Some(value) => {
                    println!("{} '{}' from {}", "Forgot".green(), value, name);
                    Ok(())
                }
                None => bail!("No entry {index} in the history of '{name}'"),
            }
        }
    }
}
