//! Variable listing, injection and copy

use crate::context::CliContext;
use crate::display::variables_table;
use crate::{injectors, prompter};
use anyhow::Result;
use std::collections::HashMap;
use tracing::info;

pub fn vars(ctx: &CliContext, id: &str) -> Result<()> {
    let session = ctx.library.begin_injection(id)?;
    if session.declarations().is_empty() {
        println!("'{}' has no variables", session.title());
        return Ok(());
    }
    println!(
        "{}",
        variables_table(session.declarations(), ctx.library.history())
    );
    Ok(())
}

pub async fn inject(
    ctx: &mut CliContext,
    id: &str,
    presets: HashMap<String, String>,
    no_input: bool,
) -> Result<()> {
    let mut session = ctx.library.begin_injection(id)?;
    let interactive = ctx.interactive && !no_input;
    prompter::resolve(&mut ctx.library, &mut session, &presets, interactive).await?;

    let injector = injectors::from_config(&ctx.config);
    let text = ctx.library.finish_injection(&session, injector.as_ref()).await?;
    info!("Delivered {} characters", text.len());
    Ok(())
}

pub async fn copy(ctx: &mut CliContext, id: &str) -> Result<()> {
    let content = ctx.library.copy_prompt(id).await?;
    to_clipboard(&content)
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn to_clipboard(text: &str) -> Result<()> {
    use colored::Colorize;

    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    eprintln!("{}", "Copied to clipboard".green());
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn to_clipboard(text: &str) -> Result<()> {
    println!("{text}");
    Ok(())
}
