//! Export and import of the whole library

use crate::context::CliContext;
use anyhow::{Context, Result};
use colored::Colorize;
use promptshelf_library::ImportShape;
use std::path::Path;

pub async fn export(ctx: &CliContext, file: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&ctx.library.export())?;
    if file == Path::new("-") {
        println!("{json}");
        return Ok(());
    }
    tokio::fs::write(file, json)
        .await
        .with_context(|| format!("failed to write {}", file.display()))?;
    eprintln!("{} {}", "Exported to".green(), file.display());
    Ok(())
}

pub async fn import(ctx: &mut CliContext, file: &Path) -> Result<()> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let shape = ctx.library.import(&text).await?;
    let note = match shape {
        ImportShape::Legacy => "legacy file, history kept",
        ImportShape::Full => "library and history replaced",
    };
    println!(
        "{} {} nodes ({note})",
        "Imported".green(),
        ctx.library.forest().len()
    );
    Ok(())
}
