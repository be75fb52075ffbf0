//! Command handlers

mod history;
mod inject;
mod transfer;
mod tree;

use crate::cli::{Commands, ContentSource};
use crate::context::CliContext;
use anyhow::{Context, Result};

/// Run one parsed command against the library
pub async fn run(command: Commands, ctx: &mut CliContext) -> Result<()> {
    match command {
        Commands::List { filter, all } => tree::list(ctx, filter.as_deref(), all),
        Commands::Show { id } => tree::show(ctx, &id),
        Commands::AddFolder { title, parent } => {
            tree::add_folder(ctx, parent.as_deref(), &title).await
        }
        Commands::AddPrompt {
            title,
            source,
            parent,
        } => {
            let content = read_content(source).await?;
            tree::add_prompt(ctx, parent.as_deref(), &title, &content).await
        }
        Commands::Rename { id, title } => tree::rename(ctx, &id, &title).await,
        Commands::Edit { id, source } => {
            let content = read_content(source).await?;
            tree::edit(ctx, &id, &content).await
        }
        Commands::Delete { id } => tree::delete(ctx, &id).await,
        Commands::Toggle { id } => tree::toggle(ctx, &id).await,
        Commands::Favorite { id, off } => tree::favorite(ctx, &id, !off).await,
        Commands::Move {
            source,
            target,
            position,
        } => tree::move_node(ctx, &source, &target, position).await,
        Commands::Duplicate { id } => tree::duplicate(ctx, &id).await,
        Commands::Vars { id } => inject::vars(ctx, &id),
        Commands::Inject { id, vars, no_input } => {
            inject::inject(ctx, &id, vars.into_iter().collect(), no_input).await
        }
        Commands::Copy { id } => inject::copy(ctx, &id).await,
        Commands::History { command } => history::run(ctx, command).await,
        Commands::Export { file } => transfer::export(ctx, &file).await,
        Commands::Import { file } => transfer::import(ctx, &file).await,
    }
}

async fn read_content(source: ContentSource) -> Result<String> {
    match (source.content, source.file) {
        (Some(content), _) => Ok(content),
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => anyhow::bail!("either --content or --file is required"),
    }
}
