//! Tree browsing and editing commands

use crate::context::CliContext;
use crate::display::{node_details, render_tree};
use anyhow::{bail, Result};
use colored::Colorize;
use promptshelf_library::{MoveOutcome, MovePosition, Node};

fn contains_prompt(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node.children() {
        Some(children) => contains_prompt(children),
        None => true,
    })
}

pub fn list(ctx: &CliContext, filter: Option<&str>, all: bool) -> Result<()> {
    let forest = ctx.library.forest();
    if forest.is_empty() {
        println!("The library is empty. Add something with `shelf add-folder` or `shelf add-prompt`.");
        return Ok(());
    }

    let outline = match filter {
        Some(query) => {
            let view = forest.filtered(query);
            if !contains_prompt(&view) {
                println!("No prompts match '{query}'");
                return Ok(());
            }
            render_tree(&view, true)
        }
        None => render_tree(forest.roots(), all),
    };
    println!("{outline}");
    Ok(())
}

pub fn show(ctx: &CliContext, id: &str) -> Result<()> {
    let Some(node) = ctx.library.forest().find(id) else {
        bail!("No prompt or folder with id {id}");
    };
    println!("{}", node_details(node));
    if let Some(parent) = ctx.library.forest().find_parent(id) {
        println!("\n{} {}", "In folder:".dimmed(), parent.title);
    }
    Ok(())
}

pub async fn add_folder(ctx: &mut CliContext, parent: Option<&str>, title: &str) -> Result<()> {
    let id = ctx.library.add_folder(parent, title).await?;
    println!("{} folder {}", "Created".green(), id);
    Ok(())
}

pub async fn add_prompt(
    ctx: &mut CliContext,
    parent: Option<&str>,
    title: &str,
    content: &str,
) -> Result<()> {
    let id = ctx.library.add_prompt(parent, title, content).await?;
    println!("{} prompt {}", "Created".green(), id);
    Ok(())
}

pub async fn rename(ctx: &mut CliContext, id: &str, title: &str) -> Result<()> {
    if !ctx.library.rename(id, title).await? {
        bail!("No prompt or folder with id {id}");
    }
    println!("{} {}", "Renamed".green(), id);
    Ok(())
}

pub async fn edit(ctx: &mut CliContext, id: &str, content: &str) -> Result<()> {
    if !ctx.library.set_content(id, content).await? {
        bail!("No prompt with id {id}");
    }
    println!("{} {}", "Updated".green(), id);
    Ok(())
}

pub async fn delete(ctx: &mut CliContext, id: &str) -> Result<()> {
    match ctx.library.remove(id).await? {
        Some(node) => {
            println!("{} '{}'", "Deleted".green(), node.title());
            Ok(())
        }
        None => bail!("No prompt or folder with id {id}"),
    }
}

pub async fn toggle(ctx: &mut CliContext, id: &str) -> Result<()> {
    match ctx.library.toggle_open(id).await? {
        Some(true) => println!("Opened {id}"),
        Some(false) => println!("Closed {id}"),
        None => bail!("No folder with id {id}"),
    }
    Ok(())
}

pub async fn favorite(ctx: &mut CliContext, id: &str, favorite: bool) -> Result<()> {
    if !ctx.library.set_favorite(id, favorite).await? {
        bail!("No prompt or folder with id {id}");
    }
    let verb = if favorite { "Starred" } else { "Unstarred" };
    println!("{} {}", verb.green(), id);
    Ok(())
}

pub async fn move_node(
    ctx: &mut CliContext,
    source: &str,
    target: &str,
    position: MovePosition,
) -> Result<()> {
    match ctx.library.move_node(source, target, position).await? {
        MoveOutcome::Moved => {
            println!("{} {source} {position} {target}", "Moved".green());
            Ok(())
        }
        MoveOutcome::SelfMove => bail!("A node cannot be moved relative to itself"),
        MoveOutcome::SourceNotFound => bail!("No prompt or folder with id {source}"),
        MoveOutcome::TargetNotFound => bail!("No prompt or folder with id {target}"),
        MoveOutcome::TargetNotFolder => bail!("Cannot move inside {target}: it is not a folder"),
        MoveOutcome::TargetInsideSource => {
            bail!("Cannot move {source} into its own subtree")
        }
    }
}

pub async fn duplicate(ctx: &mut CliContext, id: &str) -> Result<()> {
    match ctx.library.duplicate(id).await? {
        Some(copy) => {
            println!("{} {} as {}", "Duplicated".green(), id, copy);
            Ok(())
        }
        None => bail!("No prompt or folder with id {id}"),
    }
}
