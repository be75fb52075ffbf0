//! Command line definition

use clap::{Args, Parser, Subcommand};
use promptshelf_library::MovePosition;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version)]
#[command(about = "A folder tree of reusable prompts with {{variable}} templates")]
#[command(long_about = "
shelf keeps your prompts in a folder tree and fills in their {{name}} and
{{name|default}} placeholders one variable at a time before handing the
text to its destination.

Example usage:
  shelf add-folder Work
  shelf add-prompt \"Code review\" --content \"Review this {{lang}} code\" --parent <id>
  shelf list
  shelf inject <id> --var lang=rust
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable trace logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Store directory, overriding the configured data_dir
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the prompt tree
    List {
        /// Only prompts whose title or content contains this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Also show the contents of closed folders
        #[arg(short, long)]
        all: bool,
    },
    /// Show a prompt or folder
    Show { id: String },
    /// Create a folder
    AddFolder {
        title: String,
        /// Folder to create it in (root when omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Create a prompt
    AddPrompt {
        title: String,
        #[command(flatten)]
        source: ContentSource,
        /// Folder to create it in (root when omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Change a title
    Rename { id: String, title: String },
    /// Replace a prompt's text
    Edit {
        id: String,
        #[command(flatten)]
        source: ContentSource,
    },
    /// Delete a prompt or a folder with everything in it
    Delete { id: String },
    /// Open or close a folder
    Toggle { id: String },
    /// Mark as favorite (listed first when filtering)
    Favorite {
        id: String,
        /// Remove the mark instead
        #[arg(long)]
        off: bool,
    },
    /// Move a node before, after or inside another
    Move {
        source: String,
        target: String,
        #[arg(short, long, default_value = "inside")]
        position: MovePosition,
    },
    /// Copy a node (and its subtree) next to the original
    Duplicate { id: String },
    /// List the variables of a prompt
    Vars { id: String },
    /// Fill in a prompt's variables and deliver the result
    ///
    /// At each variable: Enter accepts the shown value, `!back` returns to the
    /// previous variable, `!cancel` stops, `!N` picks history entry N and
    /// `!forget N` removes it.
    Inject {
        id: String,
        /// Answer a variable up front (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Never prompt; unanswered variables take their default
        #[arg(long)]
        no_input: bool,
    },
    /// Print a prompt's raw text
    Copy { id: String },
    /// Inspect or prune remembered variable values
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Write the library and history to a JSON file
    Export {
        /// Output path, `-` for stdout
        file: PathBuf,
    },
    /// Replace the library with the contents of a JSON file
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// Show remembered values, newest first
    List { name: Option<String> },
    /// Forget one value (index as shown by `history list`, starting at 1)
    Delete { name: String, index: usize },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ContentSource {
    /// Prompt text
    #[arg(short, long)]
    pub content: Option<String>,
    /// Read the prompt text from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    Ok((name.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(
            parse_var("lang=rust=fast").unwrap(),
            ("lang".to_string(), "rust=fast".to_string())
        );
        assert!(parse_var("novalue").is_err());
    }

    #[test]
    fn test_move_position_parsing() {
        let cli = Cli::try_parse_from(["shelf", "move", "a", "b", "--position", "before"]).unwrap();
        match cli.command {
            Commands::Move { position, .. } => assert_eq!(position, MovePosition::Before),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["shelf", "move", "a", "b", "-p", "below"]).is_err());
    }

    #[test]
    fn test_content_source_is_required() {
        assert!(Cli::try_parse_from(["shelf", "add-prompt", "Title"]).is_err());
        assert!(Cli::try_parse_from([
            "shelf", "add-prompt", "Title", "--content", "x", "--file", "y"
        ])
        .is_err());
    }
}
