//! Text rendering of the tree and of single nodes

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use promptshelf_library::{Node, VariableDeclaration, VariableHistory};

/// Indented outline of `nodes`
///
/// Children of closed folders are skipped unless `expand_all` is set.
pub fn render_tree(nodes: &[Node], expand_all: bool) -> String {
    fn render(nodes: &[Node], depth: usize, expand_all: bool, out: &mut Vec<String>) {
        for node in nodes {
            let indent = "  ".repeat(depth);
            let star = if node.is_favorite() { "★ " } else { "" };
            match node {
                Node::Folder(folder) => {
                    let marker = if folder.is_open { "▾" } else { "▸" };
                    out.push(format!(
                        "{indent}{marker} {star}{}  {}",
                        folder.title.bold(),
                        folder.id.as_str().dimmed()
                    ));
                    if folder.is_open || expand_all {
                        render(&folder.children, depth + 1, expand_all, out);
                    }
                }
                Node::Prompt(prompt) => {
                    out.push(format!(
                        "{indent}• {star}{}  {}",
                        prompt.title,
                        prompt.id.as_str().dimmed()
                    ));
                }
            }
        }
    }

    let mut lines = Vec::new();
    render(nodes, 0, expand_all, &mut lines);
    lines.join("\n")
}

/// Multi-line description of one node
pub fn node_details(node: &Node) -> String {
    let mut lines = vec![
        format!("{} {}", "Title:".bold(), node.title()),
        format!("{} {}", "Id:".bold(), node.id()),
    ];
    match node {
        Node::Folder(folder) => {
            lines.push(format!("{} folder", "Type:".bold()));
            lines.push(format!(
                "{} {}",
                "State:".bold(),
                if folder.is_open { "open" } else { "closed" }
            ));
            lines.push(format!("{} {}", "Children:".bold(), folder.children.len()));
        }
        Node::Prompt(prompt) => {
            lines.push(format!("{} prompt", "Type:".bold()));
            lines.push(format!(
                "{} {}",
                "Uses:".bold(),
                prompt.use_count.unwrap_or(0)
            ));
            if let Some(last_used) = prompt.last_used {
                lines.push(format!(
                    "{} {}",
                    "Last used:".bold(),
                    last_used.format("%Y-%m-%d %H:%M UTC")
                ));
            }
            lines.push(String::new());
            lines.push(prompt.content.clone());
        }
    }
    if node.is_favorite() {
        lines.insert(2, format!("{} yes", "Favorite:".bold()));
    }
    lines.join("\n")
}

/// Table of a prompt's variables with their remembered values
pub fn variables_table(declarations: &[VariableDeclaration], history: &VariableHistory) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Variable", "Default", "History"]);
    for declaration in declarations {
        table.add_row(vec![
            declaration.name.clone(),
            declaration.default_value.clone(),
            history.values(&declaration.name).join(", "),
        ]);
    }
    table
}

/// Table of history values, numbered the way `history delete` expects
pub fn history_table<'a>(history: &VariableHistory, names: impl IntoIterator<Item = &'a str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Variable", "#", "Value"]);
    for name in names {
        for (index, value) in history.values(name).iter().enumerate() {
            table.add_row(vec![name.to_string(), (index + 1).to_string(), value.clone()]);
        }
    }
    table
}
