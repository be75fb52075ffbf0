//! Interactive variable resolution
//!
//! Reads one answer per wizard step with dialoguer. Lines starting with `!`
//! are commands rather than values; `!!` submits the rest of the line with a
//! single leading `!`.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use promptshelf_library::{
    InjectionSession, LibraryError, LibraryState, SessionStep, VariableDeclaration, WizardEvent,
};
use std::collections::HashMap;
use tracing::debug;

/// What the user typed at a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Value(String),
    Back,
    Cancel,
    /// Remove history entry at this 0-based index
    Forget(usize),
    /// Unrecognized `!` command
    Unknown(String),
}

impl UserInput {
    /// Interpret a line of input, resolving `!N` against the history chips
    pub fn parse(line: &str, history: &[String]) -> Self {
        if let Some(literal) = line.trim_start().strip_prefix("!!") {
            return UserInput::Value(format!("!{literal}"));
        }
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('!') else {
            return UserInput::Value(line.to_string());
        };

        match command.trim() {
            "back" | "b" => UserInput::Back,
            "cancel" | "c" | "q" => UserInput::Cancel,
            other => {
                if let Some(index) = other.strip_prefix("forget") {
                    return match chip_index(index.trim(), history) {
                        Some(index) => UserInput::Forget(index),
                        None => UserInput::Unknown(trimmed.to_string()),
                    };
                }
                match chip_index(other, history) {
                    Some(index) => UserInput::Value(history[index].clone()),
                    None => UserInput::Unknown(trimmed.to_string()),
                }
            }
        }
    }
}

/// 1-based chip number to index, `None` when out of range
fn chip_index(raw: &str, history: &[String]) -> Option<usize> {
    let number: usize = raw.parse().ok()?;
    (1..=history.len()).contains(&number).then(|| number - 1)
}

/// Back steps needed to reach the closest earlier variable not answered by
/// a preset, or `None` when every earlier variable has one
fn back_distance(
    declarations: &[VariableDeclaration],
    number: usize,
    presets: &HashMap<String, String>,
) -> Option<usize> {
    let earlier = declarations.get(..number.saturating_sub(1)).unwrap_or(&[]);
    earlier
        .iter()
        .rev()
        .position(|declaration| !presets.contains_key(&declaration.name))
        .map(|position| position + 1)
}

/// Drive a session to completion or cancellation
///
/// Variables listed in `presets` are answered without asking. With
/// `interactive` off, every other variable is submitted empty so its
/// default applies.
pub async fn resolve(
    library: &mut LibraryState,
    session: &mut InjectionSession,
    presets: &HashMap<String, String>,
    interactive: bool,
) -> Result<()> {
    let theme = ColorfulTheme::default();

    while let Some(current) = session.step(library.history()) {
        if let Some(value) = presets.get(&current.step.name) {
            debug!("Using preset value for '{}'", current.step.name);
            library
                .advance(session, WizardEvent::Submit(value.clone()))
                .await?;
            continue;
        }

        if !interactive {
            library
                .advance(session, WizardEvent::Submit(String::new()))
                .await?;
            continue;
        }

        let back = back_distance(session.declarations(), current.step.number, presets);
        show_step(&current, back.is_some());
        let line: String = Input::with_theme(&theme)
            .with_prompt(current.step.name.clone())
            .with_initial_text(current.step.prefill.clone())
            .allow_empty(true)
            .interact_text()?;

        let event = match UserInput::parse(&line, &current.history) {
            UserInput::Value(value) => WizardEvent::Submit(value),
            UserInput::Back => {
                let Some(distance) = back else {
                    eprintln!(
                        "{} no earlier variable to change, the ones before this were set with --var",
                        "!".yellow()
                    );
                    continue;
                };
                if distance > 1 {
                    eprintln!(
                        "{} skipping {} variable(s) set with --var",
                        "!".yellow(),
                        distance - 1
                    );
                }
                for _ in 1..distance {
                    library.advance(session, WizardEvent::Back).await?;
                }
                WizardEvent::Back
            }
            UserInput::Cancel => WizardEvent::Cancel,
            UserInput::Forget(index) => {
                library
                    .delete_history_value(&current.step.name, index)
                    .await?;
                continue;
            }
            UserInput::Unknown(command) => {
                eprintln!("{} unknown command {}", "!".yellow(), command);
                continue;
            }
        };

        match library.advance(session, event).await {
            Ok(()) => {}
            Err(
                err @ (LibraryError::EmptyValue { .. } | LibraryError::BackUnavailable),
            ) => eprintln!("{} {}", "!".yellow(), err),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn show_step(current: &SessionStep, can_go_back: bool) {
    let step = &current.step;
    let mut header = format!("[{}/{}] {}", step.number, step.total, step.name.bold());
    if !step.default_value.is_empty() {
        header.push_str(&format!(" (default: {})", step.default_value));
    }
    eprintln!("{header}");

    for (index, value) in current.history.iter().enumerate() {
        eprintln!("  {} {}", format!("!{}", index + 1).cyan(), value);
    }

    let mut hints = Vec::new();
    if can_go_back {
        hints.push("!back");
    }
    hints.push("!cancel");
    if !current.history.is_empty() {
        hints.push("!forget N");
    }
    hints.push("!!text");
    eprintln!("  {}", hints.join("  ").dimmed());
}
