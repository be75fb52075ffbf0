//! A single prompt injection in progress

use crate::error::{LibraryError, Result};
use crate::history::VariableHistory;
use crate::ids::NodeId;
use crate::wizard::{ResolutionWizard, WizardStatus, WizardStep};
use promptshelf_templating::{parse_declarations, substitute, VariableDeclaration};

/// The current wizard step together with the history chips for its variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStep {
    pub step: WizardStep,
    /// Previously entered values, newest first
    pub history: Vec<String>,
}

/// Resolution of one prompt's variables, created by
/// [`LibraryState::begin_injection`](crate::LibraryState::begin_injection)
///
/// The session keeps its own copy of the prompt text, so edits to the
/// prompt while the wizard is open don't affect what gets injected.
#[derive(Debug, Clone)]
pub struct InjectionSession {
    prompt_id: NodeId,
    title: String,
    content: String,
    wizard: ResolutionWizard,
}

impl InjectionSession {
    pub(crate) fn new(prompt_id: NodeId, title: String, content: String) -> Self {
        let wizard = ResolutionWizard::new(parse_declarations(&content));
        Self {
            prompt_id,
            title,
            content,
            wizard,
        }
    }

    pub fn prompt_id(&self) -> &NodeId {
        &self.prompt_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn declarations(&self) -> &[VariableDeclaration] {
        self.wizard.declarations()
    }

    pub fn status(&self) -> &WizardStatus {
        self.wizard.status()
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.wizard.status(), WizardStatus::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.wizard.status(), WizardStatus::Cancelled)
    }

    pub(crate) fn wizard_mut(&mut self) -> &mut ResolutionWizard {
        &mut self.wizard
    }

    /// Current step plus the history for its variable
    pub fn step(&self, history: &VariableHistory) -> Option<SessionStep> {
        let step = self.wizard.step()?;
        let history = history.values(&step.name).to_vec();
        Some(SessionStep { step, history })
    }

    /// Final text with every answered placeholder replaced
    pub fn render(&self) -> Result<String> {
        match self.wizard.status() {
            WizardStatus::Completed(answers) => Ok(substitute(&self.content, answers)?),
            WizardStatus::Cancelled => Err(LibraryError::InjectionCancelled),
            WizardStatus::AwaitingInput(_) => Err(LibraryError::Injection(format!(
                "variables of '{}' are not resolved yet",
                self.title
            ))),
        }
    }
}
