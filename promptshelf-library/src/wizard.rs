//! Step-by-step resolution of a prompt's variables
//!
//! [`ResolutionWizard::handle`] is a pure transition: it updates the wizard
//! and returns the effects the caller must apply (recording history). It
//! never touches storage itself.

use crate::error::{LibraryError, Result};
use promptshelf_templating::VariableDeclaration;
use std::collections::HashMap;
use tracing::debug;

/// Input from the user for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Confirm a value for the current variable (trimmed before use)
    Submit(String),
    /// Return to the previous variable
    Back,
    /// Abandon the injection
    Cancel,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    RecordHistory { name: String, value: String },
}

/// Where the wizard stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStatus {
    /// Waiting for the variable at this index
    AwaitingInput(usize),
    /// Every variable has a value
    Completed(HashMap<String, String>),
    Cancelled,
}

impl WizardStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WizardStatus::AwaitingInput(_))
    }
}

/// What the presentation layer shows for the current variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub name: String,
    pub default_value: String,
    /// Value to pre-fill: the earlier answer when revisiting, else the default
    pub prefill: String,
    /// 1-based position
    pub number: usize,
    pub total: usize,
    pub can_go_back: bool,
    pub is_last: bool,
}

#[derive(Debug, Clone)]
pub struct ResolutionWizard {
    declarations: Vec<VariableDeclaration>,
    answers: HashMap<String, String>,
    status: WizardStatus,
}

impl ResolutionWizard {
    /// Start at the first declaration, or complete immediately when there are none
    pub fn new(declarations: Vec<VariableDeclaration>) -> Self {
        let status = if declarations.is_empty() {
            WizardStatus::Completed(HashMap::new())
        } else {
            WizardStatus::AwaitingInput(0)
        };
        Self {
            declarations,
            answers: HashMap::new(),
            status,
        }
    }

    pub fn status(&self) -> &WizardStatus {
        &self.status
    }

    pub fn declarations(&self) -> &[VariableDeclaration] {
        &self.declarations
    }

    /// Answers given so far (empty once cancelled)
    pub fn answers(&self) -> &HashMap<String, String> {
        match &self.status {
            WizardStatus::Completed(answers) => answers,
            _ => &self.answers,
        }
    }

    /// The step awaiting input, `None` in a terminal state
    pub fn step(&self) -> Option<WizardStep> {
        let WizardStatus::AwaitingInput(index) = self.status else {
            return None;
        };
        let declaration = self.declarations.get(index)?;
        let prefill = self
            .answers
            .get(&declaration.name)
            .cloned()
            .unwrap_or_else(|| declaration.default_value.clone());

        Some(WizardStep {
            name: declaration.name.clone(),
            default_value: declaration.default_value.clone(),
            prefill,
            number: index + 1,
            total: self.declarations.len(),
            can_go_back: index > 0,
            is_last: index + 1 == self.declarations.len(),
        })
    }

    /// Apply one event
    ///
    /// Rejected events return an error and leave the wizard unchanged.
    pub fn handle(&mut self, event: WizardEvent) -> Result<Vec<WizardEffect>> {
        let WizardStatus::AwaitingInput(index) = self.status else {
            return Err(LibraryError::WizardFinished);
        };

        match event {
            WizardEvent::Submit(raw) => self.submit(index, raw.trim()),
            WizardEvent::Back => {
                if index == 0 {
                    return Err(LibraryError::BackUnavailable);
                }
                self.status = WizardStatus::AwaitingInput(index - 1);
                Ok(Vec::new())
            }
            WizardEvent::Cancel => {
                debug!("Variable resolution cancelled at step {}", index + 1);
                self.answers.clear();
                self.status = WizardStatus::Cancelled;
                Ok(Vec::new())
            }
        }
    }

    fn submit(&mut self, index: usize, value: &str) -> Result<Vec<WizardEffect>> {
        let declaration = self
            .declarations
            .get(index)
            .ok_or(LibraryError::WizardFinished)?;

        let value = if !value.is_empty() {
            value.to_string()
        } else if declaration.has_default() {
            declaration.default_value.clone()
        } else {
            return Err(LibraryError::EmptyValue {
                name: declaration.name.clone(),
            });
        };

        let name = declaration.name.clone();
        self.answers.insert(name.clone(), value.clone());
        let effects = vec![WizardEffect::RecordHistory { name, value }];

        if index + 1 < self.declarations.len() {
            self.status = WizardStatus::AwaitingInput(index + 1);
        } else {
            self.status = WizardStatus::Completed(std::mem::take(&mut self.answers));
        }
        Ok(effects)
    }
}
