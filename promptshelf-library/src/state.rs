//! The library as a whole: forest, history and the store they live in
//!
//! Every mutation saves the record it touched before returning. Tree
//! writes also stamp `lastModified`. Tree and history are separate records
//! with no transaction across them.

use crate::error::{LibraryError, Result};
use crate::history::{VariableHistory, DEFAULT_HISTORY_CAPACITY};
use crate::ids::NodeId;
use crate::injector::TextInjector;
use crate::node::{Folder, Node, Prompt};
use crate::session::InjectionSession;
use crate::storage::KeyValueStore;
use crate::transfer::{parse_import, ImportShape, LibraryExport};
use crate::tree::{Forest, MoveOutcome, MovePosition};
use crate::wizard::{WizardEffect, WizardEvent};
use chrono::{DateTime, TimeZone, Utc};
use promptshelf_common::Pretty;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Store key of the prompt forest
pub const TREE_KEY: &str = "promptTree";
/// Store key of the variable history map
pub const HISTORY_KEY: &str = "varHistory";
/// Store key of the last tree save time
pub const LAST_MODIFIED_KEY: &str = "lastModified";

pub struct LibraryState {
    forest: Forest,
    history: VariableHistory,
    last_modified: Option<DateTime<Utc>>,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LibraryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryState")
            .field("nodes", &self.forest.len())
            .field("history", &self.history)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

impl LibraryState {
    /// Read the library from `store`; missing records start empty
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Self::load_with_capacity(store, DEFAULT_HISTORY_CAPACITY).await
    }

    /// Like [`load`](Self::load), keeping at most `history_capacity` values
    /// per variable
    ///
    /// The bound is applied to the stored lists as they are read.
    pub async fn load_with_capacity(
        store: Arc<dyn KeyValueStore>,
        history_capacity: usize,
    ) -> Result<Self> {
        let forest = match store.get(TREE_KEY).await? {
            None | Some(Value::Null) => Forest::new(),
            Some(value) => serde_json::from_value(value)?,
        };
        let history = match store.get(HISTORY_KEY).await? {
            None | Some(Value::Null) => VariableHistory::with_capacity(history_capacity),
            Some(value) => VariableHistory::from_raw(serde_json::from_value(value)?, history_capacity),
        };
        let last_modified = store
            .get(LAST_MODIFIED_KEY)
            .await?
            .as_ref()
            .and_then(parse_timestamp);

        debug!(
            "Loaded library with {} nodes and {} history names",
            forest.len(),
            history.names().count()
        );
        Ok(Self {
            forest,
            history,
            last_modified,
            store,
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn history(&self) -> &VariableHistory {
        &self.history
    }

    /// Time of the last tree save, if any
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    async fn save_tree(&mut self) -> Result<()> {
        let now = Utc::now();
        self.store
            .set(TREE_KEY, serde_json::to_value(&self.forest)?)
            .await?;
        self.store
            .set(LAST_MODIFIED_KEY, Value::from(now.timestamp_millis()))
            .await?;
        self.last_modified = Some(now);
        Ok(())
    }

    async fn save_history(&self) -> Result<()> {
        self.store
            .set(HISTORY_KEY, serde_json::to_value(&self.history)?)
            .await
    }

    /// Add an open, empty folder at the root or at the end of `parent`
    pub async fn add_folder(&mut self, parent: Option<&str>, title: &str) -> Result<NodeId> {
        let folder = Folder::new(validate_title(title)?);
        self.insert(parent, folder.into()).await
    }

    /// Add a prompt at the root or at the end of `parent`
    pub async fn add_prompt(
        &mut self,
        parent: Option<&str>,
        title: &str,
        content: &str,
    ) -> Result<NodeId> {
        let prompt = Prompt::new(validate_title(title)?, content);
        self.insert(parent, prompt.into()).await
    }

    async fn insert(&mut self, parent: Option<&str>, node: Node) -> Result<NodeId> {
        let id = node.id().clone();
        match parent {
            None => self.forest.push_root(node),
            Some(parent_id) => match self.forest.find(parent_id) {
                None => return Err(LibraryError::node_not_found(parent_id)),
                Some(Node::Prompt(_)) => {
                    return Err(LibraryError::NotAFolder {
                        id: parent_id.to_string(),
                    })
                }
                Some(Node::Folder(_)) => {
                    if self.forest.push_child(parent_id, node).is_err() {
                        return Err(LibraryError::node_not_found(parent_id));
                    }
                }
            },
        }
        debug!("Added node {} under {}", id, parent.unwrap_or("root"));
        self.save_tree().await?;
        Ok(id)
    }

    /// Retitle a node; `false` when `id` is unknown
    pub async fn rename(&mut self, id: &str, title: &str) -> Result<bool> {
        let title = validate_title(title)?;
        if !self.forest.rename(id, title) {
            return Ok(false);
        }
        debug!("Renamed {id}");
        self.save_tree().await?;
        Ok(true)
    }

    /// Replace a prompt's text; `false` for unknown ids and folders
    pub async fn set_content(&mut self, id: &str, content: &str) -> Result<bool> {
        if !self.forest.set_content(id, content) {
            return Ok(false);
        }
        debug!("Updated content of {id}");
        self.save_tree().await?;
        Ok(true)
    }

    /// Delete a node and its subtree, returning what was removed
    pub async fn remove(&mut self, id: &str) -> Result<Option<Node>> {
        let Some(removed) = self.forest.remove(id) else {
            return Ok(None);
        };
        debug!("Removed {} ('{}')", id, removed.title());
        self.save_tree().await?;
        Ok(Some(removed))
    }

    /// Flip a folder open or closed
    pub async fn toggle_open(&mut self, id: &str) -> Result<Option<bool>> {
        let Some(open) = self.forest.toggle_open(id) else {
            return Ok(None);
        };
        self.save_tree().await?;
        Ok(Some(open))
    }

    pub async fn set_favorite(&mut self, id: &str, favorite: bool) -> Result<bool> {
        if !self.forest.set_favorite(id, favorite) {
            return Ok(false);
        }
        self.save_tree().await?;
        Ok(true)
    }

    /// Move a node; only a [`MoveOutcome::Moved`] result is saved
    pub async fn move_node(
        &mut self,
        source_id: &str,
        target_id: &str,
        position: MovePosition,
    ) -> Result<MoveOutcome> {
        let outcome = self.forest.move_node(source_id, target_id, position);
        if outcome.is_moved() {
            debug!("Moved {source_id} {position} {target_id}");
            self.save_tree().await?;
        } else {
            warn!("Move of {source_id} {position} {target_id} ignored: {outcome:?}");
        }
        Ok(outcome)
    }

    /// Copy a subtree next to the original, returning the copy's id
    pub async fn duplicate(&mut self, id: &str) -> Result<Option<NodeId>> {
        let Some(copy_id) = self.forest.duplicate(id) else {
            return Ok(None);
        };
        debug!("Duplicated {id} as {copy_id}");
        self.save_tree().await?;
        Ok(Some(copy_id))
    }

    /// Remove one history value and persist the history
    pub async fn delete_history_value(&mut self, name: &str, index: usize) -> Result<Option<String>> {
        let Some(removed) = self.history.delete_value(name, index) else {
            return Ok(None);
        };
        self.save_history().await?;
        Ok(Some(removed))
    }

    /// Start resolving the variables of a prompt
    pub fn begin_injection(&self, id: &str) -> Result<InjectionSession> {
        match self.forest.find(id) {
            Some(Node::Prompt(prompt)) => {
                let session = InjectionSession::new(
                    prompt.id.clone(),
                    prompt.title.clone(),
                    prompt.content.clone(),
                );
                debug!(
                    "Injection of '{}' needs {} variables",
                    prompt.title,
                    session.declarations().len()
                );
                Ok(session)
            }
            Some(Node::Folder(_)) => Err(LibraryError::NotAPrompt { id: id.to_string() }),
            None => Err(LibraryError::node_not_found(id)),
        }
    }

    /// Feed one event to a session's wizard
    ///
    /// Values it reports are recorded in the history, which is saved
    /// right away. A cancel later on doesn't undo them.
    pub async fn advance(&mut self, session: &mut InjectionSession, event: WizardEvent) -> Result<()> {
        let effects = session.wizard_mut().handle(event)?;
        if effects.is_empty() {
            return Ok(());
        }
        for effect in effects {
            match effect {
                WizardEffect::RecordHistory { name, value } => {
                    self.history.record_value(&name, &value);
                }
            }
        }
        self.save_history().await
    }

    /// Substitute the answers, deliver the text and count the use
    ///
    /// Usage is recorded only after the injector succeeds.
    pub async fn finish_injection(
        &mut self,
        session: &InjectionSession,
        injector: &dyn TextInjector,
    ) -> Result<String> {
        let text = match session.render() {
            Ok(text) => text,
            Err(err) => {
                warn!("Injection of '{}' not delivered: {}", session.title(), err);
                return Err(err);
            }
        };
        injector.inject(&text).await?;
        info!("Injected '{}' ({} chars)", session.title(), text.chars().count());

        if self.forest.record_usage(session.prompt_id(), Utc::now()).is_some() {
            self.save_tree().await?;
        } else {
            warn!("Prompt {} disappeared before its use was recorded", session.prompt_id());
        }
        Ok(text)
    }

    /// Raw prompt text for the clipboard; counts as a use
    pub async fn copy_prompt(&mut self, id: &str) -> Result<String> {
        let content = match self.forest.find(id) {
            Some(Node::Prompt(prompt)) => prompt.content.clone(),
            Some(Node::Folder(_)) => return Err(LibraryError::NotAPrompt { id: id.to_string() }),
            None => return Err(LibraryError::node_not_found(id)),
        };
        self.forest.record_usage(id, Utc::now());
        self.save_tree().await?;
        Ok(content)
    }

    /// Snapshot of the whole library
    pub fn export(&self) -> LibraryExport {
        info!("Exporting {} nodes", self.forest.len());
        LibraryExport {
            forest: self.forest.clone(),
            variable_history: self.history.clone(),
        }
    }

    /// Replace the library with the contents of an import file
    ///
    /// Nothing changes when validation fails. A legacy file replaces only
    /// the forest.
    pub async fn import(&mut self, text: &str) -> Result<ImportShape> {
        let imported = parse_import(text, self.history.capacity())?;
        info!(
            "Importing {} nodes ({:?} file)",
            imported.forest.len(),
            imported.shape
        );

        self.forest = imported.forest;
        self.save_tree().await?;
        if let Some(history) = imported.history {
            self.history.replace_with(history);
            debug!("Imported history: {}", Pretty(&self.history));
            self.save_history().await?;
        }
        Ok(imported.shape)
    }
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        warn!("Rejected empty title");
        return Err(LibraryError::EmptyTitle);
    }
    Ok(title)
}

/// `lastModified` is epoch milliseconds; RFC 3339 strings are read too
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => Utc.timestamp_millis_opt(number.as_i64()?).single(),
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|time| time.with_timezone(&Utc)),
        _ => None,
    }
}
