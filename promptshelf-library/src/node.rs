//! Tree node types
//!
//! Serialized as internally tagged JSON (`"type": "folder" | "prompt"`) with
//! camelCase fields, the same shape the side panel has always stored.

use crate::ids::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A container of other nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: NodeId,
    pub title: String,
    /// Expansion state in the tree view
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,
}

impl Folder {
    /// Create an empty, open folder with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            title: title.into(),
            is_open: true,
            children: Vec::new(),
            is_favorite: false,
        }
    }
}

/// A leaf holding template text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: NodeId,
    pub title: String,
    /// Raw template text, may contain `{{name}}` placeholders
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,
}

impl Prompt {
    /// Create a prompt with a fresh id and no usage recorded
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::generate(),
            title: title.into(),
            content: content.into(),
            use_count: None,
            last_used: None,
            is_favorite: false,
        }
    }

    /// Bump the use counter and stamp the time of use
    pub fn record_use(&mut self, at: DateTime<Utc>) -> u64 {
        let count = self.use_count.unwrap_or(0) + 1;
        self.use_count = Some(count);
        self.last_used = Some(at);
        count
    }
}

/// An entry of the prompt tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    Prompt(Prompt),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Folder(folder) => &folder.id,
            Node::Prompt(prompt) => &prompt.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.title,
            Node::Prompt(prompt) => &prompt.title,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        match self {
            Node::Folder(folder) => folder.title = title.into(),
            Node::Prompt(prompt) => prompt.title = title.into(),
        }
    }

    pub fn is_favorite(&self) -> bool {
        match self {
            Node::Folder(folder) => folder.is_favorite,
            Node::Prompt(prompt) => prompt.is_favorite,
        }
    }

    pub fn set_favorite(&mut self, favorite: bool) {
        match self {
            Node::Folder(folder) => folder.is_favorite = favorite,
            Node::Prompt(prompt) => prompt.is_favorite = favorite,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Prompt(_) => None,
        }
    }

    pub fn as_prompt(&self) -> Option<&Prompt> {
        match self {
            Node::Prompt(prompt) => Some(prompt),
            Node::Folder(_) => None,
        }
    }

    pub fn as_prompt_mut(&mut self) -> Option<&mut Prompt> {
        match self {
            Node::Prompt(prompt) => Some(prompt),
            Node::Folder(_) => None,
        }
    }

    /// Children of a folder, `None` for prompts
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Folder(folder) => Some(&folder.children),
            Node::Prompt(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Folder(folder) => Some(&mut folder.children),
            Node::Prompt(_) => None,
        }
    }

    /// Case-insensitive match on the title, and on the content of prompts
    pub fn matches(&self, query_lower: &str) -> bool {
        if self.title().to_lowercase().contains(query_lower) {
            return true;
        }
        self.as_prompt()
            .map(|prompt| prompt.content.to_lowercase().contains(query_lower))
            .unwrap_or(false)
    }

    /// Give this node and all its descendants fresh ids and clear usage data
    pub(crate) fn reissue(&mut self) {
        match self {
            Node::Folder(folder) => {
                folder.id = NodeId::generate();
                folder.children.iter_mut().for_each(Node::reissue);
            }
            Node::Prompt(prompt) => {
                prompt.id = NodeId::generate();
                prompt.use_count = None;
                prompt.last_used = None;
            }
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}

impl From<Prompt> for Node {
    fn from(prompt: Prompt) -> Self {
        Node::Prompt(prompt)
    }
}
