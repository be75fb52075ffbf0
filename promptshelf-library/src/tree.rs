//! The prompt forest and its mutation primitives
//!
//! Nodes are owned directly by their parent collection. Every structural
//! change goes through a node path (indices from the root), so a move is a
//! [`Forest::detach`] that hands out the owned subtree followed by a
//! [`Forest::attach`] that consumes it. A subtree that can't be attached is
//! returned to the caller, never dropped.

use crate::ids::NodeId;
use crate::node::{Folder, Node, Prompt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a moved node lands relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePosition {
    /// Sibling directly before the target
    Before,
    /// Sibling directly after the target
    After,
    /// Last child of the target folder
    Inside,
}

impl FromStr for MovePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(MovePosition::Before),
            "after" => Ok(MovePosition::After),
            "inside" => Ok(MovePosition::Inside),
            other => Err(format!("unknown position '{other}'")),
        }
    }
}

impl fmt::Display for MovePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovePosition::Before => "before",
            MovePosition::After => "after",
            MovePosition::Inside => "inside",
        };
        f.write_str(name)
    }
}

/// Result of [`Forest::move_node`]
///
/// Only [`MoveOutcome::Moved`] changes the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    SelfMove,
    SourceNotFound,
    TargetNotFound,
    /// `inside` was requested on a prompt
    TargetNotFolder,
    /// The target lives inside the subtree being moved
    TargetInsideSource,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }
}

/// A subtree removed from the forest, waiting to be attached again
#[derive(Debug)]
#[must_use = "a detached subtree is lost unless it is attached or restored"]
pub struct DetachedSubtree {
    node: Node,
    origin: Vec<usize>,
}

impl DetachedSubtree {
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }
}

/// Ordered forest of folders and prompts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    nodes: Vec<Node>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root nodes in display order
    pub fn roots(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    /// Depth-first listing of every node with its depth (roots are depth 0)
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        fn visit<'a>(nodes: &'a [Node], depth: usize, out: &mut Vec<(usize, &'a Node)>) {
            for node in nodes {
                out.push((depth, node));
                if let Some(children) = node.children() {
                    visit(children, depth + 1, out);
                }
            }
        }

        let mut out = Vec::new();
        visit(&self.nodes, 0, &mut out);
        out
    }

    /// Index path to the first node carrying `id`, depth-first in forest order
    fn locate(&self, id: &str) -> Option<Vec<usize>> {
        fn visit(nodes: &[Node], id: &str, path: &mut Vec<usize>) -> bool {
            for (index, node) in nodes.iter().enumerate() {
                path.push(index);
                if node.id().as_str() == id {
                    return true;
                }
                if let Some(children) = node.children() {
                    if visit(children, id, path) {
                        return true;
                    }
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        visit(&self.nodes, id, &mut path).then_some(path)
    }

    fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut nodes: &[Node] = &self.nodes;
        for &index in parents {
            nodes = nodes.get(index)?.children()?;
        }
        nodes.get(*last)
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (last, parents) = path.split_last()?;
        self.collection_mut(parents)?.get_mut(*last)
    }

    /// The collection owned by the folder at `parent_path` (the root for `[]`)
    fn collection_mut(&mut self, parent_path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut nodes = &mut self.nodes;
        for &index in parent_path {
            nodes = nodes.get_mut(index)?.children_mut()?;
        }
        Some(nodes)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// First node with `id`, depth-first
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.node_at(&self.locate(id)?)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        let path = self.locate(id)?;
        self.node_at_mut(&path)
    }

    /// The folder owning `id`, or `None` when it is a root (or missing)
    pub fn find_parent(&self, id: &str) -> Option<&Folder> {
        let path = self.locate(id)?;
        let (_, parent) = path.split_last()?;
        if parent.is_empty() {
            return None;
        }
        self.node_at(parent)?.as_folder()
    }

    /// Append a node at the end of the root collection
    pub fn push_root(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append a node as the last child of a folder
    ///
    /// The node is handed back when `folder_id` is missing or not a folder.
    pub fn push_child(&mut self, folder_id: &str, node: Node) -> Result<(), Node> {
        match self.find_mut(folder_id).and_then(Node::children_mut) {
            Some(children) => {
                children.push(node);
                Ok(())
            }
            None => Err(node),
        }
    }

    /// Remove a node together with its subtree
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        self.detach(id).map(DetachedSubtree::into_node)
    }

    /// Take the subtree rooted at `id` out of its owning collection
    pub fn detach(&mut self, id: &str) -> Option<DetachedSubtree> {
        let path = self.locate(id)?;
        let (&index, parent) = path.split_last()?;
        let node = self.collection_mut(parent)?.remove(index);
        Some(DetachedSubtree { node, origin: path })
    }

    /// Insert a detached subtree relative to `target_id`
    ///
    /// On failure the subtree comes back untouched so the caller can
    /// [`restore`](Self::restore) it.
    pub fn attach(
        &mut self,
        subtree: DetachedSubtree,
        target_id: &str,
        position: MovePosition,
    ) -> Result<(), DetachedSubtree> {
        let Some(target_path) = self.locate(target_id) else {
            return Err(subtree);
        };

        match position {
            MovePosition::Inside => match self.node_at_mut(&target_path) {
                Some(Node::Folder(folder)) => {
                    folder.children.push(subtree.node);
                    folder.is_open = true;
                    Ok(())
                }
                _ => Err(subtree),
            },
            MovePosition::Before | MovePosition::After => {
                let Some((&index, parent)) = target_path.split_last() else {
                    return Err(subtree);
                };
                let insert_at = if position == MovePosition::After {
                    index + 1
                } else {
                    index
                };
                match self.collection_mut(parent) {
                    Some(siblings) => {
                        siblings.insert(insert_at, subtree.node);
                        Ok(())
                    }
                    None => Err(subtree),
                }
            }
        }
    }

    /// Put a detached subtree back where it was taken from
    pub fn restore(&mut self, subtree: DetachedSubtree) {
        let DetachedSubtree { node, origin } = subtree;
        let Some((&index, parent)) = origin.split_last() else {
            self.nodes.push(node);
            return;
        };
        match self.collection_mut(parent) {
            Some(siblings) if index <= siblings.len() => siblings.insert(index, node),
            Some(siblings) => siblings.push(node),
            None => self.nodes.push(node),
        }
    }

    /// Move `source_id` relative to `target_id`
    ///
    /// All preconditions are checked before anything is detached, so every
    /// outcome other than [`MoveOutcome::Moved`] leaves the tree as it was.
    /// Moving a folder into its own subtree is rejected.
    pub fn move_node(
        &mut self,
        source_id: &str,
        target_id: &str,
        position: MovePosition,
    ) -> MoveOutcome {
        if source_id == target_id {
            return MoveOutcome::SelfMove;
        }
        let Some(source_path) = self.locate(source_id) else {
            return MoveOutcome::SourceNotFound;
        };
        let Some(target_path) = self.locate(target_id) else {
            return MoveOutcome::TargetNotFound;
        };
        if target_path.starts_with(&source_path) {
            return MoveOutcome::TargetInsideSource;
        }
        if position == MovePosition::Inside
            && !self.node_at(&target_path).is_some_and(Node::is_folder)
        {
            return MoveOutcome::TargetNotFolder;
        }

        let Some(subtree) = self.detach(source_id) else {
            return MoveOutcome::SourceNotFound;
        };
        match self.attach(subtree, target_id, position) {
            Ok(()) => MoveOutcome::Moved,
            Err(subtree) => {
                self.restore(subtree);
                MoveOutcome::TargetNotFound
            }
        }
    }

    /// Deep-copy the subtree at `id` and insert the copy right after it
    ///
    /// Every copied node gets a fresh id and loses its usage data; only the
    /// copy's root is retitled with `" (copy)"`.
    pub fn duplicate(&mut self, id: &str) -> Option<NodeId> {
        let path = self.locate(id)?;
        let mut copy = self.node_at(&path)?.clone();
        copy.reissue();
        let title = format!("{} (copy)", copy.title());
        copy.set_title(title);
        let copy_id = copy.id().clone();

        let (&index, parent) = path.split_last()?;
        self.collection_mut(parent)?.insert(index + 1, copy);
        Some(copy_id)
    }

    /// Change a node's title
    pub fn rename(&mut self, id: &str, title: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.set_title(title);
                true
            }
            None => false,
        }
    }

    /// Replace a prompt's template text; `false` for folders and unknown ids
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.find_mut(id).and_then(Node::as_prompt_mut) {
            Some(prompt) => {
                prompt.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Flip a folder's expansion flag, returning the new state
    pub fn toggle_open(&mut self, id: &str) -> Option<bool> {
        match self.find_mut(id)? {
            Node::Folder(folder) => {
                folder.is_open = !folder.is_open;
                Some(folder.is_open)
            }
            Node::Prompt(_) => None,
        }
    }

    pub fn set_favorite(&mut self, id: &str, favorite: bool) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.set_favorite(favorite);
                true
            }
            None => false,
        }
    }

    /// Count a copy or injection of a prompt, returning the new use count
    pub fn record_usage(&mut self, id: &str, at: DateTime<Utc>) -> Option<u64> {
        self.find_mut(id)
            .and_then(Node::as_prompt_mut)
            .map(|prompt| prompt.record_use(at))
    }

    /// Search view of the forest
    ///
    /// Prompts that don't match `query` (case-insensitive, title or content)
    /// are hidden. Folders are always kept, shown open, with their filtered
    /// children. Within each collection favorites come first; the stored
    /// order is not affected.
    pub fn filtered(&self, query: &str) -> Vec<Node> {
        fn filter(nodes: &[Node], query: &str) -> Vec<Node> {
            let mut kept: Vec<Node> = nodes
                .iter()
                .filter_map(|node| match node {
                    Node::Folder(folder) => {
                        let mut folder = folder.clone();
                        folder.children = filter(&folder.children, query);
                        if !query.is_empty() {
                            folder.is_open = true;
                        }
                        Some(Node::Folder(folder))
                    }
                    Node::Prompt(_) if query.is_empty() || node.matches(query) => {
                        Some(node.clone())
                    }
                    Node::Prompt(_) => None,
                })
                .collect();
            kept.sort_by_key(|node| !node.is_favorite());
            kept
        }

        filter(&self.nodes, &query.to_lowercase())
    }

    /// Every prompt in the forest, depth-first
    pub fn prompts(&self) -> impl Iterator<Item = &Prompt> + '_ {
        self.walk()
            .into_iter()
            .filter_map(|(_, node)| node.as_prompt())
    }

    /// Every id in the forest, depth-first
    pub fn ids(&self) -> Vec<&NodeId> {
        self.walk().into_iter().map(|(_, node)| node.id()).collect()
    }
}

impl From<Vec<Node>> for Forest {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(id: &str) -> Node {
        let mut prompt = Prompt::new(id.to_uppercase(), format!("content of {id}"));
        prompt.id = NodeId::from(id);
        Node::Prompt(prompt)
    }

    fn folder(id: &str, children: Vec<Node>) -> Node {
        let mut folder = Folder::new(id.to_uppercase());
        folder.id = NodeId::from(id);
        folder.is_open = false;
        folder.children = children;
        Node::Folder(folder)
    }

    /// ```text
    /// a
    /// f1
    ///   b
    ///   f2
    ///     c
    /// d
    /// ```
    fn sample() -> Forest {
        Forest::from(vec![
            prompt("a"),
            folder("f1", vec![prompt("b"), folder("f2", vec![prompt("c")])]),
            prompt("d"),
        ])
    }

    fn ids_of(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id().as_str()).collect()
    }

    fn occurrences(forest: &Forest, id: &str) -> usize {
        forest
            .walk()
            .iter()
            .filter(|(_, node)| node.id().as_str() == id)
            .count()
    }

    #[test]
    fn test_find_depth_first() {
        let forest = sample();
        assert_eq!(forest.find("c").unwrap().title(), "C");
        assert!(forest.find("missing").is_none());
        assert_eq!(forest.len(), 6);
        let prompts: Vec<_> = forest.prompts().map(|p| p.id.as_str()).collect();
        assert_eq!(prompts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_find_parent() {
        let forest = sample();
        assert_eq!(forest.find_parent("c").unwrap().id.as_str(), "f2");
        assert_eq!(forest.find_parent("b").unwrap().id.as_str(), "f1");
        assert!(forest.find_parent("a").is_none());
        assert!(forest.find_parent("missing").is_none());
    }

    #[test]
    fn test_move_inside_folder() {
        let mut forest = sample();
        let outcome = forest.move_node("a", "f2", MovePosition::Inside);

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(occurrences(&forest, "a"), 1);
        let f2 = forest.find("f2").unwrap().as_folder().unwrap();
        assert_eq!(ids_of(&f2.children), vec!["c", "a"]);
        assert!(f2.is_open);
        assert_eq!(ids_of(forest.roots()), vec!["f1", "d"]);
    }

    #[test]
    fn test_move_before_and_after() {
        let mut forest = sample();
        assert!(forest.move_node("d", "b", MovePosition::Before).is_moved());
        assert_eq!(
            ids_of(forest.find("f1").unwrap().children().unwrap()),
            vec!["d", "b", "f2"]
        );

        assert!(forest.move_node("a", "f2", MovePosition::After).is_moved());
        assert_eq!(
            ids_of(forest.find("f1").unwrap().children().unwrap()),
            vec!["d", "b", "f2", "a"]
        );
        assert_eq!(ids_of(forest.roots()), vec!["f1"]);
    }

    #[test]
    fn test_move_within_same_collection() {
        let mut forest = sample();
        assert!(forest.move_node("a", "d", MovePosition::After).is_moved());
        assert_eq!(ids_of(forest.roots()), vec!["f1", "d", "a"]);

        assert!(forest.move_node("a", "f1", MovePosition::Before).is_moved());
        assert_eq!(ids_of(forest.roots()), vec!["a", "f1", "d"]);
    }

    #[test]
    fn test_move_noops_leave_tree_unchanged() {
        let original = sample();
        let mut forest = original.clone();

        assert_eq!(
            forest.move_node("a", "a", MovePosition::After),
            MoveOutcome::SelfMove
        );
        assert_eq!(
            forest.move_node("zz", "a", MovePosition::After),
            MoveOutcome::SourceNotFound
        );
        assert_eq!(
            forest.move_node("a", "zz", MovePosition::After),
            MoveOutcome::TargetNotFound
        );
        assert_eq!(
            forest.move_node("a", "d", MovePosition::Inside),
            MoveOutcome::TargetNotFolder
        );
        assert_eq!(forest, original);
    }

    #[test]
    fn test_move_folder_into_own_descendant_is_rejected() {
        let mut forest = sample();
        let before = forest.clone();

        assert_eq!(
            forest.move_node("f1", "f2", MovePosition::Inside),
            MoveOutcome::TargetInsideSource
        );
        assert_eq!(
            forest.move_node("f1", "c", MovePosition::Before),
            MoveOutcome::TargetInsideSource
        );
        assert_eq!(forest, before);
    }

    #[test]
    fn test_failed_attach_can_be_restored() {
        let mut forest = sample();
        let subtree = forest.detach("f2").unwrap();
        assert!(!forest.contains("c"));

        let subtree = forest
            .attach(subtree, "d", MovePosition::Inside)
            .unwrap_err();
        forest.restore(subtree);

        assert_eq!(forest, sample());
    }

    #[test]
    fn test_duplicate_subtree() {
        let mut forest = sample();
        let copy_id = forest.duplicate("f1").unwrap();

        assert_ne!(copy_id.as_str(), "f1");
        assert_eq!(forest.roots()[2].id(), &copy_id);
        assert_eq!(forest.roots()[2].title(), "F1 (copy)");
        assert_eq!(forest.len(), 10);

        let copy = forest.find(&copy_id).unwrap();
        let child_titles: Vec<_> = copy.children().unwrap().iter().map(Node::title).collect();
        assert_eq!(child_titles, vec!["B", "F2"]);
        assert_eq!(occurrences(&forest, "b"), 1);
        assert_eq!(occurrences(&forest, "c"), 1);
    }

    #[test]
    fn test_duplicate_is_isolated_from_original() {
        let mut forest = sample();
        forest.record_usage("a", Utc::now());
        forest.set_favorite("a", true);

        let copy_id = forest.duplicate("a").unwrap();
        assert!(forest.rename(&copy_id, "Changed"));

        assert_eq!(forest.find("a").unwrap().title(), "A");
        let copy = forest.find(&copy_id).unwrap();
        assert!(copy.is_favorite());
        assert_eq!(copy.as_prompt().unwrap().use_count, None);
        assert_eq!(copy.as_prompt().unwrap().last_used, None);
        assert_eq!(forest.find("a").unwrap().as_prompt().unwrap().use_count, Some(1));
    }

    #[test]
    fn test_duplicate_missing_is_none() {
        let mut forest = sample();
        assert!(forest.duplicate("missing").is_none());
        assert_eq!(forest, sample());
    }

    #[test]
    fn test_edit_operations() {
        let mut forest = sample();
        assert!(forest.set_content("b", "new text"));
        assert!(!forest.set_content("f1", "folders have no content"));
        assert_eq!(forest.toggle_open("f1"), Some(true));
        assert_eq!(forest.toggle_open("a"), None);
        assert!(!forest.rename("missing", "x"));
        assert_eq!(forest.record_usage("b", Utc::now()), Some(1));
        assert_eq!(forest.record_usage("b", Utc::now()), Some(2));
        assert_eq!(forest.record_usage("f1", Utc::now()), None);
    }

    #[test]
    fn test_push_child_and_remove() {
        let mut forest = sample();
        assert!(forest.push_child("f2", prompt("e")).is_ok());
        assert_eq!(forest.find_parent("e").unwrap().id.as_str(), "f2");
        assert!(forest.push_child("a", prompt("g")).is_err());

        let removed = forest.remove("f1").unwrap();
        assert_eq!(removed.id().as_str(), "f1");
        assert!(!forest.contains("e"));
        assert!(forest.remove("f1").is_none());
    }

    #[test]
    fn test_filtered_view() {
        let mut forest = sample();
        forest.set_favorite("d", true);

        let view = forest.filtered("content of c");
        assert_eq!(ids_of(&view), vec!["f1"]);
        let f1 = view[0].as_folder().unwrap();
        assert!(f1.is_open);
        assert_eq!(ids_of(&f1.children), vec!["f2"]);
        assert_eq!(ids_of(f1.children[0].children().unwrap()), vec!["c"]);

        let all = forest.filtered("");
        assert_eq!(ids_of(&all), vec!["d", "a", "f1"]);
        assert_eq!(ids_of(forest.roots()), vec!["a", "f1", "d"]);
    }
}
