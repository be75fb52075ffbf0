//! # PromptShelf Library
//!
//! The prompt collection as an ordered folder tree, the per-variable value
//! history, and the wizard that resolves a prompt's placeholders before the
//! text is handed to a [`TextInjector`].
//!
//! ## Features
//!
//! - **Tree operations**: lookup, move (detach then attach), duplicate and CRUD over [`Forest`]
//! - **Variable history**: the five most recent values per variable, newest first
//! - **Resolution wizard**: one variable at a time with back/forward navigation
//! - **Persistence**: an async [`KeyValueStore`] port with memory and JSON file backends
//! - **Import/export**: legacy bare-array files and full `{forest, variableHistory}` files
//!
//! ```rust
//! use std::sync::Arc;
//! use promptshelf_library::{LibraryState, MemoryStore, WizardEvent};
//!
//! # async fn example() -> promptshelf_library::Result<()> {
//! let mut library = LibraryState::load(Arc::new(MemoryStore::new())).await?;
//! let id = library
//!     .add_prompt(None, "Greeting", "Hello {{name|world}}!")
//!     .await?;
//!
//! let mut session = library.begin_injection(&id)?;
//! library.advance(&mut session, WizardEvent::Submit(String::new())).await?;
//! assert_eq!(session.render()?, "Hello world!");
//! # Ok(())
//! # }
//! ```

mod error;
mod history;
mod ids;
mod injector;
mod node;
mod session;
mod state;
mod storage;
mod transfer;
mod tree;
mod wizard;

pub use error::{LibraryError, Result};
pub use history::{VariableHistory, DEFAULT_HISTORY_CAPACITY};
pub use ids::NodeId;
pub use injector::TextInjector;
pub use node::{Folder, Node, Prompt};
pub use session::{InjectionSession, SessionStep};
pub use state::{LibraryState, HISTORY_KEY, LAST_MODIFIED_KEY, TREE_KEY};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use transfer::{parse_import, ImportShape, ImportedLibrary, LibraryExport};
pub use tree::{DetachedSubtree, Forest, MoveOutcome, MovePosition};
pub use wizard::{ResolutionWizard, WizardEffect, WizardEvent, WizardStatus, WizardStep};

pub use promptshelf_templating::VariableDeclaration;
