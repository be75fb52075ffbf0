//! # PromptShelf Templating
//!
//! Prompt templates mark the places a user has to fill in with
//! `{{name}}` or `{{name|default}}`. This crate finds those placeholders
//! ([`parse_declarations`]) and writes resolved values back
//! ([`substitute`]).
//!
//! ```rust
//! use std::collections::HashMap;
//! use promptshelf_templating::{parse_declarations, substitute};
//!
//! let text = "Translate {{text}} into {{lang|Spanish}}. Keep {{text}} short.";
//! let declarations = parse_declarations(text);
//! assert_eq!(declarations.len(), 2);
//! assert_eq!(declarations[1].default_value, "Spanish");
//!
//! let mut answers = HashMap::new();
//! answers.insert("text".to_string(), "hello".to_string());
//! answers.insert("lang".to_string(), "French".to_string());
//! assert_eq!(
//!     substitute(text, &answers).unwrap(),
//!     "Translate hello into French. Keep hello short."
//! );
//! ```

mod error;
mod parser;
mod substitution;

pub use error::{Result, TemplatingError};
pub use parser::{parse_declarations, placeholder_spans, Placeholder, VariableDeclaration};
pub use substitution::{placeholder_pattern, substitute};
