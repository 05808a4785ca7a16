//! Document model for the HTML editor: load a file, list its images, links and
//! text, rewrite picked values, search text and write the result back.
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod mutate;
pub mod notice;
pub mod persist;
pub mod search;
pub mod selection;
pub mod session;

pub use crate::config::{EditorConfig, ReplaceConfig, ReplacePolicy, SaveConfig};
pub use crate::document::{DocVersion, Document};
pub use crate::error::{EditorError, EditorResult};
pub use crate::index::{DocumentIndex, ImageRef, LinkRef, LinkView, TextNodeRef};
pub use crate::notice::{Notice, NoticeLevel};
pub use crate::search::search;
pub use crate::selection::{SelectionState, ViewKind};
pub use crate::session::EditorSession;
