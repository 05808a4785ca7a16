use std::path::Path;

use crate::error::EditorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user about the outcome of an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn saved(path: &Path) -> Self {
        Self::info("Saved", format!("Overwrote HTML at {}", path.display()))
    }
}

impl From<&EditorError> for Notice {
    fn from(err: &EditorError) -> Self {
        match err {
            EditorError::NoDocument => Notice::warning("Nothing to save", err.to_string()),
            EditorError::Read { .. } | EditorError::Parse { .. } => {
                Notice::error("Could not open file", err.to_string())
            }
            EditorError::Write { .. } => Notice::error("Could not overwrite HTML", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_is_only_a_warning() {
        let notice = Notice::from(&EditorError::NoDocument);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, "no HTML file is loaded");
    }

    #[test]
    fn write_failure_is_an_error() {
        let err = EditorError::Write {
            path: "out.html".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let notice = Notice::from(&err);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("denied"));
    }
}
