//! Template source type used by the prompt manager.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// File extensions recognized as Jinja templates.
pub(crate) const TEMPLATE_EXTENSIONS: [&str; 2] = ["j2", "jinja"];

/// A named prompt template and its raw source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Template name used for lookup (e.g., `edit/system`).
    pub name: String,

    /// Raw Jinja2 template source.
    pub source: String,
}

impl PromptTemplate {
    /// Create a template from a name and source.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Derive a template name from a file path relative to a template root.
    ///
    /// Returns `None` when the file does not carry a template extension.
    /// Components are joined with `/` on every platform, so
    /// `edit/user.j2` becomes `edit/user`.
    pub(crate) fn name_from_relative_path(relative: &Path) -> Option<String> {
        let ext = relative.extension()?.to_str()?;
        if !TEMPLATE_EXTENSIONS.contains(&ext) {
            return None;
        }

        let stem = relative.with_extension("");
        let parts: Vec<&str> = stem
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;

        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_should_strip_template_extension_from_name() {
        let name = PromptTemplate::name_from_relative_path(&PathBuf::from("edit/user.j2"));
        assert_eq!(name.as_deref(), Some("edit/user"));

        let name = PromptTemplate::name_from_relative_path(&PathBuf::from("system.jinja"));
        assert_eq!(name.as_deref(), Some("system"));
    }

    #[test]
    fn test_should_ignore_non_template_files() {
        assert!(PromptTemplate::name_from_relative_path(&PathBuf::from("README.md")).is_none());
        assert!(PromptTemplate::name_from_relative_path(&PathBuf::from("edit/user")).is_none());
    }
}
