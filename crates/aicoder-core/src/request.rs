use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// One user-invoked edit: the target file and the instruction to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    file_path: PathBuf,
    instruction: String,
}

impl EditRequest {
    /// Create a request.
    ///
    /// The path is not checked here; the editor validates it when it runs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyInstruction` if `instruction` is blank.
    pub fn new(
        file_path: impl Into<PathBuf>,
        instruction: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            return Err(CoreError::EmptyInstruction);
        }
        Ok(Self {
            file_path: file_path.into(),
            instruction,
        })
    }

    /// Returns the target file path as given by the caller.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the natural-language instruction.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_edit_request() {
        let request = EditRequest::new("./main.py", "add a docstring").expect("should create");
        assert_eq!(request.file_path(), Path::new("./main.py"));
        assert_eq!(request.instruction(), "add a docstring");
    }

    #[test]
    fn test_should_reject_blank_instruction() {
        assert!(matches!(
            EditRequest::new("main.py", ""),
            Err(CoreError::EmptyInstruction)
        ));
        assert!(matches!(
            EditRequest::new("main.py", " \t\n"),
            Err(CoreError::EmptyInstruction)
        ));
    }
}
