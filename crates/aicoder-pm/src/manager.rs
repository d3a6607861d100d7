use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use tracing::{debug, instrument};

use crate::error::PmError;
use crate::template::PromptTemplate;

/// Name of the system prompt sent with every edit request.
pub const EDIT_SYSTEM_TEMPLATE: &str = "edit/system";

/// Name of the user prompt carrying the file content and the instruction.
pub const EDIT_USER_TEMPLATE: &str = "edit/user";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (
        EDIT_SYSTEM_TEMPLATE,
        include_str!("../templates/edit/system.j2"),
    ),
    (EDIT_USER_TEMPLATE, include_str!("../templates/edit/user.j2")),
];

/// Manages prompt templates and renders them with context variables.
///
/// Rendering is strict: a template that references a variable missing from
/// the context fails with [`PmError::RenderError`] instead of producing an
/// empty string.
#[derive(Debug)]
pub struct PromptManager {
    env: Environment<'static>,
    names: BTreeSet<String>,
}

impl PromptManager {
    /// Create a manager with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns `PmError::InvalidTemplate` if a built-in template fails to parse.
    pub fn new() -> Result<Self, PmError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let mut manager = Self {
            env,
            names: BTreeSet::new(),
        };
        for (name, source) in BUILTIN_TEMPLATES {
            manager.add_template(PromptTemplate::new(name, source))?;
        }
        Ok(manager)
    }

    /// Load all `.j2` / `.jinja` templates under a directory, recursively.
    ///
    /// Template names are the file paths relative to `dir` without the
    /// extension. A loaded template replaces any existing one of the same name.
    ///
    /// # Errors
    ///
    /// Returns `PmError::Io` if the directory cannot be walked or a file
    /// cannot be read, and `PmError::InvalidTemplate` on a syntax error.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), PmError> {
        self.load_dir_recursive(dir, dir)
    }

    fn load_dir_recursive(&mut self, root: &Path, dir: &Path) -> Result<(), PmError> {
        let io_err = |source| PmError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries: Vec<_> = fs::read_dir(dir)
            .and_then(|rd| rd.collect::<Result<_, _>>())
            .map_err(io_err)?;
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| PmError::Io {
                path: path.clone(),
                source,
            })?;
            if file_type.is_dir() {
                self.load_dir_recursive(root, &path)?;
                continue;
            }

            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let Some(name) = PromptTemplate::name_from_relative_path(relative) else {
                continue;
            };

            let source = fs::read_to_string(&path).map_err(|source| PmError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(template = %name, path = %path.display(), "loaded template override");
            self.add_template(PromptTemplate { name, source })?;
        }
        Ok(())
    }

    /// Register a single template, replacing any existing one with that name.
    ///
    /// # Errors
    ///
    /// Returns `PmError::InvalidTemplate` if the source fails to parse.
    pub fn add_template(&mut self, template: PromptTemplate) -> Result<(), PmError> {
        let PromptTemplate { name, source } = template;
        self.env
            .add_template_owned(name.clone(), source)
            .map_err(|e| PmError::InvalidTemplate {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        self.names.insert(name);
        Ok(())
    }

    /// Render a template by name with the given context.
    ///
    /// # Errors
    ///
    /// Returns `PmError::TemplateNotFound` for an unknown name and
    /// `PmError::RenderError` if evaluation fails.
    pub fn render(&self, name: &str, ctx: &serde_json::Value) -> Result<String, PmError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => PmError::TemplateNotFound(name.to_owned()),
            _ => PmError::RenderError {
                name: name.to_owned(),
                reason: e.to_string(),
            },
        })?;

        template
            .render(ctx)
            .map_err(|e| PmError::RenderError {
                name: name.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Names of all registered templates, sorted.
    pub fn list_templates(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }
}
