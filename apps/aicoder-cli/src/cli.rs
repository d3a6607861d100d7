use std::path::PathBuf;

use aicoder_core::{
    CoreError, Credential, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, EditOutcome, EditRequest, Editor, EditorConfig, OpenAiClient,
};
use clap::{ArgAction, Parser};
use tracing::{debug, instrument};

#[derive(Debug, Parser)]
#[command(
    name = "aicoder",
    version,
    about = "Rewrite a file by applying natural-language change instructions with an LLM",
    after_help = "Example: aicoder ./my_file.py 'Add error handling to the main function'\n\nThe API key is read from OPENAI_API_KEY."
)]
pub struct Cli {
    /// Path to the file to modify
    pub file_path: PathBuf,

    /// Natural-language description of the change
    pub change_instructions: String,

    /// Model to use
    #[arg(short, long, env = "AICODER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, value_parser = parse_temperature)]
    pub temperature: f32,

    /// Maximum tokens in the completion
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Root URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory of prompt template overrides (e.g. `edit/system.j2`)
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Apply the requested edit.
    ///
    /// The credential is read from the environment here and injected into
    /// the editor, which rejects a missing one before any file access.
    pub async fn run(self) -> Result<EditOutcome, CoreError> {
        self.run_with(Credential::from_env()).await
    }

    /// Apply the requested edit with an explicit credential.
    #[instrument(skip_all)]
    pub async fn run_with(self, credential: Option<Credential>) -> Result<EditOutcome, CoreError> {
        let request = EditRequest::new(&self.file_path, &self.change_instructions)?;
        let config = self.editor_config(credential);
        debug!(
            model = config.model(),
            base_url = %self.base_url,
            has_credential = config.credential().is_some(),
            "starting edit"
        );

        let client = OpenAiClient::new(self.base_url)?;
        let editor = Editor::new(config, client)?;
        editor.run(&request).await
    }

    /// Fold the command-line options into an [`EditorConfig`].
    pub fn editor_config(&self, credential: Option<Credential>) -> EditorConfig {
        EditorConfig::builder()
            .model(self.model.clone())
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .credential_opt(credential)
            .prompt_dir_opt(self.prompt_dir.clone())
            .build()
    }
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let t: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=2.0).contains(&t) {
        Ok(t)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {t}"))
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_should_have_valid_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_should_parse_positional_arguments() {
        let cli = Cli::try_parse_from(["aicoder", "./main.py", "add a docstring"])
            .expect("should parse");

        assert_eq!(cli.file_path, PathBuf::from("./main.py"));
        assert_eq!(cli.change_instructions, "add a docstring");
        assert_eq!(cli.temperature, 0.7);
        assert_eq!(cli.max_tokens, 4000);
        assert!(cli.prompt_dir.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.log_json);
    }

    #[test]
    fn test_should_require_both_arguments() {
        assert!(Cli::try_parse_from(["aicoder"]).is_err());
        assert!(Cli::try_parse_from(["aicoder", "./main.py"]).is_err());
    }

    #[test]
    fn test_should_parse_overrides() {
        let cli = Cli::try_parse_from([
            "aicoder",
            "src/lib.rs",
            "rename foo to bar",
            "--model",
            "gpt-4o",
            "--temperature",
            "0",
            "--max-tokens",
            "8192",
            "--base-url",
            "http://localhost:11434/v1",
            "--prompt-dir",
            "prompts",
            "-vv",
            "--log-json",
        ])
        .expect("should parse");

        assert_eq!(cli.model, "gpt-4o");
        assert_eq!(cli.temperature, 0.0);
        assert_eq!(cli.max_tokens, 8192);
        assert_eq!(cli.base_url, "http://localhost:11434/v1");
        assert_eq!(cli.prompt_dir, Some(PathBuf::from("prompts")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
    }

    #[test]
    fn test_should_reject_out_of_range_temperature() {
        let result =
            Cli::try_parse_from(["aicoder", "a.py", "x", "--temperature", "3.5"]);
        assert!(result.is_err());
        assert!(parse_temperature("abc").is_err());
        assert_eq!(parse_temperature("1.5"), Ok(1.5));
    }

    #[test]
    fn test_should_build_editor_config_from_flags() {
        let cli = Cli::try_parse_from([
            "aicoder",
            "a.py",
            "x",
            "--model",
            "gpt-4o-mini",
            "--prompt-dir",
            "/tmp/prompts",
        ])
        .expect("should parse");

        let config = cli.editor_config(Some(Credential::new("sk-test")));
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.credential().map(Credential::expose), Some("sk-test"));
        assert_eq!(
            config.prompt_dir(),
            Some(std::path::Path::new("/tmp/prompts"))
        );

        let config = cli.editor_config(None);
        assert!(config.credential().is_none());
    }

    #[tokio::test]
    async fn test_should_reject_blank_instruction_before_anything_else() {
        let cli = Cli::try_parse_from(["aicoder", "/nonexistent/aicoder/a.py", "   "])
            .expect("should parse");
        let result = cli.run_with(None).await;
        assert!(matches!(result, Err(CoreError::EmptyInstruction)));
    }

    #[tokio::test]
    async fn test_should_report_missing_credential_before_reading_prompt_dir() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("main.py");
        std::fs::write(&path, "print(\"hi\")").expect("should write fixture");
        let missing_prompts = dir.path().join("no-such-prompts");

        let cli = Cli::try_parse_from([
            OsStr::new("aicoder"),
            path.as_os_str(),
            OsStr::new("add logging"),
            OsStr::new("--prompt-dir"),
            missing_prompts.as_os_str(),
        ])
        .expect("should parse");

        let err = cli.run_with(None).await.expect_err("edit should fail");
        assert!(matches!(err, CoreError::MissingCredential));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            std::fs::read_to_string(&path).expect("should read"),
            "print(\"hi\")"
        );
        assert!(!missing_prompts.exists());
    }
}
