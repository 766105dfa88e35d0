use thiserror::Error;

const PROMPT_PLACEHOLDER: &str = "{prompt}";
const MODEL_PLACEHOLDER: &str = "{model}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `CliTemplateError` values.
pub enum CliTemplateError {
    #[error("template is empty")]
    Empty,
    #[error("template could not be tokenized: {0}")]
    Tokenize(String),
    #[error("template program '{0}' must not contain placeholders")]
    PlaceholderInProgram(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed command template.
///
/// Tokenization happens once, before any substitution, so the prompt always
/// lands inside a single argv element (or on stdin) and is never re-parsed as
/// command syntax.
pub struct CliTemplate {
    source: String,
    program: String,
    args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully substituted invocation ready to spawn.
pub struct RenderedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl CliTemplate {
    pub fn parse(source: &str) -> Result<Self, CliTemplateError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(CliTemplateError::Empty);
        }
        let mut tokens = shell_words::split(trimmed)
            .map_err(|error| CliTemplateError::Tokenize(error.to_string()))?
            .into_iter();
        let program = tokens.next().ok_or(CliTemplateError::Empty)?;
        if program.trim().is_empty() {
            return Err(CliTemplateError::Empty);
        }
        if program.contains(PROMPT_PLACEHOLDER) || program.contains(MODEL_PLACEHOLDER) {
            return Err(CliTemplateError::PlaceholderInProgram(program));
        }

        Ok(Self {
            source: trimmed.to_string(),
            program,
            args: tokens.collect(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// True when the prompt is passed as an argument rather than on stdin.
    pub fn has_prompt_slot(&self) -> bool {
        self.args.iter().any(|arg| arg.contains(PROMPT_PLACEHOLDER))
    }

    pub fn render(&self, prompt: &str, model: &str) -> RenderedCommand {
        let args = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(MODEL_PLACEHOLDER, model)
                    .replace(PROMPT_PLACEHOLDER, prompt)
            })
            .collect();
        let stdin = (!self.has_prompt_slot()).then(|| prompt.to_string());
        RenderedCommand {
            program: self.program.clone(),
            args,
            stdin,
        }
    }
}

/// Built-in template chain for `executable`, tried in order: prompt on
/// stdin, prompt as trailing argument, then the legacy quiet-mode form. The
/// tool picks its own model, so none of these carry `{model}`.
pub fn default_cli_templates(executable: &str) -> Vec<String> {
    let program = shell_words::quote(executable.trim());
    vec![
        format!("{program} exec -"),
        format!("{program} exec {PROMPT_PLACEHOLDER}"),
        format!("{program} -q {PROMPT_PLACEHOLDER}"),
    ]
}
