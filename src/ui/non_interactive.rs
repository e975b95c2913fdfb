//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::{parse_yes, OutputMode, Prompt, PromptResult, PromptType, UserInterface};

/// Prefix of environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "DISTKEEPER_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `DISTKEEPER_PROMPT_<KEY>` variables, then from
/// the prompt's default. A prompt with neither gets an empty answer, which
/// every caller treats as "no".
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_warnings() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .cloned()
            .unwrap_or_default();

        tracing::debug!("answering prompt '{}' without a terminal", prompt.key);
        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_yes(&answer)),
            PromptType::Input | PromptType::Password => PromptResult::String(answer),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            eprintln!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn confirm_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let result = ui.prompt(&Prompt::confirm("install_package", "Install?", false)).unwrap();
        assert_eq!(result, PromptResult::Bool(false));
    }

    #[test]
    fn env_override_wins_over_default() {
        let mut ui = NonInteractiveUI::with_overrides(
            OutputMode::Normal,
            overrides(&[("DISTKEEPER_PROMPT_INSTALL_PACKAGE", "yes")]),
        );
        let result = ui.prompt(&Prompt::confirm("install_package", "Install?", false)).unwrap();
        assert_eq!(result, PromptResult::Bool(true));
    }

    #[test]
    fn input_without_default_is_empty() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let result = ui.prompt(&Prompt::input("proxy_user", "User")).unwrap();
        assert_eq!(result.as_string(), "");
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Quiet, HashMap::new());
        assert!(!ui.is_interactive());
    }
}
