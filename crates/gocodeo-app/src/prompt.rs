//! Interactive input: line prompts through rustyline, masked secrets through console.

use std::cell::RefCell;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use console::Term;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use gocodeo_llm_api::{BackendType, KeyPrompter};

/// Source of answers for the init flow
pub trait Prompter {
    /// Ask for a line of text. Empty input takes `default`, or asks again when there is none.
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Ask for a value without echoing it
    fn prompt_secret(&self, message: &str) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Parse a yes/no answer. `None` means the answer was not understood.
pub fn parse_confirmation(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub struct TerminalPrompter {
    editor: RefCell<DefaultEditor>,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        Ok(Self {
            editor: RefCell::new(editor),
        })
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        match self.editor.borrow_mut().readline(prompt) {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted) => bail!("Interrupted"),
            Err(ReadlineError::Eof) => bail!("Input closed"),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String> {
        let prompt = match default {
            Some(default) => format!("{} [{}]: ", message, default),
            None => format!("{}: ", message),
        };

        loop {
            let line = self.read_line(&prompt)?;
            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
            if let Some(default) = default {
                return Ok(default.to_string());
            }
        }
    }

    fn prompt_secret(&self, message: &str) -> Result<String> {
        loop {
            let answer = read_secret(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        let prompt = format!("{} [{}]: ", message, hint);

        loop {
            let line = self.read_line(&prompt)?;
            match parse_confirmation(&line, default) {
                Some(answer) => return Ok(answer),
                None => println!("{}", "Please answer y or n.".yellow()),
            }
        }
    }
}

/// Read one masked line from the terminal
pub fn read_secret(message: &str) -> Result<String> {
    let term = Term::stdout();
    term.write_str(&format!("{}: ", message))
        .context("Failed to write prompt")?;
    let value = term.read_secure_line().context("Failed to read masked input")?;
    Ok(value.trim().to_string())
}

/// Asks for a missing provider key on the terminal
pub struct TerminalKeyPrompter;

impl KeyPrompter for TerminalKeyPrompter {
    fn prompt_api_key(&self, backend: BackendType) -> Result<String> {
        println!(
            "{}",
            format!(
                "No {} API key found (checked {}).",
                backend.display_name(),
                backend.api_key_env_vars().join(", ")
            )
            .yellow()
        );
        read_secret(&format!("Enter your {} API key", backend.display_name()))
    }
}
