//! User interaction (confirmation prompts).

use anyhow::Result;
use std::io::{self, BufRead, IsTerminal, Write};

/// The interactive confirmation collaborator.
///
/// Only consulted before deleting a shared source tree.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Whether a human can answer questions in this session.
    fn is_interactive(&self) -> bool;

    /// Ask a yes/no question. Empty or unrecognized answers yield `default`.
    fn ask_confirmation(&self, question: &str, default: bool) -> Result<bool>;
}

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    question: &str,
    default: bool,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(output, "{} {} ", question, hint)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(match response.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}

/// Prompt wired to the process' stdin/stdout.
///
/// `assume_yes` answers every question with "yes" without reading stdin,
/// for scripted runs that explicitly opt into source deletion.
#[derive(Debug, Default)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn is_interactive(&self) -> bool {
        self.assume_yes || io::stdin().is_terminal()
    }

    fn ask_confirmation(&self, question: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            println!("{} [y/N] y", question);
            return Ok(true);
        }
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(question, default, &mut stdin_lock, &mut stdout)
    }
}
