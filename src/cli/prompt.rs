//! Line-based prompts on stderr.

use std::io::IsTerminal;

use console::{Term, style, user_attended_stderr};

use crate::error::{Result, SkmError};

/// True when both stdin and stderr are terminals.
pub fn is_interactive() -> bool {
    user_attended_stderr() && std::io::stdin().is_terminal()
}

fn require_terminal() -> Result<Term> {
    if !is_interactive() {
        return Err(SkmError::InvalidInput(
            "interactive input requires a terminal".to_string(),
        ));
    }
    Ok(Term::stderr())
}

pub fn confirm(question: &str, default: bool) -> Result<bool> {
    let term = require_terminal()?;
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    term.write_str(&format!("{} {question} {hint} ", style("?").cyan()))?;
    let answer = term.read_line()?;
    Ok(parse_yes_no(&answer).unwrap_or(default))
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Numbered menu; returns the chosen index, or `None` when the user enters
/// an empty line.
pub fn select(title: &str, options: &[String]) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }
    let term = require_terminal()?;
    term.write_line(&style(title).bold().to_string())?;
    for (index, option) in options.iter().enumerate() {
        term.write_line(&format!("  {:>2}) {option}", index + 1))?;
    }
    loop {
        term.write_str(&format!("{} Choice (empty to cancel): ", style("?").cyan()))?;
        let answer = term.read_line()?;
        match parse_choice(&answer, options.len()) {
            Ok(choice) => return Ok(choice),
            Err(message) => term.write_line(&style(message).red().to_string())?,
        }
    }
}

fn parse_choice(answer: &str, count: usize) -> std::result::Result<Option<usize>, String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(format!("Enter a number between 1 and {count}")),
    }
}

/// Free text; `secret` hides the typed characters.
pub fn input(prompt: &str, secret: bool) -> Result<String> {
    let term = require_terminal()?;
    term.write_str(&format!("{} {prompt}: ", style("?").cyan()))?;
    let value = if secret {
        term.read_secure_line()?
    } else {
        term.read_line()?
    };
    Ok(value.trim().to_string())
}
