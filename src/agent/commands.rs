//! Slash commands for the chat loop
//!
//! Shortcut actions are equivalent to sending their keyword as a question.

use std::path::PathBuf;

use crate::agent::router::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    /// Ask through the router as if the keyword had been typed
    Shortcut(Route),
    Help,
    Quit,
}

impl Command {
    /// Query text a shortcut stands for
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            Command::Shortcut(route) => Some(route.keyword()),
            _ => None,
        }
    }
}

/// Usage lines shown by `/help`
pub const USAGE: &[(&str, &str)] = &[
    ("/upload <path>", "Analyze a PDF, image or text agreement"),
    ("/rent", "Show the rent"),
    ("/deposit", "Show the security deposit"),
    ("/notice", "Show the notice period"),
    ("/risks", "Show missing-clause risks"),
    ("/summary", "Show the summary"),
    ("/help", "Show this help"),
    ("/quit", "Exit"),
];

pub fn is_slash_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Split `/name args` into `(name, args)`
pub fn parse_command(input: &str) -> Option<(&str, &str)> {
    let without_slash = input.trim().strip_prefix('/')?;

    match without_slash.find(char::is_whitespace) {
        Some(space_idx) => Some((
            &without_slash[..space_idx],
            without_slash[space_idx..].trim(),
        )),
        None => Some((without_slash, "")),
    }
}

/// Parse a slash command. Errors are messages for the user.
pub fn parse(input: &str) -> Result<Command, String> {
    let (name, args) = parse_command(input).ok_or_else(|| "Not a command".to_string())?;

    match name.to_lowercase().as_str() {
        "upload" | "open" => {
            if args.is_empty() {
                return Err("Usage: /upload <path>".to_string());
            }
            Ok(Command::Upload(PathBuf::from(unquote(args))))
        }
        "rent" => Ok(Command::Shortcut(Route::Rent)),
        "deposit" => Ok(Command::Shortcut(Route::Deposit)),
        "notice" => Ok(Command::Shortcut(Route::Notice)),
        "risks" | "risk" => Ok(Command::Shortcut(Route::Risks)),
        "summary" | "summarize" => Ok(Command::Shortcut(Route::Summary)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command: /{}. Type /help for commands.", other)),
    }
}

/// Help text listing every command
pub fn help_text() -> String {
    let width = USAGE.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    let mut out = String::from("Commands:");
    for (usage, description) in USAGE {
        out.push_str(&format!("\n  {usage:<width$}  {description}"));
    }
    out
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_parts() {
        assert_eq!(parse_command("/upload  lease.pdf "), Some(("upload", "lease.pdf")));
        assert_eq!(parse_command("  /rent"), Some(("rent", "")));
        assert_eq!(parse_command("rent"), None);
    }

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            parse("/upload \"My Lease.pdf\"").unwrap(),
            Command::Upload(PathBuf::from("My Lease.pdf"))
        );
        assert!(parse("/upload").is_err());
    }

    #[test]
    fn test_shortcuts_map_to_keywords() {
        assert_eq!(parse("/risks").unwrap().as_query(), Some("risk"));
        assert_eq!(parse("/SUMMARY").unwrap(), Command::Shortcut(Route::Summary));
        assert_eq!(parse("/quit").unwrap(), Command::Quit);
        assert!(parse("/frobnicate").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_help_lists_all_commands() {
        let help = help_text();
        for (usage, _) in USAGE {
            assert!(help.contains(usage));
        }
    }
}
