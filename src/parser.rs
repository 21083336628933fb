//! Invocation grammar: a configured prefix, a command token, and an
//! optional argument tail split on whitespace runs.

use regex::Regex;

use crate::error::Error;

/// Prefix characters that are regex metacharacters and must be escaped
/// before being embedded in the matching pattern.
const ESCAPED_PREFIXES: [char; 8] = ['?', '^', '[', ']', '(', ')', '*', '\\'];

/// Structured result of parsing one message against the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub prefix: String,
    pub command: String,
    pub args: Vec<String>,
}

/// Parses raw chat text into command invocations.
pub struct CommandParser {
    prefix: String,
    pattern: Regex,
}

impl CommandParser {
    pub fn new(prefix: &str) -> Result<Self, Error> {
        let escaped = if prefix.len() == 1
            && prefix.chars().next().is_some_and(|c| ESCAPED_PREFIXES.contains(&c))
        {
            format!("\\{}", prefix)
        } else {
            prefix.to_string()
        };

        // Case-insensitive, dot-matches-newline: the tail capture swallows
        // the rest of the message including embedded line breaks.
        let pattern = Regex::new(&format!(r"(?is)^({})(\S+) ?(.*)", escaped))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `None` when the message is not a command invocation; the
    /// caller still forwards it as a plain chat event.
    pub fn parse(&self, message: &str) -> Option<Invocation> {
        let captures = self.pattern.captures(message)?;

        let prefix = captures.get(1).map(|m| m.as_str().to_string())?;
        let command = captures.get(2).map(|m| m.as_str().to_string())?;
        let args = captures
            .get(3)
            .map(|m| {
                m.as_str()
                    .trim()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Invocation {
            prefix,
            command,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_command_and_args() {
        let parser = CommandParser::new("!").unwrap();
        let inv = parser.parse("!cmd a b").unwrap();
        assert_eq!(inv.command, "cmd");
        assert_eq!(inv.args, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(inv.prefix, "!");
    }

    #[test]
    fn non_prefixed_message_is_not_an_invocation() {
        let parser = CommandParser::new("!").unwrap();
        assert_eq!(parser.parse("hello"), None);
    }

    #[test]
    fn metacharacter_prefix_is_escaped() {
        let parser = CommandParser::new("?").unwrap();
        let inv = parser.parse("?help x").unwrap();
        assert_eq!(inv.command, "help");
        assert_eq!(inv.args, vec!["x".to_string()]);
    }

    #[test]
    fn every_reserved_prefix_builds_a_valid_pattern() {
        for prefix in ["?", "^", "[", "]", "(", ")", "*", "\\"] {
            let parser = CommandParser::new(prefix).unwrap();
            let message = format!("{}ping", prefix);
            let inv = parser.parse(&message).unwrap();
            assert_eq!(inv.command, "ping", "prefix {:?}", prefix);
        }
    }

    #[test]
    fn runs_of_whitespace_yield_no_empty_tokens() {
        let parser = CommandParser::new("!").unwrap();
        let inv = parser.parse("!cmd   a    b ").unwrap();
        assert_eq!(inv.args, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn bare_command_has_no_args() {
        let parser = CommandParser::new("!").unwrap();
        let inv = parser.parse("!ping").unwrap();
        assert_eq!(inv.command, "ping");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn tail_spans_line_breaks() {
        let parser = CommandParser::new("!").unwrap();
        let inv = parser.parse("!echo first\nsecond").unwrap();
        assert_eq!(inv.args, vec!["first".to_string(), "second".to_string()]);
    }
}
