//! Session transcript format
//!
//! One event per line, in delivery order:
//!
//! ```text
//! # comment
//! << {"type":"session_state","data":{...}}   inbound frame from the authority
//! >> vote 5                                  local intent
//! >> new-round | reveal | start | story <text>
//! ```

use crate::engine::Intent;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Failed to read transcript: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    Inbound(String),
    Local(Intent),
}

impl ScriptLine {
    /// Parse one line; `Ok(None)` for blank lines and comments
    pub fn parse(line_no: usize, raw: &str) -> Result<Option<Self>, ScriptError> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        if let Some(frame) = line.strip_prefix("<<") {
            let frame = frame.trim();
            if frame.is_empty() {
                return Err(parse_error(line_no, "empty inbound frame"));
            }
            return Ok(Some(ScriptLine::Inbound(frame.to_string())));
        }

        if let Some(intent) = line.strip_prefix(">>") {
            return parse_intent(line_no, intent.trim()).map(|i| Some(ScriptLine::Local(i)));
        }

        Err(parse_error(line_no, "expected '<<' or '>>'"))
    }
}

fn parse_intent(line_no: usize, text: &str) -> Result<Intent, ScriptError> {
    let (verb, rest) = match text.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (text, ""),
    };

    match verb {
        "vote" if !rest.is_empty() => Ok(Intent::Vote(rest.to_string())),
        "vote" => Err(parse_error(line_no, "vote needs a value")),
        "new-round" => Ok(Intent::NewRound),
        "reveal" => Ok(Intent::Reveal),
        "start" => Ok(Intent::StartSession),
        "story" => Ok(Intent::SetStory(rest.to_string())),
        other => Err(parse_error(line_no, &format!("unknown intent '{}'", other))),
    }
}

fn parse_error(line: usize, reason: &str) -> ScriptError {
    ScriptError::Parse {
        line,
        reason: reason.to_string(),
    }
}

/// Parse a whole transcript, numbering lines from 1
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| ScriptLine::parse(i + 1, raw).transpose())
        .collect()
}

pub async fn read_script(path: impl AsRef<Path>) -> Result<Vec<ScriptLine>, ScriptError> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_script(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(ScriptLine::parse(1, "   ").unwrap(), None);
        assert_eq!(ScriptLine::parse(1, "# Bob votes").unwrap(), None);
        assert_eq!(
            ScriptLine::parse(1, ">> vote 5").unwrap(),
            Some(ScriptLine::Local(Intent::Vote("5".to_string())))
        );
        assert_eq!(
            ScriptLine::parse(1, ">> story Login page redesign").unwrap(),
            Some(ScriptLine::Local(Intent::SetStory(
                "Login page redesign".to_string()
            )))
        );
        assert_eq!(
            ScriptLine::parse(1, r#"<< {"type":"user_left","data":{"userId":"x"}}"#).unwrap(),
            Some(ScriptLine::Inbound(
                r#"{"type":"user_left","data":{"userId":"x"}}"#.to_string()
            ))
        );
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = parse_script("# ok\n>> vote\n").unwrap_err();
        assert!(matches!(err, ScriptError::Parse { line: 2, .. }));

        let err = parse_script(">> dance").unwrap_err();
        assert_eq!(err.to_string(), "Line 1: unknown intent 'dance'");

        assert!(matches!(
            parse_script("hello"),
            Err(ScriptError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_script_skips_noise() {
        let script = "\n# setup\n>> start\n\n>> new-round\n>> reveal\n";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                ScriptLine::Local(Intent::StartSession),
                ScriptLine::Local(Intent::NewRound),
                ScriptLine::Local(Intent::Reveal),
            ]
        );
    }
}
