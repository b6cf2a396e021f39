//! Best-effort extraction of service-call directives from completion text.
//!
//! The completion provider can embed a JSON block in its output asking the
//! gateway to consult a backend service. This parser is boundary-tolerant:
//! anything malformed, partial, or ambiguous yields `None`, never an error,
//! so a chatty model can never abort the pipeline.

use std::ops::Range;

use serde::Deserialize;

use crate::domain::orchestration::Directive;
use crate::domain::service::ServiceKind;

const CALL_SERVICE_ACTION: &str = "call_service";

/// Wire shape of an embedded directive block. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct DirectiveBlock {
    action: String,
    #[serde(default)]
    service: String,
    #[serde(default)]
    query: String,
    #[serde(default, alias = "responsePrefix")]
    response_prefix: String,
}

/// Extract the first well-formed directive from completion text, if any.
#[must_use]
pub fn parse(text: &str) -> Option<Directive> {
    locate(text).map(|(_, directive)| directive)
}

/// Remove the first well-formed directive block from completion text,
/// leaving the surrounding narrative. Text without a directive is returned
/// unchanged apart from edge whitespace.
#[must_use]
pub fn strip(text: &str) -> String {
    match locate(text) {
        Some((range, _)) => {
            let mut remainder = String::with_capacity(text.len() - range.len());
            remainder.push_str(text[..range.start].trim_end());
            let after = text[range.end..].trim_start();
            if !remainder.is_empty() && !after.is_empty() {
                remainder.push_str("\n\n");
            }
            remainder.push_str(after);
            remainder
        }
        None => text.trim().to_string(),
    }
}

/// Find the first candidate block that parses as a valid directive.
///
/// Every `{` starts a candidate; candidates are tried in order of their
/// start offset, so an invalid outer object does not hide a valid nested one.
fn locate(text: &str) -> Option<(Range<usize>, Directive)> {
    for (start, _) in text.char_indices().filter(|&(_, c)| c == '{') {
        let Some(len) = balanced_block_len(&text[start..]) else {
            continue;
        };
        let candidate = &text[start..start + len];
        let Ok(block) = serde_json::from_str::<DirectiveBlock>(candidate) else {
            continue;
        };
        if block.action != CALL_SERVICE_ACTION {
            continue;
        }
        let Some(service) = ServiceKind::parse(block.service.trim()) else {
            continue;
        };
        let query = block.query.trim();
        if query.is_empty() {
            continue;
        }
        return Some((
            start..start + len,
            Directive {
                service,
                query: query.to_string(),
                narrative_prefix: block.response_prefix.trim().to_string(),
            },
        ));
    }
    None
}

/// Byte length of the brace-balanced region starting at a `{`, or `None`
/// if the braces never balance. String literals and escapes are honored so
/// braces inside quoted values do not end the block early.
fn balanced_block_len(s: &str) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BLOCK: &str = r#"{"action":"call_service","service":"schedule","query":"milestones for phase 2","response_prefix":"Here is the latest programme data:"}"#;

    #[test]
    fn parses_embedded_directive() {
        let text = format!("Let me check the programme.\n{VALID_BLOCK}\nOne moment.");
        let directive = parse(&text).unwrap();

        assert_eq!(directive.service, ServiceKind::Schedule);
        assert_eq!(directive.query, "milestones for phase 2");
        assert_eq!(directive.narrative_prefix, "Here is the latest programme data:");
    }

    #[test]
    fn first_valid_block_wins() {
        let second = r#"{"action":"call_service","service":"budget","query":"q2 spend"}"#;
        let text = format!("{VALID_BLOCK} and also {second}");

        assert_eq!(parse(&text).unwrap().service, ServiceKind::Schedule);
    }

    #[test]
    fn malformed_candidates_are_skipped_not_fatal() {
        let text = format!(
            "{{not json at all}} {{\"action\":\"call_service\"}} {VALID_BLOCK}"
        );
        assert_eq!(parse(&text).unwrap().service, ServiceKind::Schedule);
    }

    #[test]
    fn wrong_action_or_unknown_service_yields_none() {
        assert!(parse(r#"{"action":"noop","service":"risk","query":"x"}"#).is_none());
        assert!(parse(r#"{"action":"call_service","service":"catering","query":"x"}"#).is_none());
        assert!(parse(r#"{"action":"call_service","service":"risk","query":"  "}"#).is_none());
    }

    #[test]
    fn prose_braces_and_unbalanced_blocks_yield_none() {
        assert!(parse("set {x} to {y").is_none());
        assert!(parse("no blocks here").is_none());
    }

    #[test]
    fn braces_inside_strings_do_not_truncate_block() {
        let text = r#"{"action":"call_service","service":"risk","query":"impact of {unclosed","response_prefix":"ok"}"#;
        let directive = parse(text).unwrap();
        assert_eq!(directive.query, "impact of {unclosed");
    }

    #[test]
    fn strip_removes_block_and_keeps_narrative() {
        let text = format!("Checking now.\n{VALID_BLOCK}\nBack shortly.");
        assert_eq!(strip(&text), "Checking now.\n\nBack shortly.");
    }

    #[test]
    fn strip_without_directive_is_identity_modulo_edges() {
        assert_eq!(strip("  plain answer \n"), "plain answer");
    }
}
