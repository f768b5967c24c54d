use search_core::tokenizer::MIN_WORD_LEN;
use thiserror::Error;

/// Why a query line was refused. Every variant is reported to the user as `[invalid query]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unexpected byte 0x{0:02x}")]
    InvalidByte(u8),

    #[error("'{0}' cannot start or end a query")]
    DanglingOperator(String),

    #[error("'{0}' cannot follow '{1}'")]
    AdjacentOperators(String, String),

    #[error("no search term of {} or more letters", MIN_WORD_LEN)]
    NoSearchTerms,
}

/// A parsed query: OR-separated groups of terms that must all match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    groups: Vec<Vec<String>>,
}

impl Query {
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }
}

/// Drops a trailing `\n`. A `\r` is ordinary content and fails validation.
pub fn strip_terminator(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}

fn is_operator(token: &str) -> bool {
    token == "and" || token == "or"
}

/// Validates and parses one input line.
///
/// Only letters, spaces and tabs are allowed. Tokens are case-folded; `and` between terms is
/// implied and may be omitted, `or` starts a new group. There is no precedence beyond that:
/// `a b or c` means `(a AND b) OR c`.
pub fn parse(line: &[u8]) -> Result<Query, QueryError> {
    let body = strip_terminator(line);
    if let Some(&b) = body.iter().find(|&&b| !(b.is_ascii_alphabetic() || b == b' ' || b == b'\t')) {
        return Err(QueryError::InvalidByte(b));
    }

    let tokens: Vec<String> = body
        .split(|&b| b == b' ' || b == b'\t')
        .filter(|t| !t.is_empty())
        .map(|t| t.iter().map(|b| b.to_ascii_lowercase() as char).collect())
        .collect();

    let mut groups = vec![Vec::new()];
    let mut prev_operator: Option<&str> = None;
    for (i, token) in tokens.iter().enumerate() {
        if !is_operator(token) {
            if let Some(group) = groups.last_mut() {
                group.push(token.clone());
            }
            prev_operator = None;
            continue;
        }
        if i == 0 || i + 1 == tokens.len() {
            return Err(QueryError::DanglingOperator(token.clone()));
        }
        if let Some(prev) = prev_operator {
            return Err(QueryError::AdjacentOperators(token.clone(), prev.to_string()));
        }
        if token == "or" {
            groups.push(Vec::new());
        }
        prev_operator = Some(token.as_str());
    }

    if !groups.iter().flatten().any(|t| t.len() >= MIN_WORD_LEN) {
        return Err(QueryError::NoSearchTerms);
    }
    Ok(Query { groups })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(line: &str) -> Vec<Vec<String>> {
        parse(line.as_bytes()).unwrap().groups().to_vec()
    }

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn and_is_implicit_and_dropped() {
        assert_eq!(groups("cat and dog\n"), vec![words(&["cat", "dog"])]);
        assert_eq!(groups("cat dog"), vec![words(&["cat", "dog"])]);
    }

    #[test]
    fn or_splits_groups_left_to_right() {
        assert_eq!(
            groups("Cat  Dog\tOR fish and bird or MOUSE\n"),
            vec![words(&["cat", "dog"]), words(&["fish", "bird"]), words(&["mouse"])]
        );
    }

    #[test]
    fn short_terms_still_take_a_position() {
        assert_eq!(groups("an cat"), vec![words(&["an", "cat"])]);
    }

    #[test]
    fn misplaced_operators_are_rejected() {
        assert_eq!(parse(b"and cat"), Err(QueryError::DanglingOperator("and".into())));
        assert_eq!(parse(b"cat and\n"), Err(QueryError::DanglingOperator("and".into())));
        assert_eq!(parse(b"or"), Err(QueryError::DanglingOperator("or".into())));
        assert_eq!(
            parse(b"cat and or dog"),
            Err(QueryError::AdjacentOperators("or".into(), "and".into()))
        );
        assert!(parse(b"cat or or dog").is_err());
        assert!(parse(b"cat AND OR dog").is_err());
    }

    #[test]
    fn only_letters_and_blanks_are_allowed() {
        assert_eq!(parse(b"cat-dog"), Err(QueryError::InvalidByte(b'-')));
        assert_eq!(parse(b"cat 123"), Err(QueryError::InvalidByte(b'1')));
        assert_eq!(parse("caf\u{e9}".as_bytes()), Err(QueryError::InvalidByte(0xc3)));
        assert!(parse(b"cat\rdog").is_err());
        assert_eq!(parse(b"cat\r\n"), Err(QueryError::InvalidByte(b'\r')));
    }

    #[test]
    fn a_query_needs_a_real_term() {
        assert_eq!(parse(b"hi or ox"), Err(QueryError::NoSearchTerms));
        assert_eq!(parse(b"   \t "), Err(QueryError::NoSearchTerms));
        assert!(parse(b"hi or cat").is_ok());
    }
}
