//! Subject grammar
//!
//! A subject is a `.`-separated list of tokens. Each token is a non-empty run
//! of characters that are not whitespace, `.`, `*` or `>`. Subscription
//! patterns may additionally use two wildcards:
//!
//! - `*` matches exactly one token
//! - `>` matches one or more trailing tokens and must be the last token
//!
//! ```text
//! foo.bar.baz     literal subject
//! foo.*.baz       matches foo.x.baz, not foo.x.y.baz
//! foo.>           matches foo.x, foo.x.y, not foo
//! ```

use super::constants::{SUBJECT_SEPARATOR, WILDCARD_ONE, WILDCARD_TAIL};

/// Subject validation and matching helpers
pub struct Subject;

impl Subject {
    /// Check that `pattern` is a valid subscription pattern (wildcards allowed)
    pub fn is_valid_pattern(pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }

        let mut tokens = pattern.split(SUBJECT_SEPARATOR).peekable();
        while let Some(token) = tokens.next() {
            let is_last = tokens.peek().is_none();
            match token {
                WILDCARD_ONE => {}
                WILDCARD_TAIL if is_last => {}
                WILDCARD_TAIL => return false,
                _ if !is_literal_token(token) => return false,
                _ => {}
            }
        }

        true
    }

    /// Check that `subject` is a valid literal subject (no wildcards)
    ///
    /// Publishing requires a literal subject.
    pub fn is_valid_subject(subject: &str) -> bool {
        !subject.is_empty() && subject.split(SUBJECT_SEPARATOR).all(is_literal_token)
    }

    /// Check whether a literal `subject` is matched by `pattern`
    pub fn matches(pattern: &str, subject: &str) -> bool {
        let mut pattern_tokens = pattern.split(SUBJECT_SEPARATOR);
        let mut subject_tokens = subject.split(SUBJECT_SEPARATOR);

        loop {
            match (pattern_tokens.next(), subject_tokens.next()) {
                // `>` needs at least one token to swallow
                (Some(WILDCARD_TAIL), Some(_)) => return true,
                (Some(WILDCARD_ONE), Some(_)) => {}
                (Some(p), Some(s)) if p == s => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

fn is_literal_token(token: &str) -> bool {
    !token.is_empty()
        && !token
            .chars()
            .any(|c| c.is_whitespace() || c == '.' || c == '*' || c == '>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_patterns() {
        assert!(Subject::is_valid_pattern("a.*.c"));
        assert!(Subject::is_valid_pattern("a.>"));
        assert!(Subject::is_valid_pattern("foo"));
        assert!(Subject::is_valid_pattern("*"));
        assert!(Subject::is_valid_pattern(">"));
        assert!(Subject::is_valid_pattern("*.*.>"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(!Subject::is_valid_pattern("a..b"));
        assert!(!Subject::is_valid_pattern("*a"));
        assert!(!Subject::is_valid_pattern("a.>.b"));
        assert!(!Subject::is_valid_pattern(""));
        assert!(!Subject::is_valid_pattern(".a"));
        assert!(!Subject::is_valid_pattern("a."));
        assert!(!Subject::is_valid_pattern("a b"));
        assert!(!Subject::is_valid_pattern("a>"));
        assert!(!Subject::is_valid_pattern("a.\tb"));
    }

    #[test]
    fn test_valid_subjects() {
        assert!(Subject::is_valid_subject("foo.bar"));
        assert!(Subject::is_valid_subject("_INBOX.abc123"));
        assert!(!Subject::is_valid_subject("foo.*"));
        assert!(!Subject::is_valid_subject("foo.>"));
        assert!(!Subject::is_valid_subject("foo..bar"));
        assert!(!Subject::is_valid_subject(""));
    }

    #[test]
    fn test_matches_literal() {
        assert!(Subject::matches("foo.bar", "foo.bar"));
        assert!(!Subject::matches("foo.bar", "foo.baz"));
        assert!(!Subject::matches("foo.bar", "foo.bar.baz"));
        assert!(!Subject::matches("foo.bar.baz", "foo.bar"));
    }

    #[test]
    fn test_matches_single_wildcard() {
        assert!(Subject::matches("foo.*", "foo.bar"));
        assert!(Subject::matches("a.*.c", "a.b.c"));
        assert!(!Subject::matches("foo.*", "foo.bar.baz"));
        assert!(!Subject::matches("foo.*", "foo"));
    }

    #[test]
    fn test_matches_tail_wildcard() {
        assert!(Subject::matches("foo.>", "foo.bar"));
        assert!(Subject::matches("foo.>", "foo.bar.baz"));
        assert!(!Subject::matches("foo.>", "foo"));
        assert!(Subject::matches(">", "anything.at.all"));
    }
}
