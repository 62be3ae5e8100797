//! Shell-style glob matching
//!
//! Provides [`GlobMatcher`]: `*` matches any run of characters, `?` exactly
//! one, everything else matches literally. Matching is anchored to the whole
//! value, never a substring.

use regex::{Regex, RegexBuilder};

/// Compiled-program budget for a single pattern, in bytes
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// Compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: String,
    regex: Regex,
}

impl GlobMatcher {
    /// Compile a glob
    ///
    /// # Errors
    /// - `GlobError::Empty` for a blank pattern
    /// - `GlobError::Invalid` if the translated expression fails to compile
    pub fn compile(pattern: &str) -> Result<Self, GlobError> {
        Self::compile_with_limit(pattern, DEFAULT_SIZE_LIMIT)
    }

    /// Compile a glob with an explicit compiled-size budget (bytes)
    ///
    /// # Errors
    /// Same as [`GlobMatcher::compile`]
    pub fn compile_with_limit(pattern: &str, size_limit: usize) -> Result<Self, GlobError> {
        if pattern.trim().is_empty() {
            return Err(GlobError::Empty);
        }

        let regex = RegexBuilder::new(&translate(pattern))
            .size_limit(size_limit)
            .build()
            .map_err(|e| GlobError::Invalid {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if `value` matches the whole pattern
    #[inline]
    #[must_use]
    pub fn test(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// Source pattern
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Translate a glob into an anchored regular expression
///
/// Every regex metacharacter except the two wildcards is escaped.
#[must_use]
pub fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            literal => out.push_str(&regex::escape(literal.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

/// Glob compilation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GlobError {
    /// Pattern is empty or whitespace
    #[error("empty glob pattern")]
    Empty,

    /// Translated expression was rejected
    #[error("invalid glob pattern '{pattern}': {reason}")]
    Invalid { pattern: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str) -> GlobMatcher {
        GlobMatcher::compile(pattern).unwrap()
    }

    #[test]
    fn star_matches_any_run() {
        let m = glob("prod-*");
        assert!(m.test("prod-1"));
        assert!(m.test("prod-"));
        assert!(m.test("prod-eu-west"));
        assert!(!m.test("preprod-1"));
    }

    #[test]
    fn question_mark_matches_exactly_one() {
        let m = glob("dev-?");
        assert!(m.test("dev-1"));
        assert!(!m.test("dev-"));
        assert!(!m.test("dev-12"));
    }

    #[test]
    fn match_is_anchored() {
        let m = glob("prod");
        assert!(m.test("prod"));
        assert!(!m.test("prod-1"));
        assert!(!m.test("my-prod"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let m = glob("lab.east");
        assert!(m.test("lab.east"));
        assert!(!m.test("labxeast"));

        let m = glob("[qa]+(1)");
        assert!(m.test("[qa]+(1)"));
        assert!(!m.test("q"));

        assert!(glob("a^b$c|d\\e").test("a^b$c|d\\e"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!glob("Prod-*").test("prod-1"));
    }

    #[test]
    fn blank_pattern_is_rejected() {
        assert_eq!(GlobMatcher::compile("").unwrap_err(), GlobError::Empty);
        assert_eq!(GlobMatcher::compile("   ").unwrap_err(), GlobError::Empty);
    }

    #[test]
    fn oversized_pattern_is_rejected() {
        let result = GlobMatcher::compile_with_limit("prod-*-east-?-*", 16);
        assert!(matches!(result, Err(GlobError::Invalid { .. })));
    }

    #[test]
    fn translate_escapes_and_anchors() {
        assert_eq!(translate("a.*"), "(?s)^a\\..*$");
        assert_eq!(translate("x?"), "(?s)^x.$");
    }
}
