use crate::error::{PrepError, Result};
use regex::bytes::Regex;
use std::fs;
use std::path::Path;

/// Compiled `^(p1|p2|...).*$` matcher for header lines.
///
/// Lines are matched as raw bytes so documents that are not valid UTF-8 can
/// still be filtered. The fragments themselves are ordinary regex syntax.
#[derive(Debug, Clone)]
pub struct HeaderMatcher {
    re: Regex,
}

impl HeaderMatcher {
    /// Read one fragment per line from `path`, skipping blank lines.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PrepError::PatternFile { path: path.to_path_buf(), source })?;
        let fragments = collect_fragments(text.lines());
        if fragments.is_empty() {
            return Err(PrepError::EmptyPatternSet(path.display().to_string()));
        }
        let matcher = Self::compile(&fragments)?;
        tracing::info!(path = %path.display(), patterns = fragments.len(), "loaded header patterns");
        Ok(matcher)
    }

    /// Build a matcher from in-memory fragments, with the same trimming rules as [`HeaderMatcher::load`].
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let owned: Vec<S> = patterns.into_iter().collect();
        let fragments = collect_fragments(owned.iter().map(|p| p.as_ref()));
        if fragments.is_empty() {
            return Err(PrepError::EmptyPatternSet("inline pattern list".into()));
        }
        Self::compile(&fragments)
    }

    fn compile(fragments: &[&str]) -> Result<Self> {
        // (?-u:.) lets the tail run over bytes that are not UTF-8.
        let expr = format!(r"^({})(?-u:.)*$", fragments.join("|"));
        let re = Regex::new(&expr)?;
        Ok(Self { re })
    }

    /// True when `line` starts a header. The line terminator (`\n`, `\r\n` or `\r`) is ignored.
    pub fn is_header(&self, line: &[u8]) -> bool {
        let subject = line.strip_suffix(b"\n").unwrap_or(line);
        let subject = subject.strip_suffix(b"\r").unwrap_or(subject);
        self.re.is_match(subject)
    }

    /// The combined expression.
    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }
}

fn collect_fragments<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    lines.map(str::trim).filter(|l| !l.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_any_listed_prefix() {
        let m = HeaderMatcher::from_patterns(["From:", "Subject:", r"X-[A-Za-z-]+:"]).unwrap();
        assert!(m.is_header(b"From: someone@example.com\n"));
        assert!(m.is_header(b"Subject: hi"));
        assert!(m.is_header(b"X-Mailer: elm\n"));
        assert!(!m.is_header(b"Body text From: quoted\n"));
        assert!(!m.is_header(b"\n"));
    }

    #[test]
    fn blank_and_padded_fragments_are_trimmed() {
        let m = HeaderMatcher::from_patterns(["  Path:  ", "", "   "]).unwrap();
        assert_eq!(m.as_str(), r"^(Path:)(?-u:.)*$");
    }

    #[test]
    fn non_utf8_tail_still_matches() {
        let m = HeaderMatcher::from_patterns(["Organization:"]).unwrap();
        assert!(m.is_header(b"Organization: Universit\xe9 de Montr\xe9al\n"));
    }

    #[test]
    fn line_terminator_is_not_part_of_the_match() {
        let m = HeaderMatcher::from_patterns([r"Lines:\s*\d+$"]).unwrap();
        assert!(m.is_header(b"Lines: 12\n"));
        assert!(m.is_header(b"Lines: 12\r\n"));
        assert!(m.is_header(b"Lines: 12\r"));
        assert!(!m.is_header(b"Lines: 12 more\r\n"));
    }

    #[test]
    fn empty_pattern_list_is_rejected() {
        let err = HeaderMatcher::from_patterns(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, PrepError::EmptyPatternSet(_)));
        assert!(err.is_config());
    }

    #[test]
    fn unbalanced_fragment_fails_to_compile() {
        let err = HeaderMatcher::from_patterns(["From:", "Subject:("]).unwrap_err();
        assert!(matches!(err, PrepError::PatternCompile(_)));
    }
}
