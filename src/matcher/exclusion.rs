use regex::{Regex, RegexBuilder};

/// Product-name patterns that must never be auto-detected.
#[derive(Debug, Clone)]
pub struct ExclusionPatterns {
    patterns: Vec<Regex>,
}

impl ExclusionPatterns {
    /// Compiles every pattern case-insensitively.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
