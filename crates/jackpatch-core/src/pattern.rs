//! Name patterns for selecting clients and ports.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Client pattern matching the hardware I/O clients.
pub const SYSTEM_CLIENT_PATTERN: &str = "system|firewire_pcm";

/// Pattern matching every name.
pub const MATCH_ALL: &str = ".*";

/// How a pattern is anchored against a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The pattern must match at the start of the name; trailing text is allowed
    #[default]
    Start,
    /// The pattern must match the whole name
    Full,
}

/// A compiled, anchored regular expression over client or port names.
///
/// With [`MatchMode::Start`], `in_` matches `in_1` but not `my_in_1`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    mode: MatchMode,
    regex: Regex,
}

impl NamePattern {
    /// Compile a start-anchored pattern.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] if the expression does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_mode(pattern, MatchMode::Start)
    }

    /// Compile a pattern with explicit anchoring.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`] if the expression does not compile.
    pub fn with_mode(pattern: &str, mode: MatchMode) -> Result<Self> {
        let invalid = |source| Error::InvalidPattern { pattern: pattern.to_string(), source };

        // Unbalanced groups like `a)|(b` would otherwise close the anchor group early.
        Regex::new(pattern).map_err(invalid)?;

        let anchored = match mode {
            MatchMode::Start => format!("^(?:{pattern})"),
            MatchMode::Full => format!("^(?:{pattern})$"),
        };
        let regex = Regex::new(&anchored).map_err(invalid)?;
        Ok(Self { source: pattern.to_string(), mode, regex })
    }

    /// Pattern matching every name.
    #[must_use]
    pub fn any() -> Self {
        Self {
            source: MATCH_ALL.to_string(),
            mode: MatchMode::Start,
            regex: Regex::new("^(?:.*)").expect("constant pattern compiles"),
        }
    }

    /// Pattern matching the hardware I/O clients.
    #[must_use]
    pub fn system_clients() -> Self {
        Self::new(SYSTEM_CLIENT_PATTERN).expect("constant pattern compiles")
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as given, without anchoring.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
