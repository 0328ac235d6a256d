//! Repository filtering
//!
//! Regex include/exclude rules applied to repository names before entries are
//! grouped. An include match always admits; otherwise an exclude match
//! rejects; otherwise the repository is admitted only when no include
//! patterns are configured.

use crate::config::ReportConfig;
use crate::error::ConfigError;
use regex::Regex;

/// Compiled pattern matcher
#[derive(Debug, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

#[derive(Debug)]
struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a list of regex patterns
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .map(|regex| CompiledPattern {
                        source: pattern.clone(),
                        regex,
                    })
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// First pattern matching the name
    pub fn find_match(&self, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(name))
            .map(|p| p.source.as_str())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.find_match(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Decides which repositories appear in an overview
#[derive(Debug, Default)]
pub struct RepositoryFilter {
    include: PatternMatcher,
    exclude: PatternMatcher,
}

impl RepositoryFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: PatternMatcher::new(include)?,
            exclude: PatternMatcher::new(exclude)?,
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<Self, ConfigError> {
        Self::new(&config.include, &config.exclude)
    }

    /// A filter that admits every repository
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn admits(&self, repository: &str) -> bool {
        if self.include.matches(repository) {
            return true;
        }
        if self.exclude.matches(repository) {
            return false;
        }
        self.include.is_empty()
    }
}
