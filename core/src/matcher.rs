//! Path templates: `&`-joined regex atoms, `!` negates an atom.
//!
//! `"ground_fire&!small"` matches any path containing `ground_fire` that does
//! not also contain `small`. Matching is case-insensitive.

use std::sync::Arc;

use hashbrown::HashMap;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("template is empty")]
    EmptyTemplate,

    #[error("template {template:?} has an empty atom at position {index}")]
    EmptyAtom { template: String, index: usize },

    #[error("template {template:?} has an invalid regex {atom:?}: {source}")]
    InvalidRegex {
        template: String,
        atom: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
struct Atom {
    regex: Regex,
    /// Required result of `regex.is_match` (false for `!` atoms)
    expect: bool,
}

/// A compiled template
#[derive(Debug, Clone)]
pub struct PathMatcher {
    atoms: Vec<Atom>,
}

impl PathMatcher {
    pub fn compile(template: &str) -> Result<Self, MatcherError> {
        if template.trim().is_empty() {
            return Err(MatcherError::EmptyTemplate);
        }

        let atoms = template
            .split('&')
            .enumerate()
            .map(|(index, raw)| {
                let (expect, pattern) = match raw.strip_prefix('!') {
                    Some(rest) => (false, rest),
                    None => (true, raw),
                };
                if pattern.is_empty() {
                    return Err(MatcherError::EmptyAtom {
                        template: template.to_string(),
                        index,
                    });
                }
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| MatcherError::InvalidRegex {
                        template: template.to_string(),
                        atom: pattern.to_string(),
                        source,
                    })?;
                Ok(Atom { regex, expect })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { atoms })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.atoms
            .iter()
            .all(|atom| atom.regex.is_match(path) == atom.expect)
    }
}

/// Compiled templates keyed by their exact text
///
/// Templates that fail to compile are remembered as failed so the error is
/// logged once and the template stays non-matching.
#[derive(Debug, Default)]
pub struct MatcherCache {
    compiled: HashMap<String, Option<Arc<PathMatcher>>>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled matcher for a template, compiling on first use
    ///
    /// Returns `None` for blank or broken templates.
    pub fn get(&mut self, template: &str) -> Option<Arc<PathMatcher>> {
        if template.trim().is_empty() {
            return None;
        }
        if let Some(slot) = self.compiled.get(template) {
            return slot.clone();
        }

        let slot = match PathMatcher::compile(template) {
            Ok(matcher) => Some(Arc::new(matcher)),
            Err(e) => {
                tracing::warn!(error = %e, "Path template will never match");
                None
            }
        };
        self.compiled.insert(template.to_string(), slot.clone());
        slot
    }

    pub fn is_match(&mut self, template: &str, path: &str) -> bool {
        self.get(template).is_some_and(|m| m.is_match(path))
    }

    /// True if any template in the list matches
    pub fn any_match<S: AsRef<str>>(&mut self, templates: &[S], path: &str) -> bool {
        templates.iter().any(|t| self.is_match(t.as_ref(), path))
    }

    /// Number of cached templates, including failed ones
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}
