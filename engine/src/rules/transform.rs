// Zoom transforms
//
// A zoom transform maps a thumbnail URL to its full-size counterpart. Every
// site's transform is an ordered table of rewrites: the first rewrite whose
// patterns all match is applied and the rest are never tried. What happens
// when nothing matches is per site, see [`NoMatch`].

use regex::Regex;

use super::RuleError;

pub(crate) fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// One entry of a rewrite table.
///
/// Applies when every substitution pattern matches and the exclusion (if any)
/// does not; substitutions then run in order, each replacing its first match.
/// Replacements use `${n}` group syntax.
#[derive(Debug, Clone)]
pub struct Rewrite {
    substitutions: Vec<(Regex, String)>,
    unless: Option<Regex>,
}

impl Rewrite {
    pub fn replace(pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        Ok(Self {
            substitutions: vec![(compile(pattern)?, replacement.to_string())],
            unless: None,
        })
    }

    /// Add a second substitution that is also required to match.
    pub fn then_replace(mut self, pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        self.substitutions
            .push((compile(pattern)?, replacement.to_string()));
        Ok(self)
    }

    /// Skip this rewrite for URLs matching `pattern`.
    pub fn unless(mut self, pattern: &str) -> Result<Self, RuleError> {
        self.unless = Some(compile(pattern)?);
        Ok(self)
    }

    pub fn applies(&self, url: &str) -> bool {
        self.substitutions.iter().all(|(re, _)| re.is_match(url))
            && !self.unless.as_ref().is_some_and(|re| re.is_match(url))
    }

    pub fn apply(&self, url: &str) -> String {
        self.substitutions
            .iter()
            .fold(url.to_string(), |acc, (re, replacement)| {
                re.replace(&acc, replacement.as_str()).into_owned()
            })
    }
}

/// Outcome of a transform when no rewrite applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatch {
    /// No size marker found: do not zoom.
    Skip,
    /// Hand the URL back untouched and let the panel show it as is.
    KeepOriginal,
}

#[derive(Debug, Clone)]
pub struct ZoomTransform {
    rewrites: Vec<Rewrite>,
    no_match: NoMatch,
}

impl ZoomTransform {
    /// Ordered rewrites; a URL none of them applies to yields `None`.
    pub fn first_match(rewrites: Vec<Rewrite>) -> Self {
        Self {
            rewrites,
            no_match: NoMatch::Skip,
        }
    }

    /// Rewrites applied when they match, the original URL otherwise.
    pub fn or_original(rewrites: Vec<Rewrite>) -> Self {
        Self {
            rewrites,
            no_match: NoMatch::KeepOriginal,
        }
    }

    /// The thumbnail already is the full image.
    pub fn identity() -> Self {
        Self::or_original(Vec::new())
    }

    pub fn no_match(&self) -> NoMatch {
        self.no_match
    }

    pub fn apply(&self, url: &str) -> Option<String> {
        match self.rewrites.iter().find(|r| r.applies(url)) {
            Some(rewrite) => Some(rewrite.apply(url)),
            None => match self.no_match {
                NoMatch::Skip => None,
                NoMatch::KeepOriginal => Some(url.to_string()),
            },
        }
    }
}
