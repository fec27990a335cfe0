//! Line classifiers.
//!
//! A classifier looks at one line at a time and either names a tag for it
//! or declines. Classifiers never see each other's results; when several
//! tag the same line, the line carries all of those tags.

use regex::Regex;

use crate::document::Tag;
use crate::error::{Error, Result};

/// Decides which tag, if any, applies to a line.
///
/// `line` is the 1-based line number. Returning `Some("")` is the same as
/// returning `None`.
pub trait Classifier {
    fn classify(&self, line: usize, content: &str) -> Option<Tag>;
}

impl<F> Classifier for F
where
    F: Fn(usize, &str) -> Option<Tag>,
{
    fn classify(&self, line: usize, content: &str) -> Option<Tag> {
        self(line, content)
    }
}

/// Tags every line whose content matches a regular expression.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    tag: Tag,
    pattern: Regex,
}

impl PatternClassifier {
    /// # Errors
    /// [`Error::EmptyTag`] if `tag` is empty, [`Error::InvalidPattern`] if
    /// `pattern` does not compile.
    pub fn new(tag: impl Into<Tag>, pattern: &str) -> Result<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(Error::EmptyTag);
        }
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { tag, pattern })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Classifier for PatternClassifier {
    fn classify(&self, _line: usize, content: &str) -> Option<Tag> {
        self.pattern.is_match(content).then(|| self.tag.clone())
    }
}
