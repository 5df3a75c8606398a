use std::{fmt, str};

use crate::{Label, LabelError, LabelSet};

/// A disjunction of labels, written `team=a,team=b`: any one of them is enough.
#[derive(Clone, Hash, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelMatcher {
    terms: Vec<Label>,
}

impl LabelMatcher {
    pub fn new(terms: Vec<Label>) -> Result<Self, LabelError> {
        if terms.is_empty() {
            return Err(LabelError::EmptyMatcher);
        }

        Ok(LabelMatcher { terms })
    }

    /// The OR terms, in the order they were written.
    pub fn terms(&self) -> &[Label] {
        &self.terms
    }

    /// True if at least one of the terms is among `labels`.
    pub fn matches(&self, labels: &LabelSet) -> bool {
        self.terms.iter().any(|term| labels.contains(term))
    }
}

impl str::FromStr for LabelMatcher {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(LabelError::EmptyMatcher);
        }

        let terms = s.split(',').map(str::parse).collect::<Result<Vec<Label>, _>>()?;

        LabelMatcher::new(terms)
    }
}

impl TryFrom<String> for LabelMatcher {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LabelMatcher> for String {
    fn from(matcher: LabelMatcher) -> Self {
        matcher.to_string()
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }

            fmt::Display::fmt(term, f)?;
        }

        Ok(())
    }
}

/// The label matchers of a federated graph. A subgraph must satisfy all of them.
///
/// An empty set is not a wildcard: it only selects subgraphs without any label.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MatcherSet(Vec<LabelMatcher>);

impl MatcherSet {
    pub fn new(matchers: Vec<LabelMatcher>) -> Self {
        MatcherSet(matchers)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LabelMatcher> {
        self.0.iter()
    }

    /// Parse every matcher string, failing on the first invalid one.
    pub fn parse<I, S>(matchers: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        matchers.into_iter().map(|matcher| matcher.as_ref().parse::<LabelMatcher>()).collect()
    }
}

impl FromIterator<LabelMatcher> for MatcherSet {
    fn from_iter<T: IntoIterator<Item = LabelMatcher>>(iter: T) -> Self {
        MatcherSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MatcherSet {
    type Item = &'a LabelMatcher;
    type IntoIter = std::slice::Iter<'a, LabelMatcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
