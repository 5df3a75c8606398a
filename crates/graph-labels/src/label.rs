use std::{collections::HashSet, fmt, str};

use crate::LabelError;

/// A `key=value` pair attached to a subgraph.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    key: String,
    value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, LabelError> {
        let label = Label {
            key: key.into(),
            value: value.into(),
        };

        label.validate()?;

        Ok(label)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn validate(&self) -> Result<(), LabelError> {
        if self.key.is_empty() {
            return Err(LabelError::EmptyKey(self.to_string()));
        }

        if self.value.is_empty() {
            return Err(LabelError::EmptyValue(self.to_string()));
        }

        let invalid = self
            .key
            .chars()
            .chain(self.value.chars())
            .find(|character| !is_label_character(*character));

        match invalid {
            Some(character) => Err(LabelError::InvalidCharacter {
                label: self.to_string(),
                character,
            }),
            None => Ok(()),
        }
    }
}

fn is_label_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.')
}

impl str::FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            return Err(LabelError::MissingSeparator(s.to_owned()));
        };

        Label::new(key, value)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        f.write_str("=")?;
        f.write_str(&self.value)
    }
}

/// The labels of one subgraph. Unordered and without duplicates.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<Label>", into = "Vec<Label>")]
pub struct LabelSet(HashSet<Label>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.0.contains(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Label> {
        self.0.iter()
    }

    /// The labels in `key=value` order, for rendering and storage.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Label> {
        let mut labels: Vec<_> = self.0.iter().collect();
        labels.sort_unstable();
        labels.into_iter()
    }

    /// Parse every label, failing on the first invalid one.
    pub fn parse<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels.into_iter().map(|label| label.as_ref().parse::<Label>()).collect()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        LabelSet(iter.into_iter().collect())
    }
}

impl From<Vec<Label>> for LabelSet {
    fn from(labels: Vec<Label>) -> Self {
        labels.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<Label> {
    fn from(set: LabelSet) -> Self {
        let mut labels: Vec<_> = set.0.into_iter().collect();
        labels.sort_unstable();
        labels
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, label) in self.iter_sorted().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }

            fmt::Display::fmt(label, f)?;
        }

        Ok(())
    }
}
