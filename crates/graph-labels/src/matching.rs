use std::collections::{BTreeSet, HashSet};

use crate::{LabelMatcher, LabelSet, MatcherSet};

/// Does a subgraph with `labels` belong to a federated graph with `matchers`?
///
/// Every matcher must have at least one of its terms among the labels. An empty matcher set
/// only accepts subgraphs that have no labels at all.
pub fn satisfies(labels: &LabelSet, matchers: &MatcherSet) -> bool {
    if matchers.is_empty() {
        return labels.is_empty();
    }

    matchers.iter().all(|matcher| matcher.matches(labels))
}

/// The names of all the subgraphs satisfying `matchers`, sorted.
pub fn membership<'a, I>(subgraphs: I, matchers: &MatcherSet) -> BTreeSet<String>
where
    I: IntoIterator<Item = (&'a str, &'a LabelSet)>,
{
    subgraphs
        .into_iter()
        .filter(|(_, labels)| satisfies(labels, matchers))
        .map(|(name, _)| name.to_owned())
        .collect()
}

/// Set equality over matchers: order and duplicates are ignored.
pub fn matcher_sets_equal(one: &MatcherSet, other: &MatcherSet) -> bool {
    let one: HashSet<&LabelMatcher> = one.iter().collect();
    let other: HashSet<&LabelMatcher> = other.iter().collect();

    one.len() == other.len() && one.iter().all(|matcher| other.contains(matcher))
}

/// A requested change to the label matchers of a federated graph.
#[derive(Clone, Copy, Debug)]
pub struct MatcherUpdate<'a> {
    pub current: &'a MatcherSet,
    pub new: &'a MatcherSet,
    /// The request asks to clear the matchers. Takes precedence over `new`.
    pub unset: bool,
    /// Contracts derive their matchers from their source graph.
    pub is_contract: bool,
}

/// Whether applying `update` changes the matchers of the graph, and therefore its membership.
///
/// An empty `new` set without `unset` means "no matchers in this request" and is never a change.
pub fn label_matchers_changed(update: MatcherUpdate<'_>) -> bool {
    let MatcherUpdate {
        current,
        new,
        unset,
        is_contract,
    } = update;

    if is_contract && new.is_empty() {
        return false;
    }

    if unset {
        return !current.is_empty();
    }

    if new.is_empty() {
        return false;
    }

    !matcher_sets_equal(current, new)
}
