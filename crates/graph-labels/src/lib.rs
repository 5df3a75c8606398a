//! Labels attached to subgraphs, and the label matchers federated graphs use to select them.
//!
//! A subgraph carries an unordered [`LabelSet`]. A federated graph carries a [`MatcherSet`]: a
//! sequence of [`LabelMatcher`]s, each of them a comma separated list of labels. A subgraph
//! belongs to a federated graph when every matcher of the set has at least one of its labels
//! present on the subgraph. See [`satisfies`] for the exact rules, including the empty matcher
//! set case.

mod error;
mod label;
mod matcher;
mod matching;

pub use self::{
    error::LabelError,
    label::{Label, LabelSet},
    matcher::{LabelMatcher, MatcherSet},
    matching::{MatcherUpdate, label_matchers_changed, matcher_sets_equal, membership, satisfies},
};
