// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

/// Whitelist/blacklist predicate deciding which variables get frozen.
///
/// A variable is converted when the whitelist is absent or contains it, and
/// the blacklist is absent or does not contain it. A name on both lists is
/// not converted.
///
/// # Example
/// ```
/// use graph_freeze::freeze::VariableFilter;
///
/// let filter = VariableFilter::new(
///     Some(vec!["a".to_string(), "b".to_string()]),
///     Some(vec!["b".to_string()]),
/// );
/// assert!(filter.should_convert("a"));
/// assert!(!filter.should_convert("b"));
/// assert!(!filter.should_convert("c"));
///
/// assert!(VariableFilter::all().should_convert("anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableFilter {
    whitelist: Option<HashSet<String>>,
    blacklist: Option<HashSet<String>>,
}

impl VariableFilter {
    pub fn new<W, B>(whitelist: Option<W>, blacklist: Option<B>) -> Self
    where
        W: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            whitelist: whitelist.map(|w| w.into_iter().collect()),
            blacklist: blacklist.map(|b| b.into_iter().collect()),
        }
    }

    /// Converts every variable.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn should_convert(&self, name: &str) -> bool {
        self.whitelist.as_ref().map_or(true, |w| w.contains(name))
            && self.blacklist.as_ref().map_or(true, |b| !b.contains(name))
    }
}
