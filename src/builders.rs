//! Input-normalization helpers shared by the disaster and matching solvers.
//!
//! These mirror `DisasterUtilities.h`'s `makeSymmetric`/`isCovered` pair from
//! the original source, plus a couple of convenience constructors used by
//! the matching test suite.

use std::collections::{BTreeMap, BTreeSet};

/// Returns a new adjacency map where every edge is present in both
/// directions: if `a` links to `b`, the result also has `b` link to `a`.
///
/// Disaster-readiness input is not required to list reverse edges; callers
/// assemble a symmetric map with this helper before handing it to
/// [`crate::disaster::DisasterLinks::new`].
///
/// ```
/// use dlx_cover::builders::make_symmetric;
/// use std::collections::{BTreeMap, BTreeSet};
///
/// let mut cities = BTreeMap::new();
/// cities.insert("A".to_string(), BTreeSet::from(["C".to_string()]));
/// cities.insert("B".to_string(), BTreeSet::from(["C".to_string()]));
///
/// let symmetric = make_symmetric(&cities);
/// assert!(symmetric["C"].contains("A"));
/// assert!(symmetric["C"].contains("B"));
/// ```
#[must_use]
pub fn make_symmetric(
    source: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut result = source.clone();
    for (from, neighbors) in source {
        for to in neighbors {
            result.entry(from.clone()).or_default().insert(to.clone());
            result.entry(to.clone()).or_default().insert(from.clone());
        }
    }
    result
}

/// True if `city` is itself a supply location or has a supplied neighbor.
///
/// A read-only predicate independent of the solver, useful for sanity
/// checking a configuration a search returned, or for writing tests without
/// re-deriving coverage by hand.
///
/// # Panics
///
/// Panics if `city` is not a key of `road_network`, mirroring the original
/// source's `roadNetwork.at(city)` bounds-checked lookup.
#[must_use]
pub fn is_covered(
    city: &str,
    road_network: &BTreeMap<String, BTreeSet<String>>,
    supply_locations: &BTreeSet<String>,
) -> bool {
    if supply_locations.contains(city) {
        return true;
    }
    road_network[city]
        .iter()
        .any(|neighbor| supply_locations.contains(neighbor))
}

/// Builds an unweighted adjacency map from a flat list of edges, useful for
/// constructing small matching test fixtures without repeating each city's
/// name across a `BTreeMap` literal.
///
/// ```
/// use dlx_cover::builders::from_links;
///
/// let people = from_links(&[("A", "B"), ("B", "C")]);
/// assert!(people["A"].contains("B"));
/// assert!(people["B"].contains("A"));
/// assert!(people["B"].contains("C"));
/// ```
#[must_use]
pub fn from_links(edges: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
    let mut result: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for &(a, b) in edges {
        result
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        result
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }
    result
}

/// Builds a weighted adjacency map from a flat list of `(a, b, weight)`
/// triples, for use with [`crate::matching::MatchingLinks::new_weighted`].
///
/// ```
/// use dlx_cover::builders::from_weighted_links;
///
/// let people = from_weighted_links(&[("A", "B", 1), ("B", "C", 2)]);
/// assert_eq!(people["A"]["B"], 1);
/// assert_eq!(people["C"]["B"], 2);
/// ```
#[must_use]
pub fn from_weighted_links(edges: &[(&str, &str, i64)]) -> BTreeMap<String, BTreeMap<String, i64>> {
    let mut result: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for &(a, b, weight) in edges {
        result
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), weight);
        result
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), weight);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_symmetric_adds_reverse_edges() {
        let mut cities = BTreeMap::new();
        cities.insert("A".to_string(), BTreeSet::from(["C".to_string()]));
        cities.insert("B".to_string(), BTreeSet::from(["C".to_string()]));
        cities.insert("C".to_string(), BTreeSet::new());

        let sym = make_symmetric(&cities);
        assert_eq!(sym["C"], BTreeSet::from(["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn is_covered_checks_self_and_neighbors() {
        let cities = from_links(&[("A", "C"), ("B", "C")]);
        let supplied = BTreeSet::from(["C".to_string()]);
        assert!(is_covered("A", &cities, &supplied));
        assert!(is_covered("C", &cities, &supplied));

        let empty = BTreeSet::new();
        assert!(!is_covered("A", &cities, &empty));
    }

    #[test]
    fn from_weighted_links_is_symmetric() {
        let people = from_weighted_links(&[("A", "B", 1), ("A", "D", 8)]);
        assert_eq!(people["D"]["A"], 8);
        assert_eq!(people["B"]["A"], 1);
    }
}
