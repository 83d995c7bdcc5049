//! Perfect and maximum-weight matching over an undirected graph of people.
//!
//! Unlike [`crate::disaster`], pairing people is a genuine exact cover: once
//! `A` is matched to `B`, neither may appear in any other chosen pair, so
//! selecting an option retires both people's columns and every other option
//! that touches either of them. That lets each option cell carry only the
//! `up`/`down` column ring (no per-cell row ring is needed, since every
//! option has exactly two items and its partner cell is tracked directly).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::DlxError;

/// Two matched people, stored in a canonical (lexicographically sorted)
/// order so that `Pair::new("A", "B") == Pair::new("B", "A")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair(String, String);

impl Pair {
    /// Builds a pair, reordering the two names if necessary.
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Pair(a.to_string(), b.to_string())
        } else {
            Pair(b.to_string(), a.to_string())
        }
    }

    /// The lexicographically smaller name.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0
    }

    /// The lexicographically larger name.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Debug, Clone)]
struct PersonHeader {
    left: usize,
    right: usize,
}

#[derive(Debug, Clone, Copy)]
struct PersonCell {
    item: usize,
    up: usize,
    down: usize,
    partner: usize,
}

/// A dancing-links encoding of a people graph for perfect and max-weight
/// matching search.
#[derive(Debug, Clone)]
pub struct MatchingLinks {
    items: Vec<PersonHeader>,
    cells: Vec<PersonCell>,
    names: Vec<String>,
    weight_of: BTreeMap<(usize, usize), i64>,
    /// True if some person has no listed partner at all, or the graph has
    /// an odd number of people; either makes a perfect matching impossible
    /// on its face.
    pub has_singleton: bool,
}

impl MatchingLinks {
    /// Builds an unweighted solver for [`MatchingLinks::has_perfect_links`]
    /// and [`MatchingLinks::all_perfect_links`].
    ///
    /// `people` must be symmetric: `people[a]` contains `b` iff `people[b]`
    /// contains `a`.
    #[must_use]
    pub fn new(people: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let weighted: BTreeMap<String, BTreeMap<String, i64>> = people
            .iter()
            .map(|(name, neighbors)| {
                (
                    name.clone(),
                    neighbors.iter().map(|n| (n.clone(), 1)).collect(),
                )
            })
            .collect();
        Self::new_weighted(&weighted).expect("unweighted edges are never negative or inconsistent")
    }

    /// Builds a solver for [`MatchingLinks::max_weight_matching`] from a
    /// symmetric weighted adjacency map.
    ///
    /// # Errors
    ///
    /// Returns [`DlxError::NegativeWeight`] if any edge weight is negative,
    /// or [`DlxError::InconsistentWeight`] if `a`'s entry for `b` disagrees
    /// with `b`'s entry for `a` (including one side missing the edge).
    pub fn new_weighted(
        people: &BTreeMap<String, BTreeMap<String, i64>>,
    ) -> Result<Self, DlxError> {
        for (a, neighbors) in people {
            for (b, &weight) in neighbors {
                if weight < 0 {
                    return Err(DlxError::NegativeWeight {
                        a: a.clone(),
                        b: b.clone(),
                        weight,
                    });
                }
                match people.get(b).and_then(|back| back.get(a)) {
                    Some(&back_weight) if back_weight == weight => {}
                    _ => {
                        return Err(DlxError::InconsistentWeight {
                            a: a.clone(),
                            b: b.clone(),
                        })
                    }
                }
            }
        }

        let names: Vec<String> = people.keys().cloned().collect();
        let n = names.len();
        let index_of: BTreeMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i + 1))
            .collect();

        let mut items = Vec::with_capacity(n + 1);
        items.push(PersonHeader {
            left: n,
            right: if n == 0 { 0 } else { 1 },
        });
        for i in 1..=n {
            items.push(PersonHeader {
                left: i - 1,
                right: if i == n { 0 } else { i + 1 },
            });
        }

        let mut cells = Vec::with_capacity(n + 1);
        cells.push(PersonCell {
            item: 0,
            up: 0,
            down: 0,
            partner: 0,
        });
        for i in 1..=n {
            cells.push(PersonCell {
                item: 0,
                up: i,
                down: i,
                partner: 0,
            });
        }

        let has_singleton = n % 2 == 1 || people.values().any(|neighbors| neighbors.is_empty());

        let mut links = MatchingLinks {
            items,
            cells,
            names,
            weight_of: BTreeMap::new(),
            has_singleton,
        };

        let mut seen = BTreeSet::new();
        for (a, neighbors) in people {
            let a_idx = index_of[a.as_str()];
            for (b, &weight) in neighbors {
                let b_idx = index_of[b.as_str()];
                let key = (a_idx.min(b_idx), a_idx.max(b_idx));
                if seen.insert(key) {
                    links.append_pair(a_idx, b_idx);
                    links.weight_of.insert(key, weight);
                }
            }
        }
        Ok(links)
    }

    fn append_pair(&mut self, a: usize, b: usize) {
        let cell_a = self.cells.len();
        let cell_b = cell_a + 1;

        let up_a = self.cells[a].up;
        self.cells.push(PersonCell {
            item: a,
            up: up_a,
            down: a,
            partner: cell_b,
        });
        self.cells[up_a].down = cell_a;
        self.cells[a].up = cell_a;

        let up_b = self.cells[b].up;
        self.cells.push(PersonCell {
            item: b,
            up: up_b,
            down: b,
            partner: cell_a,
        });
        self.cells[up_b].down = cell_b;
        self.cells[b].up = cell_b;
    }

    fn weight(&self, a: usize, b: usize) -> i64 {
        self.weight_of[&(a.min(b), a.max(b))]
    }

    /// Hides `item`'s column and, for every row that touches it, splices
    /// that row's other cell out of its own column too.
    fn cover(&mut self, item: usize) {
        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = r;
        self.items[r].left = l;

        let mut row = self.cells[item].down;
        while row != item {
            self.hide_row(row);
            row = self.cells[row].down;
        }
    }

    fn hide_row(&mut self, cell: usize) {
        let partner = self.cells[cell].partner;
        let (up, down) = (self.cells[partner].up, self.cells[partner].down);
        self.cells[up].down = down;
        self.cells[down].up = up;
    }

    /// Exact inverse of [`MatchingLinks::cover`].
    fn uncover(&mut self, item: usize) {
        let mut row = self.cells[item].up;
        while row != item {
            self.unhide_row(row);
            row = self.cells[row].up;
        }

        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = item;
        self.items[r].left = item;
    }

    fn unhide_row(&mut self, cell: usize) {
        let partner = self.cells[cell].partner;
        let (up, down) = (self.cells[partner].up, self.cells[partner].down);
        self.cells[up].down = partner;
        self.cells[down].up = partner;
    }

    fn column_len(&self, header: usize) -> usize {
        let mut len = 0;
        let mut cur = self.cells[header].down;
        while cur != header {
            len += 1;
            cur = self.cells[cur].down;
        }
        len
    }

    fn choose_item(&self) -> Option<usize> {
        let first = self.items[0].right;
        if first == 0 {
            return None;
        }
        let mut best = first;
        let mut best_len = self.column_len(first);
        let mut cur = self.items[first].right;
        while cur != 0 {
            let len = self.column_len(cur);
            if len < best_len {
                best = cur;
                best_len = len;
            }
            cur = self.items[cur].right;
        }
        Some(best)
    }

    /// True if every person can be paired off with exactly one partner.
    ///
    /// ```
    /// use dlx_cover::matching::MatchingLinks;
    /// use dlx_cover::builders::from_links;
    ///
    /// let square = from_links(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")]);
    /// assert!(MatchingLinks::new(&square).has_perfect_links());
    ///
    /// let pentagon = from_links(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "A")]);
    /// assert!(!MatchingLinks::new(&pentagon).has_perfect_links());
    /// ```
    #[must_use]
    pub fn has_perfect_links(&mut self) -> bool {
        if self.has_singleton {
            log::debug!("graph has a singleton; perfect matching is impossible");
            return false;
        }
        self.search_perfect()
    }

    fn search_perfect(&mut self) -> bool {
        if self.has_singleton {
            return false;
        }
        let Some(item) = self.choose_item() else {
            return true;
        };

        let mut row = self.cells[item].down;
        while row != item {
            let partner_item = self.cells[row].partner;
            let partner_item_col = self.cells[partner_item].item;
            self.cover(item);
            self.cover(partner_item_col);

            if self.search_perfect() {
                self.uncover(partner_item_col);
                self.uncover(item);
                return true;
            }

            self.uncover(partner_item_col);
            self.uncover(item);
            row = self.cells[row].down;
        }
        false
    }

    /// Enumerates every way to pair off all people.
    #[must_use]
    pub fn all_perfect_links(&mut self) -> BTreeSet<BTreeSet<Pair>> {
        if self.has_singleton {
            log::debug!("graph has a singleton; no perfect matching to enumerate");
            return BTreeSet::new();
        }
        let mut results = BTreeSet::new();
        let mut chosen = BTreeSet::new();
        self.all_perfect_rec(&mut chosen, &mut results);
        results
    }

    fn all_perfect_rec(&mut self, chosen: &mut BTreeSet<Pair>, results: &mut BTreeSet<BTreeSet<Pair>>) {
        if self.has_singleton {
            return;
        }
        let Some(item) = self.choose_item() else {
            results.insert(chosen.clone());
            return;
        };

        let mut row = self.cells[item].down;
        while row != item {
            let partner_cell = self.cells[row].partner;
            let partner_item = self.cells[partner_cell].item;
            let pair = Pair::new(&self.names[item - 1], &self.names[partner_item - 1]);

            self.cover(item);
            self.cover(partner_item);
            chosen.insert(pair.clone());

            self.all_perfect_rec(chosen, results);

            chosen.remove(&pair);
            self.uncover(partner_item);
            self.uncover(item);
            row = self.cells[row].down;
        }
    }

    /// Finds the highest total-weight set of pairs, where leaving someone
    /// unmatched contributes zero. Negative weights are rejected at
    /// construction so "leave unmatched" is always weakly dominated by any
    /// available pair.
    ///
    /// ```
    /// use dlx_cover::matching::MatchingLinks;
    /// use dlx_cover::builders::from_weighted_links;
    ///
    /// let diamond = from_weighted_links(&[
    ///     ("A", "B", 1),
    ///     ("C", "D", 1),
    ///     ("A", "C", 10),
    ///     ("B", "D", 1),
    /// ]);
    /// let mut solver = MatchingLinks::new_weighted(&diamond).unwrap();
    /// let best = solver.max_weight_matching();
    /// assert_eq!(best.rank(), 10);
    /// ```
    #[must_use]
    pub fn max_weight_matching(&mut self) -> crate::RankedSet<Pair> {
        let mut best = crate::RankedSet::new();
        let mut current = crate::RankedSet::new();
        self.max_weight_rec(&mut current, &mut best);
        best
    }

    fn max_weight_rec(&mut self, current: &mut crate::RankedSet<Pair>, best: &mut crate::RankedSet<Pair>) {
        let Some(item) = self.choose_item() else {
            if *current > *best {
                *best = current.clone();
            }
            return;
        };

        // Leave `item`'s person unmatched.
        self.cover(item);
        self.max_weight_rec(current, best);
        self.uncover(item);

        let mut row = self.cells[item].down;
        while row != item {
            let partner_cell = self.cells[row].partner;
            let partner_item = self.cells[partner_cell].item;
            let pair = Pair::new(&self.names[item - 1], &self.names[partner_item - 1]);
            let weight = self.weight(item, partner_item);

            self.cover(item);
            self.cover(partner_item);
            current.insert(weight, pair.clone());

            self.max_weight_rec(current, best);

            current.remove(weight, &pair);
            self.uncover(partner_item);
            self.uncover(item);
            row = self.cells[row].down;
        }
    }
}
