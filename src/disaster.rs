//! Disaster-preparedness supply placement.
//!
//! Given a road network of cities, decide whether supplies can be placed in
//! at most `limit` cities so that every city either holds supplies itself or
//! is directly connected to one that does (a bounded dominating set), and
//! enumerate every minimal way of doing so.
//!
//! Unlike the matching and Pokemon solvers this is a *set cover*, not an
//! exact cover: two supply locations are allowed to both reach the same
//! city. [`DisasterLinks`] keeps the classic dancing-links column (`up`/
//! `down`) rings for covering an item, but additionally gives each option
//! cell a row (`left`/`right`) ring so a single covered city can be spliced
//! out of every option that lists it without retiring the rest of that
//! option — the option may still be the best way to reach some other city
//! that isn't covered yet.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct CityHeader {
    name: String,
    left: usize,
    right: usize,
}

#[derive(Debug, Clone, Copy)]
struct CityCell {
    /// Column this cell sits in. Zero for the `n` header cells themselves.
    item: usize,
    /// Which option (i.e. which city's "place supplies here" choice) this
    /// cell belongs to. Zero for header cells.
    row: usize,
    up: usize,
    down: usize,
    left: usize,
    right: usize,
}

/// A dancing-links encoding of a road network for bounded dominating-set
/// search.
///
/// Built once from a symmetric adjacency map (see
/// [`crate::builders::make_symmetric`] if the input only lists edges in one
/// direction) and then mutated in place as [`DisasterLinks::is_disaster_ready`]
/// or [`DisasterLinks::all_configurations`] search and backtrack.
#[derive(Debug, Clone)]
pub struct DisasterLinks {
    items: Vec<CityHeader>,
    cells: Vec<CityCell>,
    names: Vec<String>,
}

impl DisasterLinks {
    /// Builds the solver from a road network where every edge is listed in
    /// both directions (`road_network[a]` contains `b` iff
    /// `road_network[b]` contains `a`).
    ///
    /// A city with no entry of its own (only appearing as someone else's
    /// neighbor) is not a defect in the algorithm, but every city that needs
    /// to be coverable must have a key, even if its neighbor set is empty.
    #[must_use]
    pub fn new(road_network: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let names: Vec<String> = road_network.keys().cloned().collect();
        let n = names.len();
        let index_of: BTreeMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i + 1))
            .collect();

        let mut items = Vec::with_capacity(n + 1);
        items.push(CityHeader {
            name: String::new(),
            left: n,
            right: if n == 0 { 0 } else { 1 },
        });
        for i in 1..=n {
            items.push(CityHeader {
                name: names[i - 1].clone(),
                left: i - 1,
                right: if i == n { 0 } else { i + 1 },
            });
        }

        let mut cells = Vec::with_capacity(n + 1);
        cells.push(CityCell {
            item: 0,
            row: 0,
            up: 0,
            down: 0,
            left: 0,
            right: 0,
        });
        for i in 1..=n {
            cells.push(CityCell {
                item: 0,
                row: 0,
                up: i,
                down: i,
                left: 0,
                right: 0,
            });
        }

        let mut links = DisasterLinks { items, cells, names };
        for (city, neighbors) in road_network {
            let city_idx = index_of[city.as_str()];
            let mut row_items: Vec<usize> =
                neighbors.iter().map(|nb| index_of[nb.as_str()]).collect();
            row_items.push(city_idx);
            row_items.sort_unstable();
            row_items.dedup();
            links.append_option(city_idx, &row_items);
        }
        links
    }

    /// Appends one option row (city `row`'s "place supplies here" choice,
    /// covering every item in `items_in_row`) to the bottom of each named
    /// column.
    fn append_option(&mut self, row: usize, items_in_row: &[usize]) {
        let start = self.cells.len();
        let count = items_in_row.len();
        for (k, &it) in items_in_row.iter().enumerate() {
            let cell_idx = self.cells.len();
            let left = if k == 0 { start + count - 1 } else { cell_idx - 1 };
            let right = if k == count - 1 { start } else { cell_idx + 1 };
            let header = it;
            let up = self.cells[header].up;
            self.cells.push(CityCell {
                item: it,
                row,
                up,
                down: header,
                left,
                right,
            });
            self.cells[up].down = cell_idx;
            self.cells[header].up = cell_idx;
        }
    }

    /// Hides `item` from the items ring and detaches every cell in its
    /// column from the option row that cell belongs to, without touching
    /// any other column. Those rows stay selectable for their remaining
    /// items.
    fn cover_city(&mut self, item: usize) {
        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = r;
        self.items[r].left = l;

        let mut cur = self.cells[item].down;
        while cur != item {
            let (cl, cr) = (self.cells[cur].left, self.cells[cur].right);
            self.cells[cl].right = cr;
            self.cells[cr].left = cl;
            cur = self.cells[cur].down;
        }
    }

    /// Exact inverse of [`DisasterLinks::cover_city`].
    fn uncover_city(&mut self, item: usize) {
        let mut cur = self.cells[item].up;
        while cur != item {
            let (cl, cr) = (self.cells[cur].left, self.cells[cur].right);
            self.cells[cl].right = cur;
            self.cells[cr].left = cur;
            cur = self.cells[cur].up;
        }

        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = item;
        self.items[r].left = item;
    }

    /// Covers every item in the option row that owns `anchor`, returning the
    /// item indices covered (in traversal order) so the caller can undo them
    /// in reverse.
    fn cover_option_row(&mut self, anchor: usize) -> Vec<usize> {
        let mut covered = Vec::new();
        let mut cur = anchor;
        loop {
            let it = self.cells[cur].item;
            self.cover_city(it);
            covered.push(it);
            cur = self.cells[cur].right;
            if cur == anchor {
                break;
            }
        }
        covered
    }

    fn uncover_option_row(&mut self, covered: &[usize]) {
        for &it in covered.iter().rev() {
            self.uncover_city(it);
        }
    }

    /// Number of options that currently touch `item`'s column.
    fn column_len(&self, header: usize) -> usize {
        let mut len = 0;
        let mut cur = self.cells[header].down;
        while cur != header {
            len += 1;
            cur = self.cells[cur].down;
        }
        len
    }

    /// Picks the uncovered city with the fewest candidate supply locations,
    /// or `None` once every city is covered.
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

    /// Tries to cover every city using at most `limit` supply locations.
    ///
    /// On success `chosen` holds one valid set of supply cities (not
    /// necessarily the smallest); on failure `chosen` is restored to
    /// whatever the caller passed in.
    ///
    /// ```
    /// use dlx_cover::disaster::DisasterLinks;
    /// use dlx_cover::builders::from_links;
    /// use std::collections::BTreeSet;
    ///
    /// let triangle = from_links(&[("A", "B"), ("B", "C"), ("C", "A")]);
    /// let mut solver = DisasterLinks::new(&triangle);
    /// let mut chosen = BTreeSet::new();
    /// assert!(solver.is_disaster_ready(1, &mut chosen));
    /// assert_eq!(chosen.len(), 1);
    /// ```
    pub fn is_disaster_ready(&mut self, limit: usize, chosen: &mut BTreeSet<String>) -> bool {
        let Some(item) = self.choose_item() else {
            log::debug!("every city already covered with {} supplies chosen", chosen.len());
            return true;
        };
        if limit == 0 {
            log::trace!("supply limit exhausted with city {} still uncovered", self.names[item - 1]);
            return false;
        }

        let header = item;
        let mut option_cell = self.cells[header].down;
        while option_cell != header {
            let row = self.cells[option_cell].row;
            let next = self.cells[option_cell].down;
            let covered = self.cover_option_row(option_cell);
            chosen.insert(self.names[row - 1].clone());

            if self.is_disaster_ready(limit - 1, chosen) {
                return true;
            }

            chosen.remove(&self.names[row - 1]);
            self.uncover_option_row(&covered);
            option_cell = next;
        }
        false
    }

    /// Enumerates every way to cover all cities using at most `limit`
    /// supply locations.
    ///
    /// Each returned set is complete on its own (further supply locations
    /// are not added once a configuration already covers every city), but
    /// sets of different sizes up to `limit` can both appear.
    #[must_use]
    pub fn all_configurations(&mut self, limit: usize) -> BTreeSet<BTreeSet<String>> {
        log::debug!("enumerating supply configurations with at most {limit} supplies");
        let mut results = BTreeSet::new();
        let mut chosen = BTreeSet::new();
        self.all_configurations_rec(limit, &mut chosen, &mut results);
        log::debug!("found {} configurations", results.len());
        results
    }

    fn all_configurations_rec(
        &mut self,
        limit: usize,
        chosen: &mut BTreeSet<String>,
        results: &mut BTreeSet<BTreeSet<String>>,
    ) {
        let Some(item) = self.choose_item() else {
            results.insert(chosen.clone());
            return;
        };
        if limit == 0 {
            return;
        }

        let header = item;
        let mut option_cell = self.cells[header].down;
        while option_cell != header {
            let row = self.cells[option_cell].row;
            let next = self.cells[option_cell].down;
            let covered = self.cover_option_row(option_cell);
            chosen.insert(self.names[row - 1].clone());

            self.all_configurations_rec(limit - 1, chosen, results);

            chosen.remove(&self.names[row - 1]);
            self.uncover_option_row(&covered);
            option_cell = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::from_links;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn triangle_needs_one_supply() {
        let triangle = from_links(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let mut solver = DisasterLinks::new(&triangle);
        let mut chosen = BTreeSet::new();
        assert!(solver.is_disaster_ready(1, &mut chosen));
        assert_eq!(chosen.len(), 1);

        let mut solver = DisasterLinks::new(&triangle);
        let mut chosen = BTreeSet::new();
        assert!(!solver.is_disaster_ready(0, &mut chosen));
    }

    #[test]
    fn two_disjoint_hubs_need_two_supplies() {
        // C1-H1, C1-H2, C2-H3, C2-H4 (no edge between the two hubs): a
        // stand-in for the "ethene-like" fixture used in the original
        // disaster readiness tests, small enough to verify by hand.
        let net = from_links(&[("C1", "H1"), ("C1", "H2"), ("C2", "H3"), ("C2", "H4")]);

        let mut solver = DisasterLinks::new(&net);
        let mut chosen = BTreeSet::new();
        assert!(!solver.is_disaster_ready(1, &mut chosen));

        let mut solver = DisasterLinks::new(&net);
        let mut chosen = BTreeSet::new();
        assert!(solver.is_disaster_ready(2, &mut chosen));
        assert_eq!(chosen, BTreeSet::from(["C1".to_string(), "C2".to_string()]));
    }

    #[test]
    fn all_configurations_finds_every_single_vertex_cover() {
        let triangle = from_links(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let mut solver = DisasterLinks::new(&triangle);
        let configs = solver.all_configurations(1);
        assert_eq!(configs.len(), 3);
        for config in &configs {
            assert_eq!(config.len(), 1);
        }
    }

    #[test]
    fn cover_uncover_round_trip_restores_state() {
        let triangle = from_links(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let mut solver = DisasterLinks::new(&triangle);
        let before = solver.clone();

        let covered = solver.cover_option_row(solver.cells[1].down);
        solver.uncover_option_row(&covered);

        assert_eq!(solver.items.len(), before.items.len());
        for (a, b) in solver.items.iter().zip(before.items.iter()) {
            assert_eq!(a.left, b.left);
            assert_eq!(a.right, b.right);
        }
    }
}
