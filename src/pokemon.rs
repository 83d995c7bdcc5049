//! Pokemon type coverage: choosing a defensive team that resists every
//! attacking type in play, or an attacking moveset that is super effective
//! against every defending type in play.
//!
//! Both directions share one engine. The type chart is read as "defending
//! type -> attacking type -> damage multiplier"; [`CoverageKind::Defense`]
//! treats defending types as the options and attacking types as the items to
//! cover, [`CoverageKind::Attack`] transposes that. Exact coverage (each
//! item handled by exactly one pick) reuses the full-row removal from
//! [`crate::matching`]; overlapping coverage (an item may be handled by
//! several picks at once) reuses the single-cell splice from
//! [`crate::disaster`] — rows here are variable length, so unlike either of
//! those modules each option cell also carries a `left`/`right` row ring.

use std::collections::{BTreeMap, BTreeSet};

use crate::RankedSet;

/// Default cap on the number of defending types considered in one team.
pub const MAX_TEAM_SIZE: usize = 6;
/// Default cap on the number of attacking move types considered in one set.
pub const MAX_ATTACK_SLOTS: usize = 24;
/// Default cap on the number of distinct covers an overlapping search will
/// collect before giving up on exhaustiveness.
pub const MAX_OUTPUT_SIZE: usize = 10_000;

/// A damage multiplier from the type chart, ordered from best to worst for
/// the defending side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Multiplier {
    /// Reserved sentinel value; never produced by a real type chart entry.
    Empty = 0,
    Immune = 1,
    Fraction14 = 2,
    Fraction12 = 3,
    Normal = 4,
    Double = 5,
    Quadruple = 6,
}

impl Multiplier {
    /// Integer weight contributed to a [`RankedSet`]'s rank when a type is
    /// chosen for the item this multiplier applies to: the enum's ordinal,
    /// matching how the original source sums `multiplier` fields directly.
    #[must_use]
    pub fn weight(self) -> i64 {
        self as i64
    }

    fn is_resistance(self) -> bool {
        matches!(
            self,
            Multiplier::Immune | Multiplier::Fraction14 | Multiplier::Fraction12
        )
    }

    fn is_super_effective(self) -> bool {
        matches!(self, Multiplier::Double | Multiplier::Quadruple)
    }
}

/// Which side of the matchup a [`PokemonLinks`] search is assembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageKind {
    /// Pick defending types that resist every attacking type in play.
    Defense,
    /// Pick attacking move types that are super effective against every
    /// defending type in play.
    Attack,
}

#[derive(Debug, Clone)]
struct TypeHeader {
    name: String,
    left: usize,
    right: usize,
}

#[derive(Debug, Clone, Copy)]
struct TypeCell {
    item: usize,
    row: usize,
    weight: i64,
    up: usize,
    down: usize,
    left: usize,
    right: usize,
}

/// A dancing-links encoding of a type chart for defensive or offensive type
/// coverage search.
#[derive(Debug, Clone)]
pub struct PokemonLinks {
    items: Vec<TypeHeader>,
    cells: Vec<TypeCell>,
    /// Candidate type names, one per option row, indexed the same way as
    /// rows (`names[row - 1]`).
    names: Vec<String>,
    kind: CoverageKind,
    max_picks: usize,
    max_output_size: usize,
    output_limit_hit: bool,
}

impl PokemonLinks {
    /// Builds a defensive-coverage solver: options are defending types,
    /// items are the attacking types they must collectively resist.
    #[must_use]
    pub fn new(
        interactions: &BTreeMap<String, BTreeMap<String, Multiplier>>,
        max_team_size: usize,
        max_output_size: usize,
    ) -> Self {
        let attack_types: BTreeSet<String> = interactions
            .values()
            .flat_map(|chart| chart.keys().cloned())
            .collect();
        Self::build(
            interactions,
            &attack_types,
            CoverageKind::Defense,
            max_team_size,
            max_output_size,
        )
    }

    /// Builds an offensive-coverage solver restricted to `attack_types`:
    /// options are those attacking types, items are every defending type
    /// that appears in `interactions`.
    #[must_use]
    pub fn new_with_attack_types(
        interactions: &BTreeMap<String, BTreeMap<String, Multiplier>>,
        attack_types: &BTreeSet<String>,
        max_attack_slots: usize,
        max_output_size: usize,
    ) -> Self {
        Self::build(
            interactions,
            attack_types,
            CoverageKind::Attack,
            max_attack_slots,
            max_output_size,
        )
    }

    fn build(
        interactions: &BTreeMap<String, BTreeMap<String, Multiplier>>,
        attack_types: &BTreeSet<String>,
        kind: CoverageKind,
        max_picks: usize,
        max_output_size: usize,
    ) -> Self {
        // `rows`: for each option (candidate type), the (item name, weight)
        // cells it should occupy, already filtered to the multipliers that
        // matter for `kind`.
        let (option_names, item_names, rows): (
            Vec<String>,
            BTreeSet<String>,
            Vec<Vec<(String, i64)>>,
        ) = match kind {
            CoverageKind::Defense => {
                let option_names: Vec<String> = interactions.keys().cloned().collect();
                let rows = option_names
                    .iter()
                    .map(|defender| {
                        interactions[defender]
                            .iter()
                            .filter(|(_, m)| m.is_resistance())
                            .map(|(attacker, m)| (attacker.clone(), m.weight()))
                            .collect()
                    })
                    .collect();
                (option_names, attack_types.clone(), rows)
            }
            CoverageKind::Attack => {
                let option_names: Vec<String> = attack_types.iter().cloned().collect();
                let defender_names: BTreeSet<String> = interactions.keys().cloned().collect();
                let rows = option_names
                    .iter()
                    .map(|attacker| {
                        interactions
                            .iter()
                            .filter_map(|(defender, chart)| {
                                chart.get(attacker).and_then(|m| {
                                    m.is_super_effective().then(|| (defender.clone(), m.weight()))
                                })
                            })
                            .collect()
                    })
                    .collect();
                (option_names, defender_names, rows)
            }
        };

        let item_names: Vec<String> = item_names.into_iter().collect();
        let n_items = item_names.len();
        let item_index: BTreeMap<&str, usize> = item_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i + 1))
            .collect();

        let mut items = Vec::with_capacity(n_items + 1);
        items.push(TypeHeader {
            name: String::new(),
            left: n_items,
            right: if n_items == 0 { 0 } else { 1 },
        });
        for i in 1..=n_items {
            items.push(TypeHeader {
                name: item_names[i - 1].clone(),
                left: i - 1,
                right: if i == n_items { 0 } else { i + 1 },
            });
        }

        let mut cells = Vec::with_capacity(n_items + 1);
        cells.push(TypeCell {
            item: 0,
            row: 0,
            weight: 0,
            up: 0,
            down: 0,
            left: 0,
            right: 0,
        });
        for i in 1..=n_items {
            cells.push(TypeCell {
                item: 0,
                row: 0,
                weight: 0,
                up: i,
                down: i,
                left: 0,
                right: 0,
            });
        }

        let mut links = PokemonLinks {
            items,
            cells,
            names: option_names,
            kind,
            max_picks,
            max_output_size,
            output_limit_hit: false,
        };

        for (row_idx, row_cells) in rows.iter().enumerate() {
            if row_cells.is_empty() {
                continue;
            }
            let resolved: Vec<(usize, i64)> = row_cells
                .iter()
                .map(|(name, weight)| (item_index[name.as_str()], *weight))
                .collect();
            links.append_option(row_idx + 1, &resolved);
        }
        links
    }

    fn append_option(&mut self, row: usize, row_cells: &[(usize, i64)]) {
        let start = self.cells.len();
        let count = row_cells.len();
        for (k, &(item, weight)) in row_cells.iter().enumerate() {
            let cell_idx = self.cells.len();
            let left = if k == 0 { start + count - 1 } else { cell_idx - 1 };
            let right = if k == count - 1 { start } else { cell_idx + 1 };
            let up = self.cells[item].up;
            self.cells.push(TypeCell {
                item,
                row,
                weight,
                up,
                down: item,
                left,
                right,
            });
            self.cells[up].down = cell_idx;
            self.cells[item].up = cell_idx;
        }
    }

    /// Standard exact-cover removal: hides `item` and retires every other
    /// row that also touches it.
    fn cover_type(&mut self, item: usize) {
        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = r;
        self.items[r].left = l;

        let mut row_cell = self.cells[item].down;
        while row_cell != item {
            let mut j = self.cells[row_cell].right;
            while j != row_cell {
                let (up, down) = (self.cells[j].up, self.cells[j].down);
                self.cells[up].down = down;
                self.cells[down].up = up;
                j = self.cells[j].right;
            }
            row_cell = self.cells[row_cell].down;
        }
    }

    /// Exact inverse of [`PokemonLinks::cover_type`].
    fn uncover_type(&mut self, item: usize) {
        let mut row_cell = self.cells[item].up;
        while row_cell != item {
            let mut j = self.cells[row_cell].left;
            while j != row_cell {
                let (up, down) = (self.cells[j].up, self.cells[j].down);
                self.cells[up].down = j;
                self.cells[down].up = j;
                j = self.cells[j].left;
            }
            row_cell = self.cells[row_cell].up;
        }

        let header = &self.items[item];
        let (l, r) = (header.left, header.right);
        self.items[l].right = item;
        self.items[r].left = item;
    }

    /// Overlap-permitting removal: hides `item` but only detaches this
    /// column's own cells from their rows, leaving every other item those
    /// rows touch untouched.
    fn loose_cover_type(&mut self, item: usize) {
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

    /// Exact inverse of [`PokemonLinks::loose_cover_type`].
    fn loose_uncover_type(&mut self, item: usize) {
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

    /// Covers every item in the option row owning `anchor`, dispatching to
    /// the exact or loose primitive per `loose`. Returns the covered items
    /// in traversal order so [`PokemonLinks::unhide_options`] can unwind
    /// them in reverse.
    fn hide_options(&mut self, anchor: usize, loose: bool) -> Vec<usize> {
        let mut covered = Vec::new();
        let mut cur = anchor;
        loop {
            let it = self.cells[cur].item;
            if loose {
                self.loose_cover_type(it);
            } else {
                self.cover_type(it);
            }
            covered.push(it);
            cur = self.cells[cur].right;
            if cur == anchor {
                break;
            }
        }
        covered
    }

    /// Sum of every cell's weight in the option row owning `anchor`. An
    /// option can cover several items at once (e.g. a single defending type
    /// resisting two different attacking types), and the full row's weight
    /// — not just the anchor cell's — is what the original source sums into
    /// a chosen option's rank contribution. Must be called before the row
    /// is covered: loose cover splices cells out of this very row ring.
    fn row_weight_sum(&self, anchor: usize) -> i64 {
        let mut sum = 0;
        let mut cur = anchor;
        loop {
            sum += self.cells[cur].weight;
            cur = self.cells[cur].right;
            if cur == anchor {
                break;
            }
        }
        sum
    }

    fn unhide_options(&mut self, covered: &[usize], loose: bool) {
        for &it in covered.iter().rev() {
            if loose {
                self.loose_uncover_type(it);
            } else {
                self.uncover_type(it);
            }
        }
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

    /// Which side of the matchup this solver was built for.
    #[must_use]
    pub fn kind(&self) -> CoverageKind {
        self.kind
    }

    /// True if [`PokemonLinks::get_overlapping_type_coverage`] stopped early
    /// because it hit `max_output_size` distinct covers, meaning the result
    /// is not exhaustive.
    #[must_use]
    pub fn reached_output_limit(&self) -> bool {
        self.output_limit_hit
    }

    /// Finds every way to assign each item to exactly one pick, using at
    /// most `max_picks` picks.
    ///
    /// ```
    /// use dlx_cover::pokemon::{Multiplier, PokemonLinks};
    /// use std::collections::BTreeMap;
    ///
    /// let mut chart = BTreeMap::new();
    /// let mut ghost = BTreeMap::new();
    /// ghost.insert("Normal".to_string(), Multiplier::Immune);
    /// chart.insert("Ghost".to_string(), ghost);
    ///
    /// let mut solver = PokemonLinks::new(&chart, 6, 10_000);
    /// let covers = solver.get_exact_type_coverage();
    /// assert_eq!(covers.len(), 1);
    /// ```
    #[must_use]
    pub fn get_exact_type_coverage(&mut self) -> BTreeSet<RankedSet<String>> {
        log::debug!(
            "searching for exact {:?} coverage, max picks {}",
            self.kind,
            self.max_picks
        );
        let mut results = BTreeSet::new();
        let mut current = RankedSet::new();
        self.exact_rec(self.max_picks, &mut current, &mut results);
        log::debug!("found {} exact covers", results.len());
        results
    }

    fn exact_rec(
        &mut self,
        picks_left: usize,
        current: &mut RankedSet<String>,
        results: &mut BTreeSet<RankedSet<String>>,
    ) {
        let Some(item) = self.choose_item() else {
            results.insert(current.clone());
            return;
        };
        if picks_left == 0 {
            return;
        }

        let header = item;
        let mut option_cell = self.cells[header].down;
        while option_cell != header {
            let row = self.cells[option_cell].row;
            let weight = self.row_weight_sum(option_cell);
            let next = self.cells[option_cell].down;

            let covered = self.hide_options(option_cell, false);
            current.insert(weight, self.names[row - 1].clone());

            self.exact_rec(picks_left - 1, current, results);

            current.remove(weight, &self.names[row - 1]);
            self.unhide_options(&covered, false);
            option_cell = next;
        }
    }

    /// Finds every way to have each item handled by at least one pick,
    /// using at most `max_picks` picks, stopping once `max_output_size`
    /// distinct covers have been collected.
    #[must_use]
    pub fn get_overlapping_type_coverage(&mut self) -> BTreeSet<RankedSet<String>> {
        log::debug!(
            "searching for overlapping {:?} coverage, max picks {}, output cap {}",
            self.kind,
            self.max_picks,
            self.max_output_size
        );
        self.output_limit_hit = false;
        let mut results = BTreeSet::new();
        let mut current = RankedSet::new();
        self.overlap_rec(self.max_picks, &mut current, &mut results);
        if self.output_limit_hit {
            log::warn!(
                "overlapping coverage search hit the output cap of {}; result is partial",
                self.max_output_size
            );
        }
        results
    }

    fn overlap_rec(
        &mut self,
        picks_left: usize,
        current: &mut RankedSet<String>,
        results: &mut BTreeSet<RankedSet<String>>,
    ) {
        if results.len() >= self.max_output_size {
            self.output_limit_hit = true;
            return;
        }

        let Some(item) = self.choose_item() else {
            results.insert(current.clone());
            return;
        };
        if picks_left == 0 {
            return;
        }

        let header = item;
        let mut option_cell = self.cells[header].down;
        while option_cell != header {
            if results.len() >= self.max_output_size {
                self.output_limit_hit = true;
                return;
            }

            let row = self.cells[option_cell].row;
            let weight = self.row_weight_sum(option_cell);
            let next = self.cells[option_cell].down;

            let covered = self.hide_options(option_cell, true);
            current.insert(weight, self.names[row - 1].clone());

            self.overlap_rec(picks_left - 1, current, results);

            current.remove(weight, &self.names[row - 1]);
            self.unhide_options(&covered, true);
            option_cell = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn chart(entries: &[(&str, &[(&str, Multiplier)])]) -> BTreeMap<String, BTreeMap<String, Multiplier>> {
        entries
            .iter()
            .map(|(defender, attacks)| {
                (
                    defender.to_string(),
                    attacks
                        .iter()
                        .map(|(attacker, m)| (attacker.to_string(), *m))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn defense_exact_cover_picks_a_resisting_type() {
        use Multiplier::*;
        let chart = chart(&[
            ("Ghost", &[("Normal", Immune), ("Fighting", Immune)]),
            ("Steel", &[("Normal", Fraction12), ("Fighting", Normal)]),
        ]);

        let mut solver = PokemonLinks::new(&chart, MAX_TEAM_SIZE, MAX_OUTPUT_SIZE);
        let covers = solver.get_exact_type_coverage();
        assert!(!covers.is_empty());
        for cover in &covers {
            assert!(cover.iter().any(|name| name == "Ghost"));
        }
    }

    #[test]
    fn attack_overlap_cover_finds_super_effective_types() {
        use Multiplier::*;
        let chart = chart(&[
            ("Water", &[("Electric", Double)]),
            ("Grass", &[("Fire", Double)]),
        ]);
        let attack_types = BTreeSet::from(["Electric".to_string(), "Fire".to_string()]);

        let mut solver =
            PokemonLinks::new_with_attack_types(&chart, &attack_types, MAX_ATTACK_SLOTS, MAX_OUTPUT_SIZE);
        assert_eq!(solver.kind(), CoverageKind::Attack);
        let covers = solver.get_overlapping_type_coverage();
        assert!(covers.iter().any(|c| c.len() == 2));
        assert!(!solver.reached_output_limit());
    }

    #[test]
    fn defense_exact_cover_ranks_two_solutions_correctly() {
        use Multiplier::*;
        // Same typing combo as the original source's "two exact covers"
        // fixture: attacking types {Electric, Grass, Ice, Normal, Water}
        // defended against by {Electric, Ghost, Ground, Ice, Poison, Water}.
        let chart = chart(&[
            (
                "Electric",
                &[
                    ("Electric", Fraction12),
                    ("Grass", Normal),
                    ("Ice", Normal),
                    ("Normal", Normal),
                    ("Water", Normal),
                ],
            ),
            (
                "Ghost",
                &[
                    ("Electric", Normal),
                    ("Grass", Normal),
                    ("Ice", Normal),
                    ("Normal", Immune),
                    ("Water", Normal),
                ],
            ),
            (
                "Ground",
                &[
                    ("Electric", Immune),
                    ("Grass", Normal),
                    ("Ice", Normal),
                    ("Normal", Normal),
                    ("Water", Normal),
                ],
            ),
            (
                "Ice",
                &[
                    ("Electric", Normal),
                    ("Grass", Normal),
                    ("Ice", Fraction12),
                    ("Normal", Normal),
                    ("Water", Normal),
                ],
            ),
            (
                "Poison",
                &[
                    ("Electric", Normal),
                    ("Grass", Fraction12),
                    ("Ice", Normal),
                    ("Normal", Normal),
                    ("Water", Normal),
                ],
            ),
            (
                "Water",
                &[
                    ("Electric", Normal),
                    ("Grass", Double),
                    ("Ice", Fraction12),
                    ("Normal", Normal),
                    ("Water", Fraction12),
                ],
            ),
        ]);

        let mut solver = PokemonLinks::new(&chart, MAX_TEAM_SIZE, MAX_OUTPUT_SIZE);
        let covers = solver.get_exact_type_coverage();

        let mut expected = BTreeSet::new();
        // Each pick's contribution is the sum of every resistance cell in
        // that defender's row, not just the cell for the item being covered.
        let mut cover_11 = RankedSet::new();
        cover_11.insert(Multiplier::Immune.weight(), "Ground".to_string()); // Electric
        cover_11.insert(Multiplier::Immune.weight(), "Ghost".to_string()); // Normal
        cover_11.insert(Multiplier::Fraction12.weight(), "Poison".to_string()); // Grass
        cover_11.insert(
            Multiplier::Fraction12.weight() + Multiplier::Fraction12.weight(),
            "Water".to_string(),
        ); // Ice + Water
        let mut cover_13 = RankedSet::new();
        cover_13.insert(Multiplier::Fraction12.weight(), "Electric".to_string()); // Electric
        cover_13.insert(Multiplier::Immune.weight(), "Ghost".to_string()); // Normal
        cover_13.insert(Multiplier::Fraction12.weight(), "Poison".to_string()); // Grass
        cover_13.insert(
            Multiplier::Fraction12.weight() + Multiplier::Fraction12.weight(),
            "Water".to_string(),
        ); // Ice + Water
        expected.insert(cover_11);
        expected.insert(cover_13);

        assert_eq!(covers, expected);
        for cover in &covers {
            assert!(cover.rank() == 11 || cover.rank() == 13);
        }
    }

    #[test]
    fn attack_overlap_cover_ranks_two_solutions_at_thirty() {
        use Multiplier::*;
        // Same chart as the original source's attack-coverage fixture: four
        // attacking types are needed to be super effective against all six
        // defending types, and two distinct four-type sets tie at rank 30.
        let chart = chart(&[
            ("Electric", &[("Ground", Double)]),
            ("Fire", &[("Ground", Double)]),
            ("Grass", &[("Ice", Double), ("Poison", Double)]),
            ("Ice", &[("Fighting", Double)]),
            ("Normal", &[("Fighting", Double)]),
            ("Water", &[("Grass", Double)]),
        ]);
        let attack_types = BTreeSet::from([
            "Fighting".to_string(),
            "Grass".to_string(),
            "Ground".to_string(),
            "Ice".to_string(),
            "Poison".to_string(),
        ]);

        let mut solver = PokemonLinks::new_with_attack_types(
            &chart,
            &attack_types,
            MAX_ATTACK_SLOTS,
            MAX_OUTPUT_SIZE,
        );
        let covers = solver.get_overlapping_type_coverage();
        assert!(!solver.reached_output_limit());

        // Each pick's weight is the sum of every defending type it is super
        // effective against: Fighting and Ground each hit two defenders,
        // Grass/Ice/Poison only one.
        let mut cover_a = RankedSet::new();
        cover_a.insert(Multiplier::Double.weight() * 2, "Fighting".to_string());
        cover_a.insert(Multiplier::Double.weight(), "Grass".to_string());
        cover_a.insert(Multiplier::Double.weight() * 2, "Ground".to_string());
        cover_a.insert(Multiplier::Double.weight(), "Ice".to_string());
        let mut cover_b = RankedSet::new();
        cover_b.insert(Multiplier::Double.weight() * 2, "Fighting".to_string());
        cover_b.insert(Multiplier::Double.weight(), "Grass".to_string());
        cover_b.insert(Multiplier::Double.weight() * 2, "Ground".to_string());
        cover_b.insert(Multiplier::Double.weight(), "Poison".to_string());
        let mut expected = BTreeSet::new();
        expected.insert(cover_a);
        expected.insert(cover_b);

        assert_eq!(covers, expected);
        for cover in &covers {
            assert_eq!(cover.rank(), 30);
        }
    }

    #[test]
    fn loose_cover_uncover_round_trip_restores_state() {
        use Multiplier::*;
        let chart = chart(&[("Ghost", &[("Normal", Immune)])]);
        let mut solver = PokemonLinks::new(&chart, MAX_TEAM_SIZE, MAX_OUTPUT_SIZE);
        let before = solver.clone();

        let anchor = solver.cells[1].down;
        let covered = solver.hide_options(anchor, true);
        solver.unhide_options(&covered, true);

        for (a, b) in solver.items.iter().zip(before.items.iter()) {
            assert_eq!(a.left, b.left);
            assert_eq!(a.right, b.right);
        }
    }
}
