use thiserror::Error;

/// Errors that can occur while constructing a solver.
///
/// Recoverable search conditions (a dead branch during backtracking, the
/// Pokemon overlap search hitting its output cap) are not represented here:
/// per the design of this crate they stay internal to the search and are
/// surfaced through ordinary return values (`false`, a partial result) or
/// through [`crate::pokemon::PokemonLinks::reached_output_limit`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DlxError {
    /// A matching problem was given an edge with a negative weight.
    ///
    /// `max_weight_matching`'s "leave this person unmatched" branch only
    /// dominates a real edge if weights are compared against zero, and the
    /// algorithm never needs to reason about negative contributions, so
    /// these are rejected at construction rather than silently accepted.
    #[error("negative edge weight {weight} between \"{a}\" and \"{b}\"")]
    NegativeWeight {
        /// One endpoint of the offending edge.
        a: String,
        /// The other endpoint of the offending edge.
        b: String,
        /// The negative weight that was supplied.
        weight: i64,
    },

    /// An edge in a matching input map was not declared symmetrically, i.e.
    /// `a` lists `b` as a neighbor with one weight but `b` either doesn't
    /// list `a` at all, or lists it with a different weight.
    #[error("asymmetric or conflicting edge weight between \"{a}\" and \"{b}\"")]
    InconsistentWeight {
        /// One endpoint of the offending edge.
        a: String,
        /// The other endpoint of the offending edge.
        b: String,
    },
}
