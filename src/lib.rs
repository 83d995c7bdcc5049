//! Dancing-links exact-cover and set-cover solvers for three concrete
//! problems: disaster-preparedness supply placement, perfect and
//! max-weight matching, and Pokemon type coverage.
//!
//! Each solver module keeps its own toroidal cell array rather than sharing
//! one generic matrix type, mirroring how differently their underlying
//! problems use the links: [`disaster`] needs overlapping set cover and so
//! gives every cell an explicit row ring, [`matching`] is a plain exact
//! cover over fixed-arity pairs and needs no row ring at all, and
//! [`pokemon`] needs both exact and overlapping cover depending on which
//! search is run.
//!
//! Building the search matrices, generating candidate teams or movesets
//! from external data, and any UI are out of scope here; this crate takes
//! an already-parsed type chart or road network and returns solver results.

#![deny(missing_docs)]

/// Grounding ledger and design notes live in `DESIGN.md` at the repository
/// root, not in this module tree.
pub mod builders;
/// Disaster-preparedness supply placement (bounded dominating set).
pub mod disaster;
/// Crate-wide error type.
pub mod error;
/// Perfect and maximum-weight matching.
pub mod matching;
/// Pokemon defensive and offensive type coverage.
pub mod pokemon;
mod ranked_set;

pub use crate::error::DlxError;
pub use crate::ranked_set::RankedSet;
