//! Gene Ontology distances and validation of gene-function predictions
//!
//! `gopredict` loads one branch of the Gene Ontology as a DAG, indexes every
//! term by all of its root-to-term paths and uses those paths to calculate
//! distances and lowest common ancestors between terms. On top of that it
//! judges cluster-derived function predictions against known gene annotations,
//! collects them in a (recurrence, connectivity) grid, searches p-value cutoffs
//! and merges redundant parent-child predictions.
//!
//! # Examples
//!
//! ```
//! use gopredict::{Branch, GoDag};
//! use gopredict::distance::{DistanceIndex, IndexPathDistance};
//!
//! let mut builder = GoDag::builder(Branch::BiologicalProcess);
//! builder.add_term(1u32, "GO:0008150", "biological_process");
//! builder.add_term(2u32, "GO:0000002", "A");
//! builder.add_term(3u32, "GO:0000003", "B");
//! let mut builder = builder.terms_complete();
//! builder.add_parent(1u32, 2u32).unwrap();
//! builder.add_parent(1u32, 3u32).unwrap();
//! let dag = builder.index().unwrap().build();
//!
//! let distances = IndexPathDistance::new(&dag);
//! let entry = distances.distance(2u32.into(), 3u32.into()).unwrap();
//! assert_eq!(entry.raw_distance(), 2);
//! assert!(entry.common_ancestor_set().contains(&1u32.into()));
//! ```
use core::fmt::Debug;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

pub mod annotations;
pub mod distance;
pub mod matcher;
pub mod ontology;
pub mod parser;
pub mod prediction;
pub mod redundancy;
pub mod report;
pub mod stats;
pub mod term;
pub mod utils;
mod pipeline;
mod settings;

#[cfg(test)]
pub(crate) mod fixtures;

pub use annotations::{GeneId, KnownAnnotations};
pub use ontology::{Branch, GoDag};
pub use pipeline::Validation;
pub use prediction::{ClusterId, Prediction};
pub use settings::Settings;
pub use term::{GoGroup, GoTerm, GoTermId};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_CHILDREN: usize = 8;
const DEFAULT_PATH_LEN: usize = 12;

/// The constant that the `lee` distance is subtracted from
///
/// The `lee` distance of two terms is `LEE_DISTANCE_BASE` minus the
/// level of their lowest common ancestor
pub const LEE_DISTANCE_BASE: i32 = 15;

/// Error type of `gopredict`
#[derive(Error, Debug)]
pub enum GoError {
    /// The root term of the branch is not part of the ontology source
    #[error("root term `{0}` not found in ontology source")]
    RootNotFound(String),
    /// A term of the ontology source has no accession
    #[error("term {0} has no accession")]
    MissingAccession(GoTermId),
    /// A term is referenced that was never added to the ontology
    #[error("term {0} does not exist")]
    DoesNotExist(GoTermId),
    /// A term has no index path in the loaded branch
    #[error("no index path for term {0}, it is not part of the loaded branch")]
    DistanceUnavailable(GoTermId),
    /// The ontology contains a cycle through the given term
    #[error("ontology is not acyclic, term {0} is its own ancestor")]
    CyclicOntology(GoTermId),
    /// Failed to open a source file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// A record of a source file is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unable to parse Integer")]
    ParseIntError,
    #[error("unable to parse Float")]
    ParseFloatError,
}

impl From<ParseIntError> for GoError {
    fn from(_: ParseIntError) -> Self {
        GoError::ParseIntError
    }
}

impl From<ParseFloatError> for GoError {
    fn from(_: ParseFloatError) -> Self {
        GoError::ParseFloatError
    }
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;
