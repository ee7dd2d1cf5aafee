//! [`GoTerm`]s are the single terms of one branch of the Gene Ontology
//!
//! Each term is identified by a numeric [`GoTermId`] and knows its
//! accession (`GO:0006512`), its name, its direct parents and children
//! and every path that leads from the branch root down to it.

mod goterm;
mod gotermid;
mod group;
mod index_path;
pub(crate) mod internal;

pub use goterm::GoTerm;
pub use gotermid::GoTermId;
pub use group::{GoGroup, GoTermIds};
pub use index_path::IndexPath;
