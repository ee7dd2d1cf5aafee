//! Small DAGs shared by the unit tests

use crate::annotations::KnownAnnotations;
use crate::{Branch, GoDag};

pub const ROOT: u32 = 1;
pub const A: u32 = 2;
pub const B: u32 = 3;
pub const C: u32 = 4;
pub const D: u32 = 5;

/// `root -> A -> C`, `root -> B -> C`, `root -> A -> D`
pub fn diamond() -> GoDag {
    let mut builder = GoDag::builder(Branch::BiologicalProcess);
    builder.add_term(ROOT, "GO:0008150", "biological_process");
    builder.add_term(A, "GO:0000002", "A");
    builder.add_term(B, "GO:0000003", "B");
    builder.add_term(C, "GO:0000004", "C");
    builder.add_term(D, "GO:0000005", "D");
    let mut builder = builder.terms_complete();
    for (parent, child) in [(ROOT, A), (ROOT, B), (A, C), (B, C), (A, D)] {
        builder.add_parent(parent, child).unwrap();
    }
    builder.index().unwrap().build()
}

/// A linear chain `root -> 2 -> 3 -> ... -> n`
pub fn chain(n: u32) -> GoDag {
    let mut builder = GoDag::builder(Branch::MolecularFunction);
    builder.add_term(1u32, "GO:0003674", "molecular_function");
    for id in 2..=n {
        builder.add_term(id, &format!("GO:{id:07}"), &format!("level {}", id - 1));
    }
    let mut builder = builder.terms_complete();
    for id in 2..=n {
        builder.add_parent(id - 1, id).unwrap();
    }
    builder.index().unwrap().build()
}

/// `g1` is annotated to `A` only, `g2` is unknown
pub fn annotations() -> KnownAnnotations {
    let mut known = KnownAnnotations::default();
    known.insert(1u32.into(), A.into());
    known.add_gene_name(1u32.into(), "g1");
    known.add_gene_name(2u32.into(), "g2");
    known
}
