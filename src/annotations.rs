//! Known gene-function annotations
//!
//! Every gene has a unique numerical [`GeneId`] and is annotated to a set of
//! GO terms. Genes without any annotation are *unknown*, predictions for
//! them can not be validated.

use core::fmt::Debug;
use std::collections::HashMap;
use std::fmt::Display;

use tracing::debug;

use crate::term::{GoGroup, GoTermId};
use crate::{GoDag, GoError, GoResult};

static NO_ANNOTATIONS: GoGroup = GoGroup::new();

/// A unique identifier for a gene
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: u32,
}

impl GeneId {
    /// Returns the id as `u32`
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for GeneId {
    type Error = GoError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(GeneId {
            inner: value.trim().parse::<u32>()?,
        })
    }
}

impl From<u32> for GeneId {
    fn from(inner: u32) -> Self {
        GeneId { inner }
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// One gene record as provided by an [`AnnotationSource`]
#[derive(Debug, Clone)]
pub struct GeneRecord {
    pub gene: GeneId,
    pub name: String,
    pub terms: Vec<GoTermId>,
}

/// Provides the known annotations of genes
pub trait AnnotationSource {
    /// Returns all gene records
    ///
    /// # Errors
    ///
    /// Implementations return an error if the source cannot be read
    fn genes(&self) -> GoResult<Vec<GeneRecord>>;
}

/// The known GO terms of every gene
///
/// # Examples
///
/// ```
/// use gopredict::KnownAnnotations;
///
/// let mut known = KnownAnnotations::default();
/// known.insert(1u32.into(), 12u32.into());
///
/// assert!(known.is_known(&1u32.into()));
/// assert!(known.known(&1u32.into()).contains(&12u32.into()));
/// assert!(known.known(&2u32.into()).is_empty());
/// ```
#[derive(Default, Debug, Clone)]
pub struct KnownAnnotations {
    genes: HashMap<GeneId, GoGroup>,
    names: HashMap<GeneId, String>,
}

impl KnownAnnotations {
    /// Loads the annotations from `source`, keeping only terms of `dag`
    ///
    /// Genes without any term of the branch remain unknown.
    ///
    /// # Errors
    ///
    /// Any error of the source
    pub fn from_source<S: AnnotationSource>(source: &S, dag: &GoDag) -> GoResult<Self> {
        let mut known = KnownAnnotations::default();
        let mut skipped = 0usize;
        for record in source.genes()? {
            known.add_gene_name(record.gene, &record.name);
            for term in record.terms {
                if dag.term(term).is_some() {
                    known.insert(record.gene, term);
                } else {
                    skipped += 1;
                }
            }
        }
        debug!(
            "Loaded {} known genes, skipped {} annotations outside of {}",
            known.len(),
            skipped,
            dag.branch()
        );
        Ok(known)
    }

    /// Annotates `gene` to `term`
    ///
    /// Returns `true` if the annotation is new
    pub fn insert(&mut self, gene: GeneId, term: GoTermId) -> bool {
        self.genes.entry(gene).or_default().insert(term)
    }

    /// Sets the name (symbol) of a gene
    pub fn add_gene_name(&mut self, gene: GeneId, name: &str) {
        self.names.insert(gene, name.to_string());
    }

    /// Returns the name of a gene, if known
    pub fn gene_name(&self, gene: &GeneId) -> Option<&str> {
        self.names.get(gene).map(String::as_str)
    }

    /// Returns the known terms of a gene, empty for unknown genes
    pub fn known(&self, gene: &GeneId) -> &GoGroup {
        self.genes.get(gene).unwrap_or(&NO_ANNOTATIONS)
    }

    /// Returns `true` if the gene has at least one known term
    pub fn is_known(&self, gene: &GeneId) -> bool {
        !self.known(gene).is_empty()
    }

    /// Returns the number of known genes
    pub fn len(&self) -> usize {
        self.genes.values().filter(|terms| !terms.is_empty()).count()
    }

    /// Returns `true` if no gene is known
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator of all known genes and their terms
    pub fn iter(&self) -> impl Iterator<Item = (&GeneId, &GoGroup)> {
        self.genes.iter().filter(|(_, terms)| !terms.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures;

    struct Records(Vec<GeneRecord>);

    impl AnnotationSource for Records {
        fn genes(&self) -> GoResult<Vec<GeneRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn gene_id() {
        assert_eq!(GeneId::try_from("17").unwrap(), GeneId::from(17u32));
        assert!(GeneId::try_from("BRCA1").is_err());
        assert_eq!(GeneId::from(5u32).to_string(), "5");
    }

    #[test]
    fn unknown_genes() {
        let known = fixtures::annotations();
        assert!(known.is_known(&1u32.into()));
        assert!(!known.is_known(&2u32.into()));
        assert!(known.known(&3u32.into()).is_empty());
        assert_eq!(known.gene_name(&2u32.into()), Some("g2"));
        assert_eq!(known.len(), 1);
    }

    #[test]
    fn from_source_keeps_branch_terms() {
        let dag = fixtures::diamond();
        let source = Records(vec![
            GeneRecord {
                gene: 1u32.into(),
                name: "g1".into(),
                terms: vec![fixtures::A.into(), 99u32.into()],
            },
            GeneRecord {
                gene: 2u32.into(),
                name: "g2".into(),
                terms: vec![99u32.into()],
            },
        ]);
        let known = KnownAnnotations::from_source(&source, &dag).unwrap();
        assert_eq!(known.known(&1u32.into()).len(), 1);
        assert!(!known.is_known(&2u32.into()));
        assert_eq!(known.gene_name(&2u32.into()), Some("g2"));
    }
}
