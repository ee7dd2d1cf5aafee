use core::fmt::Debug;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use tracing::{debug, info};

use crate::term::internal::GoTermInternal;
use crate::term::{GoTerm, GoTermId, IndexPath};
use crate::{GoError, GoResult};

mod builder;
mod termarena;

pub use builder::{AllTerms, Builder, Indexed, LooseCollection};
use termarena::Arena;

/// The three independent branches of the Gene Ontology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    MolecularFunction,
    BiologicalProcess,
    CellularComponent,
}

impl Branch {
    /// Returns the name of the branch, which is also the name of its root term
    pub fn name(&self) -> &'static str {
        match self {
            Branch::MolecularFunction => "molecular_function",
            Branch::BiologicalProcess => "biological_process",
            Branch::CellularComponent => "cellular_component",
        }
    }
}

impl TryFrom<&str> for Branch {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        match value.trim() {
            "molecular_function" => Ok(Branch::MolecularFunction),
            "biological_process" => Ok(Branch::BiologicalProcess),
            "cellular_component" => Ok(Branch::CellularComponent),
            other => Err(GoError::InvalidInput(format!("unknown GO branch `{other}`"))),
        }
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One term record as provided by an [`OntologySource`]
#[derive(Debug, Clone)]
pub struct TermRecord {
    pub id: GoTermId,
    pub accession: String,
    pub name: String,
    /// Name of the branch the term belongs to, e.g. `biological_process`
    pub term_type: String,
    pub obsolete: bool,
}

/// Provides the terms and `parent -> child` edges of the Gene Ontology
///
/// Sources may contain several branches and obsolete terms, the
/// [`GoDag`] keeps only the non-obsolete terms of one branch.
pub trait OntologySource {
    /// Returns all term records
    ///
    /// # Errors
    ///
    /// Implementations return an error if the source cannot be read
    fn terms(&self) -> GoResult<Vec<TermRecord>>;

    /// Returns all `(parent, child)` edges
    ///
    /// # Errors
    ///
    /// Implementations return an error if the source cannot be read
    fn edges(&self) -> GoResult<Vec<(GoTermId, GoTermId)>>;
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `GoDag` holds one branch of the Gene Ontology
///
/// The DAG is read-only once it is built. Every term that is reachable from
/// the root carries all its index paths, i.e. every walk from the root
/// down to the term, and its depth.
///
/// # Construction
///
/// ```mermaid
/// graph LR
///     A[Builder LooseCollection] -->|terms_complete| B[Builder AllTerms]
///     B -->|index| C[Builder Indexed]
///     C -->|build| D[GoDag]
/// ```
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     GODAG ||--|{ GOTERM : contains
///     GOTERM ||--|{ GOTERM : is_a
///     GOTERM ||--|{ INDEXPATH : reachable_by
///     GOTERM {
///         GoTermId id
///         str accession
///         str name
///         usize depth
///     }
///     INDEXPATH {
///         GoTermIds path
///     }
/// ```
///
/// # Examples
///
/// ```
/// use gopredict::{Branch, GoDag};
///
/// let mut builder = GoDag::builder(Branch::BiologicalProcess);
/// builder.add_term(1u32, "GO:0008150", "biological_process");
/// builder.add_term(2u32, "GO:0000002", "A");
/// builder.add_term(3u32, "GO:0000003", "X");
/// let mut builder = builder.terms_complete();
/// builder.add_parent(1u32, 2u32).unwrap();
/// builder.add_parent(1u32, 3u32).unwrap();
/// builder.add_parent(3u32, 2u32).unwrap();
/// let dag = builder.index().unwrap().build();
///
/// // the shortest walk from the root defines the depth
/// assert_eq!(dag.depth(2u32.into()), Some(1));
/// assert_eq!(dag.index_paths(2u32.into()).unwrap().len(), 2);
/// ```
pub struct GoDag {
    terms: Arena,
    branch: Branch,
    root: GoTermId,
    accessions: HashMap<String, GoTermId>,
}

impl Debug for GoDag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoDag {} with {} terms", self.branch, self.terms.len())
    }
}

impl GoDag {
    pub(crate) fn new(terms: Arena, branch: Branch, root: GoTermId) -> Self {
        let accessions = terms
            .values()
            .map(|term| (term.accession().to_string(), *term.id()))
            .collect();
        Self {
            terms,
            branch,
            root,
            accessions,
        }
    }

    /// Returns a new [`Builder`] for the given branch
    pub fn builder(branch: Branch) -> Builder<LooseCollection> {
        Builder::new(branch)
    }

    /// Builds the DAG of one branch from an [`OntologySource`]
    ///
    /// Obsolete terms, terms of other branches and edges touching them
    /// are skipped.
    ///
    /// # Errors
    ///
    /// - [`GoError::MissingAccession`] if a term of the branch has no accession
    /// - [`GoError::RootNotFound`] if the branch has no root term
    /// - [`GoError::CyclicOntology`] if the edges contain a cycle
    /// - any error of the source
    pub fn from_source<S: OntologySource>(source: &S, branch: Branch) -> GoResult<Self> {
        let mut builder = Builder::new(branch);
        let mut skipped = 0usize;
        for record in source.terms()? {
            if record.obsolete || record.term_type != branch.name() {
                skipped += 1;
                continue;
            }
            if record.accession.trim().is_empty() {
                return Err(GoError::MissingAccession(record.id));
            }
            builder.add_term(record.id, record.accession.trim(), &record.name);
        }
        debug!("Skipped {} terms outside of {}", skipped, branch);

        let mut builder = builder.terms_complete();
        let mut edges = 0usize;
        for (parent, child) in source.edges()? {
            if builder.add_parent(parent, child).is_ok() {
                edges += 1;
            }
        }
        debug!("Added {} edges to {}", edges, branch);

        let dag = builder.index()?.build();
        info!("Loaded {:?}", dag);
        Ok(dag)
    }

    /// Returns the branch of the DAG
    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Returns the [`GoTermId`] of the root term
    pub fn root(&self) -> GoTermId {
        self.root
    }

    /// Returns the number of terms in the DAG, unreachable ones included
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the DAG does not contain any term
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get(&self, id: GoTermId) -> Option<&GoTermInternal> {
        self.terms.get(id)
    }

    /// Returns the [`GoTerm`] of the provided [`GoTermId`]
    ///
    /// If no such term is present, `None` is returned
    pub fn term<I: Into<GoTermId>>(&self, id: I) -> Option<GoTerm> {
        GoTerm::try_new(self, id).ok()
    }

    /// Returns the [`GoTermId`] of an accession like `GO:0006512`
    pub fn id_by_accession(&self, accession: &str) -> Option<GoTermId> {
        self.accessions.get(accession.trim()).copied()
    }

    /// Returns the depth of a term, `None` if it is not reachable from the root
    pub fn depth(&self, id: GoTermId) -> Option<usize> {
        self.terms.get(id).and_then(GoTermInternal::depth)
    }

    /// Returns all index paths of a term
    ///
    /// # Errors
    ///
    /// [`GoError::DistanceUnavailable`] if the term is unknown or not
    /// reachable from the root of the branch
    pub fn index_paths(&self, id: GoTermId) -> GoResult<&BTreeSet<IndexPath>> {
        match self.terms.get(id) {
            Some(term) if !term.index_paths().is_empty() => Ok(term.index_paths()),
            _ => Err(GoError::DistanceUnavailable(id)),
        }
    }

    /// Returns an Iterator of all [`GoTerm`]s of the DAG
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }
}

/// Iterates the DAG and yields [`GoTerm`]s
pub struct Iter<'a> {
    inner: std::collections::hash_map::Values<'a, GoTermId, GoTermInternal>,
    dag: &'a GoDag,
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|term| GoTerm::new(self.dag, term))
    }
}

impl<'a> IntoIterator for &'a GoDag {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.values(),
            dag: self,
        }
    }
}
