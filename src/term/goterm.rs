use std::collections::BTreeSet;
use std::fmt::Display;

use crate::term::internal::GoTermInternal;
use crate::term::{GoGroup, GoTermId, IndexPath};
use crate::{GoDag, GoError, GoResult};

/// The `GoTerm` represents a single term of the loaded GO branch
///
/// It is a cheap view into the [`GoDag`] and holds all required
/// information and relationship data.
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    id: &'a GoTermId,
    accession: &'a str,
    name: &'a str,
    parents: &'a GoGroup,
    children: &'a GoGroup,
    index_paths: &'a BTreeSet<IndexPath>,
    depth: Option<usize>,
    dag: &'a GoDag,
}

impl<'a> GoTerm<'a> {
    /// Constructs a new [`GoTerm`]
    ///
    /// # Errors
    ///
    /// If the given [`GoTermId`] does not match an existing term
    /// it returns an Error
    ///
    /// # Examples
    ///
    /// ```
    /// use gopredict::{Branch, GoDag, GoTerm};
    ///
    /// let mut builder = GoDag::builder(Branch::MolecularFunction);
    /// builder.add_term(1u32, "GO:0003674", "molecular_function");
    /// let dag = builder.terms_complete().index().unwrap().build();
    ///
    /// let term = GoTerm::try_new(&dag, 1u32).unwrap();
    /// assert_eq!(term.accession(), "GO:0003674");
    /// assert!(GoTerm::try_new(&dag, 2u32).is_err());
    /// ```
    pub fn try_new<I: Into<GoTermId>>(dag: &'a GoDag, id: I) -> GoResult<GoTerm<'a>> {
        let id = id.into();
        let term = dag.get(id).ok_or(GoError::DoesNotExist(id))?;
        Ok(GoTerm::new(dag, term))
    }

    pub(crate) fn new(dag: &'a GoDag, term: &'a GoTermInternal) -> GoTerm<'a> {
        GoTerm {
            id: term.id(),
            accession: term.accession(),
            name: term.name(),
            parents: term.parents(),
            children: term.children(),
            index_paths: term.index_paths(),
            depth: term.depth(),
            dag,
        }
    }

    /// Returns the [`GoTermId`] of the term
    pub fn id(&self) -> &GoTermId {
        self.id
    }

    /// Returns the accession of the term
    ///
    /// e.g.: `GO:0006512`
    pub fn accession(&self) -> &str {
        self.accession
    }

    /// Returns the name of the term
    ///
    /// e.g.: `ubiquitin cycle`
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the depth of the term, the root has depth `0`
    ///
    /// The depth is the shortest distance to the root. Terms that are
    /// not reachable from the root of the branch have no depth.
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Returns the [`GoTermId`]s of the direct parents
    pub fn parent_ids(&self) -> &GoGroup {
        self.parents
    }

    /// Returns the [`GoTermId`]s of the direct children
    pub fn children_ids(&self) -> &GoGroup {
        self.children
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let dag = self.dag;
        self.parents
            .iter()
            .filter_map(move |id| GoTerm::try_new(dag, id).ok())
    }

    /// Returns an iterator of the direct children of the term
    pub fn children(&self) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        let dag = self.dag;
        self.children
            .iter()
            .filter_map(move |id| GoTerm::try_new(dag, id).ok())
    }

    /// Returns all paths from the branch root to the term
    pub fn index_paths(&self) -> &BTreeSet<IndexPath> {
        self.index_paths
    }

    /// Returns `true` if `self` is a descendant of `other`
    ///
    /// A term is not its own child
    pub fn child_of(&self, other: &GoTerm) -> bool {
        self.id != other.id && self.index_paths.iter().any(|p| p.contains(other.id()))
    }

    /// Returns `true` if `self` is an ancestor of `other`
    pub fn parent_of(&self, other: &GoTerm) -> bool {
        other.child_of(self)
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &GoTerm) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTerm<'_> {}

impl Display for GoTerm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {}", self.accession, self.name)
    }
}
