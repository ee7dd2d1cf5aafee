use std::collections::{HashSet, VecDeque};
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::ontology::termarena::Arena;
use crate::ontology::{Branch, GoDag};
use crate::term::internal::GoTermInternal;
use crate::term::{GoTermId, IndexPath};
use crate::{GoError, GoResult};

/// All terms can be added, but they are not connected yet
pub struct LooseCollection;
/// All terms are present, parent-child edges can be added
pub struct AllTerms;
/// Every reachable term carries its index paths and depth
pub struct Indexed;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        branch: builder.branch,
        root: builder.root,
        state: PhantomData,
    }
}

/// Builds a [`GoDag`] in three stages
///
/// 1. Add all terms of the branch ([`Builder::add_term`])
/// 2. Connect the terms ([`Builder::add_parent`])
/// 3. Create the index paths from the root ([`Builder::index`])
pub struct Builder<T> {
    terms: Arena,
    branch: Branch,
    root: Option<GoTermId>,
    state: PhantomData<T>,
}

impl Builder<LooseCollection> {
    pub fn new(branch: Branch) -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            branch,
            root: None,
            state: PhantomData,
        }
    }

    /// Adds a term to the DAG
    ///
    /// The term is not linked to any other term. Adding the same id twice
    /// replaces the first term.
    pub fn add_term<I: Into<GoTermId>>(&mut self, id: I, accession: &str, name: &str) -> GoTermId {
        let id = id.into();
        self.terms.insert(GoTermInternal::new(
            id,
            accession.to_string(),
            name.to_string(),
        ));
        id
    }

    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Adds a `parent -> child` edge
    ///
    /// # Errors
    ///
    /// [`GoError::DoesNotExist`] if one of the terms was not added before
    ///
    /// # Examples
    ///
    /// ```
    /// use gopredict::{Branch, GoDag};
    ///
    /// let mut builder = GoDag::builder(Branch::CellularComponent);
    /// builder.add_term(1u32, "GO:0005575", "cellular_component");
    /// builder.add_term(2u32, "GO:0000002", "Foo");
    /// let mut builder = builder.terms_complete();
    ///
    /// builder.add_parent(1u32, 2u32).unwrap();
    /// assert!(builder.add_parent(1u32, 3u32).is_err());
    /// ```
    pub fn add_parent<I: Into<GoTermId>, J: Into<GoTermId>>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) -> GoResult<()> {
        let parent_id = parent_id.into();
        let child_id = child_id.into();
        if !self.terms.contains(child_id) {
            return Err(GoError::DoesNotExist(child_id));
        }
        self.terms
            .get_mut(parent_id)
            .ok_or(GoError::DoesNotExist(parent_id))?
            .add_child(child_id);
        if let Some(child) = self.terms.get_mut(child_id) {
            child.add_parent(parent_id);
        }
        Ok(())
    }

    /// Creates the index paths, starting from the root of the branch
    ///
    /// The root is the term whose name equals the name of the branch,
    /// e.g. `biological_process`.
    ///
    /// # Errors
    ///
    /// - [`GoError::RootNotFound`] if no term has the name of the branch
    /// - [`GoError::InvalidInput`] if several terms have the name of the branch
    /// - [`GoError::CyclicOntology`] if the edges contain a cycle
    pub fn index(self) -> GoResult<Builder<Indexed>> {
        let name = self.branch.name();
        let mut roots = self
            .terms
            .values()
            .filter(|term| term.name() == name)
            .map(|term| *term.id());
        let root = roots
            .next()
            .ok_or_else(|| GoError::RootNotFound(name.to_string()))?;
        if let Some(other) = roots.next() {
            return Err(GoError::InvalidInput(format!(
                "several root terms named `{name}`: {root} and {other}"
            )));
        }
        self.index_from_root(root)
    }

    /// Creates the index paths, starting from an explicit root term
    ///
    /// Terms are processed in FIFO order. Every path of a processed term
    /// is extended by each of its children. A child is queued again
    /// whenever it received a new path and is not already waiting, so
    /// paths that arrive late are propagated as well.
    ///
    /// # Errors
    ///
    /// - [`GoError::DoesNotExist`] if `root` is not part of the DAG
    /// - [`GoError::CyclicOntology`] if the edges contain a cycle
    pub fn index_from_root<I: Into<GoTermId>>(mut self, root: I) -> GoResult<Builder<Indexed>> {
        let root = root.into();
        self.terms
            .get_mut(root)
            .ok_or(GoError::DoesNotExist(root))?
            .add_index_path(IndexPath::root(root));

        let mut queue = VecDeque::from([root]);
        let mut queued = HashSet::from([root]);
        let mut rounds = 0usize;

        while let Some(id) = queue.pop_front() {
            queued.remove(&id);
            rounds += 1;
            let term = self.terms.get(id).ok_or(GoError::DoesNotExist(id))?;
            let paths: Vec<IndexPath> = term.index_paths().iter().cloned().collect();
            let children: Vec<GoTermId> = term.children().iter().collect();

            for child_id in children {
                let child = self
                    .terms
                    .get_mut(child_id)
                    .ok_or(GoError::DoesNotExist(child_id))?;
                let mut updated = false;
                for path in &paths {
                    if path.contains(&child_id) {
                        return Err(GoError::CyclicOntology(child_id));
                    }
                    updated |= child.add_index_path(path.extended(child_id));
                }
                if updated && queued.insert(child_id) {
                    queue.push_back(child_id);
                }
            }
        }

        let unreachable = self
            .terms
            .values()
            .filter(|term| term.depth().is_none())
            .inspect(|term| trace!("No index path for {}", term.accession()))
            .count();
        debug!(
            "Indexed {} terms of {} from root {} in {} rounds, {} unreachable",
            self.terms.len() - unreachable,
            self.branch,
            root,
            rounds,
            unreachable
        );
        self.root = Some(root);
        Ok(transition_state(self))
    }
}

impl Builder<Indexed> {
    pub fn build(self) -> GoDag {
        // `root` is always set by `index_from_root`
        let root = self.root.unwrap_or_default();
        GoDag::new(self.terms, self.branch, root)
    }
}
