use std::collections::BTreeSet;

use crate::term::{GoGroup, GoTermId, IndexPath};
use crate::{DEFAULT_NUM_CHILDREN, DEFAULT_NUM_PARENTS};

#[derive(Debug)]
pub(crate) struct GoTermInternal {
    id: GoTermId,
    accession: String,
    name: String,
    parents: GoGroup,
    children: GoGroup,
    index_paths: BTreeSet<IndexPath>,
    depth: Option<usize>,
}

impl GoTermInternal {
    pub fn new(id: GoTermId, accession: String, name: String) -> GoTermInternal {
        GoTermInternal {
            id,
            accession,
            name,
            parents: GoGroup::with_capacity(DEFAULT_NUM_PARENTS),
            children: GoGroup::with_capacity(DEFAULT_NUM_CHILDREN),
            index_paths: BTreeSet::new(),
            depth: None,
        }
    }

    pub fn id(&self) -> &GoTermId {
        &self.id
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &GoGroup {
        &self.parents
    }

    pub fn children(&self) -> &GoGroup {
        &self.children
    }

    pub fn index_paths(&self) -> &BTreeSet<IndexPath> {
        &self.index_paths
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn add_parent(&mut self, parent_id: GoTermId) {
        self.parents.insert(parent_id);
    }

    pub fn add_child(&mut self, child_id: GoTermId) {
        self.children.insert(child_id);
    }

    /// Adds a path and updates the depth
    ///
    /// Returns `true` if the path was not known before
    pub fn add_index_path(&mut self, path: IndexPath) -> bool {
        let edges = path.edges();
        if self.index_paths.insert(path) {
            self.depth = Some(self.depth.map_or(edges, |d| d.min(edges)));
            true
        } else {
            false
        }
    }
}

impl PartialEq for GoTermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTermInternal {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn depth_is_minimum_of_paths() {
        let mut term = GoTermInternal::new(3u32.into(), "GO:3".into(), "A".into());
        assert!(term.depth().is_none());

        let long = IndexPath::root(1u32.into())
            .extended(2u32.into())
            .extended(3u32.into());
        assert!(term.add_index_path(long.clone()));
        assert_eq!(term.depth(), Some(2));

        let short = IndexPath::root(1u32.into()).extended(3u32.into());
        assert!(term.add_index_path(short));
        assert_eq!(term.depth(), Some(1));

        assert!(!term.add_index_path(long));
        assert_eq!(term.index_paths().len(), 2);
    }
}
