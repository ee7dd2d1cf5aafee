use std::fmt::Display;
use std::ops::Index;

use smallvec::SmallVec;

use crate::term::GoTermId;
use crate::DEFAULT_PATH_LEN;

/// One walk through the DAG, from the branch root down to a term
///
/// The first element is always the root of the branch, the last element
/// is the term that owns the path. A term can own many paths, one for
/// every distinct walk from the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    ids: SmallVec<[GoTermId; DEFAULT_PATH_LEN]>,
}

impl IndexPath {
    /// The path of the root term, containing only the root itself
    pub fn root(id: GoTermId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        Self { ids }
    }

    /// Returns a new path that continues `self` to `child`
    pub fn extended(&self, child: GoTermId) -> Self {
        let mut ids = SmallVec::with_capacity(self.ids.len() + 1);
        ids.extend_from_slice(&self.ids);
        ids.push(child);
        Self { ids }
    }

    /// Returns the number of terms in the path, the root included
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the path contains no term
    ///
    /// Paths are never empty once constructed
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of edges that were walked
    pub fn edges(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }

    /// Returns the term at the end of the path
    pub fn last(&self) -> Option<&GoTermId> {
        self.ids.last()
    }

    /// Returns the position of `id` in the path
    pub fn position(&self, id: &GoTermId) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    /// Returns `true` if `id` is part of the path
    pub fn contains(&self, id: &GoTermId) -> bool {
        self.ids.contains(id)
    }

    /// Returns an iterator of the terms from root to leaf
    pub fn iter(&self) -> std::slice::Iter<'_, GoTermId> {
        self.ids.iter()
    }
}

impl Index<usize> for IndexPath {
    type Output = GoTermId;
    fn index(&self, index: usize) -> &Self::Output {
        &self.ids[index]
    }
}

impl<'a> IntoIterator for &'a IndexPath {
    type Item = &'a GoTermId;
    type IntoIter = std::slice::Iter<'a, GoTermId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl Display for IndexPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.ids.iter().map(ToString::to_string).collect();
        write!(f, "({})", ids.join(","))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extend_path() {
        let root = IndexPath::root(1u32.into());
        assert_eq!(root.len(), 1);
        assert_eq!(root.edges(), 0);

        let path = root.extended(2u32.into()).extended(5u32.into());
        assert_eq!(path.len(), 3);
        assert_eq!(path.edges(), 2);
        assert_eq!(path.last(), Some(&5u32.into()));
        assert_eq!(path[0], 1u32.into());
        assert_eq!(path.position(&2u32.into()), Some(1));
        assert!(path.position(&3u32.into()).is_none());

        // the original path is untouched
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn display() {
        let path = IndexPath::root(1u32.into()).extended(20u32.into());
        assert_eq!(path.to_string(), "(1,20)");
    }
}
