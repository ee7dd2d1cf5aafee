use std::ops::{BitAnd, BitOr};

use crate::term::GoTermId;

/// A set of [`GoTermId`]s, kept sorted
///
/// Each term can occur only once in the group.
///
/// This group is used for parents and children of a term, for known
/// annotations of a gene and for common ancestor sets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct GoGroup {
    ids: Vec<GoTermId>,
}

impl GoGroup {
    /// Constructs a new, empty [`GoGroup`]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Constructs a new, empty [`GoGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`GoTermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`GoTermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`GoTermId`] to the group
    ///
    /// Returns whether the `GoTermId` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `GoTermId`, true is returned.
    /// - If the group already contained this `GoTermId`, false is returned.
    ///
    pub fn insert<I: Into<GoTermId>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Returns `true` if the group contains the [`GoTermId`]
    pub fn contains(&self, id: &GoTermId) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`GoTermId`]s inside the group
    pub fn iter(&self) -> GoTermIds {
        GoTermIds::new(self.ids.iter())
    }

    /// Returns the smallest [`GoTermId`] of the group
    pub fn first(&self) -> Option<GoTermId> {
        self.ids.first().copied()
    }

    /// Removes all ids for which `f` returns `false`
    pub fn retain<F: FnMut(&GoTermId) -> bool>(&mut self, f: F) {
        self.ids.retain(f);
    }

    /// Removes all ids from the group
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl From<Vec<GoTermId>> for GoGroup {
    fn from(mut ids: Vec<GoTermId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }
}

impl<I: Into<GoTermId>> FromIterator<I> for GoGroup {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let ids: Vec<GoTermId> = iter.into_iter().map(Into::into).collect();
        Self::from(ids)
    }
}

impl<'a> IntoIterator for &'a GoGroup {
    type Item = GoTermId;
    type IntoIter = GoTermIds<'a>;

    fn into_iter(self) -> GoTermIds<'a> {
        GoTermIds::new(self.ids.iter())
    }
}

/// An iterator over [`GoTermId`]s
pub struct GoTermIds<'a> {
    inner: std::slice::Iter<'a, GoTermId>,
}

impl<'a> GoTermIds<'a> {
    fn new(inner: std::slice::Iter<'a, GoTermId>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for GoTermIds<'a> {
    type Item = GoTermId;
    fn next(&mut self) -> Option<GoTermId> {
        self.inner.next().copied()
    }
}

impl BitOr for &GoGroup {
    type Output = GoGroup;

    fn bitor(self, rhs: &GoGroup) -> GoGroup {
        let mut group = GoGroup::with_capacity(self.len() + rhs.len());
        group.ids.extend_from_slice(&self.ids);
        for id in &rhs.ids {
            group.insert(*id);
        }
        group
    }
}

impl BitAnd for &GoGroup {
    type Output = GoGroup;

    fn bitand(self, rhs: &GoGroup) -> GoGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        GoGroup {
            ids: small
                .ids
                .iter()
                .filter(|id| large.contains(id))
                .copied()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_order() {
        let mut group = GoGroup::new();
        assert!(group.insert(3u32));
        assert!(group.insert(1u32));
        assert!(!group.insert(3u32));
        assert!(group.insert(2u32));

        let ids: Vec<GoTermId> = group.iter().collect();
        assert_eq!(ids, vec![1u32.into(), 2u32.into(), 3u32.into()]);
        assert_eq!(group.first(), Some(1u32.into()));
    }

    #[test]
    fn from_vec_dedups() {
        let group = GoGroup::from(vec![5u32.into(), 1u32.into(), 5u32.into()]);
        assert_eq!(group.len(), 2);
        assert!(group.contains(&5u32.into()));
    }

    #[test]
    fn bitor() {
        let group1: GoGroup = [1u32, 2, 3].into_iter().collect();
        let group2: GoGroup = [2u32, 4].into_iter().collect();

        let result = &group1 | &group2;
        let expected: GoGroup = [1u32, 2, 3, 4].into_iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn bitand() {
        let group1: GoGroup = [1u32, 2, 3].into_iter().collect();
        let group2: GoGroup = [2u32, 4, 5, 1].into_iter().collect();

        let result = &group1 & &group2;
        let expected: GoGroup = [1u32, 2].into_iter().collect();
        assert_eq!(result, expected);
    }
}
