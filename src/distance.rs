//! Distances and lowest common ancestors of two GO terms
//!
//! Distances are calculated from the index paths of both terms. For every
//! pair of paths, the deepest term that occurs in both paths is the lowest
//! common ancestor on that pair of walks. The distances of all path pairs
//! are reduced to independent minima.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::trace;

use crate::term::{GoGroup, GoTermId, IndexPath};
use crate::{GoDag, GoResult, LEE_DISTANCE_BASE};

/// The distances between two GO terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceEntry {
    raw: usize,
    lee: i32,
    jasmine: usize,
    common_ancestors: GoGroup,
}

impl DistanceEntry {
    fn identical(id: GoTermId) -> Self {
        let mut common_ancestors = GoGroup::new();
        common_ancestors.insert(id);
        Self {
            raw: 0,
            lee: 0,
            jasmine: 0,
            common_ancestors,
        }
    }

    /// The number of edges between both terms, via the lowest common ancestor
    pub fn raw_distance(&self) -> usize {
        self.raw
    }

    /// [`LEE_DISTANCE_BASE`] minus the level of the lowest common ancestor
    ///
    /// The level of the root is `1`
    pub fn lee_distance(&self) -> i32 {
        self.lee
    }

    /// The shorter of the two distances to the lowest common ancestor
    ///
    /// `0` means that one term is an ancestor of the other term.
    pub fn jasmine_distance(&self) -> usize {
        self.jasmine
    }

    /// All lowest common ancestors that yield the minimal raw distance
    pub fn common_ancestor_set(&self) -> &GoGroup {
        &self.common_ancestors
    }
}

/// Trait for distance calculation between 2 GO terms
pub trait DistanceIndex {
    /// Returns the distances between `a` and `b`
    ///
    /// The result does not depend on the order of `a` and `b`.
    ///
    /// # Errors
    ///
    /// [`crate::GoError::DistanceUnavailable`] if one of the terms is not
    /// part of the loaded branch
    fn distance(&self, a: GoTermId, b: GoTermId) -> GoResult<DistanceEntry>;
}

/// Calculates distances from the index paths of a [`GoDag`]
///
/// Every distance is calculated once and cached under the ascending
/// pair of ids. The cache uses interior mutability, so the struct is not
/// `Sync`. Use one instance per thread.
///
/// # Examples
///
/// ```
/// use gopredict::{Branch, GoDag};
/// use gopredict::distance::{DistanceIndex, IndexPathDistance};
///
/// let mut builder = GoDag::builder(Branch::BiologicalProcess);
/// builder.add_term(1u32, "GO:0008150", "biological_process");
/// builder.add_term(2u32, "GO:0000002", "A");
/// builder.add_term(3u32, "GO:0000003", "B");
/// let mut builder = builder.terms_complete();
/// builder.add_parent(1u32, 2u32).unwrap();
/// builder.add_parent(2u32, 3u32).unwrap();
/// let dag = builder.index().unwrap().build();
///
/// let distances = IndexPathDistance::new(&dag);
/// let entry = distances.distance(3u32.into(), 2u32.into()).unwrap();
/// assert_eq!(entry.raw_distance(), 1);
/// assert_eq!(entry.jasmine_distance(), 0);
/// assert_eq!(entry.lee_distance(), 13);
/// assert_eq!(distances.cache_len(), 1);
/// ```
pub struct IndexPathDistance<'a> {
    dag: &'a GoDag,
    cache: RefCell<HashMap<(GoTermId, GoTermId), DistanceEntry>>,
}

impl<'a> IndexPathDistance<'a> {
    pub fn new(dag: &'a GoDag) -> Self {
        Self {
            dag,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the number of cached term pairs
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    fn calculate(&self, a: GoTermId, b: GoTermId) -> GoResult<DistanceEntry> {
        let paths_a = self.dag.index_paths(a)?;
        let paths_b = self.dag.index_paths(b)?;

        let mut raw = usize::MAX;
        let mut lee = i32::MAX;
        let mut jasmine = usize::MAX;
        let mut common_ancestors = GoGroup::new();

        for path_a in paths_a {
            for path_b in paths_b {
                let Some(lca) = PathPairLca::new(path_a, path_b) else {
                    continue;
                };
                lee = lee.min(lca.lee());
                jasmine = jasmine.min(lca.jasmine());
                let pair_raw = lca.raw();
                if pair_raw < raw {
                    raw = pair_raw;
                    common_ancestors.clear();
                    common_ancestors.insert(lca.ancestor);
                } else if pair_raw == raw {
                    common_ancestors.insert(lca.ancestor);
                }
            }
        }
        trace!(
            "Distance {} - {}: raw {}, lee {}, jasmine {}",
            a,
            b,
            raw,
            lee,
            jasmine
        );
        Ok(DistanceEntry {
            raw,
            lee,
            jasmine,
            common_ancestors,
        })
    }
}

impl DistanceIndex for IndexPathDistance<'_> {
    fn distance(&self, a: GoTermId, b: GoTermId) -> GoResult<DistanceEntry> {
        if a == b {
            // the term must still be part of the branch
            self.dag.index_paths(a)?;
            return Ok(DistanceEntry::identical(a));
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(entry) = self.cache.borrow().get(&key) {
            return Ok(entry.clone());
        }
        let entry = self.calculate(key.0, key.1)?;
        self.cache.borrow_mut().insert(key, entry.clone());
        Ok(entry)
    }
}

/// The lowest common ancestor of a single pair of index paths
struct PathPairLca {
    ancestor: GoTermId,
    /// edges from the end of the shorter path to the ancestor
    d1: usize,
    /// edges from the end of the longer path to the ancestor
    d2: usize,
    /// position of the ancestor in the shorter path
    i: usize,
    /// position of the ancestor in the longer path
    j: usize,
}

impl PathPairLca {
    /// Scans the shorter path from its end for a term of the longer path
    ///
    /// Returns `None` only if the paths share no term, which can not
    /// happen for two paths of the same root.
    fn new(a: &IndexPath, b: &IndexPath) -> Option<Self> {
        let (fixed, dynamic) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        (0..fixed.len()).rev().find_map(|i| {
            dynamic.position(&fixed[i]).map(|j| PathPairLca {
                ancestor: fixed[i],
                d1: fixed.len() - (i + 1),
                d2: dynamic.len() - (j + 1),
                i,
                j,
            })
        })
    }

    fn raw(&self) -> usize {
        self.d1 + self.d2
    }

    fn jasmine(&self) -> usize {
        self.d1.min(self.d2)
    }

    fn lee(&self) -> i32 {
        let level = i32::try_from(self.i.min(self.j) + 1).unwrap_or(i32::MAX);
        LEE_DISTANCE_BASE.saturating_sub(level)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::{self, A, B, C, D, ROOT};
    use crate::GoError;

    #[test]
    fn self_distance() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let entry = distances.distance(C.into(), C.into()).unwrap();
        assert_eq!(entry.raw_distance(), 0);
        assert_eq!(entry.jasmine_distance(), 0);
        assert_eq!(entry.common_ancestor_set().len(), 1);
        assert!(entry.common_ancestor_set().contains(&C.into()));
    }

    #[test]
    fn diamond_lca() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let entry = distances.distance(C.into(), D.into()).unwrap();
        assert_eq!(entry.raw_distance(), 2);
        assert_eq!(entry.jasmine_distance(), 1);
        assert_eq!(entry.lee_distance(), 13);
        let expected: GoGroup = [A].into_iter().collect();
        assert_eq!(entry.common_ancestor_set(), &expected);
    }

    #[test]
    fn symmetric() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        for (a, b) in [(A, B), (C, D), (B, D), (ROOT, C)] {
            let ab = distances.distance(a.into(), b.into()).unwrap();
            let ba = distances.distance(b.into(), a.into()).unwrap();
            assert_eq!(ab, ba);
        }
        assert_eq!(distances.cache_len(), 4);
    }

    #[test]
    fn ancestor_has_jasmine_zero() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let entry = distances.distance(ROOT.into(), C.into()).unwrap();
        assert_eq!(entry.raw_distance(), 2);
        assert_eq!(entry.jasmine_distance(), 0);
        assert_eq!(entry.lee_distance(), 14);
    }

    #[test]
    fn siblings_with_two_lcas() {
        // C is reachable via A and B, so C and B share B as ancestor on one
        // walk and the root on the other walk
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let entry = distances.distance(B.into(), C.into()).unwrap();
        assert_eq!(entry.raw_distance(), 1);
        let expected: GoGroup = [B].into_iter().collect();
        assert_eq!(entry.common_ancestor_set(), &expected);
    }

    #[test]
    fn ties_are_kept() {
        // X and Y both have parents P and Q
        let mut builder = GoDag::builder(crate::Branch::BiologicalProcess);
        builder.add_term(1u32, "GO:0008150", "biological_process");
        for id in 2u32..=5 {
            builder.add_term(id, &format!("GO:{id:07}"), "t");
        }
        let mut builder = builder.terms_complete();
        for (parent, child) in [(1u32, 2u32), (1, 3), (2, 4), (3, 4), (2, 5), (3, 5)] {
            builder.add_parent(parent, child).unwrap();
        }
        let dag = builder.index().unwrap().build();
        let distances = IndexPathDistance::new(&dag);
        let entry = distances.distance(4u32.into(), 5u32.into()).unwrap();
        assert_eq!(entry.raw_distance(), 2);
        let expected: GoGroup = [2u32, 3].into_iter().collect();
        assert_eq!(entry.common_ancestor_set(), &expected);
    }

    #[test]
    fn term_outside_branch() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        assert!(matches!(
            distances.distance(A.into(), 99u32.into()),
            Err(GoError::DistanceUnavailable(id)) if id == 99u32.into()
        ));
        assert!(distances.distance(99u32.into(), 99u32.into()).is_err());
        assert_eq!(distances.cache_len(), 0);
    }
}
