//! Utility structs and methods

/// Iterator of all one-way pairwise combinations of a slice
///
/// Every item is yielded together with its index.
///
/// # Examples
/// ```
/// use gopredict::utils::Combinations;
///
/// let items = [1, 2, 3];
/// let mut c = Combinations::new(&items);
///
/// assert_eq!(c.next(), Some(((0, &1), (1, &2))));
/// assert_eq!(c.next(), Some(((0, &1), (2, &3))));
/// assert_eq!(c.next(), Some(((1, &2), (2, &3))));
/// assert!(c.next().is_none());
/// ```
pub struct Combinations<'a, T> {
    inner: &'a [T],
    idx1: usize,
    idx2: usize,
}

impl<'a, T> Combinations<'a, T> {
    /// Creates a new Combinations iterator
    pub fn new(inner: &'a [T]) -> Self {
        Self {
            inner,
            idx1: 0,
            idx2: 1,
        }
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = ((usize, &'a T), (usize, &'a T));
    fn next(&mut self) -> Option<Self::Item> {
        while self.idx1 < self.inner.len() {
            if self.idx2 < self.inner.len() {
                let item = (
                    (self.idx1, &self.inner[self.idx1]),
                    (self.idx2, &self.inner[self.idx2]),
                );
                self.idx2 += 1;
                return Some(item);
            }
            self.idx1 += 1;
            self.idx2 = self.idx1 + 1;
        }
        None
    }
}

/// Disjoint sets of the indices `0..n`
///
/// Used to find connected components of an undirected graph
#[derive(Debug, Clone)]
pub struct Components {
    parents: Vec<usize>,
}

impl Components {
    /// Creates `n` sets of a single index each
    pub fn new(n: usize) -> Self {
        Self {
            parents: (0..n).collect(),
        }
    }

    /// Returns the representative index of the set that contains `idx`
    pub fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        let mut current = idx;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }

    /// Joins the sets of `a` and `b`
    pub fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            // the smaller index stays representative
            self.parents[a.max(b)] = a.min(b);
        }
    }

    /// Returns all sets, each ordered by index, ordered by their first index
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut position: Vec<Option<usize>> = vec![None; self.parents.len()];
        for idx in 0..self.parents.len() {
            let root = self.find(idx);
            match position[root] {
                Some(pos) => groups[pos].push(idx),
                None => {
                    position[root] = Some(groups.len());
                    groups.push(vec![idx]);
                }
            }
        }
        groups
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn combinations() {
        let a = vec![1, 2, 3, 4];
        let pairs: Vec<(usize, usize)> = Combinations::new(&a).map(|((i, _), (j, _))| (i, j)).collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn combinations_empty() {
        let a: Vec<usize> = vec![];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), None);
    }

    #[test]
    fn combinations_single() {
        let a = vec![1];
        let mut c = Combinations::new(&a);
        assert_eq!(c.next(), None);
    }

    #[test]
    fn components() {
        let mut c = Components::new(5);
        c.union(3, 1);
        c.union(4, 3);
        assert_eq!(c.find(4), 1);
        assert_eq!(c.groups(), vec![vec![0], vec![1, 3, 4], vec![2]]);
    }
}
