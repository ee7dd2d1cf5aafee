//! Collapsing of redundant function predictions of one gene
//!
//! Two predicted functions of the same gene are redundant if they are
//! *related*. How relatedness is decided is defined by the [`Relatedness`]
//! trait. `gopredict` comes with two strategies:
//!
//! - [`OntologyDistance`]: one term is an ancestor of the other term
//! - [`NetworkTopology`]: the network neighbourhoods of the supporting
//!   clusters overlap
//!
//! Related functions form connected components. Each component is collapsed
//! into its shallowest function, which absorbs the evidence of all others.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::annotations::GeneId;
use crate::distance::DistanceIndex;
use crate::prediction::{FunctionPrediction, GenePredictions};
use crate::utils::{Combinations, Components};
use crate::{GoDag, GoResult};

/// Trait to decide whether two predicted functions of a gene are redundant
pub trait Relatedness {
    /// Returns `true` if `a` and `b` are related
    ///
    /// # Errors
    ///
    /// Implementations can fail if a distance is not available
    fn related(&self, gene: GeneId, a: &FunctionPrediction, b: &FunctionPrediction)
        -> GoResult<bool>;
}

/// Related if one term is an ancestor of the other (jasmine distance `0`)
pub struct OntologyDistance<'a> {
    distance: &'a dyn DistanceIndex,
}

impl<'a> OntologyDistance<'a> {
    pub fn new(distance: &'a dyn DistanceIndex) -> Self {
        Self { distance }
    }
}

impl Relatedness for OntologyDistance<'_> {
    fn related(&self, _: GeneId, a: &FunctionPrediction, b: &FunctionPrediction) -> GoResult<bool> {
        Ok(self.distance.distance(a.term(), b.term())?.jasmine_distance() == 0)
    }
}

/// An undirected gene co-expression network
#[derive(Debug, Default, Clone)]
pub struct CoexpressionNetwork {
    edges: HashMap<GeneId, HashSet<GeneId>>,
}

impl CoexpressionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an undirected edge
    pub fn add_edge(&mut self, a: GeneId, b: GeneId) {
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
    }

    /// Returns the number of genes with at least one edge
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns all genes within `radius` hops of any seed, seeds included
    pub fn neighbourhood<I: IntoIterator<Item = GeneId>>(
        &self,
        seeds: I,
        radius: usize,
    ) -> HashSet<GeneId> {
        let mut visited: HashSet<GeneId> = HashSet::new();
        let mut queue: VecDeque<(GeneId, usize)> = VecDeque::new();
        for seed in seeds {
            if visited.insert(seed) {
                queue.push_back((seed, 0));
            }
        }
        while let Some((gene, hops)) = queue.pop_front() {
            if hops == radius {
                continue;
            }
            for neighbour in self.edges.get(&gene).into_iter().flatten() {
                if visited.insert(*neighbour) {
                    queue.push_back((*neighbour, hops + 1));
                }
            }
        }
        visited
    }
}

/// Related if the network neighbourhoods of both functions overlap
///
/// The neighbourhood of a function is seeded with the gene itself and the
/// context genes of all supporting clusters. Two functions are related if
/// `|A ∩ B| / min(|A|, |B|) >= min_overlap`.
pub struct NetworkTopology<'a> {
    network: &'a CoexpressionNetwork,
    radius: usize,
    min_overlap: f64,
}

impl<'a> NetworkTopology<'a> {
    pub fn new(network: &'a CoexpressionNetwork, radius: usize, min_overlap: f64) -> Self {
        Self {
            network,
            radius,
            min_overlap,
        }
    }

    fn neighbourhood(&self, gene: GeneId, function: &FunctionPrediction) -> HashSet<GeneId> {
        let seeds = std::iter::once(gene).chain(function.context().keys().copied());
        self.network.neighbourhood(seeds, self.radius)
    }
}

impl Relatedness for NetworkTopology<'_> {
    fn related(&self, gene: GeneId, a: &FunctionPrediction, b: &FunctionPrediction) -> GoResult<bool> {
        let hood_a = self.neighbourhood(gene, a);
        let hood_b = self.neighbourhood(gene, b);
        let smaller = hood_a.len().min(hood_b.len());
        if smaller == 0 {
            return Ok(false);
        }
        let shared = hood_a.intersection(&hood_b).count();
        Ok(crate::stats::Ratio::new(shared, smaller)
            .value()
            .map_or(false, |overlap| overlap >= self.min_overlap))
    }
}

/// How redundant predictions are detected
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RedundancyStrategy {
    /// Keep all predictions
    Keep,
    /// Collapse ancestor-descendant terms
    #[default]
    OntologyDistance,
    /// Collapse functions with overlapping network neighbourhoods
    NetworkTopology { radius: usize, min_overlap: f64 },
}

/// One set of related functions of a gene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedundancyGroup {
    source: usize,
    members: Vec<usize>,
}

impl RedundancyGroup {
    /// The index of the representative function
    pub fn source(&self) -> usize {
        self.source
    }

    /// The indices of all functions of the group, the source included
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Merges related predictions of a gene into their shallowest function
pub struct RedundancyCollapser<'a, R> {
    dag: &'a GoDag,
    relatedness: R,
}

impl<'a, R: Relatedness> RedundancyCollapser<'a, R> {
    pub fn new(dag: &'a GoDag, relatedness: R) -> Self {
        Self { dag, relatedness }
    }

    /// Returns the connected components of related functions
    ///
    /// The source of each group is the member with the smallest depth,
    /// the first one on ties. Groups are ordered by their first member.
    ///
    /// # Errors
    ///
    /// Any error of the [`Relatedness`] strategy
    pub fn groups(
        &self,
        gene: GeneId,
        functions: &[FunctionPrediction],
    ) -> GoResult<Vec<RedundancyGroup>> {
        let mut components = Components::new(functions.len());
        for ((i, a), (j, b)) in Combinations::new(functions) {
            if self.relatedness.related(gene, a, b)? {
                components.union(i, j);
            }
        }
        Ok(components
            .groups()
            .into_iter()
            .map(|members| {
                let source = members
                    .iter()
                    .copied()
                    .min_by_key(|idx| self.dag.depth(functions[*idx].term()).unwrap_or(usize::MAX))
                    .unwrap_or(members[0]);
                RedundancyGroup { source, members }
            })
            .collect())
    }

    /// Collapses every group into its source
    ///
    /// The source keeps its term and verdict and absorbs the clusters,
    /// p-values and context genes of all other members.
    ///
    /// # Errors
    ///
    /// Any error of the [`Relatedness`] strategy
    pub fn collapse(&self, gene: GeneId, functions: GenePredictions) -> GoResult<GenePredictions> {
        let groups = self.groups(gene, &functions)?;
        if groups.len() == functions.len() {
            return Ok(functions);
        }
        debug!(
            "Collapsed {} functions of gene {} into {}",
            functions.len(),
            gene,
            groups.len()
        );
        let mut collapsed = Vec::with_capacity(groups.len());
        for group in groups {
            let mut source = functions[group.source].clone();
            for idx in group.members.iter().filter(|idx| **idx != group.source) {
                source.absorb(&functions[*idx]);
            }
            collapsed.push(source);
        }
        Ok(collapsed)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::distance::IndexPathDistance;
    use crate::fixtures::{self, A, B, C, D, ROOT};
    use crate::matcher::Verdict;
    use crate::prediction::Prediction;
    use crate::term::GoTermId;

    fn function(term: u32, clusters: &[u32]) -> FunctionPrediction {
        let mut function = FunctionPrediction::new(term.into(), Verdict::Wrong);
        for cluster in clusters {
            function.add(
                &Prediction::new(1u32.into(), term.into(), (*cluster).into())
                    .with_p_value(0.01)
                    .with_members(vec![1u32.into(), (*cluster + 100).into()]),
            );
        }
        function
    }

    fn terms(functions: &[FunctionPrediction]) -> Vec<GoTermId> {
        functions.iter().map(FunctionPrediction::term).collect()
    }

    #[test]
    fn ancestors_collapse_into_shallowest() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let collapser = RedundancyCollapser::new(&dag, OntologyDistance::new(&distances));

        // C and D are both below A, B is only above C
        let functions = vec![function(C, &[1]), function(A, &[2]), function(D, &[3]), function(B, &[4])];
        let collapsed = collapser.collapse(1u32.into(), functions).unwrap();

        assert_eq!(terms(&collapsed), vec![A.into()]);
        let clusters: Vec<u32> = collapsed[0].clusters().iter().map(|c| c.as_u32()).collect();
        assert_eq!(clusters, vec![2, 1, 3, 4]);
        assert_eq!(collapsed[0].p_values().len(), 4);
        assert_eq!(collapsed[0].context().len(), 4);
    }

    #[test]
    fn siblings_stay_apart() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let collapser = RedundancyCollapser::new(&dag, OntologyDistance::new(&distances));
        let functions = vec![function(D, &[1]), function(B, &[2])];
        let collapsed = collapser.collapse(1u32.into(), functions).unwrap();
        assert_eq!(terms(&collapsed), vec![D.into(), B.into()]);
    }

    #[test]
    fn first_seen_wins_ties() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let collapser = RedundancyCollapser::new(&dag, OntologyDistance::new(&distances));
        // A and B have the same depth and are linked through C
        let functions = vec![function(C, &[1]), function(B, &[2]), function(A, &[3])];
        let groups = collapser.groups(1u32.into(), &functions).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].source(), 1);
        assert_eq!(groups[0].members(), &[0, 1, 2]);
    }

    #[test]
    fn collapsing_is_idempotent() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let collapser = RedundancyCollapser::new(&dag, OntologyDistance::new(&distances));
        let functions = vec![function(C, &[1]), function(ROOT, &[2]), function(D, &[3])];
        let once = collapser.collapse(1u32.into(), functions).unwrap();
        let clusters: Vec<_> = once[0].clusters().to_vec();
        let twice = collapser.collapse(1u32.into(), once).unwrap();
        assert_eq!(terms(&twice), vec![ROOT.into()]);
        assert_eq!(twice[0].clusters(), clusters.as_slice());
    }

    #[test]
    fn network_neighbourhood() {
        let mut network = CoexpressionNetwork::new();
        network.add_edge(1u32.into(), 2u32.into());
        network.add_edge(2u32.into(), 3u32.into());
        network.add_edge(3u32.into(), 4u32.into());
        assert_eq!(network.neighbourhood([GeneId::from(1u32)], 0).len(), 1);
        assert_eq!(network.neighbourhood([GeneId::from(1u32)], 2).len(), 3);
        assert_eq!(network.neighbourhood([GeneId::from(1u32)], 10).len(), 4);
    }

    #[test]
    fn topology_overlap() {
        let dag = fixtures::diamond();
        let mut network = CoexpressionNetwork::new();
        // context gene 101 is connected to 102, context gene 103 has no edges
        network.add_edge(101u32.into(), 102u32.into());
        network.add_edge(1u32.into(), 50u32.into());

        let collapser = RedundancyCollapser::new(&dag, NetworkTopology::new(&network, 1, 0.75));
        let functions = vec![function(C, &[1]), function(D, &[2]), function(B, &[3])];
        let groups = collapser.groups(1u32.into(), &functions).unwrap();
        // C and D both reach {1, 50, 101, 102}, B reaches {1, 50, 103}
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members(), &[0, 1]);
    }
}
