//! Function predictions derived from co-expression clusters
//!
//! A [`Prediction`] is one record of the prediction stream: one gene, one
//! predicted GO term and the cluster that supports it. All predictions of
//! the same gene and term are aggregated into one [`FunctionPrediction`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

use statrs::statistics::Statistics;

use crate::annotations::GeneId;
use crate::matcher::Verdict;
use crate::term::GoTermId;
use crate::{GoError, GoResult};

/// A unique identifier of a co-expression cluster
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct ClusterId {
    inner: u32,
}

impl ClusterId {
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl From<u32> for ClusterId {
    fn from(inner: u32) -> Self {
        ClusterId { inner }
    }
}

impl TryFrom<&str> for ClusterId {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        Ok(ClusterId {
            inner: value.trim().parse::<u32>()?,
        })
    }
}

impl Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// One predicted function of one gene, supported by one cluster
///
/// # Examples
///
/// ```
/// use gopredict::Prediction;
///
/// let prediction = Prediction::new(1u32.into(), 3u32.into(), 7u32.into())
///     .with_p_value(0.001)
///     .with_recurrence(5.0)
///     .with_connectivity(0.8);
///
/// assert_eq!(prediction.p_value(), 0.001);
/// assert_eq!(prediction.cluster().as_u32(), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    gene: GeneId,
    term: GoTermId,
    cluster: ClusterId,
    p_value: f64,
    recurrence: f64,
    connectivity: f64,
    cluster_size: usize,
    unknown_ratio: f64,
    members: Vec<GeneId>,
}

impl Prediction {
    /// Constructs a new prediction with p-value `1.0` and no cluster details
    pub fn new(gene: GeneId, term: GoTermId, cluster: ClusterId) -> Self {
        Self {
            gene,
            term,
            cluster,
            p_value: 1.0,
            recurrence: 0.0,
            connectivity: 0.0,
            cluster_size: 0,
            unknown_ratio: 0.0,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_p_value(mut self, p_value: f64) -> Self {
        self.p_value = p_value;
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, recurrence: f64) -> Self {
        self.recurrence = recurrence;
        self
    }

    #[must_use]
    pub fn with_connectivity(mut self, connectivity: f64) -> Self {
        self.connectivity = connectivity;
        self
    }

    #[must_use]
    pub fn with_cluster_size(mut self, cluster_size: usize) -> Self {
        self.cluster_size = cluster_size;
        self
    }

    #[must_use]
    pub fn with_unknown_ratio(mut self, unknown_ratio: f64) -> Self {
        self.unknown_ratio = unknown_ratio;
        self
    }

    /// Sets the member genes of the supporting cluster
    ///
    /// The cluster size is updated if it was not set before
    #[must_use]
    pub fn with_members(mut self, members: Vec<GeneId>) -> Self {
        if self.cluster_size == 0 {
            self.cluster_size = members.len();
        }
        self.members = members;
        self
    }

    pub fn gene(&self) -> GeneId {
        self.gene
    }

    pub fn term(&self) -> GoTermId {
        self.term
    }

    pub fn cluster(&self) -> ClusterId {
        self.cluster
    }

    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    pub fn recurrence(&self) -> f64 {
        self.recurrence
    }

    pub fn connectivity(&self) -> f64 {
        self.connectivity
    }

    pub fn cluster_size(&self) -> usize {
        self.cluster_size
    }

    pub fn unknown_ratio(&self) -> f64 {
        self.unknown_ratio
    }

    /// The member genes of the supporting cluster
    pub fn members(&self) -> &[GeneId] {
        &self.members
    }
}

impl AsRef<Prediction> for Prediction {
    fn as_ref(&self) -> &Prediction {
        self
    }
}

/// All evidence for one predicted function of one gene
#[derive(Debug, Clone)]
pub struct FunctionPrediction {
    term: GoTermId,
    verdict: Verdict,
    clusters: Vec<ClusterId>,
    p_values: Vec<f64>,
    context: BTreeMap<GeneId, BTreeSet<ClusterId>>,
}

impl FunctionPrediction {
    pub fn new(term: GoTermId, verdict: Verdict) -> Self {
        Self {
            term,
            verdict,
            clusters: Vec::new(),
            p_values: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    /// Adds the evidence of one prediction
    ///
    /// All cluster members except the gene itself become context genes
    pub fn add(&mut self, prediction: &Prediction) {
        let cluster = prediction.cluster();
        if !self.clusters.contains(&cluster) {
            self.clusters.push(cluster);
        }
        self.p_values.push(prediction.p_value());
        for member in prediction.members() {
            if *member != prediction.gene() {
                self.context.entry(*member).or_default().insert(cluster);
            }
        }
    }

    /// Merges the evidence of `other` into `self`
    ///
    /// Clusters keep their first-seen order and occur only once, a cluster
    /// that supports both functions adds nothing to the context genes
    pub fn absorb(&mut self, other: &FunctionPrediction) {
        for cluster in &other.clusters {
            if !self.clusters.contains(cluster) {
                self.clusters.push(*cluster);
            }
        }
        self.p_values.extend_from_slice(&other.p_values);
        for (gene, clusters) in &other.context {
            self.context
                .entry(*gene)
                .or_default()
                .extend(clusters.iter().copied());
        }
    }

    pub fn term(&self) -> GoTermId {
        self.term
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// The supporting clusters, in first-seen order
    pub fn clusters(&self) -> &[ClusterId] {
        &self.clusters
    }

    /// The number of supporting clusters
    pub fn support(&self) -> usize {
        self.clusters.len()
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    /// The mean of all p-values, `None` without any p-value
    pub fn average_p_value(&self) -> Option<f64> {
        if self.p_values.is_empty() {
            None
        } else {
            Some(self.p_values.iter().mean())
        }
    }

    /// Context genes and the supporting clusters that contain them
    pub fn context(&self) -> &BTreeMap<GeneId, BTreeSet<ClusterId>> {
        &self.context
    }

    /// Returns the number of supporting clusters that contain `gene`
    pub fn context_count(&self, gene: &GeneId) -> usize {
        self.context.get(gene).map_or(0, BTreeSet::len)
    }
}

/// The aggregated predictions of one gene, in first-seen order of the terms
pub type GenePredictions = Vec<FunctionPrediction>;

/// Aggregates predictions per gene and term
///
/// `predictions` yields anything that holds a [`Prediction`], e.g. a
/// prediction together with its verdict. `verdict` is called once for
/// every new gene-term pair, with the first item of that pair.
///
/// # Errors
///
/// Returns the first error of `verdict`
pub fn group_by_gene<I, T, F>(
    predictions: I,
    mut verdict: F,
) -> GoResult<BTreeMap<GeneId, GenePredictions>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<Prediction>,
    F: FnMut(&T) -> GoResult<Verdict>,
{
    let mut genes: BTreeMap<GeneId, GenePredictions> = BTreeMap::new();
    let mut positions: HashMap<(GeneId, GoTermId), usize> = HashMap::new();
    for item in predictions {
        let prediction = item.as_ref();
        let functions = genes.entry(prediction.gene()).or_default();
        let key = (prediction.gene(), prediction.term());
        let idx = match positions.get(&key) {
            Some(idx) => *idx,
            None => {
                functions.push(FunctionPrediction::new(prediction.term(), verdict(&item)?));
                positions.insert(key, functions.len() - 1);
                functions.len() - 1
            }
        };
        functions[idx].add(prediction);
    }
    Ok(genes)
}

/// Keeps only the functions with the maximal number of supporting clusters
///
/// Several functions are kept if they have the same support
pub fn retain_dominant(functions: &mut GenePredictions) {
    let Some(max) = functions.iter().map(FunctionPrediction::support).max() else {
        return;
    };
    functions.retain(|function| function.support() == max);
}
