use crate::matcher::JudgingPolicy;
use crate::redundancy::RedundancyStrategy;
use crate::stats::cutoff::CutoffPolicy;
use crate::stats::grid::Bucketing;
use crate::Prediction;

const DEFAULT_DEPTH_CUTOFF: usize = 3;
const DEFAULT_CONNECTIVITY_CUTOFF: f64 = 0.8;
const DEFAULT_RECURRENCE_CUTOFF: f64 = 5.0;
const DEFAULT_CLUSTER_SIZE_CUTOFF: usize = 1000;
const DEFAULT_UNKNOWN_RATIO_CUTOFF: f64 = 1.0;

/// The configuration of a [`crate::Validation`] run
///
/// # Examples
///
/// ```
/// use gopredict::Settings;
/// use gopredict::matcher::JudgingPolicy;
/// use gopredict::stats::cutoff::CutoffPolicy;
///
/// let settings = Settings::default()
///     .depth_cutoff(4)
///     .judging(JudgingPolicy::OneStep)
///     .cutoff(CutoffPolicy::AccuracyTarget(0.6));
///
/// assert_eq!(settings.get_depth_cutoff(), 4);
/// assert_eq!(settings.get_recurrence_cutoff(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    depth_cutoff: usize,
    connectivity_cutoff: f64,
    recurrence_cutoff: f64,
    cluster_size_cutoff: usize,
    unknown_ratio_cutoff: f64,
    bucketing: Bucketing,
    judging: JudgingPolicy,
    cutoff: CutoffPolicy,
    dominant_only: bool,
    redundancy: RedundancyStrategy,
    no_of_functions: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            depth_cutoff: DEFAULT_DEPTH_CUTOFF,
            connectivity_cutoff: DEFAULT_CONNECTIVITY_CUTOFF,
            recurrence_cutoff: DEFAULT_RECURRENCE_CUTOFF,
            cluster_size_cutoff: DEFAULT_CLUSTER_SIZE_CUTOFF,
            unknown_ratio_cutoff: DEFAULT_UNKNOWN_RATIO_CUTOFF,
            bucketing: Bucketing::default(),
            judging: JudgingPolicy::default(),
            cutoff: CutoffPolicy::default(),
            dominant_only: false,
            redundancy: RedundancyStrategy::default(),
            no_of_functions: None,
        }
    }
}

impl Settings {
    /// Minimal depth of predicted terms, shallower terms are excluded
    #[must_use]
    pub fn depth_cutoff(mut self, depth: usize) -> Self {
        self.depth_cutoff = depth;
        self
    }

    /// Minimal connectivity of the supporting cluster
    #[must_use]
    pub fn connectivity_cutoff(mut self, connectivity: f64) -> Self {
        self.connectivity_cutoff = connectivity;
        self
    }

    /// Minimal recurrence of the supporting cluster
    #[must_use]
    pub fn recurrence_cutoff(mut self, recurrence: f64) -> Self {
        self.recurrence_cutoff = recurrence;
        self
    }

    /// Maximal size of the supporting cluster
    #[must_use]
    pub fn cluster_size_cutoff(mut self, size: usize) -> Self {
        self.cluster_size_cutoff = size;
        self
    }

    /// Maximal ratio of unknown genes in the supporting cluster
    #[must_use]
    pub fn unknown_ratio_cutoff(mut self, ratio: f64) -> Self {
        self.unknown_ratio_cutoff = ratio;
        self
    }

    #[must_use]
    pub fn bucketing(mut self, bucketing: Bucketing) -> Self {
        self.bucketing = bucketing;
        self
    }

    #[must_use]
    pub fn judging(mut self, judging: JudgingPolicy) -> Self {
        self.judging = judging;
        self
    }

    #[must_use]
    pub fn cutoff(mut self, cutoff: CutoffPolicy) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Keep only the functions with the most supporting clusters per gene
    #[must_use]
    pub fn dominant_only(mut self, dominant_only: bool) -> Self {
        self.dominant_only = dominant_only;
        self
    }

    #[must_use]
    pub fn redundancy(mut self, redundancy: RedundancyStrategy) -> Self {
        self.redundancy = redundancy;
        self
    }

    /// The number of functions used for true negatives
    ///
    /// Defaults to the number of terms in the branch
    #[must_use]
    pub fn no_of_functions(mut self, no_of_functions: usize) -> Self {
        self.no_of_functions = Some(no_of_functions);
        self
    }

    pub fn get_depth_cutoff(&self) -> usize {
        self.depth_cutoff
    }

    pub fn get_connectivity_cutoff(&self) -> f64 {
        self.connectivity_cutoff
    }

    pub fn get_recurrence_cutoff(&self) -> f64 {
        self.recurrence_cutoff
    }

    pub fn get_cluster_size_cutoff(&self) -> usize {
        self.cluster_size_cutoff
    }

    pub fn get_unknown_ratio_cutoff(&self) -> f64 {
        self.unknown_ratio_cutoff
    }

    pub fn get_bucketing(&self) -> Bucketing {
        self.bucketing
    }

    pub fn get_judging(&self) -> JudgingPolicy {
        self.judging
    }

    pub fn get_cutoff(&self) -> CutoffPolicy {
        self.cutoff
    }

    pub fn get_dominant_only(&self) -> bool {
        self.dominant_only
    }

    pub fn get_redundancy(&self) -> RedundancyStrategy {
        self.redundancy
    }

    pub fn get_no_of_functions(&self) -> Option<usize> {
        self.no_of_functions
    }

    /// Returns `true` if the supporting cluster passes all cluster filters
    pub fn accepts(&self, prediction: &Prediction) -> bool {
        prediction.recurrence() >= self.recurrence_cutoff
            && prediction.connectivity() >= self.connectivity_cutoff
            && prediction.cluster_size() <= self.cluster_size_cutoff
            && prediction.unknown_ratio() <= self.unknown_ratio_cutoff
    }
}
