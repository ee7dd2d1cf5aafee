//! The (recurrence, connectivity) grid of judged predictions

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Display;

use tracing::debug;

use crate::annotations::GeneId;
use crate::matcher::Verdict;
use crate::prediction::Prediction;
use crate::stats::cutoff::CutoffPolicy;
use crate::stats::Ratio;
use crate::term::GoTermId;

const EXACT_SCALE: f64 = 10_000.0;

/// How predictions are assigned to grid cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bucketing {
    /// One cell per distinct (recurrence, connectivity)
    Exact,
    /// Cells of `recurrence` width and `connectivity` tenths
    ///
    /// The key of a prediction is
    /// `(floor(recurrence / recurrence_gap), floor(connectivity * 10 / connectivity_gap))`
    Gap {
        recurrence_gap: f64,
        connectivity_gap: f64,
    },
}

impl Default for Bucketing {
    fn default() -> Self {
        Bucketing::Gap {
            recurrence_gap: 2.0,
            connectivity_gap: 2.0,
        }
    }
}

impl Bucketing {
    /// Returns the grid key of a prediction
    pub fn key(&self, prediction: &Prediction) -> GridKey {
        let (recurrence, connectivity) = match self {
            Bucketing::Exact => (
                prediction.recurrence() * EXACT_SCALE,
                prediction.connectivity() * EXACT_SCALE,
            ),
            Bucketing::Gap {
                recurrence_gap,
                connectivity_gap,
            } => (
                (prediction.recurrence() / recurrence_gap).floor(),
                (prediction.connectivity() * 10.0 / connectivity_gap).floor(),
            ),
        };
        GridKey {
            recurrence: f64_to_i64(recurrence),
            connectivity: f64_to_i64(connectivity),
        }
    }

    /// Returns the lower bounds of recurrence and connectivity of a cell
    pub fn label(&self, key: &GridKey) -> (f64, f64) {
        let (recurrence, connectivity) = (i64_to_f64(key.recurrence), i64_to_f64(key.connectivity));
        match self {
            Bucketing::Exact => (recurrence / EXACT_SCALE, connectivity / EXACT_SCALE),
            Bucketing::Gap {
                recurrence_gap,
                connectivity_gap,
            } => (
                recurrence * recurrence_gap,
                connectivity * connectivity_gap / 10.0,
            ),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn f64_to_i64(value: f64) -> i64 {
    value.round() as i64
}

#[allow(clippy::cast_precision_loss)]
fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// The key of a grid cell, see [`Bucketing::key`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    recurrence: i64,
    connectivity: i64,
}

impl GridKey {
    pub fn new(recurrence: i64, connectivity: i64) -> Self {
        Self {
            recurrence,
            connectivity,
        }
    }

    pub fn recurrence(&self) -> i64 {
        self.recurrence
    }

    pub fn connectivity(&self) -> i64 {
        self.connectivity
    }
}

impl Display for GridKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.recurrence, self.connectivity)
    }
}

/// A prediction together with its verdict
#[derive(Debug, Clone)]
pub struct ScoredPrediction {
    prediction: Prediction,
    verdict: Verdict,
}

impl ScoredPrediction {
    pub fn new(prediction: Prediction, verdict: Verdict) -> Self {
        Self {
            prediction,
            verdict,
        }
    }

    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn p_value(&self) -> f64 {
        self.prediction.p_value()
    }

    /// Returns `true` if the p-value passes the cutoff
    ///
    /// Without cutoff nothing passes
    pub fn passes(&self, cutoff: Option<f64>) -> bool {
        cutoff.map_or(false, |cutoff| self.p_value() <= cutoff)
    }
}

impl AsRef<Prediction> for ScoredPrediction {
    fn as_ref(&self) -> &Prediction {
        &self.prediction
    }
}

/// The counts of the accepted predictions of one cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStats {
    p_value_cutoff: Option<f64>,
    correct: usize,
    known: usize,
    unknown: usize,
    correct_pairs: usize,
    known_pairs: usize,
    unknown_pairs: usize,
    known_genes: usize,
    unknown_genes: usize,
}

impl CellStats {
    /// Counts the predictions that pass `cutoff`
    ///
    /// Predictions are counted individually (gene, function, cluster) and
    /// per distinct gene-function pair. The verdict of a pair is the
    /// verdict of its first prediction.
    pub fn count<'a, I>(cutoff: Option<f64>, predictions: I) -> Self
    where
        I: IntoIterator<Item = &'a ScoredPrediction>,
    {
        let mut stats = CellStats {
            p_value_cutoff: cutoff,
            ..Default::default()
        };
        let mut pairs: HashMap<(GeneId, GoTermId), &Verdict> = HashMap::new();
        let mut known_genes: HashSet<GeneId> = HashSet::new();
        let mut unknown_genes: HashSet<GeneId> = HashSet::new();

        for scored in predictions.into_iter().filter(|s| s.passes(cutoff)) {
            let gene = scored.prediction.gene();
            match &scored.verdict {
                Verdict::Excluded => continue,
                Verdict::Unknown => {
                    stats.unknown += 1;
                    unknown_genes.insert(gene);
                }
                verdict => {
                    stats.known += 1;
                    stats.correct += usize::from(verdict.is_correct());
                    known_genes.insert(gene);
                }
            }
            pairs
                .entry((gene, scored.prediction.term()))
                .or_insert(&scored.verdict);
        }

        for verdict in pairs.values() {
            if verdict.is_known() {
                stats.known_pairs += 1;
                stats.correct_pairs += usize::from(verdict.is_correct());
            } else {
                stats.unknown_pairs += 1;
            }
        }
        stats.known_genes = known_genes.len();
        stats.unknown_genes = unknown_genes.len();
        stats
    }

    /// The chosen p-value cutoff, `None` if nothing is accepted
    pub fn p_value_cutoff(&self) -> Option<f64> {
        self.p_value_cutoff
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn known(&self) -> usize {
        self.known
    }

    pub fn unknown(&self) -> usize {
        self.unknown
    }

    pub fn correct_pairs(&self) -> usize {
        self.correct_pairs
    }

    pub fn known_pairs(&self) -> usize {
        self.known_pairs
    }

    pub fn unknown_pairs(&self) -> usize {
        self.unknown_pairs
    }

    pub fn known_genes(&self) -> usize {
        self.known_genes
    }

    pub fn unknown_genes(&self) -> usize {
        self.unknown_genes
    }

    /// `correct / known` of all predictions
    pub fn accuracy(&self) -> Ratio {
        Ratio::new(self.correct, self.known)
    }

    /// `correct / known` of the distinct gene-function pairs
    pub fn pair_accuracy(&self) -> Ratio {
        Ratio::new(self.correct_pairs, self.known_pairs)
    }
}

/// The judged predictions of one cell
#[derive(Debug, Clone, Default)]
pub struct GridCell {
    predictions: Vec<ScoredPrediction>,
}

impl GridCell {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn predictions(&self) -> &[ScoredPrediction] {
        &self.predictions
    }

    /// Counts the predictions that pass `cutoff`
    pub fn tally(&self, cutoff: Option<f64>) -> CellStats {
        CellStats::count(cutoff, &self.predictions)
    }
}

/// Collects judged predictions in a (recurrence, connectivity) grid
///
/// Cells are created on first use. Excluded predictions are never added.
///
/// # Examples
///
/// ```
/// use gopredict::Prediction;
/// use gopredict::matcher::Verdict;
/// use gopredict::stats::cutoff::CutoffPolicy;
/// use gopredict::stats::grid::{Bucketing, GridKey, PredictionGrid};
///
/// let mut grid = PredictionGrid::new(Bucketing::default());
/// let prediction = Prediction::new(1u32.into(), 3u32.into(), 7u32.into())
///     .with_p_value(0.001)
///     .with_recurrence(5.0)
///     .with_connectivity(0.8);
/// grid.add(prediction, Verdict::Wrong);
///
/// let report = grid.finalize(CutoffPolicy::PValue(0.01));
/// let (key, stats) = &report.cells()[0];
/// assert_eq!(key, &GridKey::new(2, 4));
/// assert_eq!(stats.known(), 1);
/// assert_eq!(stats.accuracy().value(), Some(0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredictionGrid {
    bucketing: Bucketing,
    cells: BTreeMap<GridKey, GridCell>,
    excluded: usize,
}

impl PredictionGrid {
    pub fn new(bucketing: Bucketing) -> Self {
        Self {
            bucketing,
            cells: BTreeMap::new(),
            excluded: 0,
        }
    }

    /// Adds a judged prediction to its cell
    ///
    /// Returns `false` if the prediction is excluded and was not added
    pub fn add(&mut self, prediction: Prediction, verdict: Verdict) -> bool {
        if verdict.is_excluded() {
            self.excluded += 1;
            return false;
        }
        let key = self.bucketing.key(&prediction);
        self.cells
            .entry(key)
            .or_default()
            .predictions
            .push(ScoredPrediction::new(prediction, verdict));
        true
    }

    /// Returns the number of excluded predictions
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn cell(&self, key: &GridKey) -> Option<&GridCell> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Chooses the cutoff of every cell and collects the accepted predictions
    pub fn finalize(self, policy: CutoffPolicy) -> GridReport {
        let mut cells = Vec::with_capacity(self.cells.len());
        let mut accepted = Vec::new();
        for (key, cell) in self.cells {
            let cutoff = policy.cutoff(
                cell.predictions
                    .iter()
                    .map(|scored| (scored.p_value(), &scored.verdict)),
            );
            let stats = cell.tally(cutoff);
            debug!(
                "Cell {}: cutoff {:?}, {} of {} known correct, {} unknown",
                key,
                cutoff,
                stats.correct(),
                stats.known(),
                stats.unknown()
            );
            cells.push((key, stats));
            accepted.extend(
                cell.predictions
                    .into_iter()
                    .filter(|scored| scored.passes(cutoff)),
            );
        }
        let overall = CellStats::count(Some(f64::INFINITY), &accepted);
        GridReport {
            bucketing: self.bucketing,
            cells,
            accepted,
            overall,
        }
    }
}

/// The finalized grid
#[derive(Debug, Clone)]
pub struct GridReport {
    bucketing: Bucketing,
    cells: Vec<(GridKey, CellStats)>,
    accepted: Vec<ScoredPrediction>,
    overall: CellStats,
}

impl GridReport {
    pub fn bucketing(&self) -> Bucketing {
        self.bucketing
    }

    /// The statistics of every cell, ordered by key
    pub fn cells(&self) -> &[(GridKey, CellStats)] {
        &self.cells
    }

    /// All predictions that passed the cutoff of their cell
    pub fn accepted(&self) -> &[ScoredPrediction] {
        &self.accepted
    }

    /// The counts over all accepted predictions
    pub fn overall(&self) -> &CellStats {
        &self.overall
    }

    pub fn into_accepted(self) -> Vec<ScoredPrediction> {
        self.accepted
    }
}
