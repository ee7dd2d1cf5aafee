use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::distance::IndexPathDistance;
use crate::matcher::PredictionMatcher;
use crate::prediction::{group_by_gene, retain_dominant, GenePredictions};
use crate::redundancy::{
    CoexpressionNetwork, NetworkTopology, OntologyDistance, Relatedness, RedundancyCollapser,
    RedundancyStrategy,
};
use crate::report::{GeneRow, Report};
use crate::stats::grid::PredictionGrid;
use crate::stats::summary::{FunctionAccuracy, Summary};
use crate::stats::Ratio;
use crate::{GeneId, GoDag, GoError, GoResult, GoTermId, KnownAnnotations, Prediction, Settings};

/// Leave-one-out validation of a stream of predictions
///
/// Every prediction passes these steps:
///
/// 1. the cluster filters of [`Settings`]
/// 2. judging against the known annotations of its gene
/// 3. the (recurrence, connectivity) grid and its p-value cutoffs
///
/// The accepted predictions are then aggregated per gene, optionally
/// reduced to the dominant functions, collapsed into non-redundant
/// functions and summarized in a [`Report`].
///
/// # Examples
///
/// ```
/// use gopredict::{Branch, GoDag, KnownAnnotations, Prediction, Settings, Validation};
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
/// let mut known = KnownAnnotations::default();
/// known.insert(1u32.into(), 2u32.into());
///
/// let prediction = Prediction::new(1u32.into(), 3u32.into(), 7u32.into())
///     .with_p_value(0.001)
///     .with_recurrence(5.0)
///     .with_connectivity(0.8);
///
/// let settings = Settings::default().depth_cutoff(1);
/// let report = Validation::new(&dag, &known, settings)
///     .run(vec![Ok(prediction)])
///     .unwrap();
///
/// assert_eq!(report.summary().tp_pair(), 1);
/// ```
pub struct Validation<'a> {
    dag: &'a GoDag,
    known: &'a KnownAnnotations,
    settings: Settings,
    network: Option<&'a CoexpressionNetwork>,
}

impl<'a> Validation<'a> {
    pub fn new(dag: &'a GoDag, known: &'a KnownAnnotations, settings: Settings) -> Self {
        Self {
            dag,
            known,
            settings,
            network: None,
        }
    }

    /// Sets the co-expression network for [`RedundancyStrategy::NetworkTopology`]
    #[must_use]
    pub fn with_network(mut self, network: &'a CoexpressionNetwork) -> Self {
        self.network = Some(network);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validates all predictions
    ///
    /// # Errors
    ///
    /// - Any error of the prediction source
    /// - [`GoError::DistanceUnavailable`] if a predicted term is not part
    ///   of the branch
    /// - [`GoError::InvalidInput`] if the network topology strategy is used
    ///   without a network
    pub fn run<I>(&self, predictions: I) -> GoResult<Report>
    where
        I: IntoIterator<Item = GoResult<Prediction>>,
    {
        let distances = IndexPathDistance::new(self.dag);
        let matcher = PredictionMatcher::new(
            self.dag,
            &distances,
            self.settings.get_depth_cutoff(),
            self.settings.get_judging(),
        );

        let mut grid = PredictionGrid::new(self.settings.get_bucketing());
        let mut rejected = 0usize;
        let mut total = 0usize;
        for prediction in predictions {
            let prediction = prediction?;
            total += 1;
            if !self.settings.accepts(&prediction) {
                debug!(
                    "Rejected cluster {} for gene {}",
                    prediction.cluster(),
                    prediction.gene()
                );
                rejected += 1;
                continue;
            }
            let verdict = matcher.judge(prediction.term(), self.known.known(&prediction.gene()))?;
            grid.add(prediction, verdict);
        }
        info!(
            "Judged {} of {} predictions in {} cells, {} rejected, {} excluded",
            total - rejected,
            total,
            grid.len(),
            rejected,
            grid.excluded()
        );

        let grid = grid.finalize(self.settings.get_cutoff());
        info!(
            "Accepted {} predictions, {} distances cached",
            grid.accepted().len(),
            distances.cache_len()
        );

        // verdicts were settled before the grid
        let mut genes = group_by_gene(grid.accepted(), |scored| Ok(scored.verdict().clone()))?;

        if self.settings.get_dominant_only() {
            genes.values_mut().for_each(retain_dominant);
        }

        genes = match self.settings.get_redundancy() {
            RedundancyStrategy::Keep => genes,
            RedundancyStrategy::OntologyDistance => {
                self.collapse(genes, OntologyDistance::new(&distances))?
            }
            RedundancyStrategy::NetworkTopology {
                radius,
                min_overlap,
            } => {
                let network = self.network.ok_or_else(|| {
                    GoError::InvalidInput(String::from(
                        "network topology redundancy requires a co-expression network",
                    ))
                })?;
                self.collapse(genes, NetworkTopology::new(network, radius, min_overlap))?
            }
        };

        let no_of_functions = self
            .settings
            .get_no_of_functions()
            .unwrap_or_else(|| self.dag.len());
        let summary = Summary::evaluate(&genes, self.known, no_of_functions);
        let accuracy = FunctionAccuracy::evaluate(&genes);
        let rows = self.gene_rows(&genes, &accuracy);

        Ok(Report::new(grid, summary, accuracy, rows, rejected))
    }

    fn collapse<R: Relatedness>(
        &self,
        genes: BTreeMap<GeneId, GenePredictions>,
        relatedness: R,
    ) -> GoResult<BTreeMap<GeneId, GenePredictions>> {
        let collapser = RedundancyCollapser::new(self.dag, relatedness);
        genes
            .into_iter()
            .map(|(gene, functions)| Ok((gene, collapser.collapse(gene, functions)?)))
            .collect()
    }

    fn term_name(&self, id: GoTermId) -> String {
        self.dag
            .term(id)
            .map_or_else(|| id.to_string(), |term| term.name().to_string())
    }

    fn gene_name(&self, gene: &GeneId) -> String {
        self.known
            .gene_name(gene)
            .map_or_else(|| gene.to_string(), ToString::to_string)
    }

    /// Rows of known genes first, then of unknown genes
    fn gene_rows(
        &self,
        genes: &BTreeMap<GeneId, GenePredictions>,
        accuracy: &BTreeMap<GoTermId, FunctionAccuracy>,
    ) -> Vec<GeneRow> {
        let (known, unknown): (Vec<_>, Vec<_>) =
            genes.iter().partition(|(gene, _)| self.known.is_known(gene));

        let mut rows = Vec::new();
        for (gene, functions) in known.into_iter().chain(unknown) {
            let known_functions: Vec<String> = self
                .known
                .known(gene)
                .iter()
                .map(|id| self.term_name(id))
                .collect();
            for function in functions {
                let mut context: Vec<String> = function
                    .context()
                    .iter()
                    .map(|(gene, clusters)| format!("{}/{}", self.gene_name(gene), clusters.len()))
                    .collect();
                context.sort();
                rows.push(GeneRow {
                    gene: self.gene_name(gene),
                    known_functions: known_functions.clone(),
                    function: self.term_name(function.term()),
                    verdict: function.verdict().clone(),
                    average_p_value: function.average_p_value(),
                    expected_accuracy: accuracy
                        .get(&function.term())
                        .map_or(Ratio::Undefined, FunctionAccuracy::accuracy),
                    ancestors: function
                        .verdict()
                        .ancestors()
                        .map(|ancestors| ancestors.iter().map(|id| self.term_name(id)).collect())
                        .unwrap_or_default(),
                    clusters: function.clusters().to_vec(),
                    context,
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixtures::{self, A, B, C, D};
    use crate::matcher::JudgingPolicy;
    use crate::stats::cutoff::CutoffPolicy;

    fn prediction(gene: u32, term: u32, cluster: u32, p: f64) -> GoResult<Prediction> {
        Ok(Prediction::new(gene.into(), term.into(), cluster.into())
            .with_p_value(p)
            .with_recurrence(6.0)
            .with_connectivity(0.9)
            .with_members(vec![1u32.into(), 2u32.into(), 3u32.into()]))
    }

    fn settings() -> Settings {
        Settings::default()
            .depth_cutoff(1)
            .cutoff(CutoffPolicy::PValue(0.05))
            .redundancy(RedundancyStrategy::Keep)
    }

    #[test]
    fn end_to_end() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let predictions = vec![
            // g1 is known with A
            prediction(1, C, 1, 0.001),
            prediction(1, C, 2, 0.002),
            prediction(1, B, 3, 0.01),
            // too shallow for the default depth cutoff of 1
            prediction(1, fixtures::ROOT, 4, 0.01),
            // not accepted by the p-value cutoff
            prediction(1, D, 5, 0.5),
            // g2 is unknown
            prediction(2, D, 6, 0.01),
        ];
        let report = Validation::new(&dag, &known, settings())
            .run(predictions)
            .unwrap();

        assert_eq!(report.rejected(), 0);
        assert_eq!(report.grid().overall().known(), 3);
        assert_eq!(report.grid().overall().correct(), 2);
        assert_eq!(report.grid().overall().unknown(), 1);

        let summary = report.summary();
        assert_eq!(summary.tp_pair(), 1);
        assert_eq!(summary.fp_pair(), 1);
        assert_eq!(summary.tp(), 2);
        assert_eq!(summary.fn_pair(), 0);
        assert_eq!(summary.unknown_genes(), 1);

        let genes: Vec<&str> = report.genes().iter().map(GeneRow::gene).collect();
        assert_eq!(genes, vec!["g1", "g1", "g2"]);
        assert_eq!(report.genes()[0].function(), "C");
        assert_eq!(report.genes()[0].known_functions(), &[String::from("A")]);
        // gene 3 has no name
        assert_eq!(report.genes()[0].context(), &[String::from("3/2"), String::from("g2/2")]);
        let clusters: Vec<u32> = report.genes()[0].clusters().iter().map(|c| c.as_u32()).collect();
        assert_eq!(clusters, vec![1, 2]);
        // C is correct through its parent A
        assert_eq!(report.genes()[0].ancestors(), &[String::from("A")]);
        assert!(report.genes()[2].ancestors().is_empty());
    }

    #[test]
    fn gene_table_lists_clusters_and_ancestors() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let report = Validation::new(&dag, &known, settings())
            .run(vec![prediction(1, C, 1, 0.001), prediction(1, C, 2, 0.002)])
            .unwrap();
        let table = report.gene_table().to_string();
        let row: Vec<&str> = table.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(row[3], "1");
        assert_eq!(row[4], "A");
        assert_eq!(row[7], "1;2");
    }

    #[test]
    fn cluster_filters_reject() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let report = Validation::new(&dag, &known, settings().recurrence_cutoff(10.0))
            .run(vec![prediction(1, C, 1, 0.001)])
            .unwrap();
        assert_eq!(report.rejected(), 1);
        assert!(report.genes().is_empty());
    }

    #[test]
    fn redundant_functions_are_collapsed() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let settings = settings()
            .judging(JudgingPolicy::Direct)
            .redundancy(RedundancyStrategy::OntologyDistance);
        let report = Validation::new(&dag, &known, settings)
            .run(vec![
                prediction(2, C, 1, 0.001),
                prediction(2, A, 2, 0.001),
                prediction(2, B, 3, 0.001),
            ])
            .unwrap();
        assert_eq!(report.genes().len(), 1);
        assert_eq!(report.genes()[0].function(), "A");
        assert_eq!(report.genes()[0].support(), 3);
        let clusters: Vec<u32> = report.genes()[0].clusters().iter().map(|c| c.as_u32()).collect();
        assert_eq!(clusters, vec![1, 2, 3]);
    }

    #[test]
    fn topology_requires_network() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let settings = settings().redundancy(RedundancyStrategy::NetworkTopology {
            radius: 1,
            min_overlap: 0.5,
        });
        let result = Validation::new(&dag, &known, settings).run(vec![prediction(1, C, 1, 0.001)]);
        assert!(matches!(result, Err(GoError::InvalidInput(_))));
    }

    #[test]
    fn source_errors_propagate() {
        let dag = fixtures::diamond();
        let known = fixtures::annotations();
        let result = Validation::new(&dag, &known, settings())
            .run(vec![Err(GoError::InvalidInput(String::from("broken")))]);
        assert!(result.is_err());
    }
}
