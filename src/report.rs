//! The result of a validation run and its tab-separated rendering
//!
//! A [`Report`] holds three tables:
//!
//! - the statistics of every grid cell ([`Report::cell_table`])
//! - the summary of all accepted predictions ([`Report::summary_table`])
//! - one row per retained function of each gene ([`Report::gene_table`])
//!
//! Every table implements `Display` and is written as tab-separated text
//! with a header line. Undefined ratios and missing values are `NULL`.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::matcher::Verdict;
use crate::prediction::ClusterId;
use crate::stats::grid::GridReport;
use crate::stats::summary::{FunctionAccuracy, Summary};
use crate::stats::Ratio;
use crate::term::GoTermId;

/// One retained function of one gene, with all names resolved
#[derive(Debug, Clone)]
pub struct GeneRow {
    pub(crate) gene: String,
    pub(crate) known_functions: Vec<String>,
    pub(crate) function: String,
    pub(crate) verdict: Verdict,
    pub(crate) ancestors: Vec<String>,
    pub(crate) average_p_value: Option<f64>,
    pub(crate) expected_accuracy: Ratio,
    pub(crate) clusters: Vec<ClusterId>,
    pub(crate) context: Vec<String>,
}

impl GeneRow {
    pub fn gene(&self) -> &str {
        &self.gene
    }

    /// Names of the known functions of the gene
    pub fn known_functions(&self) -> &[String] {
        &self.known_functions
    }

    /// Name of the predicted function
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Names of the common ancestors that make the function correct
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    pub fn average_p_value(&self) -> Option<f64> {
        self.average_p_value
    }

    /// The accuracy of all predictions of the same function
    pub fn expected_accuracy(&self) -> Ratio {
        self.expected_accuracy
    }

    /// The supporting clusters in first-seen order
    pub fn clusters(&self) -> &[ClusterId] {
        &self.clusters
    }

    /// Number of supporting clusters
    pub fn support(&self) -> usize {
        self.clusters.len()
    }

    /// Context genes as `gene/count`
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

/// The result of a validation run
#[derive(Debug, Clone)]
pub struct Report {
    grid: GridReport,
    summary: Summary,
    function_accuracy: BTreeMap<GoTermId, FunctionAccuracy>,
    genes: Vec<GeneRow>,
    rejected: usize,
}

impl Report {
    pub(crate) fn new(
        grid: GridReport,
        summary: Summary,
        function_accuracy: BTreeMap<GoTermId, FunctionAccuracy>,
        genes: Vec<GeneRow>,
        rejected: usize,
    ) -> Self {
        Self {
            grid,
            summary,
            function_accuracy,
            genes,
            rejected,
        }
    }

    pub fn grid(&self) -> &GridReport {
        &self.grid
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The accuracy of every predicted function
    pub fn function_accuracy(&self) -> &BTreeMap<GoTermId, FunctionAccuracy> {
        &self.function_accuracy
    }

    /// The per-gene rows, known genes first
    pub fn genes(&self) -> &[GeneRow] {
        &self.genes
    }

    /// The number of predictions rejected by the cluster filters
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn cell_table(&self) -> CellTable<'_> {
        CellTable(&self.grid)
    }

    pub fn summary_table(&self) -> SummaryTable<'_> {
        SummaryTable(&self.summary)
    }

    pub fn gene_table(&self) -> GeneTable<'_> {
        GeneTable(&self.genes)
    }
}

/// Tab-separated table of all grid cells and a final `overall` line
pub struct CellTable<'a>(&'a GridReport);

impl Display for CellTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "recurrence\tconnectivity\tp_value_cutoff\taccuracy\tcorrect\tknown\tunknown\t\
             pair_accuracy\tcorrect_pairs\tknown_pairs\tunknown_pairs\tknown_genes\tunknown_genes"
        )?;
        let bucketing = self.0.bucketing();
        for (key, stats) in self.0.cells() {
            let (recurrence, connectivity) = bucketing.label(key);
            write!(f, "{recurrence}\t{connectivity}\t")?;
            match stats.p_value_cutoff() {
                Some(cutoff) => write!(f, "{cutoff}\t")?,
                None => write!(f, "NULL\t")?,
            }
            write_counts(f, stats)?;
        }
        let overall = self.0.overall();
        write!(f, "overall\toverall\tNULL\t")?;
        write_counts(f, overall)
    }
}

fn write_counts(
    f: &mut std::fmt::Formatter<'_>,
    stats: &crate::stats::grid::CellStats,
) -> std::fmt::Result {
    writeln!(
        f,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.accuracy(),
        stats.correct(),
        stats.known(),
        stats.unknown(),
        stats.pair_accuracy(),
        stats.correct_pairs(),
        stats.known_pairs(),
        stats.unknown_pairs(),
        stats.known_genes(),
        stats.unknown_genes()
    )
}

/// Tab-separated table with a single summary line
pub struct SummaryTable<'a>(&'a Summary);

impl Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        writeln!(
            f,
            "tp\tfp\ttn\tfn\ttp_pair\tfp_pair\tsensitivity\tspecificity\t\
             false_positive_ratio\tcluster_false_positive_ratio\tknown_genes\tunknown_genes"
        )?;
        writeln!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.tp(),
            s.fp(),
            s.tn_pair(),
            s.fn_pair(),
            s.tp_pair(),
            s.fp_pair(),
            s.sensitivity(),
            s.specificity(),
            s.false_positive_ratio(),
            s.cluster_false_positive_ratio(),
            s.known_genes(),
            s.unknown_genes()
        )
    }
}

/// Tab-separated table of all retained functions per gene
pub struct GeneTable<'a>(&'a [GeneRow]);

impl Display for GeneTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "gene\tknown_functions\tfunction\tis_correct\tancestors\taverage_p_value\t\
             expected_accuracy\tclusters\tcontext"
        )?;
        for row in self.0 {
            let known = if row.known_functions.is_empty() {
                String::from("NULL")
            } else {
                row.known_functions.join(";")
            };
            let is_correct = row
                .verdict
                .code()
                .map_or_else(|| String::from("NULL"), |code| code.to_string());
            let ancestors = if row.ancestors.is_empty() {
                String::from("NULL")
            } else {
                row.ancestors.join(";")
            };
            let clusters: Vec<String> = row.clusters.iter().map(ToString::to_string).collect();
            let p_value = row
                .average_p_value
                .map_or_else(|| String::from("NULL"), |p| format!("{p:e}"));
            writeln!(
                f,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.gene,
                known,
                row.function,
                is_correct,
                ancestors,
                p_value,
                row.expected_accuracy.as_percent(),
                clusters.join(";"),
                row.context.join(";")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stats::cutoff::CutoffPolicy;
    use crate::stats::grid::{Bucketing, PredictionGrid};
    use crate::Prediction;

    fn grid() -> GridReport {
        let mut grid = PredictionGrid::new(Bucketing::default());
        grid.add(
            Prediction::new(1u32.into(), 3u32.into(), 7u32.into())
                .with_p_value(0.001)
                .with_recurrence(5.0)
                .with_connectivity(0.8),
            Verdict::Unknown,
        );
        grid.finalize(CutoffPolicy::AccuracyTarget(1.0))
    }

    #[test]
    fn cell_table() {
        let grid = grid();
        let table = CellTable(&grid).to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("recurrence\tconnectivity\tp_value_cutoff"));
        assert_eq!(lines[1], "4\t0.8\tNULL\tNULL\t0\t0\t0\tNULL\t0\t0\t0\t0\t0");
        assert!(lines[2].starts_with("overall\toverall\tNULL\tNULL"));
    }

    #[test]
    fn summary_table() {
        let table = SummaryTable(&Summary::default()).to_string();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "0\t0\t0\t0\t0\t0\tNULL\tNULL\tNULL\tNULL\t0\t0");
    }

    #[test]
    fn gene_table() {
        let rows = vec![GeneRow {
            gene: String::from("g1"),
            known_functions: vec![String::from("A"), String::from("B")],
            function: String::from("C"),
            verdict: Verdict::Wrong,
            ancestors: Vec::new(),
            average_p_value: Some(0.001),
            expected_accuracy: Ratio::new(1, 3),
            clusters: vec![7u32.into(), 3u32.into()],
            context: vec![String::from("g2/2"), String::from("g3/1")],
        }];
        let table = GeneTable(&rows).to_string();
        assert_eq!(
            table.lines().nth(1),
            Some("g1\tA;B\tC\t0\tNULL\t1e-3\t33.33%\t7;3\tg2/2;g3/1")
        );
    }

    #[test]
    fn gene_table_correct_row() {
        let matched: crate::term::GoGroup = [GoTermId::from(2u32)].into_iter().collect();
        let rows = vec![GeneRow {
            gene: String::from("g1"),
            known_functions: vec![String::from("A")],
            function: String::from("C"),
            verdict: Verdict::Correct {
                ancestors: matched.clone(),
                matched,
            },
            ancestors: vec![String::from("A"), String::from("B")],
            average_p_value: None,
            expected_accuracy: Ratio::new(1, 1),
            clusters: vec![1u32.into()],
            context: Vec::new(),
        }];
        assert_eq!(rows[0].support(), 1);
        let table = GeneTable(&rows).to_string();
        assert_eq!(
            table.lines().nth(1),
            Some("g1\tA\tC\t1\tA;B\tNULL\t100.00%\t1\t")
        );
    }
}
