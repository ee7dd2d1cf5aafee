//! Overall and per-function accuracy of the accepted predictions

use std::collections::BTreeMap;

use crate::annotations::{GeneId, KnownAnnotations};
use crate::matcher::Verdict;
use crate::prediction::GenePredictions;
use crate::stats::Ratio;
use crate::term::{GoGroup, GoTermId};

/// The confusion counts of the accepted predictions of all known genes
///
/// Pair counts refer to distinct gene-function pairs, `tp` and `fp` count
/// the supporting clusters of those pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    tp: usize,
    fp: usize,
    tp_pair: usize,
    fp_pair: usize,
    fn_pair: usize,
    tn_pair: usize,
    known_genes: usize,
    unknown_genes: usize,
}

impl Summary {
    /// Evaluates the aggregated predictions of every gene
    ///
    /// For every known gene, known functions that are not matched by any
    /// correct prediction are false negatives. True negatives are all
    /// remaining functions of the ontology,
    /// `no_of_functions - (tp_pair + fp_pair + fn)` (never below zero).
    ///
    /// Unknown genes are only counted.
    pub fn evaluate(
        genes: &BTreeMap<GeneId, GenePredictions>,
        known: &KnownAnnotations,
        no_of_functions: usize,
    ) -> Self {
        let mut summary = Summary::default();
        for (gene, functions) in genes {
            if !known.is_known(gene) {
                summary.unknown_genes += 1;
                continue;
            }
            summary.known_genes += 1;

            let mut matched = GoGroup::new();
            let mut tp_pair = 0;
            let mut fp_pair = 0;
            for function in functions {
                match function.verdict() {
                    Verdict::Correct { matched: m, .. } => {
                        tp_pair += 1;
                        summary.tp += function.support();
                        matched = &matched | m;
                    }
                    Verdict::Wrong => {
                        fp_pair += 1;
                        summary.fp += function.support();
                    }
                    Verdict::Unknown | Verdict::Excluded => {}
                }
            }
            let fn_pair = known
                .known(gene)
                .iter()
                .filter(|term| !matched.contains(term))
                .count();

            summary.tp_pair += tp_pair;
            summary.fp_pair += fp_pair;
            summary.fn_pair += fn_pair;
            summary.tn_pair += no_of_functions.saturating_sub(tp_pair + fp_pair + fn_pair);
        }
        summary
    }

    /// Supporting clusters of correct predictions
    pub fn tp(&self) -> usize {
        self.tp
    }

    /// Supporting clusters of wrong predictions
    pub fn fp(&self) -> usize {
        self.fp
    }

    pub fn tp_pair(&self) -> usize {
        self.tp_pair
    }

    pub fn fp_pair(&self) -> usize {
        self.fp_pair
    }

    /// Known functions without a correct prediction
    pub fn fn_pair(&self) -> usize {
        self.fn_pair
    }

    pub fn tn_pair(&self) -> usize {
        self.tn_pair
    }

    pub fn known_genes(&self) -> usize {
        self.known_genes
    }

    pub fn unknown_genes(&self) -> usize {
        self.unknown_genes
    }

    /// `tp_pair / (tp_pair + fn)`
    pub fn sensitivity(&self) -> Ratio {
        Ratio::new(self.tp_pair, self.tp_pair + self.fn_pair)
    }

    /// `tn / (fp_pair + tn)`
    pub fn specificity(&self) -> Ratio {
        Ratio::new(self.tn_pair, self.fp_pair + self.tn_pair)
    }

    /// `fp_pair / (tp_pair + fp_pair)`
    pub fn false_positive_ratio(&self) -> Ratio {
        Ratio::new(self.fp_pair, self.tp_pair + self.fp_pair)
    }

    /// `fp / (tp + fp)`, based on supporting clusters
    pub fn cluster_false_positive_ratio(&self) -> Ratio {
        Ratio::new(self.fp, self.tp + self.fp)
    }
}

/// The accuracy of all predictions of one GO term
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionAccuracy {
    correct: usize,
    known: usize,
    unknown: usize,
}

impl FunctionAccuracy {
    /// Evaluates the accuracy of every predicted term
    ///
    /// Every gene-function pair is counted once
    pub fn evaluate(genes: &BTreeMap<GeneId, GenePredictions>) -> BTreeMap<GoTermId, Self> {
        let mut terms: BTreeMap<GoTermId, Self> = BTreeMap::new();
        for function in genes.values().flatten() {
            let entry = terms.entry(function.term()).or_default();
            match function.verdict() {
                Verdict::Correct { .. } => {
                    entry.correct += 1;
                    entry.known += 1;
                }
                Verdict::Wrong => entry.known += 1,
                Verdict::Unknown => entry.unknown += 1,
                Verdict::Excluded => {}
            }
        }
        terms
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

    /// `correct / known`
    pub fn accuracy(&self) -> Ratio {
        Ratio::new(self.correct, self.known)
    }
}
