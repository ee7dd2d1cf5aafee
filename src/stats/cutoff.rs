//! Selection of the p-value cutoff of a grid cell

use std::fmt::Display;

use crate::matcher::Verdict;

/// How the p-value cutoff of a grid cell is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutoffPolicy {
    /// Accept all predictions with a p-value of at most the given cutoff
    PValue(f64),
    /// Choose the most permissive cutoff that keeps the accuracy of the
    /// known predictions at or above the given target
    AccuracyTarget(f64),
}

impl Default for CutoffPolicy {
    fn default() -> Self {
        CutoffPolicy::PValue(0.01)
    }
}

impl CutoffPolicy {
    /// Returns the cutoff for a set of judged predictions
    ///
    /// `None` means that no prediction is accepted
    pub fn cutoff<'a, I>(&self, predictions: I) -> Option<f64>
    where
        I: IntoIterator<Item = (f64, &'a Verdict)>,
    {
        match self {
            CutoffPolicy::PValue(cutoff) => Some(*cutoff),
            CutoffPolicy::AccuracyTarget(target) => search_accuracy_cutoff(predictions, *target),
        }
    }
}

impl Display for CutoffPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutoffPolicy::PValue(cutoff) => write!(f, "p-value <= {cutoff}"),
            CutoffPolicy::AccuracyTarget(target) => write!(f, "accuracy >= {target}"),
        }
    }
}

/// Finds the most permissive p-value whose cumulative accuracy meets `target`
///
/// The p-values are swept from the strictest to the most permissive one.
/// Predictions with the same p-value are added together. Unknown
/// predictions do not change the accuracy.
///
/// Returns `None` if no threshold meets the target.
///
/// # Examples
///
/// ```
/// use gopredict::matcher::Verdict;
/// use gopredict::stats::cutoff::search_accuracy_cutoff;
/// use gopredict::GoGroup;
///
/// let correct = Verdict::Correct { ancestors: GoGroup::new(), matched: GoGroup::new() };
/// let wrong = Verdict::Wrong;
///
/// let predictions = vec![(0.001, &correct), (0.01, &correct), (0.05, &wrong)];
/// assert_eq!(search_accuracy_cutoff(predictions.clone(), 1.0), Some(0.01));
/// assert_eq!(search_accuracy_cutoff(predictions, 0.5), Some(0.05));
/// ```
pub fn search_accuracy_cutoff<'a, I>(predictions: I, target: f64) -> Option<f64>
where
    I: IntoIterator<Item = (f64, &'a Verdict)>,
{
    let mut sorted: Vec<(f64, bool, bool)> = predictions
        .into_iter()
        .filter(|(_, verdict)| !verdict.is_excluded())
        .map(|(p, verdict)| (p, verdict.is_known(), verdict.is_correct()))
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut best = None;
    let mut known = 0usize;
    let mut correct = 0usize;
    let mut idx = 0;
    while idx < sorted.len() {
        let p_value = sorted[idx].0;
        while idx < sorted.len() && sorted[idx].0.total_cmp(&p_value).is_eq() {
            let (_, is_known, is_correct) = sorted[idx];
            known += usize::from(is_known);
            correct += usize::from(is_correct);
            idx += 1;
        }
        if let Some(accuracy) = super::Ratio::new(correct, known).value() {
            if accuracy >= target {
                best = Some(p_value);
            }
        }
    }
    best
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::GoGroup;

    fn correct() -> Verdict {
        Verdict::Correct {
            ancestors: GoGroup::new(),
            matched: GoGroup::new(),
        }
    }

    #[test]
    fn target_not_reached() {
        let wrong = Verdict::Wrong;
        let predictions = vec![(0.001, &wrong), (0.01, &wrong)];
        assert_eq!(search_accuracy_cutoff(predictions, 0.5), None);
    }

    #[test]
    fn only_unknown() {
        let unknown = Verdict::Unknown;
        let predictions = vec![(0.001, &unknown)];
        assert_eq!(search_accuracy_cutoff(predictions, 0.0), None);
    }

    #[test]
    fn equal_p_values_are_one_step() {
        let correct = correct();
        let wrong = Verdict::Wrong;
        // both predictions at 0.01 must be accepted together
        let predictions = vec![(0.01, &wrong), (0.001, &correct), (0.01, &correct)];
        assert_eq!(search_accuracy_cutoff(predictions, 0.7), Some(0.001));
        let predictions = vec![(0.01, &wrong), (0.001, &correct), (0.01, &correct)];
        assert_eq!(search_accuracy_cutoff(predictions, 0.6), Some(0.01));
    }

    #[test]
    fn unknowns_extend_the_threshold() {
        let correct = correct();
        let unknown = Verdict::Unknown;
        let predictions = vec![(0.001, &correct), (0.02, &unknown)];
        assert_eq!(search_accuracy_cutoff(predictions, 1.0), Some(0.02));
    }

    #[test]
    fn fixed_cutoff() {
        let policy = CutoffPolicy::PValue(0.05);
        assert_eq!(policy.cutoff(Vec::<(f64, &Verdict)>::new()), Some(0.05));
    }
}
