//! Judging a predicted function against the known functions of a gene
//!
//! `gopredict` comes with three judging policies that implement the
//! [`Judge`] trait:
//!
//! - [`DirectMatch`]: the predicted term must be a known term
//! - [`OneStepMatch`]: the predicted term must be one step away from a known term
//! - [`CommonAncestorMatch`]: the predicted term must share a deep enough
//!   common ancestor with a known term
//!
//! All policies share the same precondition: predicted terms that are
//! shallower than the depth cutoff are [`Verdict::Excluded`] and predictions
//! for genes without known functions are [`Verdict::Unknown`].

use std::fmt::Display;

use tracing::trace;

use crate::distance::DistanceIndex;
use crate::term::{GoGroup, GoTermId};
use crate::{GoDag, GoError, GoResult};

/// The outcome of judging one predicted function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The predicted term is too shallow, the prediction is never counted
    Excluded,
    /// The gene has no known function
    Unknown,
    /// No known function matches the prediction
    Wrong,
    /// The prediction matches at least one known function
    Correct {
        /// The common ancestors that justify the match
        ancestors: GoGroup,
        /// The known terms that were matched
        matched: GoGroup,
    },
}

impl Verdict {
    /// Returns `-1` for unknown, `0` for wrong and `1` for correct predictions
    ///
    /// Excluded predictions have no code
    pub fn code(&self) -> Option<i8> {
        match self {
            Verdict::Excluded => None,
            Verdict::Unknown => Some(-1),
            Verdict::Wrong => Some(0),
            Verdict::Correct { .. } => Some(1),
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct { .. })
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Verdict::Wrong | Verdict::Correct { .. })
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Verdict::Excluded)
    }

    /// Returns the known terms that were matched, empty unless correct
    pub fn matched(&self) -> Option<&GoGroup> {
        match self {
            Verdict::Correct { matched, .. } => Some(matched),
            _ => None,
        }
    }

    /// Returns the common ancestors of a correct prediction
    pub fn ancestors(&self) -> Option<&GoGroup> {
        match self {
            Verdict::Correct { ancestors, .. } => Some(ancestors),
            _ => None,
        }
    }

    fn correct(ancestors: GoGroup, matched: GoGroup) -> Self {
        if matched.is_empty() {
            Verdict::Wrong
        } else {
            Verdict::Correct { ancestors, matched }
        }
    }

    fn single(predicted: GoTermId) -> Self {
        let group: GoGroup = [predicted].into_iter().collect();
        Verdict::Correct {
            ancestors: group.clone(),
            matched: group,
        }
    }
}

/// Everything a [`Judge`] needs to know about the ontology
pub struct MatchContext<'a> {
    pub dag: &'a GoDag,
    pub distance: &'a dyn DistanceIndex,
    pub depth_cutoff: usize,
}

impl MatchContext<'_> {
    /// Returns `true` if the term is in the branch and deep enough
    fn deep_enough(&self, id: GoTermId) -> bool {
        self.dag
            .depth(id)
            .map_or(false, |depth| depth >= self.depth_cutoff)
    }
}

/// Trait for the judging policies
///
/// `judge` is only called for predicted terms that are deep enough and
/// for genes with at least one known term.
pub trait Judge {
    /// Judges `predicted` against the `known` terms of a gene
    ///
    /// # Errors
    ///
    /// [`GoError::DistanceUnavailable`] if a distance can not be calculated
    fn judge(&self, ctx: &MatchContext, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict>;
}

/// Correct if the predicted term is one of the known terms
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectMatch;

impl Judge for DirectMatch {
    fn judge(&self, _: &MatchContext, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict> {
        if known.contains(&predicted) {
            Ok(Verdict::single(predicted))
        } else {
            Ok(Verdict::Wrong)
        }
    }
}

/// Correct if the predicted term is a known term or one step away from a
/// deep enough known term
///
/// One step means that the terms are parent and child or that one of them
/// is a direct child of their lowest common ancestor, e.g. siblings.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneStepMatch;

impl Judge for OneStepMatch {
    fn judge(&self, ctx: &MatchContext, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict> {
        if known.contains(&predicted) {
            return Ok(Verdict::single(predicted));
        }
        let mut ancestors = GoGroup::new();
        let mut matched = GoGroup::new();
        for k in known.iter().filter(|k| ctx.deep_enough(*k)) {
            let entry = ctx.distance.distance(predicted, k)?;
            if entry.raw_distance() == 1 || entry.jasmine_distance() == 1 {
                matched.insert(k);
                ancestors = &ancestors | entry.common_ancestor_set();
            }
        }
        Ok(Verdict::correct(ancestors, matched))
    }
}

/// Correct if the predicted term shares a deep enough lowest common
/// ancestor with a known term
///
/// The verdict holds all qualifying ancestors of maximal depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommonAncestorMatch;

impl Judge for CommonAncestorMatch {
    fn judge(&self, ctx: &MatchContext, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict> {
        if known.contains(&predicted) {
            return Ok(Verdict::single(predicted));
        }

        let mut by_known: Vec<(GoTermId, GoGroup)> = Vec::with_capacity(known.len());
        let mut deepest: Option<usize> = None;
        for k in known {
            if ctx.dag.depth(k).is_none() {
                trace!("Known term {} is outside of the branch", k);
                continue;
            }
            let entry = ctx.distance.distance(predicted, k)?;
            let qualifying: GoGroup = entry
                .common_ancestor_set()
                .iter()
                .filter(|a| ctx.deep_enough(*a))
                .collect();
            for a in &qualifying {
                deepest = deepest.max(ctx.dag.depth(a));
            }
            by_known.push((k, qualifying));
        }

        let Some(deepest) = deepest else {
            return Ok(Verdict::Wrong);
        };

        let mut ancestors = GoGroup::new();
        let mut matched = GoGroup::new();
        for (k, qualifying) in by_known {
            for a in &qualifying {
                if ctx.dag.depth(a) == Some(deepest) {
                    ancestors.insert(a);
                    matched.insert(k);
                }
            }
        }
        Ok(Verdict::correct(ancestors, matched))
    }
}

/// The built-in judging policies
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JudgingPolicy {
    Direct,
    OneStep,
    #[default]
    CommonAncestor,
}

impl Judge for JudgingPolicy {
    fn judge(&self, ctx: &MatchContext, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict> {
        match self {
            JudgingPolicy::Direct => DirectMatch.judge(ctx, predicted, known),
            JudgingPolicy::OneStep => OneStepMatch.judge(ctx, predicted, known),
            JudgingPolicy::CommonAncestor => CommonAncestorMatch.judge(ctx, predicted, known),
        }
    }
}

impl TryFrom<&str> for JudgingPolicy {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        match value.to_lowercase().as_str() {
            "direct" => Ok(JudgingPolicy::Direct),
            "one_step" | "onestep" => Ok(JudgingPolicy::OneStep),
            "common_ancestor" | "lca" | "depth" => Ok(JudgingPolicy::CommonAncestor),
            other => Err(GoError::InvalidInput(format!("unknown judging policy `{other}`"))),
        }
    }
}

impl Display for JudgingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JudgingPolicy::Direct => "direct",
            JudgingPolicy::OneStep => "one_step",
            JudgingPolicy::CommonAncestor => "common_ancestor",
        };
        write!(f, "{name}")
    }
}

/// Judges predictions with one policy and one depth cutoff
///
/// # Examples
///
/// ```
/// use gopredict::{Branch, GoDag, GoGroup};
/// use gopredict::distance::IndexPathDistance;
/// use gopredict::matcher::{JudgingPolicy, PredictionMatcher, Verdict};
///
/// let mut builder = GoDag::builder(Branch::BiologicalProcess);
/// builder.add_term(1u32, "GO:0008150", "biological_process");
/// builder.add_term(2u32, "GO:0000002", "A");
/// let mut builder = builder.terms_complete();
/// builder.add_parent(1u32, 2u32).unwrap();
/// let dag = builder.index().unwrap().build();
/// let distances = IndexPathDistance::new(&dag);
///
/// let matcher = PredictionMatcher::new(&dag, &distances, 1, JudgingPolicy::Direct);
/// let known: GoGroup = [2u32].into_iter().collect();
///
/// assert!(matcher.judge(2u32.into(), &known).unwrap().is_correct());
/// assert_eq!(matcher.judge(2u32.into(), &GoGroup::new()).unwrap(), Verdict::Unknown);
/// assert_eq!(matcher.judge(1u32.into(), &known).unwrap(), Verdict::Excluded);
/// ```
pub struct PredictionMatcher<'a, J = JudgingPolicy> {
    ctx: MatchContext<'a>,
    judge: J,
}

impl<'a, J: Judge> PredictionMatcher<'a, J> {
    pub fn new(
        dag: &'a GoDag,
        distance: &'a dyn DistanceIndex,
        depth_cutoff: usize,
        judge: J,
    ) -> Self {
        Self {
            ctx: MatchContext {
                dag,
                distance,
                depth_cutoff,
            },
            judge,
        }
    }

    pub fn depth_cutoff(&self) -> usize {
        self.ctx.depth_cutoff
    }

    /// Judges one predicted term against the known terms of its gene
    ///
    /// # Errors
    ///
    /// [`GoError::DistanceUnavailable`] if the predicted term is not part
    /// of the branch
    pub fn judge(&self, predicted: GoTermId, known: &GoGroup) -> GoResult<Verdict> {
        let depth = self
            .ctx
            .dag
            .depth(predicted)
            .ok_or(GoError::DistanceUnavailable(predicted))?;
        if depth < self.ctx.depth_cutoff {
            return Ok(Verdict::Excluded);
        }
        if known.is_empty() {
            return Ok(Verdict::Unknown);
        }
        self.judge.judge(&self.ctx, predicted, known)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::distance::IndexPathDistance;
    use crate::fixtures::{self, A, B, C, D};

    fn group(ids: &[u32]) -> GoGroup {
        ids.iter().copied().collect()
    }

    /// `root -> A -> B`
    fn end_to_end() -> GoDag {
        let mut builder = GoDag::builder(crate::Branch::BiologicalProcess);
        builder.add_term(1u32, "GO:0008150", "biological_process");
        builder.add_term(2u32, "GO:A", "A");
        builder.add_term(3u32, "GO:B", "B");
        let mut builder = builder.terms_complete();
        builder.add_parent(1u32, 2u32).unwrap();
        builder.add_parent(2u32, 3u32).unwrap();
        builder.index().unwrap().build()
    }

    #[test]
    fn direct() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let matcher = PredictionMatcher::new(&dag, &distances, 1, DirectMatch);
        let verdict = matcher.judge(C.into(), &group(&[C])).unwrap();
        assert_eq!(verdict.code(), Some(1));
        assert_eq!(verdict.matched(), Some(&group(&[C])));
        assert_eq!(matcher.judge(C.into(), &group(&[])).unwrap().code(), Some(-1));
        assert_eq!(matcher.judge(C.into(), &group(&[D])).unwrap().code(), Some(0));
    }

    #[test]
    fn one_step_excluded_below_cutoff() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let matcher = PredictionMatcher::new(&dag, &distances, 3, OneStepMatch);
        let verdict = matcher.judge(C.into(), &group(&[D])).unwrap();
        assert_eq!(verdict, Verdict::Excluded);
        assert_eq!(verdict.code(), None);
    }

    #[test]
    fn one_step_siblings() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let matcher = PredictionMatcher::new(&dag, &distances, 2, OneStepMatch);
        let verdict = matcher.judge(C.into(), &group(&[D])).unwrap();
        assert!(verdict.is_correct());
        assert_eq!(verdict.ancestors(), Some(&group(&[A])));

        // known terms above the cutoff are ignored
        let verdict = matcher.judge(C.into(), &group(&[B])).unwrap();
        assert_eq!(verdict, Verdict::Wrong);
    }

    #[test]
    fn lca_returns_all_ties() {
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
        let matcher = PredictionMatcher::new(&dag, &distances, 1, CommonAncestorMatch);

        let verdict = matcher.judge(4u32.into(), &group(&[5])).unwrap();
        assert_eq!(verdict.ancestors(), Some(&group(&[2, 3])));
        assert_eq!(verdict.matched(), Some(&group(&[5])));
    }

    #[test]
    fn lca_too_shallow() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let matcher = PredictionMatcher::new(&dag, &distances, 2, CommonAncestorMatch);
        // C and D only share A, which has depth 1
        assert_eq!(matcher.judge(C.into(), &group(&[D])).unwrap(), Verdict::Wrong);
    }

    #[test]
    fn predicted_outside_branch() {
        let dag = fixtures::diamond();
        let distances = IndexPathDistance::new(&dag);
        let matcher = PredictionMatcher::new(&dag, &distances, 1, JudgingPolicy::Direct);
        assert!(matches!(
            matcher.judge(99u32.into(), &group(&[C])),
            Err(GoError::DistanceUnavailable(_))
        ));
    }

    #[test]
    fn end_to_end_policies() {
        let dag = end_to_end();
        let distances = IndexPathDistance::new(&dag);
        let known = group(&[2]);

        let direct = PredictionMatcher::new(&dag, &distances, 1, JudgingPolicy::Direct);
        assert_eq!(direct.judge(3u32.into(), &known).unwrap(), Verdict::Wrong);

        let one_step = PredictionMatcher::new(&dag, &distances, 1, JudgingPolicy::OneStep);
        assert!(one_step.judge(3u32.into(), &known).unwrap().is_correct());

        let lca = PredictionMatcher::new(&dag, &distances, 1, JudgingPolicy::CommonAncestor);
        let verdict = lca.judge(3u32.into(), &known).unwrap();
        assert_eq!(verdict.ancestors(), Some(&group(&[2])));
    }

    #[test]
    fn policy_names() {
        for policy in [
            JudgingPolicy::Direct,
            JudgingPolicy::OneStep,
            JudgingPolicy::CommonAncestor,
        ] {
            assert_eq!(JudgingPolicy::try_from(policy.to_string().as_str()).unwrap(), policy);
        }
    }
}
