use crate::pipeline::types::{Classification, InferenceOutcome};
use tracing::info;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.8;

pub const NOTHING_FOUND: &str = "Nothing found";
pub const UNRECOGNIZED: &str = "???";

/// Formats the top ranked classification, hedging below `threshold`.
pub fn select(results: &[Classification], threshold: f32) -> String {
    let Some(top) = results.first() else {
        return NOTHING_FOUND.to_string();
    };
    if top.confidence < threshold {
        format!("It is {}? Not sure", top.label)
    } else {
        info!(label = %top.label, confidence = top.confidence, "Confident classification");
        format!("{} - {:.1}%", top.label, top.confidence * 100.0)
    }
}

/// The single display line a classifier invocation contributes.
pub fn describe(outcome: &InferenceOutcome, threshold: f32) -> String {
    match outcome {
        InferenceOutcome::Results(results) => select(results, threshold),
        InferenceOutcome::Failed(description) => format!("Error: {description}"),
        InferenceOutcome::Unrecognized => UNRECOGNIZED.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultSelector {
    threshold: f32,
}

impl Default for ResultSelector {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl ResultSelector {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn describe(&self, outcome: &InferenceOutcome) -> String {
        describe(outcome, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(entries: &[(&str, f32)]) -> Vec<Classification> {
        entries
            .iter()
            .map(|(label, confidence)| Classification::new(*label, *confidence))
            .collect()
    }

    #[test]
    fn test_empty_results_are_nothing_found() {
        for threshold in [0.0, 0.5, 0.8, 1.0] {
            assert_eq!(select(&[], threshold), "Nothing found");
        }
    }

    #[test]
    fn test_confident_result() {
        assert_eq!(select(&ranked(&[("apple", 0.95)]), 0.8), "apple - 95.0%");
        assert_eq!(select(&ranked(&[("carrot", 0.92)]), 0.8), "carrot - 92.0%");
    }

    #[test]
    fn test_hedged_result() {
        assert_eq!(select(&ranked(&[("apple", 0.5)]), 0.8), "It is apple? Not sure");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(select(&ranked(&[("banana", 0.8)]), 0.8), "banana - 80.0%");
    }

    #[test]
    fn test_only_the_top_entry_counts() {
        let results = ranked(&[("healthy", 0.61), ("unhealthy", 0.39)]);
        assert_eq!(select(&results, 0.8), "It is healthy? Not sure");
    }

    #[test]
    fn test_describe_failed_and_unrecognized() {
        let selector = ResultSelector::default();
        assert_eq!(
            selector.describe(&InferenceOutcome::Failed("network unavailable".to_string())),
            "Error: network unavailable"
        );
        assert_eq!(selector.describe(&InferenceOutcome::Unrecognized), "???");
        assert_eq!(
            selector.describe(&InferenceOutcome::Results(vec![])),
            "Nothing found"
        );
    }
}
