//! Batch analysis: normalize, validate, score, rank.
//!
//! The pipeline for one batch is:
//!
//! 1. normalize every raw task (never fails)
//! 2. build the title lookup and the dependency graph
//! 3. reject the batch if the graph has a cycle
//! 4. score each task against the shared lookup
//! 5. sort by descending score, keeping input order for ties

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::scoring::{score_task, Breakdown, Priority, ScoringOptions, Strategy};
use crate::task::{normalize, Normalized, RawTask, Task, TaskLookup};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// A normalized task with its score attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    pub score: u8,
    pub priority: Priority,
    pub breakdown: Breakdown,
}

/// Outcome of analyzing a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// Tasks sorted by descending score.
    Ranked(Vec<ScoredTask>),
    /// The batch was not scored; `cycle` is one offending closed path.
    CycleDetected { cycle: Vec<String> },
}

impl Analysis {
    pub fn is_cycle(&self) -> bool {
        matches!(self, Analysis::CycleDetected { .. })
    }

    pub fn ranked(&self) -> Option<&[ScoredTask]> {
        match self {
            Analysis::Ranked(tasks) => Some(tasks),
            Analysis::CycleDetected { .. } => None,
        }
    }
}

/// Top picks from a previously analyzed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub strategy: Strategy,
    pub suggestions: Vec<ScoredTask>,
    pub cycles: bool,
}

pub fn normalize_batch(raw: &[RawTask]) -> Vec<Normalized> {
    raw.iter().map(normalize).collect()
}

/// Normalize and analyze a raw batch.
pub fn analyze(raw: &[RawTask], options: &ScoringOptions, today: NaiveDate) -> Analysis {
    analyze_normalized(&normalize_batch(raw), options, today)
}

/// Analyze an already normalized batch.
pub fn analyze_normalized(
    tasks: &[Normalized],
    options: &ScoringOptions,
    today: NaiveDate,
) -> Analysis {
    tracing::debug!(tasks = tasks.len(), strategy = %options.strategy, "analyzing batch");

    let graph = DependencyGraph::from_tasks(tasks.iter().map(|normalized| &normalized.task));
    if let Some(cycle) = graph.find_cycle() {
        tracing::warn!(cycle = %cycle.join(" -> "), "rejecting batch with circular dependencies");
        return Analysis::CycleDetected { cycle };
    }

    Analysis::Ranked(rank(tasks, options, today))
}

/// Score and sort without validating the dependency graph.
pub fn rank(tasks: &[Normalized], options: &ScoringOptions, today: NaiveDate) -> Vec<ScoredTask> {
    let lookup = TaskLookup::from_tasks(tasks.iter().map(|normalized| &normalized.task));

    let mut scored: Vec<ScoredTask> = tasks
        .iter()
        .map(|normalized| {
            let score = score_task(normalized, &lookup, options, today);
            ScoredTask {
                task: normalized.task.clone(),
                score: score.score,
                priority: score.priority,
                breakdown: score.breakdown,
            }
        })
        .collect();

    // Stable: equal scores keep input order.
    scored.sort_by(|left, right| right.score.cmp(&left.score));
    scored
}

/// Re-score a stored batch and keep the top `limit` tasks.
///
/// Unlike [`analyze_normalized`], a cycle does not block the answer; it is
/// reported through [`Suggestions::cycles`].
pub fn suggest(
    tasks: &[Normalized],
    options: &ScoringOptions,
    today: NaiveDate,
    limit: usize,
) -> Suggestions {
    let graph = DependencyGraph::from_tasks(tasks.iter().map(|normalized| &normalized.task));
    let cycles = graph.has_cycle();

    let mut ranked = rank(tasks, options, today);
    ranked.truncate(limit);

    Suggestions {
        strategy: options.strategy,
        suggestions: ranked,
        cycles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WeightOverride;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn iso(days: i64) -> String {
        (today() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn titles(tasks: &[ScoredTask]) -> Vec<&str> {
        tasks.iter().map(|task| task.task.title.as_str()).collect()
    }

    #[test]
    fn ranks_by_descending_score() {
        let raw = vec![
            RawTask::new("later")
                .due_date(iso(30))
                .estimated_hours(8)
                .importance(3),
            RawTask::new("A")
                .due_date(iso(0))
                .estimated_hours(1)
                .importance(8),
            RawTask::new("B")
                .due_date(iso(3))
                .estimated_hours(4)
                .importance(6)
                .dependencies(["A"]),
        ];

        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        let ranked = analysis.ranked().expect("ranked");
        // A: 116 -> 100, B: 34 + 36 + 12 + 6 = 88, later: 0 + 18 + 4 = 22
        assert_eq!(titles(ranked), vec!["A", "B", "later"]);
        assert_eq!(ranked[0].score, 100);
        assert_eq!(ranked[1].score, 88);
        assert_eq!(ranked[1].breakdown.dependency_raw, 3);
        assert_eq!(ranked[2].score, 22);
        assert_eq!(ranked[2].priority, Priority::Low);
    }

    #[test]
    fn ties_keep_input_order() {
        let raw = vec![
            RawTask::new("first"),
            RawTask::new("second"),
            RawTask::new("third"),
        ];
        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        assert_eq!(
            titles(analysis.ranked().unwrap()),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn cyclic_batch_is_not_scored() {
        let raw = vec![
            RawTask::new("A").dependencies(["B"]),
            RawTask::new("B").dependencies(["A"]),
        ];
        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        assert!(analysis.is_cycle());
        assert!(analysis.ranked().is_none());
        assert_eq!(
            analysis,
            Analysis::CycleDetected {
                cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()]
            }
        );
    }

    #[test]
    fn self_dependency_rejects_batch() {
        let raw = vec![RawTask::new("solo").dependencies(["solo"])];
        assert!(analyze(&raw, &ScoringOptions::default(), today()).is_cycle());
    }

    #[test]
    fn dangling_dependencies_are_neither_errors_nor_points() {
        let raw = vec![RawTask::new("A").dependencies(["nowhere"])];
        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        let ranked = analysis.ranked().expect("ranked");
        assert_eq!(ranked[0].breakdown.dependency_raw, 0);
    }

    #[test]
    fn numeric_dependency_entries_resolve_to_titles() {
        let mut blocked = RawTask::new("A");
        blocked.dependencies = Some(serde_json::json!([3]));
        let raw = vec![RawTask::new("3"), blocked];

        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        let ranked = analysis.ranked().expect("ranked");
        let blocked = ranked
            .iter()
            .find(|scored| scored.task.title == "A")
            .expect("A");
        assert_eq!(blocked.breakdown.dependency_raw, 3);

        let mut first = RawTask::new("1");
        first.dependencies = Some(serde_json::json!([2]));
        let mut second = RawTask::new("2");
        second.dependencies = Some(serde_json::json!([1]));
        assert!(analyze(&[first, second], &ScoringOptions::default(), today()).is_cycle());
    }

    #[test]
    fn dirty_input_still_scores() {
        let dirty = RawTask::new("X")
            .due_date("not-a-date")
            .importance("nope")
            .estimated_hours("nope");
        let analysis = analyze(&[dirty], &ScoringOptions::default(), today());
        let task = &analysis.ranked().unwrap()[0];
        assert_eq!(task.task.due_date, None);
        assert_eq!(task.task.importance, 5);
        assert_eq!(task.task.estimated_hours, 1.0);
        assert_eq!(task.breakdown.notes.len(), 3);
        // 10*3 + 9*2
        assert_eq!(task.score, 48);
    }

    #[test]
    fn overrides_flow_through_the_pipeline() {
        let raw = vec![RawTask::new("quick").estimated_hours(0).importance(1)];
        let options = ScoringOptions::new(Strategy::Fastest).with_overrides(WeightOverride {
            e: Some(0.0),
            ..WeightOverride::default()
        });
        let analysis = analyze(&raw, &options, today());
        let task = &analysis.ranked().unwrap()[0];
        assert_eq!(task.breakdown.weights.e, 0.0);
        assert_eq!(task.score, 2);
    }

    #[test]
    fn suggest_keeps_top_three_and_flags_cycles() {
        let tasks = normalize_batch(&[
            RawTask::new("a").importance(1),
            RawTask::new("b").importance(9),
            RawTask::new("c").importance(5),
            RawTask::new("d").importance(7),
        ]);
        let picks = suggest(
            &tasks,
            &ScoringOptions::new(Strategy::Impact),
            today(),
            DEFAULT_SUGGESTION_LIMIT,
        );
        assert_eq!(titles(&picks.suggestions), vec!["b", "d", "c"]);
        assert!(!picks.cycles);
        assert_eq!(picks.strategy, Strategy::Impact);

        let cyclic = normalize_batch(&[
            RawTask::new("x").dependencies(["y"]),
            RawTask::new("y").dependencies(["x"]),
        ]);
        let picks = suggest(&cyclic, &ScoringOptions::default(), today(), 1);
        assert!(picks.cycles);
        assert_eq!(picks.suggestions.len(), 1);
    }

    #[test]
    fn scored_task_flattens_task_fields() {
        let raw = vec![RawTask::new("A").due_date(iso(2))];
        let analysis = analyze(&raw, &ScoringOptions::default(), today());
        let value = serde_json::to_value(&analysis.ranked().unwrap()[0]).unwrap();
        assert_eq!(value["title"], "A");
        assert_eq!(value["due_date"], iso(2));
        assert_eq!(value["priority"], "High");
        assert!(value["breakdown"]["explanation"].is_string());
    }
}
