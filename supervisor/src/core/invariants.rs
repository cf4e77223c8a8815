//! Structural invariants every observable agent state must satisfy.

use std::collections::HashSet;

use crate::core::types::{Subtask, SubtaskStatus};
use crate::state::AgentState;

/// Check the plan invariants of `state`:
/// - No duplicate subtask ids
/// - `progress <= 100`, and `progress == 100` exactly when `completed`
/// - `pending` subtasks have not made progress
/// - At most one subtask is `in_progress`
/// - Strict left-to-right order: nothing after the first non-completed
///   subtask has started
pub fn validate_invariants(state: &AgentState) -> Vec<String> {
    validate_subtasks(state.subtasks())
}

/// Same checks as [`validate_invariants`] on a bare subtask list.
pub fn validate_subtasks(subtasks: &[Subtask]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for subtask in subtasks {
        if !seen.insert(subtask.id) {
            errors.push(format!("duplicate subtask id {}", subtask.id));
        }
        if subtask.progress > 100 {
            errors.push(format!(
                "subtask {}: progress {} exceeds 100",
                subtask.id, subtask.progress
            ));
        }
        if (subtask.progress == 100) != subtask.is_completed() {
            errors.push(format!(
                "subtask {}: progress {} disagrees with status {:?}",
                subtask.id, subtask.progress, subtask.status
            ));
        }
        if subtask.status == SubtaskStatus::Pending && subtask.progress != 0 {
            errors.push(format!(
                "subtask {}: pending with progress {}",
                subtask.id, subtask.progress
            ));
        }
    }

    let in_progress = subtasks
        .iter()
        .filter(|s| s.status == SubtaskStatus::InProgress)
        .count();
    if in_progress > 1 {
        errors.push(format!("{} subtasks in progress (max 1)", in_progress));
    }

    if let Some(frontier) = subtasks.iter().position(|s| !s.is_completed()) {
        for later in &subtasks[frontier + 1..] {
            if later.status != SubtaskStatus::Pending {
                errors.push(format!(
                    "subtask {} is {:?} before subtask {} completed",
                    later.id, later.status, subtasks[frontier].id
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::subtask;

    #[test]
    fn fresh_plan_is_valid() {
        let plan = crate::core::planner::plan("anything");
        assert!(validate_subtasks(&plan).is_empty());
    }

    #[test]
    fn reports_out_of_order_progress() {
        let subtasks = vec![
            subtask(1, SubtaskStatus::InProgress, 40),
            subtask(2, SubtaskStatus::Completed, 100),
            subtask(3, SubtaskStatus::InProgress, 10),
        ];
        let errors = validate_subtasks(&subtasks);
        assert!(errors.iter().any(|e| e.contains("2 subtasks in progress")));
        assert!(errors.iter().any(|e| e.contains("subtask 2 is Completed")));
        assert!(errors.iter().any(|e| e.contains("subtask 3 is InProgress")));
    }

    #[test]
    fn reports_progress_status_disagreement() {
        let subtasks = vec![
            subtask(1, SubtaskStatus::Completed, 90),
            subtask(2, SubtaskStatus::InProgress, 100),
            subtask(2, SubtaskStatus::Pending, 5),
        ];
        let errors = validate_subtasks(&subtasks);
        assert!(errors.iter().any(|e| e.contains("subtask 1: progress 90")));
        assert!(errors.iter().any(|e| e.contains("subtask 2: progress 100")));
        assert!(errors.iter().any(|e| e.contains("pending with progress 5")));
        assert!(errors.iter().any(|e| e.contains("duplicate subtask id 2")));
    }
}
