//! Goal decomposition into a fixed four-step plan.
//!
//! Planning is a pure keyword lookup: the goal is classified into a
//! [`PlanCategory`] and the category's template is instantiated. The goal text
//! is substituted into the first step only.

use serde::{Deserialize, Serialize};

use crate::core::types::Subtask;

/// Number of subtasks every plan contains.
pub const PLAN_LEN: usize = 4;

/// Template family selected from the goal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanCategory {
    Security,
    Documentation,
    Analysis,
    #[default]
    General,
}

/// Word prefixes per category, checked in declaration order.
const KEYWORDS: &[(PlanCategory, &[&str])] = &[
    (PlanCategory::Security, &["security", "secure", "audit", "vulnerab"]),
    (PlanCategory::Documentation, &["document", "docs", "spec", "readme"]),
    (PlanCategory::Analysis, &["analy", "review", "inspect"]),
];

/// Classify a goal by the first category whose keyword starts any word of it.
///
/// Matching is case-insensitive and word-anchored, so "inspect" does not match
/// the documentation keyword "spec".
pub fn classify(goal: &str) -> PlanCategory {
    let lowered = goal.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    for (category, prefixes) in KEYWORDS {
        let hit = words
            .iter()
            .any(|word| prefixes.iter().any(|prefix| word.starts_with(prefix)));
        if hit {
            return *category;
        }
    }
    PlanCategory::General
}

/// Build the ordered plan for `goal`.
///
/// Always succeeds, including for an empty goal. Every subtask starts
/// `pending` at progress 0 with ids `1..=4`.
pub fn plan(goal: &str) -> Vec<Subtask> {
    plan_for(classify(goal), goal)
}

/// Instantiate the template of an already-classified goal.
pub fn plan_for(category: PlanCategory, goal: &str) -> Vec<Subtask> {
    let [first, rest @ ..] = template(category);
    let mut descriptions = Vec::with_capacity(PLAN_LEN);
    descriptions.push(format!("{}{}", first, goal));
    descriptions.extend(rest.iter().map(|step| step.to_string()));

    descriptions
        .into_iter()
        .enumerate()
        .map(|(idx, description)| Subtask::pending(idx as u32 + 1, description))
        .collect()
}

/// Step texts; the first entry is a prefix completed with the goal.
fn template(category: PlanCategory) -> [&'static str; PLAN_LEN] {
    match category {
        PlanCategory::Security => [
            "Scan for security risks in: ",
            "Check dependencies for known vulnerabilities",
            "Audit authentication and access controls",
            "Compile security findings report",
        ],
        PlanCategory::Documentation => [
            "Outline documentation structure for: ",
            "Collect interfaces and usage examples",
            "Draft documentation sections",
            "Review documentation for accuracy",
        ],
        PlanCategory::Analysis => [
            "Define review scope for: ",
            "Map dependencies and data flow",
            "Identify issues and improvement areas",
            "Summarize findings and recommendations",
        ],
        PlanCategory::General => [
            "Analyze requirements for: ",
            "Gather necessary resources",
            "Execute main task",
            "Verify results",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SubtaskStatus;

    #[test]
    fn every_plan_has_four_pending_steps_in_order() {
        for goal in ["", "Audit the payment flow", "Write the README", "anything"] {
            let steps = plan(goal);
            assert_eq!(steps.len(), PLAN_LEN, "goal {:?}", goal);
            let ids: Vec<u32> = steps.iter().map(|s| s.id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4]);
            assert!(
                steps
                    .iter()
                    .all(|s| s.status == SubtaskStatus::Pending && s.progress == 0)
            );
        }
    }

    #[test]
    fn review_goal_selects_analysis_template() {
        let goal = "Review the auth module";
        assert_eq!(classify(goal), PlanCategory::Analysis);
        let steps = plan(goal);
        assert!(steps[0].description.contains(goal));
        assert_eq!(steps[1].description, "Map dependencies and data flow");
    }

    #[test]
    fn security_wins_over_later_categories() {
        assert_eq!(
            classify("Review and audit the login code"),
            PlanCategory::Security
        );
        assert_eq!(
            classify("Document the SECURITY model"),
            PlanCategory::Security
        );
    }

    #[test]
    fn keywords_are_word_anchored() {
        assert_eq!(classify("Inspect the cache"), PlanCategory::Analysis);
        assert_eq!(classify("Write docs for the cache"), PlanCategory::Documentation);
        assert_eq!(classify("Respect the deadline"), PlanCategory::General);
    }

    #[test]
    fn compound_words_do_not_match_inner_keywords() {
        assert_eq!(
            classify("Review the cybersecurity posture"),
            PlanCategory::Analysis
        );
        assert_eq!(classify("Update the codedocs"), PlanCategory::General);
        assert_eq!(classify("Security-review the API"), PlanCategory::Security);
    }

    #[test]
    fn empty_goal_falls_back_to_general() {
        assert_eq!(classify(""), PlanCategory::General);
        let steps = plan("");
        assert_eq!(steps[0].description, "Analyze requirements for: ");
    }
}
