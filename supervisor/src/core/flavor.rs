//! Canned progress narration per plan category.

use crate::core::planner::PlanCategory;

/// `(action, details)` pairs narrated while a subtask is in progress.
pub type Narration = (&'static str, &'static str);

const SECURITY: &[Narration] = &[
    ("Scanning source files", "Checking input handling for injection risks"),
    ("Querying advisory database", "Matching dependency versions against known CVEs"),
    ("Inspecting session handling", "Verifying token expiry and rotation"),
    ("Reviewing permission checks", "Tracing privileged code paths"),
    ("Checking secret storage", "Looking for credentials committed to the repository"),
    ("Grading findings", "Ranking issues by severity and exploitability"),
];

const DOCUMENTATION: &[Narration] = &[
    ("Reading public interfaces", "Listing exported types and functions"),
    ("Extracting examples", "Collecting usage from existing tests"),
    ("Drafting overview", "Summarizing purpose and main concepts"),
    ("Cross-referencing sections", "Linking related topics together"),
    ("Checking terminology", "Aligning wording with the glossary"),
    ("Proofreading", "Fixing broken links and typos"),
];

const ANALYSIS: &[Narration] = &[
    ("Reading module structure", "Building a map of files and ownership"),
    ("Tracing call graph", "Following calls across module boundaries"),
    ("Measuring complexity", "Flagging functions with deep nesting"),
    ("Comparing patterns", "Looking for duplicated logic"),
    ("Evaluating error handling", "Checking that failures are propagated"),
    ("Collecting observations", "Grouping findings by impact"),
];

const GENERAL: &[Narration] = &[
    ("Analyzing code structure", "Identifying key components"),
    ("Searching documentation", "Looking up relevant references"),
    ("Processing data", "Transforming intermediate results"),
    ("Running checks", "Validating partial output"),
    ("Consolidating results", "Merging work from previous steps"),
    ("Updating progress", "Recording completed work"),
];

/// Narration pool for a category.
pub fn pool(category: PlanCategory) -> &'static [Narration] {
    match category {
        PlanCategory::Security => SECURITY,
        PlanCategory::Documentation => DOCUMENTATION,
        PlanCategory::Analysis => ANALYSIS,
        PlanCategory::General => GENERAL,
    }
}

/// Monotonic position in a narration pool.
///
/// Once the pool is exhausted the cursor yields nothing more for the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlavorCursor {
    next: usize,
}

impl FlavorCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next narration and advance, or `None` once exhausted.
    pub fn next_in(&mut self, pool: &'static [Narration]) -> Option<Narration> {
        let item = pool.get(self.next).copied()?;
        self.next += 1;
        Some(item)
    }

    pub fn position(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_pool_once_then_stops() {
        let pool = pool(PlanCategory::General);
        let mut cursor = FlavorCursor::new();
        let mut seen = Vec::new();
        while let Some((action, _)) = cursor.next_in(pool) {
            seen.push(action);
        }
        assert_eq!(seen.len(), pool.len());
        assert_eq!(seen[0], "Analyzing code structure");
        assert_eq!(cursor.next_in(pool), None);
        assert_eq!(cursor.position(), pool.len());
    }

    #[test]
    fn every_category_has_narration() {
        for category in [
            PlanCategory::Security,
            PlanCategory::Documentation,
            PlanCategory::Analysis,
            PlanCategory::General,
        ] {
            assert!(!pool(category).is_empty());
        }
    }
}
