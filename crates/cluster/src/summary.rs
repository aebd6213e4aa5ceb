use std::collections::HashMap;

use crate::model::{Assignment, ClusterSummary, Group, RecordKey};

/// Compute summary statistics from assignments and groups.
pub fn compute_summary(
    assignments: &[Assignment],
    groups: &[Group],
    rows_by_value: &HashMap<String, Vec<RecordKey>>,
) -> ClusterSummary {
    let grouped_records = assignments.iter().filter(|a| a.group_id.is_some()).count();
    let largest_group = groups.iter().map(|g| g.members.len()).max().unwrap_or(0);
    let shared_values = rows_by_value.values().filter(|keys| keys.len() > 1).count();

    ClusterSummary {
        total_records: assignments.len(),
        grouped_records,
        ungrouped_records: assignments.len() - grouped_records,
        group_count: groups.len(),
        largest_group,
        distinct_values: rows_by_value.len(),
        shared_values,
    }
}
