use std::collections::{BTreeSet, HashMap};

use crate::config::{MatchMode, RunConfig};
use crate::disjoint_set::DisjointSet;
use crate::error::ClusterError;
use crate::extract::{extract_match_values, FieldRoles};
use crate::model::{
    Assignment, ClusterOutcome, Group, GroupId, Record, RecordKey, RunMeta, RunResult,
};
use crate::summary::compute_summary;

/// Run clustering per config. Returns assignments + summary + run metadata.
pub fn run(
    config: &RunConfig,
    records: &[Record],
    roles: &FieldRoles,
) -> Result<RunResult, ClusterError> {
    config.validate()?;

    if !records.is_empty() && !roles.covers(config.mode) {
        log::warn!(
            "no {} columns found; every record will stay ungrouped",
            config.mode
        );
    }

    let outcome = cluster(records, config.mode, roles);

    Ok(RunResult {
        meta: RunMeta {
            mode: config.mode,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary: outcome.summary,
        groups: outcome.groups,
        assignments: outcome.assignments,
    })
}

/// Group records that share a match value, directly or through a chain of
/// other records.
///
/// Group ids are handed out by scanning records in input order: the first
/// record seen from a component gives that component the next id. Records
/// sharing no value with any other record never enter the forest and get no
/// id.
pub fn cluster(records: &[Record], mode: MatchMode, roles: &FieldRoles) -> ClusterOutcome {
    // value -> keys that produced it, in first-seen order
    let mut value_order: Vec<String> = Vec::new();
    let mut rows_by_value: HashMap<String, Vec<RecordKey>> = HashMap::new();

    for record in records {
        for value in extract_match_values(record, mode, roles) {
            match rows_by_value.get_mut(&value) {
                Some(keys) => keys.push(record.key),
                None => {
                    value_order.push(value.clone());
                    rows_by_value.insert(value, vec![record.key]);
                }
            }
        }
    }

    let mut forest: DisjointSet<RecordKey> = DisjointSet::new();
    let mut merges = 0usize;

    for value in &value_order {
        let keys = &rows_by_value[value];
        if keys.len() < 2 {
            continue;
        }
        for (i, &a) in keys.iter().enumerate() {
            for &b in &keys[i + 1..] {
                if forest.union(a, b) {
                    merges += 1;
                }
            }
        }
    }

    log::debug!(
        "indexed {} distinct values from {} records; {} merges over {} keys",
        value_order.len(),
        records.len(),
        merges,
        forest.len()
    );

    let components = forest.groups();
    let outcome = assign_group_ids(records, &components, &rows_by_value);

    log::info!(
        "{} records clustered into {} groups ({} ungrouped)",
        outcome.summary.total_records,
        outcome.summary.group_count,
        outcome.summary.ungrouped_records
    );

    outcome
}

/// Number components in order of their first record in the input, then
/// attach ids.
fn assign_group_ids(
    records: &[Record],
    components: &[Vec<RecordKey>],
    rows_by_value: &HashMap<String, Vec<RecordKey>>,
) -> ClusterOutcome {
    let mut component_of: HashMap<RecordKey, usize> = HashMap::new();
    for (idx, members) in components.iter().enumerate() {
        for &key in members {
            component_of.insert(key, idx);
        }
    }

    let mut id_of_component: Vec<Option<GroupId>> = vec![None; components.len()];
    let mut groups: Vec<Group> = Vec::with_capacity(components.len());
    let mut assignments = Vec::with_capacity(records.len());

    for record in records {
        let group_id = match component_of.get(&record.key) {
            Some(&component) => {
                let id = match id_of_component[component] {
                    Some(id) => id,
                    None => {
                        let id = GroupId(groups.len() as u32 + 1);
                        id_of_component[component] = Some(id);
                        groups.push(Group {
                            id,
                            members: Vec::new(),
                            shared_values: Vec::new(),
                        });
                        id
                    }
                };
                groups[(id.0 - 1) as usize].members.push(record.key);
                Some(id)
            }
            None => None,
        };

        assignments.push(Assignment {
            key: record.key,
            group_id,
        });
    }

    // Attach the values that actually linked members together.
    let mut shared: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); groups.len()];
    for (value, keys) in rows_by_value {
        if keys.len() < 2 {
            continue;
        }
        let id = component_of
            .get(&keys[0])
            .and_then(|&component| id_of_component[component]);
        if let Some(id) = id {
            shared[(id.0 - 1) as usize].insert(value.as_str());
        }
    }
    for (group, values) in groups.iter_mut().zip(shared) {
        group.shared_values = values.into_iter().map(str::to_string).collect();
    }

    let summary = compute_summary(&assignments, &groups, rows_by_value);

    ClusterOutcome {
        assignments,
        groups,
        summary,
    }
}
