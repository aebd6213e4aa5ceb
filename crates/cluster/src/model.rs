use serde::Serialize;

use crate::config::MatchMode;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Opaque per-run handle for a record. Assigned by the loader (row index);
/// never derived from field content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordKey(pub usize);

/// A single normalized row: ordered field name → value.
///
/// `None` means the cell was absent (short row); `Some("")` means it was
/// present but empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: RecordKey,
    pub fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new(key: RecordKey) -> Self {
        Self {
            key,
            fields: Vec::new(),
        }
    }

    /// Builder-style field append, mostly for tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.fields.push((name.into(), value.map(str::to_string)));
        self
    }

    /// Value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Sequential group identifier, starting at 1. Only stable within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub key: RecordKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

/// A connected component of records linked by shared match values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    /// Member keys in input order.
    pub members: Vec<RecordKey>,
    /// Values held by at least two members, sorted.
    pub shared_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub total_records: usize,
    pub grouped_records: usize,
    pub ungrouped_records: usize,
    pub group_count: usize,
    pub largest_group: usize,
    /// Distinct match values seen across all records.
    pub distinct_values: usize,
    /// Distinct match values held by two or more records.
    pub shared_values: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterOutcome {
    /// One entry per input record, in input order.
    pub assignments: Vec<Assignment>,
    /// Groups ordered by id.
    pub groups: Vec<Group>,
    pub summary: ClusterSummary,
}

impl ClusterOutcome {
    /// Group of `key`. O(1) when keys are row indexes (as the CSV loader
    /// assigns them), otherwise falls back to a scan.
    pub fn group_of(&self, key: RecordKey) -> Option<GroupId> {
        match self.assignments.get(key.0) {
            Some(a) if a.key == key => a.group_id,
            _ => self
                .assignments
                .iter()
                .find(|a| a.key == key)
                .and_then(|a| a.group_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Run result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub mode: MatchMode,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub meta: RunMeta,
    pub summary: ClusterSummary,
    pub groups: Vec<Group>,
    pub assignments: Vec<Assignment>,
}
