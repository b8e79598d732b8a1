//! Snapshot adapter.
//!
//! Turns the registry's live counters into owned, immutable metric families.
//! Nothing here mutates the registry, so any number of scrapes may build
//! snapshots concurrently with the increment path.

use std::fmt;

use crate::descriptor::{
    MetricDesc, MetricKind, BYTES_RECEIVED, ERRORS_TOTAL, REQUESTS_TOTAL, UPLOADS_CREATED,
    UPLOADS_FINISHED, UPLOADS_TERMINATED,
};
use crate::error::{MetricsError, Result};
use crate::registry::CounterRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Counter(u64),
    Gauge(i64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Counter(v) => write!(f, "{v}"),
            MetricValue::Gauge(v) => write!(f, "{v}"),
        }
    }
}

/// One labeled observation. Label values line up with the family's
/// `MetricDesc::labels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRecord {
    pub label_values: Vec<String>,
    pub value: MetricValue,
}

/// A named family and its records.
///
/// Records can only be added through [`MetricFamily::push`], which checks
/// label arity against the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFamily {
    desc: MetricDesc,
    records: Vec<MetricRecord>,
}

impl MetricFamily {
    pub fn new(desc: MetricDesc) -> Self {
        Self {
            desc,
            records: Vec::new(),
        }
    }

    /// Append a record, checking label arity against the descriptor.
    pub fn push(&mut self, label_values: Vec<String>, value: MetricValue) -> Result<()> {
        if label_values.len() != self.desc.labels.len() {
            return Err(MetricsError::LabelMismatch {
                family: self.desc.name.to_string(),
                expected: self.desc.labels.len(),
                got: label_values.len(),
            });
        }
        self.records.push(MetricRecord {
            label_values,
            value,
        });
        Ok(())
    }

    pub fn desc(&self) -> &MetricDesc {
        &self.desc
    }

    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    pub fn kind(&self) -> MetricKind {
        self.desc.kind
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// Record pairs as (label name, label value).
    pub fn labels<'a>(
        &'a self,
        record: &'a MetricRecord,
    ) -> impl Iterator<Item = (&'static str, &'a str)> + 'a {
        self.desc
            .labels
            .iter()
            .copied()
            .zip(record.label_values.iter().map(String::as_str))
    }
}

/// Immutable point-in-time capture of all exported families.
///
/// Family names are unique within a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    families: Vec<MetricFamily>,
}

impl Snapshot {
    /// Add a family, e.g. a gauge owned outside the registry.
    /// A name already present is rejected with `DuplicateDescriptor`.
    pub fn push_family(&mut self, family: MetricFamily) -> Result<()> {
        if self.family(family.name()).is_some() {
            return Err(MetricsError::DuplicateDescriptor(family.name().to_string()));
        }
        self.families.push(family);
        Ok(())
    }

    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.iter().find(|f| f.name() == name)
    }

    /// Total number of records across families.
    pub fn record_count(&self) -> usize {
        self.families.iter().map(|f| f.records.len()).sum()
    }
}

/// Build a snapshot of every registry family, tagging each record with
/// `process_label`.
///
/// Fails only if the family descriptors disagree with the records built
/// here, i.e. on a programming error.
pub fn build_snapshot(registry: &CounterRegistry, process_label: &str) -> Result<Snapshot> {
    let values = registry.read_all();
    let host = || process_label.to_string();

    let mut requests = MetricFamily::new(REQUESTS_TOTAL);
    for (method, v) in values.requests {
        requests.push(vec![method, host()], MetricValue::Counter(v))?;
    }

    let mut errors = MetricFamily::new(ERRORS_TOTAL);
    for (key, v) in values.errors {
        errors.push(
            vec![key.status.to_string(), key.code, host()],
            MetricValue::Counter(v),
        )?;
    }

    let single = |desc: MetricDesc, v: u64| -> Result<MetricFamily> {
        let mut family = MetricFamily::new(desc);
        family.push(vec![host()], MetricValue::Counter(v))?;
        Ok(family)
    };

    let mut snapshot = Snapshot::default();
    snapshot.push_family(requests)?;
    snapshot.push_family(errors)?;
    snapshot.push_family(single(BYTES_RECEIVED, values.bytes_received)?)?;
    snapshot.push_family(single(UPLOADS_FINISHED, values.uploads_finished)?)?;
    snapshot.push_family(single(UPLOADS_CREATED, values.uploads_created)?)?;
    snapshot.push_family(single(UPLOADS_TERMINATED, values.uploads_terminated)?)?;
    Ok(snapshot)
}
