//! Hook invocation and error counters.
//!
//! Hooks run outside the upload counters' lifecycle, so they are kept here
//! and merged into the snapshot as separate families.

use upmetrics_core::error::Result;
use upmetrics_core::{CounterGroup, MetricDesc, MetricFamily, MetricKind, MetricValue};

pub const HOOK_INVOCATIONS_TOTAL: MetricDesc = MetricDesc {
    name: "tusd_hook_invocations_total",
    help: "Total number of invocations per hook type.",
    kind: MetricKind::Counter,
    labels: &["hooktype"],
};

pub const HOOK_ERRORS_TOTAL: MetricDesc = MetricDesc {
    name: "tusd_hook_errors_total",
    help: "Total number of execution errors per hook type.",
    kind: MetricKind::Counter,
    labels: &["hooktype"],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookType {
    PreCreate,
    PostCreate,
    PostReceive,
    PreFinish,
    PostFinish,
    PreTerminate,
    PostTerminate,
}

impl HookType {
    pub fn as_str(self) -> &'static str {
        match self {
            HookType::PreCreate => "pre-create",
            HookType::PostCreate => "post-create",
            HookType::PostReceive => "post-receive",
            HookType::PreFinish => "pre-finish",
            HookType::PostFinish => "post-finish",
            HookType::PreTerminate => "pre-terminate",
            HookType::PostTerminate => "post-terminate",
        }
    }
}

#[derive(Default)]
pub struct HookMetrics {
    invocations: CounterGroup<HookType>,
    errors: CounterGroup<HookType>,
}

impl HookMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_invocation(&self, hook: HookType) {
        self.invocations.inc(&hook);
    }

    pub fn record_error(&self, hook: HookType) {
        self.errors.inc(&hook);
    }

    pub fn families(&self) -> Result<[MetricFamily; 2]> {
        Ok([
            family(HOOK_INVOCATIONS_TOTAL, &self.invocations)?,
            family(HOOK_ERRORS_TOTAL, &self.errors)?,
        ])
    }
}

fn family(desc: MetricDesc, group: &CounterGroup<HookType>) -> Result<MetricFamily> {
    let mut values = group.values();
    values.sort();

    let mut family = MetricFamily::new(desc);
    for (hook, v) in values {
        family.push(vec![hook.as_str().to_string()], MetricValue::Counter(v))?;
    }
    Ok(family)
}
