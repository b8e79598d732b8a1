//! Prometheus text exposition (format 0.0.4).

use std::fmt::Write;

use upmetrics_core::{MetricFamily, Snapshot};

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render every non-empty family of the snapshot.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for family in snapshot.families() {
        render_family(family, &mut out);
    }
    out
}

fn render_family(family: &MetricFamily, out: &mut String) {
    if family.records().is_empty() {
        return;
    }

    let name = family.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(family.desc().help));
    let _ = writeln!(out, "# TYPE {} {}", name, family.kind().as_str());

    for record in family.records() {
        let label_str = family
            .labels(record)
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",");
        if label_str.is_empty() {
            let _ = writeln!(out, "{} {}", name, record.value);
        } else {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, record.value);
        }
    }
}
