use chrono::{DateTime, SecondsFormat, Utc};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::types::BatchReport;

const RULE_WIDTH: usize = 156;

/// A full-width rule with `title` centred in it.
pub fn titled_rule(title: &str) -> String {
    let fill = RULE_WIDTH.saturating_sub(title.chars().count());
    let left = fill / 2;
    format!("{}{}{}", "=".repeat(left), title, "=".repeat(fill - left))
}

fn dim(s: &str) -> String {
    s.if_supports_color(Stream::Stdout, |s| s.dimmed())
        .to_string()
}

fn millis(report: &BatchReport, value: u64) -> String {
    if report.succeeded == 0 {
        "n/a".to_string()
    } else {
        format!("{} ms", value)
    }
}

/// Human-readable banner for one batch.
pub fn format_batch(index: &str, report: &BatchReport) -> String {
    let mut out = String::new();

    out.push_str("\n\n");
    out.push_str(&dim(&titled_rule("Result")));
    out.push('\n');
    out.push_str(&dim(&titled_rule("")));
    out.push_str("\n\n");

    out.push_str(&format!("Request Number: {}\n", report.requested));
    out.push_str(&format!(
        "[Index: {}] Average Time: {}\n",
        index,
        millis(report, report.summary.avg)
    ));
    out.push_str(&format!(
        "[Index: {}] Minimum Search Time: {}\n",
        index,
        millis(report, report.summary.min)
    ));
    out.push_str(&format!(
        "[Index: {}] Maximum Time: {}\n",
        index,
        millis(report, report.summary.max)
    ));
    if report.failed > 0 {
        let line = format!("[Index: {}] Failed Requests: {}", index, report.failed);
        out.push_str(
            &line
                .if_supports_color(Stream::Stdout, |s| s.yellow())
                .to_string(),
        );
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&dim(&titled_rule("")));
    out.push('\n');

    out
}

/// Closing banner printed once the loop is done.
pub fn format_finish() -> String {
    format!("\n\n{}\n", dim(&titled_rule("Finish")))
}

#[derive(Serialize)]
struct JsonBatch<'a> {
    round: u32,
    index: &'a str,
    requested: usize,
    succeeded: usize,
    failed: usize,
    min_ms: Option<u64>,
    max_ms: Option<u64>,
    avg_ms: Option<u64>,
    recorded_at: String,
}

/// One compact JSON object per batch. Statistics are `null` when no
/// request in the batch succeeded.
pub fn format_json_batch(
    round: u32,
    index: &str,
    report: &BatchReport,
    now: DateTime<Utc>,
) -> String {
    let measured = report.succeeded > 0;
    let batch = JsonBatch {
        round,
        index,
        requested: report.requested,
        succeeded: report.succeeded,
        failed: report.failed,
        min_ms: measured.then_some(report.summary.min),
        max_ms: measured.then_some(report.summary.max),
        avg_ms: measured.then_some(report.summary.avg),
        recorded_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let mut line = serde_json::to_string(&batch).unwrap_or_else(|_| "{}".to_string());
    line.push('\n');
    line
}

/// Single-shot mode prints the cluster's answer untouched.
pub fn format_single_shot(body: &str) -> String {
    format!("{}\n", body)
}
