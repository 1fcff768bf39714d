//! Evaluate command implementation

use crate::cli::EvaluateArgs;
use crate::config_loader::{load_categories, load_config_with_overrides};
use crate::errors;
use crate::export;
use crate::output::OutputWriter;
use crate::output_types::EvaluateOutput;
use anyhow::{Context, Result};
use placeguide_core::config::CliConfigOverrides;
use placeguide_core::models::Candidate;
use placeguide_quality::{BatchReport, QualityPipeline};
use std::fs;
use std::path::Path;
use tabled::Tabled;

pub fn execute(args: EvaluateArgs, output: &OutputWriter, explain: bool) -> Result<()> {
    let overrides = CliConfigOverrides {
        cluster_threshold_meters: args.threshold,
        anchor: args.anchor,
        categories_path: args.categories.clone(),
        error_policy: args.error_policy.map(Into::into),
    };
    let config = load_config_with_overrides(args.config.as_deref(), overrides)?;

    let categories = load_categories(&config)?;
    let candidates = load_candidates(&args.input)?;

    let pipeline = QualityPipeline::from_config(&config, categories)?.with_explain(explain);
    let report = pipeline.run(&candidates)?;

    if let Some(path) = &args.geojson {
        export::write_groups(path, &report.groups)?;
    }

    if output.is_json() {
        output.result(EvaluateOutput {
            input: args.input.display().to_string(),
            anchor: pipeline.anchor(),
            threshold_meters: pipeline.threshold_meters(),
            error_policy: pipeline.error_policy(),
            evaluated_at: chrono::Utc::now(),
            geojson: args.geojson.as_ref().map(|p| p.display().to_string()),
            report: &report,
        })?;
    } else {
        render_report(&report, output);

        if let Some(path) = &args.geojson {
            output.success(format!(
                "Wrote {} group(s) to {}",
                report.groups.len(),
                path.display()
            ));
        }
    }

    Ok(())
}

/// Read a JSON array of candidates
fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates from {}", path.display()))?;

    let candidates: Vec<Candidate> = serde_json::from_str(&content)
        .map_err(|e| errors::invalid_candidates(path, &e.to_string()))?;

    tracing::debug!(path = %path.display(), count = candidates.len(), "Loaded candidates");
    Ok(candidates)
}

fn render_report(report: &BatchReport, output: &OutputWriter) {
    #[derive(Tabled)]
    struct VerdictRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Verdict")]
        verdict: String,
    }

    #[derive(Tabled)]
    struct GroupRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Size")]
        size: usize,
        #[tabled(rename = "Centroid")]
        centroid: String,
        #[tabled(rename = "Members")]
        members: String,
    }

    #[derive(Tabled)]
    struct TraceRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Distance (m)")]
        distance: String,
        #[tabled(rename = "Walk (min)")]
        walking: String,
        #[tabled(rename = "Signals")]
        signals: String,
        #[tabled(rename = "Failed checks")]
        failed: String,
    }

    output.section("Verdicts");
    output.table(
        report
            .verdicts
            .iter()
            .map(|v| VerdictRow {
                id: v.candidate_id.clone(),
                name: v.name.clone(),
                category: v.category.to_string(),
                verdict: v.verdict.to_string(),
            })
            .collect(),
    );

    if report.has_failures() {
        output.section("Skipped");
        for failure in &report.failures {
            output.warning(failure);
        }
    }

    if let Some(traces) = &report.explanations {
        output.section("Check Trace");
        output.table(
            traces
                .iter()
                .map(|t| TraceRow {
                    id: t.candidate_id.clone(),
                    distance: format!("{:.1}", t.distance_meters),
                    walking: format!("{:.1}", t.walking_minutes),
                    signals: format!("{}/{}", t.signal_count, t.required_signals),
                    failed: if t.failed_checks.is_empty() {
                        "-".to_string()
                    } else {
                        t.failed_checks.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
                    },
                })
                .collect(),
        );
    }

    output.section("Nearby Groups");
    output.table(
        report
            .groups
            .iter()
            .enumerate()
            .map(|(index, g)| GroupRow {
                index,
                size: g.size(),
                centroid: g.centroid().to_string(),
                members: g.member_ids().collect::<Vec<_>>().join(", "),
            })
            .collect(),
    );

    let stats = &report.stats;
    output.section("Statistics");
    output.kv("Evaluated", stats.total_evaluated);
    output.kv("Accepted", stats.total_accepted);
    output.kv("Rejected", stats.total_rejected);
    for (reason, count) in &stats.rejections {
        output.kv(format!("  {}", reason), count);
    }
    output.kv("Acceptance rate", format!("{:.1}%", stats.acceptance_rate * 100.0));
    output.kv("Groups", stats.group_count);
    output.kv("Multi-member groups", stats.multi_member_groups);
    output.kv("Largest group", stats.largest_group_size);
}
