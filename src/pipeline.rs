//! pipeline.rs — per-participant orchestration and the batch driver.
//!
//! Each participant is one independent computation: gaze tier in,
//! transition CSV + graph + recurrence plots out. A participant that
//! fails (unreadable TextGrid, coding-scheme mismatch) is skipped with a
//! logged error; the batch carries on.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::core::align::{align, AlignedSample};
use crate::core::dedup::collapse_runs_composite;
use crate::core::rqa::{RecurrenceMatrix, RqaParams, RqaSummary};
use crate::core::tier::IntervalTier;
use crate::core::transitions::{
    analyze_transitions, relative_frequencies, CategoryFilter,
};
use crate::error::{AnalysisError, Result};
use crate::plot::recplot::{annotate_recurrence_plot, render_recurrence_plot, AnnotationOptions};
use crate::report::csv::{pattern_matrix_csv, rqa_results_csv};
use crate::report::graph::TransitionGraph;
use crate::textgrid::read_textgrid;

const CSV_DIR: &str = "csv";
const GRAPH_DIR: &str = "graphs";
const RECURRENCE_DIR: &str = "recPlots";

/// One participant's input files, joined by id across the two tier
/// directories.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub id: String,
    pub gaze_path: PathBuf,
    pub question_path: PathBuf,
}

/// Extract participant ids from TextGrid filenames in both directories
/// and pair them up. Gaze tiers without a think/answer counterpart are
/// reported and dropped.
pub fn discover_participants(gaze_dir: &Path, question_dir: &Path) -> Result<Vec<Participant>> {
    let pattern = Regex::new(r"(\d*_*vp\d*)_.*\.TextGrid$").expect("valid participant pattern");

    let index = |dir: &Path| -> Result<BTreeMap<String, PathBuf>> {
        let mut found = BTreeMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(captures) = pattern.captures(name) {
                found.insert(captures[1].to_string(), path.clone());
            }
        }
        Ok(found)
    };

    let gaze_files = index(gaze_dir)?;
    let mut question_files = index(question_dir)?;

    let mut participants = Vec::with_capacity(gaze_files.len());
    for (id, gaze_path) in gaze_files {
        match question_files.remove(&id) {
            Some(question_path) => participants.push(Participant {
                id,
                gaze_path,
                question_path,
            }),
            None => warn!(%id, "no think/answer tier for participant, skipping"),
        }
    }

    Ok(participants)
}

fn first_tier(path: &Path) -> Result<IntervalTier> {
    let mut tiers = read_textgrid(path)?;
    if tiers.is_empty() {
        return Err(AnalysisError::MissingTier {
            path: path.to_path_buf(),
        });
    }
    Ok(tiers.swap_remove(0))
}

/// Gaze tiers get the full cleanup: empty intervals out, marks reduced to
/// their category character.
pub fn load_gaze_tier(path: &Path) -> Result<IntervalTier> {
    let mut tier = first_tier(path)?;
    tier.delete_empty();
    tier.truncate_marks();
    Ok(tier)
}

/// Question tiers keep their full marks (the condition letter lives in
/// second position).
pub fn load_question_tier(path: &Path) -> Result<IntervalTier> {
    let mut tier = first_tier(path)?;
    tier.delete_empty();
    Ok(tier)
}

/// Reduce aligned samples to the sequence fed into recurrence analysis:
/// uncoded marks out, off-task samples out when excluded, runs collapsed
/// under the (gaze, question) composite key. Exclusion happens before
/// collapsing so two on-task runs separated only by an off-task glance
/// still merge.
pub fn recurrence_sequence(samples: &[AlignedSample], filter: CategoryFilter) -> Vec<AlignedSample> {
    let coded: Vec<AlignedSample> = samples
        .iter()
        .filter(|s| match s.category() {
            Some(category) => filter.includes(category),
            None => {
                warn!(mark = %s.gaze_mark, "uncoded gaze mark dropped from recurrence sequence");
                false
            }
        })
        .cloned()
        .collect();

    collapse_runs_composite(&coded, |s| s.gaze_mark.clone(), |s| s.question_index)
}

#[derive(Clone, Debug)]
pub struct ParticipantReport {
    pub id: String,
    pub rqa: RqaSummary,
}

/// Run the full pipeline for one participant and write its outputs.
pub fn analyze_participant(
    participant: &Participant,
    cfg: &AppConfig,
    filter: CategoryFilter,
    out_dir: &Path,
) -> Result<ParticipantReport> {
    let gaze = load_gaze_tier(&participant.gaze_path)?;
    let questions = load_question_tier(&participant.question_path)?;
    let id = &participant.id;

    // Transition side: counts, frequencies, CSV, graph description.
    let counts = analyze_transitions(&gaze);
    let freqs = relative_frequencies(&counts, filter);
    fs::write(
        out_dir.join(CSV_DIR).join(format!("{id}_tabelle.csv")),
        pattern_matrix_csv(&freqs, filter),
    )?;
    let graph = TransitionGraph::from_frequencies(&freqs, filter);
    fs::write(
        out_dir.join(GRAPH_DIR).join(format!("{id}_graph.dot")),
        graph.to_dot(id),
    )?;

    // Recurrence side: align, deduplicate, quantify, draw.
    let samples = recurrence_sequence(&align(&gaze, &questions), filter);
    let categories: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.category())
        .map(f64::from)
        .collect();

    let params = RqaParams {
        radius: cfg.recurrence.radius,
        theiler: cfg.recurrence.theiler,
        min_diagonal: cfg.recurrence.min_line,
        min_vertical: cfg.recurrence.min_line,
    };
    let matrix = RecurrenceMatrix::from_sequence(&categories, params.radius);
    let summary = RqaSummary::compute(&matrix, &params);

    let destination = out_dir.join(RECURRENCE_DIR).join(id);
    let destination = destination.to_string_lossy();
    fs::write(format!("{destination}_recAnal.txt"), summary.to_string())?;

    // PNG cannot encode a zero-sized image; an empty sequence still gets
    // its (empty) report and CSVs.
    if samples.is_empty() {
        info!(%id, "no aligned samples, skipping recurrence plots");
    } else {
        let plot = render_recurrence_plot(&matrix);
        plot.save(format!("{destination}_recPlot.png"))?;

        let annotated = annotate_recurrence_plot(
            &plot,
            &samples,
            &cfg.colors.to_tables(),
            AnnotationOptions {
                with_questions: cfg.annotation.with_questions,
            },
        )?;
        annotated.save(format!("{destination}_recPlot_numbered.png"))?;
    }

    info!(
        %id,
        transitions = counts.total(),
        samples = samples.len(),
        "participant analyzed"
    );

    Ok(ParticipantReport {
        id: id.clone(),
        rqa: summary,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub skipped: usize,
}

/// Analyze every discovered participant and write the aggregate results
/// CSV. Per-participant failures are logged and counted, not propagated.
pub fn run_batch(
    gaze_dir: &Path,
    question_dir: &Path,
    out_dir: &Path,
    cfg: &AppConfig,
    filter: CategoryFilter,
) -> Result<BatchSummary> {
    for sub in [CSV_DIR, GRAPH_DIR, RECURRENCE_DIR] {
        fs::create_dir_all(out_dir.join(sub))?;
    }

    let participants = discover_participants(gaze_dir, question_dir)?;
    info!(count = participants.len(), "participants discovered");

    let mut reports: Vec<(String, RqaSummary)> = Vec::with_capacity(participants.len());
    let mut summary = BatchSummary::default();

    for participant in &participants {
        match analyze_participant(participant, cfg, filter, out_dir) {
            Ok(report) => {
                reports.push((report.id, report.rqa));
                summary.analyzed += 1;
            }
            Err(err) => {
                error!(id = %participant.id, %err, "participant failed, skipping");
                summary.skipped += 1;
            }
        }
    }

    fs::write(out_dir.join("rqa_results.csv"), rqa_results_csv(&reports))?;
    Ok(summary)
}
