//! textgrid.rs — minimal reader for Praat TextGrid files (long text
//! format, interval tiers only).
//!
//! The annotation layer delivers one TextGrid per participant and tier
//! kind. Only the pieces the pipeline consumes are parsed: tier class,
//! tier name, and the xmin/xmax/text triple of each interval. Point tiers
//! are skipped.

use std::fs;
use std::path::Path;

use crate::core::tier::{Interval, IntervalTier};
use crate::error::{AnalysisError, Result};

pub fn read_textgrid(path: &Path) -> Result<Vec<IntervalTier>> {
    let text = fs::read_to_string(path)?;
    parse_textgrid(&text, path)
}

pub fn parse_textgrid(text: &str, path: &Path) -> Result<Vec<IntervalTier>> {
    let fail = |line: usize, message: &str| AnalysisError::TextGrid {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    if !text.contains("ooTextFile") {
        return Err(fail(1, "not a Praat TextGrid (missing ooTextFile header)"));
    }

    let mut tiers: Vec<IntervalTier> = Vec::new();
    let mut current: Option<IntervalTier> = None;
    let mut in_interval = false;
    let mut xmin: Option<f64> = None;
    let mut xmax: Option<f64> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if let Some(class) = quoted_value(line, "class") {
            if let Some(tier) = current.take() {
                tiers.push(tier);
            }
            in_interval = false;
            if class == "IntervalTier" {
                current = Some(IntervalTier::new(""));
            }
            continue;
        }

        let Some(tier) = current.as_mut() else {
            continue;
        };

        if let Some(name) = quoted_value(line, "name") {
            tier.name = name;
        } else if line.starts_with("intervals [") {
            in_interval = true;
            xmin = None;
            xmax = None;
        } else if in_interval {
            if let Some(value) = numeric_value(line, "xmin") {
                xmin = Some(value.map_err(|m| fail(line_no, &m))?);
            } else if let Some(value) = numeric_value(line, "xmax") {
                xmax = Some(value.map_err(|m| fail(line_no, &m))?);
            } else if let Some(mark) = quoted_value(line, "text") {
                let (Some(start), Some(end)) = (xmin.take(), xmax.take()) else {
                    return Err(fail(line_no, "interval text before its time bounds"));
                };
                tier.push(Interval::new(start, end, mark));
                in_interval = false;
            }
        }
    }

    if let Some(tier) = current.take() {
        tiers.push(tier);
    }

    if tiers.is_empty() {
        return Err(AnalysisError::MissingTier {
            path: path.to_path_buf(),
        });
    }
    Ok(tiers)
}

/// `key = "value"`, with doubled quotes unescaped.
fn quoted_value(line: &str, key: &str) -> Option<String> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() != key {
        return None;
    }
    let rhs = rhs.trim();
    let inner = rhs.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.replace("\"\"", "\""))
}

/// `key = 12.34`; returns the parse outcome so the caller can report the
/// offending line.
fn numeric_value(line: &str, key: &str) -> Option<std::result::Result<f64, String>> {
    let (lhs, rhs) = line.split_once('=')?;
    if lhs.trim() != key {
        return None;
    }
    let rhs = rhs.trim();
    Some(
        rhs.parse::<f64>()
            .map_err(|_| format!("invalid number for {key}: {rhs:?}")),
    )
}
