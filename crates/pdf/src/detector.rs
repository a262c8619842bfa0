//! Text-layout table detection.
//!
//! Finds the largest block of consecutive lines that split into several
//! whitespace-separated segments and lays it out on a grid. The widest
//! line fixes the column positions; a segment in any other line lands in
//! the column whose start is nearest, and columns it leaves empty become
//! null cells. A header label spanning several columns therefore shows up
//! as the label followed by nulls, the same shape ruling-based detectors
//! produce for merged cells.

use lazy_static::lazy_static;
use pdftab_core::{Cell, CellGrid};
use regex::Regex;

lazy_static! {
    // Column separator patterns
    static ref COLUMN_SEPARATOR: Regex = Regex::new(r"(\s{2,}|\t+|\|)+").unwrap();

    // Row patterns
    static ref HORIZONTAL_RULE: Regex = Regex::new(r"^[-=_+|\s]{3,}$").unwrap();
}

/// A detected table and the lines of page text it came from.
#[derive(Debug, Clone)]
pub struct TableRegion {
    pub grid: CellGrid,
    pub start_line: usize,
    pub end_line: usize,
}

/// A run of text between column separators, positioned by character column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    start: usize,
    text: String,
}

pub struct TableDetector {
    min_rows: usize,
    min_cols: usize,
}

impl Default for TableDetector {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_cols: 2,
        }
    }
}

impl TableDetector {
    pub fn new(min_rows: usize, min_cols: usize) -> Self {
        Self {
            min_rows: min_rows.max(1),
            min_cols: min_cols.max(1),
        }
    }

    /// Detect the single table on a page, if any.
    ///
    /// When the page holds several candidate blocks the one with the most
    /// lines wins; ties go to the earliest.
    pub fn detect_grid(&self, text: &str) -> Option<TableRegion> {
        let lines: Vec<(usize, Vec<Segment>)> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !HORIZONTAL_RULE.is_match(line))
            .map(|(idx, line)| (idx, parse_segments(line)))
            .collect();

        let (start, end) = self.largest_block(&lines)?;
        let block = &lines[start..end];

        let anchors: Vec<usize> = block
            .iter()
            .map(|(_, segments)| segments)
            .fold(None::<&Vec<Segment>>, |widest, segments| match widest {
                Some(w) if w.len() >= segments.len() => Some(w),
                _ => Some(segments),
            })?
            .iter()
            .map(|s| s.start)
            .collect();

        let rows: Vec<Vec<Cell>> = block
            .iter()
            .map(|(_, segments)| place_segments(segments, &anchors))
            .collect();

        tracing::debug!(
            rows = rows.len(),
            cols = anchors.len(),
            "detected table block"
        );

        CellGrid::new(rows).ok().map(|grid| TableRegion {
            grid,
            start_line: block[0].0,
            end_line: block[block.len() - 1].0,
        })
    }

    fn largest_block(&self, lines: &[(usize, Vec<Segment>)]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        let mut i = 0;

        while i < lines.len() {
            if lines[i].1.len() < self.min_cols {
                i += 1;
                continue;
            }

            let start = i;
            while i < lines.len() && lines[i].1.len() >= self.min_cols {
                i += 1;
            }

            let len = i - start;
            if len >= self.min_rows && best.map_or(true, |(s, e)| len > e - s) {
                best = Some((start, i));
            }
        }

        best
    }
}

fn parse_segments(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    let separators = COLUMN_SEPARATOR
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((line.len(), line.len())));

    for (sep_start, sep_end) in separators {
        let raw = &line[cursor..sep_start];
        let trimmed = raw.trim_start();
        let leading = raw.len() - trimmed.len();
        let trimmed = trimmed.trim_end();
        if !trimmed.is_empty() {
            segments.push(Segment {
                start: line[..cursor + leading].chars().count(),
                text: trimmed.to_string(),
            });
        }
        cursor = sep_end;
    }

    segments
}

fn place_segments(segments: &[Segment], anchors: &[usize]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = vec![None; anchors.len()];

    for segment in segments {
        let Some(col) = anchors
            .iter()
            .enumerate()
            .min_by_key(|(_, anchor)| anchor.abs_diff(segment.start))
            .map(|(i, _)| i)
        else {
            continue;
        };

        match cells[col].as_mut() {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(&segment.text);
            }
            None => cells[col] = Some(segment.text.clone()),
        }
    }

    cells
}
