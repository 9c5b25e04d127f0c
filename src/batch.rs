//! Batch processing: discover annotation inputs, parse them concurrently
//! and collect the results back in input order.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use date_types::{BatchOutput, BatchStats, DatedRecord, YearInterval};

use crate::error::DateError;
use crate::parser::parse_date_range;

/// One raw annotation and where it came from.
#[derive(Debug, Clone)]
pub struct InputRecord {
    pub source: Option<String>,
    pub line: Option<usize>,
    pub raw: String,
}

impl InputRecord {
    pub fn bare(raw: &str) -> Self {
        InputRecord {
            source: None,
            line: None,
            raw: raw.to_string(),
        }
    }
}

// ── Input discovery ──────────────────────────────────────────────────

/// Read annotations from `path`.
///
/// Accepted inputs:
///   `-`              one annotation per line on stdin
///   `{file}.json`    a JSON array of strings
///   `{file}`         one annotation per line
///   `{dir}/`         every `.txt`/`.json` file below it, in path order
pub fn read_inputs(path: &Path) -> Result<Vec<InputRecord>> {
    if path == Path::new("-") {
        let stdin = std::io::stdin();
        let lines = stdin
            .lock()
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .context("cannot read stdin")?;
        return Ok(lines_to_records(None, lines.iter().map(String::as_str)));
    }

    if path.is_dir() {
        let mut records = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("cannot walk {}", path.display()))?;
            let file = entry.path();
            if !entry.file_type().is_file() || !is_input_file(file) {
                continue;
            }
            records.extend(read_file(file)?);
        }
        return Ok(records);
    }

    read_file(path)
}

fn is_input_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt") | Some("json")
    )
}

fn read_file(path: &Path) -> Result<Vec<InputRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let source = Some(path.display().to_string());

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        let raws: Vec<String> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of strings", path.display()))?;
        return Ok(raws
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .map(|raw| InputRecord {
                source: source.clone(),
                line: None,
                raw,
            })
            .collect());
    }

    Ok(lines_to_records(source, content.lines()))
}

/// Blank lines are skipped; line numbers stay 1-based against the file.
fn lines_to_records<'a>(
    source: Option<String>,
    lines: impl Iterator<Item = &'a str>,
) -> Vec<InputRecord> {
    lines
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| InputRecord {
            source: source.clone(),
            line: Some(i + 1),
            raw: l.trim().to_string(),
        })
        .collect()
}

// ── Concurrent parsing ───────────────────────────────────────────────

/// Parse every record on up to `jobs` threads.
///
/// The result at position `i` always belongs to `inputs[i]`: each worker
/// owns a contiguous slice of output slots.
pub fn parse_all(inputs: &[InputRecord], jobs: usize) -> Vec<Result<YearInterval, DateError>> {
    if inputs.is_empty() {
        return Vec::new();
    }
    let chunk_size = inputs.len().div_ceil(jobs.max(1));
    let mut slots: Vec<Option<Result<YearInterval, DateError>>> = vec![None; inputs.len()];

    std::thread::scope(|scope| {
        let chunks = inputs
            .chunks(chunk_size)
            .zip(slots.chunks_mut(chunk_size));
        for (input_chunk, slot_chunk) in chunks {
            scope.spawn(move || {
                for (input, slot) in input_chunk.iter().zip(slot_chunk.iter_mut()) {
                    let result = parse_date_range(&input.raw);
                    match &result {
                        Ok(iv) => {
                            debug!(raw = %input.raw, start = iv.start, end = iv.end, "parsed")
                        }
                        Err(e) => debug!(kind = e.kind(), raw = e.raw(), "rejected"),
                    }
                    *slot = Some(result);
                }
            });
        }
    });

    slots.into_iter().flatten().collect()
}

// ── Output assembly ──────────────────────────────────────────────────

/// Inclusive year window applied to parsed records.
#[derive(Debug, Clone, Copy)]
pub struct YearWindow {
    pub from: i64,
    pub to: i64,
}

impl YearWindow {
    pub fn new(from: Option<i64>, to: Option<i64>) -> Option<Self> {
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(YearWindow {
            from: from.unwrap_or(i64::MIN),
            to: to.unwrap_or(i64::MAX),
        })
    }

    pub fn contains(&self, interval: &YearInterval) -> bool {
        interval.within(self.from, self.to)
    }
}

/// Pair inputs with their results, apply the window and count everything.
///
/// Failed records are always kept so the caller can see what was dropped;
/// parsed records outside the window are removed and counted.
pub fn build_output(
    inputs: &[InputRecord],
    results: Vec<Result<YearInterval, DateError>>,
    window: Option<YearWindow>,
) -> BatchOutput {
    let mut stats = BatchStats {
        total: inputs.len(),
        ..BatchStats::default()
    };
    let mut records = Vec::with_capacity(inputs.len());

    for (index, (input, result)) in inputs.iter().zip(results).enumerate() {
        let mut record = DatedRecord {
            index,
            source: input.source.clone(),
            line: input.line,
            raw: input.raw.clone(),
            interval: None,
            error: None,
        };

        match result {
            Ok(interval) => {
                stats.parsed += 1;
                if !interval.is_ordered() {
                    stats.inverted += 1;
                }
                if window.is_some_and(|w| !w.contains(&interval)) {
                    stats.filtered_out += 1;
                    continue;
                }
                stats.earliest_start = Some(
                    stats
                        .earliest_start
                        .map_or(interval.start, |s| s.min(interval.start)),
                );
                stats.latest_end = Some(
                    stats
                        .latest_end
                        .map_or(interval.end, |e| e.max(interval.end)),
                );
                *stats
                    .by_century
                    .entry(interval.start_century_bin())
                    .or_insert(0) += 1;
                record.interval = Some(interval);
            }
            Err(e) => {
                stats.failed += 1;
                match e {
                    DateError::NoNumericToken { .. } => stats.no_numeric_token += 1,
                    DateError::MalformedCentury { .. } => stats.malformed_century += 1,
                }
                record.error = Some(e.to_string());
            }
        }
        records.push(record);
    }

    info!(
        total = stats.total,
        parsed = stats.parsed,
        failed = stats.failed,
        filtered_out = stats.filtered_out,
        "batch complete"
    );

    BatchOutput { records, stats }
}
