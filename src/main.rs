mod batch;
mod century;
mod error;
mod logging;
mod parser;
mod rules;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use date_types::{CenturyQualifier, DatedRecord, EraSign};

/// Failures listed individually before the rest are only counted.
const MAX_LISTED_FAILURES: usize = 30;

#[derive(Parser)]
#[command(
    name = "date_extract",
    about = "Normalize museum date annotations into signed year intervals"
)]
struct Cli {
    /// Log per-record detail (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse annotations given on the command line
    Parse {
        /// Annotations, e.g. "ca. 1375–1400", "early 14th century"
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// Resolve a century number directly
    Resolve {
        /// Century number, e.g. 14
        century: String,
        #[arg(long, value_enum, default_value_t = QualifierArg::Whole)]
        qualifier: QualifierArg,
        /// Count the century before the common era
        #[arg(long)]
        bce: bool,
    },
    /// Parse a file, directory or stdin of annotations → JSON
    Batch {
        /// Input file (one annotation per line, or a .json array), a directory, or "-"
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (default: available parallelism)
        #[arg(short, long)]
        jobs: Option<NonZeroUsize>,
        /// Keep only intervals starting at or after this year
        #[arg(long, allow_negative_numbers = true)]
        from: Option<i64>,
        /// Keep only intervals ending at or before this year
        #[arg(long, allow_negative_numbers = true)]
        to: Option<i64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum QualifierArg {
    Whole,
    Early,
    Mid,
    Late,
}

impl From<QualifierArg> for CenturyQualifier {
    fn from(q: QualifierArg) -> Self {
        match q {
            QualifierArg::Whole => CenturyQualifier::Whole,
            QualifierArg::Early => CenturyQualifier::Early,
            QualifierArg::Mid => CenturyQualifier::Mid,
            QualifierArg::Late => CenturyQualifier::Late,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Parse { dates } => run_parse(&dates),
        Command::Resolve {
            century,
            qualifier,
            bce,
        } => run_resolve(&century, qualifier.into(), bce),
        Command::Batch {
            input,
            output,
            jobs,
            from,
            to,
        } => run_batch(&input, output.as_deref(), jobs, from, to),
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  OUTPUT HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn write_json<T: serde::Serialize>(output: Option<&Path>, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).context("JSON serialization failed")?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {} ({} bytes)", path.display(), json.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn log_failures(records: &[DatedRecord]) {
    let failed: Vec<&DatedRecord> = records.iter().filter(|r| r.error.is_some()).collect();
    for r in failed.iter().take(MAX_LISTED_FAILURES) {
        let location = match (&r.source, r.line) {
            (Some(s), Some(l)) => format!("{s}:{l}"),
            (Some(s), None) => s.clone(),
            _ => format!("#{}", r.index),
        };
        warn!("{location}: {}", r.error.as_deref().unwrap_or_default());
    }
    if failed.len() > MAX_LISTED_FAILURES {
        warn!("... and {} more", failed.len() - MAX_LISTED_FAILURES);
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  PARSE MODE: annotations from argv → JSON records on stdout
// ═══════════════════════════════════════════════════════════════════════

fn run_parse(dates: &[String]) -> Result<()> {
    let inputs: Vec<batch::InputRecord> = dates
        .iter()
        .map(|d| batch::InputRecord::bare(d))
        .collect();
    let results = inputs
        .iter()
        .map(|i| parser::parse_date_range(&i.raw))
        .collect();
    let out = batch::build_output(&inputs, results, None);

    log_failures(&out.records);
    write_json(None, &out.records)
}

// ═══════════════════════════════════════════════════════════════════════
//  RESOLVE MODE: century + qualifier + era → interval
// ═══════════════════════════════════════════════════════════════════════

fn run_resolve(token: &str, qualifier: CenturyQualifier, bce: bool) -> Result<()> {
    let century = century::century_number(token.trim(), token)?;
    let era = if bce { EraSign::Bce } else { EraSign::Ce };
    let interval = century::resolve(century, qualifier, era);
    info!(
        century,
        qualifier = qualifier.as_str(),
        ?era,
        "resolved"
    );
    write_json(None, &interval)
}

// ═══════════════════════════════════════════════════════════════════════
//  BATCH MODE: many annotations, parsed concurrently, order preserved
// ═══════════════════════════════════════════════════════════════════════

fn run_batch(
    input: &Path,
    output: Option<&Path>,
    jobs: Option<NonZeroUsize>,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<()> {
    let inputs = batch::read_inputs(input)?;
    let jobs = jobs
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    info!(
        "read {} annotations from {}, parsing on {} thread(s)",
        inputs.len(),
        input.display(),
        jobs
    );

    let results = batch::parse_all(&inputs, jobs);
    let out = batch::build_output(&inputs, results, batch::YearWindow::new(from, to));

    log_failures(&out.records);
    if let (Some(earliest), Some(latest)) = (out.stats.earliest_start, out.stats.latest_end) {
        info!("year span: {earliest} .. {latest}");
    }
    for (bin, count) in &out.stats.by_century {
        info!("  {bin:>6}: {count}");
    }

    write_json(output, &out)
}
