use std::{io, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use mabs_analysis::{
    experiment::DEFAULT_RECORD_FILE,
    selection::{SelectionFilter, ThresholdSelector},
};
use mabs_report::layout::{DEFAULT_GAP, EmptyBucketPolicy};

use self::pipeline::PipelineOptions;
use crate::util;

mod pipeline;
mod print_stats;

/// Summarize multi-atlas segmentation results (`seg_dice.csv`) into a spreadsheet
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Root directory holding one `<prefix>_<atlas count>` directory per experiment
    #[arg(long = "root_dir")]
    root_dir: PathBuf,

    /// Subset of structures to report, as "struct1 struct2"
    #[arg(long, value_delimiter = ' ')]
    structures: Vec<String>,

    /// Subset of thresholds to report, as "gaussian_0.5 staple*"
    #[arg(long, value_delimiter = ' ')]
    thresholds: Vec<ThresholdSelector>,

    /// Print median and 5th/95th percentiles to stdout
    #[arg(long = "print_stats")]
    print_stats: bool,

    /// Rows between the main table header and the error-bar data block
    #[arg(long, default_value_t = DEFAULT_GAP)]
    gap: u32,

    /// Name of the record file inside each experiment directory
    #[arg(long = "input_name", default_value = DEFAULT_RECORD_FILE)]
    input_name: String,

    /// Report path [default: <parent of root_dir>/<root_dir name>_stats.xlsx]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write all per-experiment statistics as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Leave cells empty instead of failing when a selected structure/threshold has no values
    #[arg(long = "skip_empty")]
    skip_empty: bool,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let options = PipelineOptions {
        record_file: args.input_name.clone(),
        filter: SelectionFilter::new(args.structures.clone(), args.thresholds.clone()),
        gap: args.gap,
        empty_policy: if args.skip_empty {
            EmptyBucketPolicy::Skip
        } else {
            EmptyBucketPolicy::Fail
        },
    };
    let output = pipeline::summarize(&args.root_dir, &options)?;

    if args.print_stats {
        let mut stdout = io::stdout().lock();
        print_stats::print_stats(&mut stdout, &output.experiments)
            .context("Failed to print statistics")?;
    }

    let report_path = match &args.output {
        Some(path) => path.clone(),
        None => util::default_report_path(&args.root_dir)?,
    };
    output.report.save_xlsx(&report_path)?;
    log::info!(
        "Saved {} sheets to {}",
        output.report.sheets().count(),
        report_path.display()
    );

    if let Some(json_path) = &args.json {
        let summaries = output
            .experiments
            .iter()
            .map(pipeline::ExperimentOutcome::summary)
            .collect::<Vec<_>>();
        util::save_json(&summaries, json_path)?;
        log::info!("Saved statistics to {}", json_path.display());
    }

    Ok(())
}
