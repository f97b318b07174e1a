//! Experiment-by-experiment report construction

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use mabs_analysis::{
    aggregate::{ExperimentStats, MetricBuckets, SummaryRow},
    experiment::{self, Experiment},
    record::RecordFile,
    schema::Schema,
    selection::{Selection, SelectionFilter},
    threshold::ThresholdId,
};
use mabs_report::layout::{EmptyBucketPolicy, Report};
use serde::Serialize;

#[derive(Debug, Clone)]
pub(crate) struct PipelineOptions {
    pub record_file: String,
    pub filter: SelectionFilter,
    pub gap: u32,
    pub empty_policy: EmptyBucketPolicy,
}

#[derive(Debug, Clone)]
pub(crate) struct ExperimentOutcome {
    pub experiment: Experiment,
    pub stats: ExperimentStats,
    pub selection: Selection,
}

#[derive(Debug, Clone)]
pub(crate) struct PipelineOutput {
    pub report: Report,
    pub experiments: Vec<ExperimentOutcome>,
}

/// JSON export of one experiment.
#[derive(Debug, Serialize)]
pub(crate) struct ExperimentSummary<'a> {
    atlas_count: u32,
    directory: &'a Path,
    selected_structures: &'a BTreeSet<String>,
    selected_thresholds: &'a BTreeSet<ThresholdId>,
    buckets: Vec<SummaryRow<'a>>,
}

impl ExperimentOutcome {
    pub(crate) fn summary(&self) -> ExperimentSummary<'_> {
        ExperimentSummary {
            atlas_count: self.experiment.atlas_count,
            directory: &self.experiment.dir,
            selected_structures: &self.selection.structures,
            selected_thresholds: &self.selection.thresholds,
            buckets: self.stats.rows().collect(),
        }
    }
}

/// Reads every experiment under `root_dir` in ascending atlas-count order and
/// accumulates their statistics into a report.
pub(crate) fn summarize(root_dir: &Path, options: &PipelineOptions) -> anyhow::Result<PipelineOutput> {
    let experiments = experiment::enumerate_experiments(root_dir)?;
    log::info!(
        "Found {} experiments in {} (atlas counts: {})",
        experiments.len(),
        root_dir.display(),
        experiments
            .iter()
            .map(|e| e.atlas_count.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut report = Report::new(options.gap);
    let mut outcomes = Vec::with_capacity(experiments.len());
    for (position, experiment) in (1..).zip(experiments) {
        let record_path: PathBuf = experiment.record_path(&options.record_file);
        log::info!(
            "Processing {} atlases: {}",
            experiment.atlas_count,
            record_path.display()
        );

        let records = RecordFile::read(&record_path)?;
        if records.is_empty() {
            log::warn!("No records in {}", record_path.display());
        }

        let schema = Schema::discover(records.records());
        log::debug!(
            "Discovered {} structures and {} thresholds",
            schema.structures.len(),
            schema.thresholds.len()
        );
        let selection = options.filter.apply(&schema).with_context(|| {
            format!(
                "Failed to select structures/thresholds for {}",
                experiment.dir.display()
            )
        })?;

        let buckets = MetricBuckets::collect(records.records());
        let stats = ExperimentStats::compute(experiment.atlas_count, &buckets);
        report.add_experiment(position, &stats, &selection, options.empty_policy)?;

        outcomes.push(ExperimentOutcome {
            experiment,
            stats,
            selection,
        });
    }

    Ok(PipelineOutput {
        report,
        experiments: outcomes,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mabs_analysis::{
        experiment::DEFAULT_RECORD_FILE, selection::ThresholdSelector, threshold::Fusion,
    };
    use mabs_report::{layout::DEFAULT_GAP, sheet::CellRef};
    use tempfile::TempDir;

    use super::*;

    fn options(filter: SelectionFilter) -> PipelineOptions {
        PipelineOptions {
            record_file: DEFAULT_RECORD_FILE.to_owned(),
            filter,
            gap: DEFAULT_GAP,
            empty_policy: EmptyBucketPolicy::Fail,
        }
    }

    fn write_experiment(root: &Path, name: &str, contents: &str) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(DEFAULT_RECORD_FILE), contents).unwrap();
    }

    fn two_experiments() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        write_experiment(
            root.path(),
            "exp_10",
            "p1,struct=parotid,thresh=0.500000,dice=0.86,abhd=1.1,95bhd=3.1\n",
        );
        write_experiment(
            root.path(),
            "exp_05",
            "p1,struct=parotid,thresh=0.500000,dice=0.81,abhd=1.3,95bhd=3.6\n",
        );
        root
    }

    #[test]
    fn test_end_to_end_single_value_buckets() {
        let root = two_experiments();
        let output = summarize(root.path(), &options(SelectionFilter::default())).unwrap();

        assert_eq!(output.report.sheets().count(), 1);
        let threshold = ThresholdId::new(Fusion::Gaussian, 0.5);
        let sheet = output.report.sheet(&threshold).unwrap();
        assert_eq!(sheet.name(), "thr_gaussian_0500000");

        assert_eq!(sheet.text(CellRef::new(1, 1)), Some("parotid"));
        assert_eq!(sheet.number(CellRef::new(3, 1)), Some(5.0));
        assert_eq!(sheet.number(CellRef::new(4, 1)), Some(10.0));
        for (row, dice) in [(3, 0.81), (4, 0.86)] {
            for col in 2..=4 {
                assert_eq!(sheet.number(CellRef::new(row, col)), Some(dice));
            }
            for col in 2..=7 {
                assert_eq!(
                    sheet.number(CellRef::new(row + DEFAULT_GAP + 2, col)),
                    Some(0.0)
                );
            }
        }
        assert_eq!(sheet.get(CellRef::new(5, 1)), None);

        let counts = output
            .experiments
            .iter()
            .map(|o| o.stats.atlas_count)
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![5, 10]);
    }

    #[test]
    fn test_rerun_is_identical() {
        let root = two_experiments();
        let first = summarize(root.path(), &options(SelectionFilter::default())).unwrap();
        let second = summarize(root.path(), &options(SelectionFilter::default())).unwrap();
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn test_filtered_structures_and_thresholds() {
        let root = tempfile::tempdir().unwrap();
        write_experiment(
            root.path(),
            "exp_05",
            "p1,struct=parotid,thresh=0.5,dice=0.8,abhd=1,95bhd=3\n\
             p1,struct=parotid,confidence_weight=0.2,dice=0.7,abhd=1,95bhd=3\n\
             p1,struct=brainstem,confidence_weight=0.2,dice=0.9,abhd=1,95bhd=3\n",
        );
        let filter = SelectionFilter::new(
            vec!["parotid".to_owned()],
            vec!["staple*".parse::<ThresholdSelector>().unwrap()],
        );

        let output = summarize(root.path(), &options(filter)).unwrap();
        let names = output
            .report
            .sheets()
            .map(|s| s.name().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["thr_staple_0200000000"]);

        let sheet = output.report.sheets().next().unwrap();
        assert_eq!(sheet.text(CellRef::new(1, 1)), Some("parotid"));
        assert_eq!(sheet.get(CellRef::new(1, 12)), None);
        assert_eq!(sheet.number(CellRef::new(3, 2)), Some(0.7));
    }

    #[test]
    fn test_selection_error_names_experiment() {
        let root = two_experiments();
        let filter = SelectionFilter::new(vec!["cochlea".to_owned()], vec![]);
        let err = summarize(root.path(), &options(filter)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("exp_05"), "{message}");
        assert!(message.contains("cochlea"), "{message}");
    }

    #[test]
    fn test_parse_error_aborts() {
        let root = two_experiments();
        write_experiment(
            root.path(),
            "exp_20",
            "p1,struct=parotid,thresh=0.5,confidence_weight=0.2,dice=0.8,abhd=1,95bhd=3\n",
        );
        let err = summarize(root.path(), &options(SelectionFilter::default())).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("seg_dice.csv:1:"), "{message}");
        assert!(message.contains("both 'thresh' and 'confidence_weight'"), "{message}");
    }

    #[test]
    fn test_empty_bucket_policy() {
        let root = tempfile::tempdir().unwrap();
        write_experiment(
            root.path(),
            "exp_05",
            "p1,struct=parotid,thresh=0.5,dice=0.8,abhd=1,95bhd=3\n\
             p1,struct=brainstem,confidence_weight=0.2,dice=0.9,abhd=1,95bhd=3\n",
        );

        let err = summarize(root.path(), &options(SelectionFilter::default())).unwrap_err();
        assert!(format!("{err:#}").contains("has no values"));

        let mut skip = options(SelectionFilter::default());
        skip.empty_policy = EmptyBucketPolicy::Skip;
        let output = summarize(root.path(), &skip).unwrap();
        assert_eq!(output.report.sheets().count(), 2);
    }

    #[test]
    fn test_summary_json() {
        let root = two_experiments();
        let output = summarize(root.path(), &options(SelectionFilter::default())).unwrap();
        let json = serde_json::to_value(output.experiments[0].summary()).unwrap();
        assert_eq!(json["atlas_count"], 5);
        assert_eq!(json["selected_thresholds"][0], "gaussian_0.500000");
        assert_eq!(json["buckets"][0]["dice"]["median"], 0.81);
    }
}
