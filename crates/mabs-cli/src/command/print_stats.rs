use std::io::{self, Write};

use super::pipeline::ExperimentOutcome;
use crate::util::decimal_comma;

/// Prints median and 5th/95th percentiles of every selected bucket, with `,` as decimal separator.
pub(super) fn print_stats<W>(out: &mut W, experiments: &[ExperimentOutcome]) -> io::Result<()>
where
    W: Write,
{
    for outcome in experiments {
        writeln!(out, "Atlases = {}", outcome.stats.atlas_count)?;
        for structure in &outcome.selection.structures {
            for threshold in &outcome.selection.thresholds {
                let Some(bucket) = outcome.stats.get(structure, threshold) else {
                    continue;
                };
                writeln!(out, "Structure = {structure}")?;
                writeln!(out, "  threshold = {threshold}")?;
                for (metric, summary) in bucket.metrics.iter() {
                    writeln!(
                        out,
                        "    {} = median {}  5th_perc {}  95th_perc {}",
                        metric.description(),
                        decimal_comma(summary.median),
                        decimal_comma(summary.p05),
                        decimal_comma(summary.p95),
                    )?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use mabs_analysis::{
        aggregate::{ExperimentStats, MetricBuckets},
        experiment::Experiment,
        record::RecordFile,
        schema::Schema,
        selection::SelectionFilter,
    };

    use super::*;

    #[test]
    fn test_output_format() {
        let file = RecordFile::parse(
            Path::new("seg_dice.csv"),
            "p1,struct=parotid,thresh=0.5,dice=0.8,abhd=1.5,95bhd=3\n\
             p2,struct=parotid,thresh=0.5,dice=0.6,abhd=1.5,95bhd=3\n",
        )
        .unwrap();
        let outcome = ExperimentOutcome {
            experiment: Experiment {
                atlas_count: 5,
                dir: PathBuf::from("exp_05"),
            },
            stats: ExperimentStats::compute(5, &MetricBuckets::collect(file.records())),
            selection: SelectionFilter::default()
                .apply(&Schema::discover(file.records()))
                .unwrap(),
        };

        let mut out = Vec::new();
        print_stats(&mut out, &[outcome]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], "Atlases = 5");
        assert_eq!(lines[1], "Structure = parotid");
        assert_eq!(lines[2], "  threshold = gaussian_0.500000");
        assert!(lines[3].starts_with("    dice = median 0,7"), "{}", lines[3]);
        assert_eq!(
            lines[4],
            "    average boundary distance = median 1,5  5th_perc 1,5  95th_perc 1,5"
        );
        assert_eq!(
            lines[5],
            "    95th percentile boundary distance = median 3,0  5th_perc 3,0  95th_perc 3,0"
        );
        assert_eq!(lines.len(), 6);
    }
}
