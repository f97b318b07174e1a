//! Experiment discovery
//!
//! A results root holds one subdirectory per leave-one-out experiment, named
//! `<prefix>_<atlas count>` (e.g. `mabs-train_05`, `mabs-train_120`). Experiments
//! are processed in ascending atlas-count order, which also fixes their row in the
//! report.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Default name of the record file inside each experiment directory.
pub const DEFAULT_RECORD_FILE: &str = "seg_dice.csv";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("failed to read root directory {}", path.display())]
    ReadRoot { path: PathBuf, source: io::Error },
    #[display("experiment directory '{name}' does not end with '_<atlas count>'")]
    InvalidExperimentName { name: String },
    #[display(
        "experiment directories {} and {} both use {atlas_count} atlases",
        first.display(),
        second.display()
    )]
    DuplicateAtlasCount {
        atlas_count: u32,
        first: PathBuf,
        second: PathBuf,
    },
    #[display("no experiment directories found in {}", path.display())]
    NoExperiments { path: PathBuf },
}

/// One experiment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    /// Number of atlases used by the experiment.
    pub atlas_count: u32,
    pub dir: PathBuf,
}

impl Experiment {
    #[must_use]
    pub fn record_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

/// Extracts the atlas count from an experiment directory name.
///
/// The count is the last `_`-separated segment of the name.
///
/// ```
/// use mabs_analysis::experiment::parse_atlas_count;
///
/// assert_eq!(parse_atlas_count("mabs-train_05"), Some(5));
/// assert_eq!(parse_atlas_count("run_a_120"), Some(120));
/// assert_eq!(parse_atlas_count("mabs-train"), None);
/// ```
#[must_use]
pub fn parse_atlas_count(name: &str) -> Option<u32> {
    name.rsplit('_').next()?.parse().ok()
}

/// Lists the experiment directories under `root`, sorted by ascending atlas count.
///
/// Plain files and hidden directories are ignored.
pub fn enumerate_experiments(root: &Path) -> Result<Vec<Experiment>, ConfigurationError> {
    let read_root = |source| ConfigurationError::ReadRoot {
        path: root.to_owned(),
        source,
    };

    let mut experiments = Vec::new();
    for entry in fs::read_dir(root).map_err(read_root)? {
        let entry = entry.map_err(read_root)?;
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            log::debug!("Skipping hidden directory {}", dir.display());
            continue;
        }
        let atlas_count = parse_atlas_count(&name)
            .ok_or(ConfigurationError::InvalidExperimentName { name })?;
        experiments.push(Experiment { atlas_count, dir });
    }

    experiments.sort_by_key(|e| e.atlas_count);
    if let Some(pair) = experiments
        .windows(2)
        .find(|pair| pair[0].atlas_count == pair[1].atlas_count)
    {
        return Err(ConfigurationError::DuplicateAtlasCount {
            atlas_count: pair[0].atlas_count,
            first: pair[0].dir.clone(),
            second: pair[1].dir.clone(),
        });
    }
    if experiments.is_empty() {
        return Err(ConfigurationError::NoExperiments {
            path: root.to_owned(),
        });
    }

    Ok(experiments)
}
