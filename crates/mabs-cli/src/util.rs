use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use mabs_report::xlsx::REPORT_EXTENSION;
use serde::Serialize;

/// Writes `value` as pretty-printed JSON followed by a newline, replacing any existing file.
pub fn save_json<T>(value: &T, path: &Path) -> anyhow::Result<()>
where
    T: Serialize,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {}", path.display()))?;
    Ok(())
}

/// Report location next to the root directory: `<parent>/<root name>_stats.xlsx`.
pub fn default_report_path(root_dir: &Path) -> anyhow::Result<PathBuf> {
    let root_dir = fs::canonicalize(root_dir)
        .with_context(|| format!("Failed to resolve root directory: {}", root_dir.display()))?;
    let name = root_dir
        .file_name()
        .with_context(|| format!("Root directory has no name: {}", root_dir.display()))?;
    let parent = root_dir
        .parent()
        .with_context(|| format!("Root directory has no parent: {}", root_dir.display()))?;
    Ok(parent.join(format!(
        "{}_stats.{REPORT_EXTENSION}",
        name.to_string_lossy()
    )))
}

/// Renders a number with `,` as decimal separator.
pub fn decimal_comma(value: f64) -> String {
    format!("{value:?}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("mabs-results");
        fs::create_dir(&root).unwrap();

        let path = default_report_path(&root.join("..").join("mabs-results")).unwrap();
        assert_eq!(
            path,
            fs::canonicalize(dir.path())
                .unwrap()
                .join("mabs-results_stats.xlsx")
        );
    }

    #[test]
    fn test_default_report_path_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(default_report_path(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(decimal_comma(0.825), "0,825");
        assert_eq!(decimal_comma(3.0), "3,0");
    }

    #[test]
    fn test_save_json_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_json(&1, &dir.path().join("missing").join("summary.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }

    #[test]
    fn test_save_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(&path, "stale").unwrap();
        save_json(&vec![1, 2], &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
