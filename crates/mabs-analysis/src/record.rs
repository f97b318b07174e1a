//! Trial record parsing
//!
//! Each experiment directory holds a headerless CSV file with one trial per line:
//!
//! ```text
//! patient_07,struct=parotid_l,thresh=0.5,dice=0.82,abhd=1.31,95bhd=3.9
//! patient_07,struct=parotid_l,confidence_weight=0.2,dice=0.80,abhd=1.40,95bhd=4.2
//! ```
//!
//! The first token is the patient identifier; every other token is a `key=value`
//! field. Values are kept as numbers when they parse as `f64`, as text otherwise.
//! A record must name its structure, its three metrics and exactly one of
//! `thresh` / `confidence_weight`.

use std::{
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::{
    metric::{Metric, PerMetric},
    threshold::{Fusion, ThresholdId},
};

/// A field value, numeric when the raw text parses as a float.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse::<f64>()
            .map_or_else(|_| Value::Text(raw.to_owned()), Value::Number)
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => fmt::Display::fmt(n, f),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// What went wrong on a single line.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ParseErrorKind {
    #[display("missing patient identifier")]
    MissingPatient,
    #[display("field '{field}' is not of the form key=value")]
    MalformedField { field: String },
    #[display("missing required field '{key}'")]
    MissingField { key: &'static str },
    #[display("field '{key}' must be numeric, found '{value}'")]
    NotNumeric { key: &'static str, value: String },
    #[display("field '{key}' must be a finite number, found '{value}'")]
    NonFinite { key: &'static str, value: String },
    #[display("both 'thresh' and 'confidence_weight' are present")]
    AmbiguousThreshold,
    #[display("neither 'thresh' nor 'confidence_weight' is present")]
    MissingThreshold,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("failed to read record file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("{}:{line}: {kind}", path.display())]
    Line {
        path: PathBuf,
        line: usize,
        kind: ParseErrorKind,
    },
}

/// One validated trial.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 1-based line number in the source file.
    pub line: usize,
    pub structure: String,
    pub threshold: ThresholdId,
    pub metrics: PerMetric<f64>,
    /// All fields of the line, including the ones extracted above.
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Parses the fields of one line (everything after the patient identifier).
    pub fn from_fields<'a, I>(line: usize, tokens: I) -> Result<Self, ParseErrorKind>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = BTreeMap::new();
        let mut structure = None;
        for token in tokens {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (key, value) = token
                .split_once('=')
                .filter(|(key, value)| !key.trim().is_empty() && !value.contains('='))
                .ok_or_else(|| ParseErrorKind::MalformedField {
                    field: token.to_owned(),
                })?;
            let (key, value) = (key.trim(), value.trim());
            if key == "struct" {
                structure = Some(value.to_owned());
            }
            fields.insert(key.to_owned(), Value::parse(value));
        }

        let structure = structure.ok_or(ParseErrorKind::MissingField { key: "struct" })?;
        let threshold = threshold_of(&fields)?;
        let metrics = PerMetric {
            dice: required_number(&fields, Metric::Dice.field_key())?,
            avg_boundary_distance: required_number(
                &fields,
                Metric::AvgBoundaryDistance.field_key(),
            )?,
            p95_boundary_distance: required_number(
                &fields,
                Metric::P95BoundaryDistance.field_key(),
            )?,
        };

        Ok(Self {
            line,
            structure,
            threshold,
            metrics,
            fields,
        })
    }
}

fn required_number(
    fields: &BTreeMap<String, Value>,
    key: &'static str,
) -> Result<f64, ParseErrorKind> {
    let value = fields
        .get(key)
        .ok_or(ParseErrorKind::MissingField { key })?;
    let number = value.as_number().ok_or_else(|| ParseErrorKind::NotNumeric {
        key,
        value: value.to_string(),
    })?;
    if !number.is_finite() {
        return Err(ParseErrorKind::NonFinite {
            key,
            value: value.to_string(),
        });
    }
    Ok(number)
}

fn threshold_of(fields: &BTreeMap<String, Value>) -> Result<ThresholdId, ParseErrorKind> {
    let present = Fusion::ALL
        .into_iter()
        .filter(|fusion| fields.contains_key(fusion.weight_field()))
        .collect::<Vec<_>>();
    match present.as_slice() {
        [fusion] => {
            let weight = required_number(fields, fusion.weight_field())?;
            Ok(ThresholdId::new(*fusion, weight))
        }
        [] => Err(ParseErrorKind::MissingThreshold),
        _ => Err(ParseErrorKind::AmbiguousThreshold),
    }
}

/// All trial records of one experiment, grouped by patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFile {
    pub path: PathBuf,
    /// Records per patient, in file order.
    pub patients: BTreeMap<String, Vec<Record>>,
}

impl RecordFile {
    /// Reads and parses a record file.
    pub fn read<P>(path: P) -> Result<Self, ParseError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file = Self::parse(path, &contents)?;
        log::debug!(
            "Parsed {} records for {} patients from {}",
            file.len(),
            file.patients.len(),
            path.display()
        );
        Ok(file)
    }

    /// Parses record file contents; `path` is used for diagnostics only.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ParseError> {
        let mut patients = BTreeMap::<String, Vec<Record>>::new();
        for (index, raw_line) in contents.lines().enumerate() {
            let line = index + 1;
            if raw_line.trim().is_empty() {
                continue;
            }
            let line_error = |kind| ParseError::Line {
                path: path.to_owned(),
                line,
                kind,
            };
            let mut tokens = raw_line.split(',');
            let patient = tokens
                .next()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .ok_or_else(|| line_error(ParseErrorKind::MissingPatient))?;
            let record = Record::from_fields(line, tokens).map_err(line_error)?;
            patients.entry(patient.to_owned()).or_default().push(record);
        }
        Ok(Self {
            path: path.to_owned(),
            patients,
        })
    }

    /// Iterates over every record of every patient.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.patients.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patients.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patients.values().all(Vec::is_empty)
    }
}
