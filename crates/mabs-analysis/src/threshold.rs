//! Fusion methods and threshold identities
//!
//! Every trial record is produced by one label-fusion method at one weight. The
//! pair is folded into a [`ThresholdId`], a canonical string such as
//! `gaussian_0.500000` or `staple_0.200000000`, which keys buckets, statistics
//! and report sheets.
//!
//! The weight precision differs per method: 6 decimals for Gaussian, 9 for STAPLE.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

/// Label-fusion method that produced a trial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fusion {
    /// Gaussian-weighted voting, parameterized by `thresh`.
    Gaussian,
    /// STAPLE, parameterized by `confidence_weight`.
    Staple,
}

impl fmt::Display for Fusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Fusion {
    pub const ALL: [Self; 2] = [Self::Gaussian, Self::Staple];

    /// Prefix used in threshold identities.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Fusion::Gaussian => "gaussian",
            Fusion::Staple => "staple",
        }
    }

    /// Record field that carries the weight for this method.
    #[must_use]
    pub fn weight_field(self) -> &'static str {
        match self {
            Fusion::Gaussian => "thresh",
            Fusion::Staple => "confidence_weight",
        }
    }

    /// Number of decimals the weight is rendered with.
    #[must_use]
    pub fn weight_precision(self) -> usize {
        match self {
            Fusion::Gaussian => 6,
            Fusion::Staple => 9,
        }
    }
}

/// Error returned when a fusion method name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown fusion method '{name}' (expected 'gaussian' or 'staple')")]
pub struct UnknownFusionError {
    pub name: String,
}

impl FromStr for Fusion {
    type Err = UnknownFusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fusion::ALL
            .into_iter()
            .find(|fusion| fusion.name() == s)
            .ok_or_else(|| UnknownFusionError { name: s.to_owned() })
    }
}

/// Canonical identity of a fusion method and weight combination.
///
/// ```
/// use mabs_analysis::threshold::{Fusion, ThresholdId};
///
/// let gaussian = ThresholdId::new(Fusion::Gaussian, 0.5);
/// assert_eq!(gaussian.as_str(), "gaussian_0.500000");
/// assert_eq!(gaussian.sheet_name(), "thr_gaussian_0500000");
///
/// let staple = ThresholdId::new(Fusion::Staple, 0.2);
/// assert_eq!(staple.as_str(), "staple_0.200000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThresholdId {
    fusion: Fusion,
    key: String,
}

impl ThresholdId {
    #[must_use]
    pub fn new(fusion: Fusion, weight: f64) -> Self {
        let key = format!(
            "{}_{:.*}",
            fusion.name(),
            fusion.weight_precision(),
            weight
        );
        Self { fusion, key }
    }

    #[must_use]
    pub fn fusion(&self) -> Fusion {
        self.fusion
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Worksheet name for this threshold: `thr_` followed by the identity with dots removed.
    #[must_use]
    pub fn sheet_name(&self) -> String {
        format!("thr_{}", self.key.replace('.', ""))
    }
}

impl fmt::Display for ThresholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for ThresholdId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.key)
    }
}
