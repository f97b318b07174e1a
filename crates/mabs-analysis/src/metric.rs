//! Segmentation-accuracy metrics carried by every trial record

use serde::Serialize;

/// One of the three accuracy measurements reported per trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Dice overlap coefficient.
    Dice,
    /// Average boundary distance.
    AvgBoundaryDistance,
    /// 95th-percentile boundary distance.
    P95BoundaryDistance,
}

impl Metric {
    pub const ALL: [Self; 3] = [
        Self::Dice,
        Self::AvgBoundaryDistance,
        Self::P95BoundaryDistance,
    ];

    /// Record field holding this metric.
    #[must_use]
    pub fn field_key(self) -> &'static str {
        match self {
            Metric::Dice => "dice",
            Metric::AvgBoundaryDistance => "abhd",
            Metric::P95BoundaryDistance => "95bhd",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Metric::Dice => "dice",
            Metric::AvgBoundaryDistance => "average boundary distance",
            Metric::P95BoundaryDistance => "95th percentile boundary distance",
        }
    }
}

/// One value of `T` per [`Metric`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerMetric<T> {
    pub dice: T,
    pub avg_boundary_distance: T,
    pub p95_boundary_distance: T,
}

impl<T> PerMetric<T> {
    #[must_use]
    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Dice => &self.dice,
            Metric::AvgBoundaryDistance => &self.avg_boundary_distance,
            Metric::P95BoundaryDistance => &self.p95_boundary_distance,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut T {
        match metric {
            Metric::Dice => &mut self.dice,
            Metric::AvgBoundaryDistance => &mut self.avg_boundary_distance,
            Metric::P95BoundaryDistance => &mut self.p95_boundary_distance,
        }
    }

    /// Iterates over `(metric, value)` pairs in [`Metric::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> + '_ {
        Metric::ALL.into_iter().map(|metric| (metric, self.get(metric)))
    }

    /// Applies `f` to every metric, stopping at the first `None`.
    pub fn try_map<U, F>(&self, mut f: F) -> Option<PerMetric<U>>
    where
        F: FnMut(&T) -> Option<U>,
    {
        Some(PerMetric {
            dice: f(&self.dice)?,
            avg_boundary_distance: f(&self.avg_boundary_distance)?,
            p95_boundary_distance: f(&self.p95_boundary_distance)?,
        })
    }
}
