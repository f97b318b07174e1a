//! Structures and thresholds present in one experiment

use std::collections::BTreeSet;

use crate::{record::Record, threshold::ThresholdId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub structures: BTreeSet<String>,
    pub thresholds: BTreeSet<ThresholdId>,
}

impl Schema {
    pub fn discover<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut schema = Self::default();
        for record in records {
            schema.structures.insert(record.structure.clone());
            schema.thresholds.insert(record.threshold.clone());
        }
        schema
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::record::RecordFile;

    #[test]
    fn test_discover_distinct() {
        let file = RecordFile::parse(
            Path::new("seg_dice.csv"),
            "p1,struct=parotid,thresh=0.5,dice=0.8,abhd=1,95bhd=3\n\
             p2,struct=parotid,thresh=0.5,dice=0.7,abhd=1,95bhd=3\n\
             p1,struct=brainstem,confidence_weight=0.2,dice=0.9,abhd=1,95bhd=3\n\
             p2,struct=brainstem,thresh=0.1,dice=0.9,abhd=1,95bhd=3\n",
        )
        .unwrap();

        let schema = Schema::discover(file.records());
        assert_eq!(
            schema.structures.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["brainstem", "parotid"]
        );
        assert_eq!(
            schema.thresholds.iter().map(ThresholdId::as_str).collect::<Vec<_>>(),
            vec!["gaussian_0.100000", "gaussian_0.500000", "staple_0.200000000"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(Schema::discover(std::iter::empty::<&Record>()).is_empty());
    }
}
