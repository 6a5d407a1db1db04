//! Location selection over a loaded [`Dataset`].

use std::collections::BTreeSet;
use std::fmt;

use crate::reading::{Dataset, Reading};

/// Label shown for the "all locations" choice.
pub const ALL_LOCATIONS: &str = "전체";

/// Which readings a render pass looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Location(String),
}

impl Selection {
    /// Maps a selector label back to a selection; the sentinel label means all.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LOCATIONS {
            Selection::All
        } else {
            Selection::Location(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL_LOCATIONS,
            Selection::Location(name) => name,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Borrowed view of the readings matching a [`Selection`], in source order.
#[derive(Debug, Clone, Default)]
pub struct FilteredDataset<'a> {
    readings: Vec<&'a Reading>,
}

impl<'a> FilteredDataset<'a> {
    pub fn readings(&self) -> &[&'a Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Reading> + '_ {
        self.readings.iter().copied()
    }
}

/// Distinct location names in `dataset`, sorted lexicographically.
pub fn locations(dataset: &Dataset) -> Vec<String> {
    dataset
        .iter()
        .map(|r| r.location_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Selector choices: the sentinel first, then every location name.
pub fn selector_options(dataset: &Dataset) -> Vec<String> {
    std::iter::once(ALL_LOCATIONS.to_string())
        .chain(locations(dataset))
        .collect()
}

/// Applies `selection` to `dataset`. An unknown location yields an empty result.
pub fn filter<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredDataset<'a> {
    let readings = match selection {
        Selection::All => dataset.iter().collect(),
        Selection::Location(name) => dataset
            .iter()
            .filter(|r| r.location_name == *name)
            .collect(),
    };
    FilteredDataset { readings }
}
