//! Precomputed boundary profiles keyed by process-parameter combination.
//!
//! The persisted form is a JSON object keyed by
//! `"{ion}_{neutral}_{dep_ion}_{dep_neutral}_{cycles}"`; parsing turns those
//! strings into [`ProcessKey`] values once, so lookups never depend on how a
//! float was formatted.

use crate::domain::{EtchError, EtchResult};
use crate::geometry::{Curve, Point2};
use serde::Deserialize;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

/// Equality and hashing compare the exact bit patterns of the four flux
/// levels (with `-0.0` folded into `0.0`) and the cycle count.
#[derive(Debug, Clone, Copy)]
pub struct ProcessKey {
    pub etch_ion: f64,
    pub etch_neu: f64,
    pub dep_ion: f64,
    pub dep_neu: f64,
    pub n_cycles: u32,
}

impl ProcessKey {
    pub fn new(etch_ion: f64, etch_neu: f64, dep_ion: f64, dep_neu: f64, n_cycles: u32) -> Self {
        Self {
            etch_ion,
            etch_neu,
            dep_ion,
            dep_neu,
            n_cycles,
        }
    }

    fn levels(&self) -> [f64; 4] {
        [self.etch_ion, self.etch_neu, self.dep_ion, self.dep_neu].map(fold_signed_zero)
    }

    fn level_bits(&self) -> [u64; 4] {
        self.levels().map(f64::to_bits)
    }
}

fn fold_signed_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for ProcessKey {
    fn eq(&self, other: &Self) -> bool {
        self.level_bits() == other.level_bits() && self.n_cycles == other.n_cycles
    }
}

impl Eq for ProcessKey {}

impl Hash for ProcessKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level_bits().hash(state);
        self.n_cycles.hash(state);
    }
}

impl Ord for ProcessKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.levels()
            .iter()
            .zip(other.levels().iter())
            .map(|(left, right)| left.total_cmp(right))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then(self.n_cycles.cmp(&other.n_cycles))
    }
}

impl PartialOrd for ProcessKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ProcessKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.etch_ion, self.etch_neu, self.dep_ion, self.dep_neu, self.n_cycles
        )
    }
}

impl FromStr for ProcessKey {
    type Err = EtchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |detail: &str| {
            EtchError::input_validation(
                "INPUT.LOOKUP_KEY",
                format!("invalid lookup key '{}': {}", raw, detail),
            )
        };

        let fields: Vec<&str> = raw.trim().split('_').collect();
        if fields.len() != 5 {
            return Err(invalid("expected 5 '_'-separated fields"));
        }

        let mut levels = [0.0_f64; 4];
        for (slot, field) in levels.iter_mut().zip(&fields[..4]) {
            let value = field
                .parse::<f64>()
                .map_err(|_| invalid(&format!("'{}' is not a number", field)))?;
            if !value.is_finite() {
                return Err(invalid(&format!("'{}' is not finite", field)));
            }
            *slot = value;
        }

        let cycles = parse_cycle_count(fields[4])
            .ok_or_else(|| invalid(&format!("'{}' is not a cycle count", fields[4])))?;

        Ok(Self::new(levels[0], levels[1], levels[2], levels[3], cycles))
    }
}

fn parse_cycle_count(field: &str) -> Option<u32> {
    if let Ok(value) = field.parse::<u32>() {
        return Some(value);
    }
    let value = field.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
        .then_some(value as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupRecord {
    pub curve: Curve,
    pub depth: f64,
}

impl LookupRecord {
    pub fn new(curve: Curve, depth: f64) -> Self {
        Self { curve, depth }
    }
}

/// Result of a lookup that never fails: a missing entry is replaced by a flat
/// profile with zero depth and `fallback` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved<'a> {
    pub key: ProcessKey,
    pub curve: Cow<'a, Curve>,
    pub depth: f64,
    pub fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: HashMap<ProcessKey, LookupRecord>,
}

impl LookupTable {
    pub fn new(entries: HashMap<ProcessKey, LookupRecord>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ProcessKey) -> Option<&LookupRecord> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ProcessKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<ProcessKey> {
        let mut keys: Vec<ProcessKey> = self.entries.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn retrieve(&self, key: &ProcessKey, fallback_point_count: usize) -> Retrieved<'_> {
        match self.entries.get(key) {
            Some(record) => Retrieved {
                key: *key,
                curve: Cow::Borrowed(&record.curve),
                depth: record.depth,
                fallback: false,
            },
            None => {
                tracing::warn!(%key, "lookup entry not found, using flat fallback profile");
                Retrieved {
                    key: *key,
                    curve: Cow::Owned(Curve::flat(fallback_point_count)),
                    depth: 0.0,
                    fallback: true,
                }
            }
        }
    }

    pub fn from_json_str(source: &str) -> EtchResult<Self> {
        let raw: BTreeMap<String, RawLookupRecord> =
            serde_json::from_str(source).map_err(|error| {
                EtchError::input_validation(
                    "INPUT.LOOKUP_JSON",
                    format!("failed to parse lookup table: {}", error),
                )
            })?;
        Self::from_raw(raw)
    }

    pub fn from_json_value(value: serde_json::Value) -> EtchResult<Self> {
        let raw: BTreeMap<String, RawLookupRecord> =
            serde_json::from_value(value).map_err(|error| {
                EtchError::input_validation(
                    "INPUT.LOOKUP_JSON",
                    format!("failed to parse lookup table: {}", error),
                )
            })?;
        Self::from_raw(raw)
    }

    pub fn from_json_file(path: &Path) -> EtchResult<Self> {
        let source = fs::read_to_string(path).map_err(|error| {
            EtchError::io_system(
                "IO.LOOKUP_READ",
                format!("failed to read lookup table '{}': {}", path.display(), error),
            )
        })?;
        Self::from_json_str(&source)
    }

    /// Keys that spell the same parameters differently (`2_…` and `2.0_…`)
    /// collapse to one entry: the canonical spelling wins, otherwise the
    /// first in key order.
    fn from_raw(raw: BTreeMap<String, RawLookupRecord>) -> EtchResult<Self> {
        let mut entries = HashMap::with_capacity(raw.len());
        for (raw_key, record) in raw {
            let key: ProcessKey = raw_key.parse()?;
            let record = record.into_record(&raw_key)?;
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(mut slot) => {
                    let canonical = raw_key == key.to_string();
                    tracing::warn!(
                        key = %key,
                        spelling = %raw_key,
                        kept = canonical,
                        "lookup key duplicates an earlier entry"
                    );
                    if canonical {
                        slot.insert(record);
                    }
                }
            }
        }
        Ok(Self { entries })
    }
}

impl FromIterator<(ProcessKey, LookupRecord)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (ProcessKey, LookupRecord)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawLookupRecord {
    points: Vec<Vec<f64>>,
    #[serde(default)]
    depth: f64,
}

impl RawLookupRecord {
    /// Points may carry a third (z) component, which is dropped.
    fn into_record(self, raw_key: &str) -> EtchResult<LookupRecord> {
        let mut points = Vec::with_capacity(self.points.len());
        for (index, point) in self.points.iter().enumerate() {
            if point.len() < 2 {
                return Err(EtchError::input_validation(
                    "INPUT.LOOKUP_POINT",
                    format!(
                        "point {} of lookup entry '{}' has {} components, expected at least 2",
                        index,
                        raw_key,
                        point.len()
                    ),
                ));
            }
            points.push(Point2::new(point[0], point[1]));
        }

        Ok(LookupRecord::new(Curve::new(points), self.depth))
    }
}
