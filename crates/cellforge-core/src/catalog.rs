//! Antenna types and the catalog they are drawn from.

use serde::{Deserialize, Serialize};

use crate::error::{CellforgeError, Result};

/// Index of an antenna type inside a [`Catalog`].
pub type KindId = usize;

/// Specification of one antenna type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AntennaSpec {
    pub name: String,
    /// Coverage radius in grid cells.
    pub radius: u32,
    /// Maximum users the antenna can serve, if bounded.
    #[serde(default)]
    pub capacity: Option<u32>,
    pub cost: u64,
}

impl AntennaSpec {
    pub fn new(name: impl Into<String>, radius: u32, capacity: Option<u32>, cost: u64) -> Self {
        Self {
            name: name.into(),
            radius,
            capacity,
            cost,
        }
    }
}

/// Ordered collection of antenna types.
///
/// Types are addressed by [`KindId`]. Order is preserved through filtering so
/// iteration over kinds is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    specs: Vec<AntennaSpec>,
}

impl Catalog {
    pub fn new(specs: Vec<AntennaSpec>) -> Self {
        Self { specs }
    }

    /// The four stock antenna types.
    ///
    /// | Type  | Radius | Capacity | Cost   |
    /// |-------|--------|----------|--------|
    /// | Femto | 1      | 20       | 1 000  |
    /// | Pico  | 6      | 100      | 5 000  |
    /// | Micro | 40     | 500      | 12 000 |
    /// | Macro | 100    | 2 000    | 25 000 |
    pub fn standard() -> Self {
        Self::new(vec![
            AntennaSpec::new("Femto", 1, Some(20), 1_000),
            AntennaSpec::new("Pico", 6, Some(100), 5_000),
            AntennaSpec::new("Micro", 40, Some(500), 12_000),
            AntennaSpec::new("Macro", 100, Some(2_000), 25_000),
        ])
    }

    /// Restricts the catalog to the named types.
    ///
    /// `None` keeps every type. Names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// [`CellforgeError::UnknownAntennaType`] for a name not in the catalog,
    /// [`CellforgeError::EmptyCatalog`] if nothing is left.
    pub fn filter(&self, allowed: Option<&[String]>) -> Result<Catalog> {
        let specs: Vec<AntennaSpec> = match allowed {
            None => self.specs.clone(),
            Some(names) => {
                for name in names {
                    if self.find(name).is_none() {
                        return Err(CellforgeError::UnknownAntennaType(name.clone()));
                    }
                }
                self.specs
                    .iter()
                    .filter(|s| names.iter().any(|n| n.eq_ignore_ascii_case(&s.name)))
                    .cloned()
                    .collect()
            }
        };
        if specs.is_empty() {
            return Err(CellforgeError::EmptyCatalog);
        }
        Ok(Catalog { specs })
    }

    /// Looks up a type by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<KindId> {
        self.specs
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn get(&self, kind: KindId) -> &AntennaSpec {
        &self.specs[kind]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (KindId, &AntennaSpec)> {
        self.specs.iter().enumerate()
    }

    pub fn kinds(&self) -> std::ops::Range<KindId> {
        0..self.specs.len()
    }

    pub fn max_cost(&self) -> u64 {
        self.specs.iter().map(|s| s.cost).max().unwrap_or(0)
    }

    pub fn min_cost(&self) -> u64 {
        self.specs.iter().map(|s| s.cost).min().unwrap_or(0)
    }

    /// The type with the widest radius; ties go to the earlier entry.
    pub fn largest(&self) -> Option<KindId> {
        self.specs
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, s)| s.radius)
            .map(|(i, _)| i)
    }

    /// Kinds sorted by descending radius.
    pub fn by_radius_desc(&self) -> Vec<KindId> {
        let mut kinds: Vec<KindId> = self.kinds().collect();
        kinds.sort_by(|&a, &b| self.specs[b].radius.cmp(&self.specs[a].radius).then(a.cmp(&b)));
        kinds
    }
}
