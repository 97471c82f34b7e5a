//! Weighted categorical tables.
//!
//! Every probability table in the catalog is an explicit list of
//! `(value, weight)` pairs validated to sum to 1.0 when it is built.
//! Draws go through [`choose`], the single weighted-choice helper.

use rand::Rng;

use crate::error::{SimError, SimResult};

/// Allowed deviation of a table's weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64)>,
}

impl<T> WeightedTable<T> {
    /// Build a table, rejecting empty tables, negative or non-finite
    /// weights, and weights that do not sum to 1.0.
    pub fn new(entries: Vec<(T, f64)>) -> SimResult<Self> {
        let table = Self { entries };
        table.check()?;
        Ok(table)
    }

    /// Re-run the construction checks.
    pub fn check(&self) -> SimResult<()> {
        if self.entries.is_empty() {
            return Err(SimError::Configuration {
                message: "weighted table is empty".into(),
            });
        }
        if let Some((_, w)) = self.entries.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(SimError::Configuration {
                message: format!("invalid weight {w}"),
            });
        }
        let total: f64 = self.entries.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(SimError::Configuration {
                message: format!("weights sum to {total}, expected 1.0"),
            });
        }
        Ok(())
    }

    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(v, _)| v)
    }

    /// Weight attached to the first entry equal to `value`.
    pub fn weight_of(&self, value: &T) -> Option<f64>
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, w)| *w)
    }

    /// Draw one value.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        // Non-empty by construction.
        let last = self.entries.len() - 1;
        choose(&self.entries, rng).unwrap_or(&self.entries[last].0)
    }
}

/// Weighted draw over an arbitrary `(value, weight)` slice.
///
/// Weights need not be normalized. Returns `None` for an empty slice or
/// when every weight is zero.
pub fn choose<'a, T, R: Rng + ?Sized>(entries: &'a [(T, f64)], rng: &mut R) -> Option<&'a T> {
    let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.random::<f64>() * total;
    for (value, weight) in entries {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(value);
        }
        roll -= weight;
    }
    // Floating point leftovers land on the last non-zero entry.
    entries
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(v, _)| v)
}
