//! Fixed category-to-color tables.

use std::collections::HashMap;
use std::hash::Hash;

use super::{Color, LegendEntry};

/// Explicit mapping from categories to colors.
///
/// Lookups of categories missing from the table resolve to the `unknown`
/// color. The legend keeps declaration order.
#[derive(Debug, Clone)]
pub struct CategoricalColorMap<K> {
    entries: Vec<LegendEntry<K>>,
    index: HashMap<K, usize>,
    unknown: Color,
}

impl<K: Copy + Eq + Hash> CategoricalColorMap<K> {
    pub fn new(unknown: Color) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            unknown,
        }
    }

    /// Builds a map from `(category, color)` pairs; later duplicates win.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, Color)>, unknown: Color) -> Self {
        let mut map = Self::new(unknown);
        for (key, color) in pairs {
            map.insert(key, color);
        }
        map
    }

    /// Sets the color of a category, keeping its legend position if present.
    pub fn insert(&mut self, key: K, color: Color) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].color = color,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(LegendEntry::new(key, color));
            }
        }
    }

    pub fn color_for(&self, key: K) -> Color {
        self.index
            .get(&key)
            .map(|&i| self.entries[i].color)
            .unwrap_or(self.unknown)
    }

    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    pub fn unknown_color(&self) -> Color {
        self.unknown
    }

    /// Full known-category table in declaration order.
    pub fn legend(&self) -> &[LegendEntry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq> PartialEq for CategoricalColorMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.unknown == other.unknown && self.entries == other.entries
    }
}
