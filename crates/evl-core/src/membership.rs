//! County membership table: which counties belong to which state.

use std::collections::{HashMap, HashSet};

use crate::geography::GeographyKey;

/// Counties of one state, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipEntry {
    pub state: String,
    /// Display names with the trailing `" County"` removed.
    pub counties: Vec<String>,
    /// Normalized keys, parallel to `counties`.
    pub keys: Vec<GeographyKey>,
    key_set: HashSet<GeographyKey>,
}

impl MembershipEntry {
    pub fn contains(&self, key: &GeographyKey) -> bool {
        self.key_set.contains(key)
    }
}

/// Immutable state name → counties mapping, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct CountyMembership {
    entries: Vec<MembershipEntry>,
    by_state: HashMap<String, usize>,
    by_key: HashMap<GeographyKey, Vec<usize>>,
}

/// Drop the `" County"` suffix the raw table carries.
pub fn strip_county_suffix(name: &str) -> &str {
    name.strip_suffix(" County").unwrap_or(name)
}

impl CountyMembership {
    /// Build the table; duplicate counties within a state are kept once.
    pub fn new<I, S, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let mut table = CountyMembership::default();
        for (state, counties) in entries {
            let state = state.into();
            let mut entry = MembershipEntry {
                state: state.clone(),
                counties: Vec::new(),
                keys: Vec::new(),
                key_set: HashSet::new(),
            };
            for raw in counties {
                let display = strip_county_suffix(raw.as_ref().trim());
                let key = GeographyKey::from_label(display);
                if key.is_empty() || !entry.key_set.insert(key.clone()) {
                    continue;
                }
                entry.counties.push(display.to_string());
                entry.keys.push(key);
            }

            let idx = table.entries.len();
            for key in &entry.keys {
                table.by_key.entry(key.clone()).or_default().push(idx);
            }
            table.by_state.insert(state.to_lowercase(), idx);
            table.entries.push(entry);
        }
        table
    }

    /// Entry for a state name (case-insensitive).
    pub fn entry(&self, state: &str) -> Option<&MembershipEntry> {
        self.by_state
            .get(&state.trim().to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    pub fn counties(&self, state: &str) -> Option<&[String]> {
        self.entry(state).map(|e| e.counties.as_slice())
    }

    pub fn keys(&self, state: &str) -> Option<&[GeographyKey]> {
        self.entry(state).map(|e| e.keys.as_slice())
    }

    pub fn contains(&self, state: &str, key: &GeographyKey) -> bool {
        self.entry(state).is_some_and(|e| e.contains(key))
    }

    /// Names of every state whose entry lists `key`.
    pub fn states_containing(&self, key: &GeographyKey) -> Vec<&str> {
        self.by_key
            .get(key)
            .map(|idxs| {
                idxs.iter()
                    .map(|&idx| self.entries[idx].state.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[MembershipEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
