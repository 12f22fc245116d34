//! Column resolution for demand tables.
//!
//! Each projection year ships with its own header spelling. A [`DemandSchema`]
//! lists the accepted aliases per logical field and resolves them against a
//! header row once, before any data row is read.

use csv::StringRecord;

use crate::error::{LoadError, LoadResult};

/// Accepted header spellings for each logical field.
#[derive(Debug, Clone)]
pub struct DemandSchema {
    pub geography: Vec<String>,
    pub hour: Vec<String>,
    pub demand: Vec<String>,
    pub state: Vec<String>,
    pub year: Vec<String>,
}

impl Default for DemandSchema {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }
        Self {
            geography: owned(&["Geography Name", "County", "County Name", "geography"]),
            hour: owned(&["Hour", "Hour of Day", "hour_of_day", "hr"]),
            demand: owned(&[
                "Avg Power Demand (kW)",
                "Average Power Demand (kW)",
                "avg_demand_kw",
                "Demand (kW)",
            ]),
            state: owned(&["State", "State Code", "state_code"]),
            year: owned(&["Year", "year"]),
        }
    }
}

/// Column indices resolved against one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub geography: usize,
    pub hour: usize,
    pub demand: usize,
    pub state: Option<usize>,
    pub year: Option<usize>,
}

fn find(headers: &StringRecord, aliases: &[String]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(alias.trim()))
    })
}

impl DemandSchema {
    /// Resolve every required field; the first missing one is a fatal error.
    pub fn resolve(&self, headers: &StringRecord, origin: &str) -> LoadResult<ResolvedColumns> {
        let required = |column: &'static str, aliases: &[String]| {
            find(headers, aliases).ok_or_else(|| LoadError::MissingColumn {
                origin: origin.to_string(),
                column,
                accepted: aliases.join(", "),
            })
        };
        Ok(ResolvedColumns {
            geography: required("geography", &self.geography)?,
            hour: required("hour", &self.hour)?,
            demand: required("demand", &self.demand)?,
            state: find(headers, &self.state),
            year: find(headers, &self.year),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_case_insensitively() {
        let headers = StringRecord::from(vec![" geography name ", "HOUR", "avg power demand (kw)"]);
        let cols = DemandSchema::default().resolve(&headers, "t.csv").unwrap();
        assert_eq!(
            cols,
            ResolvedColumns {
                geography: 0,
                hour: 1,
                demand: 2,
                state: None,
                year: None
            }
        );
    }

    #[test]
    fn test_optional_columns_found() {
        let headers = StringRecord::from(vec!["Year", "State", "County", "hour_of_day", "avg_demand_kw"]);
        let cols = DemandSchema::default().resolve(&headers, "t.csv").unwrap();
        assert_eq!(cols.year, Some(0));
        assert_eq!(cols.state, Some(1));
        assert_eq!(cols.geography, 2);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let headers = StringRecord::from(vec!["Geography Name", "Hour"]);
        let err = DemandSchema::default().resolve(&headers, "t.csv").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { column: "demand", .. }
        ));
    }
}
