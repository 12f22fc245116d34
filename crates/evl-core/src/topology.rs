//! Boundary topology identifiers.
//!
//! Geometry itself stays with the rendering library; the atlas only needs
//! the two feature layers, their ids and names. County ids carry their
//! state's 2-digit FIPS id as a prefix.

use serde::{Deserialize, Serialize};

use crate::geography::GeographyKey;

/// Feature layers of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    State,
    County,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::State => write!(f, "state"),
            Layer::County => write!(f, "county"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFeature {
    /// 2-digit FIPS id.
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyFeature {
    /// 5-digit FIPS id.
    pub id: String,
    pub name: String,
}

impl CountyFeature {
    /// Id of the containing state.
    pub fn state_id(&self) -> &str {
        self.id.get(..2).unwrap_or(&self.id)
    }

    pub fn geography_key(&self) -> GeographyKey {
        GeographyKey::from_label(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub states: Vec<StateFeature>,
    pub counties: Vec<CountyFeature>,
}

impl Topology {
    pub fn state(&self, id: &str) -> Option<&StateFeature> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn state_by_name(&self, name: &str) -> Option<&StateFeature> {
        self.states
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn county(&self, id: &str) -> Option<&CountyFeature> {
        self.counties.iter().find(|c| c.id == id)
    }

    /// Counties whose id starts with the state's id.
    pub fn counties_in_state<'a>(
        &'a self,
        state_id: &'a str,
    ) -> impl Iterator<Item = &'a CountyFeature> + 'a {
        self.counties
            .iter()
            .filter(move |c| c.state_id() == state_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topo() -> Topology {
        Topology {
            states: vec![
                StateFeature {
                    id: "48".into(),
                    name: "Texas".into(),
                },
                StateFeature {
                    id: "08".into(),
                    name: "Colorado".into(),
                },
            ],
            counties: vec![
                CountyFeature {
                    id: "48453".into(),
                    name: "Travis".into(),
                },
                CountyFeature {
                    id: "48001".into(),
                    name: "Anderson".into(),
                },
                CountyFeature {
                    id: "08001".into(),
                    name: "Adams".into(),
                },
            ],
        }
    }

    #[test]
    fn test_counties_in_state_by_prefix() {
        let topo = topo();
        let ids: Vec<_> = topo.counties_in_state("48").map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["48453", "48001"]);
        assert_eq!(topo.counties_in_state("08").count(), 1);
        assert_eq!(topo.counties_in_state("06").count(), 0);
    }

    #[test]
    fn test_lookup() {
        let topo = topo();
        assert_eq!(topo.state_by_name("texas").map(|s| s.id.as_str()), Some("48"));
        assert_eq!(topo.county("08001").map(|c| c.state_id()), Some("08"));
        assert_eq!(
            topo.county("48453").map(|c| c.geography_key()),
            Some(GeographyKey::from_label("travis"))
        );
    }
}
