//! TopoJSON feature index loader.
//!
//! Only ids and names of the `states` and `counties` objects are read;
//! arcs and transforms stay with the rendering library.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use evl_core::{CountyFeature, StateFeature, Topology};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LoadError, LoadResult};

#[derive(Deserialize)]
struct RawTopology {
    objects: HashMap<String, RawCollection>,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(default)]
    geometries: Vec<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    id: Option<Value>,
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Deserialize)]
struct RawProperties {
    name: Option<String>,
}

pub fn load_topology(path: &Path) -> LoadResult<Topology> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_topology(BufReader::new(file), &path.display().to_string())
}

pub fn parse_topology<R: Read>(reader: R, origin: &str) -> LoadResult<Topology> {
    let mut raw: RawTopology = serde_json::from_reader(reader).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let mut take = |object: &str| {
        raw.objects
            .remove(object)
            .ok_or_else(|| LoadError::MissingObject {
                origin: origin.to_string(),
                object: object.to_string(),
            })
    };
    let states = take("states")?;
    let counties = take("counties")?;

    let states: Vec<StateFeature> = features(states, 2)
        .map(|(id, name)| StateFeature { id, name })
        .collect();
    let counties: Vec<CountyFeature> = features(counties, 5)
        .map(|(id, name)| CountyFeature { id, name })
        .collect();

    if states.is_empty() {
        return Err(LoadError::Malformed {
            origin: origin.to_string(),
            message: "topology contains no identifiable states".to_string(),
        });
    }

    tracing::debug!(
        origin,
        states = states.len(),
        counties = counties.len(),
        "topology loaded"
    );
    Ok(Topology { states, counties })
}

/// `(id, name)` pairs; features without an id are dropped.
fn features(collection: RawCollection, width: usize) -> impl Iterator<Item = (String, String)> {
    collection.geometries.into_iter().filter_map(move |geometry| {
        let id = match geometry.id? {
            Value::String(s) => s,
            Value::Number(n) => format!("{:0>width$}", n.as_u64()?),
            _ => return None,
        };
        let name = geometry
            .properties
            .and_then(|p| p.name)
            .unwrap_or_else(|| id.clone());
        Some((id, name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPO: &str = r#"{
        "type": "Topology",
        "objects": {
            "states": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "id": "48", "properties": {"name": "Texas"}, "arcs": [[0]]},
                {"type": "Polygon", "id": 6, "properties": {"name": "California"}, "arcs": [[1]]}
            ]},
            "counties": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "id": "48453", "properties": {"name": "Travis"}, "arcs": [[2]]},
                {"type": "Polygon", "id": 6037, "properties": {"name": "Los Angeles"}, "arcs": [[3]]},
                {"type": "Polygon", "arcs": [[4]]}
            ]},
            "nation": {"type": "GeometryCollection", "geometries": []}
        },
        "arcs": []
    }"#;

    #[test]
    fn test_ids_and_names() {
        let topo = parse_topology(TOPO.as_bytes(), "t.json").unwrap();
        assert_eq!(topo.states.len(), 2);
        assert_eq!(topo.states[1].id, "06");
        assert_eq!(topo.counties.len(), 2);
        assert_eq!(topo.counties[1].id, "06037");
        assert_eq!(topo.counties[1].state_id(), "06");
        assert_eq!(topo.counties_in_state("48").count(), 1);
    }

    #[test]
    fn test_missing_counties_object() {
        let json = r#"{"objects": {"states": {"geometries": []}}}"#;
        let err = parse_topology(json.as_bytes(), "t.json").unwrap_err();
        assert!(matches!(err, LoadError::MissingObject { ref object, .. } if object == "counties"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_topology("<svg/>".as_bytes(), "t.json").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }
}
