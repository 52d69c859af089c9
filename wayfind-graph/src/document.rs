//! Map document: the `{nodes, edges, floorLabels}` JSON exchanged with the
//! data loader and the editor.
//!
//! Node records are read leniently (numbers may arrive as strings or floats,
//! as they do from form posts and older exports) and converted into strict
//! [`Node`]s by [`NodeRecord::to_node`].

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use wayfind_common::{Error, Result};

use crate::node::{Access, Edge, Node, NodeKind};

/// Raw node as found in a map document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Value>,
}

impl NodeRecord {
    /// Validate and convert. `position` is only used in error messages.
    pub fn to_node(&self, position: usize) -> Result<Node> {
        let id = match self.id.as_ref() {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) if !other.is_null() && !other.is_string() => {
                return Err(Error::invalid(format!(
                    "node #{position} has a non-string id: {other}"
                )))
            }
            _ => return Err(missing(position, None, "id")),
        };

        let kind = match self.kind.as_ref() {
            None | Some(Value::Null) => return Err(missing(position, Some(&id), "type")),
            Some(Value::String(s)) => NodeKind::from_name(s).ok_or_else(|| {
                Error::invalid(format!("node '{id}' has unknown type '{s}'"))
            })?,
            Some(other) => {
                return Err(Error::invalid(format!(
                    "node '{id}' has unknown type {other}"
                )))
            }
        };

        let floor = required_int(self.floor.as_ref(), position, &id, "floor")?;
        let floor = u32::try_from(floor)
            .ok()
            .filter(|f| *f >= 1)
            .ok_or_else(|| Error::invalid(format!("node '{id}' has invalid floor {floor}")))?;

        let x = coordinate(self.x.as_ref(), position, &id, "x")?;
        let y = coordinate(self.y.as_ref(), position, &id, "y")?;

        let name = match self.name.as_ref() {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let access = match self.access.as_ref() {
            None | Some(Value::Null) => Access::All,
            Some(Value::String(s)) => Access::from_name(s).ok_or_else(|| {
                Error::invalid(format!("node '{id}' has unknown access '{s}'"))
            })?,
            Some(other) => {
                return Err(Error::invalid(format!(
                    "node '{id}' has unknown access {other}"
                )))
            }
        };

        Ok(Node {
            id,
            name,
            kind,
            floor,
            x,
            y,
            access,
        })
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: Some(Value::from(node.id.clone())),
            name: Some(Value::from(node.name.clone())),
            kind: Some(Value::from(node.kind.name())),
            floor: Some(Value::from(node.floor)),
            x: Some(Value::from(node.x)),
            y: Some(Value::from(node.y)),
            access: Some(Value::from(node.access.name())),
        }
    }
}

fn missing(position: usize, id: Option<&str>, field: &str) -> Error {
    match id {
        Some(id) => Error::invalid(format!("node '{id}' is missing required field '{field}'")),
        None => Error::invalid(format!("node #{position} is missing required field '{field}'")),
    }
}

/// Coerce a JSON value to an integer: integers as-is, finite floats and
/// numeric strings rounded to the nearest integer.
pub fn coerce_int(value: &Value) -> Option<i64> {
    fn from_float(f: f64) -> Option<i64> {
        let rounded = f.round();
        (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64)
            .then_some(rounded as i64)
    }

    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

fn required_int(value: Option<&Value>, position: usize, id: &str, field: &str) -> Result<i64> {
    let value = match value {
        None | Some(Value::Null) => return Err(missing(position, Some(id), field)),
        Some(v) => v,
    };
    coerce_int(value).ok_or_else(|| {
        Error::invalid(format!(
            "node '{id}' field '{field}' is not an integer: {value}"
        ))
    })
}

fn coordinate(value: Option<&Value>, position: usize, id: &str, field: &str) -> Result<i32> {
    let v = required_int(value, position, id, field)?;
    i32::try_from(v)
        .map_err(|_| Error::invalid(format!("node '{id}' field '{field}' is out of range: {v}")))
}

/// The full map document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<Edge>,
    /// Custom display labels keyed by floor number
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub floor_labels: BTreeMap<u32, String>,
}

impl MapDocument {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::invalid(format!("malformed map document: {e}")))
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::invalid(format!("malformed map document: {e}")))
    }

    /// Read a document from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::invalid(format!("cannot serialize map document: {e}")))
    }
}

/// Floor labels arrive either as an object keyed by floor (`{"1": "Ground"}`)
/// or, from exporters that write sparse arrays, as a list indexed by floor.
fn deserialize_labels<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<u32, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Labels {
        Map(BTreeMap<String, Option<String>>),
        List(Vec<Option<String>>),
    }

    let mut out = BTreeMap::new();
    match Option::<Labels>::deserialize(deserializer)? {
        None => {}
        Some(Labels::Map(map)) => {
            for (key, label) in map {
                let floor = key
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| {
                        <D::Error as de::Error>::custom(format!("invalid floor label key '{key}'"))
                    })?;
                if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
                    out.insert(floor, label);
                }
            }
        }
        Some(Labels::List(list)) => {
            for (floor, label) in list.into_iter().enumerate() {
                if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
                    let floor =
                        u32::try_from(floor).map_err(<D::Error as de::Error>::custom)?;
                    out.insert(floor, label);
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> NodeRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_coerce_int_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_int(&json!(12)), Some(12));
        assert_eq!(coerce_int(&json!(-3)), Some(-3));
        assert_eq!(coerce_int(&json!(12.6)), Some(13));
        assert_eq!(coerce_int(&json!("42")), Some(42));
        assert_eq!(coerce_int(&json!(" 7.4 ")), Some(7));
        assert_eq!(coerce_int(&json!("abc")), None);
        assert_eq!(coerce_int(&json!(true)), None);
        assert_eq!(coerce_int(&json!([1])), None);
    }

    #[test]
    fn test_record_to_node() {
        let node = record(json!({
            "id": "R-1-101", "name": "Room 101", "type": "room",
            "floor": "1", "x": 120.4, "y": 80, "access": null
        }))
        .to_node(0)
        .unwrap();

        assert_eq!(node.id, "R-1-101");
        assert_eq!(node.kind, NodeKind::Room);
        assert_eq!((node.floor, node.x, node.y), (1, 120, 80));
        assert_eq!(node.access, Access::All);
    }

    #[test]
    fn test_record_missing_fields_are_rejected() {
        for field in ["id", "type", "floor", "x", "y"] {
            let mut value = json!({"id": "H-1", "type": "hallway", "floor": 1, "x": 0, "y": 0});
            value.as_object_mut().unwrap().remove(field);
            let err = record(value).to_node(3).unwrap_err();
            assert!(
                err.to_string().contains(&format!("'{field}'")),
                "unexpected message for {field}: {err}"
            );
        }
    }

    #[test]
    fn test_record_bad_values_are_rejected() {
        let bad = [
            json!({"id": "A", "type": "lobby", "floor": 1, "x": 0, "y": 0}),
            json!({"id": "A", "type": "room", "floor": 0, "x": 0, "y": 0}),
            json!({"id": "A", "type": "room", "floor": 1, "x": "left", "y": 0}),
            json!({"id": "A", "type": "room", "floor": 1, "x": 0, "y": 0, "access": "vip"}),
            json!({"id": "", "type": "room", "floor": 1, "x": 0, "y": 0}),
        ];
        for value in bad {
            assert!(record(value.clone()).to_node(0).is_err(), "accepted {value}");
        }
    }

    #[test]
    fn test_document_reads_labels_in_both_shapes() {
        let doc = MapDocument::from_json_str(
            r#"{"nodes": [], "edges": [], "floorLabels": {"1": "Ground", "2": ""}}"#,
        )
        .unwrap();
        assert_eq!(doc.floor_labels.get(&1).map(String::as_str), Some("Ground"));
        assert!(!doc.floor_labels.contains_key(&2));

        let doc = MapDocument::from_json_str(
            r#"{"nodes": [], "edges": [], "floorLabels": [null, "Lobby", "Mezzanine"]}"#,
        )
        .unwrap();
        assert_eq!(doc.floor_labels.get(&2).map(String::as_str), Some("Mezzanine"));

        let doc = MapDocument::from_json_str(r#"{"nodes": [], "edges": []}"#).unwrap();
        assert!(doc.floor_labels.is_empty());
    }

    #[test]
    fn test_document_requires_nodes_and_edges() {
        assert!(MapDocument::from_json_str(r#"{"nodes": []}"#).is_err());
        assert!(MapDocument::from_json_str("not json").is_err());
    }

    #[test]
    fn test_document_ignores_floor_plans() {
        let doc = MapDocument::from_json_str(
            r#"{"nodes": [], "edges": [], "floorPlans": {"1": "data:image/png;base64,AAAA"}}"#,
        )
        .unwrap();
        assert!(doc.nodes.is_empty());
    }

    #[test]
    fn test_document_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(
            &path,
            r#"{"nodes": [{"id": "R-1", "type": "room", "floor": 1, "x": 1, "y": 2}], "edges": []}"#,
        )
        .unwrap();

        let doc = MapDocument::from_path(&path).unwrap();
        assert_eq!(doc.nodes.len(), 1);

        let missing = MapDocument::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, Error::Io(_)));
    }
}
