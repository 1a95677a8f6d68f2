use serde_json::{Map, Value};

/// A node or edge decoded from a `TO_JSON(...)` column value.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphElement {
    /// A vertex with its labels and properties.
    Node {
        /// Stringified `identifier`.
        id: String,
        /// Labels in declared order; the first one is the category.
        labels: Vec<String>,
        /// Vertex properties.
        properties: Map<String, Value>,
    },
    /// A directed edge between two vertex identifiers.
    Edge {
        /// Stringified `identifier`.
        id: String,
        /// Stringified `source_node_identifier`.
        source: String,
        /// Stringified `destination_node_identifier`.
        target: String,
        /// Labels in declared order; the first one is the relation type.
        labels: Vec<String>,
        /// Edge properties.
        properties: Map<String, Value>,
    },
}

impl GraphElement {
    /// Classify a column value.
    ///
    /// Returns `None` for scalars, arrays and objects without `identifier`.
    /// An object carrying `source_node_identifier` is an edge, any other
    /// identified object is a node.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let id = stringify_id(object.get("identifier")?);
        let labels = labels_of(object);
        let properties = object
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        match object.get("source_node_identifier") {
            Some(source) => Some(GraphElement::Edge {
                id,
                source: stringify_id(source),
                target: object
                    .get("destination_node_identifier")
                    .map(stringify_id)
                    .unwrap_or_default(),
                labels,
                properties,
            }),
            None => Some(GraphElement::Node {
                id,
                labels,
                properties,
            }),
        }
    }

    /// Identifier of the element.
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node { id, .. } | GraphElement::Edge { id, .. } => id,
        }
    }
}

/// Strings are used verbatim; anything else by its JSON text.
pub(crate) fn stringify_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn labels_of(object: &Map<String, Value>) -> Vec<String> {
    object
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| labels.iter().map(stringify_id).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_node_from_value() {
        let value = json!({
            "identifier": "W1",
            "labels": ["Warehouses"],
            "properties": {"Name": "Central"}
        });

        match GraphElement::from_value(&value) {
            Some(GraphElement::Node { id, labels, properties }) => {
                assert_eq!(id, "W1");
                assert_eq!(labels, vec!["Warehouses".to_string()]);
                assert_eq!(properties["Name"], json!("Central"));
            }
            other => panic!("expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_from_value() {
        let value = json!({
            "identifier": "E1",
            "source_node_identifier": "W1",
            "destination_node_identifier": "S1",
            "labels": ["DISPATCHED"],
            "properties": {}
        });

        assert_eq!(
            GraphElement::from_value(&value),
            Some(GraphElement::Edge {
                id: "E1".to_string(),
                source: "W1".to_string(),
                target: "S1".to_string(),
                labels: vec!["DISPATCHED".to_string()],
                properties: Map::new(),
            })
        );
    }

    #[test]
    fn test_non_elements_are_ignored() {
        assert_eq!(GraphElement::from_value(&json!(42)), None);
        assert_eq!(GraphElement::from_value(&json!("W1")), None);
        assert_eq!(GraphElement::from_value(&json!([{"identifier": "W1"}])), None);
        assert_eq!(GraphElement::from_value(&json!({"labels": ["Orphan"]})), None);
    }

    #[test]
    fn test_numeric_identifiers_are_stringified() {
        let value = json!({"identifier": 17, "labels": []});
        let element = GraphElement::from_value(&value).unwrap();
        assert_eq!(element.id(), "17");
    }

    #[test]
    fn test_missing_labels_and_properties_default_to_empty() {
        let value = json!({"identifier": "C9"});
        assert_eq!(
            GraphElement::from_value(&value),
            Some(GraphElement::Node {
                id: "C9".to_string(),
                labels: vec![],
                properties: Map::new(),
            })
        );
    }
}
