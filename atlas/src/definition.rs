use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// AtlasDefinition is the document form of an atlas, e.g.
// { "name": "Square", "shapes": { "S": { "angles": [90, 90, 90, 90] } }, "vertices": [{ "vertex": "S0-S0-S0-S0" }] }
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub shapes: IndexMap<String, ShapeDefinition>,
    #[serde(default)]
    pub vertices: Option<Vec<VertexDefinition>>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub angles: Vec<f64>,
    #[serde(default)]
    pub sides: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub color_patterns: Option<Vec<Vec<Vec<usize>>>>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub vertex: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_deserialize() {
        let definition: AtlasDefinition = serde_json::from_value(json!({
            "name": "Cairo",
            "shapes": {
                "P": {
                    "name": "pentagon",
                    "angles": [120, 120, 90, 120, 90],
                    "sides": [0.732, 1, 1, 1, null],
                    "frequency": 2,
                    "colorPatterns": [[[0, 1, 2, 3, 4]], [[0, 0, 0, 0, 0]]]
                }
            },
            "vertices": [{ "name": "a", "vertex": "P0-P3-P1" }]
        })).unwrap();

        assert_eq!(Some(String::from("Cairo")), definition.name);
        let pentagon = &definition.shapes["P"];
        assert_eq!(Some(vec![Some(0.732), Some(1.), Some(1.), Some(1.), None]), pentagon.sides);
        assert_eq!(Some(2.), pentagon.frequency);
        assert_eq!(2, pentagon.color_patterns.as_ref().unwrap().len());
        assert_eq!("P0-P3-P1", definition.vertices.unwrap()[0].vertex);
    }

    #[test]
    fn test_definition_keeps_shape_order() {
        let definition: AtlasDefinition = serde_json::from_str(r#"{
            "shapes": {
                "T": { "angles": [60, 60, 60] },
                "S": { "angles": [90, 90, 90, 90] }
            }
        }"#).unwrap();
        assert_eq!(vec!["T", "S"], definition.shapes.keys().collect::<Vec<_>>());
        assert_eq!(None, definition.vertices);
        assert_eq!(None, definition.name);
    }
}
