//! Tool catalog: what the host sees in `tools/list`.

use super::endpoints::TOOLS;
use super::schema::{FieldKind, FieldSpec, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub title: String,
    pub description: String,
    /// JSON Schema (draft-07) of the accepted arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn from_spec(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.to_string(),
            title: spec.title.to_string(),
            description: spec.description.to_string(),
            input_schema: input_schema(spec),
        }
    }
}

/// Every tool, in catalog order.
pub fn list_tools() -> Vec<ToolDescriptor> {
    TOOLS.iter().map(ToolDescriptor::from_spec).collect()
}

/// Derive the input schema from the field descriptors.
///
/// Enum lists only name canonical values; aliases are still accepted by the
/// validator, so aliased fields advertise the list as examples instead.
pub fn input_schema(spec: &ToolSpec) -> Value {
    let properties: Map<String, Value> = spec
        .fields
        .iter()
        .map(|f| (f.name.to_string(), property(f)))
        .collect();
    let required: Vec<&str> = spec.required_fields().collect();
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn property(field: &FieldSpec) -> Value {
    let mut prop = Map::new();
    let description = match field.default {
        Some(default) => format!("{} (default: {})", field.description, default),
        None => field.description.to_string(),
    };
    match field.kind {
        FieldKind::Enum { values, alias: None } => {
            prop.insert("type".into(), json!(["string", "null"]));
            prop.insert("enum".into(), json!(values.iter().copied().map(Some).chain([None]).collect::<Vec<_>>()));
        }
        FieldKind::Enum { values, alias: Some(_) } => {
            prop.insert("type".into(), json!(["string", "null"]));
            prop.insert("examples".into(), json!(values));
        }
        FieldKind::Latitude | FieldKind::Longitude => {
            prop.insert("type".into(), json!(["number", "string", "null"]));
        }
        FieldKind::Integer { min } => {
            prop.insert("type".into(), json!(["integer", "string", "null"]));
            prop.insert("minimum".into(), json!(min));
        }
        FieldKind::Bool => {
            prop.insert("type".into(), json!(["boolean", "string", "null"]));
        }
        FieldKind::List => {
            prop.insert("type".into(), json!(["string", "array", "null"]));
            prop.insert("items".into(), json!({"type": "string"}));
        }
        FieldKind::Filter => {
            prop.insert("type".into(), json!(["string", "object", "array"]));
        }
        FieldKind::Date(format) => {
            let types = match format {
                super::schema::DateFormat::Year => json!(["string", "integer", "null"]),
                _ => json!(["string", "null"]),
            };
            prop.insert("type".into(), types);
            prop.insert("pattern".into(), json!(date_pattern(format)));
        }
        FieldKind::Text | FieldKind::Email => {
            prop.insert("type".into(), json!([field.kind.json_type(), "null"]));
        }
    }
    prop.insert("description".into(), Value::String(description));
    Value::Object(prop)
}

fn date_pattern(format: super::schema::DateFormat) -> &'static str {
    use super::schema::DateFormat;
    match format {
        DateFormat::Day => r"^\d{4}-\d{2}-\d{2}$",
        DateFormat::Month => r"^\d{4}-\d{2}$",
        DateFormat::MonthOrDay => r"^\d{4}-\d{2}(-\d{2})?$",
        DateFormat::Year => r"^\d{4}$",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_tool() {
        let tools = list_tools();
        assert_eq!(tools.len(), TOOLS.len());
        assert_eq!(tools[0].name, "get_climate_raster");
    }

    #[test]
    fn test_schema_shape() {
        let raster = list_tools().into_iter().find(|t| t.name == "get_climate_raster").unwrap();
        let schema = raster.input_schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["datatype", "date", "extent"]));
        assert_eq!(schema["properties"]["production"]["enum"], json!(["new", "legacy", null]));
        assert!(schema["properties"]["extent"]["examples"].is_array());
    }

    #[test]
    fn test_serializes_input_schema_key() {
        let v = serde_json::to_value(ToolDescriptor::from_spec(&TOOLS[0])).unwrap();
        assert!(v.get("inputSchema").is_some());
        assert!(v.get("input_schema").is_none());
    }
}
