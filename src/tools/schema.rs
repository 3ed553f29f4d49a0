//! JSON schema helpers for tool parameters

use serde_json::{json, Map, Value};

/// Start an object schema
pub fn object_schema() -> SchemaBuilder {
    SchemaBuilder::default()
}

/// Schema for a tool that takes no arguments
pub fn no_params() -> Value {
    object_schema().build()
}

pub fn string_prop(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn integer_prop(description: &str) -> Value {
    json!({
        "type": "integer",
        "description": description
    })
}

/// True when `schema` is an object schema whose `properties` (if any) is a map
pub fn is_object_schema(schema: &Value) -> bool {
    let Some(obj) = schema.as_object() else {
        return false;
    };
    if obj.get("type").and_then(Value::as_str) != Some("object") {
        return false;
    }
    obj.get("properties").map_or(true, Value::is_object)
}

/// Builder for a tool's parameter schema
#[derive(Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    pub fn property(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required
        })
    }
}
