use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonSchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonSchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonSchemaType::String => "string",
            JsonSchemaType::Number => "number",
            JsonSchemaType::Integer => "integer",
            JsonSchemaType::Boolean => "boolean",
            JsonSchemaType::Array => "array",
            JsonSchemaType::Object => "object",
            JsonSchemaType::Null => "null",
        }
    }
}

/// Where and why an argument value failed its schema.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    #[serde(rename = "type")]
    pub schema_type: JsonSchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ToolParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ToolParameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl ToolParameter {
    fn of(schema_type: JsonSchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            default: None,
            enum_values: None,
            items: None,
            properties: None,
            required: None,
        }
    }

    pub fn string() -> Self {
        Self::of(JsonSchemaType::String)
    }

    pub fn number() -> Self {
        Self::of(JsonSchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of(JsonSchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(JsonSchemaType::Boolean)
    }

    pub fn array(items: ToolParameter) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(JsonSchemaType::Array)
        }
    }

    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            required: Some(vec![]),
            ..Self::of(JsonSchemaType::Object)
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, param: ToolParameter) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), param);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    fn has_required(&self) -> bool {
        self.required.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Checks `value` against this schema.
    ///
    /// A `null` argument is accepted for an object schema that requires nothing,
    /// since several providers send `null` for a call without arguments.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        if value.is_null() && self.schema_type == JsonSchemaType::Object && !self.has_required() {
            return Ok(());
        }
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> Result<(), SchemaViolation> {
        match (self.schema_type, value) {
            (JsonSchemaType::String, Value::String(_))
            | (JsonSchemaType::Boolean, Value::Bool(_))
            | (JsonSchemaType::Number, Value::Number(_))
            | (JsonSchemaType::Null, Value::Null) => {}
            (JsonSchemaType::Integer, Value::Number(n)) => {
                let whole = n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
                if !whole {
                    return Err(SchemaViolation::new(path, format!("expected integer, got {}", n)));
                }
            }
            (JsonSchemaType::Array, Value::Array(items)) => {
                if let Some(item_schema) = &self.items {
                    for (i, item) in items.iter().enumerate() {
                        item_schema.validate_at(&format!("{}[{}]", path, i), item)?;
                    }
                }
            }
            (JsonSchemaType::Object, Value::Object(map)) => {
                for name in self.required.iter().flatten() {
                    if map.get(name).map_or(true, Value::is_null) {
                        return Err(SchemaViolation::new(
                            path,
                            format!("missing required property '{}'", name),
                        ));
                    }
                }
                if let Some(props) = &self.properties {
                    for (name, field) in map {
                        if field.is_null() {
                            continue;
                        }
                        if let Some(schema) = props.get(name) {
                            schema.validate_at(&format!("{}.{}", path, name), field)?;
                        }
                    }
                }
            }
            (expected, other) => {
                return Err(SchemaViolation::new(
                    path,
                    format!("expected {}, got {}", expected.as_str(), json_type_name(other)),
                ));
            }
        }

        if let Some(allowed) = &self.enum_values {
            if !allowed.contains(value) {
                return Err(SchemaViolation::new(
                    path,
                    format!("{} is not one of {}", value, Value::Array(allowed.clone())),
                ));
            }
        }

        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The descriptor advertised to the model for one tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameter,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameter::object(),
        }
    }

    pub fn with_parameters(mut self, params: ToolParameter) -> Self {
        self.parameters = params;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, param: ToolParameter) -> Self {
        self.parameters = self.parameters.with_property(name, param);
        self
    }

    pub fn with_required_param(self, name: impl Into<String>, param: ToolParameter) -> Self {
        let name = name.into();
        self.with_param(name.clone(), param).require_param(name)
    }

    pub fn require_param(mut self, name: impl Into<String>) -> Self {
        self.parameters = self.parameters.with_required(name);
        self
    }

    pub fn validate_arguments(&self, arguments: &Value) -> Result<(), SchemaViolation> {
        self.parameters.validate(arguments)
    }
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fee_tool() -> ToolDefinition {
        ToolDefinition::new("add_fee", "Adds a 30% fee to an amount")
            .with_required_param("amount", ToolParameter::number().with_description("Base amount"))
            .with_param(
                "currency",
                ToolParameter::string().with_enum(vec![json!("USD"), json!("EUR")]),
            )
    }

    #[test]
    fn test_tool_definition() {
        let tool = fee_tool();
        let props = tool.parameters.properties.as_ref().unwrap();
        assert!(props.contains_key("amount"));
        assert!(props.contains_key("currency"));
        assert_eq!(tool.parameters.required.as_ref().unwrap(), &vec!["amount".to_string()]);
    }

    #[test]
    fn test_schema_serializes_as_json_schema() {
        let value = serde_json::to_value(fee_tool().parameters).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["amount"]["type"], "number");
        assert_eq!(value["required"][0], "amount");
    }

    #[test]
    fn test_validate_accepts_good_arguments() {
        let tool = fee_tool();
        assert!(tool.validate_arguments(&json!({"amount": 100})).is_ok());
        assert!(tool.validate_arguments(&json!({"amount": 2.5, "currency": "EUR"})).is_ok());
        assert!(tool.validate_arguments(&json!({"amount": 1, "extra": true})).is_ok());
    }

    #[test]
    fn test_validate_missing_required() {
        let err = fee_tool().validate_arguments(&json!({})).unwrap_err();
        assert!(err.message.contains("amount"));
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = fee_tool().validate_arguments(&json!({"amount": "100"})).unwrap_err();
        assert_eq!(err.path, "$.amount");
        assert!(err.message.contains("expected number"));
    }

    #[test]
    fn test_validate_enum() {
        let err = fee_tool()
            .validate_arguments(&json!({"amount": 1, "currency": "GBP"}))
            .unwrap_err();
        assert_eq!(err.path, "$.currency");
    }

    #[test]
    fn test_validate_integer_and_array() {
        let schema = ToolParameter::object()
            .with_property("ids", ToolParameter::array(ToolParameter::integer()))
            .with_required("ids");
        assert!(schema.validate(&json!({"ids": [1, 2, 3.0]})).is_ok());
        let err = schema.validate(&json!({"ids": [1, 2.5]})).unwrap_err();
        assert_eq!(err.path, "$.ids[1]");
    }

    #[test]
    fn test_validate_null_arguments() {
        let no_args = ToolDefinition::new("ping", "No arguments");
        assert!(no_args.validate_arguments(&Value::Null).is_ok());
        assert!(fee_tool().validate_arguments(&Value::Null).is_err());
    }
}
