mod schema;

pub use schema::{JsonSchemaType, SchemaViolation, ToolDefinition, ToolParameter};
