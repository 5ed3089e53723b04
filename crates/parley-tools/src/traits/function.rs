use super::tool::{Tool, ToolOutput};
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use parley_core::{Context, ToolDefinition};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Handler = Arc<dyn Fn(Value) -> Result<ToolOutput> + Send + Sync>;

/// A tool made of an explicit descriptor and a plain synchronous function.
#[derive(Clone)]
pub struct FunctionTool {
    def: ToolDefinition,
    handler: Handler,
}

impl FunctionTool {
    pub fn new<F>(def: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value) -> Result<ToolOutput> + Send + Sync + 'static,
    {
        Self {
            def,
            handler: Arc::new(handler),
        }
    }

    /// Deserializes the arguments into `A` before calling `handler`.
    ///
    /// Arguments that pass the schema but do not fit `A` are reported as
    /// `InvalidArguments`. An `Err(String)` from the handler becomes `Execution`.
    pub fn typed<A, F>(def: ToolDefinition, handler: F) -> Self
    where
        A: DeserializeOwned,
        F: Fn(A) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        let name = def.name.clone();
        Self::new(def, move |input| {
            let args: A = serde_json::from_value(input)
                .map_err(|e| ToolError::invalid_arguments(&name, e.to_string()))?;
            handler(args)
                .map(ToolOutput::text)
                .map_err(|message| ToolError::execution(&name, message))
        })
    }
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.def.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn definition(&self) -> &ToolDefinition {
        &self.def
    }

    async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
        (self.handler)(input)
    }
}
