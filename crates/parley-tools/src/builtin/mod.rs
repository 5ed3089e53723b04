mod convert;
#[cfg(feature = "http")]
mod search;
#[cfg(feature = "http")]
mod wikipedia;

pub use convert::ConvertUnitsTool;
#[cfg(feature = "http")]
pub use search::WebSearchTool;
#[cfg(feature = "http")]
pub use wikipedia::WikipediaTool;

use crate::error::Result;
use crate::registry::{ToolRegistry, ToolRegistryBuilder};
use crate::traits::Tool;
use std::sync::Arc;

/// Every built-in tool, in advertisement order.
pub fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

    #[cfg(feature = "http")]
    {
        tools.push(Arc::new(WebSearchTool::new()));
        tools.push(Arc::new(WikipediaTool::new()));
    }

    tools.push(Arc::new(ConvertUnitsTool::new()));
    tools
}

pub fn register_all(builder: &mut ToolRegistryBuilder) -> Result<()> {
    for tool in builtin_tools() {
        builder.register(tool)?;
    }
    Ok(())
}

pub fn create_default_registry() -> Result<ToolRegistry> {
    let mut builder = ToolRegistry::builder();
    register_all(&mut builder)?;
    Ok(builder.build())
}
