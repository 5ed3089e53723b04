pub mod error;
pub mod executor;
pub mod registry;
pub mod traits;
#[cfg(feature = "builtin")]
pub mod builtin;

pub use error::{Result, ToolError};
pub use executor::ToolExecutor;
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use traits::{FunctionTool, Tool, ToolOutput};

#[cfg(feature = "builtin")]
pub use builtin::{builtin_tools, create_default_registry, register_all, ConvertUnitsTool};

#[cfg(feature = "http")]
pub use builtin::{WebSearchTool, WikipediaTool};

pub mod prelude {
    pub use crate::error::{Result, ToolError};
    pub use crate::executor::ToolExecutor;
    pub use crate::registry::{ToolRegistry, ToolRegistryBuilder};
    pub use crate::traits::{FunctionTool, Tool, ToolOutput};

    #[cfg(feature = "builtin")]
    pub use crate::builtin::{builtin_tools, create_default_registry, register_all, ConvertUnitsTool};

    #[cfg(feature = "http")]
    pub use crate::builtin::{WebSearchTool, WikipediaTool};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "http")]
    #[test]
    fn test_create_default_registry() {
        let registry = create_default_registry().unwrap();
        assert_eq!(registry.names(), vec!["web_search", "wikipedia", "convert_units"]);
    }

    #[cfg(feature = "builtin")]
    #[tokio::test]
    async fn test_executor_with_builtin() {
        use parley_core::Context;
        use std::sync::Arc;

        let registry = Arc::new(create_default_registry().unwrap());
        let executor = ToolExecutor::new(registry);

        let output = executor
            .execute(
                &Context::new(),
                "convert_units",
                serde_json::json!({"value": 1, "from": "km", "to": "m"}),
            )
            .await
            .unwrap();

        assert_eq!(output.content, "1 km = 1000 m");
    }

    #[cfg(feature = "builtin")]
    #[test]
    fn test_register_all_rejects_second_pass() {
        let mut builder = ToolRegistry::builder();
        register_all(&mut builder).unwrap();
        assert!(matches!(
            register_all(&mut builder),
            Err(ToolError::AlreadyRegistered(_))
        ));
    }
}
