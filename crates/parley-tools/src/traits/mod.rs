mod function;
mod tool;

pub use function::FunctionTool;
pub use tool::{Tool, ToolOutput};
