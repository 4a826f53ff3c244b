//! Tool layer: registry, validation, the analytics query builder and dispatch.

pub mod analytics;
pub mod dispatch;
pub mod registry;
pub mod validate;

pub use dispatch::{Dispatcher, ToolResponse};
pub use registry::OperationDescriptor;
