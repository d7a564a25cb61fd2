//! Shared result types.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ToolResult`] | Uniform envelope returned by every tool |
//! | [`ContentBlock`] | Text or binary-summary piece of a result |

pub mod tool;

pub use tool::{ContentBlock, ToolResult, NO_DATA_TEXT};
