//! HCDP tool client.
//!
//! Keep the public surface small: build an [`HcdpClient`], list tools, call
//! tools. Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod composite;
pub mod core;
pub mod error_translation;
pub mod normalize;

pub use builder::HcdpClientBuilder;
pub use core::HcdpClient;
pub use error_translation::{translate, ToolError};
pub use normalize::normalize;
