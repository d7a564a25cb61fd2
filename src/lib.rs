//! # hcdp-mcp
//!
//! Tool adapter for the Hawaii Climate Data Portal (HCDP) API.
//!
//! Loosely specified tool arguments (island names, date strings, coordinates
//! as strings or numbers, datatype aliases) are validated against static
//! per-tool descriptors, built into HTTP requests against the HCDP API, and
//! the heterogeneous responses (GeoTIFF rasters, JSON arrays and objects,
//! plain text) are normalized into one tool-result envelope. The crate ships
//! an MCP stdio server exposing the tools to AI-agent hosts.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hcdp_mcp::{HcdpClient, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = HcdpClient::builder().api_token("your-token").build()?;
//!     let result = client
//!         .call_tool(
//!             "get_timeseries_data",
//!             json!({"datatype": "rainfall", "start": "2023-01-01", "end": "2023-12-31",
//!                    "extent": "Big Island", "lat": "19.7167", "lng": -155.08,
//!                    "production": "new", "period": "month"}),
//!         )
//!         .await;
//!     println!("{:?}", result);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Tool descriptors, validation, request building, catalog |
//! | [`transport`] | Transport trait and reqwest implementation |
//! | [`client`] | Client facade, normalizer, error translation, composite tools |
//! | [`mcp`] | JSON-RPC stdio server |
//! | [`types`] | Tool-result envelope |
//! | [`config`] | Environment-driven configuration |

pub mod client;
pub mod config;
pub mod error_code;
pub mod mcp;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{HcdpClient, HcdpClientBuilder, ToolError};
pub use config::Config;
pub use error_code::ToolErrorKind;
pub use mcp::McpServer;
pub use types::{ContentBlock, ToolResult};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
