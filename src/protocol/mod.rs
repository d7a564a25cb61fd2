//! Request-construction layer: tool descriptors, argument validation and
//! HTTP request building.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Declarative field, rule and endpoint descriptor types |
//! | [`endpoints`] | The static tool table |
//! | [`alias`] | Extent and datatype alias resolution |
//! | [`locations`] | Cities, islands and sampling points for composite tools |
//! | [`validator`] | Generic argument validation |
//! | [`builder`] | Validated parameters to [`EndpointRequest`] |
//! | [`catalog`] | Tool catalog with JSON-schema input specifications |
//!
//! ```rust
//! use hcdp_mcp::config::Config;
//! use hcdp_mcp::protocol::{build_request, validate, ToolRequest};
//! use serde_json::json;
//!
//! let request = ToolRequest::new(
//!     "get_climate_raster",
//!     json!({"datatype": "rainfall", "date": "2022-02", "extent": "Big Island",
//!            "production": "new", "period": "month"}),
//! );
//! let params = validate(&request).unwrap();
//! let http = build_request(&params, &Config::default().with_token("token")).unwrap();
//! assert_eq!(http.path, "/raster");
//! assert_eq!(http.query_value("extent"), Some("bi"));
//! ```

pub mod alias;
pub mod builder;
pub mod catalog;
pub mod endpoints;
pub mod error;
pub mod locations;
pub mod request;
pub mod schema;
pub mod validator;

pub use alias::{resolve_datatype, resolve_extent, AliasTable};
pub use builder::build_request;
pub use catalog::{list_tools, ToolDescriptor};
pub use endpoints::{find_tool, TOOLS};
pub use error::{ValidationError, ValidationReason};
pub use request::{BearerToken, EndpointRequest, ParamValue, ToolRequest, ValidatedParameters};
pub use schema::{
    ConditionalRule, DateFormat, EndpointClass, EndpointDescriptor, FieldKind, FieldSpec,
    HttpMethod, Placement, RangeRule, ToolSpec, ToolTarget,
};
pub use validator::{validate, validate_arguments};
