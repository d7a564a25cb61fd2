//! Request builder: validated parameters to an immutable [`EndpointRequest`].

use super::request::{BearerToken, EndpointRequest, ValidatedParameters};
use super::schema::{Placement, ToolTarget};
use crate::config::Config;
use crate::{Error, ErrorContext, Result};
use serde_json::{Map, Value};

/// Name of the query parameter carrying package dataset fields.
pub const PACKAGE_DATA_PARAM: &str = "data";

/// Build the HTTP request for an endpoint-backed tool.
///
/// Pure: the same parameters and configuration always produce an identical
/// request. Query parameters follow descriptor field order; package fields
/// are collected into one compact JSON `data` parameter placed where the
/// first of them is declared.
pub fn build_request(params: &ValidatedParameters, config: &Config) -> Result<EndpointRequest> {
    let endpoint = match params.tool.target {
        ToolTarget::Endpoint(endpoint) => endpoint,
        ToolTarget::Composite => {
            return Err(Error::configuration_with_context(
                "composite tools have no single endpoint",
                ErrorContext::new()
                    .with_field_path(params.tool.name)
                    .with_source("request_builder"),
            ))
        }
    };

    let token = config
        .api_token
        .as_deref()
        .map(BearerToken::new)
        .ok_or_else(|| {
            Error::configuration_with_context(
                "HCDP API token is not configured",
                ErrorContext::new()
                    .with_field_path("HCDP_API_TOKEN")
                    .with_details("set HCDP_API_TOKEN to call the HCDP API")
                    .with_source("request_builder"),
            )
        })?;

    let mut query = Vec::with_capacity(params.fields.len());
    let mut package = Map::new();
    let mut package_at = None;

    for spec in params.tool.fields {
        let Some(value) = params.get(spec.name) else {
            continue;
        };
        match spec.placement {
            Placement::Query => query.push((spec.name.to_string(), value.to_query_string())),
            Placement::Package => {
                package_at.get_or_insert(query.len());
                package.insert(spec.name.to_string(), value.to_json());
            }
        }
    }

    if let Some(at) = package_at {
        let data = Value::Object(package).to_string();
        query.insert(at, (PACKAGE_DATA_PARAM.to_string(), data));
    }

    Ok(EndpointRequest {
        method: endpoint.method,
        path: endpoint.path,
        query,
        body: None,
        class: endpoint.class,
        token,
    })
}
