//! Declarative per-tool parameter descriptors.
//!
//! Every tool is one static [`ToolSpec`]: its endpoint (or composite marker),
//! its ordered field descriptors, and its cross-field rules. A single generic
//! routine in [`super::validator`] interprets them.

use super::alias::AliasTable;
use std::fmt;

/// Accepted date shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM` or `YYYY-MM-DD`
    MonthOrDay,
    /// `YYYY`
    Year,
}

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Day => "YYYY-MM-DD",
            Self::Month => "YYYY-MM",
            Self::MonthOrDay => "YYYY-MM or YYYY-MM-DD",
            Self::Year => "YYYY",
        }
    }
}

/// How a raw argument is coerced and checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    /// Membership in `values`, after optional alias resolution.
    Enum {
        values: &'static [&'static str],
        alias: Option<AliasTable>,
    },
    Date(DateFormat),
    Latitude,
    Longitude,
    Integer {
        min: u64,
    },
    Bool,
    /// Comma-separated string or array of strings.
    List,
    /// Serialized nested filter expression, passed through opaquely.
    Filter,
    Email,
}

impl FieldKind {
    /// JSON-schema type name advertised in the tool catalog.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::Integer { .. } => "integer",
            Self::Bool => "boolean",
            _ => "string",
        }
    }
}

/// Where the builder places a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Top-level query parameter.
    Query,
    /// Member of the JSON `data` query parameter of package requests.
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value used when the caller omits the field.
    pub default: Option<&'static str>,
    pub placement: Placement,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            placement: Placement::Query,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            placement: Placement::Query,
            description,
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn in_package(mut self) -> Self {
        self.placement = Placement::Package;
        self
    }
}

/// Cross-field requirement evaluated after every field validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalRule {
    WhenEquals {
        field: &'static str,
        value: &'static str,
        requires: &'static [&'static str],
    },
    WhenPrefix {
        field: &'static str,
        prefix: &'static str,
        requires: &'static [&'static str],
    },
}

impl ConditionalRule {
    /// Fields this rule makes mandatory for the given trigger value.
    pub fn required_for(&self, field_name: &str, value: &str) -> &'static [&'static str] {
        match *self {
            Self::WhenEquals {
                field,
                value: expected,
                requires,
            } if field == field_name && value == expected => requires,
            Self::WhenPrefix {
                field,
                prefix,
                requires,
            } if field == field_name && value.starts_with(prefix) => requires,
            _ => &[],
        }
    }

    pub fn trigger_field(&self) -> &'static str {
        match *self {
            Self::WhenEquals { field, .. } | Self::WhenPrefix { field, .. } => field,
        }
    }
}

/// `start` must not be later than `end` when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRule {
    pub start: &'static str,
    pub end: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected payload size class; selects the transport timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// JSON metadata and small queries.
    Metadata,
    /// Raster files and bulk packages.
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub method: HttpMethod,
    pub path: &'static str,
    pub class: EndpointClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolTarget {
    Endpoint(EndpointDescriptor),
    /// Orchestrates several endpoint calls; see `client::composite`.
    Composite,
}

#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target: ToolTarget,
    pub fields: &'static [FieldSpec],
    pub conditions: &'static [ConditionalRule],
    pub ranges: &'static [RangeRule],
}

impl ToolSpec {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn endpoint(&self) -> Option<&EndpointDescriptor> {
        match &self.target {
            ToolTarget::Endpoint(endpoint) => Some(endpoint),
            ToolTarget::Composite => None,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

impl PartialEq for ToolSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
