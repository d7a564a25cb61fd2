//! Static tool table: one [`ToolSpec`] per tool, in catalog order.

use super::alias::{AliasTable, DATATYPES, EXTENTS};
use super::locations::{CITY_KEYS, ISLAND_KEYS};
use super::schema::{
    ConditionalRule, DateFormat, EndpointClass, EndpointDescriptor, FieldKind, FieldSpec,
    HttpMethod, RangeRule, ToolSpec, ToolTarget,
};

pub const LOCATIONS: &[&str] = &["hawaii", "american_samoa"];
pub const PRODUCTIONS: &[&str] = &["new", "legacy"];
pub const PERIODS: &[&str] = &["day", "month", "year"];
pub const AGGREGATIONS: &[&str] = &["day", "month", "year"];

const EXTENT: FieldKind = FieldKind::Enum {
    values: EXTENTS,
    alias: Some(AliasTable::Extent),
};
const DATATYPE: FieldKind = FieldKind::Enum {
    values: DATATYPES,
    alias: Some(AliasTable::Datatype),
};
/// Datatypes a composite can fetch as a series without extra parameters.
pub const SERIES_DATATYPES: &[&str] = &["rainfall", "temp_mean", "temp_min", "temp_max", "rh"];

const SERIES_DATATYPE: FieldKind = FieldKind::Enum {
    values: SERIES_DATATYPES,
    alias: Some(AliasTable::Datatype),
};
const LOCATION: FieldKind = FieldKind::Enum {
    values: LOCATIONS,
    alias: None,
};
const PRODUCTION: FieldKind = FieldKind::Enum {
    values: PRODUCTIONS,
    alias: None,
};
const PERIOD: FieldKind = FieldKind::Enum {
    values: PERIODS,
    alias: None,
};
const AGGREGATION: FieldKind = FieldKind::Enum {
    values: AGGREGATIONS,
    alias: None,
};
const ISLAND: FieldKind = FieldKind::Enum {
    values: ISLAND_KEYS,
    alias: Some(AliasTable::Island),
};
const CITY: FieldKind = FieldKind::Enum {
    values: CITY_KEYS,
    alias: Some(AliasTable::City),
};
const LIMIT: FieldKind = FieldKind::Integer { min: 1 };
const OFFSET: FieldKind = FieldKind::Integer { min: 0 };

/// Rainfall needs a production and period, temperature an aggregation, SPI a timescale.
const DATATYPE_RULES: &[ConditionalRule] = &[
    ConditionalRule::WhenEquals {
        field: "datatype",
        value: "rainfall",
        requires: &["production", "period"],
    },
    ConditionalRule::WhenPrefix {
        field: "datatype",
        prefix: "temp_",
        requires: &["aggregation"],
    },
    ConditionalRule::WhenEquals {
        field: "datatype",
        value: "spi",
        requires: &["timescale"],
    },
];

const DATE_RANGE: &[RangeRule] = &[RangeRule {
    start: "start_date",
    end: "end_date",
}];

const EXTENT_HELP: &str = "Spatial extent: 'bi' (Big Island/Hawaii County), 'oa' (Oahu/Honolulu County), \
     'ka' (Kauai County), 'mn' (Maui County) or 'statewide'. Island names are accepted.";
const DATATYPE_HELP: &str = "Climate variable: 'rainfall' (or 'precipitation'), 'temp_mean' (or 'temperature'), \
     'temp_min', 'temp_max', 'rh' (relative humidity), 'spi' (drought index)";

const MESONET_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("station_ids", FieldKind::List, "Comma-separated station IDs"),
    FieldSpec::optional("start_date", FieldKind::Date(DateFormat::Day), "Start date in YYYY-MM-DD format"),
    FieldSpec::optional("end_date", FieldKind::Date(DateFormat::Day), "End date in YYYY-MM-DD format"),
    FieldSpec::optional("var_ids", FieldKind::List, "Comma-separated Mesonet variable IDs"),
    FieldSpec::optional("location", LOCATION, "Location ('hawaii' or 'american_samoa')").with_default("hawaii"),
    FieldSpec::optional("intervals", FieldKind::Text, "Time intervals"),
    FieldSpec::optional("limit", LIMIT, "Maximum number of records"),
    FieldSpec::optional("offset", OFFSET, "Offset for pagination"),
    FieldSpec::optional("join_metadata", FieldKind::Bool, "Include station metadata in results").with_default("true"),
];

const LOCATION_ONLY: &[FieldSpec] = &[FieldSpec::optional(
    "location",
    LOCATION,
    "Location ('hawaii' or 'american_samoa')",
)
.with_default("hawaii")];

const PACKAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("email", FieldKind::Email, "Email address for delivery and logging"),
    FieldSpec::required("datatype", DATATYPE, DATATYPE_HELP).in_package(),
    FieldSpec::optional("production", PRODUCTION, "Production level ('new' or 'legacy')").in_package(),
    FieldSpec::optional("period", PERIOD, "Period ('day', 'month' or 'year')").in_package(),
    FieldSpec::optional("extent", EXTENT, EXTENT_HELP).in_package(),
    FieldSpec::optional("start_date", FieldKind::Date(DateFormat::MonthOrDay), "Start date (YYYY-MM or YYYY-MM-DD)").in_package(),
    FieldSpec::optional("end_date", FieldKind::Date(DateFormat::MonthOrDay), "End date (YYYY-MM or YYYY-MM-DD)").in_package(),
    FieldSpec::optional("files", FieldKind::Text, "Specific files to include").in_package(),
    FieldSpec::optional("zipName", FieldKind::Text, "Custom zip file name"),
];

const fn package_tool(
    name: &'static str,
    title: &'static str,
    description: &'static str,
    path: &'static str,
) -> ToolSpec {
    ToolSpec {
        name,
        title,
        description,
        target: ToolTarget::Endpoint(EndpointDescriptor {
            method: HttpMethod::Post,
            path,
            class: EndpointClass::Bulk,
        }),
        fields: PACKAGE_FIELDS,
        conditions: &[],
        ranges: DATE_RANGE,
    }
}

const fn get_metadata(path: &'static str) -> ToolTarget {
    ToolTarget::Endpoint(EndpointDescriptor {
        method: HttpMethod::Get,
        path,
        class: EndpointClass::Metadata,
    })
}

pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get_climate_raster",
        title: "Climate raster",
        description: "Retrieve a gridded climate map (GeoTIFF) for one month. \
            Rainfall requires production ('new') and period ('month'); temperature \
            (temp_mean/temp_min/temp_max) requires aggregation ('month').",
        target: ToolTarget::Endpoint(EndpointDescriptor {
            method: HttpMethod::Get,
            path: "/raster",
            class: EndpointClass::Bulk,
        }),
        fields: &[
            FieldSpec::required("datatype", DATATYPE, DATATYPE_HELP),
            FieldSpec::required("date", FieldKind::Date(DateFormat::Month), "Month in YYYY-MM format, e.g. '2024-01'"),
            FieldSpec::required("extent", EXTENT, EXTENT_HELP),
            FieldSpec::optional("location", LOCATION, "Location ('hawaii' or 'american_samoa')"),
            FieldSpec::optional("production", PRODUCTION, "Production level for rainfall ('new' or 'legacy')"),
            FieldSpec::optional("aggregation", AGGREGATION, "Temporal aggregation for temperature, e.g. 'month'"),
            FieldSpec::optional("timescale", FieldKind::Text, "Timescale for SPI data"),
            FieldSpec::optional("period", PERIOD, "Period for rainfall, e.g. 'month'"),
        ],
        conditions: DATATYPE_RULES,
        ranges: &[],
    },
    ToolSpec {
        name: "get_timeseries_data",
        title: "Climate time series",
        description: "Get a time series of climate values at specific coordinates. \
            Requires 'lat' and 'lng'. An extent that does not contain the point \
            returns an empty result, not an error.",
        target: get_metadata("/raster/timeseries"),
        fields: &[
            FieldSpec::required("datatype", DATATYPE, DATATYPE_HELP),
            FieldSpec::required("start", FieldKind::Date(DateFormat::Day), "Start date in YYYY-MM-DD format"),
            FieldSpec::required("end", FieldKind::Date(DateFormat::Day), "End date in YYYY-MM-DD format"),
            FieldSpec::required("extent", EXTENT, EXTENT_HELP),
            FieldSpec::required("lat", FieldKind::Latitude, "Latitude (number or numeric string)"),
            FieldSpec::required("lng", FieldKind::Longitude, "Longitude (number or numeric string)"),
            FieldSpec::optional("location", LOCATION, "Location ('hawaii' or 'american_samoa')"),
            FieldSpec::optional("production", PRODUCTION, "Production level for rainfall ('new' or 'legacy')"),
            FieldSpec::optional("aggregation", AGGREGATION, "Temporal aggregation for temperature, e.g. 'month'"),
            FieldSpec::optional("timescale", FieldKind::Text, "Timescale for SPI data"),
            FieldSpec::optional("period", PERIOD, "Period for rainfall, e.g. 'month'"),
        ],
        conditions: DATATYPE_RULES,
        ranges: &[RangeRule {
            start: "start",
            end: "end",
        }],
    },
    ToolSpec {
        name: "get_station_data",
        title: "Station metadata",
        description: "Query climate station metadata and values. 'q' is a JSON filter \
            expression, e.g. '{}' for all stations.",
        target: get_metadata("/stations"),
        fields: &[
            FieldSpec::required("q", FieldKind::Filter, "JSON filter expression (object or array)"),
            FieldSpec::optional("limit", LIMIT, "Maximum number of results"),
            FieldSpec::optional("offset", OFFSET, "Offset for pagination"),
        ],
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "get_mesonet_data",
        title: "Mesonet measurements",
        description: "Access real-time weather station (Mesonet) measurements.",
        target: get_metadata("/mesonet/db/measurements"),
        fields: MESONET_FIELDS,
        conditions: &[],
        ranges: DATE_RANGE,
    },
    ToolSpec {
        name: "get_mesonet_stations",
        title: "Mesonet stations",
        description: "List Mesonet weather stations with location, elevation and status.",
        target: get_metadata("/mesonet/db/stations"),
        fields: LOCATION_ONLY,
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "get_mesonet_variables",
        title: "Mesonet variables",
        description: "List the measurement variables reported by Mesonet stations \
            (temperature, humidity, wind, rainfall, ...).",
        target: get_metadata("/mesonet/db/variables"),
        fields: LOCATION_ONLY,
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "get_mesonet_station_monitor",
        title: "Mesonet station monitor",
        description: "Get Mesonet station monitoring and status data.",
        target: get_metadata("/mesonet/db/stationMonitor"),
        fields: LOCATION_ONLY,
        conditions: &[],
        ranges: &[],
    },
    package_tool(
        "generate_data_package_email",
        "Data package by email",
        "Generate a zip package of climate data and email a download link.",
        "/genzip/email",
    ),
    package_tool(
        "generate_data_package_instant_link",
        "Data package link",
        "Generate a climate data package and return a download link.",
        "/genzip/instant/link",
    ),
    package_tool(
        "generate_data_package_instant_content",
        "Data package content",
        "Generate a climate data package and return the zip content.",
        "/genzip/instant/content",
    ),
    package_tool(
        "generate_data_package_splitlink",
        "Data package split links",
        "Generate split download links for a large climate data package.",
        "/genzip/instant/splitlink",
    ),
    ToolSpec {
        name: "get_island_current_summary",
        title: "Island current summary",
        description: "Average/min/max of today's readings from all active Mesonet \
            stations on an island, e.g. 'average temperature on Oahu'.",
        target: ToolTarget::Composite,
        fields: &[
            FieldSpec::required("island", ISLAND, "Island: 'oahu', 'big_island', 'maui', 'kauai', 'molokai', 'lanai' or 'statewide'"),
            FieldSpec::required("datatype", FieldKind::Text, "Variable, e.g. 'temperature', 'rainfall', 'humidity' or a Mesonet variable ID"),
        ],
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "get_city_current_weather",
        title: "City current weather",
        description: "Today's readings averaged over Mesonet stations within 15 km of a city. \
            Cities: Honolulu, Hilo, Kona, Kahului, Lihue, Kaunakakai, Lanai City, Pago Pago.",
        target: ToolTarget::Composite,
        fields: &[
            FieldSpec::required("city", CITY, "City name, e.g. 'honolulu'"),
            FieldSpec::required("datatype", FieldKind::Text, "Variable, e.g. 'temperature' or 'rainfall'"),
        ],
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "compare_current_vs_historical",
        title: "Current vs historical",
        description: "Compare today's Mesonet city average with the time-series value for \
            the same month of the previous year and report the difference.",
        target: ToolTarget::Composite,
        fields: &[
            FieldSpec::required("city", CITY, "City name, e.g. 'hilo'"),
            FieldSpec::required("datatype", FieldKind::Text, "Variable, e.g. 'temperature' or 'rainfall'"),
        ],
        conditions: &[],
        ranges: &[],
    },
    ToolSpec {
        name: "get_island_history_summary",
        title: "Island history summary",
        description: "Historical patterns for an island: time series for several \
            representative locations fetched in parallel, with per-location and \
            island-wide statistics.",
        target: ToolTarget::Composite,
        fields: &[
            FieldSpec::required("island", ISLAND, "Island: 'oahu', 'big_island', 'maui', 'kauai', 'molokai', 'lanai' or 'statewide'"),
            FieldSpec::required("datatype", SERIES_DATATYPE, "Variable: 'rainfall', 'temperature', 'temp_min', 'temp_max' or 'rh' (SPI is not supported)"),
            FieldSpec::required("year", FieldKind::Date(DateFormat::Year), "Year to summarize, e.g. '2024'"),
        ],
        conditions: &[],
        ranges: &[],
    },
];

/// Look up a tool by name.
pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tool_names_unique() {
        let names: HashSet<_> = TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), TOOLS.len());
    }

    #[test]
    fn test_rule_fields_are_declared() {
        for tool in TOOLS {
            for rule in tool.conditions {
                assert!(tool.field(rule.trigger_field()).is_some(), "{}", tool.name);
                for dep in rule.required_for("datatype", "rainfall")
                    .iter()
                    .chain(rule.required_for("datatype", "temp_mean"))
                    .chain(rule.required_for("datatype", "spi"))
                {
                    assert!(tool.field(dep).is_some(), "{}: {}", tool.name, dep);
                }
            }
            for range in tool.ranges {
                assert!(tool.field(range.start).is_some(), "{}", tool.name);
                assert!(tool.field(range.end).is_some(), "{}", tool.name);
            }
        }
    }

    #[test]
    fn test_binary_endpoints_use_bulk_class() {
        let raster = find_tool("get_climate_raster").and_then(|t| t.endpoint()).copied();
        assert_eq!(raster.map(|e| e.class), Some(EndpointClass::Bulk));
        let ts = find_tool("get_timeseries_data").and_then(|t| t.endpoint()).copied();
        assert_eq!(ts.map(|e| e.class), Some(EndpointClass::Metadata));
    }

    #[test]
    fn test_composite_tools_have_no_endpoint() {
        let composite = find_tool("get_island_history_summary");
        assert!(composite.is_some_and(|t| t.endpoint().is_none()));
    }
}
