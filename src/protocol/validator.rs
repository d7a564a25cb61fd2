//! Generic argument validation driven by the static tool descriptors.
//!
//! Every tool goes through the same routine: reject unknown fields, coerce
//! each declared field according to its [`FieldKind`], fill declared
//! defaults, then apply the tool's conditional and range rules.

use super::endpoints::find_tool;
use super::error::{ValidationError, ValidationReason};
use super::request::{ParamValue, ToolRequest, ValidatedParameters};
use super::schema::{DateFormat, FieldKind, FieldSpec, ToolSpec};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid day pattern"));
static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid month pattern"));
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid year pattern"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email pattern")
});

/// Validate a raw tool request against its descriptor.
pub fn validate(request: &ToolRequest) -> Result<ValidatedParameters, ValidationError> {
    let tool = find_tool(&request.tool_name).ok_or_else(|| {
        ValidationError::new(
            "tool",
            ValidationReason::Enum,
            format!("unknown tool '{}'", request.tool_name),
        )
    })?;
    validate_arguments(tool, &request.arguments)
}

/// Validate arguments for an already-resolved tool.
pub fn validate_arguments(
    tool: &'static ToolSpec,
    arguments: &Value,
) -> Result<ValidatedParameters, ValidationError> {
    let empty = Map::new();
    let args = match arguments {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            return Err(ValidationError::new(
                "arguments",
                ValidationReason::Type,
                "arguments must be a JSON object",
            ))
        }
    };

    if let Some(unknown) = args.keys().find(|k| tool.field(k).is_none()) {
        return Err(ValidationError::unknown_field(unknown, tool.name));
    }

    let mut fields = Vec::with_capacity(tool.fields.len());
    for spec in tool.fields {
        let provided = args.get(spec.name).filter(|v| !is_absent(v));
        let value = match (provided, spec.default) {
            (Some(raw), _) => coerce(spec, raw)?,
            (None, Some(default)) => coerce(spec, &Value::String(default.to_string()))?,
            (None, None) if spec.required => return Err(ValidationError::required(spec.name)),
            (None, None) => continue,
        };
        fields.push((spec.name, value));
    }

    let params = ValidatedParameters { tool, fields };
    check_conditions(&params)?;
    check_ranges(&params)?;
    Ok(params)
}

/// `null` and blank strings count as "not provided".
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Total coercion from a raw JSON value to the field's canonical form.
pub(crate) fn coerce(spec: &FieldSpec, raw: &Value) -> Result<ParamValue, ValidationError> {
    let field = spec.name;
    match spec.kind {
        FieldKind::Text => match raw {
            Value::String(s) => Ok(ParamValue::Text(s.trim().to_string())),
            Value::Number(n) => Ok(ParamValue::Text(n.to_string())),
            _ => Err(type_error(field, "a string")),
        },
        FieldKind::Enum { values, alias } => {
            let s = expect_str(field, raw)?;
            let key = super::alias::normalize_key(s);
            let candidate = alias
                .and_then(|table| table.resolve(s))
                .unwrap_or(key.as_str());
            match values.iter().find(|v| **v == candidate) {
                Some(v) => Ok(ParamValue::Text((*v).to_string())),
                None => Err(ValidationError::new(
                    field,
                    ValidationReason::Enum,
                    format!("'{}' is not one of: {}", s.trim(), values.join(", ")),
                )),
            }
        }
        FieldKind::Date(format) => {
            let owned;
            let s = match raw {
                Value::Number(n) => {
                    owned = n.to_string();
                    owned.as_str()
                }
                other => expect_str(field, other)?.trim(),
            };
            if parse_date(format, s).is_some() {
                Ok(ParamValue::Text(s.to_string()))
            } else {
                Err(ValidationError::new(
                    field,
                    ValidationReason::Format,
                    format!("'{}' is not a valid {} date", s, format.pattern()),
                ))
            }
        }
        FieldKind::Latitude => coordinate(field, raw, 90.0),
        FieldKind::Longitude => coordinate(field, raw, 180.0),
        FieldKind::Integer { min } => {
            let n = match raw {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| type_error(field, "an integer"))?;
            if n < min as i64 {
                return Err(ValidationError::new(
                    field,
                    ValidationReason::Range,
                    format!("must be at least {}", min),
                ));
            }
            Ok(ParamValue::Integer(n as u64))
        }
        FieldKind::Bool => match raw {
            Value::Bool(b) => Ok(ParamValue::Bool(*b)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(ParamValue::Bool(true)),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                Ok(ParamValue::Bool(false))
            }
            _ => Err(type_error(field, "a boolean")),
        },
        FieldKind::List => {
            let items: Vec<String> = match raw {
                Value::String(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
                Value::Array(values) => values
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => Ok(s.trim().to_string()),
                        Value::Number(n) => Ok(n.to_string()),
                        _ => Err(type_error(field, "a list of strings")),
                    })
                    .collect::<Result<_, _>>()?,
                _ => return Err(type_error(field, "a comma-separated string or array")),
            };
            let items: Vec<String> = items.into_iter().filter(|s| !s.is_empty()).collect();
            if items.is_empty() {
                return Err(type_error(field, "a non-empty list"));
            }
            Ok(ParamValue::List(items))
        }
        FieldKind::Filter => {
            let parsed = match raw {
                Value::String(s) => serde_json::from_str::<Value>(s).ok(),
                other => Some(other.clone()),
            };
            match parsed {
                Some(v @ (Value::Object(_) | Value::Array(_))) => Ok(ParamValue::Filter(v.to_string())),
                _ => Err(ValidationError::new(
                    field,
                    ValidationReason::Malformed,
                    "expected a JSON object or array filter expression",
                )),
            }
        }
        FieldKind::Email => {
            let s = expect_str(field, raw)?.trim();
            if EMAIL_RE.is_match(s) {
                Ok(ParamValue::Text(s.to_string()))
            } else {
                Err(ValidationError::new(
                    field,
                    ValidationReason::Format,
                    format!("'{}' is not a valid email address", s),
                ))
            }
        }
    }
}

fn coordinate(field: &str, raw: &Value, limit: f64) -> Result<ParamValue, ValidationError> {
    let n = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
    .ok_or_else(|| type_error(field, "a number or numeric string"))?;
    if !(-limit..=limit).contains(&n) {
        return Err(ValidationError::new(
            field,
            ValidationReason::Range,
            format!("{} is outside -{}..={}", n, limit, limit),
        ));
    }
    Ok(ParamValue::Number(n))
}

fn expect_str<'a>(field: &str, raw: &'a Value) -> Result<&'a str, ValidationError> {
    raw.as_str().ok_or_else(|| type_error(field, "a string"))
}

fn type_error(field: &str, expected: &str) -> ValidationError {
    ValidationError::new(field, ValidationReason::Type, format!("expected {}", expected))
}

/// Parse a date of the given shape; months and years map to their first day.
pub(crate) fn parse_date(format: DateFormat, s: &str) -> Option<NaiveDate> {
    let day = |s: &str| {
        DAY_RE
            .is_match(s)
            .then(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .flatten()
    };
    let month = |s: &str| {
        MONTH_RE
            .is_match(s)
            .then(|| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok())
            .flatten()
    };
    match format {
        DateFormat::Day => day(s),
        DateFormat::Month => month(s),
        DateFormat::MonthOrDay => day(s).or_else(|| month(s)),
        DateFormat::Year => YEAR_RE
            .is_match(s)
            .then(|| NaiveDate::parse_from_str(&format!("{}-01-01", s), "%Y-%m-%d").ok())
            .flatten(),
    }
}

fn check_conditions(params: &ValidatedParameters) -> Result<(), ValidationError> {
    for rule in params.tool.conditions {
        let trigger = rule.trigger_field();
        let Some(value) = params.text(trigger) else {
            continue;
        };
        if let Some(missing) = rule
            .required_for(trigger, value)
            .iter()
            .find(|name| !params.contains(name))
        {
            return Err(ValidationError::new(
                *missing,
                ValidationReason::ConditionallyRequired,
                format!("required when {} is '{}'", trigger, value),
            ));
        }
    }
    Ok(())
}

fn check_ranges(params: &ValidatedParameters) -> Result<(), ValidationError> {
    for range in params.tool.ranges {
        let (Some(start), Some(end)) = (
            date_of(params, range.start),
            date_of(params, range.end),
        ) else {
            continue;
        };
        if start > end {
            return Err(ValidationError::new(
                range.start,
                ValidationReason::Range,
                format!("{} must not be later than {}", range.start, range.end),
            ));
        }
    }
    Ok(())
}

fn date_of(params: &ValidatedParameters, name: &str) -> Option<NaiveDate> {
    let spec = params.tool.field(name)?;
    let FieldKind::Date(format) = spec.kind else {
        return None;
    };
    parse_date(format, params.text(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(tool: &str, args: Value) -> Result<ValidatedParameters, ValidationError> {
        validate(&ToolRequest::new(tool, args))
    }

    fn raster(extra: Value) -> Value {
        let mut base = json!({"datatype": "rainfall", "date": "2022-02", "extent": "bi",
                              "production": "new", "period": "month"});
        if let (Some(b), Value::Object(e)) = (base.as_object_mut(), extra) {
            b.extend(e);
        }
        base
    }

    #[test]
    fn test_unknown_tool() {
        let err = run("get_weather", json!({})).unwrap_err();
        assert_eq!(err.field, "tool");
        assert_eq!(err.reason, ValidationReason::Enum);
    }

    #[test]
    fn test_missing_required_field_named() {
        let err = run("get_climate_raster", json!({"datatype": "rainfall", "extent": "bi"})).unwrap_err();
        assert_eq!(err.field, "date");
        assert_eq!(err.reason, ValidationReason::Required);
    }

    #[test]
    fn test_null_and_empty_string_are_absent() {
        let err = run("get_climate_raster", raster(json!({"date": null}))).unwrap_err();
        assert_eq!(err.field, "date");
        let err = run("get_climate_raster", raster(json!({"date": "  "}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Required);
        let ok = run("get_climate_raster", raster(json!({"location": ""}))).unwrap();
        assert!(!ok.contains("location"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = run("get_climate_raster", raster(json!({"colour": "blue"}))).unwrap_err();
        assert_eq!(err.field, "colour");
        assert_eq!(err.reason, ValidationReason::UnknownField);
    }

    #[test]
    fn test_alias_resolves_before_enum() {
        let aliased = run("get_climate_raster", raster(json!({"extent": "Big Island"}))).unwrap();
        let canonical = run("get_climate_raster", raster(json!({}))).unwrap();
        assert_eq!(aliased, canonical);
        assert_eq!(aliased.text("extent"), Some("bi"));

        let dt = run("get_climate_raster", raster(json!({"datatype": "Precipitation"}))).unwrap();
        assert_eq!(dt.text("datatype"), Some("rainfall"));
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        let err = run("get_climate_raster", raster(json!({"extent": "atlantis"}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Enum);
        let err = run("get_climate_raster", raster(json!({"production": "beta"}))).unwrap_err();
        assert_eq!(err.field, "production");
    }

    #[test]
    fn test_rainfall_requires_production_and_period() {
        let err = run(
            "get_climate_raster",
            json!({"datatype": "rainfall", "date": "2022-02", "extent": "bi"}),
        )
        .unwrap_err();
        assert_eq!(err.field, "production");
        assert_eq!(err.reason, ValidationReason::ConditionallyRequired);

        let err = run(
            "get_climate_raster",
            json!({"datatype": "rainfall", "date": "2022-02", "extent": "bi", "production": "new"}),
        )
        .unwrap_err();
        assert_eq!(err.field, "period");
    }

    #[test]
    fn test_temperature_requires_aggregation() {
        let args = json!({"datatype": "temp_mean", "date": "2022-02", "extent": "oa"});
        let err = run("get_climate_raster", args).unwrap_err();
        assert_eq!(err.field, "aggregation");
        let args = json!({"datatype": "temp_max", "date": "2022-02", "extent": "oa", "aggregation": "month"});
        assert!(run("get_climate_raster", args).is_ok());
    }

    #[test]
    fn test_spi_requires_timescale() {
        let args = json!({"datatype": "spi", "date": "2022-02", "extent": "oa"});
        assert_eq!(run("get_climate_raster", args).unwrap_err().field, "timescale");
    }

    #[test]
    fn test_raster_date_is_month() {
        let err = run("get_climate_raster", raster(json!({"date": "2022-02-01"}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Format);
        let err = run("get_climate_raster", raster(json!({"date": "2022-13"}))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Format);
    }

    #[test]
    fn test_coordinate_coercion() {
        let base = json!({"datatype": "rh", "start": "2020-01-01", "end": "2020-12-31",
                          "extent": "bi", "lng": -155.0});
        let mut from_str = base.clone();
        from_str["lat"] = json!("19.7167");
        let mut from_num = base;
        from_num["lat"] = json!(19.7167);
        let a = run("get_timeseries_data", from_str).unwrap();
        let b = run("get_timeseries_data", from_num).unwrap();
        assert_eq!(a.number("lat"), Some(19.7167));
        assert_eq!(a.get("lat"), b.get("lat"));
    }

    #[test]
    fn test_coordinate_bounds_and_type() {
        let args = json!({"datatype": "rh", "start": "2020-01-01", "end": "2020-12-31",
                          "extent": "bi", "lat": 95.0, "lng": -155.0});
        let err = run("get_timeseries_data", args).unwrap_err();
        assert_eq!((err.field.as_str(), err.reason), ("lat", ValidationReason::Range));

        let args = json!({"datatype": "rh", "start": "2020-01-01", "end": "2020-12-31",
                          "extent": "bi", "lat": "north", "lng": -155.0});
        assert_eq!(run("get_timeseries_data", args).unwrap_err().reason, ValidationReason::Type);
    }

    #[test]
    fn test_inverted_range() {
        let args = json!({"datatype": "rh", "start": "2021-01-01", "end": "2020-12-31",
                          "extent": "bi", "lat": 19.7, "lng": -155.0});
        let err = run("get_timeseries_data", args).unwrap_err();
        assert_eq!((err.field.as_str(), err.reason), ("start", ValidationReason::Range));

        let err = run("get_mesonet_data", json!({"start_date": "2024-02-01", "end_date": "2024-01-01"}))
            .unwrap_err();
        assert_eq!(err.field, "start_date");
    }

    #[test]
    fn test_mesonet_defaults_and_lists() {
        let p = run("get_mesonet_data", json!({"station_ids": "0115, 0116,", "limit": "10"})).unwrap();
        assert_eq!(p.get("station_ids"), Some(&ParamValue::List(vec!["0115".into(), "0116".into()])));
        assert_eq!(p.get("limit"), Some(&ParamValue::Integer(10)));
        assert_eq!(p.text("location"), Some("hawaii"));
        assert_eq!(p.get("join_metadata"), Some(&ParamValue::Bool(true)));

        let err = run("get_mesonet_data", json!({"limit": 0})).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Range);
    }

    #[test]
    fn test_station_filter() {
        let p = run("get_station_data", json!({"q": {"name": "hcdp_station_value"}})).unwrap();
        assert_eq!(p.get("q"), Some(&ParamValue::Filter(r#"{"name":"hcdp_station_value"}"#.into())));
        let p = run("get_station_data", json!({"q": "{}"})).unwrap();
        assert_eq!(p.get("q"), Some(&ParamValue::Filter("{}".into())));
        let err = run("get_station_data", json!({"q": "{name:"})).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Malformed);
    }

    #[test]
    fn test_package_email_and_dates() {
        let args = json!({"email": "someone@hawaii.edu", "datatype": "rainfall",
                          "start_date": "2023-01", "end_date": "2023-03-15"});
        assert!(run("generate_data_package_email", args).is_ok());
        let err = run("generate_data_package_email", json!({"email": "nobody", "datatype": "rainfall"}))
            .unwrap_err();
        assert_eq!((err.field.as_str(), err.reason), ("email", ValidationReason::Format));
    }

    #[test]
    fn test_alias_must_land_in_field_enum() {
        let err = run(
            "get_island_history_summary",
            json!({"island": "oahu", "datatype": "drought", "year": "2023"}),
        )
        .unwrap_err();
        assert_eq!(err.field, "datatype");
        assert_eq!(err.reason, ValidationReason::Enum);
        let p = run(
            "get_island_history_summary",
            json!({"island": "oahu", "datatype": "humidity", "year": "2023"}),
        )
        .unwrap();
        assert_eq!(p.text("datatype"), Some("rh"));
    }

    #[test]
    fn test_numeric_year_accepted() {
        let p = run(
            "get_island_history_summary",
            json!({"island": "maui", "datatype": "rainfall", "year": 2024}),
        )
        .unwrap();
        assert_eq!(p.text("year"), Some("2024"));
        let err = run(
            "get_island_history_summary",
            json!({"island": "maui", "datatype": "rainfall", "year": 2024.5}),
        )
        .unwrap_err();
        assert_eq!(err.reason, ValidationReason::Format);
    }

    #[test]
    fn test_non_object_arguments() {
        let err = run("get_mesonet_stations", json!([1, 2])).unwrap_err();
        assert_eq!(err.reason, ValidationReason::Type);
        assert!(run("get_mesonet_stations", Value::Null).is_ok());
    }
}
