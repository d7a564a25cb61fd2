//! Composite tools: answers that need several endpoint calls.
//!
//! Current conditions come from Mesonet measurements for today; history
//! comes from the raster time-series endpoint. All aggregation is local.

use super::core::HcdpClient;
use super::error_translation::ToolError;
use super::normalize::json_result;
use crate::error_code::ToolErrorKind;
use crate::protocol::alias::{normalize_key, resolve_datatype};
use crate::protocol::endpoints::SERIES_DATATYPES;
use crate::protocol::locations::{find_city, find_island, haversine_km, City, Island, Point};
use crate::protocol::ValidatedParameters;
use crate::types::ToolResult;
use chrono::{Datelike, Local, NaiveDate};
use futures::future::join_all;
use serde_json::{json, Map, Value};

/// Stations farther than this from a city are ignored.
pub const CITY_RADIUS_KM: f64 = 15.0;
/// Stations used when an island has no bounding box (statewide).
const UNBOUNDED_STATION_SAMPLE: usize = 20;
const MAX_STATIONS: usize = 50;
const MEASUREMENT_LIMIT: u64 = 1000;
/// Missing-value marker in HCDP time series.
const SENTINEL: f64 = -9999.0;

const MESONET_VARIABLES: &[(&str, &str)] = &[
    ("temperature", "Tair_1_Avg"),
    ("temp", "Tair_1_Avg"),
    ("temp_mean", "Tair_1_Avg"),
    ("air_temperature", "Tair_1_Avg"),
    ("humidity", "RH_1_Avg"),
    ("relative_humidity", "RH_1_Avg"),
    ("rh", "RH_1_Avg"),
    ("rainfall", "RF_1_Tot300s"),
    ("rain", "RF_1_Tot300s"),
    ("precipitation", "RF_1_Tot300s"),
    ("wind", "WS_1_Avg"),
    ("wind_speed", "WS_1_Avg"),
];

pub(crate) async fn run(client: &HcdpClient, params: &ValidatedParameters) -> Result<ToolResult, ToolError> {
    let today = Local::now().date_naive();
    match params.tool.name {
        "get_island_current_summary" => island_current_summary(client, params, today).await,
        "get_city_current_weather" => city_current_weather(client, params, today).await,
        "compare_current_vs_historical" => compare_current_vs_historical(client, params, today).await,
        "get_island_history_summary" => island_history_summary(client, params).await,
        other => Err(ToolError::new(
            ToolErrorKind::ConfigurationError,
            format!("no handler for composite tool '{}'", other),
        )),
    }
}

/// Mesonet variable id for a loose datatype name; unknown names pass through.
pub fn mesonet_variable(datatype: &str) -> String {
    let key = normalize_key(datatype);
    MESONET_VARIABLES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, id)| (*id).to_string())
        .unwrap_or_else(|| datatype.trim().to_string())
}

/// Time-series datatype for a loose name, if composites can fetch it.
fn timeseries_datatype(datatype: &str) -> Option<&'static str> {
    let key = normalize_key(datatype);
    let code = resolve_datatype(datatype).unwrap_or(key.as_str());
    SERIES_DATATYPES.iter().copied().find(|d| *d == code)
}

/// Average/min/max over a set of readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Stats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(Self {
            average: sum / values.len() as f64,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: values.len(),
        })
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
struct Station {
    id: String,
    lat: f64,
    lng: f64,
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|f: &f64| f.is_finite())
}

fn rows(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

fn parse_stations(value: &Value) -> Vec<Station> {
    rows(value)
        .iter()
        .filter_map(|row| {
            let id = match row.get("station_id")? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(Station {
                id,
                lat: number(row.get("lat")?)?,
                lng: number(row.get("lng")?)?,
            })
        })
        .collect()
}

/// Readings of `var_id`: long-format rows (`variable`/`value`) or a column
/// named after the variable.
fn measurement_values(value: &Value, var_id: &str) -> Vec<f64> {
    rows(value)
        .iter()
        .filter_map(|row| match row.get("variable").and_then(Value::as_str) {
            Some(variable) if variable == var_id => row.get("value").and_then(number),
            Some(_) => None,
            None => row.get(var_id).and_then(number),
        })
        .collect()
}

/// Values of a time-series response (`{date: value}` or an array), skipping
/// nulls and the missing-value sentinel.
fn timeseries_values(value: &Value) -> Vec<f64> {
    let raw: Vec<&Value> = match value {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.get("value").unwrap_or(item))
            .collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .filter_map(number)
        .filter(|v| *v != SENTINEL)
        .collect()
}

fn required_text<'a>(params: &'a ValidatedParameters, name: &str) -> Result<&'a str, ToolError> {
    params.text(name).ok_or_else(|| {
        ToolError::new(ToolErrorKind::ValidationError, format!("missing '{}'", name))
    })
}

fn island_of(params: &ValidatedParameters) -> Result<&'static Island, ToolError> {
    let key = required_text(params, "island")?;
    find_island(key).ok_or_else(|| ToolError::new(ToolErrorKind::ValidationError, format!("unknown island '{}'", key)))
}

fn city_of(params: &ValidatedParameters) -> Result<&'static City, ToolError> {
    let key = required_text(params, "city")?;
    find_city(key).ok_or_else(|| ToolError::new(ToolErrorKind::ValidationError, format!("unknown city '{}'", key)))
}

async fn stations(client: &HcdpClient) -> Result<Vec<Station>, ToolError> {
    let listing = client.fetch_json("get_mesonet_stations", json!({})).await?;
    Ok(parse_stations(&listing))
}

async fn todays_readings(
    client: &HcdpClient,
    station_ids: &[String],
    var_id: &str,
    today: NaiveDate,
) -> Result<Vec<f64>, ToolError> {
    let day = today.format("%Y-%m-%d").to_string();
    let measurements = client
        .fetch_json(
            "get_mesonet_data",
            json!({
                "station_ids": station_ids,
                "start_date": day,
                "end_date": day,
                "var_ids": [var_id],
                "limit": MEASUREMENT_LIMIT,
            }),
        )
        .await?;
    Ok(measurement_values(&measurements, var_id))
}

fn stations_near(all: &[Station], city: &City) -> Vec<String> {
    all.iter()
        .filter(|s| haversine_km(city.lat, city.lng, s.lat, s.lng) <= CITY_RADIUS_KM)
        .map(|s| s.id.clone())
        .collect()
}

fn stats_json(stats: &Stats) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("average".into(), json!(round2(stats.average)));
    out.insert("min".into(), json!(stats.min));
    out.insert("max".into(), json!(stats.max));
    out
}

async fn island_current_summary(
    client: &HcdpClient,
    params: &ValidatedParameters,
    today: NaiveDate,
) -> Result<ToolResult, ToolError> {
    let island = island_of(params)?;
    let datatype = required_text(params, "datatype")?;
    let var_id = mesonet_variable(datatype);

    let all = stations(client).await?;
    let mut ids: Vec<String> = match island.bounds {
        Some(bounds) => all
            .iter()
            .filter(|s| bounds.contains(s.lat, s.lng))
            .map(|s| s.id.clone())
            .collect(),
        None => all.iter().take(UNBOUNDED_STATION_SAMPLE).map(|s| s.id.clone()).collect(),
    };
    if ids.is_empty() {
        return Err(ToolError::new(
            ToolErrorKind::NotFound,
            format!("no Mesonet stations found on {}", island.key),
        ));
    }
    ids.truncate(MAX_STATIONS);

    let values = todays_readings(client, &ids, &var_id, today).await?;
    let mut out = Map::new();
    out.insert("island".into(), json!(island.key));
    out.insert("date".into(), json!(today.format("%Y-%m-%d").to_string()));
    out.insert("datatype".into(), json!(datatype));
    out.insert("variable".into(), json!(var_id));
    out.insert("stations_checked".into(), json!(ids.len()));
    match Stats::from_values(&values) {
        Some(stats) => {
            out.extend(stats_json(&stats));
            out.insert("reading_count".into(), json!(stats.count));
            out.insert("note".into(), json!("Averaged from active Mesonet stations"));
        }
        None => {
            out.insert("message".into(), json!(format!("No recent data for {} found", datatype)));
        }
    }
    Ok(json_result(&Value::Object(out)))
}

async fn city_current_weather(
    client: &HcdpClient,
    params: &ValidatedParameters,
    today: NaiveDate,
) -> Result<ToolResult, ToolError> {
    let city = city_of(params)?;
    let datatype = required_text(params, "datatype")?;
    let var_id = mesonet_variable(datatype);

    let nearby = stations_near(&stations(client).await?, city);
    if nearby.is_empty() {
        return Err(ToolError::new(
            ToolErrorKind::NotFound,
            format!("no weather stations found within {} km of {}", CITY_RADIUS_KM, city.key),
        ));
    }

    let values = todays_readings(client, &nearby, &var_id, today).await?;
    let mut out = Map::new();
    out.insert("city".into(), json!(city.key));
    out.insert("date".into(), json!(today.format("%Y-%m-%d").to_string()));
    out.insert("datatype".into(), json!(datatype));
    out.insert("variable".into(), json!(var_id));
    match Stats::from_values(&values) {
        Some(stats) => {
            out.extend(stats_json(&stats));
            out.insert("reading_count".into(), json!(stats.count));
            out.insert("stations_used".into(), json!(nearby));
        }
        None => {
            out.insert("stations_found".into(), json!(nearby.len()));
            out.insert(
                "message".into(),
                json!(format!(
                    "Found {} stations but no recent data for {}",
                    nearby.len(),
                    datatype
                )),
            );
        }
    }
    Ok(json_result(&Value::Object(out)))
}

async fn current_city_average(
    client: &HcdpClient,
    city: &City,
    var_id: &str,
    today: NaiveDate,
) -> Result<Option<f64>, ToolError> {
    let nearby = stations_near(&stations(client).await?, city);
    if nearby.is_empty() {
        return Ok(None);
    }
    let values = todays_readings(client, &nearby, var_id, today).await?;
    Ok(Stats::from_values(&values).map(|s| s.average))
}

/// First and last day of the same month one year earlier.
pub fn previous_year_month(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(today.year() - 1, today.month(), 1)?;
    let next = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year(), 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(today.year() - 1, today.month() + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

/// Extra time-series parameters each datatype needs.
fn timeseries_extras(datatype: &str) -> Map<String, Value> {
    let mut extras = Map::new();
    if datatype == "rainfall" {
        extras.insert("production".into(), json!("new"));
        extras.insert("period".into(), json!("month"));
    } else if datatype.starts_with("temp_") {
        extras.insert("aggregation".into(), json!("month"));
    }
    extras
}

async fn timeseries_at(
    client: &HcdpClient,
    datatype: &str,
    point: &Point,
    extent: &str,
    range: (NaiveDate, NaiveDate),
) -> Result<Vec<f64>, ToolError> {
    let mut args = Map::new();
    args.insert("datatype".into(), json!(datatype));
    args.insert("start".into(), json!(range.0.format("%Y-%m-%d").to_string()));
    args.insert("end".into(), json!(range.1.format("%Y-%m-%d").to_string()));
    args.insert("extent".into(), json!(extent));
    args.insert("lat".into(), json!(point.lat));
    args.insert("lng".into(), json!(point.lng));
    args.extend(timeseries_extras(datatype));
    let series = client.fetch_json("get_timeseries_data", Value::Object(args)).await?;
    Ok(timeseries_values(&series))
}

async fn compare_current_vs_historical(
    client: &HcdpClient,
    params: &ValidatedParameters,
    today: NaiveDate,
) -> Result<ToolResult, ToolError> {
    let city = city_of(params)?;
    let datatype = required_text(params, "datatype")?;
    let var_id = mesonet_variable(datatype);
    let (start, end) = previous_year_month(today).ok_or_else(|| {
        ToolError::new(ToolErrorKind::ValidationError, "cannot derive the historical period")
    })?;

    let current = current_city_average(client, city, &var_id, today);

    let extent = city
        .island
        .and_then(find_island)
        .map(|i| i.extent)
        .unwrap_or("statewide");
    let point = Point {
        name: city.key,
        lat: city.lat,
        lng: city.lng,
    };
    let historical = async {
        let Some(ts_datatype) = timeseries_datatype(datatype) else {
            return None;
        };
        match timeseries_at(client, ts_datatype, &point, extent, (start, end)).await {
            Ok(values) => Stats::from_values(&values).map(|s| s.average),
            Err(err) => {
                tracing::warn!(city = city.key, error = %err, "historical fetch failed");
                None
            }
        }
    };

    let (current, historical) = futures::join!(current, historical);
    let current = current?;

    let mut out = Map::new();
    out.insert("city".into(), json!(city.key));
    out.insert("datatype".into(), json!(datatype));
    out.insert(
        "current_value".into(),
        current.map(|v| json!(round2(v))).unwrap_or_else(|| json!("No data")),
    );
    out.insert(
        "historical_avg".into(),
        historical.map(|v| json!(round2(v))).unwrap_or_else(|| json!("No data")),
    );
    out.insert("historical_period".into(), json!(format!("{} to {}", start, end)));
    match (current, historical) {
        (Some(now), Some(then)) => {
            let diff = now - then;
            out.insert("difference".into(), json!(round2(diff)));
            out.insert(
                "comparison".into(),
                json!(format!(
                    "Current ({:.1}) is {} than historical ({:.1})",
                    now,
                    if diff > 0.0 { "higher" } else { "lower" },
                    then
                )),
            );
        }
        _ => {
            out.insert("comparison".into(), json!("N/A"));
        }
    }
    Ok(json_result(&Value::Object(out)))
}

async fn island_history_summary(
    client: &HcdpClient,
    params: &ValidatedParameters,
) -> Result<ToolResult, ToolError> {
    let island = island_of(params)?;
    let datatype = required_text(params, "datatype")?;
    let year_text = required_text(params, "year")?;
    let year: i32 = year_text
        .parse()
        .map_err(|_| ToolError::new(ToolErrorKind::ValidationError, format!("invalid year '{}'", year_text)))?;
    let range = NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or_else(|| ToolError::new(ToolErrorKind::ValidationError, format!("invalid year '{}'", year)))?;

    let fetches = island
        .points
        .iter()
        .map(|point| timeseries_at(client, datatype, point, island.extent, range));
    let results = join_all(fetches).await;

    let mut breakdown = Vec::with_capacity(results.len());
    let mut all_values = Vec::new();
    for (point, result) in island.points.iter().zip(results) {
        let mut entry = Map::new();
        entry.insert("location".into(), json!(point.name));
        match result {
            Ok(values) => match Stats::from_values(&values) {
                Some(stats) => {
                    entry.extend(stats_json(&stats));
                    entry.insert("data_points".into(), json!(stats.count));
                    all_values.extend(values);
                }
                None => {
                    entry.insert("message".into(), json!("No data returned"));
                }
            },
            Err(err) => {
                entry.insert("error".into(), json!(err.message));
            }
        }
        breakdown.push(Value::Object(entry));
    }

    let mut out = Map::new();
    out.insert("island".into(), json!(island.key));
    out.insert("year".into(), json!(year_text));
    out.insert("datatype".into(), json!(datatype));
    match Stats::from_values(&all_values) {
        Some(stats) => {
            out.insert("island_wide_average".into(), json!(round2(stats.average)));
            out.insert("island_wide_min".into(), json!(stats.min));
            out.insert("island_wide_max".into(), json!(stats.max));
        }
        None => {
            out.insert("island_wide_average".into(), json!("N/A"));
        }
    }
    out.insert("regional_breakdown".into(), Value::Array(breakdown));
    Ok(json_result(&Value::Object(out)))
}
