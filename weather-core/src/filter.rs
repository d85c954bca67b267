//! Forecast field filtering.
//!
//! The provider's forecast carries far more attributes per timeline entry than
//! the report backend needs. Each timeline keeps only the fields listed for its
//! granularity; a timeline name missing from the table keeps nothing.

use serde_json::{Map, Value};

const HOURLY_FIELDS: &[&str] = &[
    "cloudCover",
    "humidity",
    "temperature",
    "temperatureApparent",
    "uvIndex",
    "visibility",
    "weatherCode",
    "windDirection",
    "windGust",
    "windSpeed",
    "precipitationProbability",
];

const MINUTELY_FIELDS: &[&str] = &[
    "cloudCover",
    "humidity",
    "temperature",
    "temperatureApparent",
    "uvIndex",
    "visibility",
    "weatherCode",
    "windDirection",
    "windGust",
    "windSpeed",
];

const DAILY_FIELDS: &[&str] = &[
    "humidityAvg",
    "moonriseTime",
    "moonsetTime",
    "pressureSurfaceLevelAvg",
    "sunriseTime",
    "sunsetTime",
    "temperatureApparentAvg",
    "temperatureAvg",
    "uvHealthConcernMax",
    "visibilityAvg",
    "weatherCodeMax",
    "windDirectionAvg",
    "windGustMax",
];

const STANDARD_TABLE: &[(&str, &[&str])] = &[
    ("hourly", HOURLY_FIELDS),
    ("minutely", MINUTELY_FIELDS),
    ("daily", DAILY_FIELDS),
];

/// Static table of permitted fields per timeline name.
#[derive(Debug, Clone, Copy)]
pub struct AllowList {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl AllowList {
    pub const fn standard() -> Self {
        Self {
            entries: STANDARD_TABLE,
        }
    }

    /// Fields allowed for `timeline`; empty for names not in the table.
    pub fn fields_for(&self, timeline: &str) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(name, _)| *name == timeline)
            .map(|(_, fields)| *fields)
            .unwrap_or(&[])
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::standard()
    }
}

/// Returns a copy of `raw` with every list-valued timeline entry's `values`
/// restricted to the allow-listed fields.
///
/// Non-list timelines and non-object entries are copied unchanged. An entry
/// without `values` ends up with an empty map.
pub fn filter_forecast(raw: &Value, allow: &AllowList) -> Value {
    let mut out = raw.clone();

    let Some(timelines) = out.get_mut("timelines").and_then(Value::as_object_mut) else {
        return out;
    };

    for (name, section) in timelines.iter_mut() {
        let Some(entries) = section.as_array_mut() else {
            continue;
        };
        let allowed = allow.fields_for(name);

        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            let kept: Map<String, Value> = match entry.get("values").and_then(Value::as_object) {
                Some(values) => values
                    .iter()
                    .filter(|(k, _)| allowed.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                None => Map::new(),
            };
            entry.insert("values".to_string(), Value::Object(kept));
        }
    }

    out
}
