//! Converts raw provider payloads into [`WeatherReading`]s.
//!
//! Missing objects or fields fall back to defaults; a payload that is empty
//! or carries a malformed container yields `None`. Callers must treat `None`
//! as "no data": never persist it, surface a processing error instead.

use crate::types::{UnitSystem, WeatherReading};
use serde_json::{Map, Value};

/// Normalize a raw provider payload.
///
/// Expected shape:
/// `{name, main: {temp, feels_like, humidity}, weather: [{description}], wind: {speed}}`.
pub fn normalize(raw: &Value, units: UnitSystem) -> Option<WeatherReading> {
    let root = raw.as_object()?;
    if root.is_empty() {
        return None;
    }

    // Containers may be absent, but a present container of the wrong shape
    // means the payload is malformed as a whole.
    let main = object_or_absent(root, "main")?;
    let wind = object_or_absent(root, "wind")?;
    let condition = first_condition(root)?;

    let temperature = rounded_or_zero(main, "temp")?;
    let feels_like = rounded_or_zero(main, "feels_like")?;

    let humidity = main
        .and_then(|m| m.get("humidity"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let description = condition
        .and_then(|c| c.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let wind_speed = match wind.and_then(|w| w.get("speed")) {
        Some(Value::Number(n)) => format!("{} {}", n, units.wind_unit()),
        _ => format!("0 {}", units.wind_unit()),
    };

    let city = root
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();

    Some(WeatherReading {
        city,
        temperature,
        feels_like,
        humidity,
        description,
        wind_speed,
        unit: units.temperature_symbol().to_string(),
    })
}

/// `None` if absent, `Some(Some(map))` if an object, outer `None` if malformed.
fn object_or_absent<'a>(
    root: &'a Map<String, Value>,
    field: &str,
) -> Option<Option<&'a Map<String, Value>>> {
    match root.get(field) {
        None => Some(None),
        Some(value) => Some(Some(value.as_object()?)),
    }
}

/// First entry of the `weather` list, or absent. An empty list or a
/// non-object entry is malformed.
fn first_condition(root: &Map<String, Value>) -> Option<Option<&Map<String, Value>>> {
    match root.get("weather") {
        None => Some(None),
        Some(value) => {
            let first = value.as_array()?.first()?;
            Some(Some(first.as_object()?))
        }
    }
}

/// Numeric field rounded to the nearest integer; 0 when absent, `None`
/// when present but non-numeric.
fn rounded_or_zero(container: Option<&Map<String, Value>>, field: &str) -> Option<i64> {
    match container.and_then(|m| m.get(field)) {
        None => Some(0),
        Some(value) => Some(value.as_f64()?.round() as i64),
    }
}
