//! Weather tool: current conditions, forecasts, alerts, and historical
//! lookups over deterministic synthetic data.

use async_trait::async_trait;
use serde_json::{Value, json};

use step_primitives::{
    OperationSpec, ParameterSpec, ToolCategory, ToolDescriptor, TypeSpec,
};
use step_tools::{Tool, ToolArgs, ToolError, ToolResult};

use crate::hash::fnv1a;

const CONDITIONS: [&str; 6] = [
    "Sunny",
    "Partly Cloudy",
    "Cloudy",
    "Light Rain",
    "Heavy Rain",
    "Thunderstorm",
];

const WIND_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Fetches weather data including current conditions, forecasts, and
/// historical data.
///
/// All values are derived from a hash of the location, so a given place
/// always reports the same weather.
pub struct WeatherTool {
    descriptor: ToolDescriptor,
}

impl WeatherTool {
    /// Builds the tool and its descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor cannot be assembled.
    pub fn new() -> step_primitives::Result<Self> {
        let descriptor = ToolDescriptor::builder("WeatherTool")
            .description(
                "Fetches weather data including current conditions, forecasts, \
                 and historical data",
            )
            .category(ToolCategory::Weather)
            .operation(
                OperationSpec::builder("execute")
                    .description("Fetch weather data for a specific location")
                    .parameter(
                        ParameterSpec::new("location", TypeSpec::Str)
                            .with_description("City name or coordinates"),
                    )
                    .parameter(
                        ParameterSpec::new("forecast_days", TypeSpec::Int.optional())
                            .with_description("Number of forecast days (1-7)")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("hourly", TypeSpec::Bool)
                            .with_description("Include an hourly forecast")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("include_alerts", TypeSpec::Bool)
                            .with_description("Include weather alerts")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("date", TypeSpec::Str.optional())
                            .with_description("Date for historical data (YYYY-MM-DD)")
                            .optional(),
                    )
                    .returns(TypeSpec::map(TypeSpec::Str, TypeSpec::Any))
                    .build()?,
            )
            .build()?;

        Ok(Self { descriptor })
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, operation: &str, args: ToolArgs) -> ToolResult<Value> {
        if operation != "execute" {
            return Err(ToolError::unknown_operation("WeatherTool", operation));
        }

        let location = args
            .get("location")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid_arguments("`location` is required"))?;

        let mut response = json!({
            "current": current_weather(location)
        });

        if let Some(days) = args.get("forecast_days").and_then(Value::as_u64) {
            let hourly = args
                .get("hourly")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            response["forecast"] = forecast(location, days, hourly);
        }

        if args
            .get("include_alerts")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            response["alerts"] = alerts(location);
        }

        if let Some(date) = args.get("date").and_then(Value::as_str) {
            response["history"] = historical_weather(location, date);
        }

        Ok(response)
    }
}

#[allow(clippy::cast_precision_loss)]
fn current_weather(location: &str) -> Value {
    let base = fnv1a(location) % 100;

    let temp_c = 20 + (base % 15);
    let temp_f = ((temp_c as f64).mul_add(9.0 / 5.0, 32.0) * 10.0).round() / 10.0;
    json!({
        "temperature": temp_c,
        "temperature_fahrenheit": temp_f,
        "humidity": 50 + (base % 30),
        "wind_speed": 5 + (base % 20),
        "wind_direction": WIND_DIRECTIONS[usize::try_from(base % 8).unwrap_or(0)],
        "condition": CONDITIONS[usize::try_from(base % 6).unwrap_or(0)]
    })
}

#[allow(clippy::cast_precision_loss)]
fn forecast(location: &str, days: u64, hourly: bool) -> Value {
    let base_temp = (fnv1a(location) % 10 + 20) as f64;
    let mut entries = Vec::new();

    if hourly {
        for day in 0..days {
            for hour in 0..24u64 {
                let variation = f64::sin(hour as f64 * std::f64::consts::PI / 12.0) * 5.0;
                entries.push(json!({
                    "timestamp": format!("2025-02-{:02} {hour:02}:00", day + 1),
                    "temperature": ((base_temp + variation) * 10.0).round() / 10.0,
                    "precipitation_chance": fnv1a(&format!("{location}{day}{hour}")) % 100
                }));
            }
        }
    } else {
        for day in 0..days {
            let daily = fnv1a(&format!("{location}{day}"));
            let variation = (daily % 10) as f64 - 5.0;
            entries.push(json!({
                "date": format!("2025-02-{:02}", day + 1),
                "temperature_high": base_temp + 5.0 + variation,
                "temperature_low": base_temp - 5.0 + variation,
                "precipitation_chance": daily % 100
            }));
        }
    }

    Value::Array(entries)
}

fn alerts(location: &str) -> Value {
    if fnv1a(location) % 4 == 0 {
        json!([{
            "type": "Weather Advisory",
            "severity": "Moderate",
            "message": "Strong winds expected in the afternoon"
        }])
    } else {
        json!([])
    }
}

#[allow(clippy::cast_precision_loss)]
fn historical_weather(location: &str, date: &str) -> Value {
    let base = fnv1a(&format!("{location}{date}")) % 100;
    json!({
        "temperature_high": 25 + (base % 10),
        "temperature_low": 15 + (base % 8),
        "precipitation": (base % 20) as f64 / 10.0,
        "wind_speed": 5 + (base % 15)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn current_conditions_are_deterministic_per_location() {
        let tool = WeatherTool::new().unwrap();
        let first = tool
            .invoke("execute", args(json!({"location": "New York"})))
            .await
            .unwrap();
        let second = tool
            .invoke("execute", args(json!({"location": "New York"})))
            .await
            .unwrap();
        assert_eq!(first, second);

        let current = &first["current"];
        let temp = current["temperature"].as_u64().unwrap();
        assert!((20..35).contains(&temp));
        assert!(current["condition"].is_string());
        assert!(first.get("forecast").is_none());
    }

    #[tokio::test]
    async fn daily_forecast_covers_requested_days() {
        let tool = WeatherTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({"location": "London", "forecast_days": 3})),
            )
            .await
            .unwrap();

        let forecast = result["forecast"].as_array().unwrap();
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast[0]["date"], json!("2025-02-01"));
        assert!(forecast[0]["temperature_high"].is_number());
    }

    #[tokio::test]
    async fn hourly_forecast_has_one_entry_per_hour() {
        let tool = WeatherTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({"location": "London", "forecast_days": 2, "hourly": true})),
            )
            .await
            .unwrap();

        let forecast = result["forecast"].as_array().unwrap();
        assert_eq!(forecast.len(), 48);
        assert_eq!(forecast[0]["timestamp"], json!("2025-02-01 00:00"));
    }

    #[tokio::test]
    async fn alerts_and_history_are_attached_on_request() {
        let tool = WeatherTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({
                    "location": "Chicago",
                    "include_alerts": true,
                    "date": "2025-02-01"
                })),
            )
            .await
            .unwrap();

        assert!(result["alerts"].is_array());
        let history = &result["history"];
        assert!(history["temperature_high"].is_number());
        assert!(history["precipitation"].is_number());
    }

    #[tokio::test]
    async fn rejects_missing_location() {
        let tool = WeatherTool::new().unwrap();
        let err = tool.invoke("execute", ToolArgs::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
