//! Stock price tool: current quotes, historical ranges, and averages over
//! a deterministic synthetic price series.

use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde_json::{Map, Value, json};

use step_primitives::{
    OperationSpec, ParameterSpec, ToolCategory, ToolDescriptor, TypeSpec,
};
use step_tools::{Tool, ToolArgs, ToolError, ToolResult};

use crate::hash::fnv1a;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fetches and analyzes stock market data with support for historical
/// periods and aggregations.
///
/// A single `execute` operation covers current quotes, single-date
/// lookups, date-range series (via `start_date`/`end_date` or a `period`
/// such as `7d`), and `calculate_average` summaries. When an earlier
/// step's output is bound as `previous_result`, it is reprocessed in
/// place of a fresh fetch: scalar prices pass through, prior price maps
/// can be re-averaged or filtered by date range.
pub struct StockPriceTool {
    descriptor: ToolDescriptor,
}

impl StockPriceTool {
    /// Builds the tool and its descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor cannot be assembled.
    pub fn new() -> step_primitives::Result<Self> {
        let descriptor = ToolDescriptor::builder("StockPriceTool")
            .description(
                "Fetches and analyzes stock market data with support for \
                 historical periods and aggregations. It should only be used \
                 when the user requires real-time stock data.",
            )
            .category(ToolCategory::Finance)
            .operation(
                OperationSpec::builder("execute")
                    .description("Fetch and analyze stock price data")
                    .parameter(
                        ParameterSpec::new("symbol", TypeSpec::Str)
                            .with_description("Stock ticker symbol, e.g. AAPL"),
                    )
                    .parameter(
                        ParameterSpec::new("start_date", TypeSpec::Str.optional())
                            .with_description("Start of a historical range (YYYY-MM-DD)")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("end_date", TypeSpec::Str.optional())
                            .with_description("End of a historical range (YYYY-MM-DD)")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("date", TypeSpec::Str.optional())
                            .with_description("Single date to quote (YYYY-MM-DD)")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("period", TypeSpec::Str.optional())
                            .with_description("Trailing period, e.g. 7d")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("calculate_average", TypeSpec::Bool)
                            .with_description("Include the average price in the response")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("previous_result", TypeSpec::Any.optional())
                            .with_description("Price data from an earlier step to reprocess")
                            .optional(),
                    )
                    .returns(TypeSpec::Any)
                    .build()?,
            )
            .build()?;

        Ok(Self { descriptor })
    }

    fn execute(&self, args: &ToolArgs) -> ToolResult<Value> {
        let symbol = required_str(args, "symbol")?;
        let calculate_average = flag(args, "calculate_average");
        let start_arg = opt_str(args, "start_date");
        let end_arg = opt_str(args, "end_date");

        if let Some(previous) = args.get("previous_result") {
            if !previous.is_null() {
                if let Some(value) = reprocess(
                    previous,
                    start_arg.as_deref(),
                    end_arg.as_deref(),
                    calculate_average,
                ) {
                    return Ok(value);
                }
            }
        }

        let today = Local::now().date_naive();

        let mut start = start_arg
            .map(|raw| parse_flexible_date(&raw, today))
            .transpose()?;
        let mut end = end_arg
            .map(|raw| parse_flexible_date(&raw, today))
            .transpose()?;

        if let Some(period) = opt_str(args, "period") {
            let days: i64 = if let Some(prefix) = period.strip_suffix('d') {
                prefix.trim().parse().map_err(|_| {
                    ToolError::invalid_arguments(format!("invalid period: {period}"))
                })?
            } else {
                // Non-day periods default to a month of history.
                30
            };
            // Extra days absorb weekends with no trading data.
            let buffer = days + days / 2 + 1;
            end = Some(today);
            start = Some(today - Duration::days(buffer));
        }

        if let (Some(start), Some(end)) = (start, end) {
            return Ok(price_series(&symbol, start, end, calculate_average));
        }

        if let Some(date) = opt_str(args, "date") {
            let date = parse_flexible_date(&date, today)?;
            return Ok(json!(price_on(&symbol, date)));
        }

        Ok(json!(price_on(&symbol, today)))
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, operation: &str, args: ToolArgs) -> ToolResult<Value> {
        if operation != "execute" {
            return Err(ToolError::unknown_operation("StockPriceTool", operation));
        }
        self.execute(&args)
    }
}

/// Reuses price data from an earlier step instead of fetching. Returns
/// `None` when the previous value cannot be reused and a fresh fetch
/// should proceed.
fn reprocess(
    previous: &Value,
    start: Option<&str>,
    end: Option<&str>,
    calculate_average: bool,
) -> Option<Value> {
    if previous.is_number() {
        return Some(previous.clone());
    }
    let Some(object) = previous.as_object() else {
        return Some(previous.clone());
    };

    let prices = match object.get("prices").and_then(Value::as_object) {
        Some(inner) => inner,
        None => object,
    };

    if calculate_average {
        let values: Vec<f64> = prices.values().filter_map(Value::as_f64).collect();
        if values.is_empty() {
            return Some(previous.clone());
        }
        let average = round2(values.iter().sum::<f64>() / values.len() as f64);
        let period = match object.get("period") {
            Some(Value::String(period)) => period.clone(),
            _ => format!("{} days", values.len()),
        };
        return Some(json!({
            "prices": prices,
            "average": average,
            "period": period
        }));
    }

    if let (Some(start), Some(end)) = (start, end) {
        let Ok(start) = NaiveDate::parse_from_str(start, DATE_FORMAT) else {
            return None;
        };
        let Ok(end) = NaiveDate::parse_from_str(end, DATE_FORMAT) else {
            return None;
        };

        let filtered: Map<String, Value> = prices
            .iter()
            .filter(|(key, _)| {
                NaiveDate::parse_from_str(key, DATE_FORMAT)
                    .map(|date| start <= date && date <= end)
                    .unwrap_or(false)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if filtered.is_empty() {
            return Some(Value::Null);
        }
        return Some(Value::Object(filtered));
    }

    None
}

/// Generates the trading-day price series over an inclusive date range.
fn price_series(symbol: &str, start: NaiveDate, end: NaiveDate, calculate_average: bool) -> Value {
    let span_days = (end - start).num_days() + 1;

    let mut prices = Map::new();
    let mut cursor = start;
    while cursor <= end {
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            prices.insert(
                cursor.format(DATE_FORMAT).to_string(),
                json!(price_on(symbol, cursor)),
            );
        }
        cursor += Duration::days(1);
    }

    if calculate_average && !prices.is_empty() {
        let values: Vec<f64> = prices.values().filter_map(Value::as_f64).collect();
        let average = round2(values.iter().sum::<f64>() / values.len() as f64);
        return json!({
            "prices": prices,
            "average": average,
            "period": format!("{span_days} days")
        });
    }

    Value::Object(prices)
}

/// Deterministic closing price for one symbol on one date.
#[allow(clippy::cast_precision_loss)]
fn price_on(symbol: &str, date: NaiveDate) -> f64 {
    let base = 50.0 + (fnv1a(symbol) % 200) as f64;
    let wobble = (fnv1a(&format!("{symbol}:{date}")) % 1000) as f64 / 100.0;
    round2(base + wobble)
}

/// Accepts `YYYY-MM-DD`, `today`, or `N days ago`.
fn parse_flexible_date(input: &str, today: NaiveDate) -> ToolResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("today") {
        return Ok(today);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(count) = lower.strip_suffix("days ago") {
        if let Ok(days) = count.trim().parse::<i64>() {
            return Ok(today - Duration::days(days));
        }
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        ToolError::invalid_arguments(format!(
            "invalid date; use YYYY-MM-DD, `today`, or `N days ago`: {input}"
        ))
    })
}

fn required_str(args: &ToolArgs, key: &str) -> ToolResult<String> {
    opt_str(args, key).ok_or_else(|| ToolError::invalid_arguments(format!("`{key}` is required")))
}

fn opt_str(args: &ToolArgs, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn flag(args: &ToolArgs, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
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
    async fn current_price_is_a_stable_number() {
        let tool = StockPriceTool::new().unwrap();
        let first = tool
            .invoke("execute", args(json!({"symbol": "AAPL"})))
            .await
            .unwrap();
        let second = tool
            .invoke("execute", args(json!({"symbol": "AAPL"})))
            .await
            .unwrap();

        assert!(first.is_number());
        assert_eq!(first, second);

        let other = tool
            .invoke("execute", args(json!({"symbol": "MSFT"})))
            .await
            .unwrap();
        assert_ne!(first, other);
    }

    #[tokio::test]
    async fn period_with_average_returns_summary() {
        let tool = StockPriceTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({"symbol": "AAPL", "period": "7d", "calculate_average": true})),
            )
            .await
            .unwrap();

        let summary = result.as_object().unwrap();
        assert!(summary["prices"].as_object().unwrap().len() >= 5);
        assert!(summary["average"].is_number());
        assert_eq!(summary["period"], json!("12 days"));
    }

    #[tokio::test]
    async fn historical_range_skips_weekends() {
        let tool = StockPriceTool::new().unwrap();
        // 2025-06-02 is a Monday; the range covers one full week.
        let result = tool
            .invoke(
                "execute",
                args(json!({
                    "symbol": "AAPL",
                    "start_date": "2025-06-02",
                    "end_date": "2025-06-08"
                })),
            )
            .await
            .unwrap();

        let prices = result.as_object().unwrap();
        assert_eq!(prices.len(), 5);
        assert!(!prices.contains_key("2025-06-07"));
        assert!(!prices.contains_key("2025-06-08"));
    }

    #[tokio::test]
    async fn scalar_previous_result_passes_through() {
        let tool = StockPriceTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({"symbol": "AAPL", "previous_result": 150.25})),
            )
            .await
            .unwrap();
        assert_eq!(result, json!(150.25));
    }

    #[tokio::test]
    async fn previous_prices_are_reaveraged_without_a_fetch() {
        let tool = StockPriceTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({
                    "symbol": "AAPL",
                    "calculate_average": true,
                    "previous_result": {
                        "prices": {"2025-01-01": 100.0, "2025-01-02": 200.0},
                        "period": "2 days"
                    }
                })),
            )
            .await
            .unwrap();

        assert_eq!(result["average"], json!(150.0));
        assert_eq!(result["period"], json!("2 days"));
    }

    #[tokio::test]
    async fn previous_prices_can_be_filtered_by_range() {
        let tool = StockPriceTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({
                    "symbol": "AAPL",
                    "start_date": "2025-01-02",
                    "end_date": "2025-01-03",
                    "previous_result": {
                        "2025-01-01": 100.0,
                        "2025-01-02": 110.0,
                        "2025-01-03": 120.0,
                        "2025-01-04": 130.0
                    }
                })),
            )
            .await
            .unwrap();

        let filtered = result.as_object().unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains_key("2025-01-02"));
        assert!(filtered.contains_key("2025-01-03"));
    }

    #[tokio::test]
    async fn relative_dates_are_accepted() {
        let tool = StockPriceTool::new().unwrap();
        let result = tool
            .invoke(
                "execute",
                args(json!({
                    "symbol": "AAPL",
                    "start_date": "10 days ago",
                    "end_date": "today"
                })),
            )
            .await
            .unwrap();
        assert!(result.as_object().unwrap().len() >= 6);
    }

    #[tokio::test]
    async fn rejects_missing_symbol_and_bad_dates() {
        let tool = StockPriceTool::new().unwrap();

        let err = tool.invoke("execute", ToolArgs::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));

        let err = tool
            .invoke(
                "execute",
                args(json!({"symbol": "AAPL", "date": "last tuesday"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn rejects_unknown_operations() {
        let tool = StockPriceTool::new().unwrap();
        let err = tool
            .invoke("refresh", args(json!({"symbol": "AAPL"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownOperation { .. }));
    }
}
