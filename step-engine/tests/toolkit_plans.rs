//! Plan execution over the ready-made toolkit tools.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use step_engine::{
    ExecutionContext, PlanError, PlanRunner, Planner, Step, SynthesisError, Synthesizer,
};
use step_tools::{CapabilityCatalog, ToolArgs, ToolRegistry};
use step_toolkit::{NewsFeedTool, StockPriceTool, WeatherTool};

struct FixedPlanner {
    steps: Mutex<Option<Vec<Step>>>,
}

#[async_trait]
impl Planner for FixedPlanner {
    async fn plan(
        &self,
        _question: &str,
        _catalog: &CapabilityCatalog,
    ) -> Result<Vec<Step>, PlanError> {
        self.steps
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| PlanError::malformed("no plan configured"))
    }
}

struct CapturingSynthesizer {
    captured: Mutex<Option<ExecutionContext>>,
}

#[async_trait]
impl Synthesizer for CapturingSynthesizer {
    async fn synthesize(
        &self,
        _question: &str,
        context: &ExecutionContext,
    ) -> Result<String, SynthesisError> {
        *self.captured.lock().unwrap() = Some(context.clone());
        Ok("done".to_owned())
    }
}

fn full_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(StockPriceTool::new().unwrap()))
        .unwrap();
    registry
        .register(Arc::new(WeatherTool::new().unwrap()))
        .unwrap();
    registry
        .register(Arc::new(NewsFeedTool::new().unwrap()))
        .unwrap();
    registry
}

fn params(value: serde_json::Value) -> ToolArgs {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[tokio::test]
async fn stock_quote_feeds_the_next_step() {
    let planner = Arc::new(FixedPlanner {
        steps: Mutex::new(Some(vec![
            Step::tool_call(
                "Fetch current price for AAPL stock",
                "StockPriceTool",
                params(json!({"symbol": "AAPL"})),
            ),
            Step::tool_call(
                "Reuse the fetched price",
                "StockPriceTool",
                params(json!({
                    "function_name": "execute",
                    "use_previous_results": 0,
                    "symbol": "AAPL"
                })),
            ),
        ])),
    });
    let synthesizer = Arc::new(CapturingSynthesizer {
        captured: Mutex::new(None),
    });

    let runner = PlanRunner::new(
        Arc::new(full_registry()),
        planner,
        Arc::clone(&synthesizer) as _,
    );
    runner.answer("What does AAPL trade at?").await.unwrap();

    let context = synthesizer.captured.lock().unwrap().clone().unwrap();
    assert_eq!(context.len(), 2);

    let quote = context.result_at(0).unwrap().clone();
    assert!(quote.is_number());
    // A bound scalar previous result passes straight through.
    assert_eq!(context.result_at(1), Some(&quote));
}

#[tokio::test]
async fn mixed_plan_touches_every_tool() {
    let planner = Arc::new(FixedPlanner {
        steps: Mutex::new(Some(vec![
            Step::tool_call(
                "Check the weather in New York",
                "WeatherTool",
                params(json!({"location": "New York", "forecast_days": 2})),
            ),
            Step::tool_call(
                "Fetch Tesla headlines",
                "NewsFeedTool",
                params(json!({
                    "function_name": "fetch_company_news",
                    "company_name": "Tesla",
                    "max_articles": 2
                })),
            ),
            Step::reasoning("Relate the forecast to the coverage"),
        ])),
    });
    let synthesizer = Arc::new(CapturingSynthesizer {
        captured: Mutex::new(None),
    });

    let runner = PlanRunner::new(
        Arc::new(full_registry()),
        planner,
        Arc::clone(&synthesizer) as _,
    );
    runner.answer("weather and news?").await.unwrap();

    let context = synthesizer.captured.lock().unwrap().clone().unwrap();
    assert_eq!(context.len(), 3);

    let weather = context.result_at(0).unwrap();
    assert!(weather["current"].is_object());
    assert_eq!(weather["forecast"].as_array().unwrap().len(), 2);

    let news = context.result_at(1).unwrap();
    assert_eq!(news.as_array().unwrap().len(), 2);

    assert!(context.result_at(2).is_none());
}

#[tokio::test]
async fn catalog_covers_registered_tools() {
    let registry = full_registry();
    let catalog = registry.capability_catalog();

    assert!(catalog.contains_key("StockPriceTool"));
    assert!(catalog.contains_key("WeatherTool"));
    assert!(catalog.contains_key("NewsFeedTool"));

    let stock = &catalog["StockPriceTool"];
    assert!(stock.iter().any(|cap| cap.name == "get_current_price"));
}
