//! Capability discovery rules applied at registration time.

use std::collections::BTreeSet;

use step_primitives::{Capability, ToolCategory, ToolDescriptor};

/// Derives the capability list a tool advertises.
///
/// Two rule families apply: bespoke capabilities for well-known tool kinds,
/// then a generic `get_by_<param>` capability for every distinct required
/// parameter across the descriptor's operations. Capability names are kept
/// unique within the returned list.
pub(crate) fn discover_capabilities(descriptor: &ToolDescriptor) -> Vec<Capability> {
    let mut capabilities = Vec::new();
    let mut seen = BTreeSet::new();

    if is_price_tool(descriptor) {
        for capability in price_capabilities() {
            seen.insert(capability.name().to_owned());
            capabilities.push(capability);
        }
    }

    for operation in descriptor.operations() {
        for param in operation.parameters() {
            if !param.required() {
                continue;
            }
            let name = format!("get_by_{}", param.name());
            if !seen.insert(name.clone()) {
                continue;
            }
            let capability = Capability::builder(name)
                .description(format!("Get data by {}", param.name()))
                .require_param(param.name())
                .example(format!("Use {} to fetch data", param.name()))
                .fallback_strategy("Use general information")
                .build()
                .expect("generated capability is valid");
            capabilities.push(capability);
        }
    }

    capabilities
}

/// A finance-category tool with a required `symbol` parameter is treated as
/// a market price tool.
fn is_price_tool(descriptor: &ToolDescriptor) -> bool {
    descriptor.category() == ToolCategory::Finance
        && descriptor.operations().iter().any(|op| {
            op.parameter("symbol").is_some_and(step_primitives::ParameterSpec::required)
        })
}

fn price_capabilities() -> Vec<Capability> {
    vec![
        Capability::builder("get_current_price")
            .description("Get current stock price for a symbol")
            .require_param("symbol")
            .example("Get current price for AAPL")
            .fallback_tool("WebSearchTool")
            .fallback_tool("CachedPriceTool")
            .fallback_strategy("Try cached data or general market info")
            .build()
            .expect("capability is valid"),
        Capability::builder("get_historical_prices")
            .description("Get historical stock prices for a date range")
            .require_param("symbol")
            .require_param("start_date")
            .require_param("end_date")
            .example("Get AAPL prices from 2025-01-01 to 2025-01-07")
            .fallback_tool("WebSearchTool")
            .fallback_tool("CachedPriceTool")
            .fallback_strategy("Use available data points and interpolate")
            .build()
            .expect("capability is valid"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use step_primitives::{OperationSpec, ParameterSpec, TypeSpec};

    fn finance_descriptor() -> ToolDescriptor {
        ToolDescriptor::builder("StockPriceTool")
            .category(ToolCategory::Finance)
            .operation(
                OperationSpec::builder("execute")
                    .parameter(ParameterSpec::new("symbol", TypeSpec::Str))
                    .parameter(
                        ParameterSpec::new("period", TypeSpec::Str.optional()).optional(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn price_tool_gets_bespoke_capabilities() {
        let caps = discover_capabilities(&finance_descriptor());
        let names: Vec<_> = caps.iter().map(Capability::name).collect();
        assert_eq!(
            names,
            ["get_current_price", "get_historical_prices", "get_by_symbol"]
        );
    }

    #[test]
    fn generic_rule_skips_optional_parameters() {
        let descriptor = ToolDescriptor::builder("WeatherTool")
            .category(ToolCategory::Weather)
            .operation(
                OperationSpec::builder("execute")
                    .parameter(ParameterSpec::new("location", TypeSpec::Str))
                    .parameter(
                        ParameterSpec::new("forecast_days", TypeSpec::Int.optional()).optional(),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let caps = discover_capabilities(&descriptor);
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].name(), "get_by_location");
        assert_eq!(caps[0].required_params(), ["location".to_owned()]);
    }

    #[test]
    fn capability_names_are_unique_per_tool() {
        let descriptor = ToolDescriptor::builder("NewsFeedTool")
            .category(ToolCategory::News)
            .operation(
                OperationSpec::builder("fetch_articles")
                    .parameter(ParameterSpec::new("keyword", TypeSpec::Str))
                    .build()
                    .unwrap(),
            )
            .operation(
                OperationSpec::builder("search_archive")
                    .parameter(ParameterSpec::new("keyword", TypeSpec::Str))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let caps = discover_capabilities(&descriptor);
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].name(), "get_by_keyword");
    }

    #[test]
    fn non_finance_tool_gets_no_price_capabilities() {
        let descriptor = ToolDescriptor::builder("QuoteArchive")
            .operation(
                OperationSpec::builder("execute")
                    .parameter(ParameterSpec::new("symbol", TypeSpec::Str))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let caps = discover_capabilities(&descriptor);
        assert!(caps.iter().all(|c| c.name() != "get_current_price"));
    }
}
