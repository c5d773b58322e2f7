//! News feed tool: keyword, company, and sector searches over a
//! deterministic synthetic article store.
//!
//! The only multi-operation tool in the kit; it exercises operation
//! dispatch via `function_name`.

use async_trait::async_trait;
use chrono::{Duration, Local};
use serde_json::{Value, json};

use step_primitives::{
    OperationSpec, ParameterSpec, ToolCategory, ToolDescriptor, TypeSpec,
};
use step_tools::{Tool, ToolArgs, ToolError, ToolResult};

use crate::hash::fnv1a;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;
const DEFAULT_LOOKBACK_DAYS: i64 = 20;

const SUPPORTED_SECTORS: [&str; 7] = [
    "technology",
    "finance",
    "healthcare",
    "energy",
    "automotive",
    "retail",
    "media",
];

const COMPANY_TICKERS: [(&str, &str); 9] = [
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("amazon", "AMZN"),
    ("tesla", "TSLA"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
];

const SOURCES: [&str; 6] = [
    "Reuters",
    "Bloomberg",
    "TechCrunch",
    "The Verge",
    "Financial Times",
    "Associated Press",
];

/// Fetches news articles by keyword, company, or sector.
///
/// Banking-related queries should use `finance` as the sector.
pub struct NewsFeedTool {
    descriptor: ToolDescriptor,
}

impl NewsFeedTool {
    /// Builds the tool and its descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error when the descriptor cannot be assembled.
    pub fn new() -> step_primitives::Result<Self> {
        let article_list = TypeSpec::map(TypeSpec::Str, TypeSpec::Any).list();

        let descriptor = ToolDescriptor::builder("NewsFeedTool")
            .description(
                "Fetches news articles by keyword, company, or sector. \
                 Supported sectors: technology, finance, healthcare, energy, \
                 automotive, retail, media. For banking-related queries, use \
                 finance as the sector.",
            )
            .category(ToolCategory::News)
            .operation(
                OperationSpec::builder("fetch_articles")
                    .description("Fetch news articles for a keyword and time range")
                    .parameter(
                        ParameterSpec::new("keyword", TypeSpec::Str)
                            .with_description("Search term to query articles for"),
                    )
                    .parameter(
                        ParameterSpec::new("days", TypeSpec::Int.optional())
                            .with_description("Number of past days to search")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("max_articles", TypeSpec::Int.optional())
                            .with_description("Maximum number of articles to return")
                            .optional(),
                    )
                    .returns(article_list.clone())
                    .build()?,
            )
            .operation(
                OperationSpec::builder("fetch_company_news")
                    .description("Fetch news about a specific company")
                    .parameter(
                        ParameterSpec::new("company_name", TypeSpec::Str)
                            .with_description("Name of the company"),
                    )
                    .parameter(
                        ParameterSpec::new("include_ticker", TypeSpec::Bool)
                            .with_description("Also match the stock ticker in searches")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("days", TypeSpec::Int.optional())
                            .with_description("Number of past days to search")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("max_articles", TypeSpec::Int.optional())
                            .with_description("Maximum number of articles to return")
                            .optional(),
                    )
                    .returns(article_list.clone())
                    .build()?,
            )
            .operation(
                OperationSpec::builder("fetch_sector_news")
                    .description("Fetch popular news about an industry sector")
                    .parameter(
                        ParameterSpec::new("sector", TypeSpec::Str)
                            .with_description("Sector name, e.g. technology or finance"),
                    )
                    .parameter(
                        ParameterSpec::new("country", TypeSpec::Str.optional())
                            .with_description("Two-letter country code")
                            .optional(),
                    )
                    .parameter(
                        ParameterSpec::new("max_articles", TypeSpec::Int.optional())
                            .with_description("Maximum number of articles to return")
                            .optional(),
                    )
                    .returns(article_list)
                    .build()?,
            )
            .build()?;

        Ok(Self { descriptor })
    }

    fn fetch_articles(&self, args: &ToolArgs) -> ToolResult<Value> {
        let keyword = required_str(args, "keyword")?;
        Ok(articles_for(&keyword, lookback(args), page_size(args)))
    }

    fn fetch_company_news(&self, args: &ToolArgs) -> ToolResult<Value> {
        let company = required_str(args, "company_name")?;
        let include_ticker = args
            .get("include_ticker")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let mut query = company.clone();
        if include_ticker {
            if let Some((_, ticker)) = COMPANY_TICKERS
                .iter()
                .find(|(name, _)| *name == company.to_lowercase())
            {
                query = format!("({company} OR {ticker})");
            }
        }

        Ok(articles_for(&query, lookback(args), page_size(args)))
    }

    fn fetch_sector_news(&self, args: &ToolArgs) -> ToolResult<Value> {
        let sector = required_str(args, "sector")?.to_lowercase();
        if !SUPPORTED_SECTORS.contains(&sector.as_str()) {
            return Err(ToolError::invalid_arguments(format!(
                "unsupported sector `{sector}`; supported sectors: {}",
                SUPPORTED_SECTORS.join(", ")
            )));
        }

        let query = match args.get("country").and_then(Value::as_str) {
            Some(country) => format!("{sector}:{}", country.to_lowercase()),
            None => sector,
        };
        Ok(articles_for(&query, DEFAULT_LOOKBACK_DAYS, page_size(args)))
    }
}

#[async_trait]
impl Tool for NewsFeedTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, operation: &str, args: ToolArgs) -> ToolResult<Value> {
        match operation {
            "fetch_articles" => self.fetch_articles(&args),
            "fetch_company_news" => self.fetch_company_news(&args),
            "fetch_sector_news" => self.fetch_sector_news(&args),
            other => Err(ToolError::unknown_operation("NewsFeedTool", other)),
        }
    }
}

/// Generates a stable article list for one query.
fn articles_for(query: &str, lookback_days: i64, count: u64) -> Value {
    let today = Local::now().date_naive();
    let articles: Vec<Value> = (0..count)
        .map(|index| {
            let seed = fnv1a(&format!("{query}#{index}"));
            let age = i64::try_from(seed % u64::try_from(lookback_days.max(1)).unwrap_or(1))
                .unwrap_or(0);
            let published = today - Duration::days(age);
            let source = SOURCES[usize::try_from(seed % 6).unwrap_or(0)];
            json!({
                "title": format!("{query}: development {}", index + 1),
                "source": source,
                "published_at": published.format("%Y-%m-%d").to_string(),
                "url": format!(
                    "https://news.example.com/{}/{:016x}",
                    source.to_lowercase().replace(' ', "-"),
                    seed
                )
            })
        })
        .collect();
    Value::Array(articles)
}

fn lookback(args: &ToolArgs) -> i64 {
    args.get("days")
        .and_then(Value::as_i64)
        .filter(|days| *days > 0)
        .unwrap_or(DEFAULT_LOOKBACK_DAYS)
}

fn page_size(args: &ToolArgs) -> u64 {
    args.get("max_articles")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE)
}

fn required_str(args: &ToolArgs, key: &str) -> ToolResult<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ToolError::invalid_arguments(format!("`{key}` is required")))
}
