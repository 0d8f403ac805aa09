//! Country API demo
//!
//! This example demonstrates:
//! - Declaring a stored entity and its public resource
//! - Field mappings loaded from YAML, including a reverted sort field
//! - Data shaping, sorting and pagination on one collection endpoint
//!
//! Run with `cargo run --example country_api`, then try:
//!
//! ```text
//! curl -i 'http://127.0.0.1:3000/api/countries?fields=chineseName'
//! curl -i 'http://127.0.0.1:3000/api/countries?orderBy=englishName%20desc&pageSize=2'
//! curl -i 'http://127.0.0.1:3000/api/countries?orderBy=age&fields=englishName,age'
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use restshape::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Country {
    id: i64,
    english_name: String,
    chinese_name: String,
    abbreviation: String,
    founded_at: DateTime<Utc>,
}

impl_entity!(Country, "country", {
    "id" => id,
    "englishName" => english_name,
    "chineseName" => chinese_name,
    "abbreviation" => abbreviation,
    "foundedAt" => founded_at,
});

#[derive(Debug, Clone)]
struct CountryResource {
    id: i64,
    english_name: String,
    chinese_name: String,
    abbreviation: String,
    age: i64,
}

impl_resource!(CountryResource, "country", {
    "id" => id,
    "englishName" => english_name,
    "chineseName" => chinese_name,
    "abbreviation" => abbreviation,
    "age" => age,
});

impl From<&Country> for CountryResource {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            english_name: country.english_name.clone(),
            chinese_name: country.chinese_name.clone(),
            abbreviation: country.abbreviation.clone(),
            age: i64::from(Utc::now().year() - country.founded_at.year()),
        }
    }
}

fn country(id: i64, english: &str, chinese: &str, abbreviation: &str, founded: i32) -> Country {
    let founded_at = NaiveDate::from_ymd_opt(founded, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .unwrap_or_default();

    Country {
        id,
        english_name: english.to_string(),
        chinese_name: chinese.to_string(),
        abbreviation: abbreviation.to_string(),
        founded_at,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,restshape=debug")),
        )
        .init();

    let config_path = std::env::var("SHAPING_CONFIG")
        .unwrap_or_else(|_| "demos/country_api/shaping.yaml".to_string());
    tracing::info!("Loading configuration from {}", config_path);

    let repository = InMemoryRepository::with_items(vec![
        country(1, "China", "中国", "CN", 1949),
        country(2, "Japan", "日本", "JP", 1947),
        country(3, "France", "法国", "FR", 1958),
        country(4, "Brazil", "巴西", "BR", 1822),
        country(5, "Egypt", "埃及", "EG", 1953),
        country(6, "India", "印度", "IN", 1947),
        country(7, "Mexico", "墨西哥", "MX", 1821),
    ]);

    ServerBuilder::new()
        .with_config_file(&config_path)?
        .register_collection::<CountryResource, Country>("countries", "/api/countries", repository)
        .with_cors()
        .serve("127.0.0.1:3000")
        .await
}
