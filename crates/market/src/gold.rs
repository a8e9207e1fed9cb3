//! Gold and fiat reference prices.
//!
//! The debt asset is pegged to 1 mg of gold, so the feed pipeline needs an
//! external gold price. Primary source is the Russian Central Bank (gold in
//! RUB per gram, USD/RUB from the JSON mirror); DEX settlement feeds serve
//! as fallback, quoted per troy ounce.

use crate::errors::MarketError;
use crate::source::TickerClient;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration as StdDuration;

/// Milligrams per troy ounce.
pub const MG_PER_TROY_OUNCE: f64 = 31_103.4768;

const CBR_METALL_URL: &str = "https://www.cbr.ru/scripts/xml_metall.asp";
const CBR_DAILY_JSON_URL: &str = "https://www.cbr-xml-daily.ru/daily_json.js";
const HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// Convert a per-troy-ounce price into a per-milligram price.
pub fn price_troy_ounce_to_price_1mg(price: f64) -> f64 {
    price / MG_PER_TROY_OUNCE
}

/// Inverse of [`price_troy_ounce_to_price_1mg`].
pub fn price_1mg_to_price_troy_ounce(price: f64) -> f64 {
    price * MG_PER_TROY_OUNCE
}

// Gold is metal code 1 in the CBR metals bulletin.
static CBR_GOLD_RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<Record[^>]*Code="1"[^>]*>.*?<Buy>([^<]+)</Buy>"#)
        .expect("static regex")
});

/// Client for the CBR fiat/metal rate endpoints.
#[derive(Debug, Clone)]
pub struct CbrRates {
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct CbrDaily {
    #[serde(rename = "Valute")]
    valute: HashMap<String, CbrValute>,
}

#[derive(Deserialize)]
struct CbrValute {
    #[serde(rename = "Value")]
    value: f64,
}

impl CbrRates {
    pub fn new() -> Result<Self, MarketError> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Gold price in RUB per milligram.
    ///
    /// The bulletin may be empty on Mondays, so a two-day window is
    /// requested and the first gold record wins.
    pub async fn gold_rub_per_mg(&self) -> Result<f64, MarketError> {
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);
        let response = self
            .client
            .get(CBR_METALL_URL)
            .query(&[
                ("date_req1", yesterday.format("%d/%m/%Y").to_string()),
                ("date_req2", today.format("%d/%m/%Y").to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        let raw = CBR_GOLD_RECORD
            .captures(&body)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| MarketError::Source("no gold record in CBR bulletin".to_string()))?
            .as_str();
        let per_gram = parse_cbr_decimal(raw)?;

        // The bulletin quotes grams.
        Ok(per_gram / 1000.0)
    }

    /// USD/RUB rate from the daily JSON mirror.
    pub async fn usd_rub(&self) -> Result<f64, MarketError> {
        let daily: CbrDaily = self
            .client
            .get(CBR_DAILY_JSON_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        daily
            .valute
            .get("USD")
            .map(|v| v.value)
            .ok_or_else(|| MarketError::Source("USD missing from CBR daily rates".to_string()))
    }

    /// Gold price in USD per milligram, derived from the two RUB rates.
    pub async fn gold_usd_per_mg(&self) -> Result<f64, MarketError> {
        let (gold, usd) = tokio::join!(self.gold_rub_per_mg(), self.usd_rub());
        let gold = gold?;
        let usd = usd?;
        if usd == 0.0 {
            return Err(MarketError::DivisionByZero);
        }
        Ok(gold / usd)
    }
}

/// Anything that can answer "how many USD for a milligram of gold".
///
/// The central-bank client below is the production source; feed pipelines
/// take the trait so tests can pin the rate.
#[async_trait]
pub trait GoldPriceSource: Send + Sync {
    async fn usd_per_mg(&self) -> Result<f64, MarketError>;
}

#[async_trait]
impl GoldPriceSource for CbrRates {
    async fn usd_per_mg(&self) -> Result<f64, MarketError> {
        self.gold_usd_per_mg().await
    }
}

/// CBR decimals use a comma separator; the integer part is precise enough
/// for a reference rate.
fn parse_cbr_decimal(raw: &str) -> Result<f64, MarketError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = cleaned.replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| MarketError::Source(format!("unparseable CBR rate: {raw:?}")))
}

/// Exchanges polled for the BTC/USD reference, with their dollar symbol.
const BTC_USD_EXCHANGES: [(&str, &str); 4] = [
    ("binance", "USDT"),
    ("bittrex", "USDT"),
    ("coinbase", "USD"),
    ("gemini", "USD"),
];

/// Average BTC/USD across several exchanges.
///
/// Tickers are fetched concurrently; an exchange that fails is logged and
/// skipped, and only an empty surviving set is an error.
pub async fn average_btc_usd(ticker_client: &dyn TickerClient) -> Result<f64, MarketError> {
    let fetches = BTC_USD_EXCHANGES.iter().map(|(exchange, symbol)| async move {
        let market = format!("BTC/{symbol}");
        (*exchange, ticker_client.fetch_ticker(exchange, &market).await)
    });

    let mut prices = Vec::new();
    for (exchange, result) in join_all(fetches).await {
        match result {
            Ok(ticker) => prices.push(ticker.last),
            Err(err) => tracing::warn!(exchange, %err, "ticker fetch failed, skipping"),
        }
    }

    if prices.is_empty() {
        return Err(MarketError::InsufficientData);
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Ticker;
    use async_trait::async_trait;

    #[test]
    fn rates_client_builds_without_panicking() {
        assert!(CbrRates::new().is_ok());
    }

    #[test]
    fn troy_ounce_conversion_round_trips() {
        let original = 1_934.25;
        let per_mg = price_troy_ounce_to_price_1mg(original);
        let back = price_1mg_to_price_troy_ounce(per_mg);
        assert!((back - original).abs() < 1e-9);
    }

    #[test]
    fn parses_cbr_decimal_with_comma() {
        assert_eq!(parse_cbr_decimal("5123,45").unwrap(), 5123.45);
        assert_eq!(parse_cbr_decimal("5 123,45").unwrap(), 5123.45);
        assert!(parse_cbr_decimal("xynta").is_err());
    }

    #[test]
    fn extracts_gold_record_from_bulletin() {
        let body = r#"<?xml version="1.0"?>
            <Metall>
              <Record Date="01.04.2023" Code="2"><Buy>65,11</Buy><Sell>65,11</Sell></Record>
              <Record Date="01.04.2023" Code="1"><Buy>5 123,45</Buy><Sell>5 123,45</Sell></Record>
            </Metall>"#;
        let raw = CBR_GOLD_RECORD.captures(body).unwrap().get(1).unwrap();
        assert_eq!(parse_cbr_decimal(raw.as_str()).unwrap(), 5123.45);
    }

    struct FlakyTickers;

    #[async_trait]
    impl TickerClient for FlakyTickers {
        async fn fetch_ticker(&self, exchange: &str, _market: &str) -> Result<Ticker, MarketError> {
            match exchange {
                "binance" => Ok(Ticker { last: 30_000.0 }),
                "coinbase" => Ok(Ticker { last: 31_000.0 }),
                _ => Err(MarketError::Source("down".to_string())),
            }
        }
    }

    struct DeadTickers;

    #[async_trait]
    impl TickerClient for DeadTickers {
        async fn fetch_ticker(&self, _: &str, _: &str) -> Result<Ticker, MarketError> {
            Err(MarketError::Source("down".to_string()))
        }
    }

    #[tokio::test]
    async fn averages_surviving_exchanges() {
        let price = average_btc_usd(&FlakyTickers).await.unwrap();
        assert_eq!(price, 30_500.0);
    }

    #[tokio::test]
    async fn all_exchanges_down_is_insufficient_data() {
        assert!(matches!(
            average_btc_usd(&DeadTickers).await,
            Err(MarketError::InsufficientData)
        ));
    }
}
