//! Centralized-exchange ticker access.

use async_trait::async_trait;
use graphene_market::{MarketError, Ticker, TickerClient};
use serde::Deserialize;
use std::time::Duration;

const TICKER_TIMEOUT: Duration = Duration::from_secs(5);

/// [`TickerClient`] over the public REST endpoints of the supported
/// exchanges. Stateless; one shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTickerClient {
    client: reqwest::Client,
}

impl HttpTickerClient {
    pub fn new() -> Result<Self, MarketError> {
        let client = reqwest::Client::builder().timeout(TICKER_TIMEOUT).build()?;
        Ok(Self { client })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, MarketError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

#[derive(Deserialize)]
struct BinanceTicker {
    price: String,
}

#[derive(Deserialize)]
struct CoinbaseSpot {
    data: CoinbaseAmount,
}

#[derive(Deserialize)]
struct CoinbaseAmount {
    amount: String,
}

#[derive(Deserialize)]
struct GeminiTicker {
    last: String,
}

#[derive(Deserialize)]
struct KunaTicker {
    ticker: KunaTickerInner,
}

#[derive(Deserialize)]
struct KunaTickerInner {
    last: String,
}

fn parse_last(raw: &str, exchange: &str) -> Result<f64, MarketError> {
    raw.parse::<f64>()
        .map_err(|_| MarketError::Source(format!("bad price from {exchange}: {raw:?}")))
}

#[async_trait]
impl TickerClient for HttpTickerClient {
    async fn fetch_ticker(&self, exchange: &str, market: &str) -> Result<Ticker, MarketError> {
        let (quote, base) = graphene_market::split_pair(market)?;
        let last = match exchange {
            "binance" => {
                let url =
                    format!("https://api.binance.com/api/v3/ticker/price?symbol={quote}{base}");
                let ticker: BinanceTicker = self.get_json(&url).await?;
                parse_last(&ticker.price, exchange)?
            }
            "coinbase" => {
                let url = format!("https://api.coinbase.com/v2/prices/{quote}-{base}/spot");
                let spot: CoinbaseSpot = self.get_json(&url).await?;
                parse_last(&spot.data.amount, exchange)?
            }
            "gemini" => {
                let symbol = format!("{quote}{base}").to_lowercase();
                let url = format!("https://api.gemini.com/v1/pubticker/{symbol}");
                let ticker: GeminiTicker = self.get_json(&url).await?;
                parse_last(&ticker.last, exchange)?
            }
            "bittrex" => {
                let url =
                    format!("https://api.bittrex.com/v3/markets/{quote}-{base}/ticker");
                #[derive(Deserialize)]
                struct BittrexTicker {
                    #[serde(rename = "lastTradeRate")]
                    last_trade_rate: String,
                }
                let ticker: BittrexTicker = self.get_json(&url).await?;
                parse_last(&ticker.last_trade_rate, exchange)?
            }
            "kuna" => {
                let symbol = format!("{quote}{base}").to_lowercase();
                let url = format!("https://api.kuna.io/v3/markets/{symbol}/ticker");
                let ticker: KunaTicker = self.get_json(&url).await?;
                parse_last(&ticker.ticker.last, exchange)?
            }
            other => return Err(MarketError::Source(format!("unsupported exchange: {other}"))),
        };

        tracing::debug!(exchange, market, last, "fetched ticker");
        Ok(Ticker { last })
    }
}
