use anyhow::Context;
use async_trait::async_trait;

/// External exchange-rate collaborator. The booking core only ever sees the
/// resolved number.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn current_price(&self, currency: &str) -> anyhow::Result<f64>;
}

/// CoinGecko-style simple-price endpoint.
pub struct HttpPriceOracle {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPriceOracle {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PriceOracle for HttpPriceOracle {
    async fn current_price(&self, currency: &str) -> anyhow::Result<f64> {
        let id = coin_id(currency);
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, id
        );

        let body: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to reach price oracle")?
            .error_for_status()
            .context("price oracle returned error")?
            .json()
            .await
            .context("failed to parse price oracle response")?;

        body[id]["usd"]
            .as_f64()
            .context("price missing from oracle response")
    }
}

fn coin_id(currency: &str) -> &'static str {
    match currency {
        "lif" => "winding-tree",
        _ => "ethereum",
    }
}
