use crate::Result;
use anyhow::{
    Context,
    anyhow,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

/// Upper bound on any single aggregator call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Input amount in the input mint's base units.
    pub amount: u64,
    pub slippage_bps: u16,
}

/// External swap aggregator. The quote is an opaque pass-through value: its
/// schema belongs to the aggregator and we only hand it back on `swap`.
pub trait SwapAggregator {
    fn quote(&self, request: QuoteRequest) -> impl Future<Output = Result<Value>>;

    /// Returns the serialized unsigned swap transaction, verbatim.
    fn swap(&self, quote: &Value, user: &Pubkey) -> impl Future<Output = Result<String>>;
}

#[derive(Clone)]
pub struct JupiterAggregator {
    base_url: String,
    http: reqwest::Client,
}

impl JupiterAggregator {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client for swap aggregator")?;
        Ok(Self { base_url, http })
    }
}

#[derive(Serialize)]
struct SwapRequestDto<'a> {
    #[serde(rename = "quoteResponse")]
    quote_response: &'a Value,
    #[serde(rename = "userPublicKey")]
    user_public_key: String,
}

#[derive(Deserialize)]
struct SwapResponseDto {
    #[serde(rename = "swapTransaction")]
    swap_transaction: String,
}

impl SwapAggregator for JupiterAggregator {
    async fn quote(&self, request: QuoteRequest) -> Result<Value> {
        let url = format!(
            "{}/quote?inputMint={}&outputMint={}&amount={}&slippageBps={}",
            self.base_url,
            request.input_mint,
            request.output_mint,
            request.amount,
            request.slippage_bps,
        );
        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("aggregator quote request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(anyhow!(
                "aggregator responded with {status} when quoting swap: {body}"
            ));
        }
        res.json().await.context("invalid aggregator quote payload")
    }

    async fn swap(&self, quote: &Value, user: &Pubkey) -> Result<String> {
        let url = format!("{}/swap", self.base_url);
        let body = SwapRequestDto {
            quote_response: quote,
            user_public_key: user.to_string(),
        };
        let res = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .context("aggregator swap request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(anyhow!(
                "aggregator responded with {status} when building swap: {body}"
            ));
        }
        let dto: SwapResponseDto =
            res.json().await.context("invalid aggregator swap payload")?;
        Ok(dto.swap_transaction)
    }
}
