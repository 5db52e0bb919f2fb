use crate::Result;
use anyhow::Context;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Carrot (CRT), the Token-2022 asset grown on the farm.
pub const CRT_MINT: &str = "CRTx1JouZhzSU6XytsE42UQraoGqiHgxabocVfARTy2s";

/// USDC, the currency seed packs are priced in.
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub const USDC_DECIMALS: u32 = 6;

/// Slippage tolerance for pack purchases, in basis points.
pub const SWAP_SLIPPAGE_BPS: u16 = 50;

pub const DEFAULT_AGGREGATOR_URL: &str = "https://quote-api.jup.ag/v6";

/// Static configuration for the actions endpoint. Built once at startup and
/// handed to the router; nothing here changes at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL where the thumbnail and farm images are hosted.
    pub base_url: String,
    /// Base URL of the swap aggregator HTTP API.
    pub aggregator_url: String,
    pub usdc_mint: Pubkey,
    pub crt_mint: Pubkey,
}

impl Config {
    pub fn new(
        base_url: impl Into<String>,
        aggregator_url: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let aggregator_url = aggregator_url.into().trim_end_matches('/').to_string();
        let usdc_mint = Pubkey::from_str(USDC_MINT).context("parsing USDC mint")?;
        let crt_mint = Pubkey::from_str(CRT_MINT).context("parsing CRT mint")?;
        Ok(Self {
            base_url,
            aggregator_url,
            usdc_mint,
            crt_mint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new__trims_trailing_slashes() {
        let config =
            Config::new("https://carrot.example/", "https://agg.example/v6/").unwrap();
        assert_eq!("https://carrot.example", config.base_url);
        assert_eq!("https://agg.example/v6", config.aggregator_url);
    }
}
