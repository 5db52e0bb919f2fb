use crate::Result;
use anyhow::Context;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use std::time::Duration;

/// Fraction digits kept when normalizing a balance for display.
const BALANCE_PRECISION: f64 = 10_000.0;

/// Upper bound on any single RPC call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only view of the chain: the caller's CRT holding and a blockhash to
/// stamp transactions with.
pub trait Ledger {
    fn token_balance(&self, owner: &Pubkey) -> impl Future<Output = Result<f64>>;

    fn latest_blockhash(&self) -> impl Future<Output = Result<Hash>>;
}

pub struct RpcLedger {
    client: RpcClient,
    mint: Pubkey,
}

impl RpcLedger {
    pub fn new(rpc_url: impl Into<String>, mint: Pubkey) -> Self {
        Self {
            client: RpcClient::new_with_timeout(rpc_url.into(), REQUEST_TIMEOUT),
            mint,
        }
    }
}

impl Ledger for RpcLedger {
    async fn token_balance(&self, owner: &Pubkey) -> Result<f64> {
        // CRT is a Token-2022 asset, so the ATA lives under that program.
        let token_account = get_associated_token_address_with_program_id(
            owner,
            &self.mint,
            &spl_token_2022::id(),
        );
        let balance = self
            .client
            .get_token_account_balance(&token_account)
            .await
            .with_context(|| format!("fetching token balance of {token_account}"))?;
        let amount = balance.ui_amount.unwrap_or(0.0);
        Ok((amount * BALANCE_PRECISION).round() / BALANCE_PRECISION)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .context("fetching latest blockhash")
    }
}
