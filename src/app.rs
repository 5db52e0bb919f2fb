use crate::{
    Result,
    app::{
        aggregator::{
            QuoteRequest,
            SwapAggregator,
        },
        envelope::{
            ActionMetadata,
            ActionPostResponse,
            LinkedAction,
        },
        ledger::Ledger,
        memo_transaction::{
            build_blank_transaction,
            encode_transaction,
        },
        store::Pack,
    },
    config::{
        Config,
        SWAP_SLIPPAGE_BPS,
    },
};
use solana_sdk::pubkey::Pubkey;

pub mod actix_api;
pub mod aggregator;
pub mod envelope;
pub mod farm;
pub mod ledger;
pub mod memo_transaction;
pub mod store;


pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Where a POST lands, derived from the `scene`/`action`/`pack` query
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Farm,
    StoreBrowse,
    StoreBuy(Pack),
    Unknown,
}

impl Route {
    /// `scene=store&action=buy` requires a known pack; a missing or bogus
    /// pack there is the caller's mistake rather than an unknown scene, so
    /// it maps to `None` and the HTTP layer rejects it.
    pub fn from_query(
        scene: Option<&str>,
        action: Option<&str>,
        pack: Option<&str>,
    ) -> Option<Route> {
        match scene {
            Some("farm") => Some(Route::Farm),
            Some("store") => match action {
                Some("buy") => pack.and_then(Pack::from_param).map(Route::StoreBuy),
                _ => Some(Route::StoreBrowse),
            },
            _ => Some(Route::Unknown),
        }
    }
}

/// The action router. One instance is shared across requests; every request
/// is computed fresh from the current on-chain balance, so there is no
/// mutable state here.
pub struct App<L, A> {
    config: Config,
    ledger: L,
    aggregator: A,
}

impl<L, A> App<L, A> {
    pub fn new(config: Config, ledger: L, aggregator: A) -> Self {
        Self {
            config,
            ledger,
            aggregator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<L: Ledger, A: SwapAggregator> App<L, A> {
    /// Static top-level menu served for GET (and OPTIONS, which aliases it).
    pub fn root_menu(&self) -> ActionMetadata {
        ActionMetadata::with_actions(
            format!("{}/thumbnail.png", self.config.base_url),
            "Carrot Happy Farm 🥕",
            "Grow Carrot (CRT) on your farm.",
            "",
            vec![
                LinkedAction::new("Your 🥕 Farm", "/api/action?scene=farm"),
                LinkedAction::new("🥕 Store", "/api/action?scene=store"),
            ],
        )
    }

    /// `scene=farm`: a blank transaction to sign plus the caller's farm
    /// rendered from their current balance.
    pub async fn farm_view(&self, sender: &Pubkey) -> Result<ActionPostResponse> {
        let (balance, blockhash) = tokio::join!(
            self.display_balance(sender),
            self.ledger.latest_blockhash(),
        );
        let transaction =
            encode_transaction(&build_blank_transaction(sender, blockhash?))?;
        Ok(ActionPostResponse::with_next_action(
            transaction,
            self.farm_metadata(sender, balance),
        ))
    }

    /// `scene=store` without a buy action: a blank transaction plus the
    /// static pack menu.
    pub async fn store_view(&self, sender: &Pubkey) -> Result<ActionPostResponse> {
        let blockhash = self.ledger.latest_blockhash().await?;
        let transaction = encode_transaction(&build_blank_transaction(sender, blockhash))?;
        let mut actions: Vec<LinkedAction> = Pack::all()
            .into_iter()
            .map(|pack| LinkedAction::new(pack.store_label(), pack.buy_href()))
            .collect();
        actions.push(LinkedAction::new("Back to 🥕 Farm", "/api/action?scene=farm"));
        Ok(ActionPostResponse::with_next_action(
            transaction,
            ActionMetadata::with_actions(
                format!("{}/shop.png", self.config.base_url),
                "Carrot Store",
                "Packs of seeds to grow carrots in your farm.",
                "🥕 Store",
                actions,
            ),
        ))
    }

    /// `scene=store&action=buy`: quote and build a USDC→CRT swap through the
    /// aggregator, passing its transaction through verbatim. The farm shown
    /// next to it reflects the pre-purchase balance.
    pub async fn buy_pack(&self, sender: &Pubkey, pack: Pack) -> Result<ActionPostResponse> {
        let request = QuoteRequest {
            input_mint: self.config.usdc_mint,
            output_mint: self.config.crt_mint,
            amount: pack.price_base_units(),
            slippage_bps: SWAP_SLIPPAGE_BPS,
        };
        // The balance only feeds the farm view shown after the purchase, so
        // it can ride alongside the quote.
        let (balance, quote) = tokio::join!(
            self.display_balance(sender),
            self.aggregator.quote(request),
        );
        let transaction = self.aggregator.swap(&quote?, sender).await?;
        Ok(ActionPostResponse::with_next_action(
            transaction,
            self.farm_metadata(sender, balance),
        ))
    }

    /// Current balance for display. A fetch failure renders as an empty
    /// farm, matching the "no token account yet" state; the error is logged
    /// so a misbehaving RPC node does not pass silently.
    async fn display_balance(&self, owner: &Pubkey) -> f64 {
        match self.ledger.token_balance(owner).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!(
                    "failed to fetch balance for {owner}, rendering empty farm: {e:?}"
                );
                0.0
            }
        }
    }

    fn farm_metadata(&self, sender: &Pubkey, balance: f64) -> ActionMetadata {
        let points = balance * farm::POINTS_PER_TOKEN;
        ActionMetadata::with_actions(
            farm::farm_image(&self.config.base_url, points),
            format!("{}'s 🥕 Farm", farm::trim_address(&sender.to_string())),
            farm::farm_description(points),
            "🥕 Farm",
            vec![LinkedAction::new("Go to 🥕 Store", "/api/action?scene=store")],
        )
    }
}
