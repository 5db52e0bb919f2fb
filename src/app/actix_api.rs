use crate::{
    Result,
    app::{
        App,
        Route,
        aggregator::SwapAggregator,
        envelope::Acknowledgment,
        ledger::Ledger,
    },
};
use actix_cors::Cors;
use actix_web::{
    HttpResponse,
    HttpServer,
    dev::ServerHandle,
    error::{
        ErrorBadGateway,
        ErrorBadRequest,
        ErrorInternalServerError,
    },
    http::Method,
    web,
};
use anyhow::Context;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::{
    net::TcpListener,
    str::FromStr,
    thread::JoinHandle,
};

#[derive(Debug, Deserialize)]
struct ActionQuery {
    scene: Option<String>,
    action: Option<String>,
    pack: Option<String>,
}

/// Actions POST body. The signature field is part of the protocol but
/// nothing here reads it.
#[derive(Debug, Deserialize)]
struct PostBody {
    account: String,
    #[serde(default)]
    #[allow(dead_code)]
    signature: Option<String>,
}

pub struct ActixActionApi {
    base_url: String,
    server_handle: ServerHandle,
    server_thread: Option<JoinHandle<()>>,
}

impl ActixActionApi {
    pub async fn new<L, A>(action_app: App<L, A>, port: Option<u16>) -> Result<Self>
    where
        L: Ledger + Send + Sync + 'static,
        A: SwapAggregator + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("0.0.0.0", port.unwrap_or(0)))
            .context("failed to bind HTTP listener for actions API")?;
        let address = listener
            .local_addr()
            .context("failed to read listener address")?;
        let base_url = format!("http://{}", address);

        tracing::info!("actions API listening on {}", base_url);

        let shared = web::Data::new(action_app);
        let server = HttpServer::new(move || {
            actix_web::App::new()
                .wrap(permissive_cors())
                .app_data(shared.clone())
                .route("/api/action", web::get().to(handle_get::<L, A>))
                .route("/api/action", web::post().to(handle_post::<L, A>))
                // the Actions protocol treats OPTIONS as an alias for GET
                .route(
                    "/api/action",
                    web::method(Method::OPTIONS).to(handle_get::<L, A>),
                )
        })
        .listen(listener)
        .context("failed to start Actix server")?
        .run();

        let server_handle = server.handle();
        let server_thread = std::thread::spawn(move || {
            let sys = actix_web::rt::System::new();
            let _ = sys.block_on(server);
        });

        Ok(Self {
            base_url,
            server_handle,
            server_thread: Some(server_thread),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for ActixActionApi {
    fn drop(&mut self) {
        let _ = self.server_handle.stop(true);
        if let Some(thread) = self.server_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Blinks clients call this endpoint from arbitrary origins.
fn permissive_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

async fn handle_get<L, A>(
    action_app: web::Data<App<L, A>>,
) -> actix_web::Result<HttpResponse>
where
    L: Ledger + Send + Sync + 'static,
    A: SwapAggregator + Send + Sync + 'static,
{
    Ok(HttpResponse::Ok().json(action_app.root_menu()))
}

async fn handle_post<L, A>(
    action_app: web::Data<App<L, A>>,
    query: web::Query<ActionQuery>,
    body: web::Json<PostBody>,
) -> actix_web::Result<HttpResponse>
where
    L: Ledger + Send + Sync + 'static,
    A: SwapAggregator + Send + Sync + 'static,
{
    let sender = Pubkey::from_str(&body.account).map_err(|_| {
        ErrorBadRequest(format!("invalid account address: {}", body.account))
    })?;
    let route = Route::from_query(
        query.scene.as_deref(),
        query.action.as_deref(),
        query.pack.as_deref(),
    )
    .ok_or_else(|| ErrorBadRequest("unknown seed pack"))?;

    let payload = match route {
        Route::Farm => action_app.farm_view(&sender).await.map_err(|e| {
            tracing::error!("farm view failed: {e:?}");
            ErrorInternalServerError("failed to build farm view")
        })?,
        Route::StoreBrowse => action_app.store_view(&sender).await.map_err(|e| {
            tracing::error!("store view failed: {e:?}");
            ErrorInternalServerError("failed to build store view")
        })?,
        Route::StoreBuy(pack) => action_app.buy_pack(&sender, pack).await.map_err(|e| {
            tracing::error!("pack purchase failed: {e:?}");
            ErrorBadGateway("swap aggregator request failed")
        })?,
        Route::Unknown => {
            return Ok(HttpResponse::Ok().json(Acknowledgment { success: true }));
        }
    };
    Ok(HttpResponse::Ok().json(payload))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::app::tests::{
        FakeAggregator,
        FakeLedger,
        test_config,
    };
    use serde_json::{
        Value,
        json,
    };

    async fn spawn_api(ledger: FakeLedger, aggregator: FakeAggregator) -> ActixActionApi {
        let app = App::new(test_config(), ledger, aggregator);
        ActixActionApi::new(app, None).await.unwrap()
    }

    fn post_body() -> Value {
        json!({ "account": Pubkey::new_unique().to_string() })
    }

    #[tokio::test]
    async fn get__returns_root_menu_with_two_links() {
        // given
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        // when
        let response = client
            .get(format!("{}/api/action", api.base_url()))
            .send()
            .await
            .unwrap();

        // then
        assert!(response.status().is_success());
        let menu: Value = response.json().await.unwrap();
        let actions = menu["links"]["actions"].as_array().unwrap();
        assert_eq!(2, actions.len());
        assert_eq!("Your 🥕 Farm", actions[0]["label"]);
        assert_eq!("🥕 Store", actions[1]["label"]);
    }

    #[tokio::test]
    async fn options__aliases_get() {
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/action", api.base_url()),
            )
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let menu: Value = response.json().await.unwrap();
        assert_eq!("Carrot Happy Farm 🥕", menu["title"]);
    }

    #[tokio::test]
    async fn post__farm_scene_returns_inline_next_action() {
        let api = spawn_api(
            FakeLedger::with_balance(0.29),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/action?scene=farm", api.base_url()))
            .json(&post_body())
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let payload: Value = response.json().await.unwrap();
        assert!(!payload["transaction"].as_str().unwrap().is_empty());
        assert_eq!("inline", payload["links"]["next"]["type"]);
        let action = &payload["links"]["next"]["action"];
        assert_eq!("Go to 🥕 Store", action["links"]["actions"][0]["label"]);
    }

    #[tokio::test]
    async fn post__buy_returns_aggregator_transaction_verbatim() {
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("c3dhcC10eA=="),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!(
                "{}/api/action?scene=store&action=buy&pack=2",
                api.base_url()
            ))
            .json(&post_body())
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let payload: Value = response.json().await.unwrap();
        assert_eq!("c3dhcC10eA==", payload["transaction"]);
    }

    #[tokio::test]
    async fn post__invalid_account_is_a_client_error() {
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/action?scene=farm", api.base_url()))
            .json(&json!({ "account": "not-a-pubkey" }))
            .send()
            .await
            .unwrap();

        assert_eq!(400, response.status().as_u16());
    }

    #[tokio::test]
    async fn post__unknown_pack_is_a_client_error() {
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!(
                "{}/api/action?scene=store&action=buy&pack=5",
                api.base_url()
            ))
            .json(&post_body())
            .send()
            .await
            .unwrap();

        assert_eq!(400, response.status().as_u16());
    }

    #[tokio::test]
    async fn post__aggregator_failure_is_a_bad_gateway() {
        let api = spawn_api(FakeLedger::with_balance(0.0), FakeAggregator::failing_quote())
            .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!(
                "{}/api/action?scene=store&action=buy&pack=1",
                api.base_url()
            ))
            .json(&post_body())
            .send()
            .await
            .unwrap();

        assert_eq!(502, response.status().as_u16());
    }

    #[tokio::test]
    async fn post__unknown_scene_returns_acknowledgment() {
        let api = spawn_api(
            FakeLedger::with_balance(0.0),
            FakeAggregator::with_swap_transaction("tx"),
        )
        .await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/action?scene=garage", api.base_url()))
            .json(&post_body())
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let payload: Value = response.json().await.unwrap();
        assert_eq!(json!({ "success": true }), payload);
    }
}
