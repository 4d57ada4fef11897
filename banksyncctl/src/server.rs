//! JSON API over the stored accounts and transactions

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{offset::Utc, DateTime};
use serde::Serialize;
use uuid::Uuid;

use banksync::{
    account::QueryAccount,
    prelude::*,
    provider::{AccountBalance, ProviderTransaction},
};

use crate::cli::server::Server;
use crate::config::Config;

#[derive(Clone)]
struct AppState {
    conn: Arc<Mutex<Conn>>,
    dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Serialize)]
struct AccountResponse {
    uuid: Uuid,
    bank_name: String,
    account_name: String,
    display_name: String,
    currency: String,
    created_at: Option<DateTime<Utc>>,
}

impl From<(Account, Bank)> for AccountResponse {
    fn from((account, bank): (Account, Bank)) -> Self {
        Self {
            uuid: account.uuid,
            bank_name: bank.name,
            account_name: account.name,
            display_name: account.display_name,
            currency: account.currency.code().to_string(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct ApiError(StatusCode, String);

impl From<banksync::Error> for ApiError {
    fn from(error: banksync::Error) -> Self {
        use banksync::Error;

        let status = match &error {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            Error::Invalid(_) | Error::NonUnique(_) => StatusCode::BAD_REQUEST,
            Error::Provider(_) | Error::Http(_) | Error::Json(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("{}: {}", self.0, self.1);
        (self.0, Json(ErrorResponse { error: self.1 })).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Run a database or provider operation on the blocking thread pool
async fn blocking<T, F>(state: AppState, function: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Conn, &Dispatcher) -> banksync::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = state.conn.lock().map_err(|_| {
            ApiError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database connection poisoned".to_string(),
            )
        })?;
        Ok(Json(function(&mut *conn, &state.dispatcher)?))
    })
    .await
    .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
}

async fn accounts(State(state): State<AppState>) -> ApiResult<Vec<AccountResponse>> {
    blocking(state, |conn, _| {
        Ok(QueryAccount::default()
            .run(conn)?
            .into_iter()
            .map(AccountResponse::from)
            .collect())
    })
    .await
}

async fn balances(State(state): State<AppState>) -> ApiResult<Vec<AccountBalance>> {
    blocking(state, |conn, dispatcher| dispatcher.balances(conn)).await
}

async fn transactions(State(state): State<AppState>) -> ApiResult<Vec<ProviderTransaction>> {
    blocking(state, |conn, dispatcher| {
        let to = Utc::now();
        dispatcher.sync_all_transactions(conn, Some(to - dispatcher.default_interval()), Some(to))
    })
    .await
}

async fn account_transactions(
    State(state): State<AppState>,
    Path(account_uuid): Path<String>,
) -> ApiResult<Vec<ProviderTransaction>> {
    let account_uuid = Uuid::parse_str(&account_uuid).map_err(|e| {
        ApiError(
            StatusCode::BAD_REQUEST,
            format!("Invalid account uuid {account_uuid}. {e}"),
        )
    })?;

    blocking(state, move |conn, dispatcher| {
        let account = Account::find_by_uuid(conn, account_uuid)?;
        let to = Utc::now();
        dispatcher.sync_transactions(
            conn,
            &account,
            Some(to - dispatcher.default_interval()),
            Some(to),
        )
    })
    .await
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/accounts", get(accounts))
        .route("/accounts/balances", get(balances))
        .route("/transactions", get(transactions))
        .route("/transactions/:account_uuid", get(account_transactions))
        .with_state(state)
}

pub fn run(config: &Config, args: &Server) -> Result<()> {
    let address = match args.address {
        Some(address) => address,
        None => config.server_address()?,
    };

    // Providers use blocking HTTP clients, which must be created and dropped
    // outside of the async runtime
    let dispatcher = Arc::new(config.dispatcher()?);
    let state = AppState {
        conn: Arc::new(Mutex::new(config.database()?)),
        dispatcher: dispatcher.clone(),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(address).await?;
        log::info!("Listening on {address}");
        axum::serve(listener, router(state)).await?;
        Result::<()>::Ok(())
    })?;
    runtime.shutdown_background();

    drop(dispatcher);
    Ok(())
}
