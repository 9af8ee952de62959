//! REST facade for the Tessera artifact registry.
//!
//! Handlers perform cheap syntactic validation, enrich the tracing span,
//! and delegate every decision to the registry core. Results come back as
//! idiomatic JSON; failures conform to RFC7807 (`application/problem+json`)
//! and carry the registry's machine-readable `kind` so clients can branch
//! without string-matching detail text.
//!
//! # Conventions
//! * `snake_case` query parameters
//! * `camelCase` JSON bodies
//! * Caller identity travels in the request body; in production the gateway
//!   sits behind an identity-injecting service mesh.
//!
//! # Examples
//! Minting a new artifact
//! ```bash
//! curl -X POST http://localhost:8080/artifacts \
//!      -H 'Content-Type: application/json' \
//!      -d '{ "caller": "0x22…", "payment": 50000000000000000,
//!            "recipient": "0x22…", "traitRoot": "0xabc1…", "layerCount": 12 }'
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{info, instrument};
use uuid::Uuid;

use tessera_common::{Address, ArtifactId, Balance, RegistryError, RegistryEvent, TraitRoot};
use tessera_registry::{Registry, SystemClock};

use crate::config::GatewayConfig;
use crate::events::BroadcastSink;

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub events: broadcast::Sender<RegistryEvent>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, events: broadcast::Sender<RegistryEvent>) -> Self {
        Self { registry, events }
    }

    /// Wire a production registry (wall clock, broadcast fact fan-out) from
    /// gateway configuration.
    pub fn from_config(cfg: &GatewayConfig) -> Result<Self, ApiError> {
        let registry_cfg = cfg
            .registry_config()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let (tx, _) = broadcast::channel(cfg.event_buffer);
        let registry = Arc::new(Registry::new(
            registry_cfg,
            Arc::new(SystemClock),
            Arc::new(BroadcastSink::new(tx.clone())),
        ));
        Ok(Self::new(registry, tx))
    }
}

/// A fully wired [`axum::Router`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/collection", get(collection))
        .route("/capabilities/{capability}", get(capability))
        .route("/royalty", get(royalty).put(configure_royalty))
        .route("/base-uri", put(set_base_uri))
        .route("/operators", post(set_operator))
        .nest(
            "/artifacts",
            Router::new()
                .route("/", post(mint))
                .route("/{id}", get(artifact))
                .route("/{id}/owner", get(owner_of))
                .route("/{id}/approved", get(approved_for))
                .route("/{id}/approve", post(approve))
                .route("/{id}/transfer", post(transfer)),
        )
        .nest(
            "/holders",
            Router::new()
                .route("/{address}/balance", get(balance_of))
                .route("/{address}/cooldown", get(cooldown))
                .route("/{holder}/operators/{operator}", get(operator_status)),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Canonical error envelope returned to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Registry(RegistryError),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "{msg}"),
            ApiError::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::Registry(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, detail) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Registry(err) => {
                let status = match err {
                    RegistryError::NotController
                    | RegistryError::CallerNotOwnerNorApproved(_) => StatusCode::FORBIDDEN,
                    RegistryError::InvalidToken(_) => StatusCode::NOT_FOUND,
                    RegistryError::PaymentTooLow { .. } => StatusCode::PAYMENT_REQUIRED,
                    RegistryError::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
                    RegistryError::SupplyCapExceeded
                    | RegistryError::TransferFromWrongOwner { .. }
                    | RegistryError::Reentrancy => StatusCode::CONFLICT,
                    RegistryError::MintToZero
                    | RegistryError::TransferToZero
                    | RegistryError::ApproveToCaller
                    | RegistryError::LayerIndexOutOfRange { .. }
                    | RegistryError::RoyaltyBpsTooHigh(_)
                    | RegistryError::ZeroAddress
                    | RegistryError::ReceiverRejected => StatusCode::BAD_REQUEST,
                };
                (status, err.kind(), err.to_string())
            }
        };

        let problem = serde_json::json!({
            "type": "about:blank",
            "title": status.canonical_reason().unwrap_or("Error"),
            "status": status.as_u16(),
            "kind": kind,
            "detail": detail,
        });
        (status, Json(problem)).into_response()
    }
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.parse()
        .map_err(|e: tessera_common::types::TypeError| ApiError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// REST models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionInfo {
    name: String,
    symbol: String,
    base_uri: String,
    total_minted: u64,
    remaining_supply: u64,
    supply_cap: u64,
    next_id: ArtifactId,
    mint_price: Balance,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintRequest {
    caller: Address,
    payment: Balance,
    recipient: Address,
    trait_root: TraitRoot,
    layer_count: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MintResponse {
    id: ArtifactId,
    owner: Address,
    uri: String,
    payment: Balance,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactView {
    id: ArtifactId,
    owner: Address,
    trait_root: TraitRoot,
    layer_count: u8,
    issued_at: u64,
    uri: String,
    approved: Option<Address>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferRequest {
    caller: Address,
    from: Address,
    to: Address,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApproveRequest {
    caller: Address,
    /// Omit (or null) to clear the standing approval.
    spender: Option<Address>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperatorRequest {
    caller: Address,
    operator: Address,
    approved: bool,
}

#[derive(Debug, Deserialize)]
struct RoyaltyQuery {
    /// Decimal string; query-string deserializers cannot carry full
    /// 128-bit integers natively.
    sale_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoyaltyUpdate {
    caller: Address,
    payee: Address,
    bps: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoyaltyView {
    payee: Address,
    bps: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    sale_price: Option<Balance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Balance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BaseUriUpdate {
    caller: Address,
    base_uri: String,
}

// ---------------------------------------------------------------------------
// Request handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn collection(State(state): State<AppState>) -> Json<CollectionInfo> {
    let registry = &state.registry;
    Json(CollectionInfo {
        name: registry.name().to_owned(),
        symbol: registry.symbol().to_owned(),
        base_uri: registry.base_uri(),
        total_minted: registry.total_minted(),
        remaining_supply: registry.remaining_supply(),
        supply_cap: registry.supply_cap(),
        next_id: registry.next_id(),
        mint_price: registry.mint_price(),
    })
}

#[instrument(name = "mint", skip_all, fields(request_id = %Uuid::new_v4(), recipient = %payload.recipient))]
async fn mint(
    State(state): State<AppState>,
    Json(payload): Json<MintRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.registry.mint(
        payload.caller,
        payload.payment,
        payload.recipient,
        payload.trait_root,
        payload.layer_count,
    )?;

    info!(%id, "artifact minted via gateway");
    Ok((
        StatusCode::CREATED,
        Json(MintResponse {
            id,
            owner: payload.recipient,
            uri: state.registry.artifact_uri(id)?,
            payment: payload.payment,
        }),
    ))
}

async fn artifact(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ArtifactView>, ApiError> {
    let id = ArtifactId(id);
    let record = state.registry.artifact(id)?;
    Ok(Json(ArtifactView {
        id,
        owner: state.registry.owner_of(id)?,
        trait_root: record.trait_root,
        layer_count: record.layer_count,
        issued_at: record.issued_at,
        uri: state.registry.artifact_uri(id)?,
        approved: state.registry.approved_for(id)?,
    }))
}

async fn owner_of(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let owner = state.registry.owner_of(ArtifactId(id))?;
    Ok(Json(serde_json::json!({ "id": id, "owner": owner })))
}

async fn approved_for(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let spender = state.registry.approved_for(ArtifactId(id))?;
    Ok(Json(serde_json::json!({ "id": id, "spender": spender })))
}

#[instrument(name = "approve", skip_all, fields(id))]
async fn approve(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<ApproveRequest>,
) -> Result<StatusCode, ApiError> {
    let spender = payload.spender.unwrap_or(Address::ZERO);
    state
        .registry
        .approve(payload.caller, ArtifactId(id), spender)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "transfer", skip_all, fields(request_id = %Uuid::new_v4(), id))]
async fn transfer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<TransferRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .transfer(payload.caller, payload.from, payload.to, ArtifactId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "set_operator", skip_all)]
async fn set_operator(
    State(state): State<AppState>,
    Json(payload): Json<OperatorRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .set_approval_for_all(payload.caller, payload.operator, payload.approved)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn balance_of(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let holder = parse_address(&address)?;
    let balance = state.registry.balance_of(holder)?;
    Ok(Json(
        serde_json::json!({ "address": holder, "balance": balance }),
    ))
}

async fn cooldown(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let caller = parse_address(&address)?;
    let remaining = state.registry.cooldown_remaining(caller);
    Ok(Json(
        serde_json::json!({ "address": caller, "remainingTicks": remaining }),
    ))
}

async fn operator_status(
    State(state): State<AppState>,
    Path((holder, operator)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let holder = parse_address(&holder)?;
    let operator = parse_address(&operator)?;
    let approved = state.registry.is_approved_for_all(holder, operator);
    Ok(Json(serde_json::json!({
        "holder": holder,
        "operator": operator,
        "approved": approved,
    })))
}

async fn royalty(
    State(state): State<AppState>,
    Query(query): Query<RoyaltyQuery>,
) -> Result<Json<RoyaltyView>, ApiError> {
    let (payee, bps) = state.registry.royalty_rate();
    let sale_price = query
        .sale_price
        .map(|raw| {
            raw.parse::<Balance>()
                .map_err(|e| ApiError::BadRequest(format!("sale_price: {e}")))
        })
        .transpose()?;
    let amount = sale_price.map(|price| state.registry.royalty_info(price).1);
    Ok(Json(RoyaltyView {
        payee,
        bps,
        sale_price,
        amount,
    }))
}

#[instrument(name = "configure_royalty", skip_all, fields(bps = payload.bps))]
async fn configure_royalty(
    State(state): State<AppState>,
    Json(payload): Json<RoyaltyUpdate>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .configure_royalty(payload.caller, payload.payee, payload.bps)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(name = "set_base_uri", skip_all)]
async fn set_base_uri(
    State(state): State<AppState>,
    Json(payload): Json<BaseUriUpdate>,
) -> Result<StatusCode, ApiError> {
    state
        .registry
        .set_base_uri(payload.caller, payload.base_uri)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn capability(
    State(state): State<AppState>,
    Path(capability): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let raw = capability.strip_prefix("0x").unwrap_or(&capability);
    let bytes = hex::decode(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let id: [u8; 4] = bytes
        .try_into()
        .map_err(|_| ApiError::BadRequest("capability id must be 4 bytes".into()))?;
    Ok(Json(serde_json::json!({
        "capability": format!("0x{}", hex::encode(id)),
        "supported": state.registry.supports_capability(id),
    })))
}
