//! HTTP API for the ballot node

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use ballot_core::{
    Address, ApiConfig, BallotError, Hash, ProposalIndex, PublicKey, Signature,
};
use ballot_engine::Proposal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::runtime::NodeRuntime;
use crate::transaction::{BallotAction, BallotTransaction, VerifiedTransaction};

/// API state containing node runtime
pub type ApiState = Arc<NodeRuntime>;

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Ballot status response
#[derive(Serialize)]
pub struct StatusResponse {
    pub node_address: String,
    pub ballot_id: String,
    pub name: String,
    pub chairperson: String,
    pub creation_time: u64,
    pub deadline: u64,
    pub now: u64,
    pub open: bool,
    pub proposal_count: usize,
    pub total_votes: u64,
    pub voter_count: usize,
    pub enfranchised_count: usize,
}

/// Proposal response
#[derive(Serialize)]
pub struct ProposalResponse {
    pub index: ProposalIndex,
    pub label: String,
    pub label_hex: String,
    pub vote_count: u64,
}

impl ProposalResponse {
    fn new(index: ProposalIndex, proposal: &Proposal) -> Self {
        Self {
            index,
            label: proposal.label.to_string(),
            label_hex: proposal.label.to_hex(),
            vote_count: proposal.vote_count,
        }
    }
}

/// Winner response
#[derive(Serialize)]
pub struct WinnerResponse {
    pub index: ProposalIndex,
    pub label: String,
    pub vote_count: u64,
    /// Voting window has closed, so the result can no longer change
    pub is_final: bool,
}

/// Participant response
#[derive(Serialize)]
pub struct ParticipantResponse {
    pub address: String,
    pub has_right: bool,
    pub has_voted: bool,
    pub voted_proposal: Option<ProposalIndex>,
}

/// Transaction request
#[derive(Deserialize)]
pub struct TransactionRequest {
    pub ballot_id: String,
    pub sender: String,
    /// "grant_right" or "vote"
    pub action: String,
    /// Required for grant_right
    pub target: Option<String>,
    /// Required for vote
    pub proposal: Option<ProposalIndex>,
    pub public_key: String,
    pub signature: String,
}

/// Transaction response
#[derive(Serialize)]
pub struct TransactionResponse {
    pub tx_id: String,
    pub status: String,
}

/// Create API router
pub fn create_router(state: ApiState) -> Router {
    let api_config = state.config().api.clone();

    let router = Router::new()
        // Health
        .route("/health", get(health))
        .route("/status", get(status))
        // Ballot
        .route("/proposals", get(get_proposals))
        .route("/proposals/:index", get(get_proposal))
        .route("/winner", get(get_winner))
        .route("/participants/:address", get(get_participant))
        // Transactions
        .route("/transaction", post(submit_transaction))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if api_config.enable_cors {
        router.layer(cors_layer(&api_config))
    } else {
        router
    }
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok());
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// HTTP status for a failed ballot operation
fn error_status(err: &BallotError) -> StatusCode {
    match err {
        BallotError::Unauthorized(_) => StatusCode::FORBIDDEN,
        BallotError::AlreadyVoted(_) | BallotError::VotingClosed { .. } => StatusCode::CONFLICT,
        BallotError::Internal(_) | BallotError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Health check
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ballot status
async fn status(State(runtime): State<ApiState>) -> impl IntoResponse {
    let summary = runtime.summary();

    let status = StatusResponse {
        node_address: runtime.node_address().to_hex(),
        ballot_id: summary.id.to_hex(),
        name: runtime.ballot_name().to_string(),
        chairperson: summary.chairperson.to_hex(),
        creation_time: summary.creation_time.as_secs(),
        deadline: summary.deadline.as_secs(),
        now: runtime.now().as_secs(),
        open: summary.open,
        proposal_count: summary.proposals.len(),
        total_votes: summary.total_votes,
        voter_count: summary.voter_count,
        enfranchised_count: summary.enfranchised_count,
    };

    Json(ApiResponse::ok(status))
}

/// List proposals
async fn get_proposals(State(runtime): State<ApiState>) -> impl IntoResponse {
    let proposals: Vec<ProposalResponse> = runtime
        .proposals()
        .iter()
        .enumerate()
        .map(|(i, p)| ProposalResponse::new(i as ProposalIndex, p))
        .collect();

    Json(ApiResponse::ok(proposals))
}

/// Get one proposal
async fn get_proposal(
    State(runtime): State<ApiState>,
    Path(index): Path<ProposalIndex>,
) -> impl IntoResponse {
    match runtime.proposal(index) {
        Some(proposal) => (
            StatusCode::OK,
            Json(ApiResponse::ok(ProposalResponse::new(index, &proposal))),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<ProposalResponse>::err("Proposal not found")),
        ),
    }
}

/// Current winner
async fn get_winner(State(runtime): State<ApiState>) -> impl IntoResponse {
    let summary = runtime.summary();
    let index = summary.winning_proposal;
    let proposal = &summary.proposals[index as usize];

    let response = WinnerResponse {
        index,
        label: proposal.label.to_string(),
        vote_count: proposal.vote_count,
        is_final: !summary.open,
    };

    Json(ApiResponse::ok(response))
}

/// Get participant record
async fn get_participant(
    State(runtime): State<ApiState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    match Address::from_hex(&address) {
        Ok(addr) => {
            let record = runtime.participant(&addr);
            let response = ParticipantResponse {
                address: addr.to_hex(),
                has_right: record.has_right,
                has_voted: record.has_voted,
                voted_proposal: record.voted_proposal,
            };
            (StatusCode::OK, Json(ApiResponse::ok(response)))
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<ParticipantResponse>::err("Invalid address")),
        ),
    }
}

/// Submit transaction
async fn submit_transaction(
    State(runtime): State<ApiState>,
    Json(req): Json<TransactionRequest>,
) -> impl IntoResponse {
    let tx = match parse_transaction_request(&req) {
        Ok(tx) => tx,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<TransactionResponse>::err(e)),
            )
        }
    };

    let verified = match VerifiedTransaction::new(tx) {
        Ok(verified) => verified,
        Err(e) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<TransactionResponse>::err(e)),
            )
        }
    };

    match runtime.submit_transaction(&verified) {
        Ok(tx_id) => {
            let response = TransactionResponse {
                tx_id: tx_id.to_hex(),
                status: "applied".to_string(),
            };
            (StatusCode::OK, Json(ApiResponse::ok(response)))
        }
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::<TransactionResponse>::err(e)),
        ),
    }
}

fn parse_transaction_request(req: &TransactionRequest) -> Result<BallotTransaction, String> {
    let ballot_id = Hash::from_hex(&req.ballot_id).map_err(|_| "Invalid ballot ID")?;
    let sender = Address::from_hex(&req.sender).map_err(|_| "Invalid sender address")?;

    let action = match req.action.as_str() {
        "grant_right" => {
            let target = req.target.as_deref().ok_or("Missing target")?;
            BallotAction::GrantRight {
                target: Address::from_hex(target).map_err(|_| "Invalid target address")?,
            }
        }
        "vote" => BallotAction::Vote {
            proposal: req.proposal.ok_or("Missing proposal")?,
        },
        other => return Err(format!("Unknown action: {}", other)),
    };

    let public_key = PublicKey::from_hex(&req.public_key).map_err(|_| "Invalid public key")?;
    let signature = Signature::from_hex(&req.signature).map_err(|_| "Invalid signature")?;

    Ok(BallotTransaction {
        ballot_id,
        sender,
        action,
        public_key,
        signature,
    })
}

/// Start API server
pub async fn start_api_server(runtime: Arc<NodeRuntime>, listen_addr: &str) -> anyhow::Result<()> {
    let router = create_router(runtime);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("API server listening on {}", listen_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
