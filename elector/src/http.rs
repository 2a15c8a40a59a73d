//! Read-only HTTP status surface.
//!
//! | path      | no leader   | other leader | this participant |
//! |-----------|-------------|--------------|------------------|
//! | `/`       | 200 JSON    | 200 JSON     | 200 JSON         |
//! | `/health` | 500 text    | 200 text     | 200 text         |
//! | `/leader` | 500 text    | 410 empty    | 200 text         |

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use elector_core::{ElectorError, ElectorResult, LeaderData, ObservedLeader, ParticipantId};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct StatusState {
    pub leader: ObservedLeader,
    pub participant: ParticipantId,
}

pub fn router(state: StatusState) -> Router {
    Router::new()
        .route("/", get(leader_json))
        .route("/health", get(health))
        .route("/leader", get(is_leader))
        .with_state(state)
}

async fn leader_json(State(state): State<StatusState>) -> Json<LeaderData> {
    Json(LeaderData::clone(&state.leader.get()))
}

async fn health(State(state): State<StatusState>) -> (StatusCode, String) {
    let leader = state.leader.get();
    if leader.is_empty() {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid leader set: {}", leader),
        )
    } else {
        (StatusCode::OK, format!("Valid leader set: {}", leader))
    }
}

async fn is_leader(State(state): State<StatusState>) -> (StatusCode, String) {
    let leader = state.leader.get();
    if leader.is_empty() {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Invalid leader set: {}", leader),
        )
    } else if state.participant.is(&leader.name) {
        (StatusCode::OK, format!("Valid leader set: {}", leader))
    } else {
        (StatusCode::GONE, String::new())
    }
}

/// A bound, not yet serving, status server.
pub struct StatusServer {
    listener: TcpListener,
    router: Router,
}

impl StatusServer {
    pub async fn bind(addr: SocketAddr, state: StatusState) -> ElectorResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ElectorError::http(format!("binding {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            router: router(state),
        })
    }

    pub fn local_addr(&self) -> ElectorResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` completes, then finish in-flight requests.
    pub async fn serve<F>(self, shutdown: F) -> ElectorResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Status server listening on {}", addr);
        }

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ElectorError::http(e.to_string()))
    }
}
