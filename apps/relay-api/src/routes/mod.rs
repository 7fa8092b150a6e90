pub mod focus;
pub mod health;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(focus::router())
        .merge(crate::gateway::server::router())
}
