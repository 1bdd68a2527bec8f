pub mod forms;
pub mod health;
pub mod payments;

use axum::Router;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// All application routes, before middleware layers are applied.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(payments::payment_routes())
        .merge(health::health_routes())
}
