// src/handlers/quotes.rs

use axum::{extract::State, Json};

use crate::{config::AppState, models::quotes::QuoteBoard};

// GET /api/quotes — serve o snapshot em memória, sem tocar a rede.
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses(
        (status = 200, description = "Último snapshot de câmbio e cotizaciones", body = QuoteBoard)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quotes(State(app_state): State<AppState>) -> Json<QuoteBoard> {
    Json(app_state.quote_service.snapshot().await)
}
