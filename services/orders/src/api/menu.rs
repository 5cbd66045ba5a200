use crate::api::types::MenuResponse;
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/api/beverages",
    tag = "menu",
    responses(
        (status = 200, description = "Beverages an order may name", body = MenuResponse)
    )
)]
pub(crate) async fn list_beverages(State(state): State<AppState>) -> Json<MenuResponse> {
    Json(MenuResponse {
        items: state.menu.beverages().to_vec(),
    })
}
