use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};

use crate::{
    db::InvoiceExt,
    dtos::DataResponse,
    error::HttpError,
    service::ledger::{invoice_view, InvoiceFilter},
    AppState,
};

pub fn invoices_handler() -> Router {
    Router::new()
        .route("/", get(get_invoices))
        .route("/:id/pay", put(mark_paid))
}

pub async fn get_invoices(
    Query(filter): Query<InvoiceFilter>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let invoices = app_state.db_client.get_invoices().await;
    Ok(Json(DataResponse::success(invoice_view(invoices, &filter))))
}

pub async fn mark_paid(
    Path(invoice_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let invoice = app_state.db_client.mark_invoice_paid(&invoice_id).await?;
    Ok(Json(DataResponse::success(invoice)))
}
