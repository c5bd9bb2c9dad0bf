use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};

/// Submit a new transaction into the pending pool.
#[post("/transactions/new/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> impl Responder {
    let tx = body.into_inner();
    if tx.sender.trim().is_empty() || tx.recipient.trim().is_empty() || tx.amount == 0 {
        warn!("POST /transactions/new/ - rejected: missing values");
        return HttpResponse::BadRequest().body("Missing values");
    }

    let index = state
        .node
        .submit_transaction(&tx.sender, &tx.recipient, tx.amount);
    debug!(
        "POST /transactions/new/ - {} -> {} ({}) queued for block #{index}",
        tx.sender, tx.recipient, tx.amount
    );

    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    })
}

/// List the transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.node.pending();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
