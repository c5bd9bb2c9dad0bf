use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use super::models::{AppState, ChainResponse, MineResponse};

/// Get the full chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let (chain, length) = state.node.get_chain();
    HttpResponse::Ok().json(ChainResponse {
        chain: &chain,
        length,
    })
}

/// Mine a new block:
/// - Search a proof for the current tip off the request thread
/// - Credit the reward (sender "0") to this node
/// - Seal the pending pool into the block
#[get("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    match state.node.mine().await {
        Ok(block) => HttpResponse::Ok().json(MineResponse {
            message: "New Block Forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
        Err(e) => {
            error!("GET /mine/ - {e}");
            HttpResponse::ServiceUnavailable().body(e.to_string())
        }
    }
}
