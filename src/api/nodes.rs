use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{
    AppState, NodesResponse, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};

/// Register one or more peers. Nothing is registered if any address is invalid.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    if body.nodes.is_empty() {
        warn!("POST /nodes/register/ - rejected: empty node list");
        return HttpResponse::BadRequest().body("Please supply a valid list of nodes");
    }

    match state.node.register_peers(&body.nodes) {
        Ok(total_nodes) => HttpResponse::Created().json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes,
        }),
        Err(e) => {
            warn!("POST /nodes/register/ - rejected: {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(NodesResponse {
        node_id: state.node.node_id().to_string(),
        nodes: state.node.list_peers(),
    })
}

/// Consensus: replace our chain with the longest valid chain among peers.
#[get("/nodes/resolve/")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    match state.node.resolve(&state.fetcher).await {
        Ok((replaced, chain)) => {
            let message = if replaced {
                "Our chain was replaced"
            } else {
                "Our chain is authoritative"
            };
            info!("GET /nodes/resolve/ - {message} (length {})", chain.len());
            HttpResponse::Ok().json(ResolveResponse {
                message: message.to_string(),
                replaced,
                chain,
            })
        }
        Err(e) => {
            warn!(
                "GET /nodes/resolve/ - round failed at peer {}: {e}",
                e.peer().unwrap_or("-")
            );
            HttpResponse::BadGateway().body(e.to_string())
        }
    }
}
