mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(nodes::register_nodes)
            .service(nodes::list_nodes)
            .service(nodes::resolve),
    );
}
