use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};

use pow_ledger::api::{self, AppState};
use pow_ledger::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let state = web::Data::new(AppState::from_config(&config));

    for peer in &config.peers {
        if let Err(e) = state.node.register_peer(peer) {
            warn!("ignoring bootstrap peer: {e}");
        }
    }

    info!(
        "⛓️ Starting node {} at http://{}:{}",
        config.node_id, config.host, config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
