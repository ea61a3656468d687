mod config;
mod db;
mod error;
mod middleware;
mod migration;
mod models;
mod routes;
mod services;
mod utils;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::config::AppConfig;
use crate::utils::jwt::JwtKeys;
use crate::utils::mailer::{BrevoMailer, LogMailer, Mailer};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    utils::logging::init_tracing(config.log_json);

    tracing::info!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("✅ Database connected, migrations applied");

    let keys = JwtKeys::from_secret(&config.jwt_secret);

    let mailer: Arc<dyn Mailer> = match config.brevo.clone() {
        Some(brevo) => Arc::new(BrevoMailer::new(brevo)),
        None => {
            tracing::warn!("BREVO_API_KEY/BREVO_SENDER_EMAIL not set, verification emails are only logged");
            Arc::new(LogMailer)
        }
    };

    let bind = (config.host.clone(), config.port);
    tracing::info!("🚀 Starting server on http://{}:{}", bind.0, bind.1);

    let db_data = web::Data::new(db.clone());
    let keys_data = web::Data::new(keys);
    let mailer_data = web::Data::from(mailer);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(keys_data.clone())
            .app_data(mailer_data.clone())
            .app_data(config_data.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await?;

    // Le pool est fermé proprement à l'arrêt du serveur
    db.close().await.map_err(std::io::Error::other)?;
    tracing::info!("👋 Server stopped");
    Ok(())
}
