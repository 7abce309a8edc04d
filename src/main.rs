use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use todoforge::{
    auth::{PasswordHasher, TokenService},
    config::Config,
    routes,
    store::MongoStore,
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match MongoStore::connect(
        &config.database_url,
        &config.database_name,
        config.db_timeout,
    )
    .await
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(
        store.clone(),
        store,
        TokenService::new(&config.jwt_secret),
        PasswordHasher::new(config.bcrypt_cost),
    ));

    log::info!("Starting todoforge server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::configure(state.clone()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
