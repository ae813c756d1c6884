use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use reqwest::Client;

use birthday_api::config::AppConfig;
use birthday_api::handlers::birthday_handlers::{
    get_user_data, health, invalid_request, json_error_config, put_user_data,
};
use birthday_api::repositories::user_kv_repo::KvHttpRepository;
use birthday_api::services::birthday_services::BirthdayService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let http_client = Client::builder()
        .user_agent("birthday-api/0.1")
        .build()
        .expect("failed to build http client");

    let repo = KvHttpRepository::new(http_client, &config);

    // Startup convenience for local runs; production tables are provisioned
    // out of band.
    if config.is_local() {
        if let Err(e) = repo.create_table_if_missing().await {
            error!("Failed to prepare table {}: {}", config.table_name, e);
            std::process::exit(1);
        }
    }

    let service = web::Data::new(BirthdayService::new(Arc::new(repo)));

    let allowed_origins = config.allowed_origins.clone();
    let bind_address = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "PUT", "OPTIONS"])
            .allowed_headers(vec!["content-type", "accept"])
            .max_age(3600);

        for origin in allowed_origins.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(service.clone())
            .app_data(json_error_config())
            .service(health)         // GET /health
            .service(get_user_data)  // GET /users/{username}
            .service(put_user_data)  // PUT /users/{username}
            .default_service(web::route().to(invalid_request))
    })
    .bind(&bind_address)?
    .run()
    .await
}
