use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};

use business_links_service::auth::TokenService;
use business_links_service::clients::mailer::Mailer;
use business_links_service::config::AppConfig;
use business_links_service::database::Database;
use business_links_service::handlers::{self, businesses::UploadDir};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|err| {
        log::error!("Invalid configuration: {err}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let db = Database::connect(&config.database_url).await.map_err(|err| {
        log::error!("Failed to initialize database: {err:?}");
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;

    if let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) {
        if let Err(err) = handlers::admin::bootstrap_super_admin(&db, email, password).await {
            log::error!("Failed to bootstrap super admin: {err}");
        }
    }

    std::fs::create_dir_all(config.upload_dir.join("documents"))?;

    let mailer = Mailer::new(
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
        &config.public_base_url,
    );
    if !mailer.is_enabled() {
        log::warn!("MAIL_API_URL not set, outgoing email will only be logged");
    }

    let db_data = web::Data::new(db);
    let tokens = web::Data::new(TokenService::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    ));
    let mailer = web::Data::new(mailer);
    let upload_dir = web::Data::new(UploadDir(config.upload_dir.clone()));

    let bind_address = config.bind_address();
    log::info!("Starting business links service on {}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(db_data.clone())
            .app_data(tokens.clone())
            .app_data(mailer.clone())
            .app_data(upload_dir.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Mounted ahead of the `/api` scope, which would otherwise claim it.
            .service(Files::new("/api/uploads", upload_dir.0.clone()))
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
