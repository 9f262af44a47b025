use std::{env, str::FromStr};

use actix_web::{
    middleware,
    web::{self, Data},
    App, HttpRequest, HttpResponse, HttpServer,
};
use log::info;
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};

use census_api::{auth::BasicAuth, db, routes, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://census.db".to_string());

    let opts = SqliteConnectOptions::from_str(&database_url)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Required for the participants -> work/home delete cascade.
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(5));

    let db_pool = SqlitePool::connect_with(opts)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("Database migrated successfully");

    seed_admin_user(&db_pool).await;

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);

    info!("Starting HTTP server on http://localhost:{}/", port);

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            .wrap(BasicAuth::new(db_pool.clone()))
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(Data::new(AppState {
                db_pool: db_pool.clone(),
            }))
            .service(routes::index_handler)
            // literal routes before the {email} ones so /participants/details
            // is never captured as an email path parameter
            .service(routes::list_participants_handler)
            .service(routes::add_participant_handler)
            .service(routes::participant_summaries_handler)
            .service(routes::personal_details_handler)
            .service(routes::work_details_handler)
            .service(routes::home_details_handler)
            .service(routes::delete_participant_handler)
            .service(routes::update_participant_handler)
            .default_service(web::to(routes::default_handler))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

/// Creates the admin credential row on first start when ADMIN_USERNAME and
/// ADMIN_PASSWORD are configured. The password is stored as an argon2 hash.
async fn seed_admin_user(pool: &SqlitePool) {
    let (Ok(username), Ok(password)) = (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD"))
    else {
        return;
    };

    match db::find_user_by_username(pool, &username).await {
        Ok(Some(_)) => {}
        Ok(None) => match db::create_user(pool, &username, &password).await {
            Ok(user) => info!("Seeded admin user {}", user.username),
            Err(e) => log::error!("Failed to seed admin user: {}", e),
        },
        Err(e) => log::error!("Failed to look up admin user: {}", e),
    }
}

/// Malformed JSON bodies answer with the validator's 400 shape instead of
/// the framework's plain-text error.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    let detail = err.to_string();
    actix_web::error::InternalError::from_response(
        err,
        HttpResponse::BadRequest()
            .json(json!({ "error": "Validation failed", "details": [detail] })),
    )
    .into()
}
