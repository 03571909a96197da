use actix_web::{middleware::Logger, web, App, HttpServer};
use poker_tracker_server::{config, db, http, session::SessionStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = config::settings();

    // SQLite pool + schema
    let db_pool = db::connect(&settings.database_url)
        .await
        .expect("Failed to open database");
    db::init_schema(&db_pool)
        .await
        .expect("Failed to create schema");
    db::seed_sample_players(&db_pool)
        .await
        .expect("Failed to seed sample players");

    std::fs::create_dir_all(&settings.upload_dir).expect("Failed to create upload directory");

    // In-process cookie-session store
    let sessions = web::Data::new(SessionStore::new());

    log::info!("listening on {}", settings.server_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(sessions.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&settings.server_addr)?
    .run()
    .await
}
