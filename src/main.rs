use std::io;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use chrono::Utc;
use dotenvy::dotenv;
use log::{error, info};

use repeatwise_folders::config::Config;
use repeatwise_folders::routes;
use repeatwise_folders::store::FolderStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("configuration error: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let store = web::Data::new(FolderStore::new(&config));
    spawn_trash_sweeper(store.clone(), Duration::from_secs(config.purge_interval_secs));

    info!("listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(store.clone())
            .configure(routes::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn spawn_trash_sweeper(store: web::Data<FolderStore>, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired(Utc::now()).await;
            if purged > 0 {
                info!("trash sweep removed {purged} folders");
            }
        }
    });
}
