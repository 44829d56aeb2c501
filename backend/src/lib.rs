//! Backend for the CollegeConnect landing page.
//!
//! Serves the compiled `web` frontend and a tiny interest counter API:
//!
//! | Method | Path           | Response                  |
//! |--------|----------------|---------------------------|
//! | GET    | `/api/counter` | `{"count": N}`            |
//! | POST   | `/api/counter` | `{"count": N + 1}`        |
//!
//! The count lives in a single JSON file (`COUNTER_FILE`, default
//! `counter.json`). See [`config`] for the environment it reads.

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use log::info;

pub mod assets;
pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use config::Config;
use store::{CounterStore, FileStorage};

pub async fn run(config: Config) -> std::io::Result<()> {
    info!(
        "Counter stored at {} ({:?} increments)",
        config.counter_file.display(),
        config.increment_mode
    );
    let store = web::Data::new(CounterStore::open(
        config.counter_file.clone(),
        config.increment_mode,
    ));

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(cors)
            .wrap(Logger::new("%a %{User-Agent}i %r %s %D"))
            .app_data(store.clone())
            .configure(routes::configure::<FileStorage>)
    })
    .bind(config.bind_address())?;

    info!("API server running on port {}", config.port);
    server.run().await
}
