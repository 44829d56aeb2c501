use actix_web::{HttpResponse, web};
use log::error;
use serde::{Deserialize, Serialize};

use crate::assets::catch_all;
use crate::error::ApiError;
use crate::store::{CounterStore, Storage};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CountResponse {
    pub count: u64,
}

pub async fn get_count<S: Storage>(store: web::Data<CounterStore<S>>) -> HttpResponse {
    let count = store.read().await;
    HttpResponse::Ok().json(CountResponse { count })
}

pub async fn increment_count<S: Storage>(
    store: web::Data<CounterStore<S>>,
) -> Result<HttpResponse, ApiError> {
    match store.increment_and_read().await {
        Ok(count) => Ok(HttpResponse::Ok().json(CountResponse { count })),
        Err(e) => {
            error!("Error incrementing count: {e}");
            Err(ApiError::IncrementCount(e))
        }
    }
}

/// Installs the counter API and the frontend fallback.
///
/// The store itself is registered by the caller as `web::Data<CounterStore<S>>`.
pub fn configure<S: Storage>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/counter")
            .route(web::get().to(get_count::<S>))
            .route(web::post().to(increment_count::<S>)),
    )
    .default_service(web::route().to(catch_all));
}
