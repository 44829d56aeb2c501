use std::path::Path;

use actix_web::{HttpRequest, HttpResponse, Responder};
use log::debug;
use rust_embed::RustEmbed;

/// Output of `wasm-bindgen` for the `web` crate, embedded at build time.
#[derive(RustEmbed)]
#[folder = "../target/www"]
#[allow_missing = true]
struct FrontendAssets;

const INDEX_HTML: &str = include_str!("../../web/index.html");

async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(INDEX_HTML)
}

/// Fallback for everything the router does not claim.
///
/// Unknown `/api/` paths are a 404; anything that looks like a file is served
/// from the embedded bundle; every other path gets the landing page.
pub async fn catch_all(req: HttpRequest) -> impl Responder {
    debug!("catch_all: {}", req.path());
    if req.path().starts_with("/api/") {
        return HttpResponse::NotFound().finish();
    }
    let file_type = match mime_guess::from_path(req.path()).first_raw() {
        Some(file_type) => file_type,
        None => "text/html",
    };
    if !file_type.contains("text/html") {
        return serve_frontend_asset(req.path());
    }
    index().await
}

fn serve_frontend_asset(path: &str) -> HttpResponse {
    let file = match Path::new(path).file_name().and_then(|f| f.to_str()) {
        Some(file) => file,
        None => return HttpResponse::BadRequest().body("400 Bad Request"),
    };
    match FrontendAssets::get(file) {
        Some(content) => HttpResponse::Ok()
            .content_type(mime_guess::from_path(file).first_or_octet_stream().as_ref())
            .append_header(("Cache-Control", "public, max-age=604800"))
            .body(content.data.into_owned()),
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
