#[cfg(target_arch = "wasm32")]
pub fn main() {
    use leptos::prelude::*;

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    mount_to_body(web::app::App)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("the web frontend runs in the browser; build it with --target wasm32-unknown-unknown");
}
