pub mod animate;
pub mod certs;
pub mod config;
pub mod contact;
pub mod debounce;
pub mod effects;
pub mod error;
pub mod nav;
pub mod notify;
pub mod pipeline;
pub mod preference;
pub mod reveal;
pub mod schedule;
pub mod sections;
pub mod submit;
pub mod typing;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
pub mod web;


pub use config::ViewportConfig;
pub use error::{ConfigError, FormError, ViewportError};

/// Wire the page once the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    web::console::init(log::LevelFilter::Info);
    web::page::start();
}
