mod app;
pub mod auth;
pub mod chat;
mod components;
pub mod services;
pub mod utils;

use app::App;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
