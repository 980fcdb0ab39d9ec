pub mod api;
pub mod config;
mod main_lib;

pub use main_lib::{build_record_store, build_state, init_tracing, AppState};
