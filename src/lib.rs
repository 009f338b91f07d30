// Library entry for the gallery player core
// This coexists with the demo binary in src/main.rs

pub mod catalog;
pub mod config;
pub mod constants;
pub mod drag;
pub mod events;
pub mod keys;
pub mod menu;
pub mod models;
pub mod player;
pub mod probe;
pub mod utils;
pub mod view;
