// src/duologue/mod.rs

pub mod agent;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod debate;
pub mod dual_chat;
pub mod event;
pub mod http_client_pool;
pub mod interaction_log;
pub mod language;
pub mod persona;
pub mod request;
#[cfg(feature = "server")]
pub mod server;
pub mod validation;
