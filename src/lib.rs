pub mod action;
pub mod api;
pub mod clients;
pub mod command;
pub mod config;
pub mod events;
pub mod gateway;
pub mod http_client;
pub mod model;
pub mod render;
pub mod router;
pub mod runtime;
pub mod services;
pub mod sync;
pub mod types;
pub mod update;
