pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod state;
pub mod store;
pub mod stt;
pub mod transcripts;
pub mod upload;
