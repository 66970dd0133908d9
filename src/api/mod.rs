//! API client module

pub mod client;
pub mod models;
pub mod response;
pub mod services;

pub use client::ApiClient;
