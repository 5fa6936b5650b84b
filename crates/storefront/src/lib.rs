//! 4AMotos Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Modules
//!
//! - [`pocketbase`] - REST client for the remote record store
//! - [`catalog`] - Read operations the page loaders depend on
//! - [`loaders`] - Page models for the shop and product pages
//! - [`liveness`] - Background reachability monitor for the store
//! - [`services`] - Session-backed cart state
//! - [`routes`] - Axum handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod liveness;
pub mod loaders;
pub mod middleware;
pub mod models;
pub mod pocketbase;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
