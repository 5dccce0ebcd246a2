//! # Taskboard API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Environment configuration
//! - `error`: `ApiError` and its envelope response mapping
//! - `extract`: Envelope-rejecting `Json`/`Path` extractors
//! - `middleware`: Security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
