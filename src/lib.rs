//! staticd - Minimal static file server
//!
//! Core library for the HTTP request loop and file serving.

pub mod config;
pub mod http;
pub mod server;
