//! # TaskBoard API Server Library
//!
//! This library provides the core functionality for the TaskBoard API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors mapped into the API error taxonomy
//! - `middleware`: Access guard and cookie session authentication
//! - `report`: PDF report compiler
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod report;
pub mod routes;
