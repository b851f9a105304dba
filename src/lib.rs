//! Shortpath - a small URL shortener
//!
//! Issues short paths for long URLs and 301-redirects them. A Basic-auth
//! admin API creates, lists, searches and deletes mappings; every request is
//! subject to a per-IP fixed-window rate limit and new URLs are screened
//! against a domain blacklist and keyword list.
//!
//! # Architecture
//! - `api`: HTTP routes and middleware (auth, rate limit, timing)
//! - `services`: rate limiter, short-path allocator, link service
//! - `storage`: `LinkStore` trait with SeaORM and in-memory backends
//! - `config`: TOML + environment configuration
//! - `interfaces`: command-line link management
//! - `runtime`: server and CLI execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
