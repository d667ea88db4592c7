//! CloudApex - Account and content service for an online learning platform
//!
//! The server side (`api`, `services`, `db`) exposes accounts, blog posts
//! and form intake over HTTP. The `client` module holds the session layer
//! used by the command-line client.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
