//! Web server for HTTP interval annotation.
//!
//! This module provides a small HTTP API using Axum, plus a single HTML page
//! for trying the tagger in a browser.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! geochron serve
//!
//! # Custom port and auto-open browser
//! geochron serve --port 3000 --open
//!
//! # Bind to all interfaces with a custom catalog
//! geochron serve --address 0.0.0.0 --catalog intervals.csv
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with a text input form
//! - `GET /chrono/{text}` - Title-case the path text and tag it, returning `pipe` and `details`
//! - `POST /api/annotate` - Tag `{"text": ...}`, returning the annotated text, entities and diagnostics
//! - `GET /api/catalog` - List all intervals in the catalog

pub mod server;
