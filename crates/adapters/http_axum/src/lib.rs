//! # minibridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum). This is the hub side
//! of the bridge.
//!
//! ## Responsibilities
//! - List accessories and their current characteristic values
//!   (`/api/accessories`)
//! - Map characteristic reads and writes onto the accessory services
//!   (`/api/accessories/{kind}/{id}/characteristics/{name}`)
//! - Stream every capability push as Server-Sent Events
//!   (`/api/updates/stream`)
//! - Report bridge counters (`/api/stats`)
//!
//! ## Dependency rule
//! Depends on `minibridge-app` (for port traits and services) and
//! `minibridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
