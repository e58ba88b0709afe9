//! # minibridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `CapabilitySink` — receives characteristic pushes for the hub
//!   - `CommandSender` — delivers outbound wire messages to the controller
//! - Define **driving/inbound** use-cases:
//!   - `EventRouter` — exact-match dispatch of inbound messages to handlers
//!   - `Accessory` — one device state machine behind a lock, wired to the ports
//!   - `Bridge` — the accessory registry, line handling and counters
//! - Provide **in-process infrastructure** (capability bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `minibridge-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod router;
pub mod services;
