//! # minibridge-domain
//!
//! Pure domain model of the minibridge state-synchronization core.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **wire codec** for the controller's colon-delimited bus
//! - Define **Characteristics** (typed hub attributes) and their value domains
//! - Define **Descriptors** (per-instance tables of characteristics, inbound
//!   bindings and derived-state rules) for every supported device class
//! - Run the **State engine** that turns hub operations and inbound messages
//!   into outbound commands and hub notifications
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod characteristic;
pub mod descriptor;
pub mod device_kind;
pub mod message;
pub mod state;
