//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Both ports are synchronous and must not block: they are invoked while an
//! accessory lock is held.

pub mod capability_sink;
pub mod command_sender;

pub use capability_sink::CapabilitySink;
pub use command_sender::CommandSender;
