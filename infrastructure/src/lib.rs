//! Infrastructure layer for nightpoll
//!
//! Adapters behind the application's ports: a tokio-backed scheduler, a
//! console messenger with a built-in message catalog, an in-memory
//! simulation world (zones plus participant directory), and the layered
//! configuration loader.

pub mod config;
pub mod messenger;
pub mod scheduler;
pub mod sim;

pub use config::loader::ConfigLoader;
pub use messenger::{ConsoleMessenger, MessageCatalog};
pub use scheduler::TokioScheduler;
pub use sim::{SimWorld, SimZone};
