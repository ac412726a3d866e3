pub mod config;
pub mod error;
pub mod registry;
pub mod session_loop;
pub mod sim;
pub mod tracker_bus;
