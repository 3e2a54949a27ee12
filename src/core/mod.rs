pub mod aliases;
pub mod commands;
pub mod dict;
pub mod env;
pub mod state;

pub use state::SessionState;
