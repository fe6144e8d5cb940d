pub mod ready;

pub use ready::{handle_ready, register_commands};
