pub mod bot;

pub use bot::{Args, BotConfig};
