//! Discord REST API access for user profiles

mod client;
mod models;

pub use client::{DiscordApi, ProfileSource};
pub use models::{AvatarDecoration, ClanTag, UserProfile};
