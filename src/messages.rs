// src/messages.rs

use chrono::{DateTime, TimeZone};

pub const EMBED_TITLE: &str = "User Information";
pub const EMBED_COLOR: u32 = 0x5865F2;
pub const FETCH_FAILED: &str = "Error: Could not fetch user data.";
pub const COMMAND_FAILED: &str = "Something went wrong while running this command.";
pub const STATUS_TEXT: &str = "/getuserinfo";

const ATTRIBUTION: &str = "by @potyhx";

pub fn footer_text<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}  •  {}", ATTRIBUTION, now.format("Today at %H:%M"))
}
