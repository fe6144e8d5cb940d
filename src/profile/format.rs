//! Formatting of raw profile values into embed text.
//!
//! Every function here is total: missing values turn into fixed
//! placeholder strings instead of errors.

use chrono::{DateTime, Utc};

use crate::api::{AvatarDecoration, ClanTag};
use crate::config::bot::DEFAULT_CDN_BASE;

pub const UNKNOWN_DATE: &str = "Unknown";
pub const NO_CLAN_TAG: &str = "**No Clan Tag**";
pub const NO_BANNER: &str = "**No banner**";
pub const NO_DECORATION: &str = "**No avatar decoration**";
pub const NO_ROLES: &str = "None";
pub const NO_GLOBAL_NAME: &str = "None";

const DATE_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// `June 15, 2023 02:30 PM`, or `Unknown`
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format(DATE_FORMAT).to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Convert a unix timestamp in seconds, as the SDK exposes them
pub fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// URL templates for Discord CDN assets
#[derive(Debug, Clone)]
pub struct CdnUrls {
    base: String,
}

impl Default for CdnUrls {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_BASE)
    }
}

impl CdnUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn avatar(&self, user_id: u64, hash: &str) -> String {
        format!("{}/avatars/{}/{}.png?size=1024", self.base, user_id, hash)
    }

    pub fn banner(&self, user_id: u64, hash: &str) -> String {
        format!("{}/banners/{}/{}.png?size=1024", self.base, user_id, hash)
    }

    pub fn avatar_decoration(&self, user_id: u64, asset: &str) -> String {
        format!("{}/avatar-decorations/{}/{}.png", self.base, user_id, asset)
    }

    pub fn clan_badge(&self, guild_id: &str, hash: &str) -> String {
        format!("{}/clan-badges/{}/{}.png", self.base, guild_id, hash)
    }
}

/// Clan tag details as quoted lines, or `**No Clan Tag**`
pub fn format_clan(clan: Option<&ClanTag>, cdn: &CdnUrls) -> String {
    let Some(clan) = clan else {
        return NO_CLAN_TAG.to_string();
    };

    let mut lines = Vec::new();
    if let Some(tag) = clan.tag.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("> **Tag:** {}", tag));
    }

    let guild_id = clan.identity_guild_id.as_deref().filter(|g| !g.is_empty());
    if let Some(guild_id) = guild_id {
        lines.push(format!("> **Server ID:** `{}`", guild_id));
    }

    if let Some(badge) = clan.badge.as_deref().filter(|b| !b.is_empty()) {
        match guild_id {
            Some(guild_id) => {
                lines.push(format!("> **[Badge]({})**", cdn.clan_badge(guild_id, badge)))
            }
            None => lines.push(format!("> **Badge Hash:** {}", badge)),
        }
    }

    if lines.is_empty() {
        NO_CLAN_TAG.to_string()
    } else {
        lines.join("\n")
    }
}

/// Avatar URL from the API hash, falling back to the SDK's avatar URL
pub fn avatar_url(user_id: u64, hash: Option<&str>, fallback: &str, cdn: &CdnUrls) -> String {
    match hash.filter(|h| !h.is_empty()) {
        Some(hash) => cdn.avatar(user_id, hash),
        None => fallback.to_string(),
    }
}

pub fn banner_url(user_id: u64, hash: Option<&str>, cdn: &CdnUrls) -> Option<String> {
    hash.filter(|h| !h.is_empty())
        .map(|hash| cdn.banner(user_id, hash))
}

pub fn avatar_link(url: &str) -> String {
    format!("[**Avatar**]({})", url)
}

pub fn banner_link(url: Option<&str>) -> String {
    match url {
        Some(url) => format!("[**Banner**]({})", url),
        None => NO_BANNER.to_string(),
    }
}

pub fn decoration_link(user_id: u64, decoration: Option<&AvatarDecoration>, cdn: &CdnUrls) -> String {
    match decoration
        .and_then(|d| d.asset.as_deref())
        .filter(|a| !a.is_empty())
    {
        Some(asset) => format!(
            "[**Avatar Decoration**]({})",
            cdn.avatar_decoration(user_id, asset)
        ),
        None => NO_DECORATION.to_string(),
    }
}

/// A role held by a guild member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRole {
    pub id: u64,
    pub name: String,
    pub position: u16,
}

/// Role names from lowest to highest, without the `@everyone` role
pub fn format_roles(roles: &[MemberRole], default_role_id: u64) -> String {
    let mut roles: Vec<&MemberRole> = roles.iter().filter(|r| r.id != default_role_id).collect();
    if roles.is_empty() {
        return NO_ROLES.to_string();
    }

    roles.sort_by_key(|r| (r.position, r.id));
    roles
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_global_name(global_name: Option<&str>) -> String {
    global_name.unwrap_or(NO_GLOBAL_NAME).to_string()
}

/// The discriminator line, empty for migrated usernames (discriminator `0`)
pub fn discriminator_line(discriminator: Option<u16>) -> String {
    match discriminator.filter(|d| *d != 0) {
        Some(d) => format!("**Discriminator:** `#{:04}`\n", d),
        None => String::new(),
    }
}

pub fn account_type(is_bot: bool) -> &'static str {
    if is_bot {
        "Bot Account"
    } else {
        "User Account"
    }
}
