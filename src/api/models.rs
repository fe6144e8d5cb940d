//! Raw user profile as returned by `GET /users/{id}`.
//!
//! Every field the bot does not strictly need is optional, so that missing
//! or `null` values are handled here once instead of at every use site.
//! Identity fields (id, discriminator, bot flag) come from the gateway's
//! `User` instead and are not read from here.

use serde::Deserialize;
use serde_json::{Map, Value};

/// User object from the Discord REST API
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub public_flags: Option<u64>,
    #[serde(default)]
    pub clan: Option<ClanTag>,
    #[serde(default)]
    pub primary_guild: Option<ClanTag>,
    #[serde(default)]
    pub avatar_decoration_data: Option<AvatarDecoration>,
}

impl UserProfile {
    /// Badge bit-flags, zero when the API left them out
    pub fn flags(&self) -> u64 {
        self.public_flags.unwrap_or(0)
    }

    /// The clan tag to display: `clan` when it is a non-empty object, else `primary_guild`.
    ///
    /// A `clan` whose keys are all `null` still wins over `primary_guild`.
    pub fn clan_tag(&self) -> Option<&ClanTag> {
        self.clan
            .as_ref()
            .filter(|c| !c.is_empty())
            .or(self.primary_guild.as_ref())
    }

    /// Global display name, unless it is missing or just repeats the username
    pub fn distinct_global_name(&self) -> Option<&str> {
        self.global_name
            .as_deref()
            .filter(|name| !name.is_empty() && *name != self.username)
    }
}

/// Clan / primary guild tag
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(from = "Map<String, Value>")]
pub struct ClanTag {
    pub tag: Option<String>,
    pub identity_guild_id: Option<String>,
    pub badge: Option<String>,
    /// Number of keys in the JSON object, `null` values included
    key_count: usize,
}

impl ClanTag {
    pub fn new(tag: Option<&str>, identity_guild_id: Option<&str>, badge: Option<&str>) -> Self {
        Self {
            tag: tag.map(String::from),
            identity_guild_id: identity_guild_id.map(String::from),
            badge: badge.map(String::from),
            key_count: [tag, identity_guild_id, badge].iter().flatten().count(),
        }
    }

    /// True only for `{}`
    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }
}

impl From<Map<String, Value>> for ClanTag {
    fn from(object: Map<String, Value>) -> Self {
        let string = |key: &str| object.get(key).and_then(Value::as_str).map(String::from);
        Self {
            tag: string("tag"),
            identity_guild_id: string("identity_guild_id"),
            badge: string("badge"),
            key_count: object.len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AvatarDecoration {
    #[serde(default)]
    pub asset: Option<String>,
}
