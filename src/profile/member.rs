use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

use super::format::{from_unix, MemberRole};

/// Online status as shown on the profile card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    #[default]
    Offline,
}

impl PresenceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "Online",
            PresenceStatus::Idle => "Idle",
            PresenceStatus::DoNotDisturb => "Do Not Disturb",
            PresenceStatus::Offline => "Offline",
        }
    }
}

impl From<serenity::OnlineStatus> for PresenceStatus {
    fn from(status: serenity::OnlineStatus) -> Self {
        match status {
            serenity::OnlineStatus::Online => PresenceStatus::Online,
            serenity::OnlineStatus::Idle => PresenceStatus::Idle,
            serenity::OnlineStatus::DoNotDisturb => PresenceStatus::DoNotDisturb,
            _ => PresenceStatus::Offline,
        }
    }
}

/// Guild-specific data about the target, copied out of the cache
#[derive(Debug, Clone, Default)]
pub struct MemberContext {
    pub guild_name: String,
    pub default_role_id: u64,
    pub joined_at: Option<DateTime<Utc>>,
    pub roles: Vec<MemberRole>,
    pub status: PresenceStatus,
    pub custom_status: Option<String>,
}

impl MemberContext {
    /// Snapshot of `user_id` in a cached guild, `None` if they are not a member
    pub fn from_guild(guild: &serenity::Guild, user_id: serenity::UserId) -> Option<Self> {
        let member = guild.members.get(&user_id)?;

        let roles = member
            .roles
            .iter()
            .filter_map(|role_id| guild.roles.get(role_id))
            .map(|role| MemberRole {
                id: role.id.get(),
                name: role.name.clone(),
                position: role.position,
            })
            .collect();

        let presence = guild.presences.get(&user_id);
        let status = presence
            .map(|p| PresenceStatus::from(p.status))
            .unwrap_or_default();
        let custom_status = presence.and_then(|p| {
            p.activities
                .iter()
                .find(|a| a.kind == serenity::ActivityType::Custom)
                .and_then(|a| a.state.clone())
                .filter(|s| !s.is_empty())
        });

        Some(Self {
            guild_name: guild.name.clone(),
            // The @everyone role shares the guild's ID
            default_role_id: guild.id.get(),
            joined_at: member.joined_at.and_then(|ts| from_unix(ts.unix_timestamp())),
            roles,
            status,
            custom_status,
        })
    }
}
