use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::debug;

use super::badges::BadgeSet;
use super::format::{self, CdnUrls};
use super::member::MemberContext;
use crate::api::{ProfileSource, UserProfile};
use crate::error::ProfileFetchError;

pub const GENERAL_INFO: &str = "General Info";
pub const BADGES: &str = "Badges";
pub const CLAN_INFO: &str = "Clan Info";
pub const STATUS_AND_ACTIVITIES: &str = "Status & Activities";
pub const SERVER_INFO: &str = "Server Info";
pub const DECORATIVE_ITEMS: &str = "Decorative Items";

/// The user being looked up, as the gateway SDK knows them
#[derive(Debug, Clone)]
pub struct TargetUser {
    pub id: u64,
    pub username: String,
    pub discriminator: Option<u16>,
    pub bot: bool,
    pub created_at: Option<DateTime<Utc>>,
    /// Avatar URL the SDK resolves, the default avatar when none is set
    pub fallback_avatar_url: String,
}

impl TargetUser {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl From<&serenity::User> for TargetUser {
    fn from(user: &serenity::User) -> Self {
        Self {
            id: user.id.get(),
            username: user.name.clone(),
            discriminator: user.discriminator.map(|d| d.get()),
            bot: user.bot,
            created_at: format::from_unix(user.created_at().unix_timestamp()),
            fallback_avatar_url: user.face(),
        }
    }
}

/// A titled block of the profile card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub body: String,
}

/// Everything needed to render a profile embed
#[derive(Debug, Clone)]
pub struct ProfileCard {
    pub sections: Vec<Section>,
    pub thumbnail_url: String,
    pub image_url: Option<String>,
}

impl ProfileCard {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn has_section(&self, title: &str) -> bool {
        self.section(title).is_some()
    }
}

/// Builds profile cards from one API lookup plus cached guild state
pub struct ProfileAggregator {
    source: Arc<dyn ProfileSource>,
    cdn: CdnUrls,
}

impl ProfileAggregator {
    pub fn new(source: Arc<dyn ProfileSource>, cdn: CdnUrls) -> Self {
        Self { source, cdn }
    }

    /// Fetch the target's profile and assemble the card.
    ///
    /// `member_lookup` is only consulted once the fetch has succeeded.
    pub async fn aggregate<F>(
        &self,
        target: &TargetUser,
        member_lookup: F,
    ) -> Result<ProfileCard, ProfileFetchError>
    where
        F: FnOnce() -> Option<MemberContext>,
    {
        let profile = self.source.fetch_user(target.id).await?;
        let member = member_lookup();
        debug!(
            "Fetched profile for {} (member context: {})",
            target.id,
            member.is_some()
        );

        Ok(self.build_card(target, &profile, member.as_ref()))
    }

    fn build_card(
        &self,
        target: &TargetUser,
        profile: &UserProfile,
        member: Option<&MemberContext>,
    ) -> ProfileCard {
        let mut sections = vec![Section {
            title: GENERAL_INFO,
            body: general_info(target, profile),
        }];

        let badges = BadgeSet::decode(profile.flags());
        if !badges.is_empty() {
            let names: Vec<&str> = badges.badges().iter().map(|b| b.name).collect();
            debug!("User {} has badges: {}", target.id, names.join(", "));
            sections.push(Section {
                title: BADGES,
                body: badges.render(),
            });
        }

        let clan = format::format_clan(profile.clan_tag(), &self.cdn);
        if clan != format::NO_CLAN_TAG {
            sections.push(Section {
                title: CLAN_INFO,
                body: clan,
            });
        }

        if let Some(member) = member {
            sections.push(Section {
                title: STATUS_AND_ACTIVITIES,
                body: status_activity(member),
            });
            sections.push(Section {
                title: SERVER_INFO,
                body: server_info(member),
            });
        }

        let avatar_url = format::avatar_url(
            target.id,
            profile.avatar.as_deref(),
            &target.fallback_avatar_url,
            &self.cdn,
        );
        let banner_url = format::banner_url(target.id, profile.banner.as_deref(), &self.cdn);
        sections.push(Section {
            title: DECORATIVE_ITEMS,
            body: format!(
                ">>> {}\n{}\n{}",
                format::avatar_link(&avatar_url),
                format::banner_link(banner_url.as_deref()),
                format::decoration_link(
                    target.id,
                    profile.avatar_decoration_data.as_ref(),
                    &self.cdn
                ),
            ),
        });

        ProfileCard {
            sections,
            thumbnail_url: avatar_url,
            image_url: banner_url,
        }
    }
}

fn general_info(target: &TargetUser, profile: &UserProfile) -> String {
    format!(
        ">>> **Type:** {}\n\
         **Mention:** {}\n\
         **Username:** {}\n\
         {}\
         **Global Name:** {}\n\
         **User ID:** `{}`\n\
         **Account Created:** `{}`",
        format::account_type(target.bot),
        target.mention(),
        target.username,
        format::discriminator_line(target.discriminator),
        format::format_global_name(profile.distinct_global_name()),
        target.id,
        format::format_timestamp(target.created_at),
    )
}

fn status_activity(member: &MemberContext) -> String {
    let mut text = format!(">>> **Status:** {}\n", member.status.label());
    if let Some(custom) = &member.custom_status {
        text.push_str(&format!("**Custom Status:** {}", custom));
    }
    text
}

fn server_info(member: &MemberContext) -> String {
    format!(
        ">>> **Found in Server:** {}\n\
         **Joined Server:** `{}`\n\
         **Roles:** {}",
        member.guild_name,
        format::format_timestamp(member.joined_at),
        format::format_roles(&member.roles, member.default_role_id),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ClanTag;
    use crate::profile::format::MemberRole;
    use crate::profile::member::PresenceStatus;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory profile source that counts lookups
    pub(crate) struct StaticSource {
        pub profile: Option<UserProfile>,
        pub calls: AtomicUsize,
    }

    impl StaticSource {
        pub(crate) fn ok(profile: UserProfile) -> Arc<Self> {
            Arc::new(Self {
                profile: Some(profile),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn not_found() -> Arc<Self> {
            Arc::new(Self {
                profile: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ProfileSource for StaticSource {
        async fn fetch_user(&self, user_id: u64) -> Result<UserProfile, ProfileFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profile.clone().ok_or(ProfileFetchError::Status {
                user_id,
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }

    pub(crate) fn target() -> TargetUser {
        TargetUser {
            id: 80351110224678912,
            username: "nelly".to_string(),
            discriminator: None,
            bot: false,
            created_at: Some(Utc.with_ymd_and_hms(2015, 8, 14, 9, 5, 0).unwrap()),
            fallback_avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
        }
    }

    pub(crate) fn profile() -> UserProfile {
        UserProfile {
            username: "nelly".to_string(),
            ..Default::default()
        }
    }

    fn helper_member() -> MemberContext {
        MemberContext {
            guild_name: "Rustaceans".to_string(),
            default_role_id: 500,
            joined_at: Some(Utc.with_ymd_and_hms(2023, 6, 15, 14, 30, 0).unwrap()),
            roles: vec![MemberRole {
                id: 501,
                name: "Helper".to_string(),
                position: 1,
            }],
            status: PresenceStatus::Idle,
            custom_status: None,
        }
    }

    fn aggregator(source: Arc<StaticSource>) -> ProfileAggregator {
        ProfileAggregator::new(source, CdnUrls::default())
    }

    #[tokio::test]
    async fn test_no_badges_section_when_no_flags() {
        let card = aggregator(StaticSource::ok(profile()))
            .aggregate(&target(), || None)
            .await
            .unwrap();

        assert!(!card.has_section(BADGES));
        assert!(!card.has_section(CLAN_INFO));
        assert!(!card.has_section(SERVER_INFO));
        assert!(!card.has_section(STATUS_AND_ACTIVITIES));
        let titles: Vec<&str> = card.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec![GENERAL_INFO, DECORATIVE_ITEMS]);
        assert!(card.sections.iter().all(|s| !s.body.contains("No badges")));
    }

    #[tokio::test]
    async fn test_badges_and_clan_sections() {
        let mut profile = profile();
        profile.public_flags = Some((1 << 9) | (1 << 22));
        profile.primary_guild = Some(ClanTag::new(Some("RUST"), None, None));

        let card = aggregator(StaticSource::ok(profile))
            .aggregate(&target(), || None)
            .await
            .unwrap();

        let titles: Vec<&str> = card.sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec![GENERAL_INFO, BADGES, CLAN_INFO, DECORATIVE_ITEMS]);
        assert_eq!(
            card.section(BADGES).unwrap().body,
            ">>> <:earlysupporter:1434657961690665142><:activedeveloper:1434657953453047858>"
        );
        assert_eq!(card.section(CLAN_INFO).unwrap().body, "> **Tag:** RUST");
    }

    #[tokio::test]
    async fn test_clan_without_values_hides_primary_guild() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"username": "nelly", "clan": {"tag": null}, "primary_guild": {"tag": "PG"}}"#,
        )
        .unwrap();

        let card = aggregator(StaticSource::ok(profile))
            .aggregate(&target(), || None)
            .await
            .unwrap();

        assert!(!card.has_section(CLAN_INFO));
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_member_lookup() {
        let source = StaticSource::not_found();
        let mut looked_up = false;

        let result = aggregator(source.clone())
            .aggregate(&target(), || {
                looked_up = true;
                Some(helper_member())
            })
            .await;

        assert!(matches!(result, Err(ProfileFetchError::Status { .. })));
        assert!(!looked_up);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_self_lookup_in_guild() {
        let source = StaticSource::ok(profile());
        let card = aggregator(source.clone())
            .aggregate(&target(), || Some(helper_member()))
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let general = &card.section(GENERAL_INFO).unwrap().body;
        assert_eq!(
            general,
            ">>> **Type:** User Account\n\
             **Mention:** <@80351110224678912>\n\
             **Username:** nelly\n\
             **Global Name:** None\n\
             **User ID:** `80351110224678912`\n\
             **Account Created:** `August 14, 2015 09:05 AM`"
        );

        let server = &card.section(SERVER_INFO).unwrap().body;
        assert_eq!(
            server,
            ">>> **Found in Server:** Rustaceans\n\
             **Joined Server:** `June 15, 2023 02:30 PM`\n\
             **Roles:** Helper"
        );

        assert_eq!(
            card.section(STATUS_AND_ACTIVITIES).unwrap().body,
            ">>> **Status:** Idle\n"
        );

        let decorative = &card.section(DECORATIVE_ITEMS).unwrap().body;
        assert_eq!(
            decorative,
            ">>> [**Avatar**](https://cdn.discordapp.com/embed/avatars/0.png)\n\
             **No banner**\n\
             **No avatar decoration**"
        );
        assert_eq!(card.thumbnail_url, "https://cdn.discordapp.com/embed/avatars/0.png");
        assert!(card.image_url.is_none());
    }

    #[tokio::test]
    async fn test_custom_assets_and_status() {
        let mut profile = profile();
        profile.avatar = Some("av".to_string());
        profile.banner = Some("bn".to_string());
        let mut target = target();
        target.discriminator = Some(7);
        let mut member = helper_member();
        member.custom_status = Some("shipping crates".to_string());

        let card = aggregator(StaticSource::ok(profile))
            .aggregate(&target, || Some(member))
            .await
            .unwrap();

        assert_eq!(
            card.thumbnail_url,
            "https://cdn.discordapp.com/avatars/80351110224678912/av.png?size=1024"
        );
        assert_eq!(
            card.image_url.as_deref(),
            Some("https://cdn.discordapp.com/banners/80351110224678912/bn.png?size=1024")
        );
        assert!(card
            .section(GENERAL_INFO)
            .unwrap()
            .body
            .contains("**Discriminator:** `#0007`\n"));
        assert_eq!(
            card.section(STATUS_AND_ACTIVITIES).unwrap().body,
            ">>> **Status:** Idle\n**Custom Status:** shipping crates"
        );
    }
}
