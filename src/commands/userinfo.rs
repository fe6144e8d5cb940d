use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::error::ProfileFetchError;
use crate::messages::{footer_text, EMBED_COLOR, EMBED_TITLE, FETCH_FAILED};
use crate::profile::{MemberContext, ProfileCard, TargetUser};
use crate::{Context, Error};

/// Get detailed information about a user.
#[poise::command(slash_command)]
pub async fn getuserinfo(
    ctx: Context<'_>,
    #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());
    let user_id = target_user.id;
    let target = TargetUser::from(target_user);

    let outcome = ctx
        .data()
        .aggregator
        .aggregate(&target, || {
            ctx.guild()
                .and_then(|guild| MemberContext::from_guild(&guild, user_id))
        })
        .await;

    let reply = UserInfoReply::from(outcome);
    if !reply.is_ephemeral() {
        info!("Built profile card for {} ({})", target.username, user_id);
    }

    let footer = Footer {
        text: footer_text(chrono::Local::now()),
        icon_url: ctx.serenity_context().cache.current_user().face(),
    };
    ctx.send(reply.into_create_reply(&footer)).await?;
    Ok(())
}

fn log_fetch_failure(error: &ProfileFetchError) {
    if error.is_timeout() {
        warn!("Profile lookup for {} timed out", error.user_id());
    } else {
        warn!("Profile lookup failed: {}", error);
    }
}

pub struct Footer {
    pub text: String,
    pub icon_url: String,
}

/// The single reply a `/getuserinfo` invocation sends
#[derive(Debug)]
pub enum UserInfoReply {
    Card(ProfileCard),
    FetchFailed,
}

impl From<Result<ProfileCard, ProfileFetchError>> for UserInfoReply {
    fn from(outcome: Result<ProfileCard, ProfileFetchError>) -> Self {
        match outcome {
            Ok(card) => UserInfoReply::Card(card),
            Err(e) => {
                log_fetch_failure(&e);
                UserInfoReply::FetchFailed
            }
        }
    }
}

impl UserInfoReply {
    /// Only the invoker sees failures
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, UserInfoReply::FetchFailed)
    }

    pub fn into_create_reply(self, footer: &Footer) -> poise::CreateReply {
        match self {
            UserInfoReply::Card(card) => {
                poise::CreateReply::default().embed(card_embed(card, footer))
            }
            UserInfoReply::FetchFailed => poise::CreateReply::default()
                .content(FETCH_FAILED)
                .ephemeral(true),
        }
    }
}

fn card_embed(card: ProfileCard, footer: &Footer) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(EMBED_TITLE)
        .color(EMBED_COLOR)
        .thumbnail(card.thumbnail_url);

    for section in card.sections {
        embed = embed.field(section.title, section.body, false);
    }

    if let Some(image_url) = card.image_url {
        embed = embed.image(image_url);
    }

    embed.footer(serenity::CreateEmbedFooter::new(&footer.text).icon_url(&footer.icon_url))
}
