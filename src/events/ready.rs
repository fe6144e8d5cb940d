use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::messages::STATUS_TEXT;
use crate::{Data, Error};

/// Advertise the command in the bot's custom status.
///
/// Runs on every READY so the status survives reconnects.
pub async fn handle_ready(ctx: &serenity::Context, ready: &serenity::Ready) -> Result<(), Error> {
    ctx.set_presence(
        Some(serenity::ActivityData::custom(STATUS_TEXT)),
        serenity::OnlineStatus::Online,
    );
    info!(
        "Bot connected as {} ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );
    Ok(())
}

/// Sync slash commands with Discord, to a single guild if one is given.
///
/// Registration overwrites the existing command set, so repeating it is harmless.
/// A failure is only logged; the previously registered commands stay active.
pub async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    guild_id: Option<serenity::GuildId>,
) {
    let names: Vec<String> = commands.iter().map(|c| format!("/{}", c.name)).collect();

    let result = match guild_id {
        Some(guild_id) => {
            info!("Registering commands to guild: {}", guild_id);
            poise::builtins::register_in_guild(ctx, commands, guild_id).await
        }
        None => {
            info!("Registering commands globally...");
            poise::builtins::register_globally(ctx, commands).await
        }
    };

    match result {
        Ok(()) => info!("Synchronized {} commands: {}", names.len(), names.join(", ")),
        Err(e) => error!("Failed to synchronize commands: {}", e),
    }
}
