use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

mod api;
mod commands;
mod config;
mod error;
mod events;
mod logging;
mod messages;
mod profile;

use api::DiscordApi;
use commands::getuserinfo;
use config::{Args, BotConfig};
use events::{handle_ready, register_commands};
use profile::{CdnUrls, ProfileAggregator};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

/// Application context handed to every command
pub struct Data {
    pub aggregator: ProfileAggregator,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Ready { data_about_bot } = event {
        if let Err(e) = handle_ready(ctx, data_about_bot).await {
            error!("Failed to handle ready: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    logging::init(args.verbose);

    let config = BotConfig::from_env(&args)?;

    if let Some(app_id) = config.application_id() {
        info!(
            "Bot ID: {} (configure intents at https://discord.com/developers/applications/{}/bot)",
            app_id, app_id
        );
    }

    let api = DiscordApi::new(&config.api_base, &config.token, config.http_timeout)?;
    let cdn = CdnUrls::new(&config.cdn_base);
    info!(
        "Profile lookups via {} (timeout {} ms)",
        config.api_base,
        config.http_timeout.as_millis()
    );

    let target_guild_id = config.guild_id.map(serenity::GuildId::new);
    if let Some(gid) = target_guild_id {
        info!("--guild-id: Registering commands to guild {} only", gid);
    }

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![getuserinfo()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' invoked by {} (ID: {}) in {}",
                        ctx.command().qualified_name,
                        ctx.author().name,
                        ctx.author().id,
                        ctx.guild_id().map(|g| g.to_string()).unwrap_or_else(|| "DM".to_string())
                    );
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Command '{}' completed for {}",
                        ctx.command().qualified_name,
                        ctx.author().name
                    );
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::Command { error, ctx, .. } => {
                            error!("Error in command '{}': {}", ctx.command().qualified_name, error);
                            let _ = ctx
                                .send(
                                    poise::CreateReply::default()
                                        .content(messages::COMMAND_FAILED)
                                        .ephemeral(true),
                                )
                                .await;
                        }
                        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
                            error!("Argument parse error in '{}': {} (input: {:?})", ctx.command().qualified_name, error, input);
                        }
                        poise::FrameworkError::MissingBotPermissions { missing_permissions, ctx, .. } => {
                            error!("Bot missing permissions for '{}': {:?}", ctx.command().qualified_name, missing_permissions);
                        }
                        other => {
                            error!("Other framework error: {}", other);
                        }
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot logged in as: {}", ready.user.name);

                register_commands(ctx, &framework.options().commands, target_guild_id).await;

                Ok(Data {
                    aggregator: ProfileAggregator::new(Arc::new(api), cdn),
                })
            })
        })
        .build();

    // Member and presence caches back the server and status sections
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_PRESENCES;
    let privileged_intents = ["GUILD_MEMBERS", "GUILD_PRESENCES"];
    info!("Requesting privileged intents: {:?}", privileged_intents);

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");
    if let Err(e) = client.start().await {
        let err_str = e.to_string();
        if err_str.contains("Disallowed") || err_str.contains("intents") {
            error!("Failed to start bot: {}", e);
            error!("The following privileged intents need to be enabled in the Discord Developer Portal:");
            for intent in &privileged_intents {
                error!("  - {}", intent);
            }
            return Err(anyhow::anyhow!(
                "Disallowed gateway intents. Enable these in Discord Developer Portal: {:?}",
                privileged_intents
            ));
        }
        return Err(e.into());
    }
    warn!("Bot ended.");

    Ok(())
}
