use base64::Engine;
use clap::Parser;
use std::time::Duration;

use crate::error::{BotError, Result};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com";
/// Discord drops an interaction that is not answered within 3 seconds
pub const REPLY_WINDOW_MS: u64 = 3000;
pub const DEFAULT_TIMEOUT_MS: u64 = 2500;
/// Time kept free after the lookup for sending the reply itself
const SEND_HEADROOM_MS: u64 = 500;

/// Discord bot that shows detailed profile information about a user
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Register commands to this guild only instead of globally (faster for testing)
    #[arg(long)]
    pub guild_id: Option<u64>,

    /// Timeout in milliseconds for the profile lookup against the Discord API
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Base URL of the Discord REST API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Base URL of the Discord CDN used for avatar, banner and badge links
    #[arg(long, default_value = DEFAULT_CDN_BASE)]
    pub cdn_base: String,

    /// Log at DEBUG level instead of INFO
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Runtime configuration assembled from the environment and command line
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub guild_id: Option<u64>,
    pub http_timeout: Duration,
    pub api_base: String,
    pub cdn_base: String,
}

impl BotConfig {
    /// Build the config, reading the bot token from `DISCORD_TOKEN`
    pub fn from_env(args: &Args) -> Result<Self> {
        Self::from_parts(args, std::env::var("DISCORD_TOKEN").ok())
    }

    fn from_parts(args: &Args, token: Option<String>) -> Result<Self> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BotError::MissingEnv {
                name: "DISCORD_TOKEN".to_string(),
            })?;

        let max_timeout_ms = REPLY_WINDOW_MS - SEND_HEADROOM_MS;
        if args.timeout_ms == 0 || args.timeout_ms > max_timeout_ms {
            return Err(BotError::ConfigValidation {
                message: format!(
                    "--timeout-ms must be between 1 and {} so the reply fits Discord's {} ms window",
                    max_timeout_ms, REPLY_WINDOW_MS
                ),
            });
        }

        Ok(Self {
            token,
            guild_id: args.guild_id,
            http_timeout: Duration::from_millis(args.timeout_ms),
            api_base: args.api_base.trim_end_matches('/').to_string(),
            cdn_base: args.cdn_base.trim_end_matches('/').to_string(),
        })
    }

    /// Application ID encoded in the first segment of the bot token, if decodable
    pub fn application_id(&self) -> Option<String> {
        application_id_from_token(&self.token)
    }
}

fn application_id_from_token(token: &str) -> Option<String> {
    let encoded = token.split('.').next()?;
    // Tokens are usually URL-safe base64 without padding, but not always
    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(encoded)
        .or_else(|_| base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(encoded))
        .ok()?;
    let id = String::from_utf8(decoded).ok()?;
    id.chars().all(|c| c.is_ascii_digit()).then_some(id)
}
