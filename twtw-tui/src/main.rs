// Console host for the twitch-tweaks plugin
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use twtw_common::models::PrefKey;
use twtw_common::traits::Host;
use twtw_core::{DefaultHttpClient, TwitchTweaks};
use twtw_tui::ConsoleHost;
use twtw_tui::commands::dispatch;

#[derive(Parser, Debug, Clone)]
#[command(name = "twtw-console")]
#[command(author, version, about = "Twitch Tweaks - stream status in your channel topics")]
struct Args {
    /// Preference file (defaults to <config dir>/twitch-tweaks/prefs.json)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Server name shown for the connection
    #[arg(long, default_value = "Twitch")]
    server: String,

    /// Network host of the connection; matched against twitch_base_domain
    #[arg(long, default_value = "irc.chat.twitch.tv")]
    host: String,

    /// Channel to open at startup (repeatable)
    #[arg(long = "channel", short = 'c')]
    channels: Vec<String>,

    /// Strip colour codes from topics, like hosts that cannot hide them
    #[arg(long, default_value = "false")]
    plain_topic: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("twtw=info".parse().unwrap_or_default());
    fmt().with_env_filter(filter).init();
}

fn default_prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("twitch-tweaks").join("prefs.json"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let prefs_path = args.prefs.clone().or_else(default_prefs_path);
    info!("Using preference file {:?}", prefs_path);
    let host = Arc::new(ConsoleHost::new(&args.server, &args.host, prefs_path, args.plain_topic)?);

    if let Ok(token) = std::env::var("TWTW_OAUTH_TOKEN") {
        if !host.set_pref(&PrefKey::TwitchOauthToken.storage_key(), &token) {
            warn!("Could not store TWTW_OAUTH_TOKEN in preferences");
        }
    }

    for channel in &args.channels {
        host.join(channel);
    }

    let http = Arc::new(DefaultHttpClient::new()?);
    let mut plugin = TwitchTweaks::new(host.clone(), http);
    plugin.load()?;

    println!("Type /help for available commands.\n");

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        stdout().flush()?;

        let line = match reader.next_line().await? {
            Some(line) => line.trim().to_string(),
            None => break, // EOF
        };
        if line.is_empty() {
            continue;
        }

        let (quit_requested, output) = dispatch(&line, &host, &plugin).await;
        if let Some(msg) = output {
            println!("{}", msg);
        }
        if quit_requested {
            break;
        }
    }

    plugin.unload().await;
    println!("Goodbye!");
    Ok(())
}
