//! Locally phrase agent
//!
//! Opens (or attaches to) a browser, loads a page and keeps harvesting its
//! translatable phrases into a Locally project until interrupted.

use anyhow::Context;
use clap::Parser;
use locally_agent::browser::{BrowserSession, ConnectionOptions, LaunchOptions, normalize_url};
use locally_agent::config::{AgentConfig, DEFAULT_EXCLUDED_TAGS};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "locally-agent")]
#[command(version)]
#[command(about = "Harvest translatable phrases from a live page", long_about = None)]
struct Cli {
    /// Project key the phrases are filed under
    #[arg(long, short = 'p')]
    project: String,

    /// Collector endpoint receiving phrase batches
    #[arg(long, short = 'e', value_name = "URL")]
    endpoint: String,

    /// Page to open before attaching (default: keep the current page)
    #[arg(long, short = 'u', value_name = "URL")]
    url: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// WebSocket endpoint of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// Minimum time between two dispatches
    #[arg(long, default_value = "10000", value_name = "MS")]
    min_send_interval_ms: u64,

    /// URL polling period
    #[arg(long, default_value = "1000", value_name = "MS")]
    poll_interval_ms: u64,

    /// Tag whose text is never harvested (repeatable, replaces the defaults)
    #[arg(long = "exclude-tag", value_name = "TAG")]
    exclude_tags: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let excluded: Vec<String> = if cli.exclude_tags.is_empty() {
        DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        cli.exclude_tags.clone()
    };

    let config = AgentConfig::new(&cli.project, &cli.endpoint)
        .min_send_interval(Duration::from_millis(cli.min_send_interval_ms))
        .poll_interval(Duration::from_millis(cli.poll_interval_ms))
        .excluded_tags(excluded);
    config.validate().context("Invalid agent configuration")?;

    let session = match cli.ws_endpoint {
        Some(ref ws_url) => {
            log::info!("Connecting to browser at {}", ws_url);
            BrowserSession::connect(ConnectionOptions::new(ws_url.clone()))?
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(ref path) = cli.executable_path {
                options = options.chrome_path(path);
            }
            if let Some(ref dir) = cli.user_data_dir {
                options = options.user_data_dir(dir);
            }
            log::info!("Launching {} browser", if options.headless { "headless" } else { "headed" });
            BrowserSession::launch(options)?
        }
    };

    if let Some(ref target) = cli.url {
        let target = normalize_url(target);
        log::info!("Opening {}", target);
        session.navigate(&target)?;
    }

    let agent = session.attach_agent(config).context("Failed to attach agent")?;
    let handle = agent.start()?;
    log::info!("Agent attached for project {}, press Ctrl-C to stop", cli.project);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, detaching");
        }
        _ = handle.wait() => {
            log::info!("Page closed, agent stopped");
        }
    }

    Ok(())
}
