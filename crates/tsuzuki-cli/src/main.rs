use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tsuzuki_api::http::ReqwestTransport;
use tsuzuki_core::config::AppConfig;
use tsuzuki_core::models::{status_list, NormalizedItem, WatchStatus};
use tsuzuki_core::storage::Storage;
use tsuzuki_watchlist::view::title_aliases;
use tsuzuki_watchlist::{AniListFlavor, WatchlistFlavor};

type Flavor = AniListFlavor<ReqwestTransport, Storage>;

#[derive(Parser, Debug)]
#[command(name = "tsuzuki")]
#[command(about = "AniList watchlists with next-up episodes from the local episode database")]
struct Cli {
    /// AniList user name (overrides config)
    #[arg(short, long)]
    user: Option<String>,

    /// Show only titles in status lists, without progress
    #[arg(long)]
    no_progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the status menu
    Statuses,
    /// Print the items of one status list, or of every list
    List {
        /// Route code or label, e.g. `CURRENT`, `next-up`, `plan to watch`
        #[arg(required_unless_present = "all")]
        status: Option<WatchStatus>,

        /// Fetch every status list concurrently
        #[arg(long, conflicts_with = "status")]
        all: bool,

        /// Print items as JSON
        #[arg(long)]
        json: bool,

        /// Print the title aliases used for local matching instead of items
        #[arg(long, conflicts_with_all = ["all", "json"])]
        aliases: bool,
    },
    /// Report watch progress for a media
    Update { media_id: u64, episode: u32 },
    /// Map a Kitsu id to its AniList id
    ResolveKitsu { kitsu_id: String },
    /// Resolve the configured user name to its id and save it
    Login,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_items(items: &[NormalizedItem]) {
    for item in items {
        println!("{}\t{}", item.name, item.action);
    }
}

async fn list_one(flavor: &Flavor, status: WatchStatus, json: bool, aliases: bool) -> anyhow::Result<()> {
    if aliases {
        let entries = flavor
            .fetch_status(status)
            .await
            .with_context(|| format!("fetching {status} list"))?;
        for entry in &entries {
            println!("{}\t{}", entry.media_id, title_aliases(entry));
        }
        return Ok(());
    }

    let items = flavor.get_watchlist_status(status).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print_items(&items);
    }
    Ok(())
}

async fn list_all(flavor: &Flavor, json: bool) -> anyhow::Result<()> {
    let lists = join_all(
        WatchStatus::ALL
            .iter()
            .map(|&status| flavor.get_watchlist_status(status)),
    )
    .await;

    if json {
        let out: Vec<_> = WatchStatus::ALL
            .iter()
            .zip(&lists)
            .map(|(status, items)| serde_json::json!({ "status": status.label(), "items": items }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (status, items) in WatchStatus::ALL.iter().zip(&lists) {
        println!("== {} ({}) ==", status.label(), items.len());
        print_items(items);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("loading config")?;
    init_tracing(&config.general.log_filter);

    if let Some(user) = cli.user {
        config.anilist.username = user;
    }

    let db_path = config.ensure_db_path()?;
    let store = Storage::open(&db_path)
        .with_context(|| format!("opening episode database {}", db_path.display()))?;
    let transport = ReqwestTransport::new()?;
    let flavor =
        AniListFlavor::from_config(transport, store, &config.anilist).with_progress(!cli.no_progress);

    match cli.command {
        Command::Statuses => {
            for (label, code) in status_list() {
                println!("{label}\t{code}");
            }
        }
        Command::List {
            status,
            all,
            json,
            aliases,
        } => match status {
            Some(status) if !all => list_one(&flavor, status, json, aliases).await?,
            _ => list_all(&flavor, json).await?,
        },
        Command::Update { media_id, episode } => {
            flavor.watchlist_update(media_id, episode).await;
        }
        Command::ResolveKitsu { kitsu_id } => {
            let anilist_id = flavor
                .resolve_kitsu_id(&kitsu_id)
                .await
                .with_context(|| format!("resolving kitsu id {kitsu_id}"))?;
            println!("{anilist_id}");
        }
        Command::Login => {
            if config.anilist.username.is_empty() {
                bail!("no AniList user name configured; pass --user or set anilist.username");
            }
            let Some(login) = flavor.login().await? else {
                bail!("AniList has no user named {}", config.anilist.username);
            };
            config.anilist.user_id = Some(login.user_id);
            config.save().context("saving config")?;
            info!(user_id = login.user_id, "Saved AniList user id");
            println!("{}", login.user_id);
        }
    }

    Ok(())
}
