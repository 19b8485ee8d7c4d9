//! Crawl-Deck main entry point
//!
//! This is the command-line interface for the Crawl-Deck crawl dashboard.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use crawl_deck::config::{load_config, load_config_or_default, validate, Config, DEFAULT_CONFIG_FILE};
use crawl_deck::detail::{DetailSession, DetailSettings};
use crawl_deck::output::{format_created, format_detail, format_list, print_summary, StatusSummary};
use crawl_deck::poll::{ListSession, ListSettings, LoadState};
use crawl_deck::view::LoginFormFilter;
use crawl_deck::{CrawlApi, CrawlStatus, HttpCrawlApi, RecordFilter, RecordId, SortDirection, SortKey};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Crawl-Deck: a terminal dashboard for a web-crawling service
///
/// Lists, filters and manages crawl jobs through the service's JSON API and
/// keeps refreshing while jobs are still queued or running.
#[derive(Parser, Debug)]
#[command(name = "crawl-deck")]
#[command(version)]
#[command(about = "A terminal dashboard for a web-crawling service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file [default: ./crawl-deck.toml if present]
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Override the list page size from the config file
    #[arg(long, global = true, value_name = "N")]
    page_size: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of crawled URLs
    List(ListArgs),

    /// Submit a URL for crawling
    Add {
        /// Absolute http(s) URL
        url: String,
    },

    /// Delete one or more URLs
    Delete {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<RecordId>,
    },

    /// Re-run analysis for one or more URLs
    Rerun {
        #[arg(required = true, value_name = "ID")]
        ids: Vec<RecordId>,
    },

    /// Start the crawl for a URL
    Start { id: RecordId },

    /// Stop the crawl for a URL
    Stop { id: RecordId },

    /// Show details and broken links for a URL
    Show {
        id: RecordId,

        /// Keep refreshing until the crawl finishes
        #[arg(long)]
        watch: bool,
    },

    /// Count URLs per status
    Summary,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Match title or URL
    #[arg(short, long)]
    search: Option<String>,

    /// Title substring
    #[arg(long)]
    title: Option<String>,

    /// URL substring
    #[arg(long)]
    url: Option<String>,

    /// HTML version substring
    #[arg(long)]
    html: Option<String>,

    /// Exact status (queued, running, done, error)
    #[arg(long)]
    status: Option<CrawlStatus>,

    /// Login form filter (any, yes, no)
    #[arg(long, default_value = "any")]
    login: LoginFormFilter,

    /// Sort column
    #[arg(long)]
    sort: Option<SortKey>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Keep refreshing while jobs are queued or running
    #[arg(long)]
    watch: bool,
}

impl ListArgs {
    fn filter(&self) -> RecordFilter {
        RecordFilter {
            search: self.search.clone().unwrap_or_default(),
            title: self.title.clone().unwrap_or_default(),
            url: self.url.clone().unwrap_or_default(),
            html_version: self.html.clone().unwrap_or_default(),
            status: self.status,
            login_form: self.login,
        }
    }

    fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    tracing::debug!("Using API at {}", config.api.base_url);

    let api: Arc<dyn CrawlApi> =
        Arc::new(HttpCrawlApi::new(&config.api).context("Failed to set up API client")?);

    match cli.command {
        Command::List(args) => handle_list(api, &config, args).await,
        Command::Add { url } => handle_add(api, &config, &url).await,
        Command::Delete { ids } => handle_delete(api, &config, ids).await,
        Command::Rerun { ids } => handle_rerun(api, &config, ids).await,
        Command::Start { id } => handle_start_stop(api, &config, id, true).await,
        Command::Stop { id } => handle_start_stop(api, &config, id, false).await,
        Command::Show { id, watch } => handle_show(api, &config, id, watch).await,
        Command::Summary => handle_summary(api, &config).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_deck=info,warn"),
            1 => EnvFilter::new("crawl_deck=debug,info"),
            2 => EnvFilter::new("crawl_deck=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file and applies command-line overrides
///
/// An explicit `--config` must exist; the default file is optional.
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => load_config_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_FILE))?,
    };

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.view.page_size = page_size;
    }
    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Mounts the list view and waits for the first fetch to resolve
async fn mount_list(api: Arc<dyn CrawlApi>, config: &Config) -> anyhow::Result<ListSession> {
    let session = ListSession::mount(api, ListSettings::from_config(config));
    session.wait_until(|c| c.load_state().is_resolved()).await;

    if let Some(error) = session.read(|c| c.error().map(str::to_string)) {
        bail!("Failed to load URLs: {}", error);
    }
    Ok(session)
}

/// Prints the session's notice, if any
fn report_notice(session: &ListSession) {
    if let Some(notice) = session.dismiss_notice() {
        println!("{}", notice);
    }
}

async fn handle_list(
    api: Arc<dyn CrawlApi>,
    config: &Config,
    args: ListArgs,
) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;

    session.update(|view| {
        view.set_filter(args.filter());
        if let Some(key) = args.sort {
            view.set_sort(key, args.direction());
        } else if args.desc {
            let key = view.sort().key;
            view.set_sort(key, SortDirection::Desc);
        }
        view.set_page(args.page.saturating_sub(1));
    });

    print!("{}", session.read(format_list));

    if args.watch {
        watch_list(&session).await;
    }
    Ok(())
}

/// Reprints the list after every settled refresh until no job is active
async fn watch_list(session: &ListSession) {
    let mut changes = session.subscribe();
    loop {
        if !session.read(|c| c.needs_poll()) {
            tracing::info!("No active jobs left, stopping watch");
            break;
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                if session.read(|c| c.load_state() != LoadState::Loading) {
                    println!();
                    print!("{}", session.read(format_list));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}

async fn handle_add(api: Arc<dyn CrawlApi>, config: &Config, url: &str) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;
    let created = session.create(url).await;
    report_notice(&session);

    if let Some(record) = created? {
        println!("{}", format_created(&record));
    }
    Ok(())
}

async fn handle_delete(
    api: Arc<dyn CrawlApi>,
    config: &Config,
    ids: Vec<RecordId>,
) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;

    let outcome = if let [id] = ids.as_slice() {
        session.delete(id).await
    } else {
        select_known(&session, &ids);
        session.delete_selected().await
    };
    report_notice(&session);
    outcome?;
    Ok(())
}

async fn handle_rerun(
    api: Arc<dyn CrawlApi>,
    config: &Config,
    ids: Vec<RecordId>,
) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;
    select_known(&session, &ids);

    let outcome = session.rerun_selected().await;
    report_notice(&session);
    outcome?;
    Ok(())
}

/// Selects every id present in the list, warning about the rest
fn select_known(session: &ListSession, ids: &[RecordId]) {
    session.update(|view| {
        for id in ids {
            if !view.set_selected(id, true) {
                tracing::warn!("Skipping unknown URL id {}", id);
            }
        }
    });
}

async fn handle_start_stop(
    api: Arc<dyn CrawlApi>,
    config: &Config,
    id: RecordId,
    start: bool,
) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;
    let outcome = if start {
        session.start(&id).await
    } else {
        session.stop(&id).await
    };
    report_notice(&session);
    outcome?;
    Ok(())
}

async fn handle_show(
    api: Arc<dyn CrawlApi>,
    config: &Config,
    id: RecordId,
    watch: bool,
) -> anyhow::Result<()> {
    let session = DetailSession::mount(api, id, DetailSettings::from_config(config));
    session
        .wait_until(|c| c.load_state().is_resolved() && !c.broken_loading())
        .await;

    let failed = session.read(|c| c.record().is_none());
    print!("{}", session.read(format_detail));
    if failed {
        bail!("URL {} could not be loaded", session.id());
    }

    if watch {
        let mut changes = session.subscribe();
        while session.read(|c| c.needs_poll()) {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let settled = session.read(|c| {
                        c.load_state() != LoadState::Loading && !c.broken_loading()
                    });
                    if settled {
                        println!();
                        print!("{}", session.read(format_detail));
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }
    Ok(())
}

async fn handle_summary(api: Arc<dyn CrawlApi>, config: &Config) -> anyhow::Result<()> {
    let session = mount_list(api, config).await?;
    let summary = session.read(|c| StatusSummary::from_records(c.view().records()));
    print_summary(&summary);
    Ok(())
}
