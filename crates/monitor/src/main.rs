use anyhow::Context;
use clap::Parser;
use crashwatch_core::crash::CrashKey;
use crashwatch_core::snapshot::is_jpeg;
use crashwatch_monitor::api::CrashApi;
use crashwatch_monitor::cli::{Cli, Command, FilterArgs, ReviewAction, WatchArgs};
use crashwatch_monitor::poller::{cancel_on_signal, Poller};
use crashwatch_monitor::render;
use crashwatch_monitor::review;
use crashwatch_monitor::store::DashboardStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crashwatch_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let api = CrashApi::new(&cli.base_url, cli.request_timeout())
        .context("Failed to build HTTP client")?;
    tracing::debug!(base_url = %api.base_url(), "Using crash service");

    match cli.command {
        Command::Watch(args) => watch(api, args).await,
        Command::List { filter, select } => list(api, filter, select).await,
        Command::Image { selector, output } => {
            let key: CrashKey = selector.parse()?;
            let bytes = api
                .image(key)
                .await
                .with_context(|| format!("Failed to fetch image for crash {key}"))?;
            if !is_jpeg(&bytes) {
                tracing::warn!(crash = %key, "Image payload is not a JPEG");
            }
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
            Ok(())
        }
        Command::Review { action } => review_crash(api, action).await,
    }
}

async fn watch(api: CrashApi, args: WatchArgs) -> anyhow::Result<()> {
    let backoff = args.backoff();
    let selector = args.crash.clone();
    let mut store = DashboardStore::new(args.filter.into_filter()?);
    let mut poller = Poller::new(api, backoff);

    poller.initialize(&mut store, selector.as_deref()).await;
    println!("{}\n", render::dashboard(&store));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(tokio::signal::ctrl_c(), cancel.clone()));

    poller
        .run(&mut store, cancel, |store, outcome| {
            tracing::debug!(?outcome, "Dashboard updated");
            println!("{}\n", render::dashboard(store));
        })
        .await;

    Ok(())
}

async fn list(api: CrashApi, filter: FilterArgs, select: Option<String>) -> anyhow::Result<()> {
    let crashes = api.list().await.context("Failed to fetch crash list")?;
    let mut store = DashboardStore::new(filter.into_filter()?);
    store.replace_crashes(crashes);

    if let Some(selector) = select {
        let key: CrashKey = selector.parse()?;
        if store.select(key).is_none() {
            anyhow::bail!("Crash {key} is not in the crash list");
        }
    }

    println!("{}", render::overview(&store));
    Ok(())
}

async fn review_crash(api: CrashApi, action: ReviewAction) -> anyhow::Result<()> {
    let mut store = DashboardStore::default();
    let target = review::load_target(&api, &mut store, action.selector())
        .await
        .with_context(|| format!("Failed to load crash {}", action.selector()))?;
    let crash = store
        .review_target(target)
        .ok_or(review::ReviewError::NoTarget)?;

    let confirmation = review::review(action.decision(), crash, &mut rand::rng());
    for line in confirmation.lines() {
        println!("{line}");
    }
    Ok(())
}
