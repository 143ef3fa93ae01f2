use anyhow::Result;
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use jobagg_cli::{AppConfig, Session};
use jobagg_core::{HttpTransport, HttpUrlChecker, ReqwestTransport, SkipUrlCheck, UrlChecker};
use jobagg_hh::HeadHunterPlatform;
use jobagg_storage::JsonFileStore;
use jobagg_superjob::SuperJobPlatform;

#[derive(Parser)]
#[command(name = "jobagg", version)]
#[command(about = "Search HeadHunter and SuperJob vacancies, then sort, filter and save them", long_about = None)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _cli = Cli::parse();

    // Logs go to stderr so they never mix with the interactive output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(
        hh_api_url = %config.hh_api_url,
        superjob_api_url = %config.superjob_api_url,
        skip_url_check = config.skip_url_check,
        "configuration loaded"
    );

    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new(config.http_timeout, &config.user_agent)?);
    let checker: Arc<dyn UrlChecker> = if config.skip_url_check {
        Arc::new(SkipUrlCheck)
    } else {
        Arc::new(HttpUrlChecker::new(transport.clone()))
    };

    let hh =
        HeadHunterPlatform::with_config(config.headhunter(), transport.clone(), checker.clone());
    let superjob = SuperJobPlatform::with_config(config.superjob(), transport, checker.clone());

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), JsonFileStore::new(checker))
        .with_platform(Box::new(hh))
        .with_platform(Box::new(superjob));

    session.run().await?;

    Ok(())
}
