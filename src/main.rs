use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use subzero::cli::{Args, Command, EnumerateArgs};
use subzero::types::Config;
use subzero::{cancel, config, Enumerator, OutputManager, SourceRegistry};
use tokio::task::JoinSet;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with result lines.
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match args.command {
        Command::Enumerate(enumerate_args) => enumerate(enumerate_args).await,
        Command::Sources => list_sources(),
    }
}

async fn enumerate(args: EnumerateArgs) -> Result<()> {
    let config = config::load_config(&args)?;
    let registry = SourceRegistry::from_config(&config)?;
    let enumerator = Enumerator::new(&config, registry)?;
    let (handle, signal) = cancel::pair();

    info!(
        "Enumerating {} domains with {} sources",
        args.domains.len(),
        enumerator.registry().len()
    );

    let mut jobs = JoinSet::new();
    for domain in args.domains {
        let mut results = enumerator.enumerate_with_cancel(&domain, signal.clone());
        let output = OutputManager::new(args.verbose);

        jobs.spawn(async move {
            let mut printed = 0usize;
            while let Some(result) = results.recv().await {
                match output.write_to_stdout(&result) {
                    Ok(true) => printed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Failed to write results for {}: {}", domain, e);
                        break;
                    }
                }
            }
            info!("Completed enumeration for {}: printed {} lines", domain, printed);
        });
    }

    let deadline = config.deadline;
    let watcher = tokio::spawn(async move {
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => warn!("Interrupted, stopping all sources"),
            _ = expired => warn!("Deadline reached, stopping all sources"),
        }
        handle.cancel();
    });

    while let Some(joined) = jobs.join_next().await {
        if let Err(e) = joined {
            error!("Output task failed: {}", e);
        }
    }
    watcher.abort();

    Ok(())
}

fn list_sources() -> Result<()> {
    let registry = SourceRegistry::from_config(&Config::default())?;

    println!("Available sources:\n");
    for info in registry.infos() {
        let marker = if info.paginated { " (paginated)" } else { "" };
        println!("  {}{}", info.name, marker);
    }
    Ok(())
}
