//! # nid
//!
//! Command-line administration for the NameID link store.

#![forbid(unsafe_code)]

use clap::Parser;
use nid_cli::{
    cli::{Cli, Command},
    commands::{
        open_db, run_config, run_construct, run_find, run_issue, run_list, run_manage, run_map,
        run_match, run_publish, run_published, run_remove_local, run_remove_remote,
    },
    config::CliConfig,
    output::error,
    CliResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &config).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> CliResult<()> {
    let output = cli.output;
    let command = match cli.command {
        Command::Config(cmd) => return run_config(cmd, config),
        other => other,
    };

    let db = open_db(&config.config).await?;
    match command {
        Command::Issue {
            local_id,
            format,
            sp,
            nq,
        } => run_issue(&db, &local_id, &format, sp.as_deref(), nq.as_deref(), output).await,
        Command::Construct {
            local_id,
            sp,
            nq,
            policy,
        } => {
            run_construct(
                &db,
                &config.config,
                &local_id,
                sp.as_deref(),
                nq.as_deref(),
                &policy,
                output,
            )
            .await
        }
        Command::Find(name_id) => run_find(&db, &name_id).await,
        Command::Match { local_id, sp, nq } => {
            run_match(&db, &local_id, sp.as_deref(), nq.as_deref(), output).await
        }
        Command::List { local_id } => run_list(&db, &local_id, output).await,
        Command::RemoveLocal { local_id } => run_remove_local(&db, &local_id).await,
        Command::RemoveRemote(name_id) => run_remove_remote(&db, &name_id).await,
        Command::Publish {
            local_id,
            relying_party,
            name_id,
        } => run_publish(&db, &local_id, &relying_party, &name_id).await,
        Command::Published {
            local_id,
            relying_party,
        } => run_published(&db, &local_id, &relying_party, output).await,
        Command::Map { name_id, policy } => run_map(&db, &name_id, &policy, output).await,
        Command::Manage {
            name_id,
            new_id,
            terminate,
        } => run_manage(&db, &name_id, new_id, terminate, output).await,
        Command::Config(_) => Ok(()),
    }
}
