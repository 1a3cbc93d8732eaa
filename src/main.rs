// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use apprepo_sync::config::Config;
use apprepo_sync::constants::env;
use apprepo_sync::sync::{KubeHandler, UserHandler};

#[derive(Parser, Debug)]
#[command(version, about = "Manage AppRepositories and their credentials")]
struct Args {
    /// Bearer token of the caller; the service account is used when absent
    #[arg(long, global = true, env = env::KUBE_TOKEN, hide_env_values = true)]
    token: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = Output::Json)]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the namespaces the caller may see
    Namespaces,
    /// Create an AppRepository from a request body
    Create {
        #[arg(short, long)]
        namespace: String,
        /// Request body, read from stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Show an AppRepository
    Get {
        #[arg(short, long)]
        namespace: String,
        name: String,
    },
    /// Delete an AppRepository and the copy of its credentials
    Delete {
        #[arg(short, long)]
        namespace: String,
        name: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Output {
    Json,
    Yaml,
}

fn print<T: Serialize>(output: Output, value: &T) -> Result<()> {
    let rendered = match output {
        Output::Json => serde_json::to_string_pretty(value)?,
        Output::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered);
    Ok(())
}

fn request_body(file: Option<PathBuf>) -> Result<Box<dyn Read + Send>> {
    match file {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

async fn run(handler: UserHandler, args: Args) -> Result<()> {
    match args.command {
        Command::Namespaces => {
            let namespaces = handler.get_namespaces().await?;
            print(args.output, &namespaces)
        }
        Command::Create { namespace, file } => {
            let app_repo = handler
                .create_app_repository(request_body(file)?, &namespace)
                .await?;
            print(args.output, &app_repo)
        }
        Command::Get { namespace, name } => {
            let app_repo = handler.get_app_repository(&name, &namespace).await?;
            print(args.output, &app_repo)
        }
        Command::Delete { namespace, name } => {
            handler.delete_app_repository(&name, &namespace).await?;
            info!("Deleted AppRepository {}/{}", namespace, name);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: system_namespace={}",
        config.system_namespace
    );

    let kube_handler = KubeHandler::new(&config).await?;
    let handler = match &args.token {
        Some(token) => kube_handler.as_user(token)?,
        None => kube_handler.as_svc(),
    };

    run(handler, args).await
}
