use crate::demo;
use crate::dispatcher::Dispatcher;
use crate::router::{LoadPolicy, LoadedRoutes, RouteTable, Router};
use crate::runtime_config::RuntimeConfig;
use crate::server::{AppService, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line interface for hmrouter
#[derive(Parser, Debug)]
#[command(name = "hmrouter")]
#[command(about = "Hypermedia router: serve the Library demo API or inspect route tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the Library demo API over HTTP
    Serve {
        /// Route specification file; the built-in demo table when omitted
        #[arg(short, long)]
        routes: Option<PathBuf>,

        /// Address and port to bind the server to
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,

        /// Prefix stripped from request paths (overrides HMR_BASE_PATH)
        #[arg(long)]
        base_path: Option<String>,

        /// Skip malformed route lines instead of failing
        #[arg(long, default_value_t = false)]
        lenient: bool,
    },
    /// Load a route specification and print its routes in match order
    Routes {
        /// Route specification file; the built-in demo table when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Skip malformed route lines instead of failing
        #[arg(long, default_value_t = false)]
        lenient: bool,
    },
    /// Show which handler and parameters a URI resolves to
    Match {
        /// The request URI, e.g. /books/57/reviews
        uri: String,

        /// Route specification file; the built-in demo table when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Prefix stripped from the URI before matching
        #[arg(long)]
        base_path: Option<String>,
    },
}

fn policy(lenient: bool, config: &RuntimeConfig) -> LoadPolicy {
    if lenient {
        LoadPolicy::Lenient
    } else {
        config.route_policy
    }
}

/// Load `file`, or the demo table when `None`.
///
/// # Errors
///
/// Unreadable files, and malformed ones under [`LoadPolicy::Strict`].
pub fn load_routes(file: Option<&Path>, policy: LoadPolicy) -> anyhow::Result<LoadedRoutes> {
    let loaded = match file {
        Some(path) => RouteTable::load_file(path, policy)
            .with_context(|| format!("failed to load routes from {}", path.display()))?,
        None => RouteTable::parse(demo::ROUTES, policy).context("built-in demo routes")?,
    };
    for diag in &loaded.diagnostics {
        eprintln!("warning: {diag}");
    }
    Ok(loaded)
}

/// One line per route: `<template> -> <handler>`.
#[must_use]
pub fn describe_routes(table: &RouteTable) -> String {
    let width = table.iter().map(|r| r.template().len()).max().unwrap_or(0);
    table
        .iter()
        .map(|r| format!("{:<width$} -> {}\n", r.template(), r.handler()))
        .collect()
}

/// JSON description of how `raw_uri` resolves.
#[must_use]
pub fn describe_match(router: &Router, raw_uri: &str) -> Value {
    let uri = router.api_uri(raw_uri);
    match router.route(&uri) {
        Some(matched) => {
            let params: serde_json::Map<String, Value> = matched
                .path_params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                .collect();
            json!({
                "uri": uri,
                "template": matched.route.template(),
                "handler": matched.handler_name(),
                "params": params,
            })
        }
        None => json!({ "uri": uri, "handler": Value::Null }),
    }
}

/// Run a parsed command.
///
/// # Errors
///
/// Route loading failures, bind failures, and a server coroutine that panics.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RuntimeConfig::from_env();

    match cli.command {
        Commands::Serve {
            routes,
            addr,
            base_path,
            lenient,
        } => {
            let loaded = load_routes(routes.as_deref(), policy(lenient, &config))?;
            let base_path = base_path.unwrap_or_else(|| config.base_path.clone());
            let router = Router::new(loaded.table).with_base_path(&base_path);
            let dispatcher = Dispatcher::new(router, demo::registry());

            for handler in dispatcher.unresolved_handlers() {
                warn!(handler_name = %handler, "Route handler is not registered; requests will fail with 500");
            }
            dispatcher.router().dump_routes();

            may::config().set_stack_size(config.stack_size);
            info!(
                addr = %addr,
                base_path = %base_path,
                stack_size = config.stack_size,
                routes_count = dispatcher.router().table().len(),
                "Starting server"
            );

            let handle = HttpServer(AppService::new(dispatcher))
                .start(addr.as_str())
                .with_context(|| format!("failed to bind {addr}"))?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))?;
            Ok(())
        }
        Commands::Routes { file, lenient } => {
            let loaded = load_routes(file.as_deref(), policy(lenient, &config))?;
            print!("{}", describe_routes(&loaded.table));
            Ok(())
        }
        Commands::Match {
            uri,
            file,
            base_path,
        } => {
            let loaded = load_routes(file.as_deref(), config.route_policy)?;
            let base_path = base_path.unwrap_or_else(|| config.base_path.clone());
            let router = Router::new(loaded.table).with_base_path(&base_path);
            let description = describe_match(&router, &uri);
            println!("{}", serde_json::to_string_pretty(&description)?);
            Ok(())
        }
    }
}
