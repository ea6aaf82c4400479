// Main entry point for the Campus Explorer CLI
// Reads a form snapshot, prints the query it describes and optionally sends it

use anyhow::{anyhow, Context, Result};
use campus_explorer::client::QueryResponse;
use campus_explorer::logging::{LogConfig, LogFormat};
use campus_explorer::query;
use campus_explorer::{ClientConfig, FormState, Query, QueryBuilder, QuerySender};
use clap::Parser as ClapParser;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

/// Campus Explorer - build dataset queries from a form and send them
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Form snapshot (JSON). Read from stdin when omitted
    #[arg(short, long)]
    form: Option<PathBuf>,

    /// Send a ready-made query object (JSON) instead of building one
    #[arg(short, long, conflicts_with = "form")]
    query: Option<PathBuf>,

    /// POST the built query to the endpoint and print the response
    #[arg(short, long)]
    send: bool,

    /// Query endpoint (overrides CAMPUS_EXPLORER_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides CAMPUS_EXPLORER_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Pretty-print the query JSON
    #[arg(short, long)]
    pretty: bool,

    /// Log level filter, e.g. "info" or "campus_explorer=debug"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    LogConfig::default()
        .with_level(args.log_level.as_str())
        .with_format(LogFormat::Compact)
        .init()?;

    // A prewritten query is always sent as-is
    if let Some(path) = &args.query {
        let query = query::load_raw(path)
            .with_context(|| format!("failed to load query {}", path.display()))?;
        let response = sender(&args)?.send(&query)?;
        return print_response(&response, None);
    }

    let form = load_form(args.form.as_ref())?;
    let query = QueryBuilder::build(&form)?;

    if args.pretty {
        println!("{}", query.to_pretty_json()?);
    } else {
        println!("{}", query);
    }

    if args.send {
        let response = sender(&args)?.send(&query)?;
        print_response(&response, Some(&query))?;
    }

    Ok(())
}

/// Load the form from a file, or from stdin
fn load_form(path: Option<&PathBuf>) -> Result<FormState> {
    match path {
        Some(path) => FormState::from_path(path)
            .with_context(|| format!("failed to load form {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(FormState::from_json(&text)?)
        }
    }
}

/// Environment first, then flags on top
fn sender(args: &Args) -> Result<QuerySender> {
    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(QuerySender::new(config)?)
}

/// Print result rows as a table, in the query's column order when known
fn print_response(response: &QueryResponse, query: Option<&Query>) -> Result<()> {
    match response {
        QueryResponse::Error(message) => Err(anyhow!("query failed: {}", message)),
        QueryResponse::Result(_) => {
            let table = match query {
                Some(query) => response.format_with(&query.options.columns),
                None => response.format(),
            };
            println!("{}", table);
            Ok(())
        }
        QueryResponse::Other(_) => {
            println!("{}", response.format());
            Ok(())
        }
    }
}
