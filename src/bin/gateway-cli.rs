use clap::{Parser, Subcommand};
use serde_json::Value;

use backend_gateway::config::loader::BACKEND_URL_ENV;
use backend_gateway::config::schema::DEFAULT_BACKEND_URL;
use backend_gateway::proxy::{BackendTarget, CollectionQuery, PathSegments};
use backend_gateway::proxy::request::parse_query;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the backend gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a running gateway
    Health {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
    /// Print the backend URL a request would be forwarded to
    Resolve {
        /// Backend base URL
        #[arg(short, long, env = BACKEND_URL_ENV, default_value = DEFAULT_BACKEND_URL)]
        base: String,
        /// Backend resource (e.g. templates)
        #[arg(short, long)]
        resource: String,
        /// Catch-all tail for a path route (e.g. 42/preview)
        #[arg(short, long, conflicts_with = "query")]
        path: Option<String>,
        /// Raw query string for a collection route (e.g. "search=a&other=x")
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health { url } => {
            let res = reqwest::Client::new()
                .get(format!("{}/healthz", url.trim_end_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Resolve { base, resource, path, query } => {
            let target = BackendTarget::root(&base, &resource);
            let target = match (path, query) {
                (Some(path), _) => target.with_segments(&PathSegments::from_tail(&path)),
                (None, Some(query)) => {
                    target.with_query(CollectionQuery::from_params(&parse_query(&query)).to_query_string())
                }
                (None, None) => target,
            };
            println!("{}", target.url);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
