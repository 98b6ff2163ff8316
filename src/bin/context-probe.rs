use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "context-probe")]
#[command(about = "Probe a running http-context-ext server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the client IP and locality the server resolves
    Client {
        /// Send a CF-Connecting-IP header
        #[arg(long)]
        cf_connecting_ip: Option<String>,

        /// Send an X-Forwarded-For header (comma-separated list)
        #[arg(long)]
        forwarded_for: Option<String>,
    },
    /// Call the local-only status endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Client {
            cf_connecting_ip,
            forwarded_for,
        } => {
            let mut headers = HeaderMap::new();
            if let Some(ip) = cf_connecting_ip {
                headers.insert("CF-Connecting-IP", HeaderValue::from_str(&ip)?);
            }
            if let Some(list) = forwarded_for {
                headers.insert("X-Forwarded-For", HeaderValue::from_str(&list)?);
            }

            let res = client
                .get(format!("{}/client", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/internal/status", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Some(challenge) = res.headers().get(WWW_AUTHENTICATE) {
            eprintln!("WWW-Authenticate: {}", challenge.to_str().unwrap_or("<binary>"));
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
