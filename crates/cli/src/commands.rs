//! Subcommand handlers.

use anyhow::Context;
use serde_json::{Value, json};
use tracing::info;

use cloudsearch_client::documents::fields_from_json;
use cloudsearch_client::{BatchResponse, CloudSearchClient, Fields, SearchResults};

use crate::config::{Command, SearchArgs};

/// Runs one subcommand and prints its JSON output.
pub async fn run(client: &CloudSearchClient, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Search(args) => search(client, args).await,
        Command::Add { id, fields } | Command::Update { id, fields } => {
            let fields = parse_fields(fields)?;
            let response = client.add_item(id, fields).await?;
            print_batch(id, response)
        }
        Command::Remove { id } => {
            let response = client.remove_item(id).await?;
            print_batch(id, response)
        }
    }
}

async fn search(client: &CloudSearchClient, args: &SearchArgs) -> anyhow::Result<()> {
    let options = args.options()?;

    if args.url_only {
        println!("{}", client.search_url(&args.term, &options)?);
        return Ok(());
    }

    let results = client.search(&args.term, &options).await?;
    println!("{}", serde_json::to_string_pretty(&results_json(&results))?);
    Ok(())
}

fn results_json(results: &SearchResults) -> Value {
    json!({
        "total_entries": results.total_entries(),
        "current_page": results.current_page(),
        "total_pages": results.total_pages(),
        "page_size": results.page_size(),
        "cursor": results.cursor(),
        "hits": results.hits(),
    })
}

/// Parses a JSON object into document fields.
pub fn parse_fields(raw: &str) -> anyhow::Result<Fields> {
    let value: Value = serde_json::from_str(raw).context("fields are not valid JSON")?;
    fields_from_json(value).ok_or_else(|| anyhow::anyhow!("fields must be a JSON object"))
}

fn print_batch(id: &str, response: Option<BatchResponse>) -> anyhow::Result<()> {
    match response {
        Some(response) => {
            info!(id, status = %response.status, "Document batch submitted");
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        None => info!(id, "Sandbox mode, nothing sent"),
    }
    Ok(())
}
