//! kg-extract: extract knowledge-graph triples from a text file
//!
//! Usage:
//!   kg-extract <filename>
//!
//! Prints the model's `ENTITY1 -> RELATIONSHIP -> ENTITY2` listing to stdout.

use anyhow::Context;
use kg_extract::{extract_knowledge_graph, logging, ManifestLoader, ManifestRegistry};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_usage();
            return;
        }
        "--version" | "-V" => {
            println!("kg-extract {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {}
    }

    logging::init();

    match run(&args[1]).await {
        Ok(graph) => println!("{graph}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: kg-extract <filename>");
}

async fn run(path: &str) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;

    let manifest = ManifestLoader::new().load().await?;
    let registry = ManifestRegistry::new(manifest);

    Ok(extract_knowledge_graph(&registry, &text).await?)
}
