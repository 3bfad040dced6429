//! kg-collect: crawl a website and save its visible text as an extraction corpus
//!
//! Usage:
//!   kg-collect <start-url> [--max-pages N] [--output FILE] [--delay-ms N]

use std::time::Duration;

use anyhow::{bail, Context};
use kg_extract::collector::{
    Collector, CrawlConfig, DEFAULT_DELAY, DEFAULT_MAX_PAGES, DEFAULT_OUTPUT,
};
use kg_extract::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }
    if matches!(args[1].as_str(), "--help" | "-h") {
        print_usage();
        return;
    }

    logging::init();

    if let Err(e) = run(&args[1..]).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"kg-collect: same-site crawler producing a text corpus

USAGE:
    kg-collect <start-url> [OPTIONS]

OPTIONS:
    --max-pages <N>     Maximum number of pages to scrape (default: {DEFAULT_MAX_PAGES})
    --output <FILE>     File receiving the scraped text (default: {DEFAULT_OUTPUT})
    --delay-ms <N>      Pause after each page in milliseconds (default: {})"#,
        DEFAULT_DELAY.as_millis()
    );
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let mut config = CrawlConfig::new(&args[0])?;

    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .with_context(|| format!("missing value for {flag}"))?;
        config = match flag.as_str() {
            "--max-pages" => config.max_pages(
                value
                    .parse()
                    .with_context(|| format!("invalid --max-pages value '{value}'"))?,
            ),
            "--output" => config.output(value),
            "--delay-ms" => config.delay(Duration::from_millis(
                value
                    .parse()
                    .with_context(|| format!("invalid --delay-ms value '{value}'"))?,
            )),
            other => bail!("unknown option: {other}"),
        };
    }

    let output = config.output.clone();
    let summary = Collector::new(config)?.run().await?;
    println!(
        "Scraping complete! Scraped {} pages. Text content saved to {}",
        summary.pages_scraped,
        output.display()
    );
    Ok(())
}
