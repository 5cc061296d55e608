//! Command-line entry point: analyze one article URL and print the result
//! as JSON on stdout.

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;

use newsbrief::analyzer::{AnalyzeSettings, Analyzer};
use newsbrief::config::Config;
use newsbrief::inference::ModelProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: analyze <article-url>");
    };

    let config = Config::from_env().context("invalid configuration")?;
    let provider = ModelProvider::from_config(&config);
    let analyzer = Analyzer::new(&provider);

    let result = analyzer
        .analyze(&url, &AnalyzeSettings::default())
        .await
        .context("analysis failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
