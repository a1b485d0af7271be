use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use search_latency::client::HttpSearchClient;
use search_latency::config::{self, Config, ConfigLayer};
use search_latency::display;
use search_latency::sampler::{self, StopPolicy};
use search_latency::signing::RequestSigner;
use search_latency::types::OutputFormat;

#[derive(Parser)]
#[command(
    name = "search-latency",
    version,
    about = "Sample OpenSearch query latency until a target average is reached"
)]
struct Cli {
    /// Index to query
    #[arg(long = "index_name", visible_alias = "index-name")]
    index_name: Option<String>,

    /// AWS region used for request signing [default: ap-northeast-2]
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Requests per batch [default: 3]
    #[arg(long)]
    request: Option<usize>,

    /// Stop once a batch averages at least this many milliseconds [default: 1]
    #[arg(
        long = "target_avg_search_time",
        visible_alias = "target-avg-search-time"
    )]
    target_avg_search_time: Option<u64>,

    /// Cluster endpoint, e.g. https://search-domain.region.es.amazonaws.com
    #[arg(long, env = "SEARCH_LATENCY_URL")]
    url: Option<String>,

    /// SigV4 service name: "es" for managed domains, "aoss" for serverless
    #[arg(long)]
    service: Option<String>,

    /// Pause between requests in a batch [default: 1000]
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Give up after this many batches
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Give up after this many seconds (checked between batches)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Send one {"size":1} query and print the raw response
    #[arg(long)]
    single_shot: bool,

    /// Do not sign requests (local or open clusters)
    #[arg(long)]
    unsigned: bool,

    #[arg(long)]
    format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long)]
    json: bool,

    /// Config file [default: <config dir>/search-latency/config.toml]
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            url: self.url.clone(),
            index_name: self.index_name.clone(),
            region: self.region.clone(),
            service: self.service.clone(),
            request: self.request,
            target_avg_search_time: self.target_avg_search_time,
            interval_ms: self.interval_ms,
            max_rounds: self.max_rounds,
            timeout_secs: self.timeout_secs,
            unsigned: self.unsigned.then_some(true),
            format: if self.json {
                Some(OutputFormat::Json)
            } else {
                self.format
            },
        }
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let file_layer = config::load_file(cli.config.as_deref())?;
    let config = Config::resolve(cli.layer().or(file_layer), cli.single_shot)?;

    // Bad endpoints fail before credential resolution.
    let mut client = HttpSearchClient::new(&config.url)?;
    if config.sign {
        client = client.with_signer(RequestSigner::from_environment(
            &config.region,
            &config.service,
        )?);
    }

    if config.single_shot {
        let body = sampler::single_shot(&client, &config.index_name)?;
        print!("{}", display::format_single_shot(&body));
        return Ok(());
    }

    let policy = StopPolicy::from(&config);
    let outcome = sampler::run_until_target(&client, &config, policy, |round, report| {
        let output = match config.format {
            OutputFormat::Text => display::format_batch(&config.index_name, report),
            OutputFormat::Json => {
                display::format_json_batch(round, &config.index_name, report, Utc::now())
            }
        };
        print!("{}", output);
    });

    outcome.into_result(config.target_avg_search_time)?;

    if config.format == OutputFormat::Text {
        print!("{}", display::format_finish());
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
