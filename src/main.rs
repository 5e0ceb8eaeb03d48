//! subenum: passive subdomain enumeration.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                     ENUMERATOR                       │
//!    domain         │  ┌────────────┐     one task per source              │
//!   ────────────────┼─▶│orchestrator│──┬──────────────┬──────────────┐     │
//!                   │  └─────┬──────┘  ▼              ▼              ▼     │
//!                   │        │     ┌────────┐     ┌────────┐     ┌────────┐│
//!                   │        │     │executor│     │executor│     │executor││──▶ crt.sh,
//!                   │        │     │ +retry │     │ +retry │     │ +retry ││    hackertarget,
//!                   │        │     │ +proxy │     │ +proxy │     │ +proxy ││    ...
//!                   │        │     └───┬────┘     └───┬────┘     └───┬────┘│
//!                   │        │         ▼              ▼              ▼     │
//!                   │        │      parse          parse          parse    │
//!                   │        │         └──────┬───────┴──────┬───────┘     │
//!                   │        │                ▼              ▼             │
//!    subdomains     │        │          result set      error sink         │
//!   ◀───────────────┼────────┴───────── (merged)        (observer)         │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;

use subenum::config::{load_config, validate_config, ConfigError, EnumeratorConfig, ProxyConfig};
use subenum::enumeration::Enumerator;
use subenum::lifecycle::{signals, Shutdown};
use subenum::observability::{logging, metrics};
use subenum::sources::SourceRegistry;

#[derive(Parser)]
#[command(name = "subenum")]
#[command(about = "Enumerate subdomains from certificate transparency and OSINT sources", long_about = None)]
struct Cli {
    /// Target domain (e.g. example.com)
    domain: String,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy URL, repeatable; credentials may be given as user:pass@host
    #[arg(short = 'x', long = "proxy")]
    proxies: Vec<String>,

    /// Only query the named source, repeatable
    #[arg(short, long = "source")]
    sources: Vec<String>,

    /// Overall deadline in seconds
    #[arg(short, long)]
    deadline: Option<u64>,

    /// Verify TLS certificates of sources
    #[arg(long)]
    verify_tls: bool,
}

impl Cli {
    fn apply(&self, config: &mut EnumeratorConfig) {
        config
            .proxies
            .extend(self.proxies.iter().map(|url| ProxyConfig::from_url(url)));
        if !self.sources.is_empty() {
            config.sources = self.sources.clone();
        }
        if let Some(deadline) = self.deadline {
            config.deadline_secs = deadline;
        }
        if self.verify_tls {
            config.accept_invalid_certs = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let builtin = SourceRegistry::builtin();

    let mut config = match &cli.config {
        Some(path) => load_config(path, &builtin)?,
        None => EnumeratorConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config, &builtin).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!("subenum v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let registry = config.registry(&builtin)?;
    tracing::info!(
        sources = ?registry.names(),
        proxies = config.proxies.len(),
        deadline_secs = config.deadline_secs,
        "Configuration loaded"
    );

    let enumerator = Enumerator::with_http(registry, config.proxy_endpoints(), config.transport_settings())?
        .with_deadline(config.deadline());

    let shutdown = Arc::new(Shutdown::new());
    tokio::spawn(signals::cancel_on_ctrl_c(shutdown.clone()));

    let result = enumerator
        .enumerate_until(&cli.domain, Some(shutdown.subscribe()))
        .await?;

    for subdomain in &result.subdomains {
        println!("{}", subdomain);
    }

    tracing::info!(
        domain = %result.domain,
        subdomains = result.subdomains.len(),
        failed_sources = result.errors.len(),
        "Done"
    );
    Ok(())
}
