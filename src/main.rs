use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use siteready_core::{AuditConfig, SiteAuditor};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "siteready";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    site: String,
    config_path: Option<PathBuf>,
    max_pages: Option<usize>,
    max_depth: Option<usize>,
    timeout_ms: Option<u64>,
    budget_ms: Option<u64>,
    concurrency: Option<usize>,
    compact: bool,
}

impl CliOptions {
    /// Config file (or defaults) with command-line overrides applied.
    fn audit_config(&self) -> Result<AuditConfig> {
        let mut config = match &self.config_path {
            Some(path) => AuditConfig::from_json_file(path)?,
            None => AuditConfig::default(),
        };

        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.page_timeout_ms = timeout_ms;
        }
        if let Some(budget_ms) = self.budget_ms {
            config.crawl_budget_ms = budget_ms;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run(CliOptions),
    Help,
    Version,
}

fn parse_arguments(args: &[String]) -> Result<CliCommand> {
    if args.is_empty() {
        return Ok(CliCommand::Help);
    }

    let mut options = CliOptions::default();
    let mut site: Option<String> = None;
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_str();

        if matches!(arg, "-h" | "--help") {
            return Ok(CliCommand::Help);
        }

        if matches!(arg, "-v" | "--version") {
            return Ok(CliCommand::Version);
        }

        if matches!(arg, "-c" | "--compact") {
            options.compact = true;
            i += 1;
            continue;
        }

        // Flags taking a value accept both `--flag value` and `--flag=value`
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
            _ => (arg, None),
        };

        if matches!(
            flag,
            "--config"
                | "--max-pages"
                | "--max-depth"
                | "--timeout-ms"
                | "--budget-ms"
                | "--concurrency"
        ) {
            let value = match inline {
                Some(value) => {
                    i += 1;
                    value
                }
                None => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("{flag} requires a value"))?
                        .clone();
                    i += 2;
                    value
                }
            };

            match flag {
                "--config" => options.config_path = Some(PathBuf::from(value)),
                "--max-pages" => options.max_pages = Some(parse_number(flag, &value)?),
                "--max-depth" => options.max_depth = Some(parse_number(flag, &value)?),
                "--timeout-ms" => options.timeout_ms = Some(parse_number(flag, &value)?),
                "--budget-ms" => options.budget_ms = Some(parse_number(flag, &value)?),
                _ => options.concurrency = Some(parse_number(flag, &value)?),
            }
            continue;
        }

        if arg.starts_with('-') {
            return Err(anyhow!("unknown flag: {arg}"));
        }

        if site.is_none() {
            site = Some(arg.to_string());
        } else {
            return Err(anyhow!("unexpected additional argument: {}", arg));
        }

        i += 1;
    }

    options.site = site.ok_or_else(|| anyhow!("missing <SITE> argument"))?;
    Ok(CliCommand::Run(options))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("{flag} expects a non-negative integer, got '{value}'"))
}

fn print_help() {
    println!("{APP_NAME} - AI readiness audit for websites");
    println!("Usage: {APP_NAME} [OPTIONS] <SITE>\n");
    println!("Options:");
    println!("      --config <PATH>     Load budgets from a JSON config file");
    println!("      --max-pages <N>     Maximum pages to scan (default 20)");
    println!("      --max-depth <N>     Link traversal depth (default 2)");
    println!("      --timeout-ms <MS>   Per-page timeout (default 6000)");
    println!("      --budget-ms <MS>    Total crawl budget (default 20000)");
    println!("      --concurrency <N>   Fetches in flight at once (default 4)");
    println!("  -c, --compact           Print single-line JSON");
    println!("  -v, --version           Show version information");
    println!("  -h, --help              Show this help message");
    println!("\nLogs go to stderr; set RUST_LOG=siteready_core=debug for per-page detail.");
}

fn print_version() {
    println!("{APP_NAME} {VERSION}");
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw_args = env::args().skip(1).collect::<Vec<_>>();
    let options = match parse_arguments(&raw_args)? {
        CliCommand::Run(options) => options,
        CliCommand::Help => {
            print_help();
            return Ok(());
        }
        CliCommand::Version => {
            print_version();
            return Ok(());
        }
    };

    init_logging();

    let config = options.audit_config()?;
    debug!(?config, "resolved configuration");

    let auditor = SiteAuditor::new(config)?;
    let result = auditor
        .audit_site(&options.site)
        .await
        .with_context(|| format!("failed to audit {}", options.site))?;

    let json = if options.compact {
        serde_json::to_string(result.as_ref())?
    } else {
        serde_json::to_string_pretty(result.as_ref())?
    };
    println!("{json}");

    Ok(())
}
