use clap::Parser;
use price_scrape::config::cli::{BatchArgs, Command};
use price_scrape::core::resolver::resolve_platform;
use price_scrape::utils::{logger, validation::Validate};
use price_scrape::{
    adapters::http, BatchScraper, ChromiumLauncher, Cli, CsvSink, Extractor, LocalStorage,
    Result, ScrapeError, ScrapeJob, ScraperConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_logger(logger::LogFormat::from_flag(cli.json_logs), cli.verbose);

    tracing::info!("Starting price-scrape");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ price-scrape failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;

    // 驗證配置
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated");

    match cli.command() {
        Command::Batch(args) => run_batch(&config, &args, cli.monitor).await,
        Command::Serve(_) => run_server(&config, cli.monitor).await,
    }
}

fn build_scraper(config: &ScraperConfig, monitor: bool) -> BatchScraper<ChromiumLauncher> {
    let launcher = ChromiumLauncher::new(config.browser.clone());
    BatchScraper::new(launcher, Extractor::from_config(config)).with_monitoring(monitor)
}

async fn run_batch(config: &ScraperConfig, args: &BatchArgs, monitor: bool) -> Result<()> {
    let requests = config.requests();

    if args.dry_run {
        println!("🔍 Dry run: {} URL(s)", requests.len());
        for request in &requests {
            let platform = resolve_platform(&request.url);
            let selector = config
                .selectors
                .for_platform(platform)
                .map(|set| set.price.as_str())
                .unwrap_or("-");
            println!("  {} [{}] {}", request.item_name, platform, request.url);
            println!("      price selector: {}", selector);
        }
        return Ok(());
    }

    println!("Scraping product details from multiple platforms...");
    let sink = CsvSink::new(LocalStorage::new("."), config.output.csv_path.clone());
    let job = ScrapeJob::new(build_scraper(config, monitor), sink);
    let output = job.run(requests).await?;

    if args.print_json {
        println!("{}", serde_json::to_string_pretty(&output.report.results)?);
    }

    let summary = &output.report.summary;
    println!(
        "✅ Scraped details for {} products ({} failed, {} unsupported) in {}s.",
        summary.total,
        summary.failed,
        summary.unsupported,
        summary.elapsed().num_seconds()
    );
    println!("📁 Results saved to '{}'.", output.output_path);
    Ok(())
}

/// host/port 的命令列覆蓋已在 load_config 套用
async fn run_server(config: &ScraperConfig, monitor: bool) -> Result<()> {
    let addr = config.server.bind_address();

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        let message = if e.kind() == std::io::ErrorKind::AddrInUse {
            format!("{} is already in use", addr)
        } else {
            format!("failed to bind {}: {}", addr, e)
        };
        ScrapeError::ServerError { message }
    })?;

    let app = http::router(Arc::new(build_scraper(config, monitor)));
    http::serve(listener, app).await
}
