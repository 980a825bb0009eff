use crate::config::ScraperConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "price-scrape")]
#[command(about = "Scrape product prices from Amazon, Flipkart, Croma and Reliance Digital")]
pub struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Log CPU and memory usage at each batch phase
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headful: bool,

    /// Launch Chrome with --no-sandbox (containers, CI)
    #[arg(long, global = true)]
    pub no_sandbox: bool,

    /// Path to the Chrome/Chromium executable
    #[arg(long, global = true)]
    pub chrome: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scrape the configured items and write a CSV file (default)
    Batch(BatchArgs),
    /// Serve POST /scrape over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct BatchArgs {
    /// Override the CSV output path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also print the results as JSON on stdout
    #[arg(long)]
    pub print_json: bool,

    /// Show which platform each URL resolves to without launching a browser
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Batch(BatchArgs::default()))
    }

    /// 讀設定檔後套用命令列覆蓋
    pub fn load_config(&self) -> Result<ScraperConfig> {
        let mut config = match &self.config {
            Some(path) => ScraperConfig::from_file(path)?,
            None => ScraperConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ScraperConfig) {
        if self.headful {
            config.browser.headless = false;
        }
        if self.no_sandbox {
            config.browser.no_sandbox = true;
        }
        if let Some(chrome) = &self.chrome {
            config.browser.executable = Some(chrome.clone());
        }

        match &self.command {
            Some(Command::Batch(args)) => {
                if let Some(output) = &args.output {
                    config.output.csv_path = output.clone();
                }
            }
            Some(Command::Serve(args)) => {
                if let Some(host) = &args.host {
                    config.server.host = host.clone();
                }
                if let Some(port) = args.port {
                    config.server.port = port;
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_batch() {
        let cli = Cli::try_parse_from(["price-scrape"]).unwrap();
        assert!(matches!(cli.command(), Command::Batch(ref args) if !args.dry_run));

        let config = cli.load_config().unwrap();
        assert_eq!(config.output.csv_path, crate::config::DEFAULT_CSV_PATH);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "price-scrape",
            "--headful",
            "--no-sandbox",
            "--chrome",
            "/usr/bin/chromium",
            "batch",
            "--output",
            "out.csv",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert!(!config.browser.headless);
        assert!(config.browser.no_sandbox);
        assert_eq!(config.browser.executable.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.output.csv_path, "out.csv");
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["price-scrape", "serve", "--host", "127.0.0.1", "-p", "8081"])
                .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.server.bind_address(), "127.0.0.1:8081");
    }
}
