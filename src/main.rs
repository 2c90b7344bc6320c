use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use dapp_harness::chain::HttpNode;
use dapp_harness::driver::web::PlaywrightFactory;
use dapp_harness::runner::{ConsoleNarrator, Orchestrator};
use dapp_harness::utils::config::HarnessConfig;
use dapp_harness::{probe, report};

#[derive(Parser)]
#[command(name = "dapp-harness")]
#[command(version = "0.1.0")]
#[command(about = "Wallet, signing and frontend integration checks for dApp stacks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every probe once and write the report
    Run {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON-RPC node URL
        #[arg(long)]
        rpc_url: Option<String>,

        /// Frontend root URL
        #[arg(long)]
        frontend_url: Option<String>,

        /// Output directory for reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not launch a browser; frontend probes are skipped
        #[arg(long, default_value = "false")]
        no_browser: bool,

        /// Show the browser window
        #[arg(long, default_value = "false")]
        headed: bool,

        /// Also generate HTML and JUnit reports
        #[arg(long, default_value = "false")]
        report: bool,
    },

    /// Generate report from a persisted JSON report
    Report {
        /// Path to the JSON report
        results: PathBuf,

        /// Output format (json, html, junit)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the probes in run order
    Probes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            rpc_url,
            frontend_url,
            output,
            no_browser,
            headed,
            report,
        } => {
            let mut harness_config = HarnessConfig::load(config.as_deref())?;
            if let Some(url) = rpc_url {
                harness_config.rpc_url = url;
            }
            if let Some(url) = frontend_url {
                harness_config.frontend_url = url;
            }
            if let Some(dir) = output {
                harness_config.output_dir = dir;
            }
            if no_browser {
                harness_config.browser.enabled = false;
            }
            if headed {
                harness_config.browser.headless = false;
            }
            harness_config.validate()?;

            println!(
                "{} Starting {} integration tests",
                "▶".green().bold(),
                harness_config.product_name.cyan()
            );
            println!("  RPC: {}", harness_config.rpc_url.cyan());
            println!("  Frontend: {}", harness_config.frontend_url.cyan());
            println!(
                "  Output: {}",
                harness_config.output_dir.display().to_string().cyan()
            );
            if report {
                println!("  Reports: {}", "Enabled".green());
            }

            let rpc = HttpNode::new(&harness_config.rpc_url, harness_config.rpc_timeout_ms)?;
            let code = {
                let mut orchestrator = Orchestrator::new(
                    harness_config,
                    Box::new(rpc),
                    Box::new(PlaywrightFactory),
                    probe::default_probes(),
                )?
                .with_sink(Box::new(ConsoleNarrator::new()))
                .with_extra_reports(report);

                let test_report = orchestrator.run().await?;
                let code = report::exit::decide(&test_report);
                if code == report::exit::EXIT_OK {
                    println!("\n{} No probe failed", "✅".green());
                } else {
                    println!(
                        "\n{} {} probe(s) failed",
                        "❌".red(),
                        test_report.summary().failed
                    );
                }
                code
            };
            std::process::exit(code);
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::generate_report(&results, &format, output.as_deref()).await?;
        }

        Commands::Probes => {
            for (i, probe) in probe::default_probes().iter().enumerate() {
                println!("{:>2}. {}", i + 1, probe.name());
            }
        }
    }

    Ok(())
}
