use clap::Parser;
use fxlab::config::toml_config::TomlConfig;
use fxlab::utils::{logger, validation::Validate};
use fxlab::{DealerStudy, FactorStudy, LocalStorage, SmileStudy, StudyEngine};

#[derive(Parser)]
#[command(name = "lab-suite")]
#[command(about = "Run a configured suite of fxlab studies")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "lab-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be simulated without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting fxlab study suite");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No simulations will run");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let mut outputs = Vec::new();

    if let Some((params, policies, settings)) = config.dealer_params() {
        let storage = LocalStorage::new(settings.output_path.clone());
        let study = DealerStudy::new(storage, settings, params, policies);
        let engine = StudyEngine::new_with_monitoring(study, monitor_enabled);
        outputs.push(run_study("dealer-hedging", engine.run().await));
    }

    if let Some((market, tenors, strategies, settings)) = config.factor_market() {
        let storage = LocalStorage::new(settings.output_path.clone());
        let study = FactorStudy::new(storage, settings, market, tenors, strategies);
        let engine = StudyEngine::new_with_monitoring(study, monitor_enabled);
        outputs.push(run_study("factor-hedging", engine.run().await));
    }

    if let Some((quotes, extrap_factors, curve_points, settings)) = config.smile_quotes() {
        let storage = LocalStorage::new(settings.output_path.clone());
        let study = SmileStudy::new(storage, settings, quotes, extrap_factors, curve_points);
        let engine = StudyEngine::new_with_monitoring(study, monitor_enabled);
        outputs.push(run_study("smile-spline", engine.run().await));
    }

    let failures = outputs.iter().filter(|ok| !**ok).count();
    if failures > 0 {
        eprintln!("❌ {} of {} studies failed", failures, outputs.len());
        std::process::exit(1);
    }

    println!("✅ Suite completed: {} studies", outputs.len());
    Ok(())
}

fn run_study(name: &str, result: fxlab::Result<String>) -> bool {
    match result {
        Ok(output_path) => {
            tracing::info!("✅ {} completed", name);
            println!("✅ {} -> {}", name, output_path);
            true
        }
        Err(e) => {
            tracing::error!(
                "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
                name,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}: {}", name, e.user_friendly_message());
            false
        }
    }
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Lab: {} v{}", config.lab.name, config.lab.version);
    println!("  Output: {}", config.output_path());
    println!("  Seed: {}", config.seed());
    println!("  Workers: {}", config.workers());
    println!("  Studies: {}", config.enabled_studies().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
