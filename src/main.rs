use clap::Parser;
use fxlab::utils::{logger, validation::Validate};
use fxlab::{
    Cli, DealerStudy, FactorStudy, LocalStorage, SmileStudy, StudyCommand, StudyEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting fxlab");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = cli.run_settings();
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(settings.output_path.clone());

    let result = match &cli.command {
        StudyCommand::Dealer(args) => {
            let study = DealerStudy::new(
                storage,
                settings.clone(),
                args.params(),
                args.policies.clone(),
            );
            StudyEngine::new_with_monitoring(study, monitor_enabled)
                .run()
                .await
        }
        StudyCommand::Factor(args) => {
            let study = FactorStudy::new(
                storage,
                settings.clone(),
                args.market(),
                args.tenors.clone(),
                args.strategies.clone(),
            );
            StudyEngine::new_with_monitoring(study, monitor_enabled)
                .run()
                .await
        }
        StudyCommand::Smile(args) => {
            let study = SmileStudy::new(
                storage,
                settings.clone(),
                args.quotes(),
                args.extrap_factors.clone(),
                args.curve_points,
            );
            StudyEngine::new_with_monitoring(study, monitor_enabled)
                .run()
                .await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Study completed successfully!");
            tracing::info!("📁 Results saved to: {}", output_path);
            println!("✅ Study completed successfully!");
            println!("📁 Results saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Study failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                fxlab::utils::error::ErrorSeverity::Low => 0,
                fxlab::utils::error::ErrorSeverity::Medium => 2,
                fxlab::utils::error::ErrorSeverity::High => 1,
                fxlab::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
