use clap::Parser;
use secret_santa::config::toml_config::TomlConfig;
use secret_santa::core::{Mailer, ParticipantSource};
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{
    AppConfig, CliConfig, MatchOutcome, MatchingEngine, Notifier, OutboxMailer, Result, Roster,
    RosterFile, RunOutcome, SantaError, SecretSanta,
};

const EXIT_NO_MATCH: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🎅 Starting secret-santa");
    tracing::debug!("CLI config: {:?}", cli);

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            exit_code_for(&e)
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for(e: &SantaError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(cli: &CliConfig) -> Result<i32> {
    cli.validate()?;

    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    let app_config = match &file_config {
        Some(config) => config.to_app_config(cli.sends_mail())?,
        None => AppConfig::from_env(cli.sends_mail())?,
    };
    app_config.validate()?;
    tracing::info!(
        "✅ Configuration loaded for {} {}",
        app_config.exchange.exchange_name,
        app_config.exchange.year
    );

    let participants_path =
        cli.participants_path(file_config.as_ref().and_then(|c| c.participants_path()));
    let roster = Roster::new(RosterFile::new(participants_path).load_participants()?)?;

    let options = cli.match_options(
        file_config.as_ref().and_then(|c| c.max_attempts()),
        file_config.as_ref().is_some_and(|c| c.preflight()),
    );
    let engine = MatchingEngine::new(options);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no messages will be sent");
        return Ok(match engine.run(roster.participants()) {
            MatchOutcome::Matched { attempts, .. } => {
                println!(
                    "✅ Found a complete assignment for {} participants in {} attempt(s)",
                    roster.len(),
                    attempts
                );
                0
            }
            MatchOutcome::Exhausted { attempts } => {
                println!("❌ No complete assignment found in {} attempt(s)", attempts);
                EXIT_NO_MATCH
            }
        });
    }

    if let Some(dir) = &cli.outbox {
        tracing::info!("📂 Writing messages to {} instead of sending", dir);
        return run_exchange(cli, roster, engine, OutboxMailer::new(dir), app_config).await;
    }

    let smtp = app_config
        .smtp
        .clone()
        .ok_or_else(|| SantaError::MissingConfigError {
            field: "smtp".to_string(),
        })?;
    let mailer = connect_smtp(&smtp).await?;
    run_exchange(cli, roster, engine, mailer, app_config).await
}

#[cfg(feature = "smtp")]
async fn connect_smtp(
    settings: &secret_santa::SmtpSettings,
) -> Result<secret_santa::SmtpMailer> {
    secret_santa::SmtpMailer::connect(settings).await
}

#[cfg(not(feature = "smtp"))]
async fn connect_smtp(_settings: &secret_santa::SmtpSettings) -> Result<OutboxMailer> {
    Err(SantaError::TransportSetupError {
        message: "built without the `smtp` feature; use --outbox or --dry-run".to_string(),
    })
}

async fn run_exchange<M: Mailer>(
    cli: &CliConfig,
    roster: Roster,
    engine: MatchingEngine,
    mailer: M,
    app_config: AppConfig,
) -> Result<i32> {
    let notifier = Notifier::new(mailer, app_config.exchange).with_policy(cli.delivery_policy());
    let santa = SecretSanta::new(roster, engine, notifier);

    match santa.run().await? {
        RunOutcome::Delivered(report) => {
            println!(
                "✅ All matches drawn and {} participants notified",
                report.delivered.len()
            );
            Ok(0)
        }
        RunOutcome::NoMatch { attempts } => {
            eprintln!(
                "❌ No matches found in {} attempt(s); nothing was sent",
                attempts
            );
            Ok(EXIT_NO_MATCH)
        }
    }
}
