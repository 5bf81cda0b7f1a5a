use clap::Parser;
use script_checker::app::render;
use script_checker::config::LogFormat;
use script_checker::core::{ConfigProvider, Session};
use script_checker::utils::error::ErrorSeverity;
use script_checker::utils::{logger, validation::Validate};
use script_checker::{
    CheckerConfig, CheckerError, Cli, Command, LocalStorage, ScriptChecker, Shell, UploadForm,
    WebhookDispatcher,
};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = cli.config.as_ref().map(CheckerConfig::from_file).transpose();
    let log_format = match &loaded {
        Ok(Some(config)) => config.logging.format,
        _ => LogFormat::default(),
    };
    match log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting script-checker");

    let mut config = match loaded {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => exit_with(&e),
    };
    if let Some(ledger) = &cli.ledger {
        config.ledger.path = ledger.clone();
    }
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let storage = LocalStorage::new(".".to_string());
    let dispatcher = WebhookDispatcher::new(config.request_timeout(), config.ping_timeout());
    let checker = ScriptChecker::new(&config, storage, dispatcher);
    let mut out = std::io::stdout();

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            Shell::new(checker).run(input, &mut out).await?;
        }
        Command::Submit {
            email,
            title,
            file,
            environment,
            method,
            debug,
        } => {
            let mut session = Session::new();
            session.debug_enabled = debug;
            checker.login(&mut session, &email).await.unwrap_or_else(|e| exit_with(&e));

            let form = UploadForm {
                title,
                file: Some(file),
                environment,
                encoding: method,
            };
            let outcome = checker
                .submit(&session, &form)
                .await
                .unwrap_or_else(|e| exit_with(&e));

            for line in render::submission_lines(&outcome, &form.title, debug) {
                writeln!(out, "{}", line)?;
            }
            if !outcome.is_success() {
                std::process::exit(2);
            }
        }
        Command::History { email } => {
            let mut session = Session::new();
            checker.login(&mut session, &email).await.unwrap_or_else(|e| exit_with(&e));
            let emails = checker
                .login_history(&session)
                .await
                .unwrap_or_else(|e| exit_with(&e));
            for line in render::history_lines(&emails) {
                writeln!(out, "{}", line)?;
            }
        }
        Command::Ping { environment } => {
            let report = checker.ping(environment).await.unwrap_or_else(|e| exit_with(&e));
            for line in render::ping_lines(&report) {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}

fn exit_with(e: &CheckerError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
