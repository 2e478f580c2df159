use std::process::ExitCode;

use course_engine::app;
use course_engine::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    app::init_tracing(&config.server);

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match app::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Course engine failed");
            ExitCode::FAILURE
        }
    }
}
