use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::BufReader;

use barber_booking::cli::Cli;
use barber_booking::config::Config;
use barber_booking::error::AppError;
use barber_booking::logging::init_logging;
use barber_booking::metrics::AppMetrics;
use barber_booking::notify::{LogNotifier, Notifier, ReminderScheduler, WebhookNotifier};
use barber_booking::session::Session;
use barber_booking::store::AppointmentStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()
        .and_then(|config| config.with_cli(&cli))
        .map_err(AppError::Config)?;

    tracing::info!("Session starting with config: {:?}", config);

    let notifier: Arc<dyn Notifier + Send + Sync> = match &config.reminder_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };
    let reminders = ReminderScheduler::new(config.notification_permission, notifier);

    let store = AppointmentStore::seeded(Local::now().naive_local(), reminders);
    tracing::info!(shops = store.list_shops().len(), "Store seeded");

    let metrics = AppMetrics::new()?;
    let session = Session::new(store, metrics, config.default_role, std::io::stdout());
    session.run(BufReader::new(tokio::io::stdin())).await
}
