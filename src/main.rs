use appointment_booking::app_state::AppState;
use appointment_booking::config::AppConfig;
use appointment_booking::models::appointment::FormSnapshot;
use appointment_booking::models::submission::UiEffect;
use appointment_booking::services::feedback;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    metrics::describe_counter!(
        "appointment_submissions_total",
        "Submission attempts by outcome"
    );
    metrics::describe_histogram!(
        "appointment_transport_seconds",
        "Time spent delivering an appointment to its transport"
    );

    let state = AppState::from_config(&config).expect("Failed to initialize booking services");

    match state.theme.get() {
        Ok(theme) => tracing::info!(theme = %theme, "Applying theme"),
        Err(e) => tracing::warn!(error = %e, "Could not read theme preference"),
    }

    // The form snapshot arrives as a JSON object on stdin.
    let mut input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
        tracing::error!(error = %e, "Failed to read form from stdin");
        std::process::exit(1);
    }
    let snapshot = match FormSnapshot::from_json(&input) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "Form must be a JSON object of string values");
            std::process::exit(1);
        }
    };

    // Effects are applied from this task only, so they print in order.
    let results = state.coordinator.validate_all(&snapshot);
    feedback::before_submit(&results).iter().for_each(apply);

    let outcome = state.coordinator.submit(&snapshot).await;
    tracing::info!(state = ?state.coordinator.state(), "Submission finished");
    feedback::outcome(&outcome).iter().for_each(apply);

    state.coordinator.reset();
}

/// Terminal rendering of a presentation change.
fn apply(effect: &UiEffect) {
    match serde_json::to_string(effect) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to render UI effect"),
    }
}
