//! Event Countdown - a countdown timer with an audible warning
//!
//! This is the main entry point: it embeds the countdown controller, prints
//! the display to the terminal and serves the local control surface.

use tokio::net::TcpListener;
use tracing::info;

use event_countdown::{
    api::create_router,
    config::Config,
    services::{create_alert_channel, AlertDispatcher, AlertService, DeviceTone, FileCue},
    state::{format_hms, AppState},
    tasks::display_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level; stdout belongs to the display
    tracing_subscriber::fmt()
        .with_env_filter(format!("event_countdown={},tower_http=info", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    // Invalid durations fail here, before anything runs
    let timer_config = config.timer_config()?;

    info!("Starting event-countdown v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: duration={}, warning={}, auto_start={}, rearm_on_reset={}",
        format_hms(timer_config.total_duration_seconds()),
        format_hms(timer_config.warning_threshold_seconds()),
        timer_config.auto_start(),
        timer_config.rearm_on_reset(),
    );

    // Start the alert service background task
    let (alert_tx, alert_rx) = create_alert_channel();
    let cue = FileCue::preload(&config.cue);
    if cue.is_loaded() {
        info!("Warning cue: {}", cue.path().display());
    } else {
        info!("Warning cue {} missing, the fallback tone will sound instead", cue.path().display());
    }
    let dispatcher = AlertDispatcher::new(Box::new(cue), Box::new(DeviceTone));
    tokio::spawn(AlertService::new(alert_rx, dispatcher).run());

    // Create the controller and start counting if configured to
    let state = AppState::launch(timer_config, Some(alert_tx))?;

    // Start the terminal display background task
    tokio::spawn(display_task(state.subscribe()));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control surface on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start  - Start or resume the countdown");
    info!("  POST /pause  - Pause the countdown");
    info!("  POST /toggle - Pause when running, start otherwise");
    info!("  POST /reset  - Restore the full duration");
    info!("  GET  /status - Current time, phase and controls");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutdown complete");
    Ok(())
}
