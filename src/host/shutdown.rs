use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels the session on Ctrl-C. Returns early if the session ended on its own.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => {
                info!("Received Ctrl-C, stopping reminders");
                cancelation.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C {e:?}"),
        },
        _ = cancelation.cancelled() => {},
    };
}
