use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::error::ConnectError;
use crate::wifi::types::{ConnectionEvent, FailureReason};

/// Wait for the association outcome of `ssid`
///
/// Events for other networks are skipped. The receiver must have been
/// subscribed before the connect request was issued.
pub async fn await_association(
    mut events: UnboundedReceiver<ConnectionEvent>,
    ssid: &str,
    timeout: Duration,
) -> Result<(), ConnectError> {
    let outcome = tokio::time::timeout(timeout, async {
        while let Some(event) = events.recv().await {
            match event {
                ConnectionEvent::Connected(connected) if connected == ssid => return Ok(()),
                ConnectionEvent::Failed {
                    ssid: failed,
                    reason,
                } if failed == ssid => {
                    warn!(%ssid, %reason, "association failed");
                    return Err(failure_to_error(reason));
                }
                other => debug!(?other, "ignoring connection event"),
            }
        }
        // The native side dropped its sender without an outcome
        Err(ConnectError::CouldNotConnect)
    })
    .await;

    match outcome {
        Ok(result) => result,
        Err(_) => {
            warn!(%ssid, ?timeout, "no association outcome before timeout");
            Err(ConnectError::TimeoutOccurred)
        }
    }
}

fn failure_to_error(reason: FailureReason) -> ConnectError {
    match reason {
        FailureReason::Authentication => ConnectError::AuthenticationErrorOccurred,
        FailureReason::AssociationRejected
        | FailureReason::IpProvisioning
        | FailureReason::Unknown => ConnectError::CouldNotConnect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn skips_events_for_other_networks() {
        let (tx, rx) = unbounded_channel();
        tx.send(ConnectionEvent::Disconnected("Old".to_string())).unwrap();
        tx.send(ConnectionEvent::Failed {
            ssid: "Other".to_string(),
            reason: FailureReason::Authentication,
        })
        .unwrap();
        tx.send(ConnectionEvent::Connected("Home".to_string())).unwrap();

        assert_eq!(await_association(rx, "Home", TIMEOUT).await, Ok(()));
    }

    #[tokio::test]
    async fn authentication_failure_is_reported() {
        let (tx, rx) = unbounded_channel();
        tx.send(ConnectionEvent::Failed {
            ssid: "Home".to_string(),
            reason: FailureReason::Authentication,
        })
        .unwrap();

        assert_eq!(
            await_association(rx, "Home", TIMEOUT).await,
            Err(ConnectError::AuthenticationErrorOccurred)
        );
    }

    #[tokio::test]
    async fn closed_channel_is_a_connect_failure() {
        let (tx, rx) = unbounded_channel::<ConnectionEvent>();
        drop(tx);

        assert_eq!(
            await_association(rx, "Home", TIMEOUT).await,
            Err(ConnectError::CouldNotConnect)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out() {
        let (_tx, rx) = unbounded_channel::<ConnectionEvent>();

        assert_eq!(
            await_association(rx, "Home", TIMEOUT).await,
            Err(ConnectError::TimeoutOccurred)
        );
    }
}
