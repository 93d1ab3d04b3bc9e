//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues a command for the backend worker. On failure the reason is written
/// to `status` and `false` is returned.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui command queue is full");
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::PageRequest;
    use crossbeam_channel::bounded;

    fn fetch(seq: u64) -> BackendCommand {
        BackendCommand::FetchPage {
            request: PageRequest { seq, page: 1 },
        }
    }

    #[test]
    fn queues_command_when_worker_is_listening() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, fetch(1), &mut status));
        assert_eq!(rx.try_recv().ok(), Some(fetch(1)));
        assert!(status.is_empty());
    }

    #[test]
    fn full_queue_reports_retry_status() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, fetch(1), &mut status));
        assert!(!dispatch_backend_command(&tx, fetch(2), &mut status));
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn disconnected_worker_reports_status() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(&tx, fetch(1), &mut status));
        assert!(status.contains("disconnected"));
    }
}
