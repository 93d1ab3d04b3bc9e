//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use anyhow::Context;
use client_core::{
    ClientEvent, ClientSettings, ContactsClient, ContactsHandle, HttpContactsApi, SaveRequest,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

fn build_client(settings: &ClientSettings) -> anyhow::Result<Arc<ContactsClient<HttpContactsApi>>> {
    let api = HttpContactsApi::new(settings)
        .with_context(|| format!("failed to configure contacts api at '{}'", settings.api_base_url))?;
    Ok(ContactsClient::new(api))
}

/// Relays client events to the UI until the client is dropped. Events lost to
/// a lagging receiver are skipped; the next fetch result supersedes them.
async fn forward_client_events(
    mut events: broadcast::Receiver<ClientEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui event forwarder lagged behind client events");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        let evt = match event {
            ClientEvent::PageLoaded { seq, page } => UiEvent::PageLoaded { seq, page },
            ClientEvent::PageFetchFailed { seq, page, message } => {
                tracing::debug!(seq, page, "forwarding page fetch failure");
                UiEvent::PageFetchFailed {
                    seq,
                    error: UiError::from_message(UiErrorContext::LoadPage, message),
                }
            }
        };
        let _ = ui_tx.try_send(evt);
    }
}

/// Starts the backend worker thread. It owns a tokio runtime and serves
/// commands until the UI drops its sender.
pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match build_client(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("{err:#}"),
                    )));
                    tracing::error!("backend worker startup failure: {err:#}");
                    return;
                }
            };

            let event_task = tokio::spawn(forward_client_events(
                client.subscribe_events(),
                ui_tx.clone(),
            ));

            tracing::info!(api = %settings.api_base_url, "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.api_base_url
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchPage { request } => {
                        tracing::info!(seq = request.seq, page = request.page, "backend: fetch page");
                        client.fetch_page(request).await;
                    }
                    BackendCommand::SaveContact { request } => {
                        let updated = request.is_update();
                        match &request {
                            SaveRequest::Create(_) => tracing::info!("backend: create contact"),
                            SaveRequest::Update { id, .. } => {
                                tracing::info!(contact_id = %id, "backend: update contact")
                            }
                        }
                        let evt = match client.save_contact(request).await {
                            Ok(contact) => UiEvent::ContactSaved { contact, updated },
                            Err(err) => UiEvent::SaveFailed(UiError::from_api_error(
                                UiErrorContext::SaveContact,
                                &err,
                            )),
                        };
                        let _ = ui_tx.try_send(evt);
                    }
                    BackendCommand::DeleteContact { id } => {
                        tracing::info!(contact_id = %id, "backend: delete contact");
                        let evt = match client.delete_contact(&id).await {
                            Ok(()) => UiEvent::ContactDeleted { id },
                            Err(err) => UiEvent::DeleteFailed(UiError::from_api_error(
                                UiErrorContext::DeleteContact,
                                &err,
                            )),
                        };
                        let _ = ui_tx.try_send(evt);
                    }
                }
            }

            tracing::info!("ui command channel closed; stopping backend worker");
            event_task.abort();
        });
    });
}
