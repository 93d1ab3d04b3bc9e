use std::time::Duration;

use client_core::{ContactViewState, ViewCommand};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{describe_failure, UiAction, UiErrorCategory, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::{apply_action, command_not_queued, reduce_event},
};
use crate::ui::panels;

pub struct ContactsApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: ContactViewState,
    status: String,
    api_url: String,
    form_error: Option<String>,
}

impl ContactsApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>, api_url: String) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: ContactViewState::new(),
            status: "Loading contacts...".to_string(),
            api_url,
            form_error: None,
        };
        app.run_action(UiAction::Refresh);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let reduction = reduce_event(&mut self.state, event);
            if let Some(status) = reduction.status {
                self.status = status;
            }
            if let Some(command) = reduction.command {
                self.dispatch(command);
            }
        }
    }

    fn run_action(&mut self, action: UiAction) {
        if matches!(
            action,
            UiAction::AddNew | UiAction::Edit(_) | UiAction::CloseForm
        ) {
            self.form_error = None;
        }

        match apply_action(&mut self.state, action) {
            Ok(Some(command)) => {
                if matches!(command, ViewCommand::Save(_)) {
                    self.form_error = None;
                }
                self.dispatch(command);
            }
            Ok(None) => {}
            Err(err)
                if err.category() == UiErrorCategory::Validation
                    && err.context() == UiErrorContext::SaveContact =>
            {
                self.form_error = Some(err.message().to_string());
            }
            Err(err) => {
                tracing::warn!(context = ?err.context(), "ui action rejected: {}", err.message());
                self.state.report_error(describe_failure(&err));
            }
        }
    }

    fn dispatch(&mut self, command: ViewCommand) {
        let pending = command.clone();
        if !dispatch_backend_command(&self.cmd_tx, command.into(), &mut self.status) {
            command_not_queued(&mut self.state, &pending, &self.status);
        }
    }

    fn show_header(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Contact Management System");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(
                            !self.state.is_submitting(),
                            egui::Button::new("Add New Contact"),
                        )
                        .clicked()
                    {
                        actions.push(UiAction::AddNew);
                    }
                    if ui
                        .add_enabled(!self.state.is_loading(), egui::Button::new("Refresh"))
                        .clicked()
                    {
                        actions.push(UiAction::Refresh);
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&self.api_url);
                });
            });
        });
    }
}

impl eframe::App for ContactsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        self.show_header(ctx, &mut actions);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = self.state.last_error() {
                panels::status_banner(ui, message, &mut actions);
                ui.add_space(8.0);
            }
            panels::contact_table(ui, &self.state, &mut actions);
            ui.add_space(8.0);
            panels::pagination_bar(ui, &self.state, &mut actions);
        });

        panels::contact_form_window(
            ctx,
            &mut self.state,
            self.form_error.as_deref(),
            &mut actions,
        );
        panels::delete_confirmation_window(ctx, &self.state, &mut actions);

        for action in actions {
            self.run_action(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
