//! Panels of the contact manager window. Each one reads the view state and
//! reports user input as [`UiAction`]s; none of them mutate state directly
//! except the form, which edits the draft in place.

use client_core::{pagination::visible_pages, ContactViewState, FormMode};
use eframe::egui;
use shared::domain::ContactField;

use crate::controller::events::UiAction;

const PAGE_BUTTONS: u32 = 7;

pub fn status_banner(ui: &mut egui::Ui, message: &str, actions: &mut Vec<UiAction>) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(111, 53, 53))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Dismiss").clicked() {
                        actions.push(UiAction::DismissError);
                    }
                });
            });
        });
}

fn header_label(state: &ContactViewState, field: ContactField) -> String {
    let sort = state.sort();
    if sort.field == field {
        format!("{} {}", field.label(), sort.direction.arrow())
    } else {
        field.label().to_string()
    }
}

pub fn contact_table(ui: &mut egui::Ui, state: &ContactViewState, actions: &mut Vec<UiAction>) {
    egui::ScrollArea::both()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("contacts_table")
                .num_columns(ContactField::ALL.len() + 1)
                .striped(true)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    for field in ContactField::ALL {
                        let header = egui::Button::new(
                            egui::RichText::new(header_label(state, field)).strong(),
                        )
                        .frame(false);
                        if ui
                            .add(header)
                            .on_hover_text(format!("Sort by {}", field.label()))
                            .clicked()
                        {
                            actions.push(UiAction::SortBy(field));
                        }
                    }
                    ui.label(egui::RichText::new("Actions").strong());
                    ui.end_row();

                    for contact in state.rows() {
                        for field in ContactField::ALL {
                            ui.label(contact.field_value(field));
                        }
                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!state.is_submitting(), egui::Button::new("Edit"))
                                .clicked()
                            {
                                actions.push(UiAction::Edit(contact.id.clone()));
                            }
                            let delete = egui::Button::new(
                                egui::RichText::new("Delete").color(egui::Color32::from_rgb(220, 90, 90)),
                            );
                            if ui.add_enabled(!state.is_deleting(), delete).clicked() {
                                actions.push(UiAction::RequestDelete(contact.id.clone()));
                            }
                        });
                        ui.end_row();
                    }
                });

            if state.rows().is_empty() {
                ui.add_space(12.0);
                if state.is_loading() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading contacts...");
                    });
                } else {
                    ui.weak("No contacts found.");
                }
            }
        });
}

pub fn pagination_bar(ui: &mut egui::Ui, state: &ContactViewState, actions: &mut Vec<UiAction>) {
    let page = state.page();
    let total_pages = state.total_pages().max(1);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(page > 1, egui::Button::new("Previous"))
            .clicked()
        {
            actions.push(UiAction::GoToPage(page - 1));
        }
        for candidate in visible_pages(page, total_pages, PAGE_BUTTONS) {
            let button = egui::Button::new(candidate.to_string()).selected(candidate == page);
            if ui.add(button).clicked() {
                actions.push(UiAction::GoToPage(candidate));
            }
        }
        if ui
            .add_enabled(page < total_pages, egui::Button::new("Next"))
            .clicked()
        {
            actions.push(UiAction::GoToPage(page + 1));
        }
        if state.is_loading() {
            ui.spinner();
        }
    });
}

pub fn contact_form_window(
    ctx: &egui::Context,
    state: &mut ContactViewState,
    form_error: Option<&str>,
    actions: &mut Vec<UiAction>,
) {
    let Some(mode) = state.modal().mode() else {
        return;
    };
    let (title, submit_label) = match mode {
        FormMode::Edit => ("Edit Contact", "Update"),
        FormMode::Create => ("Add New Contact", "Save"),
    };

    let mut open = true;
    egui::Window::new(title)
        .id(egui::Id::new("contact_form"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("contact_form_fields")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for field in ContactField::ALL {
                        let label = if field.is_required() {
                            format!("{} *", field.label())
                        } else {
                            field.label().to_string()
                        };
                        ui.label(label);
                        match state.draft_field_mut(field) {
                            Some(value) => {
                                ui.add(
                                    egui::TextEdit::singleline(value)
                                        .id_salt(field.key())
                                        .hint_text(field.label())
                                        .desired_width(260.0),
                                );
                            }
                            None => {
                                let mut locked = state
                                    .modal()
                                    .draft()
                                    .map(|draft| draft.field(field).to_string())
                                    .unwrap_or_default();
                                ui.add_enabled(
                                    false,
                                    egui::TextEdit::singleline(&mut locked)
                                        .id_salt(field.key())
                                        .desired_width(260.0),
                                );
                            }
                        }
                        ui.end_row();
                    }
                });

            if let Some(message) = form_error {
                ui.add_space(4.0);
                ui.colored_label(egui::Color32::from_rgb(220, 90, 90), message);
            }

            ui.add_space(8.0);
            let submitting = state.is_submitting();
            ui.horizontal(|ui| {
                let label = if submitting { "Saving..." } else { submit_label };
                if ui
                    .add_enabled(!submitting, egui::Button::new(label))
                    .clicked()
                {
                    actions.push(UiAction::SubmitForm);
                }
                if ui
                    .add_enabled(!submitting, egui::Button::new("Cancel"))
                    .clicked()
                {
                    actions.push(UiAction::CloseForm);
                }
            });
        });

    if !open && !state.is_submitting() {
        actions.push(UiAction::CloseForm);
    }
}

pub fn delete_confirmation_window(
    ctx: &egui::Context,
    state: &ContactViewState,
    actions: &mut Vec<UiAction>,
) {
    let Some(contact) = state.pending_delete() else {
        return;
    };

    egui::Window::new("Delete Contact")
        .id(egui::Id::new("delete_confirmation"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure you want to delete this contact?");
            ui.strong(contact.display_name());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if state.is_deleting() { "Deleting..." } else { "Delete" };
                if ui
                    .add_enabled(!state.is_deleting(), egui::Button::new(label))
                    .clicked()
                {
                    actions.push(UiAction::ConfirmDelete);
                }
                if ui
                    .add_enabled(!state.is_deleting(), egui::Button::new("Cancel"))
                    .clicked()
                {
                    actions.push(UiAction::CancelDelete);
                }
            });
        });
}
