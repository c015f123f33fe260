use eframe::egui;

use crate::app::{InvoiceApp, Tab};
use crate::compute;
use crate::error::AppError;
use crate::format;
use crate::i18n::{Lang, Strings};
use crate::model::{Client, ClientSnapshot, InvoiceStatus, LineItem, SignatureMode};
use crate::preview;
use crate::template::{self, TemplateId};
use crate::types::{
    parse_hex_color, Attachment, PaperFormat, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES,
};

impl eframe::App for InvoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let t = self.strings();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Facturier");
                ui.separator();
                ui.selectable_value(&mut self.selected_tab, Tab::Invoices, t.invoices);
                ui.selectable_value(&mut self.selected_tab, Tab::Clients, t.clients);
                ui.selectable_value(&mut self.selected_tab, Tab::Settings, t.settings);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = self.error.clone() {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, &error);
                    if ui.small_button("✖").clicked() {
                        self.error = None;
                    }
                });
                ui.separator();
            }
            match self.selected_tab {
                Tab::Invoices => show_invoices_tab(self, ui),
                Tab::Clients => show_clients_tab(self, ui),
                Tab::Settings => show_settings_tab(self, ui),
            }
        });

        // Modal dialogs
        if self.show_invoice_form {
            show_invoice_form_window(self, ctx);
        }

        if self.show_client_form {
            show_client_form_window(self, ctx);
        }

        if self.show_preview {
            show_preview_window(self, ctx);
        }
    }
}

fn show_invoices_tab(app: &mut InvoiceApp, ui: &mut egui::Ui) {
    let t = app.strings();
    let lang = app.prefs.lang;
    ui.heading(t.invoices);
    ui.separator();

    if ui.button(format!("➕ {}", t.new_invoice)).clicked() {
        app.begin_new_invoice();
    }

    ui.add_space(10.0);

    let mut invoice_to_delete: Option<i64> = None;
    let mut invoice_to_edit = None;
    let mut invoice_to_preview = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for invoice in app.invoices.clone().iter() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(&invoice.number);
                            ui.label("-");
                            ui.label(&invoice.client.name);
                            status_chip(ui, invoice.status, lang);
                        });
                        ui.label(format!(
                            "{}: {}",
                            t.date,
                            format::short_date(invoice.date, lang)
                        ));
                        if let Some(due) = invoice.due_date {
                            ui.label(format!(
                                "{}: {}",
                                t.due_date,
                                format::short_date(due, lang)
                            ));
                        }
                        ui.label(format!(
                            "{}: {}",
                            t.total,
                            format::amount(invoice.total, lang)
                        ));
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(format!("🗑 {}", t.delete)).clicked() {
                            invoice_to_delete = Some(invoice.id);
                        }
                        if ui.button(format!("✏ {}", t.edit)).clicked() {
                            invoice_to_edit = Some(invoice.clone());
                        }
                        if ui.button(format!("👁 {}", t.preview)).clicked() {
                            invoice_to_preview = Some(invoice.clone());
                        }
                    });
                });
            });
            ui.add_space(5.0);
        }
    });

    if let Some(id) = invoice_to_delete {
        app.delete_invoice(id);
    }
    if let Some(invoice) = invoice_to_edit {
        app.open_invoice_form(invoice);
    }
    if let Some(invoice) = invoice_to_preview {
        app.preview_template = app.prefs.template;
        app.preview_invoice = Some(invoice);
        app.show_preview = true;
    }
}

fn show_clients_tab(app: &mut InvoiceApp, ui: &mut egui::Ui) {
    let t = app.strings();
    ui.heading(t.clients);
    ui.separator();

    if ui.button(format!("➕ {}", t.add_client)).clicked() {
        app.editing_client = Some(Client::default());
        app.show_client_form = true;
    }

    ui.add_space(10.0);

    let mut client_to_delete: Option<i64> = None;
    let mut client_to_edit = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        for client in app.clients.clone().iter() {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(&client.name);
                        if !client.city.is_empty() {
                            ui.label(&client.city);
                        }
                        if !client.email.is_empty() {
                            ui.label(&client.email);
                        }
                        if !client.phone.is_empty() {
                            ui.label(format::phone(&client.phone));
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(format!("🗑 {}", t.delete)).clicked() {
                            client_to_delete = Some(client.id);
                        }
                        if ui.button(format!("✏ {}", t.edit)).clicked() {
                            client_to_edit = Some(client.clone());
                        }
                    });
                });
            });
            ui.add_space(5.0);
        }
    });

    if let Some(id) = client_to_delete {
        app.delete_client(id);
    }
    if let Some(client) = client_to_edit {
        app.editing_client = Some(client);
        app.show_client_form = true;
    }
}

fn show_settings_tab(app: &mut InvoiceApp, ui: &mut egui::Ui) {
    let t = app.strings();
    ui.heading(t.settings);
    ui.separator();
    ui.add_space(10.0);

    let mut settings_changed = false;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.group(|ui| {
            ui.strong(t.company_section);
            ui.separator();

            let fields: [(&str, &mut String); 10] = [
                (t.name, &mut app.company.name),
                (t.address, &mut app.company.address),
                (t.city, &mut app.company.city),
                (t.phone, &mut app.company.phone),
                (t.email, &mut app.company.email),
                (t.tax_id, &mut app.company.ifu),
                (t.business_reg, &mut app.company.rccm),
                ("IBAN", &mut app.company.iban),
                ("BIC", &mut app.company.bic),
                (t.signer_title, &mut app.company.signature_title),
            ];
            for (label, value) in fields {
                ui.horizontal(|ui| {
                    ui.label(format!("{label}:"));
                    if ui.text_edit_singleline(value).changed() {
                        settings_changed = true;
                    }
                });
            }

            image_slot_row(
                ui,
                t,
                t.logo,
                &mut app.company.logo,
                &mut app.error,
                &mut settings_changed,
            );
            image_slot_row(
                ui,
                t,
                t.header_image,
                &mut app.company.header_image,
                &mut app.error,
                &mut settings_changed,
            );
            image_slot_row(
                ui,
                t,
                t.footer_image,
                &mut app.company.footer_image,
                &mut app.error,
                &mut settings_changed,
            );
        });

        ui.add_space(10.0);

        ui.group(|ui| {
            ui.strong(t.preferences);
            ui.separator();

            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.language));
                egui::ComboBox::from_id_salt("lang_select")
                    .selected_text(app.prefs.lang.label())
                    .show_ui(ui, |ui| {
                        for lang in Lang::ALL {
                            if ui
                                .selectable_value(&mut app.prefs.lang, lang, lang.label())
                                .clicked()
                            {
                                settings_changed = true;
                            }
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.accent_color));
                let default_accent = app.prefs.template.style().accent;
                let mut color = app
                    .prefs
                    .accent
                    .as_deref()
                    .and_then(parse_hex_color)
                    .or_else(|| parse_hex_color(default_accent))
                    .unwrap_or(egui::Color32::GRAY);
                if ui.color_edit_button_srgba(&mut color).changed() {
                    app.prefs.accent = Some(crate::types::color_to_hex(color));
                    settings_changed = true;
                }
                if app.prefs.accent.is_some() && ui.button(t.reset).clicked() {
                    app.prefs.accent = None;
                    settings_changed = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.paper_format));
                egui::ComboBox::from_id_salt("paper_select")
                    .selected_text(app.prefs.paper.as_str())
                    .show_ui(ui, |ui| {
                        for paper in PaperFormat::ALL {
                            if ui
                                .selectable_value(&mut app.prefs.paper, paper, paper.as_str())
                                .clicked()
                            {
                                settings_changed = true;
                            }
                        }
                    });
            });

            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.template));
                egui::ComboBox::from_id_salt("template_select")
                    .selected_text(app.prefs.template.label())
                    .show_ui(ui, |ui| {
                        for id in TemplateId::ALL {
                            if ui
                                .selectable_value(&mut app.prefs.template, id, id.label())
                                .clicked()
                            {
                                settings_changed = true;
                            }
                        }
                    });
            });
        });
    });

    if settings_changed {
        app.save_settings();
    }
}

fn show_invoice_form_window(app: &mut InvoiceApp, ctx: &egui::Context) {
    let Some(mut invoice) = app.editing_invoice.take() else {
        app.show_invoice_form = false;
        return;
    };
    let t = app.strings();
    let lang = app.prefs.lang;
    let clients = app.clients.clone();

    let mut open = true;
    let mut save_invoice = false;
    let mut cancel_invoice = false;
    let mut preview_requested = false;

    egui::Window::new(t.new_invoice)
        .open(&mut open)
        .resizable(true)
        .default_width(640.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(error) = &app.error {
                    ui.colored_label(egui::Color32::RED, error);
                    ui.separator();
                }

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.invoice_number));
                    ui.text_edit_singleline(&mut invoice.number);
                });

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.date));
                    let mut date_str = invoice.date.format("%Y-%m-%d").to_string();
                    if ui.text_edit_singleline(&mut date_str).changed() {
                        if let Ok(date) = chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") {
                            invoice.date = date;
                        }
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.due_date));
                    if ui.text_edit_singleline(&mut app.due_date_input).changed() {
                        let text = app.due_date_input.trim();
                        if text.is_empty() {
                            invoice.due_date = None;
                        } else if let Ok(date) =
                            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        {
                            invoice.due_date = Some(date);
                        }
                    }
                    if ui.button("+7d").clicked() {
                        let base = invoice.due_date.unwrap_or(invoice.date);
                        let due = base + chrono::Duration::days(7);
                        invoice.due_date = Some(due);
                        app.due_date_input = due.format("%Y-%m-%d").to_string();
                    }
                    if ui.button("+30d").clicked() {
                        let base = invoice.due_date.unwrap_or(invoice.date);
                        let due = base + chrono::Duration::days(30);
                        invoice.due_date = Some(due);
                        app.due_date_input = due.format("%Y-%m-%d").to_string();
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.status));
                    egui::ComboBox::from_id_salt("status_select")
                        .selected_text(invoice.status.label(lang))
                        .show_ui(ui, |ui| {
                            for status in InvoiceStatus::ALL {
                                ui.selectable_value(
                                    &mut invoice.status,
                                    status,
                                    status.label(lang),
                                );
                            }
                        });
                });

                ui.separator();
                ui.strong(t.client);

                ui.horizontal(|ui| {
                    let selected = if invoice.client.name.is_empty() {
                        t.select_client.to_string()
                    } else {
                        invoice.client.name.clone()
                    };
                    egui::ComboBox::from_id_salt("client_select")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for client in &clients {
                                if ui
                                    .selectable_label(
                                        invoice.client.client_id == Some(client.id),
                                        &client.name,
                                    )
                                    .clicked()
                                {
                                    invoice.client = ClientSnapshot::of(client);
                                }
                            }
                        });
                });

                // The embedded copy stays editable; changes here never write
                // back to the stored client.
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.name));
                    ui.text_edit_singleline(&mut invoice.client.name);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.email));
                    ui.text_edit_singleline(&mut invoice.client.email);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.phone));
                    ui.text_edit_singleline(&mut invoice.client.phone);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.address));
                    ui.text_edit_singleline(&mut invoice.client.address);
                });
                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.city));
                    ui.text_edit_singleline(&mut invoice.client.city);
                });

                ui.separator();
                ui.strong(t.items);

                let mut item_to_remove: Option<usize> = None;
                let items_count = invoice.items.len();

                for (idx, item) in invoice.items.iter_mut().enumerate() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.label(format!("{}:", t.description));
                            ui.text_edit_singleline(&mut item.description);
                        });

                        ui.horizontal(|ui| {
                            ui.label(format!("{}:", t.qty));
                            ui.add(
                                egui::DragValue::new(&mut item.quantity)
                                    .speed(0.1)
                                    .range(0.0..=f64::MAX),
                            );

                            ui.label(format!("{}:", t.unit_price));
                            ui.add(
                                egui::DragValue::new(&mut item.unit_price)
                                    .speed(1.0)
                                    .range(0.0..=f64::MAX),
                            );

                            ui.label(format!(
                                "{}: {}",
                                t.total,
                                format::amount(item.line_total(), lang)
                            ));

                            // The last remaining row cannot be removed.
                            if items_count > 1 && ui.button("🗑").clicked() {
                                item_to_remove = Some(idx);
                            }
                        });
                    });
                }

                if let Some(idx) = item_to_remove {
                    invoice.items.remove(idx);
                }

                if ui.button(format!("➕ {}", t.add_item)).clicked() {
                    invoice.items.push(LineItem::default());
                }

                ui.separator();

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.tax_rate));
                    if ui.text_edit_singleline(&mut app.tax_input).changed() {
                        invoice.tax_rate = compute::coerce_amount(&app.tax_input).clamp(0.0, 100.0);
                    }

                    ui.label(format!("{} ({}):", t.discount, format::CURRENCY));
                    if ui.text_edit_singleline(&mut app.discount_input).changed() {
                        invoice.discount = compute::coerce_amount(&app.discount_input);
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.notes));
                    ui.text_edit_multiline(&mut invoice.notes);
                });

                ui.separator();
                ui.strong(t.signatures);

                ui.horizontal(|ui| {
                    ui.label(format!("{}:", t.signature_mode));
                    egui::ComboBox::from_id_salt("signature_mode")
                        .selected_text(invoice.signature.mode.label(lang))
                        .show_ui(ui, |ui| {
                            for mode in SignatureMode::ALL {
                                ui.selectable_value(
                                    &mut invoice.signature.mode,
                                    mode,
                                    mode.label(lang),
                                );
                            }
                        });
                });

                if invoice.signature.mode != SignatureMode::None {
                    ui.checkbox(
                        &mut invoice.signature.show_company_signature,
                        t.show_company_signature,
                    );
                    if invoice.signature.show_company_signature {
                        ui.horizontal(|ui| {
                            ui.label(format!("{}:", t.signer_title));
                            ui.text_edit_singleline(&mut invoice.signature.company_signer_title);
                        });
                    }
                    ui.checkbox(
                        &mut invoice.signature.show_client_signature,
                        t.show_client_signature,
                    );
                    if invoice.signature.show_client_signature {
                        ui.horizontal(|ui| {
                            ui.label(format!("{}:", t.signer_title));
                            ui.text_edit_singleline(&mut invoice.signature.client_signer_title);
                        });
                    }
                }

                ui.separator();
                ui.strong(format!(
                    "{} ({}/{})",
                    t.attachments,
                    invoice.images.len(),
                    MAX_ATTACHMENTS
                ));

                let mut image_to_remove: Option<usize> = None;
                for (idx, image) in invoice.images.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("{} ({} KB)", image.name, image.size / 1024));
                        if ui.button(format!("🗑 {}", t.remove)).clicked() {
                            image_to_remove = Some(idx);
                        }
                    });
                }
                if let Some(idx) = image_to_remove {
                    invoice.images.remove(idx);
                }

                if invoice.images.len() < MAX_ATTACHMENTS {
                    if ui.button(format!("➕ {}", t.add_image)).clicked() {
                        match pick_image(t) {
                            Ok(Some(attachment)) => invoice.images.push(attachment),
                            Ok(None) => {}
                            Err(e) => app.error = Some(e.to_string()),
                        }
                    }
                } else {
                    ui.label(t.err_too_many_images);
                }

                ui.separator();

                // Live totals, recomputed on every change.
                let (subtotal, tax, total) = invoice.totals();
                ui.label(format!("{}: {}", t.subtotal, format::amount(subtotal, lang)));
                ui.label(format!("{}: {}", t.tax, format::amount(tax, lang)));
                if invoice.discount != 0.0 {
                    ui.label(format!(
                        "{}: {}",
                        t.discount,
                        format::amount(-invoice.discount, lang)
                    ));
                }
                ui.strong(format!("{}: {}", t.grand_total, format::amount(total, lang)));

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button(format!("💾 {}", t.save)).clicked() {
                        save_invoice = true;
                    }
                    if ui.button(format!("👁 {}", t.preview)).clicked() {
                        preview_requested = true;
                    }
                    if ui.button(format!("❌ {}", t.cancel)).clicked() {
                        cancel_invoice = true;
                    }
                });
            });
        });

    if save_invoice {
        // Required-field validation happens here, before the computation
        // engine or the store ever see the record.
        if invoice.client.name.trim().is_empty() {
            app.error = Some(t.err_client_required.to_string());
            app.editing_invoice = Some(invoice);
        } else {
            app.error = None;
            app.editing_invoice = Some(invoice);
            app.save_editing_invoice();
        }
    } else if cancel_invoice || !open {
        app.show_invoice_form = false;
        app.error = None;
    } else {
        if preview_requested {
            app.preview_template = app.prefs.template;
            app.preview_invoice = Some(invoice.clone());
            app.show_preview = true;
        }
        app.editing_invoice = Some(invoice);
    }
}

fn show_client_form_window(app: &mut InvoiceApp, ctx: &egui::Context) {
    let Some(mut client) = app.editing_client.take() else {
        app.show_client_form = false;
        return;
    };
    let t = app.strings();

    let mut open = true;
    let mut save_client = false;
    let mut cancel_client = false;

    egui::Window::new(t.client)
        .open(&mut open)
        .resizable(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.name));
                ui.text_edit_singleline(&mut client.name);
            });
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.email));
                ui.text_edit_singleline(&mut client.email);
            });
            if !client.email.is_empty() && !format::is_valid_email(&client.email) {
                ui.colored_label(egui::Color32::from_rgb(0xf5, 0x9e, 0x0b), "⚠ Email");
            }
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.phone));
                ui.text_edit_singleline(&mut client.phone);
            });
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.address));
                ui.text_edit_singleline(&mut client.address);
            });
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.city));
                ui.text_edit_singleline(&mut client.city);
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button(format!("💾 {}", t.save)).clicked() {
                    save_client = true;
                }
                if ui.button(format!("❌ {}", t.cancel)).clicked() {
                    cancel_client = true;
                }
            });
        });

    if save_client {
        if client.name.trim().is_empty() {
            app.error = Some(t.err_client_required.to_string());
            app.editing_client = Some(client);
        } else {
            app.editing_client = Some(client);
            if app.save_editing_client() {
                app.show_client_form = false;
            }
        }
    } else if cancel_client || !open {
        app.editing_client = None;
        app.show_client_form = false;
    } else {
        app.editing_client = Some(client);
    }
}

fn show_preview_window(app: &mut InvoiceApp, ctx: &egui::Context) {
    let Some(invoice) = app.preview_invoice.clone() else {
        app.show_preview = false;
        return;
    };
    let t = app.strings();

    let mut open = true;
    let mut export_clicked = false;

    egui::Window::new(t.preview)
        .open(&mut open)
        .resizable(true)
        .default_width(660.0)
        .default_height(760.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{}:", t.template));
                egui::ComboBox::from_id_salt("preview_template")
                    .selected_text(app.preview_template.label())
                    .show_ui(ui, |ui| {
                        for id in TemplateId::ALL {
                            ui.selectable_value(&mut app.preview_template, id, id.label());
                        }
                    });

                if ui
                    .add_enabled(!app.exporting, egui::Button::new(format!("📄 {}", t.export_pdf)))
                    .clicked()
                {
                    export_clicked = true;
                }
            });
            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| {
                let doc = template::compose(
                    app.preview_template,
                    &invoice,
                    &app.company,
                    &app.prefs.render_options(),
                );
                preview::show_document(ui, &doc);
            });
        });

    if export_clicked {
        let template = app.preview_template;
        app.export_invoice_pdf(&invoice, template);
    }
    if !open {
        app.show_preview = false;
        app.preview_invoice = None;
    }
}

fn status_chip(ui: &mut egui::Ui, status: InvoiceStatus, lang: Lang) {
    let (color, fill) = status.colors();
    let color = parse_hex_color(color).unwrap_or(egui::Color32::GRAY);
    let fill = parse_hex_color(fill).unwrap_or(egui::Color32::from_gray(240));
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(status.label(lang))
                    .color(color)
                    .strong()
                    .size(10.0),
            );
        });
}

/// One row of the settings form for an optional company image (logo,
/// header, footer).
fn image_slot_row(
    ui: &mut egui::Ui,
    t: &Strings,
    label: &str,
    slot: &mut Option<Attachment>,
    error: &mut Option<String>,
    changed: &mut bool,
) {
    ui.horizontal(|ui| {
        ui.label(format!("{label}:"));
        let action = match slot {
            Some(image) => {
                ui.label(format!("{} ({} KB)", image.name, image.size / 1024));
                ui.button(t.remove).clicked().then_some(None)
            }
            None => {
                if ui.button(t.choose_image).clicked() {
                    match pick_image(t) {
                        Ok(Some(attachment)) => Some(Some(attachment)),
                        Ok(None) => None,
                        Err(e) => {
                            *error = Some(e.to_string());
                            None
                        }
                    }
                } else {
                    None
                }
            }
        };
        if let Some(new_value) = action {
            *slot = new_value;
            *changed = true;
        }
    });
}

/// File picker → bounded, base64-encoded attachment.
fn pick_image(t: &Strings) -> crate::error::Result<Option<Attachment>> {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
    else {
        return Ok(None);
    };

    let data = std::fs::read(&path)?;
    if data.len() as u64 > MAX_ATTACHMENT_BYTES {
        return Err(AppError::Attachment(t.err_image_too_large.to_string()));
    }

    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    };

    use base64::Engine as _;
    Ok(Some(Attachment {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string()),
        mime: mime.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(&data),
        size: data.len() as u64,
    }))
}
