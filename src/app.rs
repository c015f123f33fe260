use std::path::PathBuf;

use chrono::{Datelike, Local};

use crate::compute;
use crate::db::Database;
use crate::error::Result;
use crate::format;
use crate::i18n::Strings;
use crate::model::{Client, Company, Invoice};
use crate::pdf;
use crate::template::{self, TemplateId};
use crate::types::Preferences;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Invoices,
    Clients,
    Settings,
}

impl Default for Tab {
    fn default() -> Self {
        Tab::Invoices
    }
}

pub struct InvoiceApp {
    pub invoices: Vec<Invoice>,
    pub clients: Vec<Client>,
    pub company: Company,
    pub prefs: Preferences,

    // UI state
    pub selected_tab: Tab,
    pub editing_invoice: Option<Invoice>,
    pub editing_client: Option<Client>,
    pub show_invoice_form: bool,
    pub show_client_form: bool,
    pub preview_invoice: Option<Invoice>,
    pub preview_template: TemplateId,
    pub show_preview: bool,
    pub error: Option<String>,
    /// One export at a time; a second request while this is set is a no-op.
    pub exporting: bool,

    // Text buffers for inputs that coerce to numbers/dates on change.
    pub tax_input: String,
    pub discount_input: String,
    pub due_date_input: String,

    // Database
    pub db: Database,
}

impl InvoiceApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let db = Database::new(&db_path()).expect("Failed to open database");

        let invoices = db.get_all_invoices().unwrap_or_default();
        let clients = db.get_all_clients().unwrap_or_default();
        let company = db.get_company().unwrap_or(None).unwrap_or_default();
        let prefs = db.get_preferences().unwrap_or(None).unwrap_or_default();
        let preview_template = prefs.template;

        Self {
            invoices,
            clients,
            company,
            prefs,
            selected_tab: Tab::default(),
            editing_invoice: None,
            editing_client: None,
            show_invoice_form: false,
            show_client_form: false,
            preview_invoice: None,
            preview_template,
            show_preview: false,
            error: None,
            exporting: false,
            tax_input: String::new(),
            discount_input: String::new(),
            due_date_input: String::new(),
            db,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        self.prefs.lang.strings()
    }

    // Invoice operations

    pub fn begin_new_invoice(&mut self) {
        let mut invoice = Invoice::default();
        let year = Local::now().year();
        let last = self.db.last_invoice_number(year).unwrap_or_else(|e| {
            log::warn!("could not read last invoice number: {e}");
            None
        });
        invoice.number = compute::next_invoice_number(last.as_deref(), year);
        if !self.company.signature_title.is_empty() {
            invoice.signature.company_signer_title = self.company.signature_title.clone();
        }
        self.open_invoice_form(invoice);
    }

    pub fn open_invoice_form(&mut self, invoice: Invoice) {
        let lang = self.prefs.lang;
        self.tax_input = format::quantity(invoice.tax_rate, lang);
        self.discount_input = format::quantity(invoice.discount, lang);
        self.due_date_input = invoice
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        self.editing_invoice = Some(invoice);
        self.show_invoice_form = true;
        self.error = None;
    }

    /// Persist the invoice being edited. On failure the in-memory record is
    /// kept and the form stays open so the user can retry.
    pub fn save_editing_invoice(&mut self) {
        let Some(mut invoice) = self.editing_invoice.take() else {
            return;
        };
        invoice.recompute_totals();
        match self.db.save_invoice(&invoice) {
            Ok(id) => {
                log::info!("saved invoice {} (id {id})", invoice.number);
                self.error = None;
                self.show_invoice_form = false;
                self.reload_invoices();
            }
            Err(e) => {
                log::error!("saving invoice {} failed: {e}", invoice.number);
                self.error = Some(self.strings().err_save.to_string());
                self.editing_invoice = Some(invoice);
                self.show_invoice_form = true;
            }
        }
    }

    pub fn delete_invoice(&mut self, id: i64) {
        match self.db.delete_invoice(id) {
            Ok(()) => self.invoices.retain(|i| i.id != id),
            Err(e) => {
                log::error!("deleting invoice {id} failed: {e}");
                self.error = Some(self.strings().err_save.to_string());
            }
        }
    }

    // Client operations

    /// Returns true when the client was written; false leaves the form open.
    pub fn save_editing_client(&mut self) -> bool {
        let Some(client) = self.editing_client.take() else {
            return true;
        };
        match self.db.save_client(&client) {
            Ok(id) => {
                log::info!("saved client {} (id {id})", client.name);
                self.error = None;
                self.reload_clients();
                true
            }
            Err(e) => {
                log::error!("saving client {} failed: {e}", client.name);
                self.error = Some(self.strings().err_save.to_string());
                self.editing_client = Some(client);
                false
            }
        }
    }

    pub fn delete_client(&mut self, id: i64) {
        match self.db.delete_client(id) {
            Ok(()) => self.clients.retain(|c| c.id != id),
            Err(e) => {
                log::error!("deleting client {id} failed: {e}");
                self.error = Some(self.strings().err_save.to_string());
            }
        }
    }

    // Settings

    pub fn save_settings(&mut self) {
        let result = self
            .db
            .save_company(&self.company)
            .and_then(|()| self.db.save_preferences(&self.prefs));
        if let Err(e) = result {
            log::error!("saving settings failed: {e}");
            self.error = Some(self.strings().err_save.to_string());
        }
    }

    // Export

    /// Render the invoice through the selected template and write the PDF
    /// wherever the user chooses. Either a complete file is produced or the
    /// failure is surfaced; no partial artifact is ever written.
    pub fn export_invoice_pdf(&mut self, invoice: &Invoice, template: TemplateId) {
        if self.exporting {
            return;
        }
        self.exporting = true;
        let result = self.export_inner(invoice, template);
        self.exporting = false;
        match result {
            Ok(Some(path)) => log::info!("PDF written to {}", path.display()),
            Ok(None) => {}
            Err(e) => {
                log::error!("PDF export of {} failed: {e}", invoice.number);
                self.error = Some(self.strings().err_export.to_string());
            }
        }
    }

    fn export_inner(&self, invoice: &Invoice, template: TemplateId) -> Result<Option<PathBuf>> {
        let doc = template::compose(template, invoice, &self.company, &self.prefs.render_options());
        let bytes = pdf::render_pdf(&doc)?;

        let file_name = if invoice.number.is_empty() {
            "invoice.pdf".to_string()
        } else {
            format!("{}.pdf", invoice.number)
        };
        let dialog = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name(&file_name);

        if let Some(path) = dialog.save_file() {
            std::fs::write(&path, &bytes)?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }

    fn reload_invoices(&mut self) {
        match self.db.get_all_invoices() {
            Ok(invoices) => self.invoices = invoices,
            Err(e) => {
                log::error!("reloading invoices failed: {e}");
                self.error = Some(self.strings().err_save.to_string());
            }
        }
    }

    fn reload_clients(&mut self) {
        match self.db.get_all_clients() {
            Ok(clients) => self.clients = clients,
            Err(e) => {
                log::error!("reloading clients failed: {e}");
                self.error = Some(self.strings().err_save.to_string());
            }
        }
    }
}

fn db_path() -> PathBuf {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facturier");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("could not create data directory {}: {e}", dir.display());
    }
    dir.join("facturier.db")
}
