use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::compute;
use crate::i18n::Lang;
use crate::types::Attachment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        compute::num(self.quantity) * compute::num(self.unit_price)
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            unit_price: 0.0,
        }
    }
}

/// Status is set manually by the user; nothing in the application derives
/// `Overdue` from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 5] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
        InvoiceStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "pending" => InvoiceStatus::Pending,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Draft,
        }
    }

    pub fn label(self, lang: Lang) -> &'static str {
        let t = lang.strings();
        match self {
            InvoiceStatus::Draft => t.status_draft,
            InvoiceStatus::Pending => t.status_pending,
            InvoiceStatus::Paid => t.status_paid,
            InvoiceStatus::Overdue => t.status_overdue,
            InvoiceStatus::Cancelled => t.status_cancelled,
        }
    }

    /// Badge palette, `(text, background)` as `#rrggbb`.
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            InvoiceStatus::Draft => ("#6b7280", "#f3f4f6"),
            InvoiceStatus::Pending => ("#f59e0b", "#fef3c7"),
            InvoiceStatus::Paid => ("#10b981", "#d1fae5"),
            InvoiceStatus::Overdue => ("#ef4444", "#fee2e2"),
            InvoiceStatus::Cancelled => ("#6b7280", "#f3f4f6"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    None,
    #[default]
    Manual,
    Digital,
    Both,
}

impl SignatureMode {
    pub const ALL: [SignatureMode; 4] = [
        SignatureMode::None,
        SignatureMode::Manual,
        SignatureMode::Digital,
        SignatureMode::Both,
    ];

    pub fn label(self, lang: Lang) -> &'static str {
        let t = lang.strings();
        match self {
            SignatureMode::None => t.mode_none,
            SignatureMode::Manual => t.mode_manual,
            SignatureMode::Digital => t.mode_digital,
            SignatureMode::Both => t.mode_both,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureSettings {
    pub mode: SignatureMode,
    pub show_company_signature: bool,
    pub show_client_signature: bool,
    pub company_signer_title: String,
    pub client_signer_title: String,
}

impl Default for SignatureSettings {
    fn default() -> Self {
        Self {
            mode: SignatureMode::Manual,
            show_company_signature: true,
            show_client_signature: false,
            company_signer_title: String::new(),
            client_signer_title: String::new(),
        }
    }
}

/// A stored client, owned independently of any invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

/// The copy of client data embedded in an invoice. Editing a stored
/// [`Client`] afterwards does not change invoices already written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSnapshot {
    #[serde(default)]
    pub client_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
}

impl ClientSnapshot {
    pub fn of(client: &Client) -> Self {
        Self {
            client_id: Some(client.id),
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            city: client.city.clone(),
        }
    }
}

/// Issuer profile, one per install, consumed read-only by rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub ifu: String,
    pub rccm: String,
    pub iban: String,
    pub bic: String,
    pub signature_title: String,
    #[serde(default)]
    pub logo: Option<Attachment>,
    #[serde(default)]
    pub header_image: Option<Attachment>,
    #[serde(default)]
    pub footer_image: Option<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub number: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub client: ClientSnapshot,
    pub items: Vec<LineItem>,
    pub tax_rate: f64,
    pub discount: f64,
    pub notes: String,
    pub images: Vec<Attachment>,
    pub signature: SignatureSettings,
    // Denormalized display caches, recomputed before every save.
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Local>>,
}

impl Invoice {
    /// Refresh the cached totals from the line items. The stored copies are
    /// never trusted as a source of truth.
    pub fn recompute_totals(&mut self) {
        self.subtotal = compute::subtotal(&self.items);
        self.tax = compute::tax(self.subtotal, self.tax_rate);
        self.total = compute::total(self.subtotal, self.tax, self.discount);
    }

    /// Current `(subtotal, tax, total)` derived from the items, without
    /// touching the cached fields.
    pub fn totals(&self) -> (f64, f64, f64) {
        let subtotal = compute::subtotal(&self.items);
        let tax = compute::tax(subtotal, self.tax_rate);
        (subtotal, tax, compute::total(subtotal, tax, self.discount))
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self {
            id: 0,
            number: String::new(),
            date: Local::now().date_naive(),
            due_date: None,
            status: InvoiceStatus::Draft,
            client: ClientSnapshot::default(),
            items: vec![LineItem::default()],
            tax_rate: 0.0,
            discount: 0.0,
            notes: String::new(),
            images: Vec::new(),
            signature: SignatureSettings::default(),
            subtotal: 0.0,
            tax: 0.0,
            total: 0.0,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_invoices_start_as_draft_with_one_item() {
        let invoice = Invoice::default();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.items.len(), 1);
    }

    #[test]
    fn recompute_matches_totals() {
        let mut invoice = Invoice {
            items: vec![
                LineItem {
                    description: "Service".into(),
                    quantity: 2.0,
                    unit_price: 500.0,
                },
            ],
            tax_rate: 20.0,
            discount: 50.0,
            ..Invoice::default()
        };
        invoice.recompute_totals();
        assert_eq!(
            (invoice.subtotal, invoice.tax, invoice.total),
            (1000.0, 200.0, 1150.0)
        );
        assert_eq!(invoice.totals(), (1000.0, 200.0, 1150.0));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in InvoiceStatus::ALL {
            assert_eq!(InvoiceStatus::from_string(status.as_str()), status);
        }
        assert_eq!(InvoiceStatus::from_string("???"), InvoiceStatus::Draft);
    }

    #[test]
    fn snapshot_copies_do_not_alias_the_client() {
        let mut client = Client {
            id: 7,
            name: "Acme".into(),
            ..Client::default()
        };
        let snapshot = ClientSnapshot::of(&client);
        client.name = "Renamed".into();
        assert_eq!(snapshot.name, "Acme");
        assert_eq!(snapshot.client_id, Some(7));
    }
}
