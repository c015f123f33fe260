//! Template registry and document composition.
//!
//! A template's visual identity lives in a [`TemplateStyle`] table entry,
//! not in control flow: one composition function builds the same section
//! tree for every template, and the two render targets (egui preview,
//! typst/PDF) interpret that tree. Both targets therefore show the same
//! logical content by construction.

use serde::{Deserialize, Serialize};

use crate::compute;
use crate::format;
use crate::i18n::Lang;
use crate::model::{Company, Invoice, SignatureMode};
use crate::types::{Attachment, PaperFormat, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Corporate,
    #[default]
    Modern,
    Classic,
    Bold,
    Minimal,
    Elegance,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::Corporate,
        TemplateId::Modern,
        TemplateId::Classic,
        TemplateId::Bold,
        TemplateId::Minimal,
        TemplateId::Elegance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Corporate => "corporate",
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Bold => "bold",
            TemplateId::Minimal => "minimal",
            TemplateId::Elegance => "elegance",
        }
    }

    /// Callers validate template names with this before any lookup; an
    /// unknown name is a configuration error, not a runtime condition.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateId::Corporate => "Corporate",
            TemplateId::Modern => "Modern",
            TemplateId::Classic => "Classic",
            TemplateId::Bold => "Bold",
            TemplateId::Minimal => "Minimal",
            TemplateId::Elegance => "Elegance",
        }
    }

    pub fn style(self) -> &'static TemplateStyle {
        &STYLES[self as usize]
    }
}

/// Header arrangement, the one structural difference between templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    /// Accent band across the top, identity below (modern).
    Banner,
    /// Identity left, document block right (corporate).
    Split,
    /// Centred identity and title (classic, elegance).
    Centered,
    /// Heavy accent block on the left edge (bold).
    Sidebar,
    /// Thin rules, lots of air (minimal).
    Sparse,
}

/// Per-template visual identity. Indexed by `TemplateId as usize`.
#[derive(Debug)]
pub struct TemplateStyle {
    pub id: TemplateId,
    pub accent: &'static str,
    pub header: HeaderLayout,
    pub serif: bool,
    pub page_frame: bool,
    pub zebra_rows: bool,
    pub filled_table_header: bool,
    pub uppercase_headings: bool,
    pub footer_rule: bool,
}

static STYLES: [TemplateStyle; 6] = [
    TemplateStyle {
        id: TemplateId::Corporate,
        accent: "#1e3a5f",
        header: HeaderLayout::Split,
        serif: false,
        page_frame: false,
        zebra_rows: true,
        filled_table_header: true,
        uppercase_headings: true,
        footer_rule: true,
    },
    TemplateStyle {
        id: TemplateId::Modern,
        accent: "#6366f1",
        header: HeaderLayout::Banner,
        serif: false,
        page_frame: false,
        zebra_rows: false,
        filled_table_header: true,
        uppercase_headings: false,
        footer_rule: false,
    },
    TemplateStyle {
        id: TemplateId::Classic,
        accent: "#1a1a2e",
        header: HeaderLayout::Centered,
        serif: true,
        page_frame: true,
        zebra_rows: false,
        filled_table_header: false,
        uppercase_headings: true,
        footer_rule: true,
    },
    TemplateStyle {
        id: TemplateId::Bold,
        accent: "#dc2626",
        header: HeaderLayout::Sidebar,
        serif: false,
        page_frame: false,
        zebra_rows: true,
        filled_table_header: true,
        uppercase_headings: true,
        footer_rule: false,
    },
    TemplateStyle {
        id: TemplateId::Minimal,
        accent: "#0f172a",
        header: HeaderLayout::Sparse,
        serif: false,
        page_frame: false,
        zebra_rows: false,
        filled_table_header: false,
        uppercase_headings: false,
        footer_rule: false,
    },
    TemplateStyle {
        id: TemplateId::Elegance,
        accent: "#1a1a2e",
        header: HeaderLayout::Centered,
        serif: true,
        page_frame: true,
        zebra_rows: false,
        filled_table_header: false,
        uppercase_headings: true,
        footer_rule: true,
    },
];

/// A fully resolved invoice document: every user-visible string is already
/// localized and formatted, renderers only decide geometry.
#[derive(Debug, Clone)]
pub struct Document {
    pub template: TemplateId,
    pub style: &'static TemplateStyle,
    pub accent: String,
    pub paper: PaperFormat,
    pub lang: Lang,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone)]
pub enum Section {
    Header(Header),
    BillTo(Party),
    Items(ItemsTable),
    Totals(TotalsBlock),
    Notes { label: String, text: String },
    Attachments { label: String, images: Vec<Attachment> },
    Signatures(SignatureBlock),
    Footer(Footer),
}

#[derive(Debug, Clone)]
pub struct Header {
    pub company: Party,
    pub logo: Option<Attachment>,
    /// Custom full-width image drawn above everything else.
    pub banner: Option<Attachment>,
    pub title: String,
    pub number: String,
    pub status: StatusBadge,
    pub meta: Vec<LabeledValue>,
}

#[derive(Debug, Clone)]
pub struct StatusBadge {
    pub label: String,
    pub color: String,
    pub fill: String,
}

#[derive(Debug, Clone)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
    pub emphasis: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Party {
    pub label: String,
    pub name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ItemsTable {
    pub columns: [String; 4],
    pub rows: Vec<ItemRow>,
}

#[derive(Debug, Clone)]
pub struct ItemRow {
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone)]
pub struct TotalsBlock {
    pub rows: Vec<LabeledValue>,
    pub grand_label: String,
    pub grand_value: String,
}

#[derive(Debug, Clone)]
pub struct SignatureBlock {
    pub mode: SignatureMode,
    pub company: Option<SignatureBox>,
    pub client: Option<SignatureBox>,
}

#[derive(Debug, Clone)]
pub struct SignatureBox {
    pub label: String,
    /// Stylized name drawn by the interactive target in digital modes.
    pub signer_name: String,
    pub signer_title: String,
    pub date_line: String,
    /// Printed next to the manual rule on the paginated target.
    pub mention: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Footer {
    pub thanks: String,
    pub legal: Vec<String>,
    pub contact: Vec<String>,
    /// Custom full-width image drawn below the legal lines.
    pub image: Option<Attachment>,
}

/// Evaluate a template: pure function of its three inputs, no storage or
/// network access. Totals are derived from the line items on the spot, the
/// invoice's cached copies are ignored.
pub fn compose(
    id: TemplateId,
    invoice: &Invoice,
    company: &Company,
    opts: &RenderOptions,
) -> Document {
    let t = opts.lang.strings();
    let style = id.style();
    let accent = opts
        .accent
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(style.accent)
        .to_string();

    let subtotal = compute::subtotal(&invoice.items);
    let tax = compute::tax(subtotal, invoice.tax_rate);
    let total = compute::total(subtotal, tax, invoice.discount);

    let heading = |label: &str| {
        if style.uppercase_headings {
            label.to_uppercase()
        } else {
            label.to_string()
        }
    };

    let mut sections = Vec::new();

    // Header
    let mut meta = vec![LabeledValue {
        label: t.issue_date.to_string(),
        value: format::long_date(invoice.date, opts.lang),
        emphasis: false,
    }];
    if let Some(due) = invoice.due_date {
        meta.push(LabeledValue {
            label: t.due_date.to_string(),
            value: format::long_date(due, opts.lang),
            emphasis: false,
        });
    }
    meta.push(LabeledValue {
        label: t.total_amount.to_string(),
        value: format::amount(total, opts.lang),
        emphasis: true,
    });
    let (status_color, status_fill) = invoice.status.colors();
    sections.push(Section::Header(Header {
        company: company_party(company, opts.lang),
        logo: company.logo.clone(),
        banner: company.header_image.clone(),
        title: t.invoice_title.to_string(),
        number: invoice.number.clone(),
        status: StatusBadge {
            label: invoice.status.label(opts.lang).to_string(),
            color: status_color.to_string(),
            fill: status_fill.to_string(),
        },
        meta,
    }));

    // Client block
    sections.push(Section::BillTo(client_party(invoice, opts.lang, &heading)));

    // Itemized table
    sections.push(Section::Items(ItemsTable {
        columns: [
            heading(t.description),
            heading(t.qty),
            heading(t.unit_price),
            heading(t.total),
        ],
        rows: invoice
            .items
            .iter()
            .map(|item| ItemRow {
                description: item.description.clone(),
                quantity: format::quantity(item.quantity, opts.lang),
                unit_price: format::amount(item.unit_price, opts.lang),
                line_total: format::amount(item.line_total(), opts.lang),
            })
            .collect(),
    }));

    // Totals
    let mut rows = vec![LabeledValue {
        label: t.subtotal.to_string(),
        value: format::amount(subtotal, opts.lang),
        emphasis: false,
    }];
    if invoice.tax_rate != 0.0 {
        rows.push(LabeledValue {
            label: format!("{} ({}%)", t.tax, format::quantity(invoice.tax_rate, opts.lang)),
            value: format::amount(tax, opts.lang),
            emphasis: false,
        });
    }
    if invoice.discount != 0.0 {
        rows.push(LabeledValue {
            label: t.discount.to_string(),
            value: format::amount(-invoice.discount, opts.lang),
            emphasis: false,
        });
    }
    sections.push(Section::Totals(TotalsBlock {
        rows,
        grand_label: heading(t.grand_total),
        grand_value: format::amount(total, opts.lang),
    }));

    // Optional sections: omitted entirely when the data is absent.
    if !invoice.notes.trim().is_empty() {
        sections.push(Section::Notes {
            label: heading(t.notes),
            text: invoice.notes.clone(),
        });
    }
    if !invoice.images.is_empty() {
        sections.push(Section::Attachments {
            label: heading(t.attachments),
            images: invoice.images.clone(),
        });
    }
    if let Some(block) = signature_block(invoice, company, opts.lang) {
        sections.push(Section::Signatures(block));
    }

    sections.push(Section::Footer(footer(company, opts.lang)));

    Document {
        template: id,
        style,
        accent,
        paper: opts.paper,
        lang: opts.lang,
        sections,
    }
}

fn company_party(company: &Company, lang: Lang) -> Party {
    let t = lang.strings();
    let mut lines = Vec::new();
    if !company.address.is_empty() {
        lines.push(company.address.clone());
    }
    if !company.city.is_empty() {
        lines.push(company.city.clone());
    }
    if let Some(contact) = contact_line(&company.phone, &company.email, lang) {
        lines.push(contact);
    }
    Party {
        label: String::new(),
        name: if company.name.is_empty() {
            t.company_fallback.to_string()
        } else {
            company.name.clone()
        },
        lines,
    }
}

fn client_party(invoice: &Invoice, lang: Lang, heading: &impl Fn(&str) -> String) -> Party {
    let t = lang.strings();
    let client = &invoice.client;
    let mut lines = Vec::new();
    if !client.address.is_empty() {
        lines.push(client.address.clone());
    }
    if !client.city.is_empty() {
        lines.push(client.city.clone());
    }
    if let Some(contact) = contact_line(&client.phone, &client.email, lang) {
        lines.push(contact);
    }
    Party {
        label: heading(t.bill_to),
        name: if client.name.is_empty() {
            t.client_fallback.to_string()
        } else {
            client.name.clone()
        },
        lines,
    }
}

fn contact_line(phone: &str, email: &str, lang: Lang) -> Option<String> {
    let t = lang.strings();
    match (phone.is_empty(), email.is_empty()) {
        (false, false) => Some(format!(
            "{}: {} | {}",
            t.phone_label,
            format::phone(phone),
            email
        )),
        (false, true) => Some(format!("{}: {}", t.phone_label, format::phone(phone))),
        (true, false) => Some(email.to_string()),
        (true, true) => None,
    }
}

fn signature_block(invoice: &Invoice, company: &Company, lang: Lang) -> Option<SignatureBlock> {
    let t = lang.strings();
    let settings = &invoice.signature;
    if settings.mode == SignatureMode::None {
        return None;
    }

    let non_empty = |s: &str, fallback: &str| {
        if s.trim().is_empty() {
            fallback.to_string()
        } else {
            s.to_string()
        }
    };

    let company_box = settings.show_company_signature.then(|| SignatureBox {
        label: t.for_company.to_string(),
        signer_name: non_empty(&company.name, t.company_fallback),
        signer_title: non_empty(&settings.company_signer_title, t.default_company_title),
        date_line: format!("{} {}", t.signed_on, format::short_date(invoice.date, lang)),
        mention: None,
    });
    let client_box = settings.show_client_signature.then(|| SignatureBox {
        label: t.for_client.to_string(),
        signer_name: non_empty(&invoice.client.name, t.client_fallback),
        signer_title: non_empty(&settings.client_signer_title, t.default_client_title),
        date_line: format!("{} ___________", t.signed_on),
        mention: Some(t.read_approved.to_string()),
    });

    if company_box.is_none() && client_box.is_none() {
        return None;
    }
    Some(SignatureBlock {
        mode: settings.mode,
        company: company_box,
        client: client_box,
    })
}

fn footer(company: &Company, lang: Lang) -> Footer {
    let t = lang.strings();
    let mut legal = Vec::new();
    if !company.ifu.is_empty() {
        legal.push(format!("{}: {}", t.tax_id, company.ifu));
    }
    if !company.rccm.is_empty() {
        legal.push(format!("{}: {}", t.business_reg, company.rccm));
    }
    if !company.iban.is_empty() {
        legal.push(format!("IBAN: {}", company.iban));
    }
    if !company.bic.is_empty() {
        legal.push(format!("BIC: {}", company.bic));
    }
    let mut contact = Vec::new();
    if !company.address.is_empty() || !company.city.is_empty() {
        contact.push(
            [company.address.as_str(), company.city.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    if let Some(line) = contact_line(&company.phone, &company.email, lang) {
        contact.push(line);
    }
    Footer {
        thanks: t.thanks.to_string(),
        legal,
        contact,
        image: company.footer_image.clone(),
    }
}

impl Document {
    /// Every user-visible string of the document in order, one per line.
    /// Content round-trip tests run against this, so it must stay in sync
    /// with what the render targets draw.
    pub fn plain_text(&self) -> String {
        let mut out = Vec::new();
        for section in &self.sections {
            match section {
                Section::Header(header) => {
                    out.push(header.company.name.clone());
                    out.extend(header.company.lines.iter().cloned());
                    out.push(header.title.clone());
                    out.push(header.number.clone());
                    out.push(header.status.label.clone());
                    for row in &header.meta {
                        out.push(row.label.clone());
                        out.push(row.value.clone());
                    }
                }
                Section::BillTo(party) => {
                    out.push(party.label.clone());
                    out.push(party.name.clone());
                    out.extend(party.lines.iter().cloned());
                }
                Section::Items(table) => {
                    out.extend(table.columns.iter().cloned());
                    for row in &table.rows {
                        out.push(row.description.clone());
                        out.push(row.quantity.clone());
                        out.push(row.unit_price.clone());
                        out.push(row.line_total.clone());
                    }
                }
                Section::Totals(totals) => {
                    for row in &totals.rows {
                        out.push(row.label.clone());
                        out.push(row.value.clone());
                    }
                    out.push(totals.grand_label.clone());
                    out.push(totals.grand_value.clone());
                }
                Section::Notes { label, text } => {
                    out.push(label.clone());
                    out.push(text.clone());
                }
                Section::Attachments { label, images } => {
                    out.push(label.clone());
                    out.extend(images.iter().map(|image| image.name.clone()));
                }
                Section::Signatures(block) => {
                    for sig in [&block.company, &block.client].into_iter().flatten() {
                        out.push(sig.label.clone());
                        out.push(sig.signer_name.clone());
                        out.push(sig.signer_title.clone());
                        out.push(sig.date_line.clone());
                    }
                }
                Section::Footer(footer) => {
                    out.push(footer.thanks.clone());
                    out.extend(footer.legal.iter().cloned());
                    out.extend(footer.contact.iter().cloned());
                }
            }
        }
        out.retain(|line| !line.is_empty());
        out.join("\n")
    }
}
