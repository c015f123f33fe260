use serde::{Deserialize, Serialize};

/// Display language. French is the default of the original deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    En,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::Fr, Lang::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Lang::Fr => "fr",
            Lang::En => "en",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lang::Fr => "Français",
            Lang::En => "English",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Lang::Fr => &FR,
            Lang::En => &EN,
        }
    }

    /// Localized month name, `month` is 1-based as in chrono.
    pub fn month_name(self, month: u32) -> &'static str {
        let table: &[&str; 12] = match self {
            Lang::Fr => &MONTHS_FR,
            Lang::En => &MONTHS_EN,
        };
        table
            .get((month as usize).saturating_sub(1))
            .copied()
            .unwrap_or("")
    }
}

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Every user-visible string, one table per language.
pub struct Strings {
    // Document body
    pub invoice_title: &'static str,
    pub issue_date: &'static str,
    pub due_date: &'static str,
    pub total_amount: &'static str,
    pub bill_to: &'static str,
    pub description: &'static str,
    pub qty: &'static str,
    pub unit_price: &'static str,
    pub total: &'static str,
    pub subtotal: &'static str,
    pub tax: &'static str,
    pub discount: &'static str,
    pub grand_total: &'static str,
    pub attachments: &'static str,
    pub notes: &'static str,
    pub thanks: &'static str,
    pub phone_label: &'static str,
    pub tax_id: &'static str,
    pub business_reg: &'static str,

    // Signature zone
    pub for_company: &'static str,
    pub for_client: &'static str,
    pub signed_on: &'static str,
    pub read_approved: &'static str,
    pub default_company_title: &'static str,
    pub default_client_title: &'static str,
    pub company_fallback: &'static str,
    pub client_fallback: &'static str,

    // Statuses
    pub status_draft: &'static str,
    pub status_pending: &'static str,
    pub status_paid: &'static str,
    pub status_overdue: &'static str,
    pub status_cancelled: &'static str,

    // Navigation and lists
    pub invoices: &'static str,
    pub clients: &'static str,
    pub settings: &'static str,
    pub new_invoice: &'static str,
    pub add_client: &'static str,
    pub edit: &'static str,
    pub delete: &'static str,
    pub save: &'static str,
    pub cancel: &'static str,
    pub preview: &'static str,
    pub export_pdf: &'static str,

    // Invoice form
    pub invoice_number: &'static str,
    pub date: &'static str,
    pub status: &'static str,
    pub client: &'static str,
    pub select_client: &'static str,
    pub items: &'static str,
    pub add_item: &'static str,
    pub tax_rate: &'static str,
    pub signatures: &'static str,
    pub signature_mode: &'static str,
    pub mode_none: &'static str,
    pub mode_manual: &'static str,
    pub mode_digital: &'static str,
    pub mode_both: &'static str,
    pub show_company_signature: &'static str,
    pub show_client_signature: &'static str,
    pub signer_title: &'static str,
    pub add_image: &'static str,

    // Client / company forms
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
    pub city: &'static str,
    pub company_section: &'static str,
    pub preferences: &'static str,
    pub language: &'static str,
    pub accent_color: &'static str,
    pub reset: &'static str,
    pub paper_format: &'static str,
    pub template: &'static str,
    pub logo: &'static str,
    pub header_image: &'static str,
    pub footer_image: &'static str,
    pub choose_image: &'static str,
    pub remove: &'static str,

    // Errors
    pub err_client_required: &'static str,
    pub err_too_many_images: &'static str,
    pub err_image_too_large: &'static str,
    pub err_save: &'static str,
    pub err_export: &'static str,
}

pub static FR: Strings = Strings {
    invoice_title: "FACTURE",
    issue_date: "Date d'émission",
    due_date: "Date d'échéance",
    total_amount: "Montant Total",
    bill_to: "Facturé à",
    description: "Description",
    qty: "Qté",
    unit_price: "Prix unitaire",
    total: "Total",
    subtotal: "Sous-total",
    tax: "TVA",
    discount: "Remise",
    grand_total: "Total TTC",
    attachments: "Annexes",
    notes: "Notes",
    thanks: "Merci pour votre confiance",
    phone_label: "Tél",
    tax_id: "N° contribuable",
    business_reg: "RCCM",

    for_company: "Pour l'entreprise",
    for_client: "Pour le client",
    signed_on: "Fait le",
    read_approved: "Lu et approuvé",
    default_company_title: "Directeur",
    default_client_title: "Client",
    company_fallback: "Entreprise",
    client_fallback: "Client",

    status_draft: "Brouillon",
    status_pending: "En attente",
    status_paid: "Payée",
    status_overdue: "En retard",
    status_cancelled: "Annulée",

    invoices: "Factures",
    clients: "Clients",
    settings: "Paramètres",
    new_invoice: "Nouvelle facture",
    add_client: "Ajouter un client",
    edit: "Modifier",
    delete: "Supprimer",
    save: "Enregistrer",
    cancel: "Annuler",
    preview: "Aperçu",
    export_pdf: "Exporter en PDF",

    invoice_number: "N° de facture",
    date: "Date",
    status: "Statut",
    client: "Client",
    select_client: "Sélectionner un client",
    items: "Prestations",
    add_item: "Ajouter une ligne",
    tax_rate: "TVA (%)",
    signatures: "Signatures",
    signature_mode: "Mode",
    mode_none: "Aucune",
    mode_manual: "Manuelle",
    mode_digital: "Numérique",
    mode_both: "Les deux",
    show_company_signature: "Signature entreprise",
    show_client_signature: "Signature client",
    signer_title: "Titre du signataire",
    add_image: "Ajouter une image",

    name: "Nom",
    email: "Email",
    phone: "Téléphone",
    address: "Adresse",
    city: "Ville",
    company_section: "Votre entreprise",
    preferences: "Préférences",
    language: "Langue",
    accent_color: "Couleur d'accent",
    reset: "Réinitialiser",
    paper_format: "Format papier",
    template: "Modèle",
    logo: "Logo",
    header_image: "Image d'en-tête",
    footer_image: "Image de pied de page",
    choose_image: "Choisir une image",
    remove: "Retirer",

    err_client_required: "Veuillez renseigner le nom du client avant d'enregistrer.",
    err_too_many_images: "6 images maximum par facture.",
    err_image_too_large: "Image trop volumineuse (max 2 Mo).",
    err_save: "Échec de l'enregistrement. Vos modifications sont conservées, réessayez.",
    err_export: "Échec de l'export PDF.",
};

pub static EN: Strings = Strings {
    invoice_title: "INVOICE",
    issue_date: "Issue Date",
    due_date: "Due Date",
    total_amount: "Total Amount",
    bill_to: "Bill To",
    description: "Description",
    qty: "Qty",
    unit_price: "Unit Price",
    total: "Total",
    subtotal: "Subtotal",
    tax: "Tax",
    discount: "Discount",
    grand_total: "Total Due",
    attachments: "Attachments",
    notes: "Notes",
    thanks: "Thank you for your business",
    phone_label: "Phone",
    tax_id: "Tax ID",
    business_reg: "Business Reg.",

    for_company: "For the company",
    for_client: "For the client",
    signed_on: "Signed on",
    read_approved: "Read and approved",
    default_company_title: "Director",
    default_client_title: "Client",
    company_fallback: "Company",
    client_fallback: "Client",

    status_draft: "Draft",
    status_pending: "Pending",
    status_paid: "Paid",
    status_overdue: "Overdue",
    status_cancelled: "Cancelled",

    invoices: "Invoices",
    clients: "Clients",
    settings: "Settings",
    new_invoice: "New Invoice",
    add_client: "Add Client",
    edit: "Edit",
    delete: "Delete",
    save: "Save",
    cancel: "Cancel",
    preview: "Preview",
    export_pdf: "Export PDF",

    invoice_number: "Invoice #",
    date: "Date",
    status: "Status",
    client: "Client",
    select_client: "Select a client",
    items: "Items",
    add_item: "Add Item",
    tax_rate: "Tax (%)",
    signatures: "Signatures",
    signature_mode: "Mode",
    mode_none: "None",
    mode_manual: "Manual",
    mode_digital: "Digital",
    mode_both: "Both",
    show_company_signature: "Company signature",
    show_client_signature: "Client signature",
    signer_title: "Signer title",
    add_image: "Add image",

    name: "Name",
    email: "Email",
    phone: "Phone",
    address: "Address",
    city: "City",
    company_section: "Your company",
    preferences: "Preferences",
    language: "Language",
    accent_color: "Accent color",
    reset: "Reset",
    paper_format: "Paper format",
    template: "Template",
    logo: "Logo",
    header_image: "Header image",
    footer_image: "Footer image",
    choose_image: "Choose image",
    remove: "Remove",

    err_client_required: "Please enter the client name before saving.",
    err_too_many_images: "At most 6 images per invoice.",
    err_image_too_large: "Image too large (max 2 MB).",
    err_save: "Save failed. Your changes are kept, please retry.",
    err_export: "PDF export failed.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(Lang::Fr.month_name(1), "janvier");
        assert_eq!(Lang::Fr.month_name(8), "août");
        assert_eq!(Lang::En.month_name(12), "December");
    }

    #[test]
    fn out_of_range_month_is_empty() {
        assert_eq!(Lang::Fr.month_name(0), "");
        assert_eq!(Lang::En.month_name(13), "");
    }
}
