use base64::Engine as _;
use chrono::NaiveDate;

use facturier::i18n::Lang;
use facturier::model::{
    ClientSnapshot, Company, Invoice, InvoiceStatus, LineItem, SignatureMode, SignatureSettings,
};
use facturier::template::{compose, Section, TemplateId};
use facturier::types::{Attachment, PaperFormat, RenderOptions};

fn sample_company() -> Company {
    Company {
        name: "Wagadu Conseil".to_string(),
        address: "12 Avenue de la Nation".to_string(),
        city: "Ouagadougou".to_string(),
        phone: "70123456".to_string(),
        email: "contact@wagadu-conseil.bf".to_string(),
        ifu: "00012345A".to_string(),
        rccm: "BF-OUA-2020-B-123".to_string(),
        iban: "BF42BF0840101300463574000390".to_string(),
        bic: "ECOCBFBF".to_string(),
        signature_title: "Gérant".to_string(),
        ..Company::default()
    }
}

fn sample_attachment() -> Attachment {
    let bytes = [0x89u8, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    Attachment {
        name: "plan-chantier.png".to_string(),
        mime: "image/png".to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        size: 8,
    }
}

fn sample_invoice() -> Invoice {
    let mut invoice = Invoice {
        number: "FAC-2025-0007".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        due_date: Some(NaiveDate::from_ymd_opt(2025, 4, 9).unwrap()),
        status: InvoiceStatus::Pending,
        client: ClientSnapshot {
            client_id: Some(3),
            name: "Sawadogo & Frères".to_string(),
            email: "compta@sawadogo.bf".to_string(),
            phone: "70654321".to_string(),
            address: "Rue 12.34, Secteur 4".to_string(),
            city: "Bobo-Dioulasso".to_string(),
        },
        items: vec![
            LineItem {
                description: "Audit comptable".to_string(),
                quantity: 2.0,
                unit_price: 500.0,
            },
            LineItem {
                description: "Formation du personnel".to_string(),
                quantity: 1.5,
                unit_price: 200.0,
            },
        ],
        tax_rate: 20.0,
        discount: 50.0,
        notes: "Paiement à 30 jours.".to_string(),
        images: vec![sample_attachment()],
        ..Invoice::default()
    };
    invoice.recompute_totals();
    invoice
}

fn options() -> RenderOptions {
    RenderOptions {
        lang: Lang::Fr,
        accent: None,
        paper: PaperFormat::A4,
    }
}

#[test]
fn every_template_renders_all_populated_fields() {
    let company = sample_company();
    let invoice = sample_invoice();

    for id in TemplateId::ALL {
        let doc = compose(id, &invoice, &company, &options());
        let text = doc.plain_text();

        assert!(text.contains("Wagadu Conseil"), "{id:?}: company name missing");
        assert!(text.contains("Sawadogo & Frères"), "{id:?}: client name missing");
        assert!(text.contains("FAC-2025-0007"), "{id:?}: number missing");
        assert!(text.contains("Audit comptable"), "{id:?}: item 1 missing");
        assert!(
            text.contains("Formation du personnel"),
            "{id:?}: item 2 missing"
        );
        // 2×500 + 1.5×200 = 1300, +20% tax = 1560, −50 = 1510
        assert!(text.contains("1 510,00 FCFA"), "{id:?}: total missing in {text}");
        assert!(text.contains("Paiement à 30 jours."), "{id:?}: notes missing");
        assert!(text.contains("plan-chantier.png"), "{id:?}: attachment missing");
        assert!(text.contains("En attente"), "{id:?}: status missing");
    }
}

#[test]
fn totals_block_follows_the_computation_engine() {
    let doc = compose(
        TemplateId::Modern,
        &sample_invoice(),
        &sample_company(),
        &options(),
    );
    let totals = doc
        .sections
        .iter()
        .find_map(|s| match s {
            Section::Totals(t) => Some(t),
            _ => None,
        })
        .expect("totals section");

    assert_eq!(totals.grand_value, "1 510,00 FCFA");
    assert_eq!(totals.rows[0].value, "1 300,00 FCFA");
    assert!(totals.rows[1].label.contains("20%"));
    assert_eq!(totals.rows[1].value, "260,00 FCFA");
    assert_eq!(totals.rows[2].value, "-50,00 FCFA");
}

#[test]
fn absent_optional_data_omits_sections_entirely() {
    let mut invoice = sample_invoice();
    invoice.due_date = None;
    invoice.notes = String::new();
    invoice.images.clear();
    invoice.tax_rate = 0.0;
    invoice.discount = 0.0;
    invoice.signature.mode = SignatureMode::None;
    invoice.recompute_totals();

    let doc = compose(
        TemplateId::Corporate,
        &invoice,
        &sample_company(),
        &options(),
    );

    for section in &doc.sections {
        match section {
            Section::Notes { .. } => panic!("empty notes rendered"),
            Section::Attachments { .. } => panic!("empty attachments rendered"),
            Section::Signatures(_) => panic!("signature mode none rendered"),
            _ => {}
        }
    }
    let text = doc.plain_text();
    assert!(!text.contains("Date d'échéance"), "due-date row not omitted");

    let totals = doc
        .sections
        .iter()
        .find_map(|s| match s {
            Section::Totals(t) => Some(t),
            _ => None,
        })
        .unwrap();
    assert_eq!(totals.rows.len(), 1, "only the subtotal row should remain");
}

#[test]
fn negative_totals_are_rendered_unclamped() {
    let mut invoice = sample_invoice();
    invoice.items = vec![LineItem {
        description: "Geste commercial".to_string(),
        quantity: 1.0,
        unit_price: 100.0,
    }];
    invoice.tax_rate = 0.0;
    invoice.discount = 150.0;
    invoice.recompute_totals();
    assert_eq!(invoice.total, -50.0);

    let doc = compose(TemplateId::Minimal, &invoice, &sample_company(), &options());
    assert!(doc.plain_text().contains("-50,00 FCFA"));
}

#[test]
fn template_names_parse_only_from_the_registered_set() {
    for id in TemplateId::ALL {
        assert_eq!(TemplateId::from_str(id.as_str()), Some(id));
    }
    assert_eq!(TemplateId::from_str("fancy"), None);
    assert_eq!(TemplateId::from_str(""), None);
}

#[test]
fn accent_override_flows_into_the_document() {
    let invoice = sample_invoice();
    let company = sample_company();

    let themed = RenderOptions {
        accent: Some("#123abc".to_string()),
        ..options()
    };
    assert_eq!(
        compose(TemplateId::Bold, &invoice, &company, &themed).accent,
        "#123abc"
    );
    // No override: every template falls back to its own accent.
    assert_eq!(
        compose(TemplateId::Modern, &invoice, &company, &options()).accent,
        "#6366f1"
    );
    assert_eq!(
        compose(TemplateId::Bold, &invoice, &company, &options()).accent,
        "#dc2626"
    );
}

#[test]
fn english_locale_switches_labels_and_separators() {
    let opts = RenderOptions {
        lang: Lang::En,
        ..options()
    };
    let doc = compose(TemplateId::Modern, &sample_invoice(), &sample_company(), &opts);
    let text = doc.plain_text();
    assert!(text.contains("Bill To"));
    assert!(text.contains("1 510.00 FCFA"));
    assert!(text.contains("10 March 2025"));
}

#[test]
fn signature_section_follows_the_mode_and_flags() {
    let company = sample_company();

    // mode none: nothing at all
    let mut invoice = sample_invoice();
    invoice.signature.mode = SignatureMode::None;
    let doc = compose(TemplateId::Classic, &invoice, &company, &options());
    assert!(
        !doc.sections
            .iter()
            .any(|s| matches!(s, Section::Signatures(_)))
    );

    // company only, blank title falls back to the role label
    let mut invoice = sample_invoice();
    invoice.signature = SignatureSettings {
        mode: SignatureMode::Manual,
        show_company_signature: true,
        show_client_signature: false,
        company_signer_title: String::new(),
        client_signer_title: String::new(),
    };
    let doc = compose(TemplateId::Classic, &invoice, &company, &options());
    let block = doc
        .sections
        .iter()
        .find_map(|s| match s {
            Section::Signatures(b) => Some(b),
            _ => None,
        })
        .expect("signature section");
    let company_box = block.company.as_ref().expect("company box");
    assert!(block.client.is_none());
    assert_eq!(company_box.signer_title, "Directeur");
    assert_eq!(company_box.signer_name, "Wagadu Conseil");
    assert!(company_box.date_line.starts_with("Fait le"));

    // both parties, digital+manual
    let mut invoice = sample_invoice();
    invoice.signature = SignatureSettings {
        mode: SignatureMode::Both,
        show_company_signature: true,
        show_client_signature: true,
        company_signer_title: "Directrice Générale".to_string(),
        client_signer_title: String::new(),
    };
    let doc = compose(TemplateId::Classic, &invoice, &company, &options());
    let block = doc
        .sections
        .iter()
        .find_map(|s| match s {
            Section::Signatures(b) => Some(b),
            _ => None,
        })
        .unwrap();
    assert_eq!(block.mode, SignatureMode::Both);
    let client_box = block.client.as_ref().expect("client box");
    assert_eq!(
        block.company.as_ref().unwrap().signer_title,
        "Directrice Générale"
    );
    assert_eq!(client_box.signer_name, "Sawadogo & Frères");
    assert_eq!(client_box.mention.as_deref(), Some("Lu et approuvé"));

    // both flags off: section disappears even though mode is set
    let mut invoice = sample_invoice();
    invoice.signature.show_company_signature = false;
    invoice.signature.show_client_signature = false;
    let doc = compose(TemplateId::Classic, &invoice, &company, &options());
    assert!(
        !doc.sections
            .iter()
            .any(|s| matches!(s, Section::Signatures(_)))
    );
}

#[test]
fn composition_ignores_stale_cached_totals() {
    let mut invoice = sample_invoice();
    // Corrupt the denormalized copies; compose must derive from the items.
    invoice.subtotal = 9_999_999.0;
    invoice.tax = -1.0;
    invoice.total = 0.0;

    let doc = compose(TemplateId::Elegance, &invoice, &sample_company(), &options());
    assert!(doc.plain_text().contains("1 510,00 FCFA"));
    assert!(!doc.plain_text().contains("9 999 999,00"));
}

#[test]
fn snapshot_client_renders_even_without_a_stored_client() {
    // An invoice whose embedded client was hand-edited, with no back-reference.
    let mut invoice = sample_invoice();
    invoice.client = ClientSnapshot {
        client_id: None,
        name: "Client de passage".to_string(),
        ..ClientSnapshot::default()
    };
    let doc = compose(TemplateId::Minimal, &invoice, &sample_company(), &options());
    assert!(doc.plain_text().contains("Client de passage"));
}
