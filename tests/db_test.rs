use chrono::NaiveDate;

use facturier::db::Database;
use facturier::i18n::Lang;
use facturier::model::{Client, ClientSnapshot, Company, Invoice, InvoiceStatus, LineItem};
use facturier::template::TemplateId;
use facturier::types::{PaperFormat, Preferences};

fn db() -> Database {
    Database::open_in_memory().expect("in-memory database")
}

fn sample_client() -> Client {
    Client {
        id: 0,
        name: "Ouedraogo BTP".to_string(),
        email: "info@ouedraogo-btp.bf".to_string(),
        phone: "70112233".to_string(),
        address: "Zone industrielle".to_string(),
        city: "Ouagadougou".to_string(),
    }
}

fn sample_invoice(number: &str) -> Invoice {
    let mut invoice = Invoice {
        number: number.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
        due_date: Some(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap()),
        status: InvoiceStatus::Pending,
        client: ClientSnapshot {
            client_id: None,
            name: "Kaboré Distribution".to_string(),
            ..ClientSnapshot::default()
        },
        items: vec![LineItem {
            description: "Livraison".to_string(),
            quantity: 3.0,
            unit_price: 15_000.0,
        }],
        tax_rate: 18.0,
        discount: 5_000.0,
        notes: "Bon de commande n° 88".to_string(),
        ..Invoice::default()
    };
    invoice.recompute_totals();
    invoice
}

#[test]
fn invoice_round_trips_through_the_store() {
    let db = db();
    let original = sample_invoice("FAC-2025-0001");
    let id = db.save_invoice(&original).unwrap();

    let loaded = db.get_invoice(id).unwrap().expect("stored invoice");
    assert_eq!(loaded.number, "FAC-2025-0001");
    assert_eq!(loaded.date, original.date);
    assert_eq!(loaded.due_date, original.due_date);
    assert_eq!(loaded.status, InvoiceStatus::Pending);
    assert_eq!(loaded.client.name, "Kaboré Distribution");
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items[0].unit_price, 15_000.0);
    assert_eq!(loaded.subtotal, 45_000.0);
    // 45 000 + 18% tax − 5 000 discount
    assert_eq!(loaded.total, 48_100.0);
    assert_eq!(loaded.notes, "Bon de commande n° 88");
    assert!(loaded.created_at.is_some(), "creation timestamp assigned on save");
}

#[test]
fn listing_returns_most_recently_created_first() {
    let db = db();
    for number in ["FAC-2025-0001", "FAC-2025-0002", "FAC-2025-0003"] {
        db.save_invoice(&sample_invoice(number)).unwrap();
    }
    let numbers: Vec<String> = db
        .get_all_invoices()
        .unwrap()
        .into_iter()
        .map(|i| i.number)
        .collect();
    assert_eq!(numbers, ["FAC-2025-0003", "FAC-2025-0002", "FAC-2025-0001"]);
}

#[test]
fn updates_overwrite_in_place() {
    let db = db();
    let mut invoice = sample_invoice("FAC-2025-0001");
    invoice.id = db.save_invoice(&invoice).unwrap();

    invoice.status = InvoiceStatus::Paid;
    invoice.items.push(LineItem {
        description: "Supplément".to_string(),
        quantity: 1.0,
        unit_price: 2_000.0,
    });
    invoice.recompute_totals();
    let id = db.save_invoice(&invoice).unwrap();
    assert_eq!(id, invoice.id);

    let all = db.get_all_invoices().unwrap();
    assert_eq!(all.len(), 1, "update must not create a second record");
    assert_eq!(all[0].status, InvoiceStatus::Paid);
    assert_eq!(all[0].items.len(), 2);
}

#[test]
fn deletion_is_permanent() {
    let db = db();
    let id = db.save_invoice(&sample_invoice("FAC-2025-0001")).unwrap();
    db.delete_invoice(id).unwrap();
    assert!(db.get_invoice(id).unwrap().is_none());
    assert!(db.get_all_invoices().unwrap().is_empty());
}

#[test]
fn embedded_snapshot_survives_client_edits() {
    let db = db();
    let mut client = sample_client();
    client.id = db.save_client(&client).unwrap();

    let mut invoice = sample_invoice("FAC-2025-0001");
    invoice.client = ClientSnapshot::of(&client);
    let invoice_id = db.save_invoice(&invoice).unwrap();

    client.name = "Ouedraogo BTP International".to_string();
    db.save_client(&client).unwrap();

    let stored = db.get_invoice(invoice_id).unwrap().unwrap();
    assert_eq!(stored.client.name, "Ouedraogo BTP");
    assert_eq!(stored.client.client_id, Some(client.id));
    assert_eq!(
        db.get_client(client.id).unwrap().unwrap().name,
        "Ouedraogo BTP International"
    );
}

#[test]
fn last_number_is_scoped_to_the_year() {
    let db = db();
    db.save_invoice(&sample_invoice("FAC-2024-0009")).unwrap();
    db.save_invoice(&sample_invoice("FAC-2025-0001")).unwrap();
    db.save_invoice(&sample_invoice("FAC-2025-0002")).unwrap();

    assert_eq!(
        db.last_invoice_number(2025).unwrap().as_deref(),
        Some("FAC-2025-0002")
    );
    assert_eq!(
        db.last_invoice_number(2024).unwrap().as_deref(),
        Some("FAC-2024-0009")
    );
    assert_eq!(db.last_invoice_number(2023).unwrap(), None);
}

#[test]
fn clients_crud_and_name_ordering() {
    let db = db();
    let mut zan = sample_client();
    zan.name = "Zan Services".to_string();
    let mut abo = sample_client();
    abo.name = "Abo Transit".to_string();

    let zan_id = db.save_client(&zan).unwrap();
    db.save_client(&abo).unwrap();

    let names: Vec<String> = db
        .get_all_clients()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Abo Transit", "Zan Services"]);

    db.delete_client(zan_id).unwrap();
    assert!(db.get_client(zan_id).unwrap().is_none());
    assert_eq!(db.get_all_clients().unwrap().len(), 1);
}

#[test]
fn company_and_preferences_round_trip() {
    let db = db();
    assert!(db.get_company().unwrap().is_none());
    assert!(db.get_preferences().unwrap().is_none());

    let company = Company {
        name: "Wagadu Conseil".to_string(),
        ifu: "00012345A".to_string(),
        ..Company::default()
    };
    db.save_company(&company).unwrap();

    let prefs = Preferences {
        lang: Lang::En,
        accent: Some("#dc2626".to_string()),
        paper: PaperFormat::Letter,
        template: TemplateId::Bold,
    };
    db.save_preferences(&prefs).unwrap();

    let company = db.get_company().unwrap().unwrap();
    assert_eq!(company.name, "Wagadu Conseil");
    let prefs = db.get_preferences().unwrap().unwrap();
    assert_eq!(prefs.lang, Lang::En);
    assert_eq!(prefs.accent.as_deref(), Some("#dc2626"));
    assert_eq!(prefs.paper, PaperFormat::Letter);
    assert_eq!(prefs.template, TemplateId::Bold);
}
