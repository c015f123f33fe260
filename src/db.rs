use std::path::Path;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;

use crate::compute;
use crate::error::Result;
use crate::model::{Client, Company, Invoice};
use crate::types::Preferences;

/// Embedded document store. Invoice sub-records (client snapshot, items,
/// images, signature settings) are serialized into JSON columns; last
/// write wins, no version check.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                address TEXT NOT NULL,
                city TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS invoices (
                id INTEGER PRIMARY KEY,
                number TEXT NOT NULL,
                date TEXT NOT NULL,
                due_date TEXT,
                status TEXT NOT NULL,
                client TEXT NOT NULL,
                items TEXT NOT NULL,
                tax_rate REAL NOT NULL,
                discount REAL NOT NULL,
                notes TEXT NOT NULL,
                images TEXT NOT NULL,
                signature TEXT NOT NULL,
                subtotal REAL NOT NULL,
                tax REAL NOT NULL,
                total REAL NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    // Settings operations

    pub fn save_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn save_company(&self, company: &Company) -> Result<()> {
        let json = serde_json::to_string(company)?;
        self.save_setting("company", &json)
    }

    pub fn get_company(&self) -> Result<Option<Company>> {
        match self.get_setting("company")? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_preferences(&self, prefs: &Preferences) -> Result<()> {
        let json = serde_json::to_string(prefs)?;
        self.save_setting("preferences", &json)
    }

    pub fn get_preferences(&self) -> Result<Option<Preferences>> {
        match self.get_setting("preferences")? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    // Client operations

    pub fn save_client(&self, client: &Client) -> Result<i64> {
        if client.id == 0 {
            self.conn.execute(
                r#"INSERT INTO clients (name, email, phone, address, city, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    client.name,
                    client.email,
                    client.phone,
                    client.address,
                    client.city,
                    Local::now().to_rfc3339(),
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        } else {
            self.conn.execute(
                r#"UPDATE clients SET
                name = ?1, email = ?2, phone = ?3, address = ?4, city = ?5
                WHERE id = ?6"#,
                params![
                    client.name,
                    client.email,
                    client.phone,
                    client.address,
                    client.city,
                    client.id,
                ],
            )?;
            Ok(client.id)
        }
    }

    pub fn get_client(&self, id: i64) -> Result<Option<Client>> {
        let client = self
            .conn
            .query_row(
                "SELECT id, name, email, phone, address, city FROM clients WHERE id = ?1",
                params![id],
                client_from_row,
            )
            .optional()?;
        Ok(client)
    }

    pub fn get_all_clients(&self) -> Result<Vec<Client>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, address, city FROM clients ORDER BY name",
        )?;
        let clients = stmt
            .query_map([], client_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(clients)
    }

    pub fn delete_client(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM clients WHERE id = ?1", params![id])?;
        Ok(())
    }

    // Invoice operations

    pub fn save_invoice(&self, invoice: &Invoice) -> Result<i64> {
        let client_json = serde_json::to_string(&invoice.client)?;
        let items_json = serde_json::to_string(&invoice.items)?;
        let images_json = serde_json::to_string(&invoice.images)?;
        let signature_json = serde_json::to_string(&invoice.signature)?;

        if invoice.id == 0 {
            self.conn.execute(
                r#"INSERT INTO invoices
                (number, date, due_date, status, client, items, tax_rate, discount,
                 notes, images, signature, subtotal, tax, total, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#,
                params![
                    invoice.number,
                    invoice.date.format("%Y-%m-%d").to_string(),
                    invoice.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    invoice.status.as_str(),
                    client_json,
                    items_json,
                    invoice.tax_rate,
                    invoice.discount,
                    invoice.notes,
                    images_json,
                    signature_json,
                    invoice.subtotal,
                    invoice.tax,
                    invoice.total,
                    Local::now().to_rfc3339(),
                ],
            )?;
            Ok(self.conn.last_insert_rowid())
        } else {
            self.conn.execute(
                r#"UPDATE invoices SET
                number = ?1, date = ?2, due_date = ?3, status = ?4, client = ?5,
                items = ?6, tax_rate = ?7, discount = ?8, notes = ?9, images = ?10,
                signature = ?11, subtotal = ?12, tax = ?13, total = ?14
                WHERE id = ?15"#,
                params![
                    invoice.number,
                    invoice.date.format("%Y-%m-%d").to_string(),
                    invoice.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    invoice.status.as_str(),
                    client_json,
                    items_json,
                    invoice.tax_rate,
                    invoice.discount,
                    invoice.notes,
                    images_json,
                    signature_json,
                    invoice.subtotal,
                    invoice.tax,
                    invoice.total,
                    invoice.id,
                ],
            )?;
            Ok(invoice.id)
        }
    }

    pub fn get_invoice(&self, id: i64) -> Result<Option<Invoice>> {
        let invoice = self
            .conn
            .query_row(
                &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"),
                params![id],
                invoice_from_row,
            )
            .optional()?;
        Ok(invoice)
    }

    /// All invoices, most recently created first.
    pub fn get_all_invoices(&self) -> Result<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC, id DESC"
        ))?;
        let invoices = stmt
            .query_map([], invoice_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(invoices)
    }

    pub fn delete_invoice(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Number of the invoice most recently issued in `year`, if any. Feeds
    /// the sequential numbering scheme.
    pub fn last_invoice_number(&self, year: i32) -> Result<Option<String>> {
        let pattern = format!("{}-{}-%", compute::NUMBER_PREFIX, year);
        let number = self
            .conn
            .query_row(
                "SELECT number FROM invoices WHERE number LIKE ?1 ORDER BY id DESC LIMIT 1",
                params![pattern],
                |row| row.get(0),
            )
            .optional()?;
        Ok(number)
    }
}

const INVOICE_COLUMNS: &str = "id, number, date, due_date, status, client, items, tax_rate, \
     discount, notes, images, signature, subtotal, tax, total, created_at";

fn client_from_row(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        city: row.get(5)?,
    })
}

fn invoice_from_row(row: &rusqlite::Row) -> rusqlite::Result<Invoice> {
    let date: String = row.get(2)?;
    let due_date: Option<String> = row.get(3)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(15)?;

    Ok(Invoice {
        id: row.get(0)?,
        number: row.get(1)?,
        date: parse_date(2, &date)?,
        due_date: due_date.as_deref().map(|d| parse_date(3, d)).transpose()?,
        status: crate::model::InvoiceStatus::from_string(&status),
        client: json_column(5, &row.get::<_, String>(5)?)?,
        items: json_column(6, &row.get::<_, String>(6)?)?,
        tax_rate: row.get(7)?,
        discount: row.get(8)?,
        notes: row.get(9)?,
        images: json_column(10, &row.get::<_, String>(10)?)?,
        signature: json_column(11, &row.get::<_, String>(11)?)?,
        subtotal: row.get(12)?,
        tax: row.get(13)?,
        total: row.get(14)?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Local)),
    })
}

fn parse_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| conversion_error(idx, e))
}

fn json_column<T: DeserializeOwned>(idx: usize, json: &str) -> rusqlite::Result<T> {
    serde_json::from_str(json).map_err(|e| conversion_error(idx, e))
}

fn conversion_error(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
}
