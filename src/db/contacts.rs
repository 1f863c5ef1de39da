use anyhow::Result;
use rusqlite::{params, Row};

use super::Database;
use crate::models::{Contact, ContactPatch, NewContact};

impl Database {
    // ==================== CONTACT CREATE ====================

    /// Insert a contact and return it with the id assigned by SQLite.
    pub fn insert_contact(&self, new: NewContact) -> Result<Contact> {
        let mut contact = new.into_contact();
        self.conn.execute(
            r#"INSERT INTO contacts (name, phone, country, province, city, street, address)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            params![
                contact.name,
                contact.phone,
                contact.country,
                contact.province,
                contact.city,
                contact.street,
                contact.address,
            ],
        )?;
        contact.id = self.conn.last_insert_rowid();
        Ok(contact)
    }

    // ==================== CONTACT READ ====================

    pub fn get_contact_by_id(&self, id: i64) -> Result<Option<Contact>> {
        let mut stmt = self.conn.prepare("SELECT * FROM contacts WHERE id = ?")?;

        let result = stmt.query_row([id], Self::row_to_contact);

        match result {
            Ok(contact) => Ok(Some(contact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All contacts ordered by name.
    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM contacts ORDER BY name ASC, id ASC")?;

        let contacts = stmt
            .query_map([], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// All contacts in insertion order.
    pub fn list_contacts_by_id(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare("SELECT * FROM contacts ORDER BY id ASC")?;

        let contacts = stmt
            .query_map([], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    pub fn count_contacts(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Case-insensitive substring match over every text column, OR-combined.
    /// SQLite LIKE folds ASCII case only.
    pub fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let pattern = format!("%{}%", like_literal(query));
        let mut stmt = self.conn.prepare(
            r#"SELECT * FROM contacts
               WHERE name LIKE ?1 ESCAPE '\'
                  OR phone LIKE ?1 ESCAPE '\'
                  OR country LIKE ?1 ESCAPE '\'
                  OR province LIKE ?1 ESCAPE '\'
                  OR city LIKE ?1 ESCAPE '\'
                  OR street LIKE ?1 ESCAPE '\'
                  OR address LIKE ?1 ESCAPE '\'
               ORDER BY name ASC, id ASC"#,
        )?;

        let contacts = stmt
            .query_map([pattern], Self::row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// Search when a non-empty query is given, otherwise list everything.
    pub fn list_or_search(&self, query: Option<&str>) -> Result<Vec<Contact>> {
        match query {
            Some(q) if !q.is_empty() => self.search_contacts(q),
            _ => self.list_contacts(),
        }
    }

    // ==================== CONTACT UPDATE ====================

    /// Apply `patch` on top of the stored record and recompute `address`
    /// from the merged location parts. Returns `None` if no such contact.
    pub fn update_contact(&self, id: i64, patch: &ContactPatch) -> Result<Option<Contact>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(mut contact) = self.get_contact_by_id(id)? else {
            return Ok(None);
        };
        contact.apply(patch);

        self.conn.execute(
            r#"UPDATE contacts SET
                name = ?, phone = ?, country = ?, province = ?,
                city = ?, street = ?, address = ?
               WHERE id = ?"#,
            params![
                contact.name,
                contact.phone,
                contact.country,
                contact.province,
                contact.city,
                contact.street,
                contact.address,
                contact.id,
            ],
        )?;
        tx.commit()?;

        Ok(Some(contact))
    }

    // ==================== CONTACT DELETE ====================

    /// Hard delete. Returns whether a row was removed.
    pub fn delete_contact(&self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM contacts WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get("id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            country: row.get("country")?,
            province: row.get("province")?,
            city: row.get("city")?,
            street: row.get("street")?,
            address: row.get("address")?,
        })
    }
}

/// Backslash-escape `%`, `_` and `\` so the query matches as plain text
/// under `ESCAPE '\'`.
fn like_literal(query: &str) -> String {
    query
        .chars()
        .flat_map(|c| match c {
            '%' | '_' | '\\' => vec!['\\', c],
            _ => vec![c],
        })
        .collect()
}
