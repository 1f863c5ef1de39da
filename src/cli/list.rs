use anyhow::Result;

use crate::db::Database;
use crate::models::Contact;

const ID_WIDTH: usize = 6;
const NAME_WIDTH: usize = 25;
const PHONE_WIDTH: usize = 16;

/// Execute the list command. Without a query, contacts are printed in id order.
pub fn run_list(db: &Database, query: Option<&str>) -> Result<()> {
    let contacts = match query {
        Some(q) if !q.is_empty() => db.search_contacts(q)?,
        _ => db.list_contacts_by_id()?,
    };

    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }

    println!("Contacts ({} total)\n", contacts.len());
    for line in format_table(&contacts) {
        println!("{}", line);
    }
    Ok(())
}

fn format_table(contacts: &[Contact]) -> Vec<String> {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(format!(
        "{:<id_w$}  {:<name_w$}  {:<phone_w$}  ADDRESS",
        "ID",
        "NAME",
        "PHONE",
        id_w = ID_WIDTH,
        name_w = NAME_WIDTH,
        phone_w = PHONE_WIDTH
    ));
    for contact in contacts {
        lines.push(format!(
            "{:<id_w$}  {:<name_w$}  {:<phone_w$}  {}",
            contact.id,
            truncate(&contact.name, NAME_WIDTH),
            truncate(&contact.phone, PHONE_WIDTH),
            contact.address,
            id_w = ID_WIDTH,
            name_w = NAME_WIDTH,
            phone_w = PHONE_WIDTH
        ));
    }
    lines
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
