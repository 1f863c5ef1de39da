use anyhow::Result;

use crate::db::Database;
use crate::models::NewContact;

/// (name, phone, country, province, city, street)
const SAMPLES: [(&str, &str, &str, &str, &str, &str); 3] = [
    ("Alice Wonder", "13800000001", "USA", "CA", "San Francisco", "Market St"),
    ("MZ RME", "13800000002", "USA", "NY", "New York", "5th Ave"),
    ("Grace Lee", "13800000003", "Canada", "ON", "Toronto", "King St"),
];

/// Execute the seed command. Returns how many contacts were inserted.
pub fn run_seed(db: &Database, force: bool) -> Result<usize> {
    let existing = db.count_contacts()?;
    if existing > 0 && !force {
        println!(
            "Book already has {} contact(s); skipping seed (use --force to insert anyway).",
            existing
        );
        return Ok(0);
    }

    for new in sample_contacts() {
        let contact = db.insert_contact(new)?;
        tracing::debug!(id = contact.id, name = %contact.name, "seeded contact");
    }

    println!("Seed complete: {} contacts added.", SAMPLES.len());
    Ok(SAMPLES.len())
}

fn sample_contacts() -> impl Iterator<Item = NewContact> {
    SAMPLES
        .iter()
        .map(|&(name, phone, country, province, city, street)| NewContact {
            name: name.to_string(),
            phone: Some(phone.to_string()),
            country: Some(country.to_string()),
            province: Some(province.to_string()),
            city: Some(city.to_string()),
            street: Some(street.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_empty_book() {
        let db = Database::open_memory().unwrap();
        assert_eq!(run_seed(&db, false).unwrap(), 3);

        let contacts = db.list_contacts_by_id().unwrap();
        assert_eq!(contacts[0].address, "USA CA San Francisco Market St");
        assert_eq!(contacts[2].name, "Grace Lee");
    }

    #[test]
    fn test_seed_skips_non_empty_book() {
        let db = Database::open_memory().unwrap();
        run_seed(&db, false).unwrap();

        assert_eq!(run_seed(&db, false).unwrap(), 0);
        assert_eq!(db.count_contacts().unwrap(), 3);

        assert_eq!(run_seed(&db, true).unwrap(), 3);
        assert_eq!(db.count_contacts().unwrap(), 6);
    }
}
