use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub street: String,
    pub address: String,
}

impl Contact {
    /// Recompute `address` from the location parts. Call after changing any of them.
    pub fn compute_address(&mut self) {
        self.address = compose_address(&self.country, &self.province, &self.city, &self.street);
    }

    /// Overlay every field present in `patch` and refresh the derived address.
    pub fn apply(&mut self, patch: &ContactPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref phone) = patch.phone {
            self.phone = phone.clone();
        }
        if let Some(ref country) = patch.country {
            self.country = country.clone();
        }
        if let Some(ref province) = patch.province {
            self.province = province.clone();
        }
        if let Some(ref city) = patch.city {
            self.city = city.clone();
        }
        if let Some(ref street) = patch.street {
            self.street = street.clone();
        }
        self.compute_address();
    }
}

/// Fields accepted when creating a contact. Absent optionals are stored as "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

impl NewContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build the record that will be stored, with `id` left at 0 until insert.
    pub fn into_contact(self) -> Contact {
        let mut contact = Contact {
            id: 0,
            name: self.name,
            phone: self.phone.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            province: self.province.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            address: String::new(),
        };
        contact.compute_address();
        contact
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.country.is_none()
            && self.province.is_none()
            && self.city.is_none()
            && self.street.is_none()
    }
}

/// Join the location parts in country, province, city, street order,
/// skipping blank ones.
pub fn compose_address(country: &str, province: &str, city: &str, street: &str) -> String {
    [country, province, city, street]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
