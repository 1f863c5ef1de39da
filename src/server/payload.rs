//! Request body validation.
//!
//! Bodies are parsed once at the boundary into typed [`NewContact`] /
//! [`ContactPatch`] values. Known fields must be strings when present;
//! `null` counts as absent. Unknown keys, `id` and `address` are ignored.

use serde_json::{Map, Value};
use thiserror::Error;

use super::error::ApiError;
use crate::models::{ContactPatch, NewContact};

/// Fields that failed validation, in the order they were checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

/// Validate a `POST /contacts` body.
pub fn parse_new_contact(body: &[u8]) -> Result<NewContact, ApiError> {
    let map = parse_object(body)?;
    let mut invalid = Vec::new();

    let name = required_name(&map, &mut invalid);
    let phone = text_field(&map, "phone", &mut invalid);
    let country = text_field(&map, "country", &mut invalid);
    let province = text_field(&map, "province", &mut invalid);
    let city = text_field(&map, "city", &mut invalid);
    let street = text_field(&map, "street", &mut invalid);

    match name {
        Some(name) if invalid.is_empty() => Ok(NewContact {
            name,
            phone,
            country,
            province,
            city,
            street,
        }),
        _ => Err(ValidationError { fields: invalid }.into()),
    }
}

/// Validate a `PATCH /contacts/{id}` body.
pub fn parse_contact_patch(body: &[u8]) -> Result<ContactPatch, ApiError> {
    let map = parse_object(body)?;
    let mut invalid = Vec::new();

    let name = text_field(&map, "name", &mut invalid);
    if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        invalid.push("name");
    }

    let patch = ContactPatch {
        name,
        phone: text_field(&map, "phone", &mut invalid),
        country: text_field(&map, "country", &mut invalid),
        province: text_field(&map, "province", &mut invalid),
        city: text_field(&map, "city", &mut invalid),
        street: text_field(&map, "street", &mut invalid),
    };

    if invalid.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError { fields: invalid }.into())
    }
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::InvalidBody),
    }
}

fn required_name(map: &Map<String, Value>, invalid: &mut Vec<&'static str>) -> Option<String> {
    match map.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(name.clone()),
        _ => {
            invalid.push("name");
            None
        }
    }
}

fn text_field(
    map: &Map<String, Value>,
    key: &'static str,
    invalid: &mut Vec<&'static str>,
) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            invalid.push(key);
            None
        }
    }
}
