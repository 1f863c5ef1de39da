use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::error::ApiError;
use super::payload::{parse_contact_patch, parse_new_contact};
use super::AppState;
use crate::models::Contact;

pub async fn health() -> impl IntoResponse {
    "ok"
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let query = search_term(&params);
    let contacts = state
        .with_db(move |db| db.list_or_search(query.as_deref()))
        .await?;
    Ok(Json(contacts))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_db(move |db| db.get_contact_by_id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn create_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let new = parse_new_contact(&body)?;
    let contact = state.with_db(move |db| db.insert_contact(new)).await?;
    tracing::info!(id = contact.id, "created contact");
    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Contact>, ApiError> {
    let id = parse_id(&id)?;
    let patch = parse_contact_patch(&body)?;
    let contact = state
        .with_db(move |db| db.update_contact(id, &patch))
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(id, "updated contact");
    Ok(Json(contact))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.with_db(move |db| db.delete_contact(id)).await? {
        tracing::info!(id, "deleted contact");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// First `q` value, else first `query` value. Repeated keys are not an error.
fn search_term(params: &[(String, String)]) -> Option<String> {
    let first = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };
    first("q").or_else(|| first("query"))
}

/// Contact ids are positive integers.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::InvalidId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::server::router;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::Router;
    use tower::ServiceExt;

    const ALICE: &str = concat!(
        r#"{"name":"Alice Wonder","country":"USA","province":"CA","#,
        r#""city":"San Francisco","street":"Market St"}"#
    );
    const MZ: &str = concat!(
        r#"{"name":"MZ RME","phone":"13800000002","country":"USA","province":"NY","#,
        r#""city":"New York","street":"5th Ave"}"#
    );
    const GRACE: &str = concat!(
        r#"{"name":"Grace Lee","phone":"13800000003","country":"Canada","province":"ON","#,
        r#""city":"Toronto","street":"King St"}"#
    );

    fn app() -> Router {
        router(AppState::new(Database::open_memory().unwrap()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let body = body
            .map(|b| Body::from(b.to_string()))
            .unwrap_or_else(Body::empty);
        let req = builder.body(body).unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn create(app: &Router, body: &str) -> Contact {
        let (status, text) = send(app, Method::POST, "/contacts", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{text}");
        serde_json::from_str(&text).unwrap()
    }

    async fn seed(app: &Router) {
        create(app, MZ).await;
        create(app, GRACE).await;
        create(app, ALICE).await;
    }

    fn names(text: &str) -> Vec<String> {
        let contacts: Vec<Contact> = serde_json::from_str(text).unwrap();
        contacts.into_iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("0"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("-3"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("abc"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id("1.5"), Err(ApiError::InvalidId)));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, text) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_create_computes_address() {
        let app = app();
        let contact = create(&app, ALICE).await;
        assert!(contact.id > 0);
        assert_eq!(contact.address, "USA CA San Francisco Market St");
        assert_eq!(contact.phone, "");
    }

    #[tokio::test]
    async fn test_create_whitespace_name_is_bad_request() {
        let body = Some(r#"{"name":"  "}"#);
        let (status, text) = send(&app(), Method::POST, "/contacts", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid request body: name");
    }

    #[tokio::test]
    async fn test_create_unparseable_body_is_bad_request() {
        let app = app();
        let (status, text) = send(&app, Method::POST, "/contacts", Some("{oops")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid request body");

        let (status, _) = send(&app, Method::POST, "/contacts", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let app = app();
        seed(&app).await;

        let (status, text) = send(&app, Method::GET, "/contacts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&text), vec!["Alice Wonder", "Grace Lee", "MZ RME"]);
    }

    #[tokio::test]
    async fn test_list_empty_book() {
        let (status, text) = send(&app(), Method::GET, "/contacts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "[]");
    }

    #[tokio::test]
    async fn test_search_by_city() {
        let app = app();
        seed(&app).await;

        let (status, text) = send(&app, Method::GET, "/contacts?q=toronto", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&text), vec!["Grace Lee"]);

        let (_, text) = send(&app, Method::GET, "/contacts?query=usa", None).await;
        assert_eq!(names(&text), vec!["Alice Wonder", "MZ RME"]);

        let (status, text) = send(&app, Method::GET, "/contacts?q=Berlin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "[]");

        let (_, text) = send(&app, Method::GET, "/contacts?q=", None).await;
        assert_eq!(names(&text).len(), 3);
    }

    #[tokio::test]
    async fn test_search_repeated_key_uses_first_value() {
        let app = app();
        seed(&app).await;

        let (status, text) = send(&app, Method::GET, "/contacts?q=Toronto&q=x", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&text), vec!["Grace Lee"]);

        let uri = "/contacts?query=King&query=x&q=New%20York";
        let (status, text) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&text), vec!["MZ RME"]);
    }

    #[test]
    fn test_search_term_precedence() {
        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
        assert_eq!(search_term(&[]), None);
        assert_eq!(
            search_term(&[pair("query", "b"), pair("q", "a"), pair("q", "c")]),
            Some("a".to_string())
        );
        assert_eq!(
            search_term(&[pair("page", "2"), pair("query", "b")]),
            Some("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let app = app();
        let created = create(&app, r#"{"name":"Grace Lee","city":"Toronto"}"#).await;

        let uri = format!("/contacts/{}", created.id);
        let (status, text) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Contact = serde_json::from_str(&text).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let app = app();
        let (status, text) = send(&app, Method::GET, "/contacts/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(text, "Not found");

        let (status, _) = send(&app, Method::GET, "/contacts/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_patch_city_keeps_other_location_parts() {
        let app = app();
        let created = create(&app, ALICE).await;

        let uri = format!("/contacts/{}", created.id);
        let (status, text) = send(&app, Method::PATCH, &uri, Some(r#"{"city":"Boston"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        let updated: Contact = serde_json::from_str(&text).unwrap();
        assert_eq!(updated.city, "Boston");
        assert_eq!(updated.country, "USA");
        assert_eq!(updated.address, "USA CA Boston Market St");

        let (_, text) = send(&app, Method::GET, &uri, None).await;
        let fetched: Contact = serde_json::from_str(&text).unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_patch_empty_object_leaves_record_unchanged() {
        let app = app();
        let created = create(&app, ALICE).await;
        let uri = format!("/contacts/{}", created.id);

        let (status, text) = send(&app, Method::PATCH, &uri, Some("{}")).await;
        assert_eq!(status, StatusCode::OK);
        let updated: Contact = serde_json::from_str(&text).unwrap();
        assert_eq!(updated, created);
        assert_eq!(updated.address, "USA CA San Francisco Market St");
    }

    #[tokio::test]
    async fn test_create_ignores_client_id_and_address() {
        let app = app();
        let body = r#"{"name":"Grace Lee","city":"Toronto","id":99,"address":"Nowhere"}"#;
        let created = create(&app, body).await;
        assert_ne!(created.id, 99);
        assert_eq!(created.address, "Toronto");

        let (status, _) = send(&app, Method::GET, "/contacts/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let uri = format!("/contacts/{}", created.id);
        let (_, text) = send(&app, Method::GET, &uri, None).await;
        let fetched: Contact = serde_json::from_str(&text).unwrap();
        assert_eq!(fetched.address, "Toronto");
    }

    #[tokio::test]
    async fn test_patch_errors() {
        let app = app();
        let created = create(&app, r#"{"name":"Grace Lee"}"#).await;
        let uri = format!("/contacts/{}", created.id);

        let (status, _) = send(&app, Method::PATCH, &uri, Some("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::PATCH, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, text) = send(&app, Method::PATCH, &uri, Some(r#"{"phone":7}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(text, "Invalid request body: phone");

        let boston = Some(r#"{"city":"Boston"}"#);
        let (status, _) = send(&app, Method::PATCH, "/contacts/999", boston).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PATCH, "/contacts/zero", boston).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = app();
        let created = create(&app, r#"{"name":"Grace Lee"}"#).await;
        let uri = format!("/contacts/{}", created.id);

        let (status, text) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(text.is_empty());

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_invalid_id() {
        let app = app();
        for uri in ["/contacts/abc", "/contacts/0", "/contacts/-1"] {
            let (status, _) = send(&app, Method::DELETE, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }
}
