//! Firestore REST backend.
//!
//! Documents are read with `GET` and replaced with `PATCH` (no update mask,
//! so the whole document is overwritten). Field values travel in
//! Firestore's typed JSON encoding, handled by [`encode_document`] and
//! [`decode_document`].

use crate::config::FirestoreConfig;
use crate::errors::StoreError;
use crate::models::{CalendarCell, YearDocument, YearGrid};
use crate::storage::{DocumentStore, YEARS_COLLECTION};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value, json};
use tracing::debug;

pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn document_url(&self, id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}?key={}",
            self.config.base_url, self.config.project_id, YEARS_COLLECTION, id, self.config.api_key
        )
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, id: &str) -> Result<Option<YearDocument>, StoreError> {
        let response = self.client.get(self.document_url(id)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("firestore document {YEARS_COLLECTION}/{id} not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        decode_document(&body).map(Some)
    }

    async fn set(&self, id: &str, document: &YearDocument) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.document_url(id))
            .json(&encode_document(document))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

pub fn encode_document(document: &YearDocument) -> Value {
    let values: Vec<Value> = document
        .calendar_data
        .slots()
        .iter()
        .map(|slot| match slot {
            None => json!({ "nullValue": null }),
            Some(cell) => json!({
                "mapValue": {
                    "fields": {
                        "date": { "stringValue": cell.date },
                        "isChecked": { "booleanValue": cell.is_checked },
                    }
                }
            }),
        })
        .collect();

    json!({
        "fields": {
            "calendarData": { "arrayValue": { "values": values } }
        }
    })
}

pub fn decode_document(body: &Value) -> Result<YearDocument, StoreError> {
    let array = body
        .pointer("/fields/calendarData/arrayValue")
        .ok_or_else(|| malformed("missing calendarData array"))?;

    // Firestore drops `values` for an empty array.
    let slots = match array.get("values") {
        None => Vec::new(),
        Some(Value::Array(values)) => values
            .iter()
            .map(decode_slot)
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(malformed("arrayValue.values is not a list")),
    };

    Ok(YearDocument {
        calendar_data: YearGrid::from_slots(slots),
    })
}

fn decode_slot(value: &Value) -> Result<Option<CalendarCell>, StoreError> {
    if value.get("nullValue").is_some() {
        return Ok(None);
    }
    let fields = value
        .pointer("/mapValue/fields")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("slot is neither null nor a map"))?;

    Ok(Some(CalendarCell {
        date: string_field(fields, "date")?,
        is_checked: fields
            .get("isChecked")
            .and_then(|field| field.get("booleanValue"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }))
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<String, StoreError> {
    fields
        .get(name)
        .and_then(|field| field.get("stringValue"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed(&format!("cell is missing string field '{name}'")))
}

fn malformed(message: &str) -> StoreError {
    StoreError::Malformed(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fresh_grid;
    use crate::models::GridYear;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode as HttpStatus,
        response::{IntoResponse, Response},
        routing::get,
    };
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::Mutex;

    type Documents = Arc<Mutex<HashMap<String, Value>>>;

    /// Minimal stand-in for the Firestore documents endpoint.
    /// Document id "0403" always answers 403.
    async fn spawn_fake_firestore() -> (String, Documents) {
        async fn read(
            State(docs): State<Documents>,
            Path((project, database, id)): Path<(String, String, String)>,
        ) -> Response {
            if id == "0403" {
                return (HttpStatus::FORBIDDEN, "permission denied").into_response();
            }
            match docs.lock().await.get(&id) {
                Some(fields) => {
                    let mut body = fields.clone();
                    body["name"] = json!(format!(
                        "projects/{project}/databases/{database}/documents/years/{id}"
                    ));
                    Json(body).into_response()
                }
                None => (HttpStatus::NOT_FOUND, "not found").into_response(),
            }
        }

        async fn write(
            State(docs): State<Documents>,
            Path((_project, _database, id)): Path<(String, String, String)>,
            Json(body): Json<Value>,
        ) -> Response {
            if id == "0403" {
                return (HttpStatus::FORBIDDEN, "permission denied").into_response();
            }
            docs.lock().await.insert(id, body.clone());
            Json(body).into_response()
        }

        let docs = Documents::default();
        let app = Router::new()
            .route(
                "/v1/projects/:project/databases/:database/documents/years/:id",
                get(read).patch(write),
            )
            .with_state(Arc::clone(&docs));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), docs)
    }

    fn store() -> FirestoreStore {
        store_at("http://localhost:8081")
    }

    fn store_at(base_url: &str) -> FirestoreStore {
        FirestoreStore::new(FirestoreConfig {
            api_key: "abc".to_string(),
            project_id: "habits".to_string(),
            base_url: base_url.to_string(),
            auth_domain: None,
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
            measurement_id: None,
        })
        .unwrap()
    }

    #[test]
    fn document_url_targets_years_collection() {
        assert_eq!(
            store().document_url("2024"),
            "http://localhost:8081/v1/projects/habits/databases/(default)/documents/years/2024?key=abc"
        );
    }

    #[test]
    fn encodes_padding_and_cells() {
        let document = YearDocument {
            calendar_data: YearGrid::from_slots(vec![
                None,
                Some(CalendarCell {
                    date: "Monday, Jan 1, 2024".to_string(),
                    is_checked: true,
                }),
            ]),
        };
        let encoded = encode_document(&document);
        let values = encoded
            .pointer("/fields/calendarData/arrayValue/values")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(values[0], json!({ "nullValue": null }));
        assert_eq!(
            values[1].pointer("/mapValue/fields/isChecked/booleanValue"),
            Some(&json!(true))
        );
    }

    #[test]
    fn decodes_a_fetched_document() {
        let body = json!({
            "name": "projects/habits/databases/(default)/documents/years/2024",
            "fields": {
                "calendarData": {
                    "arrayValue": {
                        "values": [
                            { "nullValue": null },
                            { "mapValue": { "fields": {
                                "date": { "stringValue": "Monday, Jan 1, 2024" },
                                "isChecked": { "booleanValue": true }
                            } } },
                            { "mapValue": { "fields": {
                                "date": { "stringValue": "Tuesday, Jan 2, 2024" }
                            } } }
                        ]
                    }
                }
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        });

        let document = decode_document(&body).unwrap();
        let grid = &document.calendar_data;
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.get(0), None);
        assert!(grid.get(1).unwrap().is_checked);
        assert!(!grid.get(2).unwrap().is_checked);
    }

    #[test]
    fn full_year_survives_encoding() {
        let document = YearDocument {
            calendar_data: fresh_grid(GridYear::new(2025).unwrap()),
        };
        assert_eq!(decode_document(&encode_document(&document)).unwrap(), document);
    }

    #[test]
    fn empty_array_omits_values() {
        let body = json!({ "fields": { "calendarData": { "arrayValue": {} } } });
        assert!(decode_document(&body).unwrap().calendar_data.is_empty());
    }

    #[test]
    fn rejects_documents_without_calendar_data() {
        let body = json!({ "fields": {} });
        assert!(matches!(decode_document(&body), Err(StoreError::Malformed(_))));
    }

    #[tokio::test]
    async fn missing_remote_document_is_absent() {
        let (base_url, _docs) = spawn_fake_firestore().await;
        assert_eq!(store_at(&base_url).get("2025").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rejected_requests_surface_status() {
        let (base_url, _docs) = spawn_fake_firestore().await;
        let store = store_at(&base_url);
        let document = YearDocument {
            calendar_data: fresh_grid(GridYear::new(2024).unwrap()),
        };

        match store.get("0403").await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body, "permission denied");
            }
            other => panic!("unexpected read result {other:?}"),
        }
        assert!(matches!(
            store.set("0403", &document).await,
            Err(StoreError::Status { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn patch_replaces_the_whole_document() {
        let (base_url, docs) = spawn_fake_firestore().await;
        let store = store_at(&base_url);
        let year = GridYear::new(2024).unwrap();
        let mut grid = fresh_grid(year);

        store
            .set("2024", &YearDocument { calendar_data: grid.clone() })
            .await
            .unwrap();
        grid.toggle(1);
        grid.toggle(2);
        let latest = YearDocument { calendar_data: grid };
        store.set("2024", &latest).await.unwrap();

        let sent = docs.lock().await.get("2024").cloned().unwrap();
        assert_eq!(sent, encode_document(&latest));
        assert_eq!(decode_document(&sent).unwrap(), latest);
        assert_eq!(store.get("2024").await.unwrap(), Some(latest));
    }
}
