//! In-memory stand-in for the resource server
//!
//! Implements the gateway trait over a mutable map per collection, records
//! every call, and can be told to reject requests matching a verb and path
//! prefix. Stored records use the server's read wire shape, so the typed
//! layers above deserialize them exactly as they would real responses.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use atheneum_client::error::{ClientError, ClientResult};
use atheneum_client::gateway::{Gateway, GatewayResponse, Method};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
}

#[derive(Default)]
struct State {
    books: BTreeMap<i32, Value>,
    authors: BTreeMap<i32, Value>,
    genres: BTreeMap<i32, Value>,
    loans: BTreeMap<i32, Value>,
    users: BTreeMap<i32, Value>,
    events: BTreeMap<i32, Value>,
    external_results: Vec<Value>,
    next_id: i32,
    calls: Vec<Call>,
    failures: Vec<(Method, String, u16)>,
}

pub struct FakeGateway {
    state: Mutex<State>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..State::default()
            }),
        }
    }

    // Seeding

    pub fn seed_author(&self, id: i32, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.authors.insert(
            id,
            json!({"id": id, "name": name, "nationality": null, "birthDate": null}),
        );
    }

    pub fn seed_genre(&self, id: i32, name: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .genres
            .insert(id, json!({"id": id, "name": name, "description": null}));
    }

    pub fn seed_user(&self, id: i32, username: &str) {
        let mut state = self.state.lock().unwrap();
        state.users.insert(
            id,
            json!({"id": id, "username": username, "isActive": true}),
        );
    }

    pub fn seed_book(
        &self,
        id: i32,
        title: &str,
        isbn: &str,
        published_date: &str,
        available: bool,
        author_id: i32,
        genre_id: i32,
    ) {
        let mut state = self.state.lock().unwrap();
        let author = state.authors.get(&author_id).cloned().unwrap_or(json!(null));
        let genre = state.genres.get(&genre_id).cloned().unwrap_or(json!(null));
        state.books.insert(
            id,
            json!({
                "id": id,
                "title": title,
                "isbn": isbn,
                "published_date": published_date,
                "available": available,
                "author": author,
                "genre": genre,
            }),
        );
    }

    pub fn set_external_results(&self, results: Vec<Value>) {
        self.state.lock().unwrap().external_results = results;
    }

    /// Reject every matching request with the given status from now on.
    pub fn fail_on(&self, method: Method, path_prefix: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((method, path_prefix.to_string(), status));
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    // Inspection

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.method.is_mutation())
            .collect()
    }

    pub fn book(&self, id: i32) -> Option<Value> {
        self.state.lock().unwrap().books.get(&id).cloned()
    }

    pub fn delete_book_out_of_band(&self, id: i32) {
        self.state.lock().unwrap().books.remove(&id);
    }

    pub fn loan_ids(&self) -> Vec<i32> {
        self.state
            .lock()
            .unwrap()
            .loans
            .keys()
            .copied()
            .collect()
    }

    pub fn author_count(&self) -> usize {
        self.state.lock().unwrap().authors.len()
    }

    // Wire-shape conversions (write payload -> stored read record)

    fn book_record(state: &State, id: i32, payload: &Value) -> Value {
        let author_id = payload["authorId"].as_i64().unwrap_or(0) as i32;
        let genre_id = payload["genreId"].as_i64().unwrap_or(0) as i32;
        json!({
            "id": id,
            "title": payload["title"],
            "isbn": payload["isbn"],
            "published_date": payload["publishedDate"],
            "available": payload["available"],
            "author": state.authors.get(&author_id).cloned().unwrap_or(json!(null)),
            "genre": state.genres.get(&genre_id).cloned().unwrap_or(json!(null)),
        })
    }

    fn loan_record(state: &State, id: i32, payload: &Value) -> Value {
        let book_id = payload["bookId"].as_i64().unwrap_or(0) as i32;
        let book_title = state
            .books
            .get(&book_id)
            .map(|b| b["title"].clone())
            .unwrap_or(json!(null));
        json!({
            "id": id,
            "loan_date": payload["loanDate"],
            "due_date": payload["dueDate"],
            "return_date": payload["returnDate"],
            "user_id": payload["userId"],
            "book_id": payload["bookId"],
            "book_title": book_title,
            "loan_status_id": payload["statusId"],
            "loan_status_name": "active",
        })
    }

    fn author_record(id: i32, payload: &Value) -> Value {
        json!({
            "id": id,
            "name": payload["name"],
            "nationality": payload["nationality"],
            "birthDate": payload["birthDate"],
        })
    }

    fn user_record(id: i32, payload: &Value) -> Value {
        // Writes carry `userName` and a plain password; reads use `username`,
        // omit the password, and nest the role.
        json!({
            "id": id,
            "username": payload["userName"],
            "firstName": payload["firstName"],
            "lastName": payload["lastName"],
            "email": payload["email"],
            "isActive": true,
            "role": {"id": payload["roleId"], "name": null},
        })
    }

    fn passthrough_record(id: i32, payload: &Value) -> Value {
        let mut record = payload.clone();
        record["id"] = json!(id);
        record
    }

    fn search_result(state: &State, query: &str) -> Value {
        let needle = query.to_lowercase();
        let books: Vec<Value> = state
            .books
            .values()
            .filter(|b| {
                b["title"]
                    .as_str()
                    .map(|t| t.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        let authors: Vec<Value> = state
            .authors
            .values()
            .filter(|a| {
                a["name"]
                    .as_str()
                    .map(|n| n.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        json!({"books": books, "authors": authors})
    }
}

fn ok(body: Value) -> ClientResult<GatewayResponse> {
    Ok(GatewayResponse { status: 200, body })
}

fn not_found(path: &str) -> ClientResult<GatewayResponse> {
    Err(ClientError::Rejected {
        status: 404,
        message: format!("no resource at {}", path),
    })
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<GatewayResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            method,
            path: path.to_string(),
        });

        if let Some((_, _, status)) = state
            .failures
            .iter()
            .find(|(m, prefix, _)| *m == method && path.starts_with(prefix.as_str()))
        {
            return Err(ClientError::Rejected {
                status: *status,
                message: "injected failure".to_string(),
            });
        }

        let (route, query) = match path.split_once('?') {
            Some((route, query)) => (route.trim_end_matches('/'), query),
            None => (path.trim_end_matches('/'), ""),
        };

        if route == "/search" {
            let needle = query
                .strip_prefix("query=")
                .map(|q| urlencoding::decode(q).unwrap_or_default().into_owned())
                .unwrap_or_default();
            return ok(Self::search_result(&state, &needle));
        }
        if route == "/external-books/search" {
            return ok(json!({"results": state.external_results.clone()}));
        }

        let mut segments = route.trim_start_matches('/').splitn(2, '/');
        let collection = segments.next().unwrap_or_default().to_string();
        let id: Option<i32> = segments.next().and_then(|s| s.parse().ok());

        // Needed before borrowing the collection map mutably.
        let record = |state: &State, id: i32, payload: &Value| match collection.as_str() {
            "books" => Self::book_record(state, id, payload),
            "loans" => Self::loan_record(state, id, payload),
            "authors" => Self::author_record(id, payload),
            "users" => Self::user_record(id, payload),
            _ => Self::passthrough_record(id, payload),
        };

        match (method, id) {
            (Method::Get, None) => {
                let map = collection_map(&state, &collection).ok_or_else(|| reject(path))?;
                ok(Value::Array(map.values().cloned().collect()))
            }
            (Method::Get, Some(id)) => {
                let map = collection_map(&state, &collection).ok_or_else(|| reject(path))?;
                match map.get(&id) {
                    Some(value) => ok(value.clone()),
                    None => not_found(path),
                }
            }
            (Method::Post, None) => {
                let payload = body.unwrap_or(Value::Null);
                state.next_id += 1;
                let id = state.next_id;
                let stored = record(&state, id, &payload);
                let map =
                    collection_map_mut(&mut state, &collection).ok_or_else(|| reject(path))?;
                map.insert(id, stored.clone());
                Ok(GatewayResponse {
                    status: 201,
                    body: stored,
                })
            }
            (Method::Put, Some(id)) => {
                let payload = body.unwrap_or(Value::Null);
                let exists = collection_map(&state, &collection)
                    .ok_or_else(|| reject(path))?
                    .contains_key(&id);
                if !exists {
                    return not_found(path);
                }
                let stored = record(&state, id, &payload);
                let map =
                    collection_map_mut(&mut state, &collection).ok_or_else(|| reject(path))?;
                map.insert(id, stored.clone());
                ok(stored)
            }
            (Method::Delete, Some(id)) => {
                let map =
                    collection_map_mut(&mut state, &collection).ok_or_else(|| reject(path))?;
                match map.remove(&id) {
                    Some(_) => Ok(GatewayResponse {
                        status: 204,
                        body: Value::Null,
                    }),
                    None => not_found(path),
                }
            }
            _ => Err(reject(path)),
        }
    }
}

fn reject(path: &str) -> ClientError {
    ClientError::Rejected {
        status: 400,
        message: format!("unsupported request at {}", path),
    }
}

fn collection_map<'a>(state: &'a State, collection: &str) -> Option<&'a BTreeMap<i32, Value>> {
    match collection {
        "books" => Some(&state.books),
        "authors" => Some(&state.authors),
        "genres" => Some(&state.genres),
        "loans" => Some(&state.loans),
        "users" => Some(&state.users),
        "events" => Some(&state.events),
        _ => None,
    }
}

fn collection_map_mut<'a>(
    state: &'a mut State,
    collection: &str,
) -> Option<&'a mut BTreeMap<i32, Value>> {
    match collection {
        "books" => Some(&mut state.books),
        "authors" => Some(&mut state.authors),
        "genres" => Some(&mut state.genres),
        "loans" => Some(&mut state.loans),
        "users" => Some(&mut state.users),
        "events" => Some(&mut state.events),
        _ => None,
    }
}
