//! Canned catalog data and wire bodies

use pawfetch_catalog::{Dog, DogId};

/// A dog with predictable fields derived from `id`
#[must_use]
pub fn dog(id: &str, name: &str) -> Dog {
    Dog {
        id: DogId::new(id),
        name: name.to_string(),
        breed: "Beagle".to_string(),
        age: 3,
        zip_code: "10001".to_string(),
        img: format!("https://img.example.com/{id}.jpg"),
    }
}

/// Body of `GET /dogs/search`
#[must_use]
pub fn search_body(ids: &[&str], total: u64) -> String {
    serde_json::json!({ "resultIds": ids, "total": total }).to_string()
}

/// Body of `POST /dogs`
#[must_use]
pub fn dogs_body(dogs: &[Dog]) -> String {
    serde_json::to_string(dogs).unwrap_or_default()
}

/// Body of `POST /dogs/match`
#[must_use]
pub fn match_body(id: &str) -> String {
    serde_json::json!({ "match": id }).to_string()
}

/// Body of `GET /dogs/breeds`
#[must_use]
pub fn breeds_body(breeds: &[&str]) -> String {
    serde_json::json!(breeds).to_string()
}

/// Stored form of a signed-in user, fields in declaration order
#[must_use]
pub fn user_json(name: &str, email: &str) -> String {
    format!(r#"{{"name":{},"email":{}}}"#, serde_json::Value::from(name), serde_json::Value::from(email))
}
