//! End-to-end tests for the HTTP API.
//!
//! Each test starts a real server on a free port, backed by an XML file in a
//! temporary directory, and talks to it with `reqwest`.

use contact_book::config::Config;
use contact_book::server::run_server;
use contact_book::storage::XmlFileStore;
use contact_book::store::Store;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

fn test_config_with_port(tmp: &TempDir, port: u16) -> Config {
    let storage_path = tmp.path().join("contacts.xml");
    let config_content = format!(
        r#"
[storage]
path = "{}"

[book]
name = "Test"

[server]
bind = "127.0.0.1:{}"
"#,
        storage_path.display(),
        port
    );
    toml::from_str(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

/// A running server plus what the tests need to reach it.
struct TestServer {
    _tmp: TempDir,
    base: String,
    storage_path: PathBuf,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = TempDir::new().unwrap();
        Self::start_in(tmp).await
    }

    async fn start_in(tmp: TempDir) -> Self {
        let port = find_free_port();
        let cfg = test_config_with_port(&tmp, port);
        let storage_path = cfg.storage.path.clone();
        let handle = tokio::spawn(async move {
            run_server(&cfg).await.ok();
        });
        wait_for_server(port).await;
        Self {
            _tmp: tmp,
            base: format!("http://127.0.0.1:{}", port),
            storage_path,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let body: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_find_update_remove_scenario() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let contacts = server.url("/contacts");

    // Create: the client-supplied id is ignored.
    let resp = client
        .post(&contacts)
        .json(&json!({"id": "mine", "name": "Ana", "phone": "555-1234"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-contact-book-persisted"], "saved");
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_ne!(id, "mine");
    assert_eq!(created["name"], "Ana");
    assert_eq!(created["phone"], "555-1234");
    assert!(created.get("email").is_none());

    // Find by name.
    let found: Value = client
        .get(&contacts)
        .query(&[("name", "Ana")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["id"], id.as_str());

    // Update the email only.
    let resp = client
        .put(&contacts)
        .query(&[("id", id.as_str())])
        .json(&json!({"email": "ana@x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["email"], "ana@x.com");
    assert_eq!(updated["name"], "Ana");
    assert_eq!(updated["phone"], "555-1234");

    // The file reflects the update.
    let xml = std::fs::read_to_string(&server.storage_path).unwrap();
    assert!(xml.contains("<email>ana@x.com</email>"));
    assert!(xml.contains(&format!("<uuid>{}</uuid>", id)));

    // Remove by name.
    let resp = client
        .delete(&contacts)
        .query(&[("name", "Ana")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let removed: Value = resp.json().await.unwrap();
    assert_eq!(removed.as_array().unwrap().len(), 1);
    assert_eq!(removed[0]["id"], id.as_str());

    let all: Value = client
        .get(&contacts)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_find_filters_combine_and_accept_uuid_alias() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let contacts = server.url("/contacts");

    for (name, last) in [("Ana", "Lopez"), ("Ana", "Ruiz"), ("Bo", "Lopez")] {
        client
            .post(&contacts)
            .json(&json!({"name": name, "lastName": last}))
            .send()
            .await
            .unwrap();
    }

    let lopez: Value = client
        .get(&contacts)
        .query(&[("lastName", "Lopez")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = lopez
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana", "Bo"]);

    let ana_ruiz: Value = client
        .get(&contacts)
        .query(&[("name", "Ana"), ("lastName", "Ruiz")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ana_ruiz.as_array().unwrap().len(), 1);

    let id = ana_ruiz[0]["id"].as_str().unwrap();
    let by_uuid: Value = client
        .get(&contacts)
        .query(&[("uuid", id)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_uuid[0]["lastName"], "Ruiz");
}

#[tokio::test]
async fn test_invalid_fields_are_dropped_not_rejected() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(server.url("/contacts"))
        .json(&json!({"name": "Ana", "email": "not-an-email", "phone": "abc"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-contact-book-rejected"], "email,phone");
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["name"], "Ana");
    assert!(created.get("email").is_none());
    assert!(created.get("phone").is_none());
}

#[tokio::test]
async fn test_bad_requests() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let contacts = server.url("/contacts");

    // POST without body.
    let resp = client.post(&contacts).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");

    // POST with a JSON null.
    let resp = client
        .post(&contacts)
        .header("content-type", "application/json")
        .body("null")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // POST with malformed JSON.
    let resp = client
        .post(&contacts)
        .header("content-type", "application/json")
        .body("{\"name\":")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // PUT without id.
    let resp = client
        .put(&contacts)
        .json(&json!({"name": "X"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]["message"].as_str().unwrap().contains("id"));

    // PUT with an empty id.
    let resp = client
        .put(format!("{}?id=", contacts))
        .json(&json!({"name": "X"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // PUT without body.
    let resp = client
        .put(&contacts)
        .query(&[("id", "abc")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Nothing was stored by any of the above.
    let all: Value = client
        .get(&contacts)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all, json!([]));
    assert!(!server.storage_path.exists());
}

#[tokio::test]
async fn test_update_unknown_id_returns_null() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(server.url("/contacts"))
        .query(&[("id", "does-not-exist")])
        .json(&json!({"name": "Ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-contact-book-persisted"], "unchanged");
    let body: Value = resp.json().await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_delete_without_match_returns_empty() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let contacts = server.url("/contacts");

    client
        .post(&contacts)
        .json(&json!({"name": "Ana"}))
        .send()
        .await
        .unwrap();

    let resp = client
        .delete(&contacts)
        .query(&[("name", "Nobody")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["x-contact-book-persisted"], "unchanged");
    let removed: Value = resp.json().await.unwrap();
    assert_eq!(removed, json!([]));
}

#[tokio::test]
async fn test_contacts_survive_restart() {
    let tmp = TempDir::new().unwrap();
    let storage_path = tmp.path().join("contacts.xml");

    // Seed the file through the store, as a previous run would have.
    let store = XmlFileStore::new(&storage_path);
    let mut seeded = contact_book::ContactCollection::new("Seeded");
    seeded.add(contact_book::ContactRecord::new().with_name("Ana"));
    store.save(&seeded).await.unwrap();
    let id = seeded.records()[0].id().unwrap().to_string();

    let server = TestServer::start_in(tmp).await;
    let client = reqwest::Client::new();
    let found: Value = client
        .get(server.url("/contacts"))
        .query(&[("id", id.as_str())])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found[0]["name"], "Ana");

    client
        .post(server.url("/contacts"))
        .json(&json!({"name": "Bo"}))
        .send()
        .await
        .unwrap();

    let reloaded = store.load("unused").await.unwrap();
    assert_eq!(reloaded.name(), "Seeded");
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.records()[0].id(), Some(id.as_str()));
    assert_eq!(reloaded.records()[1].name(), Some("Bo"));
}

#[tokio::test]
async fn test_generate_does_not_touch_the_book() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(server.url("/generate/Sample/5"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Sample");
    let contacts = body["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 5);
    assert!(contacts.iter().all(|c| c["id"].is_string()));

    let too_many = client
        .get(server.url("/generate/Sample/1000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(too_many.status(), 400);
    let body: Value = too_many.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("count must be at most 10000"));

    let all: Value = client
        .get(server.url("/contacts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all, json!([]));
}
