use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

/// How the stub answers.
#[derive(Debug, Clone, Default)]
pub struct PaperStubConfig {
    /// Folder paths by document id; documents missing here have no folders.
    pub folders: Vec<(&'static str, Vec<&'static str>)>,
    /// Titles by document id.
    pub titles: Vec<(&'static str, &'static str)>,
    /// Answer `docs/get_metadata` for this id with a 409.
    pub fail_metadata_for: Option<&'static str>,
    /// Sleep before answering every request.
    pub delay: Option<Duration>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub api_arg: Option<String>,
    pub body: String,
}

pub struct PaperStub {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PaperStub {
    pub fn spawn(config: PaperStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start paper stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/2/paper");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let authorization = header("Authorization");
            let content_type = header("Content-Type");
            let api_arg = header("Dropbox-API-Arg");

            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let path = request.url().to_string();

            recorded.lock().unwrap().push(RecordedRequest {
                path: path.clone(),
                authorization: authorization.clone(),
                content_type,
                api_arg: api_arg.clone(),
                body: body.clone(),
            });

            if let Some(delay) = config.delay {
                thread::sleep(delay);
            }

            let (status, response_body) =
                answer(&config, &path, authorization.as_deref(), &body, api_arg.as_deref());
            let _ = request.respond(
                tiny_http::Response::from_string(response_body).with_status_code(status),
            );
        });

        PaperStub {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for PaperStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn answer(
    config: &PaperStubConfig,
    path: &str,
    authorization: Option<&str>,
    body: &str,
    api_arg: Option<&str>,
) -> (u16, String) {
    if authorization != Some(format!("Bearer {TOKEN}").as_str()) {
        return (401, "invalid_access_token/.".to_string());
    }

    let doc_id = |raw: &str| -> Option<String> {
        serde_json::from_str::<Value>(raw)
            .ok()?
            .get("doc_id")?
            .as_str()
            .map(str::to_string)
    };

    match path {
        "/2/paper/docs/list" => {
            let ids: Vec<&str> = config.folders.iter().map(|(id, _)| *id).collect();
            (200, json!({ "doc_ids": ids, "has_more": false }).to_string())
        }
        "/2/paper/docs/get_folder_info" => {
            let Some(id) = doc_id(body) else {
                return (400, "missing doc_id".to_string());
            };
            let folders = config
                .folders
                .iter()
                .find(|(doc, _)| *doc == id)
                .map(|(_, names)| names.clone())
                .unwrap_or_default();
            if folders.is_empty() {
                return (200, json!({ "folder_sharing_policy_type": "team" }).to_string());
            }
            let folders: Vec<Value> = folders
                .iter()
                .enumerate()
                .map(|(i, name)| json!({ "id": format!("e.{i}"), "name": name }))
                .collect();
            (
                200,
                json!({ "folder_sharing_policy_type": "team", "folders": folders }).to_string(),
            )
        }
        "/2/paper/docs/get_metadata" => {
            let Some(id) = doc_id(body) else {
                return (400, "missing doc_id".to_string());
            };
            if config.fail_metadata_for == Some(id.as_str()) {
                return (409, "{\"error_summary\": \"doc_not_found/..\"}".to_string());
            }
            let title = config
                .titles
                .iter()
                .find(|(doc, _)| *doc == id)
                .map(|(_, title)| *title)
                .unwrap_or("Untitled");
            (
                200,
                json!({
                    "doc_id": id,
                    "owner": "dm@example.com",
                    "title": title,
                    "revision": 3,
                    "status": { ".tag": "active" }
                })
                .to_string(),
            )
        }
        "/2/paper/docs/download" => {
            let Some(id) = api_arg.and_then(doc_id) else {
                return (400, "missing Dropbox-API-Arg".to_string());
            };
            if !body.is_empty() {
                return (400, "download takes no body".to_string());
            }
            (200, format!("# {id}\n\nExported as markdown.\n"))
        }
        _ => (404, "not found".to_string()),
    }
}
