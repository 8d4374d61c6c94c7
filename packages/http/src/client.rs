use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::blocking::Client;
use serde_json::{json, Value};
use url::Url;

use superstar_core_store::Path;
use superstar_rpc::{Request, Response};

use crate::error::Error;

/// A blocking client for a Superstar server.
///
/// Reads go through `GET /<prefix>/<path>`, mutations through JSON-RPC
/// POSTs to `/<prefix>/`.
///
/// # Example
///
/// ```ignore
/// use superstar_http::SuperstarClient;
/// use superstar_core_store::path;
///
/// let client = SuperstarClient::new("http://127.0.0.1:8081")?;
/// client.set(&path!("uaf/demo/pilot"), json!({"power": {"L": 10, "R": -10}}))?;
/// let pilot = client.get(&path!("uaf/demo/pilot"))?;
/// ```
pub struct SuperstarClient {
    client: Client,
    base_url: Url,
    prefix: String,
    next_id: AtomicU64,
}

impl SuperstarClient {
    /// Create a client for the server at `base_url`, using the default
    /// `superstar` prefix.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client with a custom reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            prefix: "superstar".to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.trim_matches('/').to_string();
        self
    }

    fn url_for(&self, path: &Path) -> Result<Url, Error> {
        let mut target = format!("{}/", self.prefix);
        let encoded: Vec<_> = path.iter().map(|c| urlencoding::encode(c)).collect();
        target.push_str(&encoded.join("/"));
        Ok(self.base_url.join(&target)?)
    }

    /// Fetch the node at `path`; `null` when nothing is there.
    pub fn get(&self, path: &Path) -> Result<Value, Error> {
        let response = self.client.get(self.url_for(path)?).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Run one RPC and return its result.
    ///
    /// A structured RPC failure comes back as [`Error::Rpc`].
    pub fn call(&self, method: &str, params: Value) -> Result<Value, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::new(method, params, id);

        let response = self
            .client
            .post(self.url_for(&Path::root())?)
            .json(&request)
            .send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response = serde_json::from_str(&body)?;
        Ok(response.into_result()?)
    }

    /// Replace the node at `path`.
    pub fn set(&self, path: &Path, value: Value) -> Result<(), Error> {
        self.call("set", json!({"path": path.to_string(), "value": value}))?;
        Ok(())
    }

    /// List the child keys of the node at `path`.
    pub fn sub(&self, path: &Path) -> Result<Vec<String>, Error> {
        let result = self.call("sub", json!({"path": path.to_string()}))?;
        Ok(serde_json::from_value(result)?)
    }
}
