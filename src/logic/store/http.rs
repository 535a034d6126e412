//! HTTP object store
//!
//! Plain GET/PUT/HEAD against `<base_url>/<namespace>/<key>`, which covers
//! public or pre-authorized buckets and simple artifact servers.

use std::io::Read;
use std::time::Duration;

use super::{validate_key, ObjectStore, StoreError};

pub struct HttpStore {
    base_url: String,
    namespace: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpStore {
    pub fn new(base_url: &str, namespace: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: namespace.trim_matches('/').to_string(),
            token,
            agent,
        }
    }

    fn url_for(&self, key: &str) -> Result<String, StoreError> {
        validate_key(key)?;
        Ok(format!("{}/{}/{}", self.base_url, self.namespace, key))
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }
}

/// Map a ureq failure onto the store taxonomy
fn classify(key: &str, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(404, _) => StoreError::NotFound(key.to_string()),
        ureq::Error::Status(code, _) if code == 429 || code >= 500 => {
            StoreError::Unavailable(format!("HTTP {} for '{}'", code, key))
        }
        ureq::Error::Status(code, _) => StoreError::Http {
            status: code,
            key: key.to_string(),
        },
        transport => StoreError::Unavailable(transport.to_string()),
    }
}

impl ObjectStore for HttpStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let url = self.url_for(key)?;
        let response = self
            .authorize(self.agent.get(&url))
            .call()
            .map_err(|e| classify(key, e))?;

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| StoreError::Unavailable(format!("reading '{}': {}", key, e)))?;
        Ok(body)
    }

    fn put(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError> {
        let url = self.url_for(key)?;
        self.authorize(self.agent.put(&url))
            .set("Content-Type", content_type)
            .send_bytes(body)
            .map_err(|e| classify(key, e))?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let url = self.url_for(key)?;
        match self.authorize(self.agent.head(&url)).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(classify(key, e)),
        }
    }

    fn describe(&self) -> String {
        format!("http:{}/{}", self.base_url, self.namespace)
    }
}
