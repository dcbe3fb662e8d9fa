use crate::foundation::error::{LeafError, LeafResult};
use reqwest::Url;
use std::cell::RefCell;
use std::collections::HashMap;

/// Blocking GET of a URL's body.
pub trait Transport {
    fn get(&self, url: &Url) -> LeafResult<Vec<u8>>;
}

/// Production transport backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> LeafResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_owned())
            .build()
            .map_err(|e| LeafError::http(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> LeafResult<Vec<u8>> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| LeafError::http(format!("GET {url}: {e}")))?;
        let body = resp
            .bytes()
            .map_err(|e| LeafError::http(format!("read body of {url}: {e}")))?;
        Ok(body.to_vec())
    }
}

/// Canned responses keyed by full URL, for offline runs and tests. Records every request.
#[derive(Debug, Default)]
pub struct StaticTransport {
    responses: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), body.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for StaticTransport {
    fn get(&self, url: &Url) -> LeafResult<Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| LeafError::http(format!("GET {url}: 404 Not Found")))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> LeafResult<Vec<u8>> {
        (**self).get(url)
    }
}
