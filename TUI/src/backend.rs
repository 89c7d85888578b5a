// Backend communication with the recipe lookup service over HTTP

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::link::encode_component;
use crate::types::LookupResult;

const LOOKUP_PATH: &str = "/cook/check-by-input";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("请输入菜名或描述")]
    EmptyQuery,

    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    #[error("服务返回 {0}")]
    Status(StatusCode),

    #[error("无法解析返回内容: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can turn a query into a recipe or a list of suggestions.
pub trait RecipeLookup: Send + Sync + 'static {
    fn lookup(
        &self,
        query: String,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send;
}

pub struct RecipeClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecipeClient {
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn lookup_url(&self, query: &str) -> String {
        lookup_url(&self.base_url, query)
    }
}

pub fn lookup_url(base_url: &str, query: &str) -> String {
    format!(
        "{}{}?input={}",
        base_url.trim_end_matches('/'),
        LOOKUP_PATH,
        encode_component(query)
    )
}

impl RecipeLookup for RecipeClient {
    fn lookup(
        &self,
        query: String,
    ) -> impl Future<Output = Result<LookupResult, LookupError>> + Send {
        let http = self.http.clone();
        let url = self.lookup_url(&query);

        async move {
            if query.trim().is_empty() {
                return Err(LookupError::EmptyQuery);
            }

            debug!(%url, "GET");
            let response = http.get(&url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(LookupError::Status(status));
            }

            let body = response.bytes().await?;
            parse_body(&body)
        }
    }
}

/// Decode a response body and classify it.
pub fn parse_body(body: &[u8]) -> Result<LookupResult, LookupError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    Ok(LookupResult::from_value(value)?)
}

/// A lookup to run, tagged with the id the controller expects back.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub id: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct Completion {
    pub id: u64,
    pub outcome: Result<LookupResult, LookupError>,
}

/// Runs lookups on the tokio runtime and queues their completions for the
/// UI loop, which never blocks on the network.
pub struct Dispatcher<L> {
    lookup: Arc<L>,
    handle: Handle,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl<L: RecipeLookup> Dispatcher<L> {
    pub fn new(lookup: L, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            lookup: Arc::new(lookup),
            handle,
            tx,
            rx,
        }
    }

    pub fn dispatch(&self, request: LookupRequest) {
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let outcome = lookup.lookup(request.query).await;
            if tx.send(Completion { id: request.id, outcome }).is_err() {
                warn!(id = request.id, "UI gone before lookup completed");
            }
        });
    }

    /// Next finished lookup, if any.
    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }
}
