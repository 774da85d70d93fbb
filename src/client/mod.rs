//! Client layer: assembles URLs, sends requests through an [`HttpTransport`] and
//! hands response bodies to the transport codecs.

mod error;
mod pages;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::domain::{
    ApiToken, BatchCreate, BatchDeliveryReport, BatchFilter, BatchId, BatchResult, BatchUpdate,
    DeliveryReportQuery, GroupCreate, GroupFilter, GroupId, GroupResult, GroupUpdate, InboundFilter,
    InboundId, InboundMessage, Msisdn, RecipientDeliveryReport, ServicePlanId, Tag, TagDelta,
    ValidationError,
};
use crate::transport::{
    BATCHES_KEY, GROUPS_KEY, INBOUNDS_KEY, decode_batch, decode_batch_delivery_report,
    decode_batch_value, decode_group, decode_group_value, decode_inbound, decode_inbound_value,
    decode_members, decode_page, decode_recipient_delivery_report, decode_tags, encode_batch_create,
    encode_batch_filter, encode_batch_update, encode_delivery_report_query, encode_group_create,
    encode_group_filter, encode_group_update, encode_inbound_filter, encode_tag_delta, encode_tags,
};

pub use error::{TransportError, XmsError};
pub use pages::{PageFuture, Pages};

use error::{classify, decode_body};

const DEFAULT_ENDPOINT: &str = "https://api.clxcommunications.com/xms";
const API_VERSION: &str = "v1";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request, ready to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A response as received. The body is kept as raw bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Sends one request and returns the raw response.
///
/// Implementations report any non-2xx status as a normal [`HttpResponse`]; only
/// failures to communicate at all are errors.
pub trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

/// Default [`HttpTransport`] on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials for an XMS service plan.
pub struct Auth {
    service_plan_id: ServicePlanId,
    token: ApiToken,
}

impl Auth {
    /// Validate both parts. The plan id is trimmed; the token is kept as given.
    pub fn new(
        service_plan_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            service_plan_id: ServicePlanId::new(service_plan_id)?,
            token: ApiToken::new(token)?,
        })
    }

    pub fn service_plan_id(&self) -> &ServicePlanId {
        &self.service_plan_id
    }

    pub fn token(&self) -> &ApiToken {
        &self.token
    }
}

#[derive(Clone)]
/// Builder for [`XmsClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent, or the
/// HTTP transport itself.
pub struct XmsClientBuilder {
    auth: Auth,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl XmsClientBuilder {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the base URL; the API version and service plan are appended to it.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whole-request timeout of the default transport. Ignored with a custom transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send this `User-Agent` header with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom [`HttpTransport`] instead of `reqwest`.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<XmsClient, XmsError> {
        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                let client = builder
                    .build()
                    .map_err(|err| XmsError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(XmsClient {
            auth: self.auth,
            endpoint: self.endpoint,
            user_agent: self.user_agent,
            http,
        })
    }
}

#[derive(Clone)]
/// High-level XMS client.
///
/// Every method performs a single request/response exchange, except the listing
/// methods, which return a [`Pages`] handle that fetches on demand.
pub struct XmsClient {
    auth: Auth,
    endpoint: String,
    user_agent: Option<String>,
    http: Arc<dyn HttpTransport>,
}

impl XmsClient {
    /// Create a client with the default endpoint and `reqwest` transport.
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            user_agent: None,
            http: Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        }
    }

    pub fn builder(auth: Auth) -> XmsClientBuilder {
        XmsClientBuilder::new(auth)
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub async fn create_batch(&self, batch: &BatchCreate) -> Result<BatchResult, XmsError> {
        let body = encode_batch_create(batch);
        let response = self
            .execute(HttpMethod::Post, &["batches"], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_batch)
    }

    pub async fn replace_batch(
        &self,
        id: &BatchId,
        batch: &BatchCreate,
    ) -> Result<BatchResult, XmsError> {
        let body = encode_batch_create(batch);
        let response = self
            .execute(HttpMethod::Put, &["batches", id.as_str()], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_batch)
    }

    pub async fn update_batch(
        &self,
        id: &BatchId,
        update: &BatchUpdate,
    ) -> Result<BatchResult, XmsError> {
        let body = encode_batch_update(update);
        let response = self
            .execute(HttpMethod::Post, &["batches", id.as_str()], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_batch)
    }

    pub async fn fetch_batch(&self, id: &BatchId) -> Result<BatchResult, XmsError> {
        let response = self
            .execute(HttpMethod::Get, &["batches", id.as_str()], Vec::new(), None)
            .await?;
        decode_body(response, decode_batch)
    }

    /// Cancel a batch. The response body is not inspected.
    pub async fn cancel_batch(&self, id: &BatchId) -> Result<(), XmsError> {
        self.execute(HttpMethod::Delete, &["batches", id.as_str()], Vec::new(), None)
            .await?;
        Ok(())
    }

    /// List batches matching `filter`.
    pub fn fetch_batches(&self, filter: &BatchFilter) -> Pages<'_, BatchResult> {
        let params = encode_batch_filter(filter);
        Pages::new(move |page| {
            let query = page_query(page, &params);
            Box::pin(async move {
                let response = self
                    .execute(HttpMethod::Get, &["batches"], query, None)
                    .await?;
                decode_body(response, |body| {
                    decode_page(body, BATCHES_KEY, decode_batch_value)
                })
            })
        })
    }

    pub async fn fetch_batch_tags(&self, id: &BatchId) -> Result<Vec<Tag>, XmsError> {
        self.fetch_tags(&["batches", id.as_str(), "tags"]).await
    }

    pub async fn replace_batch_tags(
        &self,
        id: &BatchId,
        tags: &[Tag],
    ) -> Result<Vec<Tag>, XmsError> {
        self.replace_tags(&["batches", id.as_str(), "tags"], tags)
            .await
    }

    pub async fn update_batch_tags(
        &self,
        id: &BatchId,
        delta: &TagDelta,
    ) -> Result<Vec<Tag>, XmsError> {
        self.update_tags(&["batches", id.as_str(), "tags"], delta)
            .await
    }

    pub async fn fetch_delivery_report(
        &self,
        id: &BatchId,
        query: &DeliveryReportQuery,
    ) -> Result<BatchDeliveryReport, XmsError> {
        let response = self
            .execute(
                HttpMethod::Get,
                &["batches", id.as_str(), "delivery_report"],
                encode_delivery_report_query(query),
                None,
            )
            .await?;
        decode_body(response, decode_batch_delivery_report)
    }

    pub async fn fetch_recipient_delivery_report(
        &self,
        id: &BatchId,
        recipient: &Msisdn,
    ) -> Result<RecipientDeliveryReport, XmsError> {
        let response = self
            .execute(
                HttpMethod::Get,
                &["batches", id.as_str(), "delivery_report", recipient.as_str()],
                Vec::new(),
                None,
            )
            .await?;
        decode_body(response, decode_recipient_delivery_report)
    }

    pub async fn create_group(&self, group: &GroupCreate) -> Result<GroupResult, XmsError> {
        let body = encode_group_create(group);
        let response = self
            .execute(HttpMethod::Post, &["groups"], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_group)
    }

    pub async fn replace_group(
        &self,
        id: &GroupId,
        group: &GroupCreate,
    ) -> Result<GroupResult, XmsError> {
        let body = encode_group_create(group);
        let response = self
            .execute(HttpMethod::Put, &["groups", id.as_str()], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_group)
    }

    pub async fn update_group(
        &self,
        id: &GroupId,
        update: &GroupUpdate,
    ) -> Result<GroupResult, XmsError> {
        let body = encode_group_update(update);
        let response = self
            .execute(HttpMethod::Post, &["groups", id.as_str()], Vec::new(), Some(body))
            .await?;
        decode_body(response, decode_group)
    }

    pub async fn delete_group(&self, id: &GroupId) -> Result<(), XmsError> {
        self.execute(HttpMethod::Delete, &["groups", id.as_str()], Vec::new(), None)
            .await?;
        Ok(())
    }

    pub async fn fetch_group(&self, id: &GroupId) -> Result<GroupResult, XmsError> {
        let response = self
            .execute(HttpMethod::Get, &["groups", id.as_str()], Vec::new(), None)
            .await?;
        decode_body(response, decode_group)
    }

    /// List groups matching `filter`.
    pub fn fetch_groups(&self, filter: &GroupFilter) -> Pages<'_, GroupResult> {
        let params = encode_group_filter(filter);
        Pages::new(move |page| {
            let query = page_query(page, &params);
            Box::pin(async move {
                let response = self
                    .execute(HttpMethod::Get, &["groups"], query, None)
                    .await?;
                decode_body(response, |body| {
                    decode_page(body, GROUPS_KEY, decode_group_value)
                })
            })
        })
    }

    pub async fn fetch_group_members(&self, id: &GroupId) -> Result<Vec<Msisdn>, XmsError> {
        let response = self
            .execute(
                HttpMethod::Get,
                &["groups", id.as_str(), "members"],
                Vec::new(),
                None,
            )
            .await?;
        decode_body(response, decode_members)
    }

    pub async fn fetch_group_tags(&self, id: &GroupId) -> Result<Vec<Tag>, XmsError> {
        self.fetch_tags(&["groups", id.as_str(), "tags"]).await
    }

    pub async fn replace_group_tags(
        &self,
        id: &GroupId,
        tags: &[Tag],
    ) -> Result<Vec<Tag>, XmsError> {
        self.replace_tags(&["groups", id.as_str(), "tags"], tags)
            .await
    }

    pub async fn update_group_tags(
        &self,
        id: &GroupId,
        delta: &TagDelta,
    ) -> Result<Vec<Tag>, XmsError> {
        self.update_tags(&["groups", id.as_str(), "tags"], delta)
            .await
    }

    pub async fn fetch_inbound(&self, id: &InboundId) -> Result<InboundMessage, XmsError> {
        let response = self
            .execute(HttpMethod::Get, &["inbounds", id.as_str()], Vec::new(), None)
            .await?;
        decode_body(response, decode_inbound)
    }

    /// List inbound messages matching `filter`.
    pub fn fetch_inbounds(&self, filter: &InboundFilter) -> Pages<'_, InboundMessage> {
        let params = encode_inbound_filter(filter);
        Pages::new(move |page| {
            let query = page_query(page, &params);
            Box::pin(async move {
                let response = self
                    .execute(HttpMethod::Get, &["inbounds"], query, None)
                    .await?;
                decode_body(response, |body| {
                    decode_page(body, INBOUNDS_KEY, decode_inbound_value)
                })
            })
        })
    }

    async fn fetch_tags(&self, segments: &[&str]) -> Result<Vec<Tag>, XmsError> {
        let response = self
            .execute(HttpMethod::Get, segments, Vec::new(), None)
            .await?;
        decode_body(response, decode_tags)
    }

    async fn replace_tags(&self, segments: &[&str], tags: &[Tag]) -> Result<Vec<Tag>, XmsError> {
        let response = self
            .execute(HttpMethod::Put, segments, Vec::new(), Some(encode_tags(tags)))
            .await?;
        decode_body(response, decode_tags)
    }

    async fn update_tags(
        &self,
        segments: &[&str],
        delta: &TagDelta,
    ) -> Result<Vec<Tag>, XmsError> {
        let response = self
            .execute(
                HttpMethod::Post,
                segments,
                Vec::new(),
                Some(encode_tag_delta(delta)),
            )
            .await?;
        decode_body(response, decode_tags)
    }

    fn url(&self, segments: &[&str], query: &[(String, String)]) -> Result<Url, XmsError> {
        let mut url =
            Url::parse(&self.endpoint).map_err(|err| XmsError::Transport(Box::new(err)))?;
        url.path_segments_mut()
            .map_err(|()| {
                let message = format!("endpoint `{}` cannot be a base URL", self.endpoint);
                XmsError::Transport(message.into())
            })?
            .pop_if_empty()
            .push(API_VERSION)
            .push(self.auth.service_plan_id.as_str())
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<HttpResponse, XmsError> {
        let url = self.url(segments, &query)?;

        let mut headers = vec![
            (
                "Authorization".to_owned(),
                format!("Bearer {}", self.auth.token.as_str()),
            ),
            ("Accept".to_owned(), "application/json".to_owned()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
        }
        if let Some(user_agent) = self.user_agent.as_ref() {
            headers.push(("User-Agent".to_owned(), user_agent.clone()));
        }

        tracing::debug!(method = %method, url = %url, "sending XMS request");

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers,
            body: body.map(|body| body.to_string()),
        };
        let response = self
            .http
            .send(request)
            .await
            .map_err(XmsError::Transport)?;

        tracing::debug!(
            method = %method,
            url = %url,
            status = response.status,
            "received XMS response"
        );

        classify(response, &url, &self.auth)
    }
}

fn page_query(page: usize, params: &[(String, String)]) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(params.len() + 1);
    query.push(("page".to_owned(), page.to_string()));
    query.extend(params.iter().cloned());
    query
}
