//! # HTTP API Client
//!
//! reqwest implementation of every lookup and create trait.
//!
//! ## Endpoints
//! ```text
//! GET  {base}/products?search=term      → [ProductRef]
//! GET  {base}/products/{id}             → ProductRef   (404 → None)
//! GET  {base}/customers?search=term     → [CustomerRef]
//! GET  {base}/technicians?search=term   → [TechnicianRef]
//! GET  {base}/vehicles?search=term      → [VehicleRef]
//! GET  {base}/services?search=term      → [ServiceRef]
//! POST {base}/sales                     → { "id": … }
//! POST {base}/work-orders               → { "id": … }
//! ```
//!
//! List endpoints may answer with a bare array or with `{ "data": [...] }`.
//! Create calls carry an `X-Request-Id` header so the server log can be
//! matched to the console log.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use url::Url;
use uuid::Uuid;

use shopfloor_core::validation::validate_search_query;
use shopfloor_core::{
    CoreError, CustomerRef, ProductRef, SalePayload, ServiceRef, TechnicianRef, VehicleRef,
    WorkOrderPayload,
};

use crate::api::{
    CustomerLookup, OrderCreateApi, OrderId, ProductLookup, ServiceLookup, TechnicianLookup,
    VehicleLookup,
};
use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

/// Header carrying the per-call correlation id on create requests.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Bare(items) | ListResponse::Wrapped { data: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: OrderId,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

/// Pulls a human message out of an error body, falling back to the raw text.
fn server_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        body: server_message(&text),
    })
}

// =============================================================================
// Client
// =============================================================================

/// JSON-over-HTTP client for the back-office API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: Url,
    token: Option<String>,
    http: Client,
}

impl HttpApiClient {
    /// Builds a client with the configured timeouts.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            base_url,
            token: settings.token.clone(),
            http,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    #[instrument(skip(self))]
    async fn fetch_list<T: DeserializeOwned + Send>(&self, resource: &str, term: &str) -> ClientResult<Vec<T>> {
        let term = validate_search_query(term).map_err(CoreError::from)?;
        let url = self.endpoint(&[resource])?;

        let request = self.http.get(url).query(&[("search", term.as_str())]);
        let response = check_status(self.authorized(request).send().await?).await?;
        let items = response.json::<ListResponse<T>>().await?.into_vec();

        debug!(count = items.len(), "Lookup returned");
        Ok(items)
    }

    #[instrument(skip(self, payload), fields(request_id = tracing::field::Empty))]
    async fn create<P: Serialize + Sync + ?Sized>(&self, resource: &str, payload: &P) -> ClientResult<OrderId> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let url = self.endpoint(&[resource])?;
        let request = self
            .http
            .post(url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(payload);

        let response = match self.authorized(request).send().await {
            Ok(response) => check_status(response).await,
            Err(e) => Err(ClientError::from(e)),
        };

        let created = match response {
            Ok(response) => response.json::<CreatedResponse>().await?,
            Err(e) => {
                error!(error = %e, "Create call failed");
                return Err(e);
            }
        };

        info!(order_id = %created.id, "Order created");
        Ok(created.id)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

#[async_trait]
impl ProductLookup for HttpApiClient {
    async fn search(&self, term: &str) -> ClientResult<Vec<ProductRef>> {
        self.fetch_list("products", term).await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: &str) -> ClientResult<Option<ProductRef>> {
        let url = self.endpoint(&["products", id])?;
        let response = self.authorized(self.http.get(url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(product_id = %id, "Product no longer in catalog");
            return Ok(None);
        }

        let product = check_status(response).await?.json::<ProductRef>().await?;
        Ok(Some(product))
    }
}

#[async_trait]
impl CustomerLookup for HttpApiClient {
    async fn search(&self, term: &str) -> ClientResult<Vec<CustomerRef>> {
        self.fetch_list("customers", term).await
    }
}

#[async_trait]
impl TechnicianLookup for HttpApiClient {
    async fn search(&self, term: &str) -> ClientResult<Vec<TechnicianRef>> {
        self.fetch_list("technicians", term).await
    }
}

#[async_trait]
impl VehicleLookup for HttpApiClient {
    async fn search(&self, term: &str) -> ClientResult<Vec<VehicleRef>> {
        self.fetch_list("vehicles", term).await
    }
}

#[async_trait]
impl ServiceLookup for HttpApiClient {
    async fn search(&self, term: &str) -> ClientResult<Vec<ServiceRef>> {
        self.fetch_list("services", term).await
    }
}

#[async_trait]
impl OrderCreateApi for HttpApiClient {
    async fn create_sale_order(&self, payload: &SalePayload) -> ClientResult<OrderId> {
        self.create("sales", payload).await
    }

    async fn create_work_order(&self, payload: &WorkOrderPayload) -> ClientResult<OrderId> {
        self.create("work-orders", payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpApiClient {
        HttpApiClient::new(&ApiSettings {
            base_url: base_url.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let api = client("http://localhost:8000/api");
        assert_eq!(
            api.endpoint(&["products"]).unwrap().as_str(),
            "http://localhost:8000/api/products"
        );

        let api = client("http://localhost:8000/api/");
        assert_eq!(
            api.endpoint(&["work-orders"]).unwrap().as_str(),
            "http://localhost:8000/api/work-orders"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = client("https://backoffice.local");
        assert_eq!(
            api.endpoint(&["products", "a/b c"]).unwrap().as_str(),
            "https://backoffice.local/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let result = HttpApiClient::new(&ApiSettings {
            base_url: "mailto:ops@example.com".to_string(),
            ..ApiSettings::default()
        });
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_list_response_shapes() {
        let bare: ListResponse<CustomerRef> =
            serde_json::from_str(r#"[{"id": 1, "name": "Ana"}]"#).unwrap();
        assert_eq!(bare.into_vec()[0].id, "1");

        let wrapped: ListResponse<CustomerRef> =
            serde_json::from_str(r#"{"data": [{"id": "c-2", "name": "Luis"}]}"#).unwrap();
        assert_eq!(wrapped.into_vec()[0].name, "Luis");
    }

    #[test]
    fn test_created_response() {
        let created: CreatedResponse = serde_json::from_str(r#"{"id": 77, "status": "pending"}"#).unwrap();
        assert_eq!(created.id, OrderId::new("77"));
    }

    #[test]
    fn test_server_message() {
        assert_eq!(server_message(r#"{"detail": "Customer not found"}"#), "Customer not found");
        assert_eq!(server_message(r#"{"message": "Out of stock"}"#), "Out of stock");
        assert_eq!(server_message("Bad Gateway\n"), "Bad Gateway");
    }
}
