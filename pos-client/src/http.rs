//! HTTP client for network-based API calls

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    CancelInvoiceRequest, CreateInvoiceRequest, InvoiceListParams, LoginResponse, UserInfo,
};
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to the POS server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with serialized query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path)).query(query);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.put(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.delete(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Map the HTTP response, extracting the server error message on
    /// failure statuses
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(text);
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(message)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(message)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(message)),
                _ => Err(ClientError::Internal(message)),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ========== Auth API ==========

    /// Login with email and password; stores the returned token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        #[derive(serde::Serialize)]
        struct LoginRequest {
            email: String,
            password: String,
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Get current user information
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.get("/api/auth/me").await
    }

    // ========== Order API ==========

    /// List all orders
    pub async fn list_orders(&self) -> ClientResult<Vec<Value>> {
        self.get("/api/orders").await
    }

    /// Get one order
    pub async fn get_order(&self, id: &str) -> ClientResult<Value> {
        self.get(&format!("/api/orders/{}", id)).await
    }

    /// Create an order from a raw JSON payload
    pub async fn create_order(&self, order: &Value) -> ClientResult<Value> {
        self.post("/api/orders", order).await
    }

    // ========== Invoice API ==========

    /// Issue an invoice for an order
    pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> ClientResult<Value> {
        self.post("/api/invoices", request).await
    }

    /// Get one invoice
    pub async fn get_invoice(&self, id: &str) -> ClientResult<Value> {
        self.get(&format!("/api/invoices/{}", id)).await
    }

    /// List invoices with filters
    pub async fn list_invoices(&self, params: &InvoiceListParams) -> ClientResult<Vec<Value>> {
        self.get_with_query("/api/invoices", params).await
    }

    /// Void an invoice (administrator token required)
    pub async fn cancel_invoice(&self, id: &str, reason: Option<String>) -> ClientResult<Value> {
        self.post(
            &format!("/api/invoices/{}/cancel", id),
            &CancelInvoiceRequest { reason },
        )
        .await
    }

    /// Invoice history of a registered customer
    pub async fn customer_invoices(&self, customer_id: &str) -> ClientResult<Vec<Value>> {
        self.get(&format!("/api/customers/{}/invoices", customer_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_trims_slashes() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:3000/"));
        assert_eq!(
            client.url("/api/invoices"),
            "http://localhost:3000/api/invoices"
        );
        assert_eq!(client.url("api/health"), "http://localhost:3000/api/health");
    }
}
