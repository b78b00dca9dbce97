//! Wire types for the POS server API
//!
//! Only the shapes the client constructs are typed; resource documents
//! come back as raw JSON values so the client never lags behind server
//! model changes.

use serde::{Deserialize, Serialize};

/// User info returned by login and /api/auth/me
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
}

/// Login response body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Customer override on invoice creation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Invoice creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub order_id: String,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
    pub is_electronic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Invoice void request
#[derive(Debug, Clone, Default, Serialize)]
pub struct CancelInvoiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Filters for the invoice list endpoint, serialized as query
/// parameters by reqwest
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_nit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(params: &InvoiceListParams) -> Option<String> {
        reqwest::Client::new()
            .get("http://localhost/api/invoices")
            .query(params)
            .build()
            .unwrap()
            .url()
            .query()
            .map(String::from)
    }

    #[test]
    fn empty_params_produce_no_query() {
        assert_eq!(query_of(&InvoiceListParams::default()), None);
    }

    #[test]
    fn params_serialize_to_camel_case_pairs() {
        let params = InvoiceListParams {
            start_date: Some("2026-08-30T00:00:00.000Z".to_string()),
            customer_nit: Some("900000000-0".to_string()),
            status: Some("ISSUED".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            query_of(&params).as_deref(),
            Some(
                "startDate=2026-08-30T00%3A00%3A00.000Z&customerNit=900000000-0&status=ISSUED&limit=10"
            )
        );
    }
}
