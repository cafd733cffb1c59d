//! Request types for the audit API.

use serde::{Deserialize, Serialize};

use crate::models::DocumentPayload;

/// Request body for the `/audit` endpoint.
///
/// # Example
///
/// ```
/// use fiscal_audit::api::AuditRequest;
///
/// let request: AuditRequest = serde_json::from_str(
///     r#"{"documents": [{"name": "a.xml", "content": "<NFe/>"}, {"content": "<CTe/>"}]}"#,
/// ).unwrap();
/// assert_eq!(request.documents.len(), 2);
/// assert!(request.documents[1].name.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRequest {
    /// The payloads to audit, in order.
    pub documents: Vec<DocumentPayload>,
}
