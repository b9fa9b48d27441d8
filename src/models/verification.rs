use garde::Validate;
use serde::Serialize;

use crate::models::label::{SubmittedRecord, VerificationResult};

/// Text fields of the multipart verification form.
#[derive(Debug, Default, Validate)]
pub struct VerifyForm {
    #[garde(required, length(min = 1))]
    pub brand_name: Option<String>,

    #[garde(required, length(min = 1))]
    pub product_type: Option<String>,

    #[garde(required, length(min = 1))]
    pub alcohol_content: Option<String>,

    #[garde(required, length(min = 1))]
    pub net_contents: Option<String>,
}

impl VerifyForm {
    /// Stores a text part by its form field name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "brandName" => self.brand_name = Some(value),
            "productType" => self.product_type = Some(value),
            "alcoholContent" => self.alcohol_content = Some(value),
            "netContents" => self.net_contents = Some(value),
            _ => {}
        }
    }

    /// Consumes a form that has passed validation.
    pub fn into_submitted(self) -> SubmittedRecord {
        SubmittedRecord {
            brand_name: self.brand_name.unwrap_or_default(),
            product_type: self.product_type.unwrap_or_default(),
            alcohol_content: self.alcohol_content.unwrap_or_default(),
            net_contents: self.net_contents.unwrap_or_default(),
        }
    }
}

/// Successful response body for `POST /api/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub results: VerificationResult,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
