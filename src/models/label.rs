use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Confidence label reported by the extraction service.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, EnumString, Display, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// The four label fields that take part in verification.
#[derive(Debug, Clone, Copy, Serialize, Display, AsRefStr, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FieldName {
    BrandName,
    ProductType,
    AlcoholContent,
    NetContents,
}

impl FieldName {
    /// Fields in verification order.
    pub const ALL: [FieldName; 4] = [
        FieldName::BrandName,
        FieldName::ProductType,
        FieldName::AlcoholContent,
        FieldName::NetContents,
    ];
}

/// Label metadata entered by the applicant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRecord {
    pub brand_name: String,
    pub product_type: String,
    pub alcohol_content: String,
    pub net_contents: String,
}

/// Label metadata read from the photograph. Any field may be missing when it
/// was not legible or not present on the label.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub product_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub alcohol_content: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub net_contents: Option<String>,

    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: Option<Confidence>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub additional_info: Option<String>,
}

/// Vision models sometimes answer `45` instead of `"45%"`; keep numbers as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Unknown confidence labels are dropped so the result falls back to the default.
fn lenient_confidence<'de, D>(deserializer: D) -> Result<Option<Confidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Verdict for a single field. Carries the raw strings, never the normalized ones.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldResult {
    #[serde(skip)]
    pub field: FieldName,
    pub submitted: String,
    pub extracted: Option<String>,
    #[serde(rename = "match")]
    pub matched: bool,
    pub reason: String,
}

impl FieldResult {
    pub fn new(
        field: FieldName,
        submitted: &str,
        extracted: Option<&str>,
        matched: bool,
        mismatch_reason: impl Into<String>,
    ) -> Self {
        Self {
            field,
            submitted: submitted.to_string(),
            extracted: extracted.map(str::to_string),
            matched,
            reason: if matched {
                "Match".to_string()
            } else {
                mismatch_reason.into()
            },
        }
    }
}

/// Per-field verdicts, one member per compared field.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationFields {
    pub brand_name: FieldResult,
    pub product_type: FieldResult,
    pub alcohol_content: FieldResult,
    pub net_contents: FieldResult,
}

impl VerificationFields {
    pub fn get(&self, field: FieldName) -> &FieldResult {
        match field {
            FieldName::BrandName => &self.brand_name,
            FieldName::ProductType => &self.product_type,
            FieldName::AlcoholContent => &self.alcohol_content,
            FieldName::NetContents => &self.net_contents,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldResult> {
        FieldName::ALL.into_iter().map(move |field| self.get(field))
    }

    pub fn all_matched(&self) -> bool {
        self.iter().all(|f| f.matched)
    }
}

/// Outcome of one verification call.
///
/// `overall_match` is derived from the field verdicts when the value is built
/// and cannot be set independently.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    overall_match: bool,
    fields: VerificationFields,
    confidence: Confidence,
    additional_info: Option<String>,
    timestamp: DateTime<Utc>,
}

impl VerificationResult {
    pub fn new(
        fields: VerificationFields,
        confidence: Confidence,
        additional_info: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            overall_match: fields.all_matched(),
            fields,
            confidence,
            additional_info,
            timestamp,
        }
    }

    pub fn overall_match(&self) -> bool {
        self.overall_match
    }

    pub fn fields(&self) -> &VerificationFields {
        &self.fields
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn additional_info(&self) -> Option<&str> {
        self.additional_info.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: FieldName, matched: bool) -> FieldResult {
        FieldResult::new(name, "a", Some("a"), matched, "nope")
    }

    fn fields_with(mismatch: Option<FieldName>) -> VerificationFields {
        let m = |name| mismatch != Some(name);
        VerificationFields {
            brand_name: field(FieldName::BrandName, m(FieldName::BrandName)),
            product_type: field(FieldName::ProductType, m(FieldName::ProductType)),
            alcohol_content: field(FieldName::AlcoholContent, m(FieldName::AlcoholContent)),
            net_contents: field(FieldName::NetContents, m(FieldName::NetContents)),
        }
    }

    #[test]
    fn test_overall_match_when_all_fields_match() {
        let result = VerificationResult::new(fields_with(None), Confidence::High, None, Utc::now());
        assert!(result.overall_match());
    }

    #[test]
    fn test_any_single_mismatch_fails_overall() {
        for name in FieldName::ALL {
            let result =
                VerificationResult::new(fields_with(Some(name)), Confidence::High, None, Utc::now());
            assert!(!result.overall_match(), "{name} mismatch should fail overall");
        }
    }

    #[test]
    fn test_field_reason() {
        assert_eq!(field(FieldName::BrandName, true).reason, "Match");
        assert_eq!(field(FieldName::BrandName, false).reason, "nope");
    }

    #[test]
    fn test_extracted_record_accepts_numbers_and_nulls() {
        let json = r#"{
            "brandName": "Old Tom Distillery",
            "productType": null,
            "alcoholContent": 45,
            "netContents": "750 mL",
            "confidence": "High"
        }"#;
        let record: ExtractedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.brand_name.as_deref(), Some("Old Tom Distillery"));
        assert_eq!(record.product_type, None);
        assert_eq!(record.alcohol_content.as_deref(), Some("45"));
        assert_eq!(record.confidence, Some(Confidence::High));
        assert_eq!(record.additional_info, None);
    }

    #[test]
    fn test_unknown_confidence_is_dropped() {
        let record: ExtractedRecord =
            serde_json::from_str(r#"{"confidence": "very sure"}"#).unwrap();
        assert_eq!(record.confidence, None);
    }

    #[test]
    fn test_result_json_shape() {
        let result = VerificationResult::new(
            fields_with(Some(FieldName::NetContents)),
            Confidence::Low,
            None,
            Utc::now(),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overallMatch"], false);
        assert_eq!(json["confidence"], "low");
        assert!(json["additionalInfo"].is_null());
        assert_eq!(json["fields"]["netContents"]["match"], false);
        assert_eq!(json["fields"]["brandName"]["submitted"], "a");
        assert_eq!(json["fields"].as_object().unwrap().len(), 4);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_field_name_display() {
        assert_eq!(FieldName::AlcoholContent.to_string(), "alcoholContent");
        assert_eq!(FieldName::NetContents.as_ref(), "netContents");
    }
}
