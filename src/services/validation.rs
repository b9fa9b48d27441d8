use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::label::{
    ExtractedRecord, FieldName, FieldResult, SubmittedRecord, VerificationFields,
    VerificationResult,
};
use crate::services::normalize::{normalize_abv, normalize_volume};
use crate::services::similarity::{is_similar, BRAND_NAME_THRESHOLD, PRODUCT_TYPE_THRESHOLD};

/// ABV tolerance in percentage points. Exclusive: a 0.5 point gap fails.
const ABV_TOLERANCE: f64 = 0.5;

/// Verify a label read from a photograph against the applicant's submission.
///
/// Compares brand name, product type, alcohol content and net contents.
/// Mismatches are reported in the result; this never fails.
pub fn verify_label(extracted: &ExtractedRecord, submitted: &SubmittedRecord) -> VerificationResult {
    verify_label_at(extracted, submitted, Utc::now())
}

/// [`verify_label`] with an explicit timestamp.
pub fn verify_label_at(
    extracted: &ExtractedRecord,
    submitted: &SubmittedRecord,
    timestamp: DateTime<Utc>,
) -> VerificationResult {
    let fields = VerificationFields {
        brand_name: compare_brand_name(
            &submitted.brand_name,
            extracted.brand_name.as_deref(),
        ),
        product_type: compare_product_type(
            &submitted.product_type,
            extracted.product_type.as_deref(),
        ),
        alcohol_content: compare_alcohol_content(
            &submitted.alcohol_content,
            extracted.alcohol_content.as_deref(),
        ),
        net_contents: compare_net_contents(
            &submitted.net_contents,
            extracted.net_contents.as_deref(),
        ),
    };

    for field in fields.iter() {
        debug!(
            field = %field.field,
            matched = field.matched,
            reason = %field.reason,
            "Field compared"
        );
    }

    let result = VerificationResult::new(
        fields,
        extracted.confidence.unwrap_or_default(),
        extracted.additional_info.clone(),
        timestamp,
    );

    info!(
        overall_match = result.overall_match(),
        confidence = %result.confidence(),
        timestamp = %result.timestamp(),
        "Label verification complete"
    );

    result
}

// ── Brand Name (fuzzy match) ─────────────────────────────────────────

pub fn compare_brand_name(submitted: &str, extracted: Option<&str>) -> FieldResult {
    let matched = is_similar(extracted, Some(submitted), BRAND_NAME_THRESHOLD);
    FieldResult::new(
        FieldName::BrandName,
        submitted,
        extracted,
        matched,
        "Brand name does not match the label",
    )
}

// ── Product Type (looser fuzzy match) ────────────────────────────────

pub fn compare_product_type(submitted: &str, extracted: Option<&str>) -> FieldResult {
    let matched = is_similar(extracted, Some(submitted), PRODUCT_TYPE_THRESHOLD);
    FieldResult::new(
        FieldName::ProductType,
        submitted,
        extracted,
        matched,
        "Product type does not match the label",
    )
}

// ── Alcohol Content (±0.5 points, exclusive) ─────────────────────────

pub fn compare_alcohol_content(submitted: &str, extracted: Option<&str>) -> FieldResult {
    let submitted_abv = normalize_abv(Some(submitted));
    let extracted_abv = normalize_abv(extracted);

    let matched = match (submitted_abv, extracted_abv) {
        (Some(s), Some(e)) => (s - e).abs() < ABV_TOLERANCE,
        _ => false,
    };

    FieldResult::new(
        FieldName::AlcoholContent,
        submitted,
        extracted,
        matched,
        format!(
            "ABV mismatch: submitted {}% vs label {}%",
            display_abv(submitted_abv),
            display_abv(extracted_abv)
        ),
    )
}

/// Shortest rendering (`40`, `45.5`); an unreadable value renders empty.
fn display_abv(abv: Option<f64>) -> String {
    abv.map(|v| v.to_string()).unwrap_or_default()
}

// ── Net Contents (converted to mL, ±1 mL, exclusive) ─────────────────

pub fn compare_net_contents(submitted: &str, extracted: Option<&str>) -> FieldResult {
    let submitted_volume = normalize_volume(Some(submitted));
    let extracted_volume = normalize_volume(extracted);
    FieldResult::new(
        FieldName::NetContents,
        submitted,
        extracted,
        submitted_volume.matches(&extracted_volume),
        "Volume does not match the label",
    )
}
