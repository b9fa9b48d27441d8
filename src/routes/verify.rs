use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::models::verification::{VerifyForm, VerifyResponse};
use crate::routes::error::ApiError;
use crate::services::ocr::LabelImage;
use crate::services::validation::verify_label;

/// Multipart part carrying the label photograph.
const IMAGE_FIELD: &str = "labelImage";

/// POST /api/verify — Upload a label photograph with the submitted metadata.
pub async fn submit_verification(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VerifyResponse>, ApiError> {
    let started = Instant::now();
    let mut image_data: Option<Vec<u8>> = None;
    let mut form = VerifyForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == IMAGE_FIELD {
            image_data = Some(field.bytes().await?.to_vec());
        } else {
            let value = field.text().await?;
            form.set(&name, value);
        }
    }

    let image_data = image_data.ok_or(ApiError::MissingImage)?;
    form.validate().map_err(|_| ApiError::MissingFields)?;
    let image = LabelImage::from_bytes(image_data)?;
    let submitted = form.into_submitted();

    metrics::counter!("label_verifications_total").increment(1);
    tracing::info!(
        brand = %submitted.brand_name,
        format = ?image.format(),
        bytes = image.size_bytes(),
        "Verifying label"
    );

    let extracted = state.extractor.extract(&image).await.map_err(|e| {
        metrics::counter!("label_extraction_failures_total").increment(1);
        tracing::error!(error = %e, "Label extraction failed");
        ApiError::from(e)
    })?;

    let results = verify_label(&extracted, &submitted);
    if results.overall_match() {
        metrics::counter!("label_verifications_matched_total").increment(1);
    }
    metrics::histogram!("label_verification_seconds").record(started.elapsed().as_secs_f64());

    Ok(Json(VerifyResponse {
        success: true,
        results,
    }))
}
