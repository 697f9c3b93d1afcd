//! HTTP route handlers for Axum.

use axum::{
    body::{Body, Bytes},
    extract::{multipart::MultipartRejection, rejection::BytesRejection, Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    api::types::StoriesPayload,
    data,
    error::AppError,
    narrative::{self, NarrativeRecord},
    report::{self, TransientReport},
};

use super::AppState;

/// Multipart field carrying the uploaded table.
pub const FILE_FIELD: &str = "csv_file";

const ANALYZE_FAILED: &str = "Analysis failed";
const DOWNLOAD_FAILED: &str = "Failed to generate report";

#[instrument(skip_all)]
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match analyze_upload(&state, multipart).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => err.into_response_with(ANALYZE_FAILED),
    }
}

#[instrument(skip_all)]
pub async fn download(body: Result<Bytes, BytesRejection>) -> Response {
    let result = body
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
        .and_then(|body| export_report(&body));
    match result {
        Ok(response) => response,
        Err(err) => err.into_response_with(DOWNLOAD_FAILED),
    }
}

async fn analyze_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StoriesPayload, AppError> {
    let Ok(multipart) = multipart else {
        return Err(AppError::validation("No file uploaded"));
    };
    let (filename, table) = read_upload(multipart).await?;
    if filename.is_empty() {
        return Err(AppError::validation("No selected file"));
    }
    if !filename.ends_with(".csv") {
        return Err(AppError::validation("File must be a CSV"));
    }

    let ranked = data::rank(&table).map_err(|err| AppError::Validation(err.to_string()))?;
    info!(%filename, ranked = ranked.len(), "upload ranked");

    let stories = narrative::generate(
        &ranked,
        &state.settings.prompt,
        state.client.as_ref(),
        &state.settings.model,
    )
    .await
    .map_err(AppError::Generation)?;
    Ok(StoriesPayload { stories })
}

async fn read_upload(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Validation(err.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let table = field
            .bytes()
            .await
            .map_err(|err| AppError::Validation(err.body_text()))?;
        return Ok((filename, table));
    }
    Err(AppError::validation("No file uploaded"))
}

fn export_report(body: &[u8]) -> Result<Response, AppError> {
    let records = parse_stories(body)?;
    let document = report::render_document(&records);
    let transient = TransientReport::create(&document)?;
    let stream = transient.into_stream()?;

    let filename = report::report_filename(chrono::Local::now().date_naive());
    info!(stories = records.len(), %filename, "streaming report");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Validate the echoed `stories` list before anything touches disk.
fn parse_stories(body: &[u8]) -> Result<Vec<NarrativeRecord>, AppError> {
    let no_stories = || AppError::validation("No stories provided");
    let value: Value = serde_json::from_slice(body).map_err(|_| no_stories())?;
    let stories = match value.get("stories") {
        None | Some(Value::Null) => return Err(no_stories()),
        Some(Value::Array(items)) if items.is_empty() => return Err(no_stories()),
        Some(stories @ Value::Array(_)) => stories.clone(),
        Some(_) => return Err(AppError::validation("stories must be a list")),
    };
    serde_json::from_value(stories)
        .map_err(|err| AppError::Validation(format!("Malformed story record: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_stories_are_rejected() {
        let bodies: [&[u8]; 5] = [b"", b"{}", br#"{"stories":null}"#, br#"{"stories":[]}"#, b"not json"];
        for body in bodies {
            match parse_stories(body) {
                Err(AppError::Validation(msg)) => assert_eq!(msg, "No stories provided"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn record_shape_is_checked() {
        let err = parse_stories(br#"{"stories":[{"batsman":"X"}]}"#).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Malformed story record"));
    }

    #[test]
    fn records_keep_client_order() {
        let body = br#"{"stories":[
            {"batsman":"B","dismissals":1,"average":2.5,"story":"b"},
            {"batsman":"A","dismissals":9,"average":40.0,"story":"a"}
        ]}"#;
        let records = parse_stories(body).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
