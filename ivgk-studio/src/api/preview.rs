//! Preview endpoints
//!
//! Every request renders a complete new document; nothing is cached.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use ivgk_render::{DocumentAssembler, csp_header_value, decode_data_url, download_file_name, iframe_embed};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::AppError;
use shared::models::{QrCode, RenderedCardData, TemplateSource};

/// Template bundle plus the data to render it with
#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub template: TemplateSource,
    #[serde(default)]
    pub data: RenderedCardData,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    /// Embed pre-rendered fallback sections
    #[serde(default)]
    pub fallback: bool,
}

impl PreviewRequest {
    fn assemble(&self) -> Result<String, AppError> {
        let html = DocumentAssembler::new(&self.template)
            .meta(self.meta.as_ref())
            .fallback(self.fallback)
            .assemble(&self.data)?;
        tracing::debug!(
            card_id = %self.data.id,
            fallback = self.fallback,
            bytes = html.len(),
            "Assembled preview"
        );
        Ok(html)
    }
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub iframe: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRequest {
    pub qr_code: QrCode,
}

fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::invalid_request(e.body_text()))
}

/// POST /api/preview
pub async fn render(
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let html = parse(payload)?.assemble()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_SECURITY_POLICY, csp_header_value()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        html,
    )
        .into_response())
}

/// POST /api/preview/embed
pub async fn embed(
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, AppError> {
    let html = parse(payload)?.assemble()?;
    Ok(Json(EmbedResponse {
        iframe: iframe_embed(&html),
    }))
}

/// POST /api/preview/qr
pub async fn qr_download(
    payload: Result<Json<QrRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let QrRequest { qr_code } = parse(payload)?;
    if qr_code.image_data_url.trim().is_empty() {
        return Err(AppError::invalid_data_url("QR code has no image"));
    }
    let image = decode_data_url(&qr_code.image_data_url)?;
    let file_name = download_file_name(&qr_code);
    tracing::debug!(file_name = %file_name, bytes = image.bytes.len(), "Serving QR download");

    Ok((
        [
            (header::CONTENT_TYPE, image.mime),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        image.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use crate::api::{REQUEST_ID_HEADER, create_router};
    use crate::config::Config;
    use crate::state::AppState;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(method: &str, uri: &str, body: Option<Value>) -> Response {
        let app = create_router(AppState::new(Config::default()));
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_service() {
        let response = send("GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "ivgk-studio");
    }

    #[tokio::test]
    async fn preview_is_sandboxed_html() {
        let response = send(
            "POST",
            "/api/preview",
            Some(json!({
                "html": "<main><h1>Card</h1></main><script src=\"script.js\"></script>",
                "css": "h1{color:red}",
                "data": {"name": "Jane"},
                "meta": {"mode": "preview"}
            })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_SECURITY_POLICY],
            "sandbox allow-scripts allow-popups allow-popups-to-escape-sandbox allow-same-origin allow-downloads"
        );

        let html = body_text(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>h1{color:red}</style>"));
        assert!(html.contains("window.vcardMeta"));
        assert!(!html.contains("script.js"));
    }

    #[tokio::test]
    async fn embed_returns_iframe() {
        let response = send(
            "POST",
            "/api/preview/embed",
            Some(json!({"html": "<p>x</p>", "fallback": true,
                        "data": {"customLinks": [{"label": "Site", "url": "https://a.test"}]}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let iframe = body["iframe"].as_str().unwrap();
        assert!(iframe.starts_with("<iframe title=\"Digital Card Preview\""));
        assert!(iframe.contains("sandbox=\"allow-scripts"));
        assert!(iframe.contains("vcard-fallback-sections"));
    }

    #[tokio::test]
    async fn missing_html_is_a_bad_request() {
        let response = send("POST", "/api/preview", Some(json!({"css": "x"}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn qr_download_decodes_image() {
        let response = send(
            "POST",
            "/api/preview/qr",
            Some(json!({"qrCode": {
                "url": "https://cards.test/jane",
                "imageDataUrl": "data:image/png;base64,iVBORw0K",
                "downloadFileName": "jane-qr.png"
            }})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane-qr.png\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[tokio::test]
    async fn qr_without_image_is_rejected() {
        let response = send("POST", "/api/preview/qr", Some(json!({"qrCode": {"url": "x"}}))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["code"], 5004);
    }
}
