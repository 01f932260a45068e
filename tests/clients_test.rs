//! Outbound clients against local stand-in servers.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use serde_json::{json, Value};

use sawtna_api::domain::{GeneratedContent, NewContent, NewUser, User};
use sawtna_api::errors::{AppError, AppResult};
use sawtna_api::infra::clients::{
    CompletionRequest, GroqClient, HttpSegmenter, HuggingFaceClient, ImageGenerator, ImageRequest,
    InferenceClient, LlmClient, PollinationsClient, Segmenter,
};
use sawtna_api::infra::{ContentRepository, UnitOfWork, UserRepository};
use sawtna_api::services::{Sanitizer, SanitizerService};

const API_KEY: &str = "test-key";

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn png(image: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", API_KEY))
        .unwrap_or(false)
}

// =============================================================================
// Groq
// =============================================================================

type Captured = Arc<Mutex<Vec<Value>>>;

async fn groq_stand_in(available: &'static [&'static str], reply: &'static str) -> (String, Captured) {
    let captured: Captured = Arc::default();

    let models = get(move |Path(model): Path<String>, headers: HeaderMap| async move {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        if available.contains(&model.as_str()) {
            Json(json!({"id": model, "object": "model"})).into_response()
        } else {
            StatusCode::NOT_FOUND.into_response()
        }
    });

    let completions = post(
        move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
            if !authorized(&headers) {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            captured.lock().unwrap().push(body);
            if reply.is_empty() {
                return (StatusCode::SERVICE_UNAVAILABLE, "overloaded").into_response();
            }
            Json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": reply}}]
            }))
            .into_response()
        },
    );

    let router = Router::new()
        .route("/openai/v1/models/:model", models)
        .route("/openai/v1/chat/completions", completions)
        .with_state(captured.clone());

    let base = serve(router).await;
    (format!("{}/openai/v1", base), captured)
}

#[tokio::test]
async fn groq_probe_reports_availability() {
    let (base, _) = groq_stand_in(&["gemma2-9b-it"], "ok").await;
    let client = GroqClient::new(base.as_str(), API_KEY).unwrap();

    assert!(client.model_available("gemma2-9b-it").await.unwrap());
    assert!(!client.model_available("llama3-8b-8192").await.unwrap());

    let unauthorized = GroqClient::new(base.as_str(), "wrong").unwrap();
    assert!(!unauthorized.model_available("gemma2-9b-it").await.unwrap());
}

#[tokio::test]
async fn groq_completion_sends_single_user_message() {
    let (base, captured) = groq_stand_in(&[], "Hello back").await;
    let client = GroqClient::new(base, API_KEY).unwrap();

    let text = client
        .complete(CompletionRequest {
            model: "llama-3.1-8b-instant".into(),
            prompt: "Hello".into(),
            max_tokens: 300,
            temperature: 0.3,
            top_p: 0.9,
        })
        .await
        .unwrap();
    assert_eq!(text, "Hello back");

    let sent = captured.lock().unwrap()[0].clone();
    assert_eq!(sent["model"], "llama-3.1-8b-instant");
    assert_eq!(sent["max_tokens"], 300);
    assert_eq!(sent["messages"], json!([{"role": "user", "content": "Hello"}]));
}

#[tokio::test]
async fn groq_error_status_is_upstream() {
    let (base, _) = groq_stand_in(&[], "").await;
    let client = GroqClient::new(base, API_KEY).unwrap();

    let err = client
        .complete(CompletionRequest {
            model: "m".into(),
            prompt: "p".into(),
            max_tokens: 1,
            temperature: 0.0,
            top_p: 1.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

// =============================================================================
// Sanitizer over the Groq stand-in
// =============================================================================

#[derive(Default)]
struct RecordingContents {
    saved: Mutex<Vec<(i32, NewContent)>>,
}

#[async_trait]
impl ContentRepository for RecordingContents {
    async fn create(&self, user_id: i32, content: NewContent) -> AppResult<GeneratedContent> {
        let mut saved = self.saved.lock().unwrap();
        saved.push((user_id, content.clone()));
        Ok(GeneratedContent {
            id: saved.len() as i32,
            user_id,
            content_type: content.content_type,
            title: content.title,
            text: content.text,
            image_path: content.image_path,
            metadata: content.metadata,
            created_at: Utc::now(),
        })
    }

    async fn list_by_user(&self, _: i32, _: u64, _: u64) -> AppResult<Vec<GeneratedContent>> {
        Ok(vec![])
    }
}

struct NoUsers;

#[async_trait]
impl UserRepository for NoUsers {
    async fn find_by_id(&self, _: i32) -> AppResult<Option<User>> {
        Ok(None)
    }

    async fn find_by_username(&self, _: &str) -> AppResult<Option<User>> {
        Ok(None)
    }

    async fn create(&self, _: NewUser) -> AppResult<User> {
        Err(AppError::internal("not supported"))
    }
}

struct TestUow {
    contents: Arc<RecordingContents>,
}

impl UnitOfWork for TestUow {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(NoUsers)
    }

    fn contents(&self) -> Arc<dyn ContentRepository> {
        self.contents.clone()
    }
}

#[tokio::test]
async fn neutralize_end_to_end() {
    let (base, captured) = groq_stand_in(
        &["mixtral-8x7b-32768", "gemma2-9b-it"],
        "Here is the rewritten text: Reports describe a massacre in Israel.",
    )
    .await;

    let contents = Arc::new(RecordingContents::default());
    let sanitizer = Sanitizer::new(
        Arc::new(TestUow {
            contents: contents.clone(),
        }),
        Arc::new(GroqClient::new(base, API_KEY).unwrap()),
        None,
    );

    let response = sanitizer
        .neutralize(3, "They committed a massacre in Israel!")
        .await
        .unwrap();

    assert_eq!(response.result, "Reports describe a Mǻššǻƈŕę in Įşŕǻęł.");
    assert_eq!(response.content_id, 1);

    let sent = captured.lock().unwrap()[0].clone();
    assert_eq!(sent["model"], "mixtral-8x7b-32768");

    let saved = contents.saved.lock().unwrap();
    let (owner, content) = &saved[0];
    assert_eq!(*owner, 3);
    assert_eq!(content.content_type, "text");
    assert_eq!(
        content.metadata,
        Some(json!({"original_text": "They committed a massacre in Israel!", "type": "neutralized"}))
    );
}

#[tokio::test]
async fn arabic_refusal_masks_original_input() {
    let (base, _) = groq_stand_in(&["llama-3.1-8b-instant"], "النص الجديد: لا").await;
    let sanitizer = Sanitizer::new(
        Arc::new(TestUow {
            contents: Arc::default(),
        }),
        Arc::new(GroqClient::new(base, API_KEY).unwrap()),
        None,
    );

    let out = sanitizer
        .sanitize("هذا النص عن الاحتلال في المدينة")
        .await
        .unwrap();
    assert!(out.contains("احتـ ـلال"));
    assert!(out.starts_with("هذا النص"));
}

// =============================================================================
// HuggingFace
// =============================================================================

async fn hf_stand_in() -> String {
    let router = Router::new().route(
        "/models/*model",
        post(|Path(model): Path<String>, headers: HeaderMap, body: Bytes| async move {
            if !authorized(&headers) {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            let is_octet = headers
                .get(header::CONTENT_TYPE)
                .map(|v| v == "application/octet-stream")
                .unwrap_or(false);
            match model.as_str() {
                "unitary/toxic-bert" => {
                    let input: Value = serde_json::from_slice(&body).unwrap();
                    let toxic = input["inputs"].as_str().unwrap_or("").contains("idiot");
                    let score = if toxic { 0.95 } else { 0.02 };
                    Json(json!([[{"label": "toxic", "score": score}, {"label": "insult", "score": 0.3}]]))
                        .into_response()
                }
                "google/vit-base-patch16-224" if is_octet && !body.is_empty() => {
                    Json(json!([{"label": "tabby cat", "score": 0.8}, {"label": "adult content", "score": 0.1}]))
                        .into_response()
                }
                _ => (StatusCode::SERVICE_UNAVAILABLE, "Model is loading").into_response(),
            }
        }),
    );
    serve(router).await
}

#[tokio::test]
async fn huggingface_text_scores() {
    let base = hf_stand_in().await;
    let client = HuggingFaceClient::new(
        base,
        API_KEY,
        "unitary/toxic-bert",
        "google/vit-base-patch16-224",
    )
    .unwrap();

    let scores = client.classify_text("you idiot").await.unwrap();
    assert_eq!(scores[0].label, "toxic");
    assert!(scores[0].score > 0.9);
}

#[tokio::test]
async fn huggingface_image_scores_and_errors() {
    let base = hf_stand_in().await;
    let client = HuggingFaceClient::new(
        base.as_str(),
        API_KEY,
        "unitary/toxic-bert",
        "google/vit-base-patch16-224",
    )
    .unwrap();

    let scores = client
        .classify_image(png(&RgbImage::new(4, 4)))
        .await
        .unwrap();
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].label, "tabby cat");

    let loading = HuggingFaceClient::new(base, API_KEY, "other/model", "other/model").unwrap();
    assert!(matches!(
        loading.classify_text("x").await,
        Err(AppError::Upstream(_))
    ));
}

// =============================================================================
// Pollinations
// =============================================================================

#[tokio::test]
async fn pollinations_fetches_image_bytes() {
    let seen: Arc<Mutex<Option<(String, HashMap<String, String>)>>> = Arc::default();
    let router = Router::new()
        .route(
            "/prompt/:prompt",
            get(
                |State(seen): State<Arc<Mutex<Option<(String, HashMap<String, String>)>>>>,
                 Path(prompt): Path<String>,
                 Query(query): Query<HashMap<String, String>>| async move {
                    if prompt == "fail" {
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                    *seen.lock().unwrap() = Some((prompt, query));
                    let image = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
                    ([(header::CONTENT_TYPE, "image/png")], png(&image)).into_response()
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(router).await;
    let client = PollinationsClient::new(base).unwrap();

    let bytes = client
        .generate(ImageRequest {
            prompt: "olive trees, at dusk!".into(),
            width: 640,
            height: 480,
            seed: Some(42),
        })
        .await
        .unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);

    let (prompt, query) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(prompt, "olive trees, at dusk!");
    assert_eq!(query["width"], "640");
    assert_eq!(query["height"], "480");
    assert_eq!(query["nologo"], "true");
    assert_eq!(query["seed"], "42");

    let err = client
        .generate(ImageRequest {
            prompt: "fail".into(),
            width: 1,
            height: 1,
            seed: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
}

// =============================================================================
// Segmentation
// =============================================================================

#[tokio::test]
async fn remote_segmenter_decodes_masks() {
    let router = Router::new().route(
        "/segment",
        post(|Json(body): Json<Value>| async move {
            let bytes = STANDARD.decode(body["image"].as_str().unwrap()).unwrap();
            let image = image::load_from_memory(&bytes).unwrap();
            let (w, h) = (image.width(), image.height());
            let mask = GrayImage::from_fn(w, h, |x, _| if x < w / 2 { Luma([255]) } else { Luma([0]) });
            let mut out = Cursor::new(Vec::new());
            mask.write_to(&mut out, ImageFormat::Png).unwrap();
            Json(json!({"masks": [STANDARD.encode(out.into_inner())]}))
        }),
    );
    let base = serve(router).await;
    let segmenter = HttpSegmenter::new(format!("{}/segment", base)).unwrap();

    let masks = segmenter.segment(&RgbImage::new(8, 4)).await.unwrap();
    assert_eq!(masks.len(), 1);
    assert_eq!(masks[0].dimensions(), (8, 4));
    assert_eq!(masks[0].area(), 16);
}
