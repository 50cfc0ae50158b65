//! End-to-end transfer flows against the in-memory store: multipart push,
//! pull with restored content type, and error-to-status mapping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use oas_api::routes::transfer::PushResponse;
use oas_api::AppState;
use oas_core::sha256_digest;
use oas_registry::MemoryStore;

const BOUNDARY: &str = "oas-test-boundary";

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (oas_api::app(AppState::new(store.clone())), store)
}

/// Hand-rolled multipart/form-data body. `fields` are plain text fields;
/// `file` is (field filename, content).
fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn push_request(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/push")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

fn json_payload(target_len: usize) -> Vec<u8> {
    let mut entries = Vec::new();
    let mut i = 0;
    while entries.join(",").len() + 2 < target_len {
        entries.push(format!(r#""field{i}": "value number {i}""#));
        i += 1;
    }
    format!("{{{}}}", entries.join(",")).into_bytes()
}

#[tokio::test]
async fn health_probe() {
    let (app, _) = test_app();
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body, serde_json::json!({ "health": "OK" }));
}

#[tokio::test]
async fn large_json_push_pull_roundtrip() {
    let (app, _store) = test_app();
    let payload = json_payload(10 * 1024);

    let resp = app
        .clone()
        .oneshot(push_request(
            &[("repo", "myrepo"), ("tag", "v1")],
            Some(("sbom.json", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let pushed: PushResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(pushed.compressed);
    assert!(pushed.oci_response.media_type.ends_with("+zstd"));
    assert_eq!(pushed.file_sha256_digest, sha256_digest(&payload).to_hex());
    assert!(pushed.compression_stats.is_some());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/pull?repo=myrepo&tag=v1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=v1.json"
    );
    assert_eq!(body_bytes(resp).await, payload);
}

#[tokio::test]
async fn small_json_is_stored_uncompressed() {
    let (app, store) = test_app();
    let payload = json_payload(500);

    let resp = app
        .oneshot(push_request(
            &[("repo", "myrepo"), ("tag", "small")],
            Some(("small.json", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let raw = body_bytes(resp).await;
    let pushed: PushResponse = serde_json::from_slice(&raw).unwrap();
    assert!(!pushed.compressed);
    assert_eq!(pushed.oci_response.media_type, "application/json");

    // compressionStats is omitted entirely, not serialized as null.
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert!(value.get("compressionStats").is_none());

    assert_eq!(store.stored_bytes("myrepo", "small").unwrap(), payload);
}

#[tokio::test]
async fn matching_input_digest_is_accepted() {
    let (app, _) = test_app();
    let payload = json_payload(2048);
    let digest_hex = sha256_digest(&payload).to_hex();

    let resp = app
        .oneshot(push_request(
            &[("repo", "r"), ("tag", "t"), ("inputDigest", &digest_hex)],
            Some(("f.json", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_input_digest_is_rejected_before_store() {
    let (app, store) = test_app();
    let payload = json_payload(2048);
    let wrong = sha256_digest(b"different content").to_hex();

    let resp = app
        .oneshot(push_request(
            &[("repo", "r"), ("tag", "t"), ("inputDigest", &wrong)],
            Some(("f.json", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.push_count(), 0);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn malformed_input_digest_is_an_integrity_rejection() {
    // An unparseable digest can never match, so it maps to the same 400 as
    // a well-formed mismatch, with the store untouched.
    let (app, store) = test_app();
    let resp = app
        .oneshot(push_request(
            &[("repo", "r"), ("tag", "t"), ("inputDigest", "not-hex")],
            Some(("f.json", b"{}")),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.push_count(), 0);
}

#[tokio::test]
async fn missing_repo_field_is_unprocessable() {
    let (app, _) = test_app();
    let resp = app
        .oneshot(push_request(&[("tag", "t")], Some(("f.json", b"{}"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_file_field_is_unprocessable() {
    let (app, _) = test_app();
    let resp = app
        .oneshot(push_request(&[("repo", "r"), ("tag", "t")], None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pull_unknown_artifact_is_not_found() {
    let (app, _) = test_app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/pull?repo=nope&tag=missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn annotation_stripped_artifact_still_decompresses() {
    let (app, store) = test_app();
    let payload = json_payload(8 * 1024);

    let resp = app
        .clone()
        .oneshot(push_request(
            &[("repo", "r"), ("tag", "v1")],
            Some(("doc.json", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Simulate an artifact pushed by a tool that wrote no annotations; the
    // pull path must fall back to the zstd frame magic.
    store.strip_annotations("r", "v1");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/pull?repo=r&tag=v1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_bytes(resp).await, payload);
}

#[tokio::test]
async fn large_png_roundtrips_untouched() {
    let (app, store) = test_app();
    let mut payload = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    payload.resize(2 * 1024 * 1024, 0u8);

    let resp = app
        .clone()
        .oneshot(push_request(
            &[("repo", "r"), ("tag", "img")],
            Some(("image.png", &payload)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let pushed: PushResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(!pushed.compressed);
    assert_eq!(pushed.oci_response.media_type, "image/png");
    assert_eq!(store.stored_bytes("r", "img").unwrap(), payload);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/pull?repo=r&tag=img")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=img.png"
    );
    assert_eq!(body_bytes(resp).await, payload);
}
