//! Full pipeline tests: stage → transform → download, and the cleanup
//! invariant on success and failure paths.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pdfmill_api::{app, AppConfig, AppState, UploadResponse};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const BOUNDARY: &str = "pdfmill-test-boundary";

fn test_state(dir: &TempDir) -> Arc<AppState> {
    let config = AppConfig {
        upload_dir: dir.path().join("uploads"),
        processed_dir: dir.path().join("processed"),
        ..AppConfig::default()
    };
    config.ensure_dirs().unwrap();
    Arc::new(AppState::new(config))
}

fn multipart_body(files: &[(&str, &[u8])], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; \
                 filename=\"{name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(tool: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/upload/{tool}/"))
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn sample_pdf_bytes(page_texts: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24_i64.into()]),
                Operation::new("Td", vec![72_i64.into(), 720_i64.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), 612_i64.into(), 792_i64.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn upload_dir_entries(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path().join("uploads")).unwrap().count()
}

async fn parse_upload_response(response: axum::response::Response) -> UploadResponse {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn merge_round_trip_produces_a_downloadable_artifact() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let a = sample_pdf_bytes(&["a1", "a2"]);
    let b = sample_pdf_bytes(&["b1", "b2", "b3"]);
    let body = multipart_body(&[("a.pdf", &a), ("b.pdf", &b)], &[]);

    let response = app(state.clone())
        .oneshot(upload_request("merge", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload = parse_upload_response(response).await;
    assert!(upload.filename.ends_with(".pdf"));
    assert_eq!(upload.download_url, format!("/download/{}", upload.filename));

    // Ingest area is clean, output area holds exactly the artifact.
    assert_eq!(upload_dir_entries(&dir), 0);
    let artifact_path = dir.path().join("processed").join(&upload.filename);
    assert!(artifact_path.exists());

    let merged = lopdf::Document::load(&artifact_path).unwrap();
    assert_eq!(merged.get_pages().len(), 5);

    // And the download endpoint serves it as an attachment.
    let response = app(state)
        .oneshot(
            Request::builder()
                .uri(&upload.download_url)
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        &format!("attachment; filename=\"{}\"", upload.filename)
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn split_round_trip_extracts_the_selected_pages() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let pdf = sample_pdf_bytes(&["p1", "p2", "p3", "p4", "p5"]);
    let body = multipart_body(&[("doc.pdf", &pdf)], &[("ranges", "1-2,4")]);

    let response = app(state)
        .oneshot(upload_request("split", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload = parse_upload_response(response).await;
    let artifact = lopdf::Document::load(dir.path().join("processed").join(&upload.filename))
        .unwrap();
    assert_eq!(artifact.get_pages().len(), 3);
    assert_eq!(upload_dir_entries(&dir), 0);
}

#[tokio::test]
async fn rotate_round_trip_updates_page_rotation() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let pdf = sample_pdf_bytes(&["p1", "p2"]);
    let body = multipart_body(&[("doc.pdf", &pdf)], &[("angle", "180")]);

    let response = app(state)
        .oneshot(upload_request("rotate", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload = parse_upload_response(response).await;
    let artifact = lopdf::Document::load(dir.path().join("processed").join(&upload.filename))
        .unwrap();
    for page_id in artifact.get_pages().into_values() {
        let rotation = artifact
            .get_object(page_id)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"Rotate")
            .unwrap()
            .as_i64()
            .unwrap();
        assert_eq!(rotation, 180);
    }
}

#[tokio::test]
async fn failed_dispatch_still_cleans_the_ingest_area() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let pdf = sample_pdf_bytes(&["only page"]);
    let body = multipart_body(&[("doc.pdf", &pdf)], &[("ranges", "9")]);

    let response = app(state)
        .oneshot(upload_request("split", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(upload_dir_entries(&dir), 0);
    // No artifact is produced for a failed request.
    let produced = std::fs::read_dir(dir.path().join("processed")).unwrap().count();
    assert_eq!(produced, 0);
}

#[tokio::test]
async fn mid_batch_rejection_cleans_earlier_staged_files() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let good = sample_pdf_bytes(&["fine"]);
    let body = multipart_body(&[("good.pdf", &good), ("evil.exe", b"MZ")], &[]);

    let response = app(state)
        .oneshot(upload_request("merge", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The first file was already staged when the second was rejected; it
    // must not leak.
    assert_eq!(upload_dir_entries(&dir), 0);
}

#[tokio::test]
async fn watermark_round_trip_keeps_page_count() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let pdf = sample_pdf_bytes(&["p1", "p2", "p3"]);
    let body = multipart_body(&[("doc.pdf", &pdf)], &[("text", "CONFIDENTIAL")]);

    let response = app(state)
        .oneshot(upload_request("add-watermark", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload = parse_upload_response(response).await;
    let artifact = lopdf::Document::load(dir.path().join("processed").join(&upload.filename))
        .unwrap();
    assert_eq!(artifact.get_pages().len(), 3);
}

#[tokio::test]
async fn pdf_to_word_round_trip_produces_a_docx() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);

    let pdf = sample_pdf_bytes(&["hello conversion"]);
    let body = multipart_body(&[("doc.pdf", &pdf)], &[]);

    let response = app(state)
        .oneshot(upload_request("pdf-to-word", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload = parse_upload_response(response).await;
    assert!(upload.filename.ends_with(".docx"));
    let bytes = std::fs::read(dir.path().join("processed").join(&upload.filename)).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(upload_dir_entries(&dir), 0);
}
