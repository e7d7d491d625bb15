mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{api_path, generate_code, setup_test_app, setup_test_app_with, TestApp, TEST_PNG};
use serde_json::Value;

fn png_part(filename: &str) -> Part {
    Part::bytes(TEST_PNG.to_vec())
        .file_name(filename)
        .mime_type("image/png")
}

async fn upload(app: &TestApp, form: MultipartForm) -> axum_test::TestResponse {
    app.client().post(&api_path("/files")).multipart(form).await
}

#[tokio::test]
async fn test_upload_and_list_roundtrip() {
    let app = setup_test_app().await;
    let code = generate_code(&app).await;

    let form = MultipartForm::new()
        .add_text("device_code", code.clone())
        .add_part("files", png_part("a.png"));
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 201);

    let body: Value = response.json();
    assert_eq!(body.get("uploaded").and_then(|v| v.as_u64()), Some(1));

    let record = &body["files"][0];
    assert_eq!(record.get("kind").and_then(|v| v.as_str()), Some("image"));
    assert_eq!(
        record.get("originalName").and_then(|v| v.as_str()),
        Some("a.png")
    );
    let stored_name = record
        .get("storedName")
        .and_then(|v| v.as_str())
        .expect("storedName");
    assert_ne!(stored_name, "a.png");
    assert!(stored_name.ends_with(".png"));
    assert_eq!(
        record.get("sizeBytes").and_then(|v| v.as_u64()),
        Some(TEST_PNG.len() as u64)
    );

    // The list reflects the upload
    let response = app
        .client()
        .get(&api_path("/files"))
        .add_query_param("code", &code)
        .await;
    assert_eq!(response.status_code(), 200);
    let files: Value = response.json();
    let files = files.as_array().expect("array");
    assert_eq!(files.len(), 1);
    assert_eq!(
        files[0].get("storedName").and_then(|v| v.as_str()),
        Some(stored_name)
    );

    // The bytes are served back under /uploads/{code}/{storedName}
    let response = app
        .client()
        .get(&format!("/uploads/{}/{}", code, stored_name))
        .await;
    assert_eq!(response.status_code(), 200);
    let bytes = response.as_bytes();
    assert_eq!(&bytes[..], TEST_PNG);
}

#[tokio::test]
async fn test_upload_preserves_order() {
    let app = setup_test_app().await;
    let code = generate_code(&app).await;

    let form = MultipartForm::new()
        .add_text("device_code", code.clone())
        .add_part("files", png_part("first.png"))
        .add_part(
            "files",
            Part::bytes(b"%PDF-1.4 test".to_vec())
                .file_name("second.pdf")
                .mime_type("application/pdf"),
        );
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 201);

    let response = app
        .client()
        .get(&api_path("/files"))
        .add_query_param("code", &code)
        .await;
    let files: Value = response.json();
    let files = files.as_array().expect("array");
    assert_eq!(files.len(), 2);
    assert_eq!(
        files[0].get("originalName").and_then(|v| v.as_str()),
        Some("first.png")
    );
    assert_eq!(files[0].get("kind").and_then(|v| v.as_str()), Some("image"));
    assert_eq!(
        files[1].get("originalName").and_then(|v| v.as_str()),
        Some("second.pdf")
    );
    assert_eq!(files[1].get("kind").and_then(|v| v.as_str()), Some("pdf"));
}

#[tokio::test]
async fn test_upload_unknown_code_is_404() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("device_code", "000000")
        .add_part("files", png_part("a.png"));
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("INVALID_CODE")
    );
}

#[tokio::test]
async fn test_upload_disallowed_content_type_is_400() {
    let app = setup_test_app().await;
    let code = generate_code(&app).await;

    let form = MultipartForm::new()
        .add_text("device_code", code.clone())
        .add_part(
            "files",
            Part::bytes(b"hello".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 400);

    // Nothing was recorded for the code
    let response = app
        .client()
        .get(&api_path("/files"))
        .add_query_param("code", &code)
        .await;
    let files: Value = response.json();
    assert_eq!(files.as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn test_upload_without_files_is_400() {
    let app = setup_test_app().await;
    let code = generate_code(&app).await;

    let form = MultipartForm::new().add_text("device_code", code);
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_without_device_code_is_400() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part("files", png_part("a.png"));
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_too_many_files_is_400() {
    let app = setup_test_app().await;
    let code = generate_code(&app).await;

    let mut form = MultipartForm::new().add_text("device_code", code);
    for n in 0..11 {
        form = form.add_part("files", png_part(&format!("file-{}.png", n)));
    }
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_oversized_file_is_413() {
    let config = droplink_core::Config {
        max_file_size_bytes: 16,
        ..droplink_core::Config::default()
    };
    let app = setup_test_app_with(config).await;
    let code = generate_code(&app).await;

    let form = MultipartForm::new()
        .add_text("device_code", code)
        .add_part("files", png_part("big.png"));
    let response = upload(&app, form).await;
    assert_eq!(response.status_code(), 413);

    let body: Value = response.json();
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("PAYLOAD_TOO_LARGE")
    );
}
