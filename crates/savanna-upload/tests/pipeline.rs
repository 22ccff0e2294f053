use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Matcher, Server};
use savanna_api_client::{ApiClient, Session};
use savanna_core::config::VendorConfig;
use savanna_core::constants::{MAX_UPLOAD_BYTES, UPLOAD_FOLDER};
use savanna_core::models::UploadSignature;
use savanna_core::{issue_signature, SignatureAlgorithm};
use savanna_upload::{
    AssetUploader, BatchUploader, DirectUploader, PendingFile, SignatureProvider, UploadError,
};
use uuid::Uuid;

const SIGNATURE_JSON: &str = r#"{"signature":"0123abcd","timestamp":1700000000,"cloud_name":"demo","api_key":"123456","folder":"savanna/uploads"}"#;

fn asset_json(name: &str) -> String {
    format!(
        r#"{{"secure_url":"https://res.cloudinary.com/demo/image/upload/v1/savanna/uploads/{name}","public_id":"savanna/uploads/{name}"}}"#
    )
}

fn photo_json(category: Uuid) -> String {
    format!(
        r#"{{"id":"{}","categoryId":"{}","imageUrl":"https://res.cloudinary.com/demo/image/upload/v1/savanna/uploads/x.jpg","featured":false,"createdAt":"2025-01-01T00:00:00Z"}}"#,
        Uuid::new_v4(),
        category
    )
}

fn admin_client(url: String) -> ApiClient {
    let mut session = Session::anonymous();
    session.login("jwt-token").unwrap();
    ApiClient::new(url, &session).unwrap()
}

/// Signs like the server does, with a new timestamp on every call.
struct CountingSigner {
    vendor: VendorConfig,
    next_timestamp: AtomicI64,
    calls: Arc<AtomicI64>,
}

impl CountingSigner {
    fn new() -> Self {
        Self {
            vendor: VendorConfig {
                cloud_name: "demo".to_string(),
                api_key: "123456".to_string(),
                api_secret: "secret".to_string(),
                base_url: String::new(),
                algorithm: SignatureAlgorithm::Sha1,
            },
            next_timestamp: AtomicI64::new(1_700_000_000),
            calls: Arc::new(AtomicI64::new(0)),
        }
    }
}

#[async_trait]
impl SignatureProvider for CountingSigner {
    async fn fresh_signature(&self) -> anyhow::Result<UploadSignature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let timestamp = self.next_timestamp.fetch_add(1, Ordering::SeqCst);
        Ok(issue_signature(Some(&self.vendor), UPLOAD_FOLDER, timestamp)?)
    }
}

/// Replays the signature issued for 1700000000.
struct StaleSigner;

#[async_trait]
impl SignatureProvider for StaleSigner {
    async fn fresh_signature(&self) -> anyhow::Result<UploadSignature> {
        Ok(UploadSignature {
            signature: "488557a350363a2c8c163727d860dd1b8915f9a0".to_string(),
            timestamp: 1_700_000_000,
            cloud_name: "demo".to_string(),
            api_key: "123456".to_string(),
            folder: UPLOAD_FOLDER.to_string(),
        })
    }
}

#[tokio::test]
async fn direct_upload_skips_app_auth_and_sends_signed_fields() {
    let mut app = Server::new_async().await;
    let mut vendor = Server::new_async().await;

    let sign = app
        .mock("GET", "/api/upload/sign")
        .match_header("authorization", "Bearer jwt-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SIGNATURE_JSON)
        .create_async()
        .await;
    let upload = vendor
        .mock("POST", "/v1_1/demo/image/upload")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="portrait.jpg""#.to_string()),
            Matcher::Regex(r#"name="api_key"\r\n\r\n123456"#.to_string()),
            Matcher::Regex(r#"name="timestamp"\r\n\r\n1700000000"#.to_string()),
            Matcher::Regex(r#"name="signature"\r\n\r\n0123abcd"#.to_string()),
            Matcher::Regex(r#"name="folder"\r\n\r\nsavanna/uploads"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(asset_json("portrait.jpg"))
        .create_async()
        .await;

    let uploader = DirectUploader::new(admin_client(app.url()))
        .unwrap()
        .with_vendor_base_url(vendor.url());
    let asset = uploader
        .upload(PendingFile::from_bytes("portrait.jpg", b"jpeg-bytes".to_vec()))
        .await
        .unwrap();

    assert_eq!(asset.public_id, "savanna/uploads/portrait.jpg");
    assert!(asset.secure_url.starts_with("https://res.cloudinary.com/"));
    sign.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn every_upload_gets_its_own_signature() {
    let mut vendor = Server::new_async().await;
    let first = issue_signature(Some(&CountingSigner::new().vendor), UPLOAD_FOLDER, 1_700_000_000)
        .unwrap()
        .signature;
    let second = issue_signature(Some(&CountingSigner::new().vendor), UPLOAD_FOLDER, 1_700_000_001)
        .unwrap()
        .signature;
    assert_ne!(first, second);

    let mut mocks = Vec::new();
    for signature in [&first, &second] {
        mocks.push(
            vendor
                .mock("POST", "/v1_1/demo/image/upload")
                .match_body(Matcher::Regex(format!(r#"name="signature"\r\n\r\n{}"#, signature)))
                .with_status(200)
                .with_body(asset_json("a.jpg"))
                .expect(1)
                .create_async()
                .await,
        );
    }

    let signer = CountingSigner::new();
    let calls = signer.calls.clone();
    let uploader = DirectUploader::new(signer)
        .unwrap()
        .with_vendor_base_url(vendor.url());

    for name in ["a.jpg", "b.jpg"] {
        uploader
            .upload(PendingFile::from_bytes(name, b"bytes".to_vec()))
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn replayed_signature_is_rejected_by_vendor() {
    let mut vendor = Server::new_async().await;
    let _stale = vendor
        .mock("POST", "/v1_1/demo/image/upload")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Stale request - reported time is 2023-11-14 22:13:20 +0000"}}"#)
        .create_async()
        .await;

    let uploader = DirectUploader::new(StaleSigner)
        .unwrap()
        .with_vendor_base_url(vendor.url());
    let err = uploader
        .upload(PendingFile::from_bytes("a.jpg", b"bytes".to_vec()))
        .await
        .unwrap_err();

    match err {
        UploadError::Vendor { status, message } => {
            assert_eq!(status, 401);
            assert!(message.starts_with("Stale request"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn signature_endpoint_failure_is_signature_error() {
    let mut app = Server::new_async().await;
    let _sign = app
        .mock("GET", "/api/upload/sign")
        .with_status(503)
        .with_body(r#"{"error":"Media host is not configured"}"#)
        .create_async()
        .await;

    let uploader = DirectUploader::new(admin_client(app.url())).unwrap();
    let err = uploader
        .upload(PendingFile::from_bytes("a.jpg", b"bytes".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Signature(_)));
}

#[tokio::test]
async fn five_file_batch_reports_two_distinct_failures() {
    let mut app = Server::new_async().await;
    let mut vendor = Server::new_async().await;
    let category = Uuid::new_v4();

    let sign = app
        .mock("GET", "/api/upload/sign")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SIGNATURE_JSON)
        .expect(4)
        .create_async()
        .await;
    let ok = vendor
        .mock("POST", "/v1_1/demo/image/upload")
        .match_body(Matcher::Regex(
            r#"filename="(one|three|five)\.jpg""#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(asset_json("x.jpg"))
        .expect(3)
        .create_async()
        .await;
    let broken = vendor
        .mock("POST", "/v1_1/demo/image/upload")
        .match_body(Matcher::Regex(r#"filename="four\.jpg""#.to_string()))
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Server error"}}"#)
        .expect(1)
        .create_async()
        .await;
    let photos = app
        .mock("POST", "/api/photos")
        .match_header("authorization", "Bearer jwt-token")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "categoryId": category.to_string()
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(photo_json(category))
        .expect(3)
        .create_async()
        .await;

    let client = admin_client(app.url());
    let uploader = DirectUploader::new(client.clone())
        .unwrap()
        .with_vendor_base_url(vendor.url());
    let batch = BatchUploader::new(uploader, client);

    let files = vec![
        PendingFile::from_bytes("one.jpg", b"1".to_vec()),
        PendingFile::from_bytes("two.jpg", b"2".to_vec()).with_declared_size(MAX_UPLOAD_BYTES + 1),
        PendingFile::from_bytes("three.jpg", b"3".to_vec()),
        PendingFile::from_bytes("four.jpg", b"4".to_vec()),
        PendingFile::from_bytes("five.jpg", b"5".to_vec()),
    ];

    let mut progress = Vec::new();
    let summary = batch
        .upload_batch(files, category, |p| progress.push(p.completed))
        .await;

    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.total_count, 5);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(progress, vec![1, 2, 3, 4, 5]);

    let reason = |name: &str| {
        summary
            .failures
            .iter()
            .find(|f| f.filename == name)
            .map(|f| f.reason.clone())
            .unwrap()
    };
    let too_large = reason("two.jpg");
    let vendor_error = reason("four.jpg");
    assert!(too_large.contains("too large"));
    assert!(vendor_error.contains("500"));
    assert!(vendor_error.contains("Server error"));
    assert_ne!(too_large, vendor_error);

    sign.assert_async().await;
    ok.assert_async().await;
    broken.assert_async().await;
    photos.assert_async().await;
}
