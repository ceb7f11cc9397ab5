//! End-to-end API tests over the in-memory stack.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use fd_bus::{InMemoryBroker, MessagePublisher};
use fd_gateway::{router, AppState};
use fd_ingest::{
    DocumentService, DocumentStore, IngestCoordinator, InMemoryDocumentStore,
};
use http_body_util::BodyExt;
use shared_crypto::PayloadCipher;
use shared_types::constants::routing;
use tower::ServiceExt;

const NFE_XML: &str = r#"<?xml version="1.0"?>
<nfeProc>
  <NFe>
    <infNFe Id="NFe35220312345678000195550010000000011234567890">
      <emit>
        <CNPJ>12345678000195</CNPJ>
        <xNome>Empresa Teste LTDA</xNome>
        <enderEmit><UF>SP</UF></enderEmit>
      </emit>
      <dest><CNPJ>98765432000188</CNPJ><xNome>Cliente Final SA</xNome></dest>
      <total><ICMSTot><vNF>1500.75</vNF></ICMSTot></total>
      <ide><dhEmi>2024-03-15T10:30:00-03:00</dhEmi></ide>
    </infNFe>
  </NFe>
</nfeProc>"#;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn app() -> Router {
    let store = Arc::new(InMemoryDocumentStore::new());
    let broker = Arc::new(InMemoryBroker::new());
    broker.declare_queue(routing::QUEUE);
    broker
        .bind_queue(routing::QUEUE, routing::BINDING_PATTERN)
        .unwrap();

    let coordinator = Arc::new(IngestCoordinator::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::new(PayloadCipher::new([0x42; 32], [0x24; 12])),
        broker as Arc<dyn MessagePublisher>,
    ));
    let service = Arc::new(DocumentService::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>
    ));

    router(AppState {
        coordinator,
        service,
    })
}

fn multipart_request(filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"xmlFile\"; filename=\"{filename}\"\r\n\
             Content-Type: application/xml\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/documents/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_then_fetch_detail() {
    let app = app();

    let response = app
        .clone()
        .oneshot(multipart_request("nota.xml", NFE_XML.as_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = json_body(response).await;
    assert_eq!(outcome["isNew"], true);
    assert_eq!(outcome["message"], "created");
    let id = outcome["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let detail = json_body(response).await;
    assert_eq!(detail["documentType"], "NFe");
    assert_eq!(
        detail["documentKey"],
        "35220312345678000195550010000000011234567890"
    );
    assert_eq!(detail["emitterTaxId"], "12345678000195");
    assert_eq!(detail["processingStatus"], "Pending");
    // Encrypted payload never leaves the server.
    assert!(detail.get("encryptedPayload").is_none());
}

#[tokio::test]
async fn test_reupload_reports_duplicate() {
    let app = app();

    let first = json_body(
        app.clone()
            .oneshot(multipart_request("nota.xml", NFE_XML.as_bytes()))
            .await
            .unwrap(),
    )
    .await;

    let response = app
        .oneshot(multipart_request("nota-copy.xml", NFE_XML.as_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let second = json_body(response).await;
    assert_eq!(second["isNew"], false);
    assert_eq!(second["message"], "duplicate-by-hash");
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
async fn test_upload_rejects_non_xml_filename() {
    let response = app()
        .oneshot(multipart_request("nota.pdf", NFE_XML.as_bytes()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await.get("error").is_some());
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let response = app()
        .oneshot(multipart_request("nota.xml", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_malformed_xml() {
    let response = app()
        .oneshot(multipart_request("nota.xml", b"not xml <<<"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_filters_and_pagination() {
    let app = app();
    app.clone()
        .oneshot(multipart_request("nota.xml", NFE_XML.as_bytes()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/documents?page=1&pageSize=5&documentType=NFe&region=SP")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let list = json_body(response).await;
    assert_eq!(list["totalCount"], 1);
    assert_eq!(list["page"], 1);
    assert_eq!(list["pageSize"], 5);
    assert_eq!(list["items"][0]["documentType"], "NFe");
    // Summaries omit payload and hash.
    assert!(list["items"][0].get("contentHash").is_none());

    // A filter that matches nothing.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/documents?documentType=CTe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let list = json_body(response).await;
    assert_eq!(list["totalCount"], 0);
}

#[tokio::test]
async fn test_list_rejects_unknown_document_type() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/documents?documentType=NFCe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_round_trip() {
    let app = app();
    let outcome = json_body(
        app.clone()
            .oneshot(multipart_request("nota.xml", NFE_XML.as_bytes()))
            .await
            .unwrap(),
    )
    .await;
    let id = outcome["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/documents/{id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"processingStatus":"Processed","emitterName":"  "}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = json_body(response).await;
    assert_eq!(updated["processingStatus"], "Processed");
    // Blank update fields leave existing values alone.
    assert_eq!(updated["emitterName"], "Empresa Teste LTDA");
    assert!(!updated["updatedAt"].is_null());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/documents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_id_is_404_with_error_body() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri(format!("/api/documents/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_body(response).await.get("error").is_some());
}
