//! Image list integration tests.
//!
//! Run with: `cargo test -p qrdrop-api --test images_test`

mod helpers;

use axum_test::TestServer;
use helpers::{fixtures, setup_test_app};
use uuid::Uuid;

async fn upload_via_handoff(client: &TestServer, cookie: &str) -> String {
    let qr = client.get("/generate-qr").add_header("Cookie", cookie).await;
    assert_eq!(qr.status_code(), 200);
    let token = qr.header("x-upload-token").to_str().unwrap().to_string();

    let response = client
        .post(&format!("/upload/{}", token))
        .multipart(fixtures::png_upload_form())
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    body["imageUrl"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_list_images_requires_session() {
    let app = setup_test_app();

    let response = app.client().get("/user/images").await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_list_images_empty_for_new_user() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/user/images")
        .add_header("Cookie", app.session_cookie(Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code(), 200);

    let images: serde_json::Value = response.json();
    assert_eq!(images, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_images_in_upload_order() {
    let app = setup_test_app();
    let client = app.client();
    let user_id = Uuid::new_v4();
    let cookie = app.session_cookie(user_id);

    let first = upload_via_handoff(client, &cookie).await;
    let second = upload_via_handoff(client, &cookie).await;

    let images: serde_json::Value = client
        .get("/user/images")
        .add_header("Cookie", &cookie)
        .await
        .json();
    let images = images.as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["url"], first.as_str());
    assert_eq!(images[1]["url"], second.as_str());
    for image in images {
        assert_eq!(image["userId"], user_id.to_string().as_str());
        assert!(Uuid::parse_str(image["id"].as_str().unwrap()).is_ok());
    }
}

#[tokio::test]
async fn test_list_images_isolated_per_user() {
    let app = setup_test_app();
    let client = app.client();
    let alice = app.session_cookie(Uuid::new_v4());
    let bob = app.session_cookie(Uuid::new_v4());

    let alice_url = upload_via_handoff(client, &alice).await;

    let bob_images: serde_json::Value = client
        .get("/user/images")
        .add_header("Cookie", &bob)
        .await
        .json();
    assert!(bob_images.as_array().unwrap().is_empty());

    let bob_url = upload_via_handoff(client, &bob).await;

    let alice_images: serde_json::Value = client
        .get("/user/images")
        .add_header("Cookie", &alice)
        .await
        .json();
    let alice_images = alice_images.as_array().unwrap();
    assert_eq!(alice_images.len(), 1);
    assert_eq!(alice_images[0]["url"], alice_url.as_str());
    assert_ne!(alice_url, bob_url);
}
