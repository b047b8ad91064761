//! Integration tests for the public payload ingest endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serial_test::serial;
    use tower::util::ServiceExt;

    use hookbin::api::public::webhooks::{PayloadRecord, ReceiveAck, Webhook};

    use crate::test_utils::{basic_auth, body_to_string, create_webhook, post_payload, test_app};

    async fn fetch_payloads(app: &axum::Router, webhook_id: &str) -> Vec<PayloadRecord> {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/webhooks/{}/payloads", webhook_id))
                    .header("authorization", basic_auth())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        serde_json::from_str(&body).unwrap()
    }

    async fn fetch_webhook(app: &axum::Router, webhook_id: &str) -> Webhook {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/webhooks/{}", webhook_id))
                    .header("authorization", basic_auth())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_string(response.into_body()).await;
        serde_json::from_str(&body).unwrap()
    }

    /// Tests a valid JSON payload is stored and acked with a timestamp
    #[tokio::test]
    #[serial]
    async fn it_stores_valid_payload() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let payload = serde_json::json!({"key": "value", "test": true});
        let response = post_payload(&app, &webhook.id, payload.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        let ack: ReceiveAck = serde_json::from_str(&body).unwrap();
        assert_eq!(ack.status, "received");
        assert!(!ack.timestamp.is_empty());

        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].body, payload);
        assert_eq!(payloads[0].received_at, ack.timestamp);

        let webhook = fetch_webhook(&app, &webhook.id).await;
        assert_eq!(webhook.success_count, 1);
        assert_eq!(webhook.failure_count, 0);
        assert_eq!(webhook.last_payload_at, Some(ack.timestamp));
    }

    /// Tests every delivery adds exactly one payload record
    #[tokio::test]
    #[serial]
    async fn it_increases_payload_count_by_one_per_delivery() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        for n in 1..=3 {
            let response = post_payload(&app, &webhook.id, serde_json::json!({"n": n})).await;
            assert_eq!(response.status(), StatusCode::OK);
            let payloads = fetch_payloads(&app, &webhook.id).await;
            assert_eq!(payloads.len(), n);
        }
    }

    /// Tests duplicate posts create duplicate records
    #[tokio::test]
    #[serial]
    async fn it_stores_duplicate_payloads() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let payload = serde_json::json!({"same": "thing"});
        post_payload(&app, &webhook.id, payload.clone()).await;
        post_payload(&app, &webhook.id, payload.clone()).await;

        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].body, payload);
        assert_eq!(payloads[1].body, payload);
    }

    /// Tests any JSON value is accepted, not just objects
    #[tokio::test]
    #[serial]
    async fn it_accepts_any_json_shape() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        for payload in [
            serde_json::json!([1, 2, 3]),
            serde_json::json!("just a string"),
            serde_json::json!(42),
            serde_json::json!(null),
            serde_json::json!({"nested": {"deeply": [{"a": 1}]}}),
        ] {
            let response = post_payload(&app, &webhook.id, payload).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert_eq!(payloads.len(), 5);
    }

    /// Tests posting to an unknown webhook id returns 404 and records nothing
    #[tokio::test]
    #[serial]
    async fn it_returns_404_for_unknown_webhook() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let response = post_payload(&app, "does-not-exist", serde_json::json!({"a": 1})).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("error"));

        // Nothing was recorded against the webhook that does exist
        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert!(payloads.is_empty());
    }

    /// Tests a non-JSON body returns 400 and records a failure
    #[tokio::test]
    #[serial]
    async fn it_returns_400_for_invalid_json() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/webhook/{}", webhook.id))
                    .method("POST")
                    .body(Body::from("this is not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert!(payloads.is_empty());

        let webhook = fetch_webhook(&app, &webhook.id).await;
        assert_eq!(webhook.success_count, 0);
        assert_eq!(webhook.failure_count, 1);
    }

    /// Tests a non-UTF-8 body returns 400 and records a failure
    #[tokio::test]
    #[serial]
    async fn it_records_failure_for_non_utf8_body() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/webhook/{}", webhook.id))
                    .method("POST")
                    .body(Body::from(vec![0xff, 0xfe, 0xfd]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let webhook = fetch_webhook(&app, &webhook.id).await;
        assert_eq!(webhook.success_count, 0);
        assert_eq!(webhook.failure_count, 1);
    }

    /// Tests an unknown webhook id wins over an unreadable body
    #[tokio::test]
    #[serial]
    async fn it_returns_404_for_non_utf8_body_to_unknown_webhook() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/webhook/does-not-exist")
                    .method("POST")
                    .body(Body::from(vec![0xff, 0xfe, 0xfd]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests ingestion ignores the content type header entirely
    #[tokio::test]
    #[serial]
    async fn it_ignores_content_type() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/webhook/{}", webhook.id))
                    .method("POST")
                    .header("content-type", "text/plain")
                    .body(Body::from(r#"{"still": "json"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Tests ingestion requires no credentials
    #[tokio::test]
    #[serial]
    async fn it_requires_no_auth() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        // No authorization header on the ingest request
        let response = post_payload(&app, &webhook.id, serde_json::json!({"open": true})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Tests payload listing order is most recent first
    #[tokio::test]
    #[serial]
    async fn it_lists_payloads_most_recent_first() {
        let app = test_app().await;
        let webhook = create_webhook(&app).await;

        for n in 1..=3 {
            post_payload(&app, &webhook.id, serde_json::json!({"n": n})).await;
        }

        let payloads = fetch_payloads(&app, &webhook.id).await;
        assert_eq!(payloads.len(), 3);
        assert_eq!(payloads[0].body, serde_json::json!({"n": 3}));
        assert_eq!(payloads[1].body, serde_json::json!({"n": 2}));
        assert_eq!(payloads[2].body, serde_json::json!({"n": 1}));

        // Receipt timestamps are non-increasing from newest to oldest
        assert!(payloads[0].received_at >= payloads[1].received_at);
        assert!(payloads[1].received_at >= payloads[2].received_at);
    }
}
