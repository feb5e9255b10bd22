use std::collections::HashMap;

use futures_util::future::join_all;
use sailthru_client::{Client, ClientConfig, Credentials, Signer};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Echoes the payload back along with whether its signature checked out.
fn echo_signed(req: &Request) -> ResponseTemplate {
    let signer = Signer::new(Credentials::new("abc", "xyz"));
    let fields: HashMap<String, String> = req.url.query_pairs().into_owned().collect();

    let json_text = fields.get("json").cloned().unwrap_or_default();
    let sig_ok = fields.get("sig") == Some(&signer.signature(&json_text));
    let payload: Value = serde_json::from_str(&json_text).unwrap_or(Value::Null);

    ResponseTemplate::new(200).set_body_json(json!({
        "payload": payload,
        "sig_ok": sig_ok,
    }))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_client_keeps_calls_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(echo_signed)
        .expect(64)
        .mount(&server)
        .await;

    let config = ClientConfig::default().with_base_url(server.uri());
    let client = Client::new(Credentials::new("abc", "xyz"), config).unwrap();

    let tasks = (0..64).map(|id| {
        let client = client.clone();
        tokio::spawn(async move {
            let response = client.get("user", &json!({ "id": id })).await.unwrap();
            (id, response)
        })
    });

    for joined in join_all(tasks).await {
        let (id, response) = joined.unwrap();
        assert_eq!(response.get("sig_ok"), Some(&json!(true)));
        assert_eq!(response.get("payload"), Some(&json!({ "id": id })));
    }
}
