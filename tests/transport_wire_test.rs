mod common;

use common::{client_for, config_for, direct_transport, OneShotServer, TOKEN};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tgbot_api::markup::{inline_keyboard, InlineKeyboardButton};
use tgbot_api::{BotConfig, ErrorSink, InputFile, Params, ProxyConfig, Telegram};

fn params(pairs: serde_json::Value) -> Params {
    pairs.as_object().cloned().unwrap_or_default()
}

#[test]
fn post_sends_form_encoded_fields() {
    let server = OneShotServer::respond(200, r#"{"ok":true,"result":{"message_id":7}}"#);
    let client = client_for(&server.base);

    let response = client
        .send_message(params(json!({
            "chat_id": 42,
            "text": "hello & goodbye",
            "disable_notification": true,
            "reply_to_message_id": null,
            "reply_markup": inline_keyboard(vec![vec![InlineKeyboardButton::callback("Yes", "y")]]),
        })))
        .unwrap();
    assert_eq!(response["result"]["message_id"], 7);

    let req = server.captured();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, format!("/bot{TOKEN}/sendMessage"));
    assert!(req
        .header("content-type")
        .unwrap()
        .starts_with("application/x-www-form-urlencoded"));
    assert_eq!(req.form_value("chat_id").as_deref(), Some("42"));
    assert_eq!(req.form_value("text").as_deref(), Some("hello & goodbye"));
    assert_eq!(req.form_value("disable_notification").as_deref(), Some("true"));
    assert_eq!(req.form_value("reply_to_message_id"), None);

    let markup: serde_json::Value =
        serde_json::from_str(&req.form_value("reply_markup").unwrap()).unwrap();
    assert_eq!(markup["inline_keyboard"][0][0]["callback_data"], "y");
}

#[test]
fn parameterless_operation_is_bodiless_get() {
    let server = OneShotServer::respond(200, r#"{"ok":true,"result":{"id":1,"is_bot":true}}"#);
    let client = client_for(&server.base);

    let me = client.get_me().unwrap();
    assert_eq!(me["result"]["is_bot"], true);

    let req = server.captured();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, format!("/bot{TOKEN}/getMe"));
    assert!(req.body.is_empty());
}

#[test]
fn unknown_operation_without_params_is_get() {
    let server = OneShotServer::respond(200, r#"{"ok":true,"result":[]}"#);
    let client = client_for(&server.base);

    client.call("getSomethingNew", None).unwrap();

    let req = server.captured();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, format!("/bot{TOKEN}/getSomethingNew"));
}

#[test]
fn unknown_operation_with_params_is_post() {
    let server = OneShotServer::respond(200, r#"{"ok":true,"result":true}"#);
    let client = client_for(&server.base);

    client
        .call("doSomethingNew", Some(params(json!({"chat_id": "@channel", "ids": [1, 2]}))))
        .unwrap();

    let req = server.captured();
    assert_eq!(req.method, "POST");
    assert_eq!(req.form_value("chat_id").as_deref(), Some("@channel"));
    assert_eq!(req.form_value("ids").as_deref(), Some("[1,2]"));
}

#[test]
fn api_error_body_is_returned_verbatim() {
    let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
    let server = OneShotServer::respond(400, body);
    let client = client_for(&server.base);

    let response = client.send_message(params(json!({"chat_id": 0, "text": "x"}))).unwrap();
    assert_eq!(response["ok"], false);
    assert_eq!(response["error_code"], 400);
    assert_eq!(response["description"], "Bad Request: chat not found");
    server.captured();
}

#[test]
fn non_json_body_is_none() {
    let server = OneShotServer::respond(200, "<html>gateway</html>");
    let client = client_for(&server.base);
    assert!(client.get_me().is_none());
    server.captured();
}

#[test]
fn get_updates_pulls_batch_over_http() {
    let server = OneShotServer::respond(
        200,
        r#"{"ok":true,"result":[{"update_id":100,"message":{"text":"a"}},{"update_id":101,"poll":{}}]}"#,
    );
    let mut client = client_for(&server.base);

    let batch = client.get_updates(params(json!({"offset": 100, "timeout": 0})));
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[1]["update_id"], 101);
    assert_eq!(tgbot_api::updates::next_offset(&batch), Some(102));
    assert_eq!(client.push_payload(), &json!({}));

    let req = server.captured();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, format!("/bot{TOKEN}/getUpdates"));
    assert_eq!(req.form_value("offset").as_deref(), Some("100"));
}

#[derive(Default)]
struct CountingSink {
    calls: Mutex<Vec<String>>,
}

impl ErrorSink for CountingSink {
    fn log(&self, url: &str, _params: &Params, _error: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }
}

#[test]
fn connection_failure_reports_once_and_returns_none() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{port}");
    let config = config_for(&base);
    let sink = Arc::new(CountingSink::default());
    let client = Telegram::builder(config.clone())
        .build_with_transport(direct_transport(&config, sink.clone()));

    assert!(client.send_message(params(json!({"chat_id": 1, "text": "x"}))).is_none());

    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], format!("{base}/bot{TOKEN}/sendMessage"));
}

#[test]
fn file_upload_is_sent_as_multipart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cat.png");
    std::fs::write(&path, b"not-really-a-png").unwrap();

    let server = OneShotServer::respond(200, r#"{"ok":true,"result":{"message_id":9}}"#);
    let client = client_for(&server.base);

    let response = client
        .send_photo(params(json!({
            "chat_id": 42,
            "caption": "look",
            "photo": serde_json::Value::from(InputFile::path(&path).mime_type("image/png")),
        })))
        .unwrap();
    assert_eq!(response["result"]["message_id"], 9);

    let req = server.captured();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, format!("/bot{TOKEN}/sendPhoto"));
    assert!(req
        .header("content-type")
        .unwrap()
        .starts_with("multipart/form-data; boundary="));
    assert!(req
        .body
        .contains(r#"Content-Disposition: form-data; name="photo"; filename="cat.png""#));
    assert!(req.body.contains("Content-Type: image/png"));
    assert!(req.body.contains("not-really-a-png"));
    assert!(req.body.contains(r#"name="chat_id""#));
    assert!(req.body.contains("\r\n\r\n42\r\n"));
    assert!(req.body.contains("\r\n\r\nlook\r\n"));
}

#[test]
fn params_without_files_stay_urlencoded() {
    let server = OneShotServer::respond(200, r#"{"ok":true,"result":true}"#);
    let client = client_for(&server.base);

    client
        .send_photo(params(json!({"chat_id": 42, "photo": "AgACAgIAAxkBAAIB"})))
        .unwrap();

    let req = server.captured();
    assert!(req
        .header("content-type")
        .unwrap()
        .starts_with("application/x-www-form-urlencoded"));
    assert_eq!(req.form_value("photo").as_deref(), Some("AgACAgIAAxkBAAIB"));
}

fn proxied_config(proxy: ProxyConfig) -> BotConfig {
    BotConfig {
        proxy: Some(proxy),
        ..config_for("http://api.telegram.invalid")
    }
}

#[test]
fn request_goes_through_configured_proxy_with_auth() {
    let proxy_server = OneShotServer::respond(200, r#"{"ok":true,"result":{"id":1}}"#);
    let port: u16 = proxy_server.base.rsplit(':').next().unwrap().parse().unwrap();

    let client = Telegram::new(proxied_config(ProxyConfig {
        port: Some(port),
        auth: Some("alice:s3cret".into()),
        ..ProxyConfig::host("127.0.0.1")
    }))
    .unwrap();

    assert_eq!(client.get_me().unwrap()["result"]["id"], 1);

    let req = proxy_server.captured();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, format!("http://api.telegram.invalid/bot{TOKEN}/getMe"));
    // base64("alice:s3cret")
    assert_eq!(req.header("proxy-authorization"), Some("Basic YWxpY2U6czNjcmV0"));
}

#[test]
fn proxy_with_only_host_uses_transport_defaults() {
    let proxy_server = OneShotServer::respond(200, r#"{"ok":true,"result":true}"#);
    let authority = proxy_server.base.trim_start_matches("http://").to_string();

    let client = Telegram::new(proxied_config(ProxyConfig::host(authority))).unwrap();
    client
        .send_message(params(json!({"chat_id": 1, "text": "via proxy"})))
        .unwrap();

    let req = proxy_server.captured();
    assert_eq!(req.method, "POST");
    assert_eq!(
        req.path,
        format!("http://api.telegram.invalid/bot{TOKEN}/sendMessage")
    );
    assert_eq!(req.header("proxy-authorization"), None);
    assert_eq!(req.form_value("text").as_deref(), Some("via proxy"));
}
