use crate::common::{auth, mock_client};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;

fn create_channels(client: &Client, user: &str, count: usize) {
    for i in 0..count {
        let res = client
            .post(format!("/api/v1/users/{user}/channels"))
            .header(ContentType::JSON)
            .header(auth())
            .body(format!(r#"{{"name": "room-{i}", "type": "public"}}"#))
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }
}

#[test]
fn test_channel_listing_reports_total() {
    let client = mock_client();
    create_channels(&client, "pager", 5);

    let res = client
        .get("/api/v1/users/pager/channels?page_size=2")
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["records"].as_array().unwrap().len(), 2);
    assert_eq!(body["total_records"], 5);
    assert_eq!(body["next_page_token"], "2");
}

#[test]
fn test_channel_listing_token_walk() {
    let client = mock_client();
    create_channels(&client, "walker", 5);

    let mut token: Option<String> = None;
    let mut seen = Vec::new();
    loop {
        let path = match &token {
            Some(t) => format!("/api/v1/users/walker/channels?page_size=2&next_page_token={t}"),
            None => "/api/v1/users/walker/channels?page_size=2".to_string(),
        };
        let res = client.get(path).header(auth()).dispatch();
        let body: serde_json::Value = res.into_json().unwrap();
        for r in body["records"].as_array().unwrap() {
            seen.push(r["id"].as_str().unwrap().to_string());
        }
        match body["next_page_token"].as_str() {
            Some(t) => token = Some(t.to_string()),
            None => break,
        }
    }
    assert_eq!(seen.len(), 5);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5, "pages must not overlap");
}

#[test]
fn test_invalid_page_token() {
    let client = mock_client();
    create_channels(&client, "badtoken", 1);
    let res = client
        .get("/api/v1/users/badtoken/channels?next_page_token=zzz")
        .header(auth())
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
}

#[test]
fn test_message_listing_omits_total() {
    let client = mock_client();
    let res = client
        .post("/api/v1/users/u1/channels")
        .header(ContentType::JSON)
        .header(auth())
        .body(r#"{"name": "counted", "type": "public"}"#)
        .dispatch();
    let channel_id = res.into_json::<serde_json::Value>().unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    for i in 0..3 {
        client
            .post(format!("/api/v1/channels/{channel_id}/messages"))
            .header(ContentType::JSON)
            .header(auth())
            .body(format!(r#"{{"content": "message {i}"}}"#))
            .dispatch();
    }

    let res = client
        .get(format!("/api/v1/channels/{channel_id}/messages?page_size=2"))
        .header(auth())
        .dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert!(body.get("total_records").is_none());
    assert_eq!(body["records"].as_array().unwrap().len(), 2);
    assert_eq!(body["next_page_token"], "2");
}

#[test]
fn test_last_page_has_no_token() {
    let client = mock_client();
    create_channels(&client, "lastpage", 2);
    let res = client
        .get("/api/v1/users/lastpage/channels?page_size=100")
        .header(auth())
        .dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert!(body.get("next_page_token").is_none());
}
