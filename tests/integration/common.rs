use rocket::http::Header;
use rocket::local::blocking::Client;
use std::time::Duration;

pub const TOKEN: &str = "test-token";

/// In-process mock client for wire-level tests (no TCP involved).
pub fn mock_client() -> Client {
    Client::tracked(chatcheck::mock::server()).expect("valid rocket instance")
}

pub fn auth() -> Header<'static> {
    Header::new("Authorization", format!("Bearer {TOKEN}"))
}

/// Launches the mock service on an OS-assigned loopback port and waits for
/// its health endpoint to answer. Returns the base URL.
pub async fn spawn_server() -> String {
    let port = free_port();
    let figment = rocket::Config::figment()
        .merge(("address", "127.0.0.1"))
        .merge(("port", port))
        .merge(("log_level", "off"));
    let rocket = chatcheck::mock::server().configure(figment);
    tokio::spawn(async move {
        let _ = rocket.launch().await;
    });

    let base_url = format!("http://127.0.0.1:{port}");
    let http = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = http.get(format!("{base_url}/api/v1/health")).send().await
            && resp.status().is_success()
        {
            return base_url;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("mock server did not become ready on {base_url}");
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind to ephemeral port")
        .local_addr()
        .expect("local addr")
        .port()
}
