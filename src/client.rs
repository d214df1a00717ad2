use crate::error::Error;
use crate::models::{Channel, ChannelType, Member, Message, Page};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// The account-chat operations a remote chat service exposes.
///
/// Implemented by [`HttpChatClient`] for the real wire protocol; scenarios
/// accept any implementation, so tests can substitute scripted fakes.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn account_channels(
        &self,
        user_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Channel>, Error>;

    async fn create_account_channel(
        &self,
        user_id: &str,
        name: &str,
        channel_type: ChannelType,
    ) -> Result<Channel, Error>;

    async fn update_account_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        name: &str,
    ) -> Result<(), Error>;

    async fn account_channel(&self, user_id: &str, channel_id: &str) -> Result<Channel, Error>;

    async fn account_channel_members(
        &self,
        user_id: &str,
        channel_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Member>, Error>;

    /// Returns the server-assigned id of the new message.
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, Error>;

    async fn update_message(
        &self,
        message_id: &str,
        channel_id: &str,
        content: &str,
    ) -> Result<(), Error>;

    async fn messages(
        &self,
        channel_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Message>, Error>;

    async fn delete_message(&self, message_id: &str, channel_id: &str) -> Result<(), Error>;

    async fn delete_account_channel(&self, user_id: &str, channel_id: &str) -> Result<(), Error>;
}

/// HTTP implementation of [`ChatApi`] speaking the `/api/v1` JSON protocol
/// with bearer-token auth.
pub struct HttpChatClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[derive(Deserialize)]
struct MessageIdResponse {
    id: String,
}

impl HttpChatClient {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        debug!(%method, path, "chat api request");
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_token)
    }

    fn paged(
        &self,
        path: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut query: Vec<(&str, String)> = vec![("page_size", page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("next_page_token", token.to_string()));
        }
        self.request(reqwest::Method::GET, path).query(&query)
    }
}

/// Surfaces non-2xx responses as [`Error::Api`], preferring the server's
/// `{"error": ...}` message when the body carries one.
async fn checked(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ChatApi for HttpChatClient {
    async fn account_channels(
        &self,
        user_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Channel>, Error> {
        let path = format!("/users/{user_id}/channels");
        let resp = self.paged(&path, page_size, page_token).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn create_account_channel(
        &self,
        user_id: &str,
        name: &str,
        channel_type: ChannelType,
    ) -> Result<Channel, Error> {
        let path = format!("/users/{user_id}/channels");
        let resp = self
            .request(reqwest::Method::POST, &path)
            .json(&serde_json::json!({"name": name, "type": channel_type}))
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn update_account_channel(
        &self,
        user_id: &str,
        channel_id: &str,
        name: &str,
    ) -> Result<(), Error> {
        let path = format!("/users/{user_id}/channels/{channel_id}");
        let resp = self
            .request(reqwest::Method::PUT, &path)
            .json(&serde_json::json!({"name": name}))
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }

    async fn account_channel(&self, user_id: &str, channel_id: &str) -> Result<Channel, Error> {
        let path = format!("/users/{user_id}/channels/{channel_id}");
        let resp = self.request(reqwest::Method::GET, &path).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn account_channel_members(
        &self,
        user_id: &str,
        channel_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Member>, Error> {
        let path = format!("/users/{user_id}/channels/{channel_id}/members");
        let resp = self.paged(&path, page_size, page_token).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, Error> {
        let path = format!("/channels/{channel_id}/messages");
        let resp = self
            .request(reqwest::Method::POST, &path)
            .json(&serde_json::json!({"content": content}))
            .send()
            .await?;
        let body: MessageIdResponse = checked(resp).await?.json().await?;
        Ok(body.id)
    }

    async fn update_message(
        &self,
        message_id: &str,
        channel_id: &str,
        content: &str,
    ) -> Result<(), Error> {
        let path = format!("/channels/{channel_id}/messages/{message_id}");
        let resp = self
            .request(reqwest::Method::PUT, &path)
            .json(&serde_json::json!({"content": content}))
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }

    async fn messages(
        &self,
        channel_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<Message>, Error> {
        let path = format!("/channels/{channel_id}/messages");
        let resp = self.paged(&path, page_size, page_token).send().await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn delete_message(&self, message_id: &str, channel_id: &str) -> Result<(), Error> {
        let path = format!("/channels/{channel_id}/messages/{message_id}");
        let resp = self.request(reqwest::Method::DELETE, &path).send().await?;
        checked(resp).await?;
        Ok(())
    }

    async fn delete_account_channel(&self, user_id: &str, channel_id: &str) -> Result<(), Error> {
        let path = format!("/users/{user_id}/channels/{channel_id}");
        let resp = self.request(reqwest::Method::DELETE, &path).send().await?;
        checked(resp).await?;
        Ok(())
    }
}
