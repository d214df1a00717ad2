use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Public,
    Private,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub sender: String,
    pub content: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
}

/// One bounded slice of a larger listing. `total_records` is only present
/// when the server reports it; consumers needing a count should go through
/// [`Page::record_count`] rather than unwrapping the field.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Reported total when the server sent one, otherwise the size of this page.
    pub fn record_count(&self) -> u64 {
        self.total_records.unwrap_or(self.records.len() as u64)
    }
}

// --- Request bodies (server side of the wire contract) ---

#[derive(Debug, Deserialize)]
pub struct CreateChannelBody {
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChannelBody {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
    #[serde(default = "default_sender")]
    pub sender: String,
}

#[derive(Debug, Deserialize)]
pub struct EditMessageBody {
    pub content: String,
}

fn default_sender() -> String {
    "anonymous".to_string()
}
