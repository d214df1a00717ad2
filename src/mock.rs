// In-memory chat service implementing the same wire protocol HttpChatClient
// speaks. Backs the integration suite; also usable as a test double by
// downstream consumers. State lives in a Mutex'd map, nothing persists.

use crate::models::*;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use std::collections::HashMap;
use std::sync::Mutex;

type ApiError = (Status, Json<serde_json::Value>);

fn err(status: Status, msg: &str) -> ApiError {
    (status, Json(serde_json::json!({"error": msg})))
}

pub struct MockState {
    channels: Mutex<HashMap<String, ChannelRecord>>,
}

struct ChannelRecord {
    channel: Channel,
    owner: String,
    members: Vec<Member>,
    messages: Vec<Message>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }
}

/// Builds the mock service. Launch it on a loopback port (or drive it with
/// `rocket::local`) and point an `HttpChatClient` at it.
pub fn server() -> rocket::Rocket<rocket::Build> {
    rocket::build()
        .manage(MockState::default())
        .register("/", rocket::catchers![not_found, unauthorized])
        .mount(
            "/",
            rocket::routes![
                health,
                list_channels,
                create_channel,
                get_channel,
                update_channel,
                delete_channel,
                channel_members,
                send_message,
                edit_message,
                list_messages,
                delete_message,
            ],
        )
}

// --- Request guard ---

/// Any bearer token is accepted; requests without one get a 401. Adapted for
/// a mock: real deployments validate the token, the tests only need to know
/// the client sent it.
pub struct BearerToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if let Some(auth) = req.headers().get_one("Authorization")
            && let Some(token) = auth.strip_prefix("Bearer ")
        {
            return Outcome::Success(BearerToken(token.to_string()));
        }
        Outcome::Error((Status::Unauthorized, ()))
    }
}

// --- Pagination ---

/// Slices `items` at the offset the page token encodes. The token is opaque
/// to clients; here it is just a decimal record offset.
fn paginate<T: Clone>(
    items: &[T],
    page_size: Option<u32>,
    token: Option<&str>,
    report_total: bool,
) -> Result<Page<T>, ApiError> {
    let size = page_size.unwrap_or(30).clamp(1, 100) as usize;
    let offset = match token {
        Some(t) => t
            .parse::<usize>()
            .map_err(|_| err(Status::BadRequest, "Invalid next_page_token"))?,
        None => 0,
    };
    let end = (offset + size).min(items.len());
    let records = if offset >= items.len() {
        Vec::new()
    } else {
        items[offset..end].to_vec()
    };
    Ok(Page {
        records,
        total_records: if report_total {
            Some(items.len() as u64)
        } else {
            None
        },
        next_page_token: (end < items.len()).then(|| end.to_string()),
    })
}

fn validate_channel_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() || name.len() > 100 {
        return Err(err(
            Status::BadRequest,
            "Channel name must be 1-100 characters",
        ));
    }
    Ok(name)
}

fn validate_content(content: &str) -> Result<String, ApiError> {
    let content = content.trim().to_string();
    if content.is_empty() || content.len() > 10_000 {
        return Err(err(
            Status::BadRequest,
            "Content must be 1-10000 characters",
        ));
    }
    Ok(content)
}

// --- Routes ---

#[get("/api/v1/health")]
fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "chatcheck-mock"}))
}

#[get("/api/v1/users/<user_id>/channels?<page_size>&<next_page_token>")]
fn list_channels(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    page_size: Option<u32>,
    next_page_token: Option<&str>,
) -> Result<Json<Page<Channel>>, ApiError> {
    let channels = state.channels.lock().unwrap();
    let mut owned: Vec<Channel> = channels
        .values()
        .filter(|r| r.owner == user_id)
        .map(|r| r.channel.clone())
        .collect();
    owned.sort_by(|a, b| (&a.created_at, &a.id).cmp(&(&b.created_at, &b.id)));
    paginate(&owned, page_size, next_page_token, true).map(Json)
}

#[post("/api/v1/users/<user_id>/channels", format = "json", data = "<body>")]
fn create_channel(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    body: Json<CreateChannelBody>,
) -> Result<Json<Channel>, ApiError> {
    let name = validate_channel_name(&body.name)?;
    let now = chrono::Utc::now().to_rfc3339();
    let channel = Channel {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        channel_type: body.channel_type,
        created_at: now.clone(),
        updated_at: now,
    };

    let mut channels = state.channels.lock().unwrap();
    channels.insert(
        channel.id.clone(),
        ChannelRecord {
            channel: channel.clone(),
            owner: user_id.to_string(),
            members: vec![Member {
                id: user_id.to_string(),
                display_name: user_id.to_string(),
                role: "owner".to_string(),
            }],
            messages: Vec::new(),
        },
    );
    Ok(Json(channel))
}

#[get("/api/v1/users/<user_id>/channels/<channel_id>")]
fn get_channel(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    channel_id: &str,
) -> Result<Json<Channel>, ApiError> {
    let channels = state.channels.lock().unwrap();
    channels
        .get(channel_id)
        .filter(|r| r.owner == user_id)
        .map(|r| Json(r.channel.clone()))
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))
}

#[put(
    "/api/v1/users/<user_id>/channels/<channel_id>",
    format = "json",
    data = "<body>"
)]
fn update_channel(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    channel_id: &str,
    body: Json<UpdateChannelBody>,
) -> Result<Status, ApiError> {
    let name = validate_channel_name(&body.name)?;
    let mut channels = state.channels.lock().unwrap();
    let record = channels
        .get_mut(channel_id)
        .filter(|r| r.owner == user_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;
    record.channel.name = name;
    record.channel.updated_at = chrono::Utc::now().to_rfc3339();
    Ok(Status::NoContent)
}

#[delete("/api/v1/users/<user_id>/channels/<channel_id>")]
fn delete_channel(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    channel_id: &str,
) -> Result<Status, ApiError> {
    let mut channels = state.channels.lock().unwrap();
    match channels.get(channel_id) {
        Some(r) if r.owner == user_id => {
            channels.remove(channel_id);
            Ok(Status::NoContent)
        }
        _ => Err(err(Status::NotFound, "Channel not found")),
    }
}

#[get("/api/v1/users/<user_id>/channels/<channel_id>/members?<page_size>&<next_page_token>")]
fn channel_members(
    state: &State<MockState>,
    _token: BearerToken,
    user_id: &str,
    channel_id: &str,
    page_size: Option<u32>,
    next_page_token: Option<&str>,
) -> Result<Json<Page<Member>>, ApiError> {
    let channels = state.channels.lock().unwrap();
    let record = channels
        .get(channel_id)
        .filter(|r| r.owner == user_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;
    paginate(&record.members, page_size, next_page_token, true).map(Json)
}

#[post("/api/v1/channels/<channel_id>/messages", format = "json", data = "<body>")]
fn send_message(
    state: &State<MockState>,
    _token: BearerToken,
    channel_id: &str,
    body: Json<SendMessageBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let content = validate_content(&body.content)?;
    let mut channels = state.channels.lock().unwrap();
    let record = channels
        .get_mut(channel_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;

    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        channel_id: channel_id.to_string(),
        sender: body.sender.clone(),
        content,
        created_at: chrono::Utc::now().to_rfc3339(),
        edited_at: None,
    };
    let id = message.id.clone();
    record.messages.push(message);
    Ok(Json(serde_json::json!({"id": id})))
}

#[put(
    "/api/v1/channels/<channel_id>/messages/<message_id>",
    format = "json",
    data = "<body>"
)]
fn edit_message(
    state: &State<MockState>,
    _token: BearerToken,
    channel_id: &str,
    message_id: &str,
    body: Json<EditMessageBody>,
) -> Result<Status, ApiError> {
    let content = validate_content(&body.content)?;
    let mut channels = state.channels.lock().unwrap();
    let record = channels
        .get_mut(channel_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;
    let message = record
        .messages
        .iter_mut()
        .find(|m| m.id == message_id)
        .ok_or_else(|| err(Status::NotFound, "Message not found"))?;
    message.content = content;
    message.edited_at = Some(chrono::Utc::now().to_rfc3339());
    Ok(Status::NoContent)
}

// Message listings deliberately omit total_records: clients must handle
// servers that never report one.
#[get("/api/v1/channels/<channel_id>/messages?<page_size>&<next_page_token>")]
fn list_messages(
    state: &State<MockState>,
    _token: BearerToken,
    channel_id: &str,
    page_size: Option<u32>,
    next_page_token: Option<&str>,
) -> Result<Json<Page<Message>>, ApiError> {
    let channels = state.channels.lock().unwrap();
    let record = channels
        .get(channel_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;
    paginate(&record.messages, page_size, next_page_token, false).map(Json)
}

#[delete("/api/v1/channels/<channel_id>/messages/<message_id>")]
fn delete_message(
    state: &State<MockState>,
    _token: BearerToken,
    channel_id: &str,
    message_id: &str,
) -> Result<Status, ApiError> {
    let mut channels = state.channels.lock().unwrap();
    let record = channels
        .get_mut(channel_id)
        .ok_or_else(|| err(Status::NotFound, "Channel not found"))?;
    let before = record.messages.len();
    record.messages.retain(|m| m.id != message_id);
    if record.messages.len() == before {
        return Err(err(Status::NotFound, "Message not found"));
    }
    Ok(Status::NoContent)
}

// --- Catchers ---

#[rocket::catch(404)]
fn not_found() -> Json<serde_json::Value> {
    Json(serde_json::json!({"error": "Not found"}))
}

#[rocket::catch(401)]
fn unauthorized() -> Json<serde_json::Value> {
    Json(serde_json::json!({"error": "Missing or malformed Authorization header"}))
}
