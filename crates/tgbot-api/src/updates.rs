//! Updates: webhook payload capture and long-polling batches.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

/// Per-client update state.
///
/// The push payload is captured once, when the source is created, and never
/// re-read. Pull responses are cached separately so the two modes can be used
/// on the same client without interfering.
#[derive(Debug, Clone)]
pub struct UpdateSource {
    payload: Value,
    last_pull: Option<Value>,
}

impl UpdateSource {
    /// No inbound payload: the push payload is an empty object.
    pub fn empty() -> Self {
        Self {
            payload: Value::Object(Default::default()),
            last_pull: None,
        }
    }

    /// Read and decode the inbound body. An unreadable, empty or non-JSON
    /// body leaves an empty object, never `null`.
    pub fn capture(mut inbound: impl Read) -> Self {
        let mut raw = Vec::new();
        if let Err(e) = inbound.read_to_end(&mut raw) {
            warn!("Could not read inbound update body: {e}");
            return Self::empty();
        }
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Self::empty();
        }
        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Null) => Self::empty(),
            Ok(payload) => Self {
                payload,
                last_pull: None,
            },
            Err(e) => {
                debug!("Inbound body is not JSON ({e}); using an empty payload");
                Self::empty()
            }
        }
    }

    pub fn push_payload(&self) -> &Value {
        &self.payload
    }

    pub fn last_pull_response(&self) -> Option<&Value> {
        self.last_pull.as_ref()
    }

    /// Cache a `getUpdates` response and return its update batch.
    pub fn record_pull(&mut self, response: Option<Value>) -> Vec<Value> {
        let batch = response.as_ref().map(unwrap_result).unwrap_or_default();
        self.last_pull = response;
        batch
    }
}

impl Default for UpdateSource {
    fn default() -> Self {
        Self::empty()
    }
}

/// The `result` array of a response envelope, or an empty batch.
pub fn unwrap_result(response: &Value) -> Vec<Value> {
    match response.get("result") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Offset for the next `getUpdates` call: highest `update_id` plus one.
pub fn next_offset(updates: &[Value]) -> Option<i64> {
    updates
        .iter()
        .filter_map(|u| u.get("update_id").and_then(Value::as_i64))
        .max()
        .map(|id| id + 1)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Update types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

macro_rules! update_types {
    ($( $variant:ident => $name:literal, )*) => {
        /// Kinds of incoming updates, named as in the Bot API.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum UpdateType {
            $( #[serde(rename = $name)] $variant, )*
        }

        impl UpdateType {
            pub const ALL: &'static [UpdateType] = &[ $( UpdateType::$variant, )* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( UpdateType::$variant => $name, )*
                }
            }
        }
    };
}

update_types! {
    InlineQuery => "inline_query",
    CallbackQuery => "callback_query",
    EditedMessage => "edited_message",
    Reply => "reply",
    Message => "message",
    Photo => "photo",
    Video => "video",
    Audio => "audio",
    Voice => "voice",
    Document => "document",
    Animation => "animation",
    Location => "location",
    Contact => "contact",
    ChannelPost => "channel_post",
    EditedChannelPost => "edited_channel_post",
    BusinessConnection => "business_connection",
    BusinessMessage => "business_message",
    EditedBusinessMessage => "edited_business_message",
    DeletedBusinessMessages => "deleted_business_messages",
    MessageReaction => "message_reaction",
    MessageReactionCount => "message_reaction_count",
    ChatBoost => "chat_boost",
    RemovedChatBoost => "removed_chat_boost",
    PurchasedPaidMedia => "purchased_paid_media",
    Poll => "poll",
    PollAnswer => "poll_answer",
    MyChatMember => "my_chat_member",
    ChatMember => "chat_member",
    ChatJoinRequest => "chat_join_request",
    ChatOwnerLeft => "chat_owner_left",
    ChatOwnerChanged => "chat_owner_changed",
    SuggestedPostApproved => "suggested_post_approved",
    SuggestedPostApprovalFailed => "suggested_post_approval_failed",
    SuggestedPostDeclined => "suggested_post_declined",
    SuggestedPostPaid => "suggested_post_paid",
    SuggestedPostRefunded => "suggested_post_refunded",
}

/// Fields that turn a plain `message` into a more specific kind, in
/// precedence order. Animations also carry `document`, so they come first.
const MESSAGE_REFINEMENTS: &[UpdateType] = &[
    UpdateType::Reply,
    UpdateType::Photo,
    UpdateType::Video,
    UpdateType::Audio,
    UpdateType::Voice,
    UpdateType::Animation,
    UpdateType::Document,
    UpdateType::Location,
    UpdateType::Contact,
    UpdateType::ChatOwnerLeft,
    UpdateType::ChatOwnerChanged,
    UpdateType::SuggestedPostApproved,
    UpdateType::SuggestedPostApprovalFailed,
    UpdateType::SuggestedPostDeclined,
    UpdateType::SuggestedPostPaid,
    UpdateType::SuggestedPostRefunded,
];

impl UpdateType {
    /// Classify a raw update object.
    ///
    /// Top-level kinds are reported as-is; a `message` is refined by its
    /// content (a reply, a photo, ...) and falls back to
    /// [`UpdateType::Message`].
    pub fn detect(update: &Value) -> Option<UpdateType> {
        if let Some(message) = update.get("message") {
            let refined = MESSAGE_REFINEMENTS.iter().copied().find(|kind| {
                let field = match kind {
                    UpdateType::Reply => "reply_to_message",
                    other => other.as_str(),
                };
                message.get(field).is_some()
            });
            return Some(refined.unwrap_or(UpdateType::Message));
        }

        UpdateType::ALL
            .iter()
            .copied()
            .filter(|kind| !MESSAGE_REFINEMENTS.contains(kind) && *kind != UpdateType::Message)
            .find(|kind| update.get(kind.as_str()).is_some())
    }
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
