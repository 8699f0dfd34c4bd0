//! The table of well-known Bot API operations.
//!
//! Each entry fixes the HTTP method and documents the parameter shape; no
//! runtime validation is done. The same declaration generates one typed
//! convenience method per operation on [`Telegram`]. Names missing from the
//! table still work through [`Telegram::call`].

use crate::client::Telegram;
use crate::transport::Transport;
use crate::types::Params;
use serde::Serialize;
use serde_json::Value;

/// How an operation is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallMethod {
    /// Form-encoded parameters in the request body.
    Post,
    /// No body.
    Get,
}

impl CallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Get => "GET",
        }
    }
}

/// Documented parameter shape of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamShape {
    Required,
    Optional,
    None,
}

impl ParamShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::None => "none",
        }
    }
}

/// One entry of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub name: &'static str,
    pub method: CallMethod,
    pub params: ParamShape,
}

/// Find a table entry by its Bot API name (case-sensitive).
pub fn lookup(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}

macro_rules! bot_operations {
    (@method $(#[$doc:meta])* $fn_name:ident, $name:literal, None, $method:ident) => {
        $(#[$doc])*
        pub fn $fn_name(&self) -> Option<Value> {
            self.dispatcher()
                .invoke($name, Params::new(), CallMethod::$method == CallMethod::Post)
        }
    };
    (@method $(#[$doc:meta])* $fn_name:ident, $name:literal, $shape:ident, $method:ident) => {
        $(#[$doc])*
        pub fn $fn_name(&self, params: Params) -> Option<Value> {
            self.dispatcher()
                .invoke($name, params, CallMethod::$method == CallMethod::Post)
        }
    };
    (
        table_only { $( $t_name:literal ($t_shape:ident, $t_method:ident); )* }
        $( $(#[$doc:meta])* $fn_name:ident => $name:literal ($shape:ident, $method:ident); )*
    ) => {
        /// Every operation known to the client.
        pub static OPERATIONS: &[Operation] = &[
            $( Operation {
                name: $t_name,
                method: CallMethod::$t_method,
                params: ParamShape::$t_shape,
            }, )*
            $( Operation {
                name: $name,
                method: CallMethod::$method,
                params: ParamShape::$shape,
            }, )*
        ];

        impl<T: Transport> Telegram<T> {
            $( bot_operations!(@method $(#[$doc])* $fn_name, $name, $shape, $method); )*
        }
    };
}

bot_operations! {
    // Methods with hand-written wrappers elsewhere.
    table_only {
        "getUpdates" (Optional, Post);
    }
    // ── Bot identity ────────────────────────────────────────────────
    /// Basic information about the bot.
    get_me => "getMe" (None, Get);

    // ── Sending messages ────────────────────────────────────────────
    /// Send a text message.
    send_message => "sendMessage" (Required, Post);
    forward_message => "forwardMessage" (Required, Post);
    send_photo => "sendPhoto" (Required, Post);
    send_audio => "sendAudio" (Required, Post);
    send_document => "sendDocument" (Required, Post);
    send_video => "sendVideo" (Required, Post);
    send_animation => "sendAnimation" (Required, Post);
    send_voice => "sendVoice" (Required, Post);
    send_video_note => "sendVideoNote" (Required, Post);
    /// `media` is an array of InputMedia objects; it is JSON-encoded into one field.
    send_media_group => "sendMediaGroup" (Required, Post);
    send_location => "sendLocation" (Required, Post);
    send_venue => "sendVenue" (Required, Post);
    send_contact => "sendContact" (Required, Post);
    send_poll => "sendPoll" (Required, Post);
    send_dice => "sendDice" (Required, Post);
    send_chat_action => "sendChatAction" (Required, Post);

    // ── Users & files ───────────────────────────────────────────────
    get_user_profile_photos => "getUserProfilePhotos" (Required, Post);
    /// Resolve a `file_id` to a downloadable `file_path`.
    get_file => "getFile" (Required, Post);

    // ── Chat management ─────────────────────────────────────────────
    /// Deprecated upstream in favour of `banChatMember`; kept for older servers.
    kick_chat_member => "kickChatMember" (Required, Post);
    ban_chat_member => "banChatMember" (Required, Post);
    unban_chat_member => "unbanChatMember" (Required, Post);
    restrict_chat_member => "restrictChatMember" (Required, Post);
    promote_chat_member => "promoteChatMember" (Required, Post);
    set_chat_administrator_custom_title => "setChatAdministratorCustomTitle" (Required, Post);
    ban_chat_sender_chat => "banChatSenderChat" (Required, Post);
    unban_chat_sender_chat => "unbanChatSenderChat" (Required, Post);
    set_chat_permissions => "setChatPermissions" (Required, Post);
    export_chat_invite_link => "exportChatInviteLink" (Required, Post);
    create_chat_invite_link => "createChatInviteLink" (Required, Post);
    edit_chat_invite_link => "editChatInviteLink" (Required, Post);
    revoke_chat_invite_link => "revokeChatInviteLink" (Required, Post);
    approve_chat_join_request => "approveChatJoinRequest" (Required, Post);
    decline_chat_join_request => "declineChatJoinRequest" (Required, Post);
    set_chat_photo => "setChatPhoto" (Required, Post);
    delete_chat_photo => "deleteChatPhoto" (Required, Post);
    set_chat_title => "setChatTitle" (Required, Post);
    set_chat_description => "setChatDescription" (Required, Post);
    pin_chat_message => "pinChatMessage" (Required, Post);
    unpin_chat_message => "unpinChatMessage" (Required, Post);
    unpin_all_chat_messages => "unpinAllChatMessages" (Required, Post);
    leave_chat => "leaveChat" (Required, Post);
    get_chat => "getChat" (Required, Post);
    get_chat_administrators => "getChatAdministrators" (Required, Post);
    get_chat_member_count => "getChatMemberCount" (Required, Post);
    get_chat_member => "getChatMember" (Required, Post);
    set_chat_sticker_set => "setChatStickerSet" (Required, Post);
    delete_chat_sticker_set => "deleteChatStickerSet" (Required, Post);

    // ── Forum topics ────────────────────────────────────────────────
    get_forum_topic_icon_stickers => "getForumTopicIconStickers" (None, Get);
    create_forum_topic => "createForumTopic" (Required, Post);
    edit_forum_topic => "editForumTopic" (Required, Post);
    close_forum_topic => "closeForumTopic" (Required, Post);
    reopen_forum_topic => "reopenForumTopic" (Required, Post);
    delete_forum_topic => "deleteForumTopic" (Required, Post);
    unpin_all_forum_topic_messages => "unpinAllForumTopicMessages" (Required, Post);
    edit_general_forum_topic => "editGeneralForumTopic" (Required, Post);
    close_general_forum_topic => "closeGeneralForumTopic" (Required, Post);
    reopen_general_forum_topic => "reopenGeneralForumTopic" (Required, Post);
    hide_general_forum_topic => "hideGeneralForumTopic" (Required, Post);
    unhide_general_forum_topic => "unhideGeneralForumTopic" (Required, Post);

    // ── Drafts ──────────────────────────────────────────────────────
    send_message_draft => "sendMessageDraft" (Required, Post);

    // ── Payments & stars ────────────────────────────────────────────
    answer_shipping_query => "answerShippingQuery" (Required, Post);
    answer_pre_checkout_query => "answerPreCheckoutQuery" (Required, Post);
    send_invoice => "sendInvoice" (Required, Post);
    create_invoice_link => "createInvoiceLink" (Required, Post);
    send_paid_media => "sendPaidMedia" (Required, Post);
    refund_star_payment => "refundStarPayment" (Required, Post);

    // ── Bot profile ─────────────────────────────────────────────────
    set_my_profile_photo => "setMyProfilePhoto" (Required, Post);
    /// Remove the profile photo set by `setMyProfilePhoto`.
    remove_my_profile_photo => "removeMyProfilePhoto" (None, Get);
    get_user_profile_audios => "getUserProfileAudios" (Required, Post);
    get_user_gifts => "getUserGifts" (Required, Post);
    get_chat_gifts => "getChatGifts" (Required, Post);

    // ── Stories & suggested posts ───────────────────────────────────
    repost_story => "repostStory" (Required, Post);
    approve_suggested_post => "approveSuggestedPost" (Required, Post);
    decline_suggested_post => "declineSuggestedPost" (Required, Post);

    // ── Inline mode & web apps ──────────────────────────────────────
    answer_web_app_query => "answerWebAppQuery" (Required, Post);
    /// `results` is an array of InlineQueryResult objects.
    answer_inline_query => "answerInlineQuery" (Required, Post);

    // ── Commands & bot settings ─────────────────────────────────────
    set_my_commands => "setMyCommands" (Required, Post);
    delete_my_commands => "deleteMyCommands" (Required, Post);
    get_my_commands => "getMyCommands" (Optional, Post);
    set_my_name => "setMyName" (Required, Post);
    get_my_name => "getMyName" (Optional, Post);
    set_my_description => "setMyDescription" (Required, Post);
    get_my_description => "getMyDescription" (Optional, Post);
    set_my_short_description => "setMyShortDescription" (Required, Post);
    get_my_short_description => "getMyShortDescription" (Optional, Post);
    set_chat_menu_button => "setChatMenuButton" (Optional, Post);
    get_chat_menu_button => "getChatMenuButton" (Optional, Post);
    set_my_default_administrator_rights => "setMyDefaultAdministratorRights" (Optional, Post);
    get_my_default_administrator_rights => "getMyDefaultAdministratorRights" (Optional, Post);

    // ── Updating messages ───────────────────────────────────────────
    edit_message_text => "editMessageText" (Required, Post);
    edit_message_caption => "editMessageCaption" (Required, Post);
    edit_message_media => "editMessageMedia" (Required, Post);
    /// Replace only the inline keyboard of a message.
    edit_message_reply_markup => "editMessageReplyMarkup" (Required, Post);
    stop_poll => "stopPoll" (Required, Post);
    delete_message => "deleteMessage" (Required, Post);
    /// Delete several messages at once (`message_ids` array).
    delete_messages => "deleteMessages" (Required, Post);
    copy_message => "copyMessage" (Required, Post);
    copy_messages => "copyMessages" (Required, Post);
    forward_messages => "forwardMessages" (Required, Post);

    // ── Stickers ────────────────────────────────────────────────────
    send_sticker => "sendSticker" (Required, Post);
    get_sticker_set => "getStickerSet" (Required, Post);
    get_custom_emoji_stickers => "getCustomEmojiStickers" (Required, Post);
    upload_sticker_file => "uploadStickerFile" (Required, Post);
    create_new_sticker_set => "createNewStickerSet" (Required, Post);
    add_sticker_to_set => "addStickerToSet" (Required, Post);
    set_sticker_position_in_set => "setStickerPositionInSet" (Required, Post);
    delete_sticker_from_set => "deleteStickerFromSet" (Required, Post);
    set_sticker_emoji_list => "setStickerEmojiList" (Required, Post);
    set_sticker_keywords => "setStickerKeywords" (Required, Post);
    set_sticker_mask_position => "setStickerMaskPosition" (Required, Post);
    set_sticker_set_title => "setStickerSetTitle" (Required, Post);
    set_sticker_set_thumbnail => "setStickerSetThumbnail" (Required, Post);

    // ── Games ───────────────────────────────────────────────────────
    send_game => "sendGame" (Required, Post);
    set_game_score => "setGameScore" (Required, Post);
    get_game_high_scores => "getGameHighScores" (Required, Post);

    // ── Webhooks ────────────────────────────────────────────────────
    /// Point update delivery at an HTTPS URL (push mode).
    set_webhook => "setWebhook" (Required, Post);
    /// Switch back to `getUpdates` (pull mode).
    delete_webhook => "deleteWebhook" (Optional, Post);
    /// Sent as a bodiless GET; parameters are ignored.
    get_webhook_info => "getWebhookInfo" (Optional, Get);
}
