//! One transcript entry

use chat_shared::messages;
use yew::prelude::*;

use crate::chat::{Speaker, TranscriptEntry};

#[derive(Properties, PartialEq, Clone)]
pub struct MessageBubbleProps {
    pub entry: TranscriptEntry,
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let entry = &props.entry;
    let is_bot = entry.speaker == Speaker::Bot;

    let class = classes!(
        "msg",
        if is_bot { "bot" } else { "user" },
        entry.loading.then_some("loading")
    );

    let text = if entry.loading {
        html! {
            <>
                <span class="spinner"></span>
                { messages::PENDING_TEXT }
            </>
        }
    } else {
        html! { { entry.text.clone() } }
    };

    html! {
        <div {class}>
            if is_bot {
                <div class="avatar">{ messages::BOT_AVATAR }</div>
            }
            <div class="bubble">
                <div class="text">{ text }</div>
                <div class="meta">{ entry.stamp.clone() }</div>
            </div>
        </div>
    }
}
