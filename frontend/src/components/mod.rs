mod auth_screen;
mod message_bubble;

pub use auth_screen::AuthScreen;
pub use message_bubble::MessageBubble;
