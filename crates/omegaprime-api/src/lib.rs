// HTTP clients for the outside world: feeds in, notifications out
pub mod discord;
pub mod feed;
pub mod telegram;

// Re-export common types
pub use discord::{DiscordError, DiscordWebhook};
pub use feed::{parse_feed, FeedClient, FeedClientError, FeedItem, DEFAULT_USER_AGENT};
pub use telegram::{TelegramClient, TelegramError};
