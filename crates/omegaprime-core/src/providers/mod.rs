// Adapters that bridge the api clients with the core traits
pub mod discord;
pub mod rss;
pub mod telegram;

pub use discord::DiscordSink;
pub use rss::RssFeedProvider;
pub use telegram::TelegramSink;
