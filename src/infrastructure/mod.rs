pub mod http_news_source;
pub mod scripted_news_source;
