// src/sources/providers/mod.rs
pub mod feed_article;
pub mod pattern;
pub mod static_page;

pub use feed_article::FeedArticleSource;
pub use pattern::PatternSource;
pub use static_page::StaticPageSource;
