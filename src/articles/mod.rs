//! Articles: the content the permission gates protect

pub mod api;
pub mod models;
pub mod store;

pub use models::Article;
pub use store::ArticleStore;
