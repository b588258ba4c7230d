pub mod auth;
pub mod catalog;
pub mod companies;
pub mod quotes;
pub mod settings;
pub mod users;
