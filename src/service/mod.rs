pub mod auth;
pub mod crypto;
pub mod department;
pub mod event;
pub mod fanout;
pub mod log;
pub mod news;
pub mod notification;
pub mod permission;
pub mod support;
pub mod user;
