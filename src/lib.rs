pub mod bus;
pub mod chat;
pub mod config;
pub mod contact;
pub mod content;
pub mod entity;
pub mod responder;
pub mod session;
pub mod timeline;
pub mod validation;
