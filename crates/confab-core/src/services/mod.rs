pub mod chat;
pub mod retention;
