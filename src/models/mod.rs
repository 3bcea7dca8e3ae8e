pub mod conversation;
pub mod investment;
pub mod project;
pub mod user;
