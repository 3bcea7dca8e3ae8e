pub mod conversation;
pub mod dashboard;
pub mod investment;
pub mod project;
pub mod user;
pub mod wallet;
