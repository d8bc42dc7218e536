pub mod error;
pub mod messages;
pub mod todo_service;
pub mod validation;
