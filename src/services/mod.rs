pub mod auth;
pub mod upload;
pub mod verification;
pub mod workflow;
