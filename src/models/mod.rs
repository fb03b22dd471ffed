pub mod admin;
pub mod meeting;
pub mod proposal;
pub mod user;
