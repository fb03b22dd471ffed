pub mod middleware;
pub mod password;
pub mod policy;
pub mod rate_limit;
pub mod session;
pub mod validate;
