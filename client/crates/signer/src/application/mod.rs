//! Application Layer - Use Cases

pub mod sign_authorization;
