//! Infrastructure Layer - Gateway and storage implementations

pub mod http;
pub mod json_file;
