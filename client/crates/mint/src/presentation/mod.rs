//! Presentation Layer - Wire formats

pub mod dto;
