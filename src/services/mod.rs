//! Pipeline stage services

pub mod credentials;
pub mod mapper;
pub mod normalizer;
pub mod parser;
pub mod submitter;
