//! Data models for policy extraction.

pub mod config;
pub mod page;
pub mod policy;
