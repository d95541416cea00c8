//! # Publisher Core
//!
//! The domain layer of the publisher service.
//! This crate contains the post model and the storage port with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::{NewPost, Post, PostId, PostSummary};
pub use error::{DomainError, RepoError};
