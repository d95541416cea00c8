//! # Publisher Shared
//!
//! Wire types shared by the HTTP layer and its clients.

pub mod dto;
pub mod response;
pub mod selection;

pub use response::{ApiResponse, ErrorResponse};
pub use selection::{DeleteSelection, InvalidPostId};
