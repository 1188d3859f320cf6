//! # Shield Point Advisor
//!
//! Minimal client for the hosted Messages API that powers the storefront's
//! product advisor. Only the non-streaming text exchange is supported.
//!
//! ## Example
//!
//! ```no_run
//! use shield_point_advisor::{AdvisorClient, Message, MessagesRequest};
//!
//! # async fn demo() -> Result<(), shield_point_advisor::AdvisorError> {
//! let client = AdvisorClient::from_env()?;
//!
//! let request = MessagesRequest::new(vec![Message::user("Which one is thinnest?")])
//!     .with_system("You are a discreet product advisor.".to_string());
//!
//! let response = client.messages(request).await?;
//! println!("{}", response.text()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod types;

pub use client::{AdvisorClient, DEFAULT_API_URL};
pub use error::AdvisorError;
pub use messages::{DEFAULT_MODEL, MessagesRequest, MessagesResponse};
pub use types::{ContentBlock, Message, Role, StopReason, Usage};
