//! # whd
//!
//! Client library and command-line tool for the SolarWinds Web Help Desk
//! REST API.
//!
//! Every operation builds a request below `/helpdesk/WebObjects/Helpdesk.woa/ra/`,
//! authenticates through query parameters, sends it with retry on transient
//! failures and decodes the JSON answer into a typed model.
//!
//! ## Features
//!
//! - **Tickets**: get, search, create and update, with the payload cleanup
//!   the server expects
//! - **Notes**: list notes and add visible or hidden notes
//! - **Attachments**: download (raw or base64) and upload to tickets or notes
//! - **Assets and locations**: lookups and location create/update
//! - **Reference lists**: request types, statuses, priorities, techs,
//!   locations and custom field definitions
//! - **Sessions**: open and close session keys
//! - **Security**: credentials are never logged and are redacted from errors
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`auth`] - Credential schemes and their query parameters
//! - [`error`] - Error types with credential sanitization
//! - [`client`] - HTTP client with one submodule per resource family
//! - [`models`] - Data models for requests and responses
//! - [`cli`] - Argument definitions for the `whd` binary
//!
//! ## Configuration
//!
//! - `WHD_BASE_URL`: server root, e.g. `https://helpdesk.example.com`
//! - `WHD_API_KEY`, or `WHD_USERNAME` with `WHD_PASSWORD` or `WHD_SESSION_KEY`
//!
//! Optional:
//! - `WHD_SSL_VERIFY`: `false` to accept self-signed certificates
//! - `WHD_RETRY_MAX`: retries after the first attempt (default 10)
//! - `RUST_LOG`: log level for the binary (e.g., `whd=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use whd::{Config, ListQuery, WhdClient};
//!
//! async fn example() -> Result<(), whd::WhdError> {
//!     let config = Config::from_env()?;
//!     let client = WhdClient::new(&config)?;
//!
//!     let query = ListQuery::new("(statustype.statusTypeName = 'Open')").with_limit(10);
//!     for ticket in client.get_tickets(&query).await? {
//!         println!("#{}: {}", ticket.id.unwrap_or_default(), ticket.display_subject());
//!     }
//!
//!     let note_id = client.create_note(1234, "Looking into it").await?;
//!     println!("note {}", note_id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use auth::Credentials;
pub use client::WhdClient;
pub use config::Config;
pub use error::WhdError;
pub use models::{Asset, Attachment, AttachmentTarget, ListQuery, Location, Note, Ticket};
