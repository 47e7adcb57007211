//! Operator Command Line
//!
//! Drives the review coordinator from a terminal. Arguments are parsed into a
//! [`Command`], run by [`ReviewApp`] and printed as JSON.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_cli::{Command, ReviewApp};
//!
//! let command = Command::parse(std::env::args().skip(1))?;
//! let app = ReviewApp::from_config(&config, session)?;
//! let output = app.run(command).await?;
//! println!("{}", serde_json::to_string_pretty(&output)?);
//! ```

pub mod command;
pub mod error;
pub mod app;

pub use command::{Command, USAGE};
pub use error::{CliError, ErrorResponse};
pub use app::ReviewApp;
