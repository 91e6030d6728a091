//! Ethos Core - facilitation of the ethics decision exercise
//!
//! Ties the lower crates together:
//! - [`FacilitationFlow`] owns the session and the current step, gates each
//!   mutation to its step, saves after every change and submits on every
//!   arrival at the summary
//! - [`EthosConfig`] layers defaults, `ethos.toml`, `ETHOS_*` variables and
//!   flags
//! - [`Console`] and [`parse_command_line`] power the `ethos play` loop
//!
//! # Example
//!
//! ```rust,ignore
//! use ethos_core::{FacilitationFlow, EthosConfig};
//! use ethos_remote::Submitter;
//! use ethos_scenario::ScenarioCatalog;
//! use ethos_store::{FileStore, Persistence};
//!
//! # async fn example() -> Result<(), ethos_core::EthosError> {
//! let config = EthosConfig::load(None)?;
//! let catalog = ScenarioCatalog::load(&config.catalog_source()).await?;
//! let persistence = Persistence::new(FileStore::new(&config.storage_dir));
//! let submitter = Submitter::from_config(config.remote_config())?;
//!
//! let mut flow = FacilitationFlow::open(catalog, persistence, submitter);
//! flow.begin("Metro Desk")?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod facilitation;
pub mod logging;

pub use command::{parse_command_line, CommandParseError, FlowCommand};
pub use config::EthosConfig;
pub use console::{describe_outcome, render_screen, Console, Reply};
pub use error::{ConfigError, EthosError};
pub use facilitation::{ExportedReport, FacilitationFlow, StepChange};
pub use logging::{init_logging, LogFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
