//! Ethos Scenario Catalog
//!
//! The immutable list of ethics scenarios a team can choose from.
//!
//! # Core Concepts
//!
//! - [`ScenarioDefinition`]: title, narrative, strong signals and decision choices
//! - [`ScenarioCatalog`]: ordered, non-empty collection; identity is position
//! - [`CatalogSource`]: where the catalog is fetched from (file or URL)
//!
//! # Example
//!
//! ```rust,ignore
//! use ethos_scenario::{CatalogSource, ScenarioCatalog};
//!
//! # async fn example() -> Result<(), ethos_scenario::CatalogError> {
//! let catalog = ScenarioCatalog::load(&CatalogSource::file("scenarios.json")).await?;
//! println!("{} scenarios available", catalog.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catalog;
mod error;
mod source;

pub use catalog::{Choice, ScenarioCatalog, ScenarioDefinition};
pub use error::CatalogError;
pub use source::CatalogSource;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
