//! Core workflows for secmerge
//!
//! Merges local `key=value` overrides into a remote JSON secret after an
//! operator reviews the result, and rolls a secret back to its previous
//! version.
//!
//! The remote service and the terminal are reached through two traits:
//! [`SecretStore`] (opened per region by a [`StoreConnector`]) and
//! [`Prompter`]. [`InMemoryStore`] and [`ScriptedPrompter`] implement them
//! without I/O.
//!
//! ```ignore
//! use secmerge_core::{InMemoryConnector, ScriptedPrompter, SelectionOptions, update_secret};
//!
//! let outcome = update_secret(&mut prompter, &connector, &options).await?;
//! ```

pub mod error;
pub mod memory;
pub mod merge;
pub mod overrides;
pub mod prompt;
pub mod region;
pub mod review;
pub mod secret;
pub mod selection;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
pub use memory::{InMemoryConnector, InMemoryStore};
pub use merge::{MergeSummary, merge};
pub use overrides::{load_overrides, parse_overrides};
pub use prompt::{Answer, Prompter, ScriptedPrompter};
pub use region::{Region, resolve_region};
pub use review::{REVIEW_FILE_NAME, write_review_file};
pub use secret::SecretValue;
pub use selection::{SecretSelection, SelectionOptions, Session, select_secret};
pub use store::{SecretStore, SecretVersion, StoreConnector, VersionStage};
pub use workflow::{RollbackOutcome, UpdateOutcome, rollback_secret, update_secret};
