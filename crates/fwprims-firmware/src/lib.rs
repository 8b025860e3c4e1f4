//! Validate/parse contract for binary firmware containers.
//!
//! A format implements [`FirmwareContainer`]: a cheap `validate` that only
//! looks at a fixed header, and a `parse` that fills a [`FirmwareBuilder`]
//! from the full image. A [`Firmware`] only exists once parse succeeded.
//!
//! [`ContainerRegistry`] keys formats by name and detects which one matches
//! a stream by running each `validate` in turn.

pub mod config;
pub mod container;
pub mod error;
pub mod firmware;
pub mod flags;
pub mod header;
pub mod registry;

pub use config::{ContainerConfig, DEFAULT_MAX_FIRMWARE_SIZE};
pub use container::FirmwareContainer;
pub use error::{FirmwareError, Result};
pub use firmware::{Alignment, Firmware, FirmwareBuilder};
pub use flags::{FirmwareFlags, InstallFlags};
pub use header::HeaderLayout;
pub use registry::ContainerRegistry;
