//! Concrete firmware container formats.
//!
//! - [`Ep963xFirmware`]: fixed 4 KiB image, header magic `EP963`
//! - [`GenesysPdFirmware`]: size computed from the header, sum16 checksum,
//!   header magic `PRDY`

pub mod ep963x;
pub mod genesys;

pub use ep963x::{Ep963xFirmware, EP963X_FIRMWARE_HDR, EP963_FIRMWARE_SIZE};
pub use genesys::{GenesysFwType, GenesysPdFirmware, GENESYS_PD_FIRMWARE_HDR};

use fwprims_firmware::{ContainerConfig, ContainerRegistry};

/// Registry with every built-in format and default config.
pub fn builtin_registry() -> ContainerRegistry {
    builtin_registry_with_config(ContainerConfig::default())
}

/// Registry with every built-in format and explicit config.
pub fn builtin_registry_with_config(config: ContainerConfig) -> ContainerRegistry {
    let mut registry = ContainerRegistry::with_config(config);
    registry.register_type::<Ep963xFirmware>();
    registry.register_type::<GenesysPdFirmware>();
    registry
}
