use std::collections::BTreeMap;

use fwprims_stream::DynStream;
use tracing::debug;

use crate::config::ContainerConfig;
use crate::container::FirmwareContainer;
use crate::error::{FirmwareError, Result};
use crate::firmware::Firmware;
use crate::flags::{FirmwareFlags, InstallFlags};

/// Name-keyed set of firmware formats with header-based detection.
pub struct ContainerRegistry {
    containers: BTreeMap<&'static str, Box<dyn FirmwareContainer>>,
    config: ContainerConfig,
}

impl ContainerRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            containers: BTreeMap::new(),
            config,
        }
    }

    /// Register a format under its own name, replacing any previous entry.
    pub fn register(&mut self, container: Box<dyn FirmwareContainer>) {
        let name = container.name();
        if self.containers.insert(name, container).is_some() {
            debug!(format = name, "replaced registered firmware format");
        }
    }

    /// Register a default-constructed format.
    pub fn register_type<C: FirmwareContainer + Default + 'static>(&mut self) {
        self.register(Box::new(C::default()));
    }

    /// Look up a format by name.
    pub fn get(&self, name: &str) -> Result<&dyn FirmwareContainer> {
        self.containers
            .get(name)
            .map(|container| container.as_ref())
            .ok_or_else(|| FirmwareError::UnknownName(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    /// Registered format names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.containers.keys().copied().collect()
    }

    /// Iterate registered formats in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn FirmwareContainer> {
        self.containers.values().map(|container| container.as_ref())
    }

    /// Get registry config.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Names of the formats whose header validates at `offset`.
    ///
    /// Formats flagged [`FirmwareFlags::NO_AUTO_DETECTION`] are never tried.
    /// Only the first match is returned when the config says to stop there.
    pub fn detect(&self, stream: &mut DynStream<'_>, offset: usize) -> Vec<&'static str> {
        let mut matches = Vec::new();
        for (name, container) in &self.containers {
            if container
                .firmware_flags()
                .contains(FirmwareFlags::NO_AUTO_DETECTION)
            {
                continue;
            }
            match container.validate(stream, offset) {
                Ok(()) => {
                    debug!(format = *name, offset, "firmware header matched");
                    matches.push(*name);
                    if self.config.stop_on_first_match {
                        break;
                    }
                }
                Err(err) => debug!(format = *name, offset, error = %err, "not a match"),
            }
        }
        matches
    }

    /// Detect the format at `offset` and parse with the first match.
    pub fn parse_stream(
        &self,
        stream: &mut DynStream<'_>,
        offset: usize,
        flags: InstallFlags,
    ) -> Result<Firmware> {
        let name = self
            .detect(stream, offset)
            .into_iter()
            .next()
            .ok_or(FirmwareError::UnknownFormat { offset })?;
        self.parse_stream_as(name, stream, offset, flags)
    }

    /// Parse with the named format, skipping detection.
    pub fn parse_stream_as(
        &self,
        name: &str,
        stream: &mut DynStream<'_>,
        offset: usize,
        flags: InstallFlags,
    ) -> Result<Firmware> {
        self.get(name)?.parse_stream(stream, offset, flags, &self.config)
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("formats", &self.names())
            .field("config", &self.config)
            .finish()
    }
}
