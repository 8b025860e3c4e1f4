/// Default upper bound for images read into memory: 32 MiB.
pub const DEFAULT_MAX_FIRMWARE_SIZE: usize = 32 * 1024 * 1024;

/// Controls stream loading and format detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Largest stream `parse_stream` will read into memory.
    pub max_firmware_size: usize,
    /// When true, detection stops at the first format whose header validates.
    pub stop_on_first_match: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_firmware_size: DEFAULT_MAX_FIRMWARE_SIZE,
            stop_on_first_match: true,
        }
    }
}
