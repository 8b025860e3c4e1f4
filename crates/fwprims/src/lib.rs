//! Bounds-safe firmware container parsing with permissive licensing.
//!
//! fwprims reads firmware images through a bounds-checked stream, checks
//! fixed headers before touching the rest of the file, and parses each
//! vendor format into a uniform [`firmware::Firmware`] record.
//!
//! # Crate Structure
//!
//! - [`stream`]: bounds-checked reads, chunked folds, digests and sums
//! - [`firmware`]: the validate/parse contract and the format registry
//! - [`formats`]: built-in vendor formats (behind `formats` feature)

/// Re-export stream types.
pub mod stream {
    pub use fwprims_stream::*;
}

/// Re-export firmware contract types.
pub mod firmware {
    pub use fwprims_firmware::*;
}

/// Re-export built-in formats (requires `formats` feature).
#[cfg(feature = "formats")]
pub mod formats {
    pub use fwprims_formats::*;
}
