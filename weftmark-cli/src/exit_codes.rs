//! Exit codes following sysexits.h conventions.
//!
//! These codes give scripts and CI systems semantic failure modes to branch
//! on, beyond success/failure.

use weftmark_core::WeftmarkError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Data format error (candidate rejected as not authentic).
/// Maps to EX_DATAERR from sysexits.h.
pub const VERIFICATION_FAILED: i32 = 65;

/// Cannot open or decode an input image, or the item id is unknown.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// I/O error reading or writing the record store.
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Configuration error (e.g. unknown hash algorithm name).
/// Maps to EX_CONFIG from sysexits.h.
pub const CONFIG_ERROR: i32 = 78;

/// Map a failure to its exit code.
///
/// Typed core errors are classified directly; anything else falls back to
/// message inspection, mirroring how the errors are phrased by the commands.
pub fn classify(err: &anyhow::Error) -> i32 {
    if let Some(core) = err.downcast_ref::<WeftmarkError>() {
        return match core {
            WeftmarkError::Decode(_) => INPUT_ERROR,
            WeftmarkError::Geometry(_)
            | WeftmarkError::MissingFeature { .. }
            | WeftmarkError::Analysis { .. } => GENERAL_ERROR,
            WeftmarkError::HashAlgorithmUnavailable(_) => CONFIG_ERROR,
            WeftmarkError::Serialization(_) | WeftmarkError::Storage(_) => IO_ERROR,
        };
    }

    let message = format!("{err:#}");
    if message.contains("not authentic") {
        VERIFICATION_FAILED
    } else if message.contains("not found") {
        INPUT_ERROR
    } else {
        GENERAL_ERROR
    }
}
