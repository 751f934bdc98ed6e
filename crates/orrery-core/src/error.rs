// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Failures local to one surface.

use thiserror::Error;

/// Errors raised by render/asset adapters. Nothing here propagates past the
/// controller: the frame loop logs and keeps ticking, or the affected
/// content stays offline.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The backend lost (or never had) its output target.
    #[error("render output lost")]
    OutputLost,
    /// Backend-specific failure.
    #[error("render backend: {0}")]
    Backend(String),
    /// An asset could not be loaded or decoded.
    #[error("asset {path}: {reason}")]
    Asset {
        /// Logical path of the asset as requested.
        path: String,
        /// Loader-reported reason.
        reason: String,
    },
}
