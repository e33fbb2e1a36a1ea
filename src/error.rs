//! Crate-wide error type. Every failure is classified so `main` can pick
//! an exit code: configuration problems are caught at startup, parse
//! problems come from the capture file, everything else is host plumbing.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoseError {
    // configuration, detected at init
    #[error("capture file '{path}' cannot be read: {source}")]
    CaptureRead { path: PathBuf, source: io::Error },

    #[error("skeleton edge {index} references landmark {landmark}, but the rig only has {joint_count} joints")]
    EdgeOutOfRange {
        index: usize,
        landmark: usize,
        joint_count: usize,
    },

    #[error("rig scale must be finite and non-zero, got {value}")]
    InvalidScale { value: f32 },

    // capture parsing
    #[error("record on line {line} holds {found} values, expected at least {expected}")]
    RecordTooShort {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("record on line {line}, value {column}: '{token}' is not a number")]
    InvalidValue {
        line: usize,
        column: usize,
        token: String,
    },

    // host plumbing
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible gpu adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("gpu device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

/// Coarse failure category, used for reporting and the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Config,
    Parse,
    Host,
}

impl ErrorClass {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorClass::Host => 1,
            ErrorClass::Config => 2,
            ErrorClass::Parse => 3,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::Config => "config",
            ErrorClass::Parse => "parse",
            ErrorClass::Host => "host",
        };
        f.write_str(name)
    }
}

impl PoseError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PoseError::CaptureRead { .. }
            | PoseError::EdgeOutOfRange { .. }
            | PoseError::InvalidScale { .. } => ErrorClass::Config,
            PoseError::RecordTooShort { .. } | PoseError::InvalidValue { .. } => ErrorClass::Parse,
            PoseError::CreateSurface(_)
            | PoseError::RequestAdapter(_)
            | PoseError::RequestDevice(_)
            | PoseError::EventLoop(_)
            | PoseError::Window(_) => ErrorClass::Host,
        }
    }
}

pub type Result<T> = std::result::Result<T, PoseError>;
