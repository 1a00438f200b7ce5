use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Platform step that failed while bringing a window up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Init,
    VideoSubsystem,
    BuildWindow,
    CreateContext,
    MakeCurrent,
    LoadFunctions,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreationStep::Init => "SDL initialisation",
            CreationStep::VideoSubsystem => "video subsystem initialisation",
            CreationStep::BuildWindow => "window creation",
            CreationStep::CreateContext => "OpenGL context creation",
            CreationStep::MakeCurrent => "making OpenGL context current",
            CreationStep::LoadFunctions => "loading OpenGL functions",
        };
        f.write_str(s)
    }
}

/// File step that failed. Closing has no variant: `File` closes on drop and
/// discards the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Open,
    Seek,
    Read,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileOp::Open => "open",
            FileOp::Seek => "seek",
            FileOp::Read => "read",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{step} failed: {reason}")]
    WindowCreation { step: CreationStep, reason: String },

    #[error("window system message error: {0}")]
    WindowSystem(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        op: FileOp,
        #[source]
        source: io::Error,
    },

    #[error("{stage} shader compilation error: {log}")]
    ShaderCompile { stage: StageKind, log: String },

    #[error("program link error: {log}")]
    ShaderLink { log: String },

    #[error("failed to present frame: {0}")]
    Present(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn creation(step: CreationStep, reason: impl Into<String>) -> Error {
        Error::WindowCreation {
            step,
            reason: reason.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>, op: FileOp, source: io::Error) -> Error {
        Error::FileAccess {
            path: path.into(),
            op,
            source,
        }
    }

    /// Process exit status for this failure class. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::WindowCreation { .. } => 2,
            Error::WindowSystem(_) => 3,
            Error::FileAccess { .. } => 4,
            Error::ShaderCompile { .. } => 5,
            Error::ShaderLink { .. } => 6,
            Error::Present(_) => 7,
        }
    }
}
