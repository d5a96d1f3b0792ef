//! Errors raised while building and driving a [`ShaderProgram`](crate::ShaderProgram).

use std::path::PathBuf;

use thiserror::Error;

use crate::program::ProgramId;
use crate::stage::StageKind;

/// Every failure the shader program can surface. None of them are retried;
/// the operation that produced one is aborted.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{kind} shaders are currently unsupported")]
    UnsupportedStage { kind: StageKind },

    #[error("couldn't create shader of type {kind}: {log}")]
    StageCreation { kind: StageKind, log: String },

    #[error("{kind} compilation failed: {log}")]
    Compilation { kind: StageKind, log: String },

    #[error("couldn't create shader program object")]
    ProgramCreation,

    #[error("shader program link failed: {log}")]
    Link { log: String },

    #[error("could not bind attribute {name}: location returned -1")]
    AttributeBinding { name: String },

    #[error("could not bind uniform {name}: location returned -1")]
    UniformBinding { name: String },

    #[error("could not find attribute in shader program: {name}")]
    AttributeNotFound { name: String },

    #[error("could not find uniform in shader program: {name}")]
    UniformNotFound { name: String },

    #[error("shader program {program} not initialized")]
    NotInitialized { program: ProgramId },

    #[error("failed to open file {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ShaderError> = std::result::Result<T, E>;
