//! Typed errors for the crosshair pipeline.
//!
//! Every operation the settings panel can trigger fails with one of these. The
//! caller logs it, shows it to the user and keeps the previous state.

use std::path::PathBuf;
use thiserror::Error;

/// Loading or normalizing a custom crosshair image failed
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Building the overlay bitmap failed
#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("crosshair image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("canvas of {canvas}px cannot hold a {width}x{height} image")]
    DoesNotFit { canvas: u32, width: u32, height: u32 },

    #[error("display surface rejected the bitmap: {0:#}")]
    Surface(anyhow::Error),
}

/// Crosshair code could not be decoded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("crosshair code is empty")]
    Empty,

    #[error("crosshair code does not contain the primary section marker '0;P;'")]
    MissingPrefix,

    #[error("crosshair code is missing field '{key}'")]
    MissingField { key: &'static str },

    #[error("crosshair code field '{key}' has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Reading or writing the settings file failed
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}
