//! Error types for cardweb-services

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Plex is not enabled in the configuration")]
    PlexDisabled,

    #[error("Plex request failed: {message}")]
    Http { message: String },

    #[error("Unexpected Plex response: {message}")]
    UnexpectedPayload { message: String },

    #[error("Preview renderer is not configured")]
    RendererNotConfigured,

    #[error("Preview renderer failed: {message}")]
    RendererFailed { message: String },

    #[error("Preview timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Renderer produced no image at {path}")]
    MissingOutput { path: String },

    #[error("Unable to resolve libraries or fonts for series: {message}")]
    MergeError { message: String },

    #[error("IO error")]
    IoError(#[from] io::Error),
}

/// Result type with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
