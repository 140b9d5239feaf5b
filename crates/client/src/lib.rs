//! HTTP client for the SoundForge audio-generation service.
//!
//! Provides the typed REST wrapper ([`AudioApi`]), the service trait the
//! tracker depends on ([`AudioService`]), and the uniform error shape all
//! transport and service failures normalize into ([`ApiError`]).

pub mod api;
pub mod error;
pub mod service;

pub use api::{AudioApi, SubmitResponse};
pub use error::{ApiError, ServiceErrorBody};
pub use service::AudioService;
