//! Device geolocation contract.
//!
//! The core never reads positioning hardware itself; callers implement
//! [`LocationProvider`] and the shared [`position_with_timeout`] wrapper
//! enforces the acquisition deadline so a stalled provider cannot hang
//! report submission.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Options for a device position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Request the most accurate fix available.
    pub enable_high_accuracy: bool,
    /// Give up after this long.
    pub timeout: Duration,
    /// Maximum age of an acceptable cached fix.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A device position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy: f64,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

/// Errors from device position requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The user denied the location permission.
    #[error("location permission denied")]
    Denied,

    /// No fix arrived within the configured timeout.
    #[error("location request timed out")]
    Timeout,

    /// The device could not produce a fix.
    #[error("location unavailable")]
    Unavailable,
}

/// Source of device position fixes.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Requests the current device position.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] when the permission is denied or no fix
    /// can be produced.
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<GeoPosition, PositionError>;
}

/// Requests the current position, bounding the wait by `options.timeout`.
///
/// # Errors
///
/// Returns [`PositionError::Timeout`] when the provider does not answer
/// in time, otherwise whatever the provider returned.
pub async fn position_with_timeout(
    provider: &dyn LocationProvider,
    options: PositionOptions,
) -> Result<GeoPosition, PositionError> {
    tokio::time::timeout(options.timeout, provider.current_position(options))
        .await
        .map_err(|_| PositionError::Timeout)?
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider;

    #[async_trait]
    impl LocationProvider for FixedProvider {
        async fn current_position(
            &self,
            _options: PositionOptions,
        ) -> Result<GeoPosition, PositionError> {
            Ok(GeoPosition {
                latitude: 28.6139,
                longitude: 77.209,
                accuracy: 12.0,
                timestamp: Utc::now(),
            })
        }
    }

    struct StalledProvider;

    #[async_trait]
    impl LocationProvider for StalledProvider {
        async fn current_position(
            &self,
            _options: PositionOptions,
        ) -> Result<GeoPosition, PositionError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn returns_provider_fix() {
        let position = position_with_timeout(&FixedProvider, PositionOptions::default())
            .await
            .unwrap();
        assert!((position.latitude - 28.6139).abs() < 1e-9);
        assert!((position.longitude - 77.209).abs() < 1e-9);
    }

    #[tokio::test]
    async fn stalled_provider_times_out() {
        let options = PositionOptions {
            timeout: Duration::from_millis(20),
            ..PositionOptions::default()
        };
        let result = position_with_timeout(&StalledProvider, options).await;
        assert_eq!(result, Err(PositionError::Timeout));
    }

    #[test]
    fn default_options_request_high_accuracy() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }
}
