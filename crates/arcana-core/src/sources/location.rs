//! Host location providers.

use async_trait::async_trait;

use crate::error::{EntropyError, Result};
use crate::source::{Location, LocationProvider, SensorInfo, SensorKind};

static STATIC_LOCATION_INFO: SensorInfo = SensorInfo {
    name: "static_location",
    description: "Fixed coordinates from configuration",
    kind: SensorKind::Location,
};

static NO_LOCATION_INFO: SensorInfo = SensorInfo {
    name: "no_location",
    description: "Location access not granted",
    kind: SensorKind::Location,
};

/// Always answers with the configured fix.
pub struct StaticLocation {
    fix: Location,
}

impl StaticLocation {
    pub fn new(fix: Location) -> Self {
        Self { fix }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    fn info(&self) -> &SensorInfo {
        &STATIC_LOCATION_INFO
    }

    fn is_authorized(&self) -> bool {
        true
    }

    async fn request_fix(&self) -> Result<Location> {
        Ok(self.fix)
    }
}

/// Permission denied.
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    fn info(&self) -> &SensorInfo {
        &NO_LOCATION_INFO
    }

    fn is_authorized(&self) -> bool {
        false
    }

    async fn request_fix(&self) -> Result<Location> {
        Err(EntropyError::SensorUnavailable(
            "location permission not granted".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_location_returns_fix() {
        let fix = Location {
            latitude: -33.87,
            longitude: 151.21,
            altitude: 58.0,
        };
        let provider = StaticLocation::new(fix);
        assert!(provider.is_authorized());
        assert_eq!(provider.request_fix().await.unwrap(), fix);
    }

    #[tokio::test]
    async fn test_no_location_is_unauthorized() {
        assert!(!NoLocation.is_authorized());
        assert!(matches!(
            NoLocation.request_fix().await,
            Err(EntropyError::SensorUnavailable(_))
        ));
        assert_eq!(NoLocation.name(), "no_location");
    }
}
