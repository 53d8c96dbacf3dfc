//! Cache-then-provider-then-gazetteer address resolution.

use std::sync::Arc;

use saarthi_geo::Coordinate;

use crate::{
    AddressResult, CACHE_HIT_CONFIDENCE, CACHE_PROXIMITY_KM, CachedAddress, GeocodeCache,
    ReverseGeocoder, gazetteer,
};

/// Resolves coordinates to addresses, consulting the proximity cache,
/// then the external provider, then the embedded gazetteer.
pub struct AddressResolver {
    cache: Arc<dyn GeocodeCache>,
    provider: Arc<dyn ReverseGeocoder>,
}

impl AddressResolver {
    /// Creates a resolver over the given cache and provider.
    #[must_use]
    pub fn new(cache: Arc<dyn GeocodeCache>, provider: Arc<dyn ReverseGeocoder>) -> Self {
        Self { cache, provider }
    }

    /// Resolves coordinates to a human-readable address.
    ///
    /// Never fails: cache and provider errors are logged and treated as
    /// misses, with the embedded gazetteer as the final fallback.
    pub async fn resolve_address(&self, lat: f64, lng: f64) -> AddressResult {
        if let Some(hit) = self.cached_result(lat, lng).await {
            return hit;
        }

        match self.provider.reverse(lat, lng).await {
            Ok(Some(address)) => {
                let entry = CachedAddress {
                    latitude: lat,
                    longitude: lng,
                    formatted_address: address.formatted.clone(),
                    components: address.components.clone(),
                };
                if let Err(e) = self.cache.store(&entry).await {
                    log::warn!("Failed to cache geocoding result: {e}");
                }
                return AddressResult {
                    formatted_address: address.formatted,
                    components: address.components,
                    coords: Coordinate::new(lat, lng),
                    confidence: address.confidence,
                    cached: false,
                };
            }
            Ok(None) => {
                log::debug!("Geocoding provider returned no result for {lat}, {lng}");
            }
            Err(e) => {
                log::warn!("Geocoding provider failed for {lat}, {lng}: {e}");
            }
        }

        gazetteer::fallback_address(lat, lng)
    }

    /// Returns the cached address within 50 m of the query point, or
    /// `None` on a miss. Cache failures are logged and treated as misses.
    pub async fn cached_result(&self, lat: f64, lng: f64) -> Option<AddressResult> {
        match self
            .cache
            .nearest_within(lat, lng, CACHE_PROXIMITY_KM)
            .await
        {
            Ok(Some(hit)) => Some(AddressResult {
                formatted_address: hit.formatted_address,
                components: hit.components,
                coords: Coordinate::new(lat, lng),
                confidence: CACHE_HIT_CONFIDENCE,
                cached: true,
            }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Geocode cache lookup failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use saarthi_emergency_models::AddressComponents;

    use super::*;
    use crate::{GeocodeError, ProviderAddress};

    #[derive(Default)]
    struct FakeCache {
        hit: Option<CachedAddress>,
        fail_lookup: bool,
        lookups: AtomicUsize,
        stored: Mutex<Vec<CachedAddress>>,
    }

    #[async_trait]
    impl GeocodeCache for FakeCache {
        async fn nearest_within(
            &self,
            _lat: f64,
            _lng: f64,
            _radius_km: f64,
        ) -> Result<Option<CachedAddress>, GeocodeError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookup {
                return Err(GeocodeError::Cache {
                    message: "cache down".to_string(),
                });
            }
            Ok(self.hit.clone())
        }

        async fn store(&self, address: &CachedAddress) -> Result<(), GeocodeError> {
            self.stored.lock().unwrap().push(address.clone());
            Ok(())
        }
    }

    enum ProviderMode {
        Address(ProviderAddress),
        Empty,
        Fail,
    }

    struct FakeProvider {
        mode: ProviderMode,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(mode: ProviderMode) -> Self {
            Self {
                mode,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReverseGeocoder for FakeProvider {
        async fn reverse(
            &self,
            _lat: f64,
            _lng: f64,
        ) -> Result<Option<ProviderAddress>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.mode {
                ProviderMode::Address(address) => Ok(Some(address.clone())),
                ProviderMode::Empty => Ok(None),
                ProviderMode::Fail => Err(GeocodeError::Parse {
                    message: "provider down".to_string(),
                }),
            }
        }
    }

    fn market_address() -> ProviderAddress {
        ProviderAddress {
            formatted: "Main Market, Rohini, Delhi 110085, India".to_string(),
            components: AddressComponents {
                neighbourhood: Some("Rohini".to_string()),
                city: Some("Delhi".to_string()),
                ..AddressComponents::default()
            },
            confidence: 8,
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_provider() {
        let cache = Arc::new(FakeCache {
            hit: Some(CachedAddress {
                latitude: 28.70412,
                longitude: 77.10248,
                formatted_address: "Main Market, Rohini, Delhi".to_string(),
                components: AddressComponents::default(),
            }),
            ..FakeCache::default()
        });
        let provider = Arc::new(FakeProvider::new(ProviderMode::Fail));
        let resolver = AddressResolver::new(cache, provider.clone());

        let result = resolver.resolve_address(28.7041, 77.1025).await;

        assert!(result.cached);
        assert_eq!(result.confidence, CACHE_HIT_CONFIDENCE);
        assert_eq!(result.formatted_address, "Main Market, Rohini, Delhi");
        // Query coordinates are echoed, not the stored ones.
        assert!((result.coords.lat - 28.7041).abs() < 1e-9);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_result_written_back() {
        let cache = Arc::new(FakeCache::default());
        let provider = Arc::new(FakeProvider::new(ProviderMode::Address(market_address())));
        let resolver = AddressResolver::new(cache.clone(), provider.clone());

        let result = resolver.resolve_address(28.70415, 77.10252).await;

        assert!(!result.cached);
        assert_eq!(result.confidence, 8);
        assert_eq!(
            result.formatted_address,
            "Main Market, Rohini, Delhi 110085, India"
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let stored = cache.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert!((stored[0].latitude - 28.70415).abs() < 1e-9);
        assert!((stored[0].longitude - 77.10252).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_gazetteer() {
        let cache = Arc::new(FakeCache::default());
        let provider = Arc::new(FakeProvider::new(ProviderMode::Fail));
        let resolver = AddressResolver::new(cache, provider);

        let result = resolver.resolve_address(28.7041, 77.1025).await;

        assert_eq!(result.formatted_address, "Rohini, Delhi - 110085");
        assert_eq!(result.confidence, gazetteer::GAZETTEER_CONFIDENCE);
        assert!(!result.cached);
    }

    #[tokio::test]
    async fn provider_empty_far_point_is_generic() {
        let cache = Arc::new(FakeCache::default());
        let provider = Arc::new(FakeProvider::new(ProviderMode::Empty));
        let resolver = AddressResolver::new(cache, provider);

        let result = resolver.resolve_address(28.0, 76.0).await;

        assert_eq!(
            result.formatted_address,
            "Delhi, India (Coordinates: 28.00000, 76.00000)"
        );
        assert_eq!(result.confidence, gazetteer::GENERIC_CONFIDENCE);
    }

    #[tokio::test]
    async fn cache_error_treated_as_miss() {
        let cache = Arc::new(FakeCache {
            fail_lookup: true,
            ..FakeCache::default()
        });
        let provider = Arc::new(FakeProvider::new(ProviderMode::Address(market_address())));
        let resolver = AddressResolver::new(cache.clone(), provider.clone());

        let result = resolver.resolve_address(28.7041, 77.1025).await;

        assert!(!result.cached);
        assert_eq!(result.confidence, 8);
        assert_eq!(cache.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
