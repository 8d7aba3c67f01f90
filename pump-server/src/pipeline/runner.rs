//! Pipeline orchestration.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::domain::{Coordinates, FuelType, InvalidRadius, Radius, ResolvedPlace};
use crate::prices::best_prices;

use super::error::ErrorKind;
use super::snapshot::{Phase, Snapshot};
use super::sources::{AreaSource, Geocoder, StationSource};

/// The resolution pipeline.
///
/// Runs cycles strictly sequentially stage by stage and owns the
/// published snapshot. All state writes go through generation-checked
/// commits: a trigger bumps the generation, and any commit belonging to
/// an older generation is discarded, so overlapping cycles resolve to
/// "latest trigger wins" regardless of response arrival order.
pub struct Pipeline<G, A, S> {
    geocoder: G,
    areas: A,
    stations: S,
    snapshot: RwLock<Snapshot>,
    generation: AtomicU64,
}

impl<G, A, S> Pipeline<G, A, S>
where
    G: Geocoder,
    A: AreaSource,
    S: StationSource,
{
    /// Create an idle pipeline over the given stage sources.
    pub fn new(geocoder: G, areas: A, stations: S) -> Self {
        Self {
            geocoder,
            areas,
            stations,
            snapshot: RwLock::new(Snapshot::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// The current published view.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Run a full cycle from a device position.
    pub async fn locate(&self, coords: Coordinates) {
        let generation = self.begin();
        tracing::info!(
            generation,
            lat = coords.latitude(),
            lon = coords.longitude(),
            "resolving device position"
        );

        if !self
            .commit(generation, |s| {
                s.phase = Phase::Locating;
                s.error = None;
            })
            .await
        {
            return;
        }

        let place = match self.geocoder.reverse_lookup(coords).await {
            Ok(place) => place,
            Err(e) => {
                self.fail(generation, e.into()).await;
                return;
            }
        };

        let center = place.coordinates;
        if !self
            .commit(generation, |s| {
                s.place = Some(place);
            })
            .await
        {
            return;
        }

        self.run_from_center(generation, center).await;
    }

    /// Record that the device could not provide a position.
    ///
    /// Supersedes any in-flight cycle; previously aggregated data stays
    /// published.
    pub async fn report_location_failure(&self, message: impl Into<String>) {
        let generation = self.begin();
        self.fail(generation, ErrorKind::LocationUnavailable(message.into()))
            .await;
    }

    /// Run a full cycle from a user-selected search candidate,
    /// bypassing the reverse lookup.
    pub async fn select_place(&self, name: &str, postal_code: &str) {
        let generation = self.begin();
        tracing::info!(generation, name, postal_code, "resolving selected place");

        if !self
            .commit(generation, |s| {
                s.phase = Phase::Locating;
                s.error = None;
            })
            .await
        {
            return;
        }

        let coords = match self.geocoder.geocode_by_name(name, postal_code).await {
            Ok(coords) => coords,
            Err(e) => {
                self.fail(generation, e.into()).await;
                return;
            }
        };

        let place = ResolvedPlace {
            name: name.to_string(),
            postal_code: postal_code.to_string(),
            coordinates: coords,
        };

        if !self
            .commit(generation, |s| {
                s.place = Some(place);
            })
            .await
        {
            return;
        }

        self.run_from_center(generation, coords).await;
    }

    /// Change the search radius.
    ///
    /// Re-enters the pipeline at area expansion, reusing the last
    /// resolved centre; the geocoder is not consulted again. With no
    /// resolved centre yet, the radius simply applies to the next cycle.
    pub async fn set_radius(&self, radius_km: u8) -> Result<(), InvalidRadius> {
        let radius = Radius::from_km(radius_km)?;
        let generation = self.begin();

        let mut center = None;
        let committed = self
            .commit(generation, |s| {
                s.radius = radius;
                s.error = None;
                center = s.place.as_ref().map(|p| p.coordinates);
            })
            .await;

        if !committed {
            return Ok(());
        }

        if let Some(center) = center {
            tracing::info!(generation, radius_km, "re-expanding with new radius");
            self.run_from_center(generation, center).await;
        }

        Ok(())
    }

    /// Run the expansion → query → aggregation tail of a cycle.
    async fn run_from_center(&self, generation: u64, center: Coordinates) {
        let radius = self.snapshot.read().await.radius;

        let areas = match self.areas.expand(center, radius.as_km()).await {
            Ok(areas) => areas,
            Err(e) => {
                self.fail(generation, e.into()).await;
                return;
            }
        };

        tracing::debug!(generation, areas = areas.len(), "postal areas expanded");
        if !self
            .commit(generation, |s| {
                s.phase = Phase::AreaResolved;
            })
            .await
        {
            return;
        }

        let records = match self.stations.fetch(&areas).await {
            Ok(records) => records,
            Err(e) => {
                self.fail(generation, e.into()).await;
                return;
            }
        };

        tracing::debug!(generation, stations = records.len(), "station records fetched");
        let best = best_prices(&records, &FuelType::ALL);

        if !self
            .commit(generation, |s| {
                s.phase = Phase::StationsFetched;
                s.stations = records;
            })
            .await
        {
            return;
        }

        let committed = self
            .commit(generation, |s| {
                s.phase = Phase::Aggregated;
                s.best = best;
            })
            .await;

        if committed {
            tracing::info!(generation, "resolution cycle aggregated");
        }
    }

    /// Start a new cycle, superseding any in-flight one.
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a state change if this cycle is still the latest.
    ///
    /// The generation is re-checked under the write lock; a stale
    /// cycle's commit is dropped on the floor.
    async fn commit<F>(&self, generation: u64, apply: F) -> bool
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut guard = self.snapshot.write().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded commit");
            return false;
        }

        apply(&mut guard);
        guard.generation = generation;
        true
    }

    /// End the cycle with an error; published data is left untouched.
    async fn fail(&self, generation: u64, kind: ErrorKind) {
        let committed = self
            .commit(generation, |s| {
                s.error = Some(kind.clone());
            })
            .await;

        if committed {
            tracing::warn!(generation, error = %kind, "resolution cycle failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::areas::AreaError;
    use crate::domain::{AreaMatch, FuelOffer, StationRecord, StockStatus};
    use crate::geocode::GeocodeError;
    use crate::stations::StationError;

    /// Geocoder fake: resolves to a place named after the latitude, with
    /// a configurable delay so tests can interleave cycles.
    struct FakeGeocoder {
        delay: Duration,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeGeocoder {
        fn instant() -> Self {
            Self {
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Geocoder for FakeGeocoder {
        fn reverse_lookup(
            &self,
            coords: Coordinates,
        ) -> impl Future<Output = Result<ResolvedPlace, GeocodeError>> + Send {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                // Only the probe position at latitude 1.0 is slow, so a
                // test can interleave a slow old cycle with a fast new one
                let delay = if coords.latitude() == 1.0 {
                    self.delay
                } else {
                    Duration::ZERO
                };
                tokio::time::sleep(delay).await;
                if self.fail {
                    return Err(GeocodeError::Api {
                        status: 503,
                        message: "down".into(),
                    });
                }
                Ok(ResolvedPlace {
                    name: format!("place-{}", coords.latitude()),
                    postal_code: "69001".to_string(),
                    coordinates: coords,
                })
            }
        }

        fn geocode_by_name(
            &self,
            _name: &str,
            _postal_code: &str,
        ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(Coordinates::new(45.0, 5.0).unwrap())
            }
        }
    }

    struct FakeAreas {
        calls: AtomicUsize,
        empty: bool,
    }

    impl FakeAreas {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                empty: false,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AreaSource for FakeAreas {
        fn expand(
            &self,
            _center: Coordinates,
            radius_km: u8,
        ) -> impl Future<Output = Result<Vec<AreaMatch>, AreaError>> + Send {
            async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                let _ = Radius::from_km(radius_km).map_err(AreaError::InvalidRadius)?;
                if self.empty {
                    return Ok(Vec::new());
                }
                Ok(vec![AreaMatch {
                    place_name: "Lyon".to_string(),
                    postal_code: "69001".to_string(),
                    department: "69".to_string(),
                }])
            }
        }
    }

    /// Station fake: one diesel station whose price is set per instance;
    /// optionally fails after the first call.
    struct FakeStations {
        price: f64,
        calls: AtomicUsize,
        fail_after: Option<usize>,
    }

    impl FakeStations {
        fn priced(price: f64) -> Self {
            Self {
                price,
                calls: AtomicUsize::new(0),
                fail_after: None,
            }
        }
    }

    impl StationSource for FakeStations {
        fn fetch(
            &self,
            areas: &[AreaMatch],
        ) -> impl Future<Output = Result<Vec<StationRecord>, StationError>> + Send {
            let empty = areas.is_empty();
            async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(limit) = self.fail_after
                    && call >= limit
                {
                    return Err(StationError::Api {
                        status: 500,
                        message: "boom".into(),
                    });
                }
                if empty {
                    return Ok(Vec::new());
                }
                let mut offers = BTreeMap::new();
                offers.insert(
                    FuelType::Diesel,
                    FuelOffer {
                        price: Some(self.price),
                        stock: StockStatus::Available,
                        updated: None,
                    },
                );
                Ok(vec![StationRecord {
                    address: "1 rue A".to_string(),
                    city: "Lyon".to_string(),
                    department: "69".to_string(),
                    coordinates: Coordinates::new(45.76, 4.83).unwrap(),
                    offers,
                }])
            }
        }
    }

    fn coords(lat: f64) -> Coordinates {
        Coordinates::new(lat, 4.83).unwrap()
    }

    #[tokio::test]
    async fn full_cycle_reaches_aggregated() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        pipeline.locate(coords(45.76)).await;

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.phase, Phase::Aggregated);
        assert!(snap.error.is_none());
        assert_eq!(snap.place.as_ref().unwrap().name, "place-45.76");
        assert_eq!(snap.stations.len(), 1);
        assert_eq!(
            snap.best
                .get(FuelType::Diesel)
                .unwrap()
                .offer(FuelType::Diesel)
                .unwrap()
                .price,
            Some(1.79)
        );
    }

    #[tokio::test]
    async fn newer_cycle_wins_regardless_of_arrival_order() {
        let slow_geocoder = FakeGeocoder {
            delay: Duration::from_millis(200),
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let pipeline = Arc::new(Pipeline::new(
            slow_geocoder,
            FakeAreas::new(),
            FakeStations::priced(1.79),
        ));

        // Cycle 1: slow reverse lookup for the old position
        let p1 = Arc::clone(&pipeline);
        let first = tokio::spawn(async move { p1.locate(coords(1.0)).await });

        // Give cycle 1 time to begin, then supersede it with a fast cycle
        // that completes while cycle 1's lookup is still pending
        tokio::time::sleep(Duration::from_millis(50)).await;
        let p2 = Arc::clone(&pipeline);
        let second = tokio::spawn(async move { p2.locate(coords(2.0)).await });

        second.await.unwrap();
        first.await.unwrap();

        // Cycle 1's response arrived after cycle 2 finished; it must have
        // been discarded rather than applied
        let snap = pipeline.snapshot().await;
        assert_eq!(snap.place.as_ref().unwrap().name, "place-2");
        assert_eq!(snap.phase, Phase::Aggregated);
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn radius_change_reuses_center_without_geocoding() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        pipeline.locate(coords(45.76)).await;
        assert_eq!(pipeline.geocoder.call_count(), 1);
        assert_eq!(pipeline.areas.call_count(), 1);

        pipeline.set_radius(10).await.unwrap();

        assert_eq!(pipeline.geocoder.call_count(), 1, "geocoder re-invoked");
        assert_eq!(pipeline.areas.call_count(), 2);

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.radius, Radius::Km10);
        assert_eq!(snap.phase, Phase::Aggregated);
    }

    #[tokio::test]
    async fn invalid_radius_is_rejected_without_a_cycle() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        let result = pipeline.set_radius(7).await;
        assert_eq!(result, Err(InvalidRadius(7)));
        assert_eq!(pipeline.areas.call_count(), 0);
    }

    #[tokio::test]
    async fn radius_before_first_location_only_stores() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        pipeline.set_radius(15).await.unwrap();

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.radius, Radius::Km15);
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(pipeline.areas.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_preserves_previous_aggregation() {
        let stations = FakeStations {
            price: 1.79,
            calls: AtomicUsize::new(0),
            fail_after: Some(1),
        };
        let pipeline = Pipeline::new(FakeGeocoder::instant(), FakeAreas::new(), stations);

        pipeline.locate(coords(45.76)).await;
        let before = pipeline.snapshot().await;
        assert_eq!(before.phase, Phase::Aggregated);

        // Second cycle dies at the dataset stage
        pipeline.set_radius(10).await.unwrap();

        let after = pipeline.snapshot().await;
        assert_eq!(after.error, Some(ErrorKind::DatasetUnavailable));
        assert_eq!(after.stations, before.stations, "stale data was discarded");
        assert!(after.best.get(FuelType::Diesel).is_some());
    }

    #[tokio::test]
    async fn geocode_failure_surfaces_as_unavailable() {
        let geocoder = FakeGeocoder {
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let pipeline = Pipeline::new(geocoder, FakeAreas::new(), FakeStations::priced(1.79));

        pipeline.locate(coords(45.76)).await;

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.error, Some(ErrorKind::GeocodeUnavailable));
        assert!(snap.place.is_none());
        assert!(snap.stations.is_empty());
    }

    #[tokio::test]
    async fn location_failure_supersedes_and_keeps_data() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        pipeline.locate(coords(45.76)).await;
        pipeline.report_location_failure("permission denied").await;

        let snap = pipeline.snapshot().await;
        assert_eq!(
            snap.error,
            Some(ErrorKind::LocationUnavailable("permission denied".into()))
        );
        assert_eq!(snap.stations.len(), 1);
    }

    #[tokio::test]
    async fn empty_expansion_aggregates_to_nothing() {
        let areas = FakeAreas {
            calls: AtomicUsize::new(0),
            empty: true,
        };
        let pipeline = Pipeline::new(FakeGeocoder::instant(), areas, FakeStations::priced(1.79));

        pipeline.locate(coords(45.76)).await;

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.phase, Phase::Aggregated);
        assert!(snap.stations.is_empty());
        assert!(snap.best.is_empty());
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn select_place_bypasses_reverse_lookup() {
        let pipeline = Pipeline::new(
            FakeGeocoder::instant(),
            FakeAreas::new(),
            FakeStations::priced(1.79),
        );

        pipeline.select_place("Lyon", "69002").await;

        let snap = pipeline.snapshot().await;
        assert_eq!(snap.phase, Phase::Aggregated);
        let place = snap.place.as_ref().unwrap();
        assert_eq!(place.name, "Lyon");
        assert_eq!(place.postal_code, "69002");
    }
}
