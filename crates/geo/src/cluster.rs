//! Proximity clustering of photo locations into map markers.
//!
//! Single-pass greedy partitioning: the first unassigned photo anchors a new
//! cluster, and every later unassigned photo within `radius_meters` of the
//! cluster's *running* centroid joins it. The centroid moves as members join,
//! so results depend on input order near the radius threshold. That behavior
//! is kept as-is; do not replace it with iterative refinement without
//! versioning the output.
//!
//! Cost is O(n²) distance evaluations, fine for a single flight's photo set.
//! Larger inputs should be bucketed (e.g. by grid cell) before calling in.

use crate::{distance, Coordinate, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Default merge radius in meters.
pub const DEFAULT_CLUSTER_RADIUS_M: f64 = 10.0;

/// Opaque photo identifier assigned by the storage layer.
pub type PhotoId = i64;

/// GPS metadata extracted from a single photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadataRecord {
    pub photo_id: PhotoId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl PhotoMetadataRecord {
    /// Creates a record without altitude.
    pub fn new(photo_id: PhotoId, latitude: f64, longitude: f64) -> Self {
        Self { photo_id, latitude, longitude, altitude: None }
    }

    /// Sets the altitude in meters.
    #[must_use]
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// The record's position.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One spatial cluster produced by [`cluster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult {
    /// Running arithmetic mean of member positions
    pub centroid: Coordinate,
    /// Always equal to `member_ids.len()`, at least 1
    pub member_count: usize,
    /// Members in the order they joined; the anchor comes first
    pub member_ids: Vec<PhotoId>,
    /// Mean altitude over members that report one
    pub altitude: Option<f64>,
}

impl ClusterResult {
    /// True when more than one photo shares this marker.
    #[inline]
    pub fn is_clustered(&self) -> bool {
        self.member_count > 1
    }
}

/// Map marker row derived from a cluster, ready for a persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub uncertainty_radius: f64,
    pub photos_count: usize,
    pub is_clustered: bool,
    pub visible: bool,
}

impl Marker {
    /// Builds a visible marker at the cluster centroid.
    ///
    /// `uncertainty_radius` is normally the radius the cluster was built with.
    pub fn from_cluster(cluster: &ClusterResult, uncertainty_radius: f64) -> Self {
        Self {
            latitude: cluster.centroid.latitude,
            longitude: cluster.centroid.longitude,
            altitude: cluster.altitude,
            uncertainty_radius,
            photos_count: cluster.member_count,
            is_clustered: cluster.is_clustered(),
            visible: true,
        }
    }
}

/// Accumulates one cluster while the scan runs.
struct ClusterBuilder {
    centroid: Coordinate,
    member_ids: Vec<PhotoId>,
    altitude_sum: f64,
    altitude_count: usize,
}

impl ClusterBuilder {
    fn new(anchor: &PhotoMetadataRecord) -> Self {
        let mut builder = Self {
            centroid: anchor.coordinate(),
            member_ids: vec![anchor.photo_id],
            altitude_sum: 0.0,
            altitude_count: 0,
        };
        builder.add_altitude(anchor.altitude);
        builder
    }

    fn add_altitude(&mut self, altitude: Option<f64>) {
        if let Some(alt) = altitude {
            self.altitude_sum += alt;
            self.altitude_count += 1;
        }
    }

    fn push(&mut self, record: &PhotoMetadataRecord) {
        self.member_ids.push(record.photo_id);
        self.add_altitude(record.altitude);

        let n = self.member_ids.len() as f64;
        self.centroid = Coordinate::new(
            (self.centroid.latitude * (n - 1.0) + record.latitude) / n,
            (self.centroid.longitude * (n - 1.0) + record.longitude) / n,
        );
    }

    fn finish(self) -> ClusterResult {
        let altitude = (self.altitude_count > 0)
            .then(|| self.altitude_sum / self.altitude_count as f64);
        ClusterResult {
            centroid: self.centroid,
            member_count: self.member_ids.len(),
            member_ids: self.member_ids,
            altitude,
        }
    }
}

/// Groups photos whose positions lie within `radius_meters` of a cluster's
/// running centroid.
///
/// Every distinct `photo_id` lands in exactly one cluster. When an id repeats,
/// the first record with that id is used and later ones are skipped. A
/// non-positive or NaN radius yields one cluster per photo.
///
/// # Errors
/// `InvalidCoordinate` if any record is out of range. Validation happens
/// before clustering starts, so no partial result is produced.
///
/// # Example
/// ```
/// use skytrace_geo::{cluster, PhotoMetadataRecord};
///
/// let photos = vec![
///     PhotoMetadataRecord::new(1, 0.0, 0.0),
///     PhotoMetadataRecord::new(2, 0.0, 0.00005),
///     PhotoMetadataRecord::new(3, 0.0, 5.0),
/// ];
/// let clusters = cluster(&photos, 10.0).unwrap();
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].member_ids, vec![1, 2]);
/// ```
#[instrument(skip_all, fields(points = points.len(), radius_meters = radius_meters))]
pub fn cluster(points: &[PhotoMetadataRecord], radius_meters: f64) -> Result<Vec<ClusterResult>> {
    for record in points {
        record.coordinate().validate()?;
    }

    let mut assigned = vec![false; points.len()];
    let mut placed = HashSet::with_capacity(points.len());
    let mut clusters = Vec::new();

    for anchor in 0..points.len() {
        if assigned[anchor] || placed.contains(&points[anchor].photo_id) {
            continue;
        }
        clusters.push(grow_cluster(points, anchor, radius_meters, &mut assigned, &mut placed)?);
    }

    debug!(clusters = clusters.len(), "Clustered photo locations");
    Ok(clusters)
}

/// Builds the cluster anchored at `anchor`, marking every member in
/// `assigned` and its id in `placed`.
///
/// Everything before `anchor` is already assigned or skipped, so the scan
/// starts after it.
fn grow_cluster(
    points: &[PhotoMetadataRecord],
    anchor: usize,
    radius_meters: f64,
    assigned: &mut [bool],
    placed: &mut HashSet<PhotoId>,
) -> Result<ClusterResult> {
    assigned[anchor] = true;
    placed.insert(points[anchor].photo_id);
    let mut builder = ClusterBuilder::new(&points[anchor]);

    for (idx, candidate) in points.iter().enumerate().skip(anchor + 1) {
        if assigned[idx] || placed.contains(&candidate.photo_id) {
            continue;
        }
        if distance(builder.centroid, candidate.coordinate())? <= radius_meters {
            assigned[idx] = true;
            placed.insert(candidate.photo_id);
            builder.push(candidate);
        }
    }

    Ok(builder.finish())
}
