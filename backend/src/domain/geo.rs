//! Great-circle distances and nearest-first ranking.

/// Mean Earth radius in kilometres used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Validation errors for coordinates.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoValidationError {
    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    ///
    /// # Examples
    /// ```
    /// use localconnect::domain::GeoPoint;
    ///
    /// assert!(GeoPoint::new(35.68, 139.65).is_ok());
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a point from values already known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Haversine great-circle distance in kilometres.
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// An item annotated with its distance from the query origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Rank `items` by distance from `origin`, nearest first, keeping `limit`.
///
/// Ties keep their input order.
///
/// # Examples
/// ```
/// use localconnect::domain::{GeoPoint, rank_nearby};
///
/// let origin = GeoPoint::new(35.0, 135.0).expect("valid");
/// let items = vec![
///     ("far", GeoPoint::new(36.0, 135.0).expect("valid")),
///     ("near", GeoPoint::new(35.1, 135.0).expect("valid")),
/// ];
/// let ranked = rank_nearby(&origin, items, |(_, point)| *point, 1);
/// assert_eq!(ranked[0].item.0, "near");
/// ```
pub fn rank_nearby<T, F>(
    origin: &GeoPoint,
    items: Vec<T>,
    position: F,
    limit: usize,
) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> GeoPoint,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let distance_km = haversine_km(origin, &position(&item));
            Ranked { item, distance_km }
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}
