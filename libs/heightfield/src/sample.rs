//! A single grid sample.

/// Elevation at one grid position, or nothing.
///
/// `Absent` covers NODATA cells, values removed by the minimum policy and
/// positions outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sample {
    /// Elevation in source units.
    Present(f64),
    /// No data.
    #[default]
    Absent,
}

impl Sample {
    /// Returns true for [`Sample::Present`].
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Sample::Present(_))
    }

    /// Returns the elevation, if any.
    #[inline]
    pub fn elevation(&self) -> Option<f64> {
        match *self {
            Sample::Present(z) => Some(z),
            Sample::Absent => None,
        }
    }

    /// Classifies a raw raster value against a NODATA sentinel.
    ///
    /// Anything at or below the sentinel is absent.
    #[inline]
    pub fn from_raw(value: f64, nodata: f64) -> Self {
        if value > nodata {
            Sample::Present(value)
        } else {
            Sample::Absent
        }
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Sample::Absent, Sample::Present)
    }
}
