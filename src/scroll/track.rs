use crate::{
    foundation::core::Vec2,
    foundation::error::{FrameSeqError, FrameSeqResult},
    scroll::ease::Ease,
};

/// Interpolation contract for track value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// One `(t, value)` pair on a [`Track`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoint<T> {
    /// Scroll progress at which `value` is reached.
    pub at: f64,
    pub value: T,
    /// Shaping applied toward the next point.
    #[serde(default)]
    pub ease: Ease,
}

impl<T> ControlPoint<T> {
    pub fn new(at: f64, value: T) -> Self {
        Self {
            at,
            value,
            ease: Ease::Linear,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Piecewise interpolation over scroll progress.
///
/// Between consecutive points the value is interpolated; before the first point and after the
/// last the end values hold. Coincident points form a step.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Track<T> {
    points: Vec<ControlPoint<T>>,
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    pub fn new(points: Vec<ControlPoint<T>>) -> FrameSeqResult<Self> {
        if points.is_empty() {
            return Err(FrameSeqError::validation(
                "track needs at least one control point",
            ));
        }
        if points.iter().any(|p| !p.at.is_finite()) {
            return Err(FrameSeqError::validation(
                "track control points must be finite",
            ));
        }
        if !points.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(FrameSeqError::validation(
                "track control points must be sorted by t",
            ));
        }
        Ok(Self { points })
    }

    /// All-linear track from `(t, value)` pairs.
    pub fn linear(points: &[(f64, T)]) -> FrameSeqResult<Self> {
        Self::new(
            points
                .iter()
                .map(|(at, v)| ControlPoint::new(*at, v.clone()))
                .collect(),
        )
    }

    pub fn points(&self) -> &[ControlPoint<T>] {
        &self.points
    }

    pub fn sample(&self, t: f64) -> T {
        let first = &self.points[0];
        let last = &self.points[self.points.len() - 1];
        if t.is_nan() || t <= first.at {
            return first.value.clone();
        }
        if t >= last.at {
            return last.value.clone();
        }

        let idx = self.points.partition_point(|p| p.at <= t);
        let a = &self.points[idx - 1];
        let b = &self.points[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return b.value.clone();
        }

        let local = (t - a.at) / span;
        T::lerp(&a.value, &b.value, a.ease.apply(local))
    }
}

impl<'de, T> serde::Deserialize<'de> for Track<T>
where
    T: Lerp + Clone + serde::Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw<T> {
            points: Vec<ControlPoint<T>>,
        }

        let raw = Raw::<T>::deserialize(deserializer)?;
        Self::new(raw.points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/track.rs"]
mod tests;
