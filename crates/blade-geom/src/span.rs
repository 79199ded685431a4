//! Spanwise interpolation of layer parameters.

use tracing::trace;

use crate::error::{BladeError, BladeResult};
use crate::params::{BladeParameters, LayerParameters};
use crate::shape::{CamberShape, ThicknessShape};

/// Resolved layer parameters at one span position.
///
/// Produced by [`SpanInterpolator::profile`]; every field is constant along
/// the chord of that span row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerProfile {
    /// Normalized span position r'.
    pub span: f64,
    pub leading_edge_angle: f64,
    pub max_camber: f64,
    pub max_thickness: f64,
    pub camber_shape: f64,
    pub plateau_start: f64,
    pub plateau_end: f64,
    pub thickness_steepness: f64,
    /// Sharpness κ, present when any defining layer sets it.
    pub camber_sharpness: Option<f64>,
    /// Taper, present when any defining layer sets it.
    pub taper: Option<f64>,
    /// Radial placement of the row.
    pub radius: f64,
}

impl LayerProfile {
    /// Validated camber shape of this row.
    pub fn camber(&self) -> BladeResult<CamberShape> {
        CamberShape::new(self.camber_shape, self.camber_sharpness)
    }

    /// Validated thickness shape of this row.
    pub fn thickness(&self) -> BladeResult<ThicknessShape> {
        ThicknessShape::new(
            self.plateau_start,
            self.plateau_end,
            self.thickness_steepness,
            self.taper.unwrap_or(0.0),
        )
    }
}

/// Which optional scalars the defining layers carry.
#[derive(Debug, Clone, Copy)]
struct OptionalFields {
    sharpness: bool,
    taper: bool,
    radius: bool,
}

/// Piecewise-linear interpolation of layer scalars over r' ∈ [0, 1].
///
/// Never extrapolates: queries outside [0, 1] fail with `SpanOutOfRange`.
#[derive(Debug, Clone)]
pub struct SpanInterpolator<'a> {
    layers: &'a [LayerParameters],
    hub_radius: f64,
    shroud_radius: f64,
    optional: OptionalFields,
}

impl<'a> SpanInterpolator<'a> {
    pub fn new(params: &'a BladeParameters) -> Self {
        let layers = params.layers();
        Self {
            layers,
            hub_radius: params.hub_radius(),
            shroud_radius: params.shroud_radius(),
            optional: OptionalFields {
                sharpness: layers.iter().any(|l| l.camber_sharpness.is_some()),
                taper: layers.iter().any(|l| l.taper.is_some()),
                radius: layers.iter().all(|l| l.radius.is_some()),
            },
        }
    }

    /// Defining span positions.
    pub fn spans(&self) -> impl Iterator<Item = f64> + '_ {
        self.layers.iter().map(|l| l.span)
    }

    /// Resolve the layer parameters at `span`.
    ///
    /// A query equal to a defining layer's span returns that layer's values
    /// unchanged.
    pub fn profile(&self, span: f64) -> BladeResult<LayerProfile> {
        if !(0.0..=1.0).contains(&span) {
            return Err(BladeError::SpanOutOfRange { span });
        }

        if let Some(layer) = self.layers.iter().find(|l| l.span == span) {
            return Ok(self.exact(layer));
        }

        // Spans start at 0 and end at 1, so an inexact query has a bracket.
        let upper = self
            .layers
            .partition_point(|l| l.span <= span)
            .clamp(1, self.layers.len() - 1);
        let (lo, hi) = (&self.layers[upper - 1], &self.layers[upper]);
        let t = (span - lo.span) / (hi.span - lo.span);
        trace!(span, lower = lo.span, upper = hi.span, t, "Interpolating layer");

        let mix = |a: f64, b: f64| lerp(a, b, t);
        let mix_opt = |a: Option<f64>, b: Option<f64>, missing: f64| {
            lerp(a.unwrap_or(missing), b.unwrap_or(missing), t)
        };

        Ok(LayerProfile {
            span,
            leading_edge_angle: mix(lo.leading_edge_angle, hi.leading_edge_angle),
            max_camber: mix(lo.max_camber, hi.max_camber),
            max_thickness: mix(lo.max_thickness, hi.max_thickness),
            camber_shape: mix(lo.camber_shape, hi.camber_shape),
            plateau_start: mix(lo.plateau_start, hi.plateau_start),
            plateau_end: mix(lo.plateau_end, hi.plateau_end),
            thickness_steepness: mix(lo.thickness_steepness, hi.thickness_steepness),
            camber_sharpness: self
                .optional
                .sharpness
                .then(|| mix_opt(lo.camber_sharpness, hi.camber_sharpness, 1.0)),
            taper: self
                .optional
                .taper
                .then(|| mix_opt(lo.taper, hi.taper, 0.0)),
            radius: if self.optional.radius {
                mix_opt(lo.radius, hi.radius, self.hub_radius)
            } else {
                self.linear_radius(span)
            },
        })
    }

    fn exact(&self, layer: &LayerParameters) -> LayerProfile {
        LayerProfile {
            span: layer.span,
            leading_edge_angle: layer.leading_edge_angle,
            max_camber: layer.max_camber,
            max_thickness: layer.max_thickness,
            camber_shape: layer.camber_shape,
            plateau_start: layer.plateau_start,
            plateau_end: layer.plateau_end,
            thickness_steepness: layer.thickness_steepness,
            camber_sharpness: self
                .optional
                .sharpness
                .then(|| layer.camber_sharpness.unwrap_or(1.0)),
            taper: self.optional.taper.then(|| layer.taper.unwrap_or(0.0)),
            radius: match layer.radius {
                Some(radius) if self.optional.radius => radius,
                _ => self.linear_radius(layer.span),
            },
        }
    }

    /// Radius from hub (span 0) to shroud (span 1).
    fn linear_radius(&self, span: f64) -> f64 {
        lerp(self.hub_radius, self.shroud_radius, span)
    }
}

/// Linear interpolation kept inside the closed interval spanned by `a` and `b`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (a + t * (b - a)).clamp(a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BladeErrorCode;
    use crate::params::tests::{reference_blade, reference_layers};

    #[test]
    fn test_exact_layer_match() {
        let params = reference_blade();
        let interp = SpanInterpolator::new(&params);
        for layer in params.layers() {
            let profile = interp.profile(layer.span).unwrap();
            assert_eq!(profile.max_camber, layer.max_camber);
            assert_eq!(profile.camber_shape, layer.camber_shape);
            assert_eq!(profile.camber_sharpness, None);
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        let params = reference_blade();
        let interp = SpanInterpolator::new(&params);
        let profile = interp.profile(0.125).unwrap();
        assert!((profile.max_camber - 0.025).abs() < 1e-15);

        let profile = interp.profile(0.875).unwrap();
        assert!((profile.max_camber - 0.015).abs() < 1e-15);
    }

    #[test]
    fn test_out_of_range() {
        let params = reference_blade();
        let interp = SpanInterpolator::new(&params);
        for span in [1.2, -0.01, f64::NAN] {
            let err = interp.profile(span).unwrap_err();
            assert_eq!(err.code(), BladeErrorCode::SpanOutOfRange);
        }
    }

    #[test]
    fn test_radius_defaults_to_hub_shroud_line() {
        let params = reference_blade();
        let interp = SpanInterpolator::new(&params);
        assert_eq!(interp.profile(0.0).unwrap().radius, 0.121);
        assert!((interp.profile(1.0).unwrap().radius - 0.16).abs() < 1e-15);
        assert!((interp.profile(0.5).unwrap().radius - 0.1405).abs() < 1e-15);
    }

    #[test]
    fn test_per_layer_radius() {
        let mut layers = reference_layers();
        for (i, layer) in layers.iter_mut().enumerate() {
            layer.radius = Some(0.13 + 0.005 * i as f64);
        }
        let params = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap();
        let interp = SpanInterpolator::new(&params);
        assert_eq!(interp.profile(0.0).unwrap().radius, 0.13);
        assert!((interp.profile(0.125).unwrap().radius - 0.1325).abs() < 1e-15);
    }

    #[test]
    fn test_partial_kappa_counts_as_one() {
        let mut layers = reference_layers();
        layers[1].camber_sharpness = Some(2.0);
        let params = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap();
        let interp = SpanInterpolator::new(&params);

        assert_eq!(interp.profile(0.0).unwrap().camber_sharpness, Some(1.0));
        assert_eq!(interp.profile(0.25).unwrap().camber_sharpness, Some(2.0));
        assert_eq!(interp.profile(0.375).unwrap().camber_sharpness, Some(1.5));
    }

    #[test]
    fn test_interpolated_values_are_bracketed() {
        let params = reference_blade();
        let interp = SpanInterpolator::new(&params);
        let mut previous = interp.profile(0.25).unwrap().max_camber;
        for i in 1..=100 {
            let span = 0.25 + 0.5 * i as f64 / 100.0;
            let camber = interp.profile(span).unwrap().max_camber;
            assert!((0.02..=0.03).contains(&camber));
            assert!(camber <= previous + 1e-18);
            previous = camber;
        }
    }
}
