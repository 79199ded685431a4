//! Closed-form camber and thickness shape functions.
//!
//! Both functions take a normalized chordwise coordinate `u ∈ [0, 1]`, vanish
//! at the leading (`u = 0`) and trailing (`u = 1`) edges and peak at exactly 1.
//!
//! Camber comes in the single-parameter Beta form
//!
//! ```text
//! γ(u) = u^α (1-u)^(1-α) / (α^α (1-α)^(1-α))
//! ```
//!
//! and the dual-parameter form `γ_κ(u) = γ(u)^κ`, which is the same curve when
//! `κ = 1` and sharpens (`κ > 1`) or flattens (`κ < 1`) the peak otherwise.
//!
//! Thickness is three-piece: a cosine ramp on `[0, a]`, a plateau of 1 on
//! `(a, b)` and a cosine fall on `[b, 1]`, each ramp raised to the power `β`.
//! An optional linear taper `1 - taper·u` thins the section toward the
//! trailing edge.

use std::f64::consts::PI;

use crate::error::{BladeError, BladeResult};

/// Camber shape: peak location `α` and optional sharpness `κ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CamberShape {
    alpha: f64,
    kappa: Option<f64>,
    log_norm: f64,
}

impl CamberShape {
    /// Validate and build a camber shape.
    ///
    /// Fails with `InvalidShapeParameters` unless `0 < α < 1` and, when
    /// present, `κ > 0`.
    pub fn new(alpha: f64, kappa: Option<f64>) -> BladeResult<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(BladeError::invalid_shape(
                "camberShape",
                alpha,
                "must lie strictly between 0 and 1",
            ));
        }
        if let Some(k) = kappa
            && !(k > 0.0 && k.is_finite())
        {
            return Err(BladeError::invalid_shape(
                "camberSharpness",
                k,
                "must be a finite value > 0",
            ));
        }

        Ok(Self {
            alpha,
            kappa,
            log_norm: alpha * alpha.ln() + (1.0 - alpha) * (1.0 - alpha).ln(),
        })
    }

    /// Single-parameter Beta form (no sharpness).
    pub fn beta(alpha: f64) -> BladeResult<Self> {
        Self::new(alpha, None)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn kappa(&self) -> Option<f64> {
        self.kappa
    }

    /// Exponent applied to the Beta form: `κ`, or 1 without sharpness.
    fn exponent(&self) -> f64 {
        self.kappa.unwrap_or(1.0)
    }

    /// Relative camber `γ(u)` in `[0, 1]`; zero outside the open chord.
    pub fn eval(&self, u: f64) -> f64 {
        if !(u > 0.0 && u < 1.0) {
            return 0.0;
        }
        let a = self.alpha;
        let log_beta = a * u.ln() + (1.0 - a) * (1.0 - u).ln() - self.log_norm;
        (self.exponent() * log_beta).exp().clamp(0.0, 1.0)
    }

    /// `dγ/du` on the open interval `(0, 1)`; `None` at or beyond the edges.
    pub fn derivative(&self, u: f64) -> Option<f64> {
        if !(u > 0.0 && u < 1.0) {
            return None;
        }
        let a = self.alpha;
        Some(self.exponent() * self.eval(u) * (a / u - (1.0 - a) / (1.0 - u)))
    }
}

/// Thickness shape: plateau `[a, b]`, ramp steepness `β`, and taper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThicknessShape {
    plateau_start: f64,
    plateau_end: f64,
    steepness: f64,
    taper: f64,
}

impl ThicknessShape {
    /// Validate and build a thickness shape.
    ///
    /// Requires `0 ≤ a ≤ b ≤ 1`, `β > 0` and `0 ≤ taper ≤ 1`.
    pub fn new(
        plateau_start: f64,
        plateau_end: f64,
        steepness: f64,
        taper: f64,
    ) -> BladeResult<Self> {
        if !(0.0..=1.0).contains(&plateau_start) {
            return Err(BladeError::invalid_shape(
                "plateauStart",
                plateau_start,
                "must lie in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&plateau_end) {
            return Err(BladeError::invalid_shape(
                "plateauEnd",
                plateau_end,
                "must lie in [0, 1]",
            ));
        }
        if plateau_end < plateau_start {
            return Err(BladeError::invalid_shape(
                "plateauEnd",
                plateau_end,
                format!("must not be below plateauStart ({})", plateau_start),
            ));
        }
        if !(steepness > 0.0 && steepness.is_finite()) {
            return Err(BladeError::invalid_shape(
                "thicknessSteepness",
                steepness,
                "must be a finite value > 0",
            ));
        }
        if !(0.0..=1.0).contains(&taper) {
            return Err(BladeError::invalid_shape("taper", taper, "must lie in [0, 1]"));
        }

        Ok(Self {
            plateau_start,
            plateau_end,
            steepness,
            taper,
        })
    }

    /// Untapered thickness shape.
    pub fn untapered(plateau_start: f64, plateau_end: f64, steepness: f64) -> BladeResult<Self> {
        Self::new(plateau_start, plateau_end, steepness, 0.0)
    }

    pub fn plateau_start(&self) -> f64 {
        self.plateau_start
    }

    pub fn plateau_end(&self) -> f64 {
        self.plateau_end
    }

    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    pub fn taper(&self) -> f64 {
        self.taper
    }

    /// Untapered three-piece profile and its derivative at an interior `u`.
    fn base(&self, u: f64) -> (f64, f64) {
        let (a, b, beta) = (self.plateau_start, self.plateau_end, self.steepness);

        // a = 0 skips the rising branch, b = 1 skips the falling one.
        if a > 0.0 && u <= a {
            let phase = PI * u / a;
            let s = 0.5 * (1.0 - phase.cos());
            let ds = 0.5 * PI / a * phase.sin();
            (s.powf(beta), beta * s.powf(beta - 1.0) * ds)
        } else if b < 1.0 && u >= b {
            let phase = PI * (u - b) / (1.0 - b);
            let s = 0.5 * (1.0 + phase.cos());
            let ds = -0.5 * PI / (1.0 - b) * phase.sin();
            (s.powf(beta), beta * s.powf(beta - 1.0) * ds)
        } else {
            (1.0, 0.0)
        }
    }

    /// Relative thickness `τ(u)` in `[0, 1]`; zero outside the open chord.
    pub fn eval(&self, u: f64) -> f64 {
        if !(u > 0.0 && u < 1.0) {
            return 0.0;
        }
        let (tau, _) = self.base(u);
        (tau * (1.0 - self.taper * u)).clamp(0.0, 1.0)
    }

    /// `dτ/du` on the open interval `(0, 1)`; `None` at or beyond the edges.
    pub fn derivative(&self, u: f64) -> Option<f64> {
        if !(u > 0.0 && u < 1.0) {
            return None;
        }
        let (tau, dtau) = self.base(u);
        Some(dtau * (1.0 - self.taper * u) - self.taper * tau)
    }
}
