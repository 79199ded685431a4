// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler. This is a false positive in newer Rust versions.
#![allow(unused_assignments)]

//! Error types for blade geometry with rich diagnostics.
//!
//! Every error carries enough context (layer index, field name, sample
//! coordinate) to diagnose a failure without re-running the generator.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for blade geometry operations.
pub type BladeResult<T> = Result<T, BladeError>;

/// Machine-readable error codes for blade geometry.
///
/// Codes follow the pattern `BLADE-XXXX` where:
/// - 1xxx = Input validation errors
/// - 2xxx = Sampling errors
/// - 3xxx = Solid and assembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BladeErrorCode {
    /// BLADE-1001: Malformed or out-of-domain blade record
    InvalidBladeParameters = 1001,
    /// BLADE-1002: Shape function parameters out of domain
    InvalidShapeParameters = 1002,
    /// BLADE-1003: Parameter file could not be read or parsed
    ParameterFile = 1003,

    /// BLADE-2001: Span query outside [0, 1]
    SpanOutOfRange = 2001,
    /// BLADE-2002: Upper and lower surfaces cross or touch
    DegenerateSurface = 2002,

    /// BLADE-3001: Zero-area or duplicate-point faces
    DegenerateMesh = 3001,
    /// BLADE-3002: Inconsistent assembly layout
    InvalidAssembly = 3002,
    /// BLADE-3003: Underlying mesh operation failed
    Mesh = 3003,
}

impl BladeErrorCode {
    /// Returns the error code as a string in the format `BLADE-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BladeErrorCode::InvalidBladeParameters => "BLADE-1001",
            BladeErrorCode::InvalidShapeParameters => "BLADE-1002",
            BladeErrorCode::ParameterFile => "BLADE-1003",
            BladeErrorCode::SpanOutOfRange => "BLADE-2001",
            BladeErrorCode::DegenerateSurface => "BLADE-2002",
            BladeErrorCode::DegenerateMesh => "BLADE-3001",
            BladeErrorCode::InvalidAssembly => "BLADE-3002",
            BladeErrorCode::Mesh => "BLADE-3003",
        }
    }
}

impl std::fmt::Display for BladeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for blade errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BladeRecoverySuggestion {
    /// Change one named input.
    FixParameter { field: String, hint: String },
    /// Increase local thickness.
    IncreaseThickness { span: f64 },
    /// Use a span position inside [0, 1].
    ClampSpan { suggested: f64 },
    /// Enlarge the hub section or reduce the blade height.
    EnlargeHubSection { required: f64 },
    /// No specific suggestion.
    None,
}

impl std::fmt::Display for BladeRecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BladeRecoverySuggestion::FixParameter { field, hint } => {
                write!(f, "Fix `{}`: {}", field, hint)
            }
            BladeRecoverySuggestion::IncreaseThickness { span } => {
                write!(
                    f,
                    "Increase maxThickness near span {:.4} or move the plateau bounds inward",
                    span
                )
            }
            BladeRecoverySuggestion::ClampSpan { suggested } => {
                write!(f, "Query a span position in [0, 1], e.g. {:.4}", suggested)
            }
            BladeRecoverySuggestion::EnlargeHubSection { required } => {
                write!(f, "Use a hub section at least {:.6} long", required)
            }
            BladeRecoverySuggestion::None => {
                write!(f, "No specific suggestion available")
            }
        }
    }
}

/// Errors that can occur while generating blades and assemblies.
#[derive(Debug, Error, Diagnostic)]
pub enum BladeError {
    /// A blade record field is missing, malformed or out of range.
    #[error(
        "invalid blade parameters: {field} = {value} ({reason}){}",
        .layer.map(|l| format!(" at layer {}", l)).unwrap_or_default()
    )]
    #[diagnostic(
        code(blade::params::invalid),
        help("Blade records need angularSpan > 0, height > 0, 0 < hubRadius < shroudRadius and exactly 5 layers with span 0, increasing, ending at 1")
    )]
    InvalidBladeParameters {
        layer: Option<usize>,
        field: String,
        value: String,
        reason: String,
    },

    /// A camber or thickness shape parameter is outside its domain.
    #[error("invalid shape parameter {parameter} = {value}: {reason}")]
    #[diagnostic(
        code(blade::shape::invalid),
        help("Shape parameters need 0 < camberShape < 1, 0 <= plateauStart <= plateauEnd <= 1, thicknessSteepness > 0, camberSharpness > 0")
    )]
    InvalidShapeParameters {
        parameter: &'static str,
        value: f64,
        reason: String,
    },

    /// A span query fell outside [0, 1].
    #[error("span position {span} is outside [0, 1]")]
    #[diagnostic(
        code(blade::span::out_of_range),
        help("Span interpolation never extrapolates beyond the root and tip layers")
    )]
    SpanOutOfRange { span: f64 },

    /// Upper and lower surfaces touch or cross inside the chord.
    #[error(
        "degenerate surface at span row {span_index}, chord station {chord_index} (u = {u}): upper z {upper} <= lower z {lower}"
    )]
    #[diagnostic(
        code(blade::surface::degenerate),
        help("Net thickness must be positive strictly inside the chord")
    )]
    DegenerateSurface {
        span_index: usize,
        chord_index: usize,
        u: f64,
        upper: f64,
        lower: f64,
    },

    /// The triangulated surface has collapsed faces or zero edge length.
    #[error("degenerate blade mesh: {details}")]
    #[diagnostic(
        code(blade::mesh::degenerate),
        help("Coincident sample points usually mean duplicated span rows or chord stations")
    )]
    DegenerateMesh {
        face_index: Option<usize>,
        details: String,
    },

    /// The pump layout is inconsistent.
    #[error("invalid assembly: {details}")]
    #[diagnostic(code(blade::assembly::invalid))]
    InvalidAssembly { details: String },

    /// A parameter file could not be read, parsed or written.
    #[error("parameter file {path}: {details}")]
    #[diagnostic(
        code(blade::params::file),
        help("Parameter files are JSON (.json) or TOML (.toml) with camelCase field names")
    )]
    ParameterFile { path: PathBuf, details: String },

    /// Underlying mesh error.
    #[error("mesh operation failed: {0}")]
    #[diagnostic(code(blade::mesh::error))]
    Mesh(#[from] blade_mesh::MeshError),
}

impl BladeError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> BladeErrorCode {
        match self {
            BladeError::InvalidBladeParameters { .. } => BladeErrorCode::InvalidBladeParameters,
            BladeError::InvalidShapeParameters { .. } => BladeErrorCode::InvalidShapeParameters,
            BladeError::SpanOutOfRange { .. } => BladeErrorCode::SpanOutOfRange,
            BladeError::DegenerateSurface { .. } => BladeErrorCode::DegenerateSurface,
            BladeError::DegenerateMesh { .. } => BladeErrorCode::DegenerateMesh,
            BladeError::InvalidAssembly { .. } => BladeErrorCode::InvalidAssembly,
            BladeError::ParameterFile { .. } => BladeErrorCode::ParameterFile,
            BladeError::Mesh(_) => BladeErrorCode::Mesh,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> BladeRecoverySuggestion {
        match self {
            BladeError::InvalidBladeParameters { field, reason, .. } => {
                BladeRecoverySuggestion::FixParameter {
                    field: field.clone(),
                    hint: reason.clone(),
                }
            }
            BladeError::InvalidShapeParameters {
                parameter, reason, ..
            } => BladeRecoverySuggestion::FixParameter {
                field: (*parameter).to_string(),
                hint: reason.clone(),
            },
            BladeError::SpanOutOfRange { span } => BladeRecoverySuggestion::ClampSpan {
                suggested: if span.is_nan() { 0.0 } else { span.clamp(0.0, 1.0) },
            },
            BladeError::DegenerateSurface { u, .. } => {
                BladeRecoverySuggestion::IncreaseThickness { span: *u }
            }
            BladeError::DegenerateMesh { .. } => BladeRecoverySuggestion::FixParameter {
                field: "span_samples".into(),
                hint: "avoid duplicate span rows and zero-length chords".into(),
            },
            BladeError::InvalidAssembly { .. } => BladeRecoverySuggestion::None,
            BladeError::ParameterFile { .. } => BladeRecoverySuggestion::FixParameter {
                field: "file".into(),
                hint: "use a .json or .toml file with the documented fields".into(),
            },
            BladeError::Mesh(_) => BladeRecoverySuggestion::None,
        }
    }

    /// Offending layer index, if the error is tied to one.
    pub fn layer(&self) -> Option<usize> {
        match self {
            BladeError::InvalidBladeParameters { layer, .. } => *layer,
            _ => None,
        }
    }

    // Constructor helpers

    /// Create an InvalidBladeParameters error for a global field.
    pub fn invalid_field(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        BladeError::InvalidBladeParameters {
            layer: None,
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidBladeParameters error for a layer field.
    pub fn invalid_layer_field(
        layer: usize,
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        BladeError::InvalidBladeParameters {
            layer: Some(layer),
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidShapeParameters error.
    pub fn invalid_shape(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        BladeError::InvalidShapeParameters {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    /// Create an InvalidAssembly error.
    pub fn invalid_assembly(details: impl Into<String>) -> Self {
        BladeError::InvalidAssembly {
            details: details.into(),
        }
    }

    /// Create a ParameterFile error.
    pub fn parameter_file(path: impl Into<PathBuf>, details: impl ToString) -> Self {
        BladeError::ParameterFile {
            path: path.into(),
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BladeError::SpanOutOfRange { span: 1.2 };
        assert_eq!(err.code(), BladeErrorCode::SpanOutOfRange);
        assert_eq!(err.code().as_str(), "BLADE-2001");
    }

    #[test]
    fn test_span_suggestion_clamps() {
        let err = BladeError::SpanOutOfRange { span: 1.2 };
        assert_eq!(
            err.recovery_suggestion(),
            BladeRecoverySuggestion::ClampSpan { suggested: 1.0 }
        );
    }

    #[test]
    fn test_layer_context_in_display() {
        let err = BladeError::invalid_layer_field(3, "maxCamber", -0.1, "must be >= 0");
        let display = err.to_string();
        assert!(display.contains("maxCamber"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("layer 3"));
        assert_eq!(err.layer(), Some(3));

        let global = BladeError::invalid_field("height", 0.0, "must be > 0");
        assert!(!global.to_string().contains("layer"));
        assert_eq!(global.layer(), None);
    }

    #[test]
    fn test_from_mesh_error() {
        let mesh_err = blade_mesh::MeshError::empty_mesh("test");
        let err: BladeError = mesh_err.into();
        assert!(matches!(err, BladeError::Mesh(_)));
        assert_eq!(err.code(), BladeErrorCode::Mesh);
    }
}
