//! Blade parameter records.
//!
//! [`BladeParameters`] is the validated input of the whole generator. It is
//! built from a plain [`BladeRecord`] (the serialized form) and rejects any
//! out-of-domain value before sampling starts. Records load from JSON or TOML
//! with camelCase field names:
//!
//! ```json
//! {
//!   "angularSpan": 0.5, "height": 0.3,
//!   "hubRadius": 0.121, "shroudRadius": 0.16,
//!   "layers": [
//!     { "span": 0.0, "leadingEdgeAngle": 0.0, "maxCamber": 0.02,
//!       "maxThickness": 0.01, "camberShape": 0.4, "plateauStart": 0.2,
//!       "plateauEnd": 0.8, "thicknessSteepness": 2.0 },
//!     ...
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BladeError, BladeResult};
use crate::shape::{CamberShape, ThicknessShape};

/// Number of defining spanwise layers in a blade record.
pub const LAYER_COUNT: usize = 5;

/// Scalars every layer must carry.
const REQUIRED_LAYER_SCALARS: usize = 7;

/// One defining spanwise layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LayerParameters {
    /// Normalized span position r' (0 = root, 1 = tip).
    pub span: f64,

    /// Angle θ0 of the leading edge, radians.
    pub leading_edge_angle: f64,

    /// Camber amplitude h_max (axial length, >= 0).
    pub max_camber: f64,

    /// Half-thickness amplitude t_max (axial length, >= 0).
    pub max_thickness: f64,

    /// Camber peak location α in (0, 1).
    pub camber_shape: f64,

    /// Start of the thickness plateau, a.
    pub plateau_start: f64,

    /// End of the thickness plateau, b.
    pub plateau_end: f64,

    /// Thickness ramp exponent β > 0.
    pub thickness_steepness: f64,

    /// Camber sharpness κ > 0 (dual-parameter camber form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camber_sharpness: Option<f64>,

    /// Linear thickness taper toward the trailing edge, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taper: Option<f64>,

    /// Radial placement of this layer (> 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl LayerParameters {
    /// Validated camber shape of this layer.
    pub fn camber(&self) -> BladeResult<CamberShape> {
        CamberShape::new(self.camber_shape, self.camber_sharpness)
    }

    /// Validated thickness shape of this layer.
    pub fn thickness(&self) -> BladeResult<ThicknessShape> {
        ThicknessShape::new(
            self.plateau_start,
            self.plateau_end,
            self.thickness_steepness,
            self.taper.unwrap_or(0.0),
        )
    }

    /// Number of scalar parameters this layer contributes.
    pub fn parameter_count(&self) -> usize {
        REQUIRED_LAYER_SCALARS
            + usize::from(self.camber_sharpness.is_some())
            + usize::from(self.taper.is_some())
            + usize::from(self.radius.is_some())
    }

    fn scalars(&self) -> [(&'static str, f64); 8] {
        [
            ("span", self.span),
            ("leadingEdgeAngle", self.leading_edge_angle),
            ("maxCamber", self.max_camber),
            ("maxThickness", self.max_thickness),
            ("camberShape", self.camber_shape),
            ("plateauStart", self.plateau_start),
            ("plateauEnd", self.plateau_end),
            ("thicknessSteepness", self.thickness_steepness),
        ]
    }

    /// Check one layer in isolation.
    fn validate(&self, index: usize) -> BladeResult<()> {
        let optional = [
            ("camberSharpness", self.camber_sharpness),
            ("taper", self.taper),
            ("radius", self.radius),
        ];
        let present = optional
            .iter()
            .filter_map(|&(name, value)| value.map(|v| (name, v)));
        for (name, value) in self.scalars().into_iter().chain(present) {
            if !value.is_finite() {
                return Err(BladeError::invalid_layer_field(index, name, value, "must be finite"));
            }
        }

        if !(0.0..=1.0).contains(&self.span) {
            return Err(BladeError::invalid_layer_field(
                index,
                "span",
                self.span,
                "must lie in [0, 1]",
            ));
        }
        if self.max_camber < 0.0 {
            return Err(BladeError::invalid_layer_field(
                index,
                "maxCamber",
                self.max_camber,
                "must be >= 0",
            ));
        }
        if self.max_thickness < 0.0 {
            return Err(BladeError::invalid_layer_field(
                index,
                "maxThickness",
                self.max_thickness,
                "must be >= 0",
            ));
        }
        if let Some(radius) = self.radius
            && radius <= 0.0
        {
            return Err(BladeError::invalid_layer_field(index, "radius", radius, "must be > 0"));
        }

        self.camber().and(self.thickness()).map(|_| ()).map_err(|err| match err {
            BladeError::InvalidShapeParameters {
                parameter,
                value,
                reason,
            } => BladeError::InvalidShapeParameters {
                parameter,
                value,
                reason: format!("{} (layer {})", reason, index),
            },
            other => other,
        })
    }
}

/// Serialized form of a blade record, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BladeRecord {
    /// Angular extent Θ of every chord, radians.
    pub angular_span: f64,

    /// Axial extent H of every chord.
    pub height: f64,

    /// Radius of the blade root (span 0).
    pub hub_radius: f64,

    /// Radius of the blade tip (span 1).
    pub shroud_radius: f64,

    /// Axial datum of the leading edge.
    #[serde(default)]
    pub z0: f64,

    /// Defining layers ordered by span.
    pub layers: Vec<LayerParameters>,
}

/// A validated blade parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BladeRecord", into = "BladeRecord")]
pub struct BladeParameters {
    angular_span: f64,
    height: f64,
    hub_radius: f64,
    shroud_radius: f64,
    z0: f64,
    layers: Vec<LayerParameters>,
}

impl BladeParameters {
    /// Validate global fields and layers. The axial datum `z0` starts at 0.
    pub fn new(
        angular_span: f64,
        height: f64,
        hub_radius: f64,
        shroud_radius: f64,
        layers: Vec<LayerParameters>,
    ) -> BladeResult<Self> {
        Self::from_record(BladeRecord {
            angular_span,
            height,
            hub_radius,
            shroud_radius,
            z0: 0.0,
            layers,
        })
    }

    /// Validate a raw record.
    pub fn from_record(record: BladeRecord) -> BladeResult<Self> {
        let positive = [
            ("angularSpan", record.angular_span),
            ("height", record.height),
            ("hubRadius", record.hub_radius),
            ("shroudRadius", record.shroud_radius),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(BladeError::invalid_field(name, value, "must be a finite value > 0"));
            }
        }
        if record.shroud_radius <= record.hub_radius {
            return Err(BladeError::invalid_field(
                "shroudRadius",
                record.shroud_radius,
                format!("must exceed hubRadius ({})", record.hub_radius),
            ));
        }
        if !record.z0.is_finite() {
            return Err(BladeError::invalid_field("z0", record.z0, "must be finite"));
        }

        if record.layers.len() != LAYER_COUNT {
            return Err(BladeError::invalid_field(
                "layers",
                record.layers.len(),
                format!("exactly {} layers are required", LAYER_COUNT),
            ));
        }

        for (index, layer) in record.layers.iter().enumerate() {
            layer.validate(index)?;
        }

        let first = record.layers[0].span;
        let last = record.layers[LAYER_COUNT - 1].span;
        if first != 0.0 {
            return Err(BladeError::invalid_layer_field(
                0,
                "span",
                first,
                "first layer must be at span 0",
            ));
        }
        if last != 1.0 {
            return Err(BladeError::invalid_layer_field(
                LAYER_COUNT - 1,
                "span",
                last,
                "last layer must be at span 1",
            ));
        }
        if let Some(index) = record
            .layers
            .windows(2)
            .position(|pair| pair[1].span <= pair[0].span)
        {
            return Err(BladeError::invalid_layer_field(
                index + 1,
                "span",
                record.layers[index + 1].span,
                "layer spans must be strictly increasing",
            ));
        }

        debug!(
            angular_span = record.angular_span,
            height = record.height,
            layers = record.layers.len(),
            "Validated blade parameters"
        );

        Ok(Self {
            angular_span: record.angular_span,
            height: record.height,
            hub_radius: record.hub_radius,
            shroud_radius: record.shroud_radius,
            z0: record.z0,
            layers: record.layers,
        })
    }

    /// Set the axial datum of the leading edge.
    pub fn with_z0(mut self, z0: f64) -> BladeResult<Self> {
        if !z0.is_finite() {
            return Err(BladeError::invalid_field("z0", z0, "must be finite"));
        }
        self.z0 = z0;
        Ok(self)
    }

    pub fn angular_span(&self) -> f64 {
        self.angular_span
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }

    pub fn shroud_radius(&self) -> f64 {
        self.shroud_radius
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    /// Defining layers, ordered by strictly increasing span.
    pub fn layers(&self) -> &[LayerParameters] {
        &self.layers
    }

    /// Number of free shape parameters: Θ and H plus every layer scalar.
    pub fn parameter_count(&self) -> usize {
        2 + self
            .layers
            .iter()
            .map(LayerParameters::parameter_count)
            .sum::<usize>()
    }

    /// Plain record for serialization.
    pub fn to_record(&self) -> BladeRecord {
        self.clone().into()
    }

    // Serialization

    /// Parse a JSON record.
    pub fn from_json(json: &str) -> BladeResult<Self> {
        let record: BladeRecord = serde_json::from_str(json).map_err(malformed)?;
        Self::from_record(record)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> BladeResult<String> {
        serde_json::to_string_pretty(&self.to_record()).map_err(malformed)
    }

    /// Parse a TOML record.
    pub fn from_toml(toml_str: &str) -> BladeResult<Self> {
        let record: BladeRecord = toml::from_str(toml_str).map_err(malformed)?;
        Self::from_record(record)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> BladeResult<String> {
        toml::to_string_pretty(&self.to_record()).map_err(malformed)
    }

    /// Load a record, picking JSON or TOML by file extension.
    pub fn load(path: impl AsRef<Path>) -> BladeResult<Self> {
        let path = path.as_ref();
        let format = RecordFormat::from_path(path)?;
        let contents =
            std::fs::read_to_string(path).map_err(|e| BladeError::parameter_file(path, e))?;
        let params = match format {
            RecordFormat::Json => Self::from_json(&contents),
            RecordFormat::Toml => Self::from_toml(&contents),
        }?;
        debug!(path = %path.display(), "Loaded blade parameters");
        Ok(params)
    }

    /// Save the record, picking JSON or TOML by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> BladeResult<()> {
        let path = path.as_ref();
        let contents = match RecordFormat::from_path(path)? {
            RecordFormat::Json => self.to_json()?,
            RecordFormat::Toml => self.to_toml()?,
        };
        std::fs::write(path, contents).map_err(|e| BladeError::parameter_file(path, e))
    }
}

impl TryFrom<BladeRecord> for BladeParameters {
    type Error = BladeError;

    fn try_from(record: BladeRecord) -> BladeResult<Self> {
        Self::from_record(record)
    }
}

impl From<BladeParameters> for BladeRecord {
    fn from(params: BladeParameters) -> Self {
        BladeRecord {
            angular_span: params.angular_span,
            height: params.height,
            hub_radius: params.hub_radius,
            shroud_radius: params.shroud_radius,
            z0: params.z0,
            layers: params.layers,
        }
    }
}

/// On-disk encoding of a blade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Toml,
}

impl RecordFormat {
    /// Detect the format from a `.json` or `.toml` extension.
    pub fn from_path(path: &Path) -> BladeResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(RecordFormat::Json),
            Some("toml") => Ok(RecordFormat::Toml),
            _ => Err(BladeError::parameter_file(
                path,
                "unsupported extension (expected .json or .toml)",
            )),
        }
    }
}

/// Schema and syntax errors in a record.
fn malformed(err: impl std::fmt::Display) -> BladeError {
    BladeError::InvalidBladeParameters {
        layer: None,
        field: "record".into(),
        value: "<serialized>".into(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::BladeErrorCode;

    /// Layer used throughout the tests: θ0 = 0, α = 0.4, plateau [0.2, 0.8], β = 2.
    pub(crate) fn layer(span: f64, max_camber: f64) -> LayerParameters {
        LayerParameters {
            span,
            leading_edge_angle: 0.0,
            max_camber,
            max_thickness: 0.01,
            camber_shape: 0.4,
            plateau_start: 0.2,
            plateau_end: 0.8,
            thickness_steepness: 2.0,
            camber_sharpness: None,
            taper: None,
            radius: None,
        }
    }

    pub(crate) fn reference_layers() -> Vec<LayerParameters> {
        [0.0, 0.25, 0.5, 0.75, 1.0]
            .into_iter()
            .zip([0.02, 0.03, 0.03, 0.02, 0.01])
            .map(|(span, camber)| layer(span, camber))
            .collect()
    }

    /// Θ = 0.5, H = 0.3, hub 0.121, shroud 0.16.
    pub(crate) fn reference_blade() -> BladeParameters {
        BladeParameters::new(0.5, 0.3, 0.121, 0.16, reference_layers()).unwrap()
    }

    #[test]
    fn test_reference_blade_is_valid() {
        let params = reference_blade();
        assert_eq!(params.layers().len(), LAYER_COUNT);
        assert_eq!(params.z0(), 0.0);
        assert_eq!(params.parameter_count(), 37);
    }

    #[test]
    fn test_parameter_count_with_kappa() {
        let mut layers = reference_layers();
        for l in &mut layers {
            l.camber_sharpness = Some(1.5);
        }
        let params = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap();
        assert_eq!(params.parameter_count(), 42);
    }

    #[test]
    fn test_invalid_plateau_is_shape_error() {
        let mut layers = reference_layers();
        layers[2].plateau_start = 0.6;
        layers[2].plateau_end = 0.4;
        let err = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidShapeParameters);
        assert!(err.to_string().contains("layer 2"));
    }

    #[test]
    fn test_global_field_errors() {
        let cases = [
            (0.0, 0.3, 0.121, 0.16, "angularSpan"),
            (0.5, -0.3, 0.121, 0.16, "height"),
            (0.5, 0.3, 0.2, 0.16, "shroudRadius"),
            (0.5, 0.3, 0.0, 0.16, "hubRadius"),
        ];
        for (span, height, hub, shroud, field) in cases {
            let err =
                BladeParameters::new(span, height, hub, shroud, reference_layers()).unwrap_err();
            match err {
                BladeError::InvalidBladeParameters { field: f, layer, .. } => {
                    assert_eq!(f, field);
                    assert_eq!(layer, None);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_layer_ordering_errors() {
        let mut layers = reference_layers();
        layers.pop();
        assert!(BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).is_err());

        let mut layers = reference_layers();
        layers[2].span = 0.25;
        let err = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap_err();
        assert_eq!(err.layer(), Some(2));

        let mut layers = reference_layers();
        layers[0].span = 0.1;
        let err = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap_err();
        assert_eq!(err.layer(), Some(0));

        let mut layers = reference_layers();
        layers[3].max_camber = -0.01;
        let err = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap_err();
        assert_eq!(err.layer(), Some(3));

        let mut layers = reference_layers();
        layers[1].max_thickness = f64::NAN;
        assert!(BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).is_err());
    }

    #[test]
    fn test_json_roundtrip_is_exact() {
        let params = reference_blade().with_z0(0.015).unwrap();
        let json = params.to_json().unwrap();
        assert!(json.contains("\"angularSpan\""));
        assert!(!json.contains("camberSharpness"));
        assert_eq!(BladeParameters::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_toml_roundtrip_is_exact() {
        let mut layers = reference_layers();
        layers[4].taper = Some(0.25);
        let params = BladeParameters::new(0.5, 0.3, 0.121, 0.16, layers).unwrap();
        let toml_str = params.to_toml().unwrap();
        assert!(toml_str.contains("[[layers]]"));
        assert_eq!(BladeParameters::from_toml(&toml_str).unwrap(), params);
    }

    #[test]
    fn test_unknown_and_missing_fields_rejected() {
        let json = reference_blade().to_json().unwrap();
        let unknown = json.replacen("\"height\"", "\"heigth\"", 1);
        let err = BladeParameters::from_json(&unknown).unwrap_err();
        assert_eq!(err.code(), BladeErrorCode::InvalidBladeParameters);

        let missing = r#"{ "angularSpan": 0.5, "height": 0.3, "hubRadius": 0.1, "shroudRadius": 0.2 }"#;
        assert_eq!(
            BladeParameters::from_json(missing).unwrap_err().code(),
            BladeErrorCode::InvalidBladeParameters
        );
    }

    #[test]
    fn test_serde_try_from_validates() {
        let mut record = reference_blade().to_record();
        record.height = 0.0;
        let json = serde_json::to_string(&record).unwrap();
        assert!(serde_json::from_str::<BladeParameters>(&json).is_err());
    }

    #[test]
    fn test_record_format_detection() {
        assert_eq!(RecordFormat::from_path(Path::new("a.JSON")).unwrap(), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("a.toml")).unwrap(), RecordFormat::Toml);
        assert_eq!(
            RecordFormat::from_path(Path::new("a.yaml")).unwrap_err().code(),
            BladeErrorCode::ParameterFile
        );
    }
}
