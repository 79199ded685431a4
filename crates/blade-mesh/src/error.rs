//! Error types for mesh operations with rich diagnostics.
//!
//! This module provides error handling with:
//! - Machine-readable error codes for programmatic handling
//! - Rich context (which vertex, which face, what went wrong)
//! - Recovery suggestions for common issues
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `MESH-XXXX`:
//! - `MESH-1xxx`: I/O errors (file reading, writing, parsing)
//! - `MESH-2xxx`: Validation errors (topology, coordinates, degenerate faces)
//! - `MESH-4xxx`: Format errors (unsupported or malformed data)
//!
//! # Example
//!
//! ```rust,ignore
//! use blade_mesh::{MeshError, ErrorCode};
//!
//! let err = MeshError::degenerate_face(12, 0.0);
//! println!("Error code: {}", err.code()); // MESH-2005
//! println!("Recovery: {}", err.recovery_suggestion());
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes for mesh operations.
///
/// Codes follow the pattern `MESH-XXXX` where:
/// - 1xxx = I/O errors
/// - 2xxx = Validation errors
/// - 4xxx = Format errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// MESH-1001: Failed to read file
    IoRead = 1001,
    /// MESH-1002: Failed to write file
    IoWrite = 1002,
    /// MESH-1003: Failed to parse file format
    ParseError = 1003,

    // Validation errors (2xxx)
    /// MESH-2001: Face references invalid vertex index
    InvalidVertexIndex = 2001,
    /// MESH-2002: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 2002,
    /// MESH-2003: Mesh has no vertices or faces
    EmptyMesh = 2003,
    /// MESH-2004: Invalid mesh topology (open, non-manifold, mixed winding)
    InvalidTopology = 2004,
    /// MESH-2005: Zero-area face or coincident points
    DegenerateMesh = 2005,

    // Format errors (4xxx)
    /// MESH-4001: Unsupported file format
    UnsupportedFormat = 4001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "MESH-1001",
            ErrorCode::IoWrite => "MESH-1002",
            ErrorCode::ParseError => "MESH-1003",
            ErrorCode::InvalidVertexIndex => "MESH-2001",
            ErrorCode::InvalidCoordinate => "MESH-2002",
            ErrorCode::EmptyMesh => "MESH-2003",
            ErrorCode::InvalidTopology => "MESH-2004",
            ErrorCode::DegenerateMesh => "MESH-2005",
            ErrorCode::UnsupportedFormat => "MESH-4001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Check the input that produced the mesh.
    CheckSource { checks: Vec<String> },
    /// Use a different file format.
    UseDifferentFormat { suggested: Vec<String> },
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::CheckSource { checks } => {
                write!(f, "Check the source for: {}", checks.join(", "))
            }
            RecoverySuggestion::UseDifferentFormat { suggested } => {
                write!(f, "Try using a different format: {}", suggested.join(", "))
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::None => {
                write!(f, "No automatic recovery available")
            }
        }
    }
}

/// Location information for mesh errors.
#[derive(Debug, Clone)]
pub enum MeshLocation {
    /// Error at a specific vertex.
    Vertex { index: usize },
    /// Error at a specific face.
    Face { index: usize },
    /// Error in a file.
    File { path: PathBuf },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Vertex { index } => write!(f, "vertex {}", index),
            MeshLocation::Face { index } => write!(f, "face {}", index),
            MeshLocation::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Errors that can occur during mesh operations.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}")]
    #[diagnostic(
        code(mesh::io::read),
        help("Check that the file exists and is readable")
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}")]
    #[diagnostic(
        code(mesh::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing mesh file format.
    #[error("failed to parse mesh from {path}: {details}")]
    #[diagnostic(code(mesh::parse::error))]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    #[diagnostic(code(mesh::format::unsupported), help("Supported formats: STL, OBJ, VTK"))]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices or faces).
    #[error("mesh is empty: {details}")]
    #[diagnostic(code(mesh::validation::empty))]
    EmptyMesh { details: String },

    /// Invalid mesh topology.
    #[error("invalid mesh topology: {details}")]
    #[diagnostic(
        code(mesh::validation::topology),
        help("Every edge of a closed solid must be shared by exactly two faces with opposite direction")
    )]
    InvalidTopology { details: String },

    /// Zero-area face or coincident points.
    #[error("degenerate mesh: {details}")]
    #[diagnostic(
        code(mesh::validation::degenerate),
        help("Coincident sample points usually mean two sampled rows or stations collapsed onto each other")
    )]
    DegenerateMesh {
        face_index: Option<usize>,
        details: String,
    },

    /// Invalid vertex index in face data.
    #[error(
        "invalid vertex index: face {face_index} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(code(mesh::validation::vertex_index))]
    InvalidVertexIndex {
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(mesh::validation::coordinate),
        help("Non-finite coordinates come from non-finite inputs or overflowing shape exponents")
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::IoRead { .. } => ErrorCode::IoRead,
            MeshError::IoWrite { .. } => ErrorCode::IoWrite,
            MeshError::ParseError { .. } => ErrorCode::ParseError,
            MeshError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::InvalidTopology { .. } => ErrorCode::InvalidTopology,
            MeshError::DegenerateMesh { .. } => ErrorCode::DegenerateMesh,
            MeshError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            MeshError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::IoRead { .. } => RecoverySuggestion::CheckSource {
                checks: vec!["file exists".into(), "file permissions".into()],
            },
            MeshError::IoWrite { .. } => RecoverySuggestion::CheckSource {
                checks: vec!["directory exists".into(), "write permissions".into()],
            },
            MeshError::ParseError { .. } => RecoverySuggestion::CheckSource {
                checks: vec!["file is a binary or ASCII STL".into()],
            },
            MeshError::UnsupportedFormat { .. } => RecoverySuggestion::UseDifferentFormat {
                suggested: vec!["STL".into(), "OBJ".into(), "VTK".into()],
            },
            MeshError::EmptyMesh { .. } => RecoverySuggestion::CheckSource {
                checks: vec!["sample counts".into()],
            },
            MeshError::InvalidTopology { .. } => RecoverySuggestion::None,
            MeshError::DegenerateMesh { .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![
                    ("maxThickness".into(), "use a positive value on every layer".into()),
                    ("span samples".into(), "avoid duplicate span rows".into()),
                ],
            },
            MeshError::InvalidVertexIndex { .. } => RecoverySuggestion::None,
            MeshError::InvalidCoordinate { .. } => RecoverySuggestion::CheckSource {
                checks: vec!["finite input parameters".into()],
            },
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::InvalidVertexIndex { face_index, .. } => {
                Some(MeshLocation::Face { index: *face_index })
            }
            MeshError::DegenerateMesh {
                face_index: Some(index),
                ..
            } => Some(MeshLocation::Face { index: *index }),
            MeshError::InvalidCoordinate { vertex_index, .. } => Some(MeshLocation::Vertex {
                index: *vertex_index,
            }),
            MeshError::ParseError { path, .. }
            | MeshError::IoRead { path, .. }
            | MeshError::IoWrite { path, .. } => Some(MeshLocation::File { path: path.clone() }),
            _ => None,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MeshError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an InvalidTopology error.
    pub fn invalid_topology(details: impl Into<String>) -> Self {
        MeshError::InvalidTopology {
            details: details.into(),
        }
    }

    /// Create a DegenerateMesh error for a collapsed face.
    pub fn degenerate_face(face_index: usize, area: f64) -> Self {
        MeshError::DegenerateMesh {
            face_index: Some(face_index),
            details: format!("face {} is collapsed (area {:.2e})", face_index, area),
        }
    }

    /// Create a DegenerateMesh error without a face location.
    pub fn degenerate(details: impl Into<String>) -> Self {
        MeshError::DegenerateMesh {
            face_index: None,
            details: details.into(),
        }
    }
}

/// Validation issues that can be collected during mesh validation.
///
/// Unlike `MeshError`, these are collected without stopping validation.
#[derive(Debug, Clone)]
pub enum ValidationIssue {
    /// Collapsed face (coincident or collinear corners).
    DegenerateFace { face_index: usize, area: f64 },
    /// Edge used by only one face.
    BoundaryEdge { vertex_a: u32, vertex_b: u32 },
    /// Edge shared by more than 2 faces.
    NonManifoldEdge {
        vertex_a: u32,
        vertex_b: u32,
        face_count: usize,
    },
    /// Two faces traverse a shared edge in the same direction.
    InconsistentWinding { vertex_a: u32, vertex_b: u32 },
}

impl ValidationIssue {
    /// Returns a severity level for the issue.
    pub fn severity(&self) -> IssueSeverity {
        match self {
            ValidationIssue::DegenerateFace { .. } => IssueSeverity::Error,
            ValidationIssue::BoundaryEdge { .. } => IssueSeverity::Warning,
            ValidationIssue::NonManifoldEdge { .. } => IssueSeverity::Error,
            ValidationIssue::InconsistentWinding { .. } => IssueSeverity::Error,
        }
    }

    /// Returns an error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::DegenerateFace { .. } => "MESH-2005",
            ValidationIssue::BoundaryEdge { .. } => "MESH-2006",
            ValidationIssue::NonManifoldEdge { .. } => "MESH-2007",
            ValidationIssue::InconsistentWinding { .. } => "MESH-2008",
        }
    }
}

/// Severity levels for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Informational, no action needed.
    Info,
    /// Warning, mesh may have issues.
    Warning,
    /// Error, mesh is invalid.
    Error,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::DegenerateFace { face_index, area } => {
                write!(f, "face {} is degenerate (area: {:.2e})", face_index, area)
            }
            ValidationIssue::BoundaryEdge { vertex_a, vertex_b } => {
                write!(f, "edge ({}, {}) is a boundary edge", vertex_a, vertex_b)
            }
            ValidationIssue::NonManifoldEdge {
                vertex_a,
                vertex_b,
                face_count,
            } => {
                write!(
                    f,
                    "edge ({}, {}) is non-manifold (shared by {} faces)",
                    vertex_a, vertex_b, face_count
                )
            }
            ValidationIssue::InconsistentWinding { vertex_a, vertex_b } => {
                write!(
                    f,
                    "edge ({}, {}) is traversed in the same direction by both faces",
                    vertex_a, vertex_b
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MeshError::degenerate_face(5, 0.0);
        assert_eq!(err.code(), ErrorCode::DegenerateMesh);
        assert_eq!(err.code().as_str(), "MESH-2005");
    }

    #[test]
    fn test_location_info() {
        let err = MeshError::degenerate_face(7, 0.0);
        match err.location() {
            Some(MeshLocation::Face { index }) => assert_eq!(index, 7),
            other => panic!("Expected Face location, got {:?}", other),
        }

        assert!(MeshError::degenerate("mean edge length is zero").location().is_none());
    }

    #[test]
    fn test_recovery_suggestion_display() {
        let err = MeshError::degenerate_face(0, 0.0);
        let text = err.recovery_suggestion().to_string();
        assert!(text.contains("maxThickness"));
    }

    #[test]
    fn test_validation_issue_severity() {
        let issue = ValidationIssue::BoundaryEdge {
            vertex_a: 0,
            vertex_b: 1,
        };
        assert_eq!(issue.severity(), IssueSeverity::Warning);

        let issue = ValidationIssue::InconsistentWinding {
            vertex_a: 0,
            vertex_b: 1,
        };
        assert_eq!(issue.severity(), IssueSeverity::Error);
        assert_eq!(issue.code(), "MESH-2008");
    }

    #[test]
    fn test_error_display() {
        let err = MeshError::InvalidVertexIndex {
            face_index: 5,
            vertex_index: 100,
            vertex_count: 50,
        };
        let display = format!("{}", err);
        assert!(display.contains("face 5"));
        assert!(display.contains("vertex 100"));
        assert!(display.contains("50 vertices"));
    }
}
