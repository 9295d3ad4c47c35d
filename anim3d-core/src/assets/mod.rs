//! Loading model meshes from disk.
//!
//! Supported formats are picked by file extension: `.stl` (binary or ASCII)
//! and `.obj` (Wavefront, geometry only).

use std::path::{Path, PathBuf};

use crate::geometry::Mesh;

pub mod obj;
pub mod stl;

pub type AssetResult<T> = Result<T, AssetLoadError>;

/// Why a model file could not be turned into meshes.
#[derive(thiserror::Error, Debug)]
pub enum AssetLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed {format} data: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("{0} contains no triangles")]
    Empty(String),
}

impl AssetLoadError {
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }
}

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Stl,
    Obj,
}

impl ModelFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> AssetResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "stl" => Ok(Self::Stl),
            "obj" => Ok(Self::Obj),
            _ => Err(AssetLoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a model file into its sub-meshes.
pub fn load_meshes(path: &Path) -> AssetResult<Vec<Mesh>> {
    let format = ModelFormat::from_path(path)?;
    let data = std::fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");

    let meshes = parse_meshes(format, &data, stem)?;
    let triangles: usize = meshes.iter().map(|m| m.triangles.len()).sum();
    log::info!(
        "loaded {} ({} meshes, {} triangles)",
        path.display(),
        meshes.len(),
        triangles
    );
    Ok(meshes)
}

/// Parse in-memory model data. `name` labels the meshes and error messages.
pub fn parse_meshes(format: ModelFormat, data: &[u8], name: &str) -> AssetResult<Vec<Mesh>> {
    let meshes = match format {
        ModelFormat::Stl => {
            let mut mesh = stl::parse_stl(data)?;
            mesh.name = name.to_string();
            vec![mesh]
        }
        ModelFormat::Obj => {
            let text = std::str::from_utf8(data)
                .map_err(|e| AssetLoadError::parse("OBJ", e.to_string()))?;
            obj::parse_obj(text, name)?
        }
    };

    if meshes.iter().all(Mesh::is_empty) {
        return Err(AssetLoadError::Empty(name.to_string()));
    }
    Ok(meshes)
}
