use super::spec::FieldSpec;
use crate::error::ArtifactError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A compiled connector form, ready to be cached on disk so the same
/// specification does not have to be re-fetched and re-compiled on every
/// console load.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CompiledForm {
    /// The connector definition this form was compiled from.
    pub connector: String,
    /// The base path the compiler was rooted at, usually `config`.
    pub base_path: String,
    pub fields: Vec<FieldSpec>,
}

impl CompiledForm {
    pub fn new(connector: impl Into<String>, base_path: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            connector: connector.into(),
            base_path: base_path.into(),
            fields,
        }
    }

    /// Serializes the compiled form into the bincode wire format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        encode_to_vec(self, standard()).map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Saves the compiled form to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Loads a compiled form from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a compiled form from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(form, _)| form) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }
}
