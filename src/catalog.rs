//! Source catalog and per-stream sync selection.
//!
//! A discovered source exposes a catalog of streams; the console lets the
//! user pick which streams to sync and how. This model is pure state: it
//! parses the discovery payload, enforces the selection rules (incremental
//! only where supported), and assembles the connection-create payload.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// How a stream is read from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FullRefresh,
    Incremental,
}

/// How synced rows land in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationSyncMode {
    Append,
    Overwrite,
    AppendDedup,
}

/// One stream's selection state.
///
/// Fresh selections start unselected, full-refresh, append: the most
/// conservative combination every source supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSelection {
    pub name: String,
    pub supports_incremental: bool,
    pub selected: bool,
    pub sync_mode: SyncMode,
    pub destination_sync_mode: DestinationSyncMode,
}

impl StreamSelection {
    fn new(name: String, supports_incremental: bool) -> Self {
        Self {
            name,
            supports_incremental,
            selected: false,
            sync_mode: SyncMode::FullRefresh,
            destination_sync_mode: DestinationSyncMode::Append,
        }
    }
}

/// The selectable streams of one discovered source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceCatalog {
    streams: Vec<StreamSelection>,
}

impl SourceCatalog {
    /// Parses a schema-discovery payload of the shape
    /// `{"catalog": {"streams": [{"stream": {"name", "supportedSyncModes"}}]}}`.
    pub fn from_discovery(payload: &Value) -> Result<Self, CatalogError> {
        let raw_streams = payload
            .get("catalog")
            .and_then(|catalog| catalog.get("streams"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CatalogError::InvalidDiscovery("missing 'catalog.streams' array".to_string())
            })?;

        let mut streams = Vec::with_capacity(raw_streams.len());
        for raw in raw_streams {
            let stream = raw.get("stream").unwrap_or(raw);
            let name = stream
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    CatalogError::InvalidDiscovery("stream without a name".to_string())
                })?;
            let supports_incremental = stream
                .get("supportedSyncModes")
                .and_then(Value::as_array)
                .is_some_and(|modes| modes.iter().any(|m| m.as_str() == Some("incremental")));
            streams.push(StreamSelection::new(name.to_string(), supports_incremental));
        }

        Ok(Self { streams })
    }

    pub fn streams(&self) -> &[StreamSelection] {
        &self.streams
    }

    /// Marks a stream for syncing (or unmarks it).
    pub fn select(&mut self, name: &str, selected: bool) -> Result<(), CatalogError> {
        self.stream_mut(name)?.selected = selected;
        Ok(())
    }

    /// Switches a stream between incremental and full-refresh reads.
    ///
    /// Rejected for streams whose source does not support incremental sync.
    pub fn set_incremental(&mut self, name: &str, incremental: bool) -> Result<(), CatalogError> {
        let stream = self.stream_mut(name)?;
        if incremental && !stream.supports_incremental {
            return Err(CatalogError::IncrementalUnsupported(name.to_string()));
        }
        stream.sync_mode = if incremental {
            SyncMode::Incremental
        } else {
            SyncMode::FullRefresh
        };
        Ok(())
    }

    pub fn set_destination_sync_mode(
        &mut self,
        name: &str,
        mode: DestinationSyncMode,
    ) -> Result<(), CatalogError> {
        self.stream_mut(name)?.destination_sync_mode = mode;
        Ok(())
    }

    /// Whether at least one stream is marked for syncing. The console keeps
    /// the connect action disabled until this is true.
    pub fn any_selected(&self) -> bool {
        self.streams.iter().any(|stream| stream.selected)
    }

    /// The streams currently marked for syncing.
    pub fn selected(&self) -> impl Iterator<Item = &StreamSelection> {
        self.streams.iter().filter(|stream| stream.selected)
    }

    /// Assembles the connection-create body from the current selection.
    ///
    /// Only selected streams are included; `destinationSchema` is attached
    /// only when given, matching the backend's optional-field contract.
    pub fn connection_payload(
        &self,
        name: &str,
        source_id: &str,
        destination_schema: Option<&str>,
        normalize: bool,
    ) -> Value {
        let mut payload = json!({
            "name": name,
            "sourceId": source_id,
            "streams": self.selected().collect::<Vec<_>>(),
            "normalize": normalize,
        });
        if let (Some(schema), Some(object)) = (destination_schema, payload.as_object_mut()) {
            object.insert("destinationSchema".to_string(), Value::String(schema.to_string()));
        }
        payload
    }

    fn stream_mut(&mut self, name: &str) -> Result<&mut StreamSelection, CatalogError> {
        self.streams
            .iter_mut()
            .find(|stream| stream.name == name)
            .ok_or_else(|| CatalogError::UnknownStream(name.to_string()))
    }
}
