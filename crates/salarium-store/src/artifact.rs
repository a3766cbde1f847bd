//! Artifact store: locates, deserializes, and caches models and encoders.
//!
//! Model and encoder artifacts are versioned independently, so neither is
//! assumed to exist until it is asked for. Each artifact is loaded at most
//! once per store and then shared read-only behind an `Arc`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use salarium_core::{
    ArtifactLayout, EncoderBundle, Model, ModelArtifact, ModelKind, ModelRegistry,
};
use tracing::{debug, info};

use crate::StoreError;

/// Process-wide holder for loaded artifacts.
///
/// Construct once at startup and pass by reference. Each model kind has its
/// own slot, so loading one kind never blocks a cache hit on another. A slot
/// lock guards only that kind's check-load-insert step; prediction runs on
/// the returned `Arc` without holding any lock.
pub struct ArtifactStore {
    layout: ArtifactLayout,
    registry: ModelRegistry,
    models: [Mutex<Option<Arc<Model>>>; 3],
    encoders: Mutex<Option<Arc<EncoderBundle>>>,
}

impl ArtifactStore {
    pub fn new(layout: ArtifactLayout) -> Self {
        let registry = ModelRegistry::from_layout(&layout);
        Self {
            layout,
            registry,
            models: ModelKind::ALL.map(|_| Mutex::new(None)),
            encoders: Mutex::new(None),
        }
    }

    /// Store rooted at `root`, using the canonical artifact file names.
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self::new(ArtifactLayout::new(root.as_ref()))
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The selectable models, in selection order.
    pub fn list_models(&self) -> &'static [ModelKind] {
        &ModelKind::ALL
    }

    /// Load (or fetch from cache) the model for `kind`.
    pub fn load_model(&self, kind: ModelKind) -> Result<Arc<Model>, StoreError> {
        let mut slot = lock(&self.models[kind.index()]);
        if let Some(model) = slot.as_ref() {
            debug!(model = %kind, "model cache hit");
            return Ok(Arc::clone(model));
        }

        let path = self.registry.path(kind);
        let text = read_artifact(path)?;
        let artifact =
            ModelArtifact::from_json(&text).map_err(|e| StoreError::corrupt(path, e))?;
        let model = artifact
            .into_model(kind)
            .map_err(|e| StoreError::corrupt(path, e))?;

        info!(model = %kind, path = %path.display(), "loaded model artifact");
        let model = Arc::new(model);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Load a model by its display name or slug.
    pub fn load_model_by_name(&self, name: &str) -> Result<Arc<Model>, StoreError> {
        let kind: ModelKind = name.parse()?;
        self.load_model(kind)
    }

    /// Load (or fetch from cache) the shared encoder bundle.
    pub fn load_encoders(&self) -> Result<Arc<EncoderBundle>, StoreError> {
        let mut cache = lock(&self.encoders);
        if let Some(bundle) = cache.as_ref() {
            debug!("encoder cache hit");
            return Ok(Arc::clone(bundle));
        }

        let path = self.layout.encoders_path();
        let text = read_artifact(&path)?;
        let bundle = EncoderBundle::from_json(&text).map_err(|e| StoreError::corrupt(&path, e))?;

        info!(path = %path.display(), "loaded encoder bundle");
        let bundle = Arc::new(bundle);
        *cache = Some(Arc::clone(&bundle));
        Ok(bundle)
    }

    /// Whether a model is already cached.
    pub fn is_model_cached(&self, kind: ModelKind) -> bool {
        lock(&self.models[kind.index()]).is_some()
    }

    pub fn are_encoders_cached(&self) -> bool {
        lock(&self.encoders).is_some()
    }

    /// Whether the artifact file for `kind` is present on disk.
    pub fn model_available(&self, kind: ModelKind) -> bool {
        self.registry.path(kind).is_file()
    }
}

/// Cached values are never mutated after insert, so a poisoned lock still
/// holds consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_artifact(path: &Path) -> Result<String, StoreError> {
    if !path.exists() {
        return Err(StoreError::ArtifactMissing(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::ArtifactMissing(path.to_path_buf()),
        _ => StoreError::corrupt(path, e),
    })
}
