//! Named image store.
//!
//! The [`Registry`] maps logical names to owned [`Image`]s and orchestrates
//! every transform as *look up source → deep copy → mutate the copy → store
//! under the destination name*. The destination may equal the source, which
//! overwrites it. Names are unique and last write wins; there is no delete.
//!
//! ## Copy semantics
//!
//! The registry never aliases. [`Registry::get_image`] hands out a clone, and
//! transforms mutate a clone before storing it, so nothing a caller does to a
//! returned image can reach the stored one.
//!
//! ## Concurrency
//!
//! `Registry` is a plain owned value for single-threaded use. For shared use,
//! [`SharedRegistry`] wraps it in one global lock so a transform's
//! read-copy-mutate-store sequence is atomic with respect to every other
//! operation.

use crate::command::Command;
use crate::imaging::{
    BackendError, Component, Histogram, Image, ImageBackend, ImageError, RustBackend,
    SepiaOverflow,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown image '{0}'")]
    UnknownImage(String),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

pub struct Registry<B: ImageBackend = RustBackend> {
    images: HashMap<String, Image>,
    backend: B,
    sepia_overflow: SepiaOverflow,
}

impl Registry<RustBackend> {
    /// Empty registry with the default codec backend.
    pub fn new() -> Self {
        Self::with_backend(RustBackend::new())
    }
}

impl Default for Registry<RustBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> Registry<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            images: HashMap::new(),
            backend,
            sepia_overflow: SepiaOverflow::default(),
        }
    }

    pub fn with_sepia_overflow(mut self, policy: SepiaOverflow) -> Self {
        self.sepia_overflow = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // Storage
    // =========================================================================

    /// Decode the file at `path` and store it as `name`.
    pub fn load(&mut self, path: &Path, name: &str) -> Result<()> {
        let image = self.backend.decode(path)?;
        info!(path = %path.display(), name, width = image.width(), height = image.height(), "loaded");
        self.images.insert(name.to_string(), image);
        Ok(())
    }

    /// Load under the file stem of `path` (`photos/ny.ppm` → `ny`), returning the name.
    pub fn load_as_stem(&mut self, path: &Path) -> Result<String> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                BackendError::UnsupportedFormat(format!("cannot derive a name from '{}'", path.display()))
            })?
            .to_string();
        self.load(path, &name)?;
        Ok(name)
    }

    /// Encode the image stored as `name` to `path`.
    pub fn save(&self, path: &Path, name: &str) -> Result<()> {
        let image = self.lookup(name)?;
        self.backend.encode(image, path)?;
        info!(path = %path.display(), name, "saved");
        Ok(())
    }

    /// A deep copy of the image stored as `name`.
    pub fn get_image(&self, name: &str) -> Result<Image> {
        self.lookup(name).cloned()
    }

    /// Store `image` as `name`, replacing any previous entry.
    pub fn put(&mut self, name: &str, image: Image) {
        self.images.insert(name.to_string(), image);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Stored names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn histogram(&self, name: &str) -> Result<Histogram> {
        Ok(self.lookup(name)?.histogram())
    }

    fn lookup(&self, name: &str) -> Result<&Image> {
        self.images
            .get(name)
            .ok_or_else(|| RegistryError::UnknownImage(name.to_string()))
    }

    /// Copy `source`, apply `f` to the copy, store it as `dest`.
    fn transform(&mut self, source: &str, dest: &str, op: &str, f: impl FnOnce(&mut Image)) -> Result<()> {
        let mut copy = self.get_image(source)?;
        f(&mut copy);
        debug!(op, source, dest, "transform applied");
        self.images.insert(dest.to_string(), copy);
        Ok(())
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    pub fn flip_horizontal(&mut self, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "horizontal-flip", Image::flip_horizontal)
    }

    pub fn flip_vertical(&mut self, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "vertical-flip", Image::flip_vertical)
    }

    pub fn brighten(&mut self, delta: i32, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "brighten", |img| img.brighten(delta))
    }

    pub fn component(&mut self, component: Component, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, component.name(), |img| {
            img.extract_component(component)
        })
    }

    pub fn red_component(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Red, source, dest)
    }

    pub fn green_component(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Green, source, dest)
    }

    pub fn blue_component(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Blue, source, dest)
    }

    pub fn intensity(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Intensity, source, dest)
    }

    pub fn luma(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Luma, source, dest)
    }

    pub fn value(&mut self, source: &str, dest: &str) -> Result<()> {
        self.component(Component::Value, source, dest)
    }

    pub fn sepia(&mut self, source: &str, dest: &str) -> Result<()> {
        let policy = self.sepia_overflow;
        self.transform(source, dest, "sepia", |img| img.sepia_with(policy))
    }

    pub fn greyscale(&mut self, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "greyscale", Image::greyscale)
    }

    pub fn blur(&mut self, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "blur", Image::blur)
    }

    pub fn sharpen(&mut self, source: &str, dest: &str) -> Result<()> {
        self.transform(source, dest, "sharpen", Image::sharpen)
    }
}

/// A [`Registry`] behind a single mutex.
///
/// Every call holds the lock for its whole duration, so transforms never
/// interleave. A poisoned lock is recovered: each operation either completes
/// its store or leaves the map untouched.
pub struct SharedRegistry<B: ImageBackend = RustBackend> {
    inner: Mutex<Registry<B>>,
}

impl<B: ImageBackend> SharedRegistry<B> {
    pub fn new(registry: Registry<B>) -> Self {
        Self {
            inner: Mutex::new(registry),
        }
    }

    /// Exclusive access for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Registry<B>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn execute(&self, command: &Command) -> Result<()> {
        command.execute(&mut *self.lock())
    }

    pub fn get_image(&self, name: &str) -> Result<Image> {
        self.lock().get_image(name)
    }

    pub fn put(&self, name: &str, image: Image) {
        self.lock().put(name, image);
    }

    pub fn into_inner(self) -> Registry<B> {
        self.inner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
