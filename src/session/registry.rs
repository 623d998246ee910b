use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::session::component::Component;

/// Static metadata of a registered composition.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Composition {
    pub id: &'static str,
    pub canvas: Canvas,
    pub fps: Fps,
    /// Default output length in frames.
    pub duration: u64,
}

impl Composition {
    /// 1920x1080 at 30 fps.
    pub const fn full_hd(id: &'static str, duration: u64) -> Self {
        Self {
            id,
            canvas: Canvas::FULL_HD,
            fps: Fps::integral(30),
            duration,
        }
    }
}

/// Builds a component from optional JSON props.
pub type Factory = fn(Option<&serde_json::Value>) -> ReelResult<Box<dyn Component>>;

/// One registry entry.
#[derive(Clone, Debug)]
pub struct RegistryEntry {
    pub meta: Composition,
    factory: Factory,
}

impl RegistryEntry {
    /// Validate `props` and build the component.
    pub fn instantiate(&self, props: Option<&serde_json::Value>) -> ReelResult<Box<dyn Component>> {
        (self.factory)(props).map_err(|e| match e {
            ReelError::Validation(msg) => {
                ReelError::validation(format!("{}: {msg}", self.meta.id))
            }
            other => other,
        })
    }
}

/// Named compositions available to sessions and the CLI.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every composition shipped with the crate.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        crate::compositions::register_all(&mut reg);
        reg
    }

    /// Add an entry. Ids must be unique.
    pub fn register(&mut self, meta: Composition, factory: Factory) -> ReelResult<()> {
        if meta.duration == 0 {
            return Err(ReelError::validation(format!(
                "composition \"{}\" has zero duration",
                meta.id
            )));
        }
        if self.get(meta.id).is_some() {
            return Err(ReelError::validation(format!(
                "composition \"{}\" is already registered",
                meta.id
            )));
        }
        self.entries.push(RegistryEntry { meta, factory });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.meta.id == id)
    }

    /// Like [`Registry::get`], with an error naming the known ids.
    pub fn lookup(&self, id: &str) -> ReelResult<&RegistryEntry> {
        self.get(id).ok_or_else(|| {
            let known: Vec<&str> = self.entries.iter().map(|e| e.meta.id).collect();
            ReelError::validation(format!(
                "unknown composition \"{id}\" (known: {})",
                known.join(", ")
            ))
        })
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
