use std::collections::HashMap;

use crate::{error::CreateError, message::Message};

type Factory<M> = Box<dyn Fn() -> Box<M> + Send + Sync>;

/// Name → constructor table for one message family.
///
/// Built by an explicit registration pass at startup and then handed to the
/// links that consult it; there is no process-global table. Three
/// independent registries exist because the two ends of a connection send
/// disjoint vocabularies: the frontend consults the reply and event
/// registries, the backend consults the request registry.
pub struct Registry<M: Message + ?Sized> {
    entries: HashMap<&'static str, Factory<M>>,
}

impl<M: Message + ?Sized> Registry<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Associate `name` with `factory`, replacing any prior registration.
    pub fn register<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn() -> Box<M> + Send + Sync + 'static,
    {
        if self.entries.insert(name, Box::new(factory)).is_some() {
            tracing::debug!(command = name, "replaced message factory");
        }
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate the message registered under `name` and parse `args`
    /// into it. Unknown names construct nothing.
    pub fn create(&self, name: &str, args: &[&str]) -> Result<Box<M>, CreateError> {
        let factory = self
            .entries
            .get(name)
            .ok_or_else(|| CreateError::NotFound(name.to_string()))?;
        let mut message = factory();
        message.parse(args)?;
        Ok(message)
    }
}

impl<M: Message + ?Sized> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message + ?Sized> std::fmt::Debug for Registry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort_unstable();
        f.debug_struct("Registry").field("entries", &names).finish()
    }
}
