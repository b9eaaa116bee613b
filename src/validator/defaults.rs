//! Défauts partagés par tout le processus.
//!
//! Lecture sans verrou (chargement atomique d'un `Arc`) ; écriture = échange
//! atomique du snapshot complet. Un snapshot lu n'est jamais modifié en place.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use super::types::ValidationOptions;

#[derive(Debug, Default)]
pub struct SharedDefaults {
    current: ArcSwap<ValidationOptions>,
}

impl SharedDefaults {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            current: ArcSwap::from_pointee(options),
        }
    }

    pub fn load(&self) -> Arc<ValidationOptions> {
        self.current.load_full()
    }

    /// Replaces the snapshot, returning the previous one.
    pub fn store(&self, options: ValidationOptions) -> Arc<ValidationOptions> {
        let next = Arc::new(options);
        #[cfg(feature = "with-tracing")]
        tracing::info!(defaults = ?next, "validation defaults replaced");
        self.current.swap(next)
    }

    /// Merges `overrides` onto the current snapshot and installs the result.
    pub fn update(&self, overrides: &ValidationOptions) -> Arc<ValidationOptions> {
        let mut installed = None;
        // rcu rejoue la fusion si un autre écrivain passe entre-temps
        self.current.rcu(|current| {
            let next = Arc::new(current.merge(overrides));
            installed = Some(Arc::clone(&next));
            next
        });
        let next = installed.unwrap_or_else(|| self.current.load_full());
        #[cfg(feature = "with-tracing")]
        tracing::info!(defaults = ?next, "validation defaults updated");
        next
    }
}

static GLOBAL: LazyLock<SharedDefaults> = LazyLock::new(SharedDefaults::default);

pub fn defaults() -> Arc<ValidationOptions> {
    GLOBAL.load()
}

pub fn set_defaults(options: ValidationOptions) -> Arc<ValidationOptions> {
    GLOBAL.store(options)
}

/// Active le mode strict pour tous les appels qui ne le surchargent pas.
pub fn enable_strict_mode() -> Arc<ValidationOptions> {
    GLOBAL.update(&ValidationOptions::strict())
}

pub fn reset_defaults() -> Arc<ValidationOptions> {
    GLOBAL.store(ValidationOptions::default())
}
