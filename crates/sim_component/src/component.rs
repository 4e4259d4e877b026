//! Core [`Component`] trait and component type identity.
//!
//! Every value stored in a [`Pool`](crate::Pool) must implement
//! [`Component`]. The trait only asks for `'static` so that pools can be
//! type-erased inside the [`Directory`](crate::Directory); there is no
//! serialisation or thread-safety requirement because the engine is strictly
//! single-threaded and in-process.
//!
//! ## Type identity
//!
//! [`ComponentTypeId`] is a small sequential index assigned by a directory
//! the first time a type is registered, either explicitly at startup or
//! lazily on first touch. IDs are per-directory, so two simulations built
//! from the same declarations assign the same IDs.

/// Sequential identifier of a component type within one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u32);

impl ComponentTypeId {
    /// Returns the ID as an index into the directory's pool list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// The core component trait.
///
/// Components are plain values. A component is attached to at most one
/// entity at a time and is owned by the pool of its type.
///
/// # Examples
///
/// ```rust
/// use sim_component::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: 'static {
    /// A human-readable name for this component type, used in errors and
    /// logs. Defaults to the Rust type path.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
