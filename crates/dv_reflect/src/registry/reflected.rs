use crate::info::Typed;
use crate::registry::{RegistrationError, TypeDb};

/// A type that knows how to register its own reflection.
///
/// Usually derived with [`#[derive(Reflected)]`](crate::derive::Reflected),
/// or written by hand with a [`ReflectionRegistrator`]:
///
/// ```
/// use dv_reflect::prelude::*;
/// use dv_reflect::RegistrationError;
///
/// #[derive(Typed, Clone, Default)]
/// struct Timer {
///     elapsed: f64,
///     paused: bool,
/// }
///
/// impl Timer {
///     fn is_running(&self) -> bool {
///         !self.paused
///     }
/// }
///
/// impl Reflected for Timer {
///     fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError> {
///         ReflectionRegistrator::<Self>::begin(db)
///             .default_constructor()
///             .field("elapsed", |t| &t.elapsed, |t| &mut t.elapsed)
///             .meta(m::ReadOnly)
///             .field("paused", |t| &t.paused, |t| &mut t.paused)
///             .method("is_running", Timer::is_running)
///             .end()?;
///         db.register::<f64>()?;
///         db.register::<bool>()
///     }
/// }
///
/// let mut db = TypeDb::empty();
/// db.register::<Timer>().unwrap();
/// assert!(db.get::<f64>().unwrap().is_complete());
/// ```
///
/// [`ReflectionRegistrator`]: crate::ReflectionRegistrator
pub trait Reflected: Typed + Send + Sync {
    /// Commits the reflection of `Self` and of the types it depends on.
    ///
    /// Dependencies are registered after `Self`, so recursive types
    /// terminate.
    fn register_reflection(db: &mut TypeDb) -> Result<(), RegistrationError>;
}
