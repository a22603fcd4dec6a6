#![doc = include_str!("../README.md")]
#![no_std]

// -----------------------------------------------------------------------------
// Switch macros

/// Expands its input unchanged.
///
/// This is the expansion of an alias whose `cfg` predicate holds.
/// See [`define_alias`] for the accepted forms.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($p)* } };
    ($($p:tt)*) => { $($p)* };
}

/// Swallows its input.
///
/// This is the expansion of an alias whose `cfg` predicate does not hold.
/// See [`define_alias`] for the accepted forms.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($n)* } };
    ($($p:tt)*) => {};
}

/// Defines a set of macro aliases that expand or vanish according to a `cfg` predicate.
///
/// Every alias accepts three forms:
///
/// - `alias!()` evaluates to `true` or `false`.
/// - `alias! { items... }` keeps or drops the tokens.
/// - `alias! { if { .. } else { .. } }` picks one of the two blocks.
///
/// # Examples
///
/// ```
/// mod cfg {
///     dv_cfg::define_alias! {
///         #[cfg(debug_assertions)] => debug,
///         #[cfg(any())] => never,
///     }
/// }
///
/// assert_eq!(cfg::debug!(), cfg!(debug_assertions));
/// assert!(!cfg::never!());
///
/// let value = cfg::never! {
///     if { 1 } else { 2 }
/// };
/// assert_eq!(value, 2);
///
/// cfg::never! {
///     compile_error!("dropped");
/// }
/// ```
#[macro_export]
macro_rules! define_alias {
    ($( #[cfg($meta:meta)] => $alias:ident ),* $(,)?) => {
        $(
            #[cfg($meta)]
            #[doc(inline)]
            pub use $crate::enabled as $alias;

            #[cfg(not($meta))]
            #[doc(inline)]
            pub use $crate::disabled as $alias;
        )*
    };
}
