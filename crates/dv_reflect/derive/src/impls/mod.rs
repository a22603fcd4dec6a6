// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_reflected;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use auto_register::{get_auto_register_impl, impl_auto_register_for};
pub(crate) use trait_reflected::impl_trait_reflected;
pub(crate) use trait_type_path::impl_trait_type_path;
pub(crate) use trait_typed::impl_trait_typed;
