// -----------------------------------------------------------------------------
// Modules

mod deserialize;
mod print;
mod serialize;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use deserialize::TypeTraitDeserialize;
pub use print::TypeTraitPrint;
pub use serialize::TypeTraitSerialize;
pub use value::TypeTraitValue;
