mod access;
mod index;
mod model;
mod property;
mod relation;

pub use access::*;
pub use index::*;
pub use model::*;
pub use property::*;
pub use relation::*;
