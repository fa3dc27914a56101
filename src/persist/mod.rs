pub mod conversion;
pub mod definition;
pub mod serializer;

pub use conversion::*;
pub use definition::*;
pub use serializer::*;
