pub mod record;
pub mod schema;

pub use record::{Location, LocationDetail, Record};
pub use schema::{FieldDescriptor, SchemaDocument};
