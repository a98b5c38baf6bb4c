//! # Property Graph Model
//!
//! Plain records for the decoded shape of graph results and for the values
//! handed to the fragment primitives.
//!
//! Design rule: this module is pure data — no I/O, no state, no async.

pub mod vertex;
pub mod edge;
pub mod path;
pub mod value;
pub mod property_map;

pub use vertex::{Vertex, GraphId};
pub use edge::{Edge, Direction};
pub use path::Path;
pub use value::Value;
pub use property_map::PropertyMap;
