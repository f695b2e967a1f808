//! Structural view of the compiled classes being patched
//!
//! The loading stage turns compiled classes into a [`UnitGraph`]: one [`ClassUnit`] per class, each
//! owning its [`MethodUnit`]s in declaration order. Nothing here is mutated once classification
//! starts.
//!
//! ```
//! use autopatch::model::*;
//!
//! # fn build() -> Result<(), Error> {
//! let arenas = UnitGraphArenas::new();
//! let graph = UnitGraph::new(&arenas);
//! graph.add_annotation_type(ClassName::ADD_ANNOTATION);
//!
//! let class = graph.add_class(ClassUnit::new(
//!     ClassName::from_string(String::from("com.app.Bar")).map_err(Error::MalformedName)?,
//!     vec![],
//! ))?;
//! let method = graph.add_method(MethodUnit::new(
//!     class,
//!     UnqualifiedName::from_string(String::from("a")).map_err(Error::MalformedName)?,
//!     MethodDescriptor::parse("(I)V").map_err(Error::MalformedName)?,
//!     vec![ClassName::ADD_ANNOTATION],
//! ))?;
//! assert_eq!(method.signature().as_str(), "com.app.Bar.a(int)");
//! # Ok(())
//! # }
//! # build().unwrap();
//! ```

mod descriptors;
mod errors;
mod markers;
mod names;
mod unit_graph;

pub use descriptors::*;
pub use errors::*;
pub use markers::*;
pub use names::*;
pub use unit_graph::*;
