//! Classification and naming for binary hot-patches of JVM applications
//!
//! A build that ships a hot-patch marks what changed since the previous release: whole classes and
//! single methods can be marked as added, and methods can be marked as modified. This crate walks
//! the compiled classes of such a build and works out what the patch has to contain, along with the
//! names of the generated patch classes.
//!
//! ```
//! use autopatch::model::{
//!     ClassName, ClassUnit, MethodDescriptor, MethodSignature, MethodUnit, Name, ParseDescriptor,
//!     UnitGraph, UnitGraphArenas, UnqualifiedName,
//! };
//! use autopatch::patch::{
//!     Classifier, Error, InsertionLedger, InsertionRecord, NameRegistry, PatchPlan, Settings,
//! };
//!
//! # fn classify() -> Result<(), Error> {
//! let arenas = UnitGraphArenas::new();
//! let graph = UnitGraph::new(&arenas);
//! graph.add_annotation_type(ClassName::ADD_ANNOTATION);
//! graph.add_annotation_type(ClassName::MODIFY_ANNOTATION);
//!
//! let bar = graph.add_class(ClassUnit::new(
//!     ClassName::from_string(String::from("com.app.Bar")).map_err(Error::MalformedName)?,
//!     vec![],
//! ))?;
//! graph.add_method(MethodUnit::new(
//!     bar,
//!     UnqualifiedName::from_string(String::from("b")).map_err(Error::MalformedName)?,
//!     MethodDescriptor::parse("()V").map_err(Error::MalformedName)?,
//!     vec![ClassName::MODIFY_ANNOTATION],
//! ))?;
//!
//! // Code insertion has already rewritten `b`
//! let mut ledger = InsertionLedger::new();
//! ledger.record(MethodSignature::new("com.app.Bar.b()"), InsertionRecord { method_number: 0 });
//!
//! let settings = Settings::new()?;
//! let manifest = Classifier::new(&settings).classify(&graph, &[bar], &ledger)?;
//! assert_eq!(manifest.modified_classes().len(), 1);
//!
//! let registry = NameRegistry::new(&settings);
//! let plan = PatchPlan::build(&manifest, &registry)?;
//! assert_eq!(plan.patched_classes[0].patch_class.as_str(), "com.hotfix.patch.BarPatch");
//! # Ok(())
//! # }
//! # classify().unwrap();
//! ```

pub mod model;
pub mod patch;
pub mod snapshot;
