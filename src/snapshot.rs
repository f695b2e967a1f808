//! JSON description of the compiled classes of a build
//!
//! ```json
//! {
//!   "annotation_types": ["com.hotfix.annotation.Add", "com.hotfix.annotation.Modify"],
//!   "classes": [
//!     {
//!       "name": "com.app.Bar",
//!       "annotations": [],
//!       "methods": [
//!         { "name": "a", "descriptor": "()V", "annotations": ["com.hotfix.annotation.Add"] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::model::{
    ClassName, ClassUnit, Error, MethodDescriptor, MethodUnit, Name, ParseDescriptor, UnitGraph,
    UnqualifiedName,
};
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize, Debug)]
pub struct Snapshot {
    /// Annotation types that can be resolved
    #[serde(default)]
    pub annotation_types: Vec<String>,

    /// Classes, in the order they should be classified
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

#[derive(Deserialize, Debug)]
pub struct ClassEntry {
    pub name: String,

    #[serde(default)]
    pub annotations: Vec<String>,

    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Deserialize, Debug)]
pub struct MethodEntry {
    pub name: String,

    /// JVM method descriptor (eg. `(ILjava/lang/String;)V`)
    pub descriptor: String,

    #[serde(default)]
    pub annotations: Vec<String>,
}

impl Snapshot {
    pub fn from_json<R: Read>(reader: R) -> Result<Snapshot, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Add everything in the snapshot to the graph
    ///
    /// Annotation names are checked for well-formedness here, but whether they resolve is only
    /// checked during classification.
    pub fn load_into<'g>(&self, graph: &UnitGraph<'g>) -> Result<Vec<&'g ClassUnit<'g>>, Error> {
        for annotation_type in &self.annotation_types {
            graph.add_annotation_type(make_name(annotation_type)?);
        }

        let mut classes = Vec::with_capacity(self.classes.len());
        for entry in &self.classes {
            let annotations = make_names(&entry.annotations)?;
            let class = graph.add_class(ClassUnit::new(make_name(&entry.name)?, annotations))?;

            for method in &entry.methods {
                let name: UnqualifiedName = make_name(&method.name)?;
                let descriptor = MethodDescriptor::parse(&method.descriptor).map_err(|message| {
                    Error::BadDescriptor {
                        unit: format!("{}.{}", entry.name, method.name),
                        descriptor: method.descriptor.clone(),
                        message,
                    }
                })?;
                graph.add_method(MethodUnit::new(
                    class,
                    name,
                    descriptor,
                    make_names(&method.annotations)?,
                ))?;
            }

            log::trace!("Loaded {:?} with {} methods", class, entry.methods.len());
            classes.push(class);
        }

        log::debug!("Loaded {} classes", classes.len());
        Ok(classes)
    }
}

fn make_name<N: Name>(name: &str) -> Result<N, Error> {
    N::from_string(name.to_owned()).map_err(Error::MalformedName)
}

fn make_names(names: &[String]) -> Result<Vec<ClassName>, Error> {
    names.iter().map(|name| make_name(name)).collect()
}
