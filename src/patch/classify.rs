use super::{
    CodeInsertionLedger, ConflictPolicy, Error, Marker, PatchManifest, Settings, Severity,
};
use crate::model::{ClassName, ClassUnit, MarkerFlags, Markers, MethodUnit, UnitGraph};

/// Walks the classes of a build and sorts out what the patch has to contain
///
/// Classification is a single synchronous pass. It either runs to completion or stops on the
/// first fatal error (see [`Error::severity`]).
pub struct Classifier<'s> {
    settings: &'s Settings,
}

impl<'s> Classifier<'s> {
    pub fn new(settings: &'s Settings) -> Classifier<'s> {
        Classifier { settings }
    }

    /// Resolve the two marker annotation types against the graph
    pub fn resolve_markers<'a>(&self, graph: &'a UnitGraph<'_>) -> Result<Markers<'a>, Error> {
        let resolve = |marker: Marker, name: &ClassName| {
            graph
                .lookup_annotation_type(name)
                .ok_or_else(|| Error::UnresolvedMarker {
                    marker,
                    name: name.clone(),
                })
        };
        Ok(Markers {
            added: resolve(Marker::Added, &self.settings.added_annotation)?,
            modified: resolve(Marker::Modified, &self.settings.modified_annotation)?,
        })
    }

    /// Classify every class in the graph, in the order they were added
    pub fn classify_graph<L>(&self, graph: &UnitGraph<'_>, ledger: &L) -> Result<PatchManifest, Error>
    where
        L: CodeInsertionLedger + ?Sized,
    {
        let units: Vec<&ClassUnit<'_>> = graph.classes().collect();
        self.classify(graph, &units, ledger)
    }

    /// Classify the given classes, in order
    ///
    /// Every class carrying the added marker lands in the new classes and nothing else about it is
    /// looked at. For the remaining classes, each declared method is either new (added marker),
    /// modified (modified marker, and code insertion must already have run on it), or untouched.
    pub fn classify<'g, L>(
        &self,
        graph: &UnitGraph<'g>,
        units: &[&ClassUnit<'g>],
        ledger: &L,
    ) -> Result<PatchManifest, Error>
    where
        L: CodeInsertionLedger + ?Sized,
    {
        let mut manifest = PatchManifest::new();
        if units.is_empty() {
            log::info!("Nothing to classify");
            return Ok(manifest);
        }

        log::info!("Classifying {} classes", units.len());
        let markers = self.resolve_markers(graph)?;

        for class in units {
            match self.classify_class(graph, class, &markers, ledger, &mut manifest) {
                Ok(()) => (),
                Err(err) if err.severity() == Severity::SkipUnit => {
                    log::error!("Skipping class {}: {}", class.name, err);
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Classified {} new classes, {} new methods, {} modified methods in {} classes",
            manifest.new_classes().len(),
            manifest.new_methods().len(),
            manifest.modified_methods().len(),
            manifest.modified_classes().len(),
        );
        Ok(manifest)
    }

    fn classify_class<'g, L>(
        &self,
        graph: &UnitGraph<'g>,
        class: &ClassUnit<'g>,
        markers: &Markers,
        ledger: &L,
        manifest: &mut PatchManifest,
    ) -> Result<(), Error>
    where
        L: CodeInsertionLedger + ?Sized,
    {
        // An added class is new in its entirety, so its methods are never diffed individually
        if class.markers(graph, markers)?.is_added() {
            log::info!("New class {}", class.name);
            manifest.add_new_class(class.name.clone());
            return Ok(());
        }

        for method in class.declared_methods() {
            match self.classify_method(graph, method, markers, ledger, manifest) {
                Ok(()) => (),
                Err(err) if err.severity() == Severity::SkipUnit => {
                    log::error!("Skipping method {:?}: {}", method, err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn classify_method<'g, L>(
        &self,
        graph: &UnitGraph<'g>,
        method: &MethodUnit<'g>,
        markers: &Markers,
        ledger: &L,
        manifest: &mut PatchManifest,
    ) -> Result<(), Error>
    where
        L: CodeInsertionLedger + ?Sized,
    {
        let flags: MarkerFlags = method.markers(graph, markers)?;
        let signature = method.signature();
        let class = &method.class.name;

        // Added takes priority over modified
        if flags.is_conflicting() {
            match self.settings.conflicting_markers {
                ConflictPolicy::Warn => {
                    log::warn!(
                        "Method {} is marked both added and modified, treating it as added",
                        signature
                    );
                }
                ConflictPolicy::Reject => {
                    return Err(Error::ConflictingMarkers {
                        class: class.clone(),
                        signature,
                    });
                }
            }
        }

        if flags.is_added() {
            log::debug!("New method {}", signature);
            manifest.add_new_method(class, signature);
        } else if flags.is_modified() {
            let record = match ledger.insertion_for(&signature) {
                Some(record) => record,
                None => {
                    return Err(Error::MissingCodeInsertion {
                        class: class.clone(),
                        signature,
                    })
                }
            };
            log::debug!(
                "Modified method {} (method number {})",
                signature,
                record.method_number
            );
            manifest.add_modified_method(class, signature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Name, UnitGraphArenas};
    use crate::patch::InsertionLedger;

    #[test]
    fn empty_input_needs_no_markers() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        let settings = Settings::new().unwrap();
        let manifest = Classifier::new(&settings)
            .classify_graph(&graph, &InsertionLedger::new())
            .unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn markers_resolve_from_settings() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        let settings = Settings::new()
            .unwrap()
            .with_added_annotation("my.New")
            .unwrap();
        let classifier = Classifier::new(&settings);

        graph.add_annotation_type(ClassName::MODIFY_ANNOTATION);
        match classifier.resolve_markers(&graph) {
            Err(Error::UnresolvedMarker { marker, name }) => {
                assert_eq!(marker, Marker::Added);
                assert_eq!(name.as_str(), "my.New");
            }
            other => panic!("expected unresolved marker, got {:?}", other.map(|_| ())),
        }

        graph.add_annotation_type(ClassName::from_string(String::from("my.New")).unwrap());
        let markers = classifier.resolve_markers(&graph).unwrap();
        assert_eq!(markers.added.name.as_str(), "my.New");
        assert_eq!(markers.modified.name, ClassName::MODIFY_ANNOTATION);
    }
}
