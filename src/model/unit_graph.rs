use super::{
    ClassName, Error, MarkerFlags, MethodDescriptor, Name, RenderDescriptor, UnqualifiedName,
};
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::fmt::Debug;
use typed_arena::Arena;

pub struct UnitGraphArenas<'g> {
    class_arena: Arena<ClassUnit<'g>>,
    method_arena: Arena<MethodUnit<'g>>,
}

impl<'g> UnitGraphArenas<'g> {
    pub fn new() -> Self {
        UnitGraphArenas {
            class_arena: Arena::new(),
            method_arena: Arena::new(),
        }
    }
}

impl<'g> Default for UnitGraphArenas<'g> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only structural view of the compiled classes of one build
///
/// Classes are kept in the order they were added, which is the order classification walks them.
/// The graph is also the shared type-resolution context: an annotation is only meaningful if its
/// type has been registered with [`UnitGraph::add_annotation_type`].
pub struct UnitGraph<'g> {
    arenas: &'g UnitGraphArenas<'g>,
    classes: FrozenMap<&'g ClassName, &'g ClassUnit<'g>>,
    class_order: FrozenVec<&'g ClassUnit<'g>>,
    annotation_types: FrozenMap<ClassName, Box<AnnotationType>>,
}

impl<'g> UnitGraph<'g> {
    /// New empty graph
    pub fn new(arenas: &'g UnitGraphArenas<'g>) -> Self {
        UnitGraph {
            arenas,
            classes: FrozenMap::new(),
            class_order: FrozenVec::new(),
            annotation_types: FrozenMap::new(),
        }
    }

    /// Register an annotation type so that annotations of this type can be resolved
    ///
    /// Registering the same type twice is harmless.
    pub fn add_annotation_type(&self, name: ClassName) -> &AnnotationType {
        let annotation_type = Box::new(AnnotationType { name: name.clone() });
        self.annotation_types.insert(name, annotation_type)
    }

    pub fn lookup_annotation_type(&self, name: &ClassName) -> Option<&AnnotationType> {
        self.annotation_types.get(name)
    }

    pub fn lookup_class(&self, name: &ClassName) -> Option<&ClassUnit<'g>> {
        self.classes.get(name)
    }

    /// Add a new class to the graph
    pub fn add_class(&self, data: ClassUnit<'g>) -> Result<&'g ClassUnit<'g>, Error> {
        if self.classes.get(&data.name).is_some() {
            return Err(Error::DuplicateClass(data.name));
        }
        let data = &*self.arenas.class_arena.alloc(data);
        self.classes.insert(&data.name, data);
        self.class_order.push(data);
        Ok(data)
    }

    /// Add a method to the graph and to its declaring class
    ///
    /// Long names leave out the return type, so two methods differing only by return type (eg. a
    /// covariant bridge method) would share a signature. The second one is rejected.
    pub fn add_method(&self, method: MethodUnit<'g>) -> Result<&'g MethodUnit<'g>, Error> {
        let signature = method.signature();
        if method
            .class
            .declared_methods()
            .any(|declared| declared.signature() == signature)
        {
            return Err(Error::DuplicateMethod(signature));
        }
        let data = &*self.arenas.method_arena.alloc(method);
        data.class.methods.push(data);
        Ok(data)
    }

    /// All classes, in the order they were added
    pub fn classes(&self) -> impl Iterator<Item = &ClassUnit<'g>> {
        self.class_order.iter()
    }

    /// Compute which markers are present in a list of annotations
    ///
    /// Every annotation must resolve to a registered type, mirroring how reading annotations off a
    /// class file requires loading every annotation class (not just the one being asked about).
    fn markers_of(
        &self,
        unit: &dyn fmt::Display,
        annotations: &[ClassName],
        markers: &Markers,
    ) -> Result<MarkerFlags, Error> {
        let mut flags = MarkerFlags::empty();
        for annotation in annotations {
            let annotation_type = self.lookup_annotation_type(annotation).ok_or_else(|| {
                Error::MissingAnnotationType {
                    unit: unit.to_string(),
                    annotation: annotation.clone(),
                }
            })?;
            if annotation_type == markers.added {
                flags |= MarkerFlags::ADDED;
            } else if annotation_type == markers.modified {
                flags |= MarkerFlags::MODIFIED;
            }
        }
        Ok(flags)
    }
}

/// Annotation type known to the graph
#[derive(PartialEq, Eq, Debug)]
pub struct AnnotationType {
    pub name: ClassName,
}

/// The two resolved marker annotation types
#[derive(Clone, Copy, Debug)]
pub struct Markers<'a> {
    pub added: &'a AnnotationType,
    pub modified: &'a AnnotationType,
}

pub struct ClassUnit<'g> {
    /// Fully-qualified name of the class
    pub name: ClassName,

    /// Types of the annotations on the class
    pub annotations: Vec<ClassName>,

    /// Declared methods, in declaration order
    pub methods: FrozenVec<&'g MethodUnit<'g>>,
}

impl<'g> ClassUnit<'g> {
    pub fn new(name: ClassName, annotations: Vec<ClassName>) -> ClassUnit<'g> {
        ClassUnit {
            name,
            annotations,
            methods: FrozenVec::new(),
        }
    }

    /// Markers present on the class itself (not on its methods)
    pub fn markers(&self, graph: &UnitGraph<'g>, markers: &Markers) -> Result<MarkerFlags, Error> {
        graph.markers_of(&self.name, &self.annotations, markers)
    }

    pub fn declared_methods(&self) -> impl Iterator<Item = &MethodUnit<'g>> {
        self.methods.iter()
    }
}

impl<'g> PartialEq for ClassUnit<'g> {
    fn eq(&self, other: &ClassUnit<'g>) -> bool {
        self.name == other.name
    }
}

impl<'g> Eq for ClassUnit<'g> {}

impl<'g> Debug for ClassUnit<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

pub struct MethodUnit<'g> {
    /// Declaring class
    ///
    /// Note: this is a pointer back to the class (so don't derive `Debug`)
    pub class: &'g ClassUnit<'g>,

    /// Name of the method
    pub name: UnqualifiedName,

    /// Type of the method
    pub descriptor: MethodDescriptor,

    /// Types of the annotations on the method
    pub annotations: Vec<ClassName>,
}

impl<'g> MethodUnit<'g> {
    pub fn new(
        class: &'g ClassUnit<'g>,
        name: UnqualifiedName,
        descriptor: MethodDescriptor,
        annotations: Vec<ClassName>,
    ) -> MethodUnit<'g> {
        MethodUnit {
            class,
            name,
            descriptor,
            annotations,
        }
    }

    /// Long name identifying the method: `com.app.Foo.bar(int,java.lang.String)`
    pub fn signature(&self) -> MethodSignature {
        MethodSignature(format!(
            "{}.{}{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render_source_parameters(),
        ))
    }

    pub fn markers(&self, graph: &UnitGraph<'g>, markers: &Markers) -> Result<MarkerFlags, Error> {
        graph.markers_of(&self.signature(), &self.annotations, markers)
    }
}

impl<'g> Debug for MethodUnit<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}.{}:{}",
            self.class.name.as_str(),
            self.name.as_str(),
            self.descriptor.render(),
        ))
    }
}

/// Method long name: declaring class, method name, and erased parameter types
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct MethodSignature(String);

impl MethodSignature {
    /// Wrap an already rendered long name (eg. one read back from a code-insertion ledger)
    pub fn new(long_name: impl Into<String>) -> MethodSignature {
        MethodSignature(long_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MethodSignature {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::ParseDescriptor;

    fn class_name(name: &str) -> ClassName {
        ClassName::from_string(name.to_owned()).unwrap()
    }

    fn method<'g>(
        graph: &UnitGraph<'g>,
        class: &'g ClassUnit<'g>,
        name: &str,
        descriptor: &str,
        annotations: Vec<ClassName>,
    ) -> &'g MethodUnit<'g> {
        graph.add_method(MethodUnit::new(
            class,
            UnqualifiedName::from_string(name.to_owned()).unwrap(),
            MethodDescriptor::parse(descriptor).unwrap(),
            annotations,
        ))
        .unwrap()
    }

    #[test]
    fn classes_keep_insertion_order() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        for name in ["com.app.Zeta", "com.app.Alpha", "com.app.Mid"] {
            graph.add_class(ClassUnit::new(class_name(name), vec![])).unwrap();
        }

        let names: Vec<&str> = graph.classes().map(|class| class.name.as_str()).collect();
        assert_eq!(names, vec!["com.app.Zeta", "com.app.Alpha", "com.app.Mid"]);
        assert!(graph.lookup_class(&class_name("com.app.Alpha")).is_some());
        assert!(graph.lookup_class(&class_name("com.app.Beta")).is_none());
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        graph.add_class(ClassUnit::new(class_name("com.app.Foo"), vec![])).unwrap();
        let err = graph
            .add_class(ClassUnit::new(class_name("com.app.Foo"), vec![]))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateClass(name) if name.as_str() == "com.app.Foo"));
    }

    #[test]
    fn method_signatures_and_declaration_order() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        let bar = graph.add_class(ClassUnit::new(class_name("com.app.Bar"), vec![])).unwrap();
        method(&graph, bar, "b", "(ILjava/lang/String;)V", vec![]);
        method(&graph, bar, "a", "()I", vec![]);

        let signatures: Vec<MethodSignature> =
            bar.declared_methods().map(MethodUnit::signature).collect();
        assert_eq!(
            signatures,
            vec![
                MethodSignature::new("com.app.Bar.b(int,java.lang.String)"),
                MethodSignature::new("com.app.Bar.a()"),
            ]
        );
    }

    #[test]
    fn methods_differing_only_by_return_type_are_rejected() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        let bar = graph.add_class(ClassUnit::new(class_name("com.app.Bar"), vec![])).unwrap();
        method(&graph, bar, "a", "()Ljava/lang/Object;", vec![ClassName::ADD_ANNOTATION]);

        let bridge = graph.add_method(MethodUnit::new(
            bar,
            UnqualifiedName::from_string(String::from("a")).unwrap(),
            MethodDescriptor::parse("()Ljava/lang/String;").unwrap(),
            vec![ClassName::MODIFY_ANNOTATION],
        ));
        match bridge {
            Err(Error::DuplicateMethod(signature)) => {
                assert_eq!(signature.as_str(), "com.app.Bar.a()")
            }
            other => panic!("expected duplicate method, got {:?}", other),
        }
        assert_eq!(bar.declared_methods().count(), 1);

        // Overloads have distinct long names
        method(&graph, bar, "a", "(I)Ljava/lang/String;", vec![]);
        assert_eq!(bar.declared_methods().count(), 2);
    }

    #[test]
    fn marker_lookup() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        graph.add_annotation_type(ClassName::ADD_ANNOTATION);
        graph.add_annotation_type(ClassName::MODIFY_ANNOTATION);
        graph.add_annotation_type(class_name("java.lang.Deprecated"));
        let markers = Markers {
            added: graph.lookup_annotation_type(&ClassName::ADD_ANNOTATION).unwrap(),
            modified: graph.lookup_annotation_type(&ClassName::MODIFY_ANNOTATION).unwrap(),
        };

        let class = graph
            .add_class(ClassUnit::new(
                class_name("com.app.Foo"),
                vec![class_name("java.lang.Deprecated"), ClassName::ADD_ANNOTATION],
            ))
            .unwrap();
        assert_eq!(class.markers(&graph, &markers).unwrap(), MarkerFlags::ADDED);

        let both = method(
            &graph,
            class,
            "run",
            "()V",
            vec![ClassName::MODIFY_ANNOTATION, ClassName::ADD_ANNOTATION],
        );
        assert!(both.markers(&graph, &markers).unwrap().is_conflicting());

        let plain = method(&graph, class, "stop", "()V", vec![]);
        assert!(plain.markers(&graph, &markers).unwrap().is_empty());
    }

    #[test]
    fn unknown_annotation_type_fails_lookup() {
        let arenas = UnitGraphArenas::new();
        let graph = UnitGraph::new(&arenas);
        graph.add_annotation_type(ClassName::ADD_ANNOTATION);
        graph.add_annotation_type(ClassName::MODIFY_ANNOTATION);
        let markers = Markers {
            added: graph.lookup_annotation_type(&ClassName::ADD_ANNOTATION).unwrap(),
            modified: graph.lookup_annotation_type(&ClassName::MODIFY_ANNOTATION).unwrap(),
        };

        let class = graph
            .add_class(ClassUnit::new(
                class_name("com.app.Foo"),
                vec![class_name("com.missing.Gone")],
            ))
            .unwrap();
        match class.markers(&graph, &markers) {
            Err(Error::MissingAnnotationType { unit, annotation }) => {
                assert_eq!(unit, "com.app.Foo");
                assert_eq!(annotation.as_str(), "com.missing.Gone");
            }
            other => panic!("expected missing annotation type, got {:?}", other),
        }
    }
}
