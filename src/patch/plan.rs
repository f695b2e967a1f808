use super::{Error, NameRegistry, PatchManifest};
use crate::model::{ClassName, MethodSignature};
use indexmap::IndexMap;
use serde::Serialize;

/// What emission has to generate, grouped per patched class
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PatchPlan {
    /// Classes emitted wholesale (no patch class, no assist class)
    pub new_classes: Vec<ClassName>,

    /// Existing classes that need a patch class, in the order they were first classified
    pub patched_classes: Vec<PatchedClass>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PatchedClass {
    pub source_class: ClassName,
    pub patch_class: ClassName,
    pub assist_class: ClassName,
    pub new_methods: Vec<MethodSignature>,
    pub modified_methods: Vec<MethodSignature>,
}

impl PatchPlan {
    /// Group the manifest by owning class, deriving (and registering) patch class names
    ///
    /// Classes appear in the order of their first modified method, followed by classes that only
    /// gained new methods, in the order of their first new method. Every patched class gets its own
    /// patch class: two source classes whose patch names collide fail the build.
    pub fn build(manifest: &PatchManifest, registry: &NameRegistry) -> Result<PatchPlan, Error> {
        let mut grouped: IndexMap<ClassName, (Vec<MethodSignature>, Vec<MethodSignature>)> =
            IndexMap::new();
        for class in manifest.modified_classes() {
            grouped.entry(class.clone()).or_default();
        }
        for signature in manifest.modified_methods() {
            if let Some(class) = manifest.owner_of(signature) {
                grouped.entry(class.clone()).or_default().1.push(signature.clone());
            }
        }
        for signature in manifest.new_methods() {
            if let Some(class) = manifest.owner_of(signature) {
                grouped.entry(class.clone()).or_default().0.push(signature.clone());
            }
        }

        let mut patched_classes = Vec::with_capacity(grouped.len());
        for (source_class, (new_methods, modified_methods)) in grouped {
            let patch_class = registry.derive_patch_class_name(&source_class)?;
            let assist_class = registry.derive_assist_class_name(&patch_class)?;
            log::debug!("Patching {} with {}", source_class, patch_class);
            patched_classes.push(PatchedClass {
                source_class,
                patch_class,
                assist_class,
                new_methods,
                modified_methods,
            });
        }

        Ok(PatchPlan {
            new_classes: manifest.new_classes().iter().cloned().collect(),
            patched_classes,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::Name;
    use crate::patch::Settings;

    fn class_name(name: &str) -> ClassName {
        ClassName::from_string(name.to_owned()).unwrap()
    }

    #[test]
    fn groups_methods_by_class() {
        let bar = class_name("com.app.Bar");
        let baz = class_name("com.app.Baz");
        let mut manifest = PatchManifest::new();
        manifest.add_new_class(class_name("com.app.Fresh"));
        manifest.add_new_method(&baz, MethodSignature::new("com.app.Baz.extra()"));
        manifest.add_new_method(&bar, MethodSignature::new("com.app.Bar.a()"));
        manifest.add_modified_method(&bar, MethodSignature::new("com.app.Bar.b()"));

        let settings = Settings::new()
            .unwrap()
            .with_patch_package("com.patch")
            .unwrap();
        let registry = NameRegistry::new(&settings);
        let plan = PatchPlan::build(&manifest, &registry).unwrap();

        assert_eq!(plan.new_classes, vec![class_name("com.app.Fresh")]);
        assert_eq!(
            plan.patched_classes,
            vec![
                PatchedClass {
                    source_class: bar.clone(),
                    patch_class: class_name("com.patch.BarPatch"),
                    assist_class: class_name("com.patch.BarPatchAssist"),
                    new_methods: vec![MethodSignature::new("com.app.Bar.a()")],
                    modified_methods: vec![MethodSignature::new("com.app.Bar.b()")],
                },
                PatchedClass {
                    source_class: baz.clone(),
                    patch_class: class_name("com.patch.BazPatch"),
                    assist_class: class_name("com.patch.BazPatchAssist"),
                    new_methods: vec![MethodSignature::new("com.app.Baz.extra()")],
                    modified_methods: vec![],
                },
            ]
        );

        assert_eq!(registry.lookup_source_class_name("com.patch.BarPatch"), Some(&bar));
        assert_eq!(registry.lookup_source_class_name("com.patch.BazPatch"), Some(&baz));
    }

    #[test]
    fn colliding_patch_names_fail_the_plan() {
        let first = class_name("com.a.Foo");
        let second = class_name("com.b.Foo");
        let mut manifest = PatchManifest::new();
        manifest.add_modified_method(&first, MethodSignature::new("com.a.Foo.run()"));
        manifest.add_modified_method(&second, MethodSignature::new("com.b.Foo.run()"));

        let settings = Settings::new().unwrap();
        let registry = NameRegistry::new(&settings);
        assert!(matches!(
            PatchPlan::build(&manifest, &registry),
            Err(Error::PatchNameCollision { source_class, .. }) if source_class == second
        ));

        let settings = settings.with_naming_scheme(crate::patch::NamingScheme::PackageQualified);
        let registry = NameRegistry::new(&settings);
        let plan = PatchPlan::build(&manifest, &registry).unwrap();
        assert_eq!(plan.patched_classes.len(), 2);
        assert_ne!(
            plan.patched_classes[0].patch_class,
            plan.patched_classes[1].patch_class
        );
    }
}
