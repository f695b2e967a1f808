use super::{Error, NamingScheme, Settings};
use crate::model::{ClassName, Name};
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use sha2::{Digest, Sha256};

/// Deterministic names for generated patch classes, plus the way back to their source classes
///
/// One registry is created per build and passed to whatever needs it. Entries are only ever
/// added, never changed or removed, so handing out references into the registry is fine while it
/// keeps growing.
pub struct NameRegistry {
    patch_package: Option<ClassName>,
    patch_class_suffix: String,
    assist_class_suffix: String,
    naming_scheme: NamingScheme,

    /// Patch class name to source class name
    sources: FrozenMap<ClassName, Box<ClassName>>,

    /// Patch class names, in the order they were first registered
    patch_classes: FrozenVec<Box<ClassName>>,
}

impl NameRegistry {
    pub fn new(settings: &Settings) -> NameRegistry {
        NameRegistry {
            patch_package: settings.patch_package.clone(),
            patch_class_suffix: settings.patch_class_suffix.clone(),
            assist_class_suffix: settings.assist_class_suffix.clone(),
            naming_scheme: settings.naming_scheme,
            sources: FrozenMap::new(),
            patch_classes: FrozenVec::new(),
        }
    }

    /// Name of the patch class for a source class, registering the mapping back to the source
    ///
    /// The package is swapped for the patch package and the suffix is appended to the simple name:
    /// with package `com.patch` and suffix `_Patch`, `com.app.Foo` becomes `com.patch.Foo_Patch`.
    /// Deriving the same name again is a no-op. Deriving a name that already belongs to a different
    /// source class (same simple name, different package) is an error.
    pub fn derive_patch_class_name(&self, source: &ClassName) -> Result<ClassName, Error> {
        let mut simple_name = String::from(source.simple_name());
        if let (NamingScheme::PackageQualified, Some(package)) =
            (self.naming_scheme, source.package())
        {
            simple_name.push('_');
            simple_name.push_str(&package_hash(package));
        }
        simple_name.push_str(&self.patch_class_suffix);

        let patch_class = match &self.patch_package {
            None => ClassName::from_string(simple_name),
            Some(package) => ClassName::from_string(format!("{}.{}", package, simple_name)),
        }
        .map_err(Error::MalformedName)?;

        self.register(&patch_class, source)?;
        Ok(patch_class)
    }

    fn register(&self, patch_class: &ClassName, source: &ClassName) -> Result<(), Error> {
        if let Some(existing) = self.sources.get(patch_class) {
            if existing == source {
                return Ok(());
            }
            return Err(Error::PatchNameCollision {
                patch_class: patch_class.clone(),
                existing: existing.clone(),
                source_class: source.clone(),
            });
        }

        log::debug!("Registering patch class {} for {}", patch_class, source);
        self.sources
            .insert(patch_class.clone(), Box::new(source.clone()));
        self.patch_classes.push(Box::new(patch_class.clone()));
        Ok(())
    }

    /// Name of the assist class that goes alongside a class
    ///
    /// This doesn't touch the registry.
    pub fn derive_assist_class_name(&self, class: &ClassName) -> Result<ClassName, Error> {
        class
            .concat(&self.assist_class_suffix)
            .map_err(Error::MalformedName)
    }

    /// Source class a patch class was derived from
    pub fn lookup_source_class_name(&self, patch_class: &str) -> Option<&ClassName> {
        let patch_class = ClassName::from_string(patch_class.to_owned()).ok()?;
        self.sources.get(&patch_class)
    }

    /// All `(patch class, source class)` pairs, in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&ClassName, &ClassName)> {
        self.patch_classes.iter().filter_map(move |patch_class| {
            self.sources
                .get(patch_class)
                .map(|source| (patch_class, source))
        })
    }
}

/// First 8 hex digits of the SHA-256 of a package name
fn package_hash(package: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(package.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    fn class_name(name: &str) -> ClassName {
        ClassName::from_string(name.to_owned()).unwrap()
    }

    fn settings(package: &str, suffix: &str) -> Settings {
        Settings::new()
            .unwrap()
            .with_patch_package(package)
            .unwrap()
            .with_patch_class_suffix(suffix)
            .unwrap()
    }

    #[test]
    fn patch_names_are_deterministic() {
        let registry = NameRegistry::new(&settings("com.patch", "_Patch"));
        let foo = class_name("com.app.Foo");

        let patch = registry.derive_patch_class_name(&foo).unwrap();
        assert_eq!(patch.as_str(), "com.patch.Foo_Patch");
        assert_eq!(registry.derive_patch_class_name(&foo).unwrap(), patch);
        assert_eq!(
            registry.lookup_source_class_name("com.patch.Foo_Patch"),
            Some(&foo)
        );
        assert_eq!(registry.entries().count(), 1);
    }

    #[test]
    fn unknown_and_malformed_lookups() {
        let registry = NameRegistry::new(&settings("com.patch", "_Patch"));
        assert_eq!(registry.lookup_source_class_name("com.patch.Bar_Patch"), None);
        assert_eq!(registry.lookup_source_class_name(""), None);
        assert_eq!(registry.lookup_source_class_name("com.patch."), None);
    }

    #[test]
    fn default_package_sources_and_targets() {
        let registry = NameRegistry::new(&settings("com.patch", "Patch"));
        let patch = registry.derive_patch_class_name(&class_name("Foo")).unwrap();
        assert_eq!(patch.as_str(), "com.patch.FooPatch");

        let registry = NameRegistry::new(&settings("", "Patch"));
        let patch = registry
            .derive_patch_class_name(&class_name("com.app.Foo"))
            .unwrap();
        assert_eq!(patch.as_str(), "FooPatch");
        assert_eq!(
            registry.lookup_source_class_name("FooPatch"),
            Some(&class_name("com.app.Foo"))
        );
    }

    #[test]
    fn simple_names_collide_across_packages() {
        let registry = NameRegistry::new(&settings("com.patch", "Patch"));
        let first = class_name("com.a.Foo");
        let second = class_name("com.b.Foo");

        let first_patch = registry.derive_patch_class_name(&first).unwrap();
        match registry.derive_patch_class_name(&second) {
            Err(Error::PatchNameCollision {
                patch_class,
                existing,
                source_class,
            }) => {
                assert_eq!(patch_class, first_patch);
                assert_eq!(existing, first);
                assert_eq!(source_class, second);
            }
            other => panic!("expected a patch name collision, got {:?}", other),
        }

        // The first mapping is untouched
        assert_eq!(
            registry.lookup_source_class_name(first_patch.as_str()),
            Some(&first)
        );
        assert_eq!(registry.entries().count(), 1);
    }

    #[test]
    fn package_qualified_names_do_not_collide() {
        let settings =
            settings("com.patch", "Patch").with_naming_scheme(NamingScheme::PackageQualified);
        let registry = NameRegistry::new(&settings);
        let first = class_name("com.a.Foo");
        let second = class_name("com.b.Foo");

        let first_patch = registry.derive_patch_class_name(&first).unwrap();
        let second_patch = registry.derive_patch_class_name(&second).unwrap();
        assert_ne!(first_patch, second_patch);
        assert!(first_patch.as_str().starts_with("com.patch.Foo_"));
        assert!(first_patch.as_str().ends_with("Patch"));
        assert_eq!(first_patch.simple_name().len(), "Foo_".len() + 8 + "Patch".len());

        assert_eq!(
            registry.lookup_source_class_name(first_patch.as_str()),
            Some(&first)
        );
        assert_eq!(
            registry.lookup_source_class_name(second_patch.as_str()),
            Some(&second)
        );

        let entries: Vec<_> = registry.entries().collect();
        assert_eq!(entries, vec![(&first_patch, &first), (&second_patch, &second)]);
    }

    #[test]
    fn assist_names_are_not_registered() {
        let registry = NameRegistry::new(&settings("com.patch", "Patch"));
        let assist = registry
            .derive_assist_class_name(&class_name("com.patch.FooPatch"))
            .unwrap();
        assert_eq!(assist.as_str(), "com.patch.FooPatchAssist");
        assert_eq!(registry.entries().count(), 0);
        assert_eq!(registry.lookup_source_class_name(assist.as_str()), None);
    }
}
