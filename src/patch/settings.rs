use super::Error;
use crate::model::{ClassName, Name};

pub struct Settings {
    /// Annotation marking a class or method as new in this release
    pub added_annotation: ClassName,

    /// Annotation marking a method whose body changed in this release
    pub modified_annotation: ClassName,

    /// Package that generated patch classes live in, written as `my.patch.pkg`
    ///
    /// `None` places patch classes in the default package.
    pub patch_package: Option<ClassName>,

    /// Suffix appended to the simple name of a class to get its patch class (eg. `Patch`)
    pub patch_class_suffix: String,

    /// Suffix appended to a class name to get its assist class (eg. `Assist`)
    pub assist_class_suffix: String,

    /// How patch class names are derived
    pub naming_scheme: NamingScheme,

    /// What to do with a method marked both added and modified
    pub conflicting_markers: ConflictPolicy,
}

impl Settings {
    pub fn new() -> Result<Settings, Error> {
        Ok(Settings {
            added_annotation: ClassName::ADD_ANNOTATION,
            modified_annotation: ClassName::MODIFY_ANNOTATION,
            patch_package: Some(make_name("com.hotfix.patch")?),
            patch_class_suffix: make_suffix("Patch")?,
            assist_class_suffix: make_suffix("Assist")?,
            naming_scheme: NamingScheme::Simple,
            conflicting_markers: ConflictPolicy::Warn,
        })
    }

    pub fn with_added_annotation(mut self, name: impl Into<String>) -> Result<Settings, Error> {
        self.added_annotation = make_name(name)?;
        Ok(self)
    }

    pub fn with_modified_annotation(mut self, name: impl Into<String>) -> Result<Settings, Error> {
        self.modified_annotation = make_name(name)?;
        Ok(self)
    }

    /// An empty package name means the default package
    pub fn with_patch_package(mut self, package: impl Into<String>) -> Result<Settings, Error> {
        let package = package.into();
        self.patch_package = if package.is_empty() {
            None
        } else {
            Some(make_name(package)?)
        };
        Ok(self)
    }

    pub fn with_patch_class_suffix(mut self, suffix: impl Into<String>) -> Result<Settings, Error> {
        self.patch_class_suffix = make_suffix(suffix)?;
        Ok(self)
    }

    pub fn with_assist_class_suffix(
        mut self,
        suffix: impl Into<String>,
    ) -> Result<Settings, Error> {
        self.assist_class_suffix = make_suffix(suffix)?;
        Ok(self)
    }

    pub fn with_naming_scheme(mut self, naming_scheme: NamingScheme) -> Settings {
        self.naming_scheme = naming_scheme;
        self
    }

    pub fn with_conflicting_markers(mut self, policy: ConflictPolicy) -> Settings {
        self.conflicting_markers = policy;
        self
    }
}

fn make_name<N: Name>(name: impl Into<String>) -> Result<N, Error> {
    N::from_string(name.into()).map_err(Error::MalformedName)
}

/// Suffixes extend the last segment of a class name, so they can't contain segment separators
fn make_suffix(suffix: impl Into<String>) -> Result<String, Error> {
    let suffix = suffix.into();
    if suffix.contains(&['.', ';', '[', '/', '<', '>'][..]) {
        Err(Error::MalformedName(format!(
            "Class name suffix '{}' contains an illegal character",
            suffix
        )))
    } else {
        Ok(suffix)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NamingScheme {
    /// `<package>.<simple name><suffix>`
    ///
    /// Two source classes with the same simple name in different packages would map onto the same
    /// patch class name, so deriving the second one fails.
    Simple,

    /// `<package>.<simple name>_<hash of source package><suffix>`
    PackageQualified,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ConflictPolicy {
    /// Log a warning and treat the method as added
    Warn,

    /// Abort classification
    Reject,
}
