use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::{Debug, Display, Error as FmtError, Formatter};

/// Names of methods
///
/// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.2>
#[derive(Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct UnqualifiedName(Cow<'static, str>);

/// Names of classes and interfaces, in their dotted source form (eg. `com.app.Foo`)
///
/// Nested classes keep their `$` separator (eg. `com.app.Outer$Inner`).
#[derive(Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct ClassName(Cow<'static, str>);

/// Extracts the raw underlying string name
impl AsRef<str> for UnqualifiedName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Extracts the raw underlying string name
impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

pub trait Name: Sized {
    /// Check if a string would be a valid name
    fn check_valid(name: impl AsRef<str>) -> Result<(), String>;

    /// Extact the raw underlying string data:
    fn as_cow(&self) -> &Cow<'static, str>;

    /// Extact the raw underlying string name
    fn as_str(&self) -> &str {
        self.as_cow().as_ref()
    }

    /// Try to construct a name from a string
    fn from_string(name: String) -> Result<Self, String>;
}

impl Name for UnqualifiedName {
    fn check_valid(name: impl AsRef<str>) -> Result<(), String> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(format!("Unqualified name '{}' is empty", name))
        } else if name.contains(&['.', ';', '[', '/'][..]) {
            Err(format!(
                "Unqualified name '{}' contains an illegal character",
                name
            ))
        } else if name.contains(&['<', '>'][..])
            && name != Self::INIT.as_str()
            && name != Self::CLINIT.as_str()
        {
            Err(format!(
                "Unqualified name '{}' may only use angle brackets for '<init>' or '<clinit>'",
                name
            ))
        } else {
            Ok(())
        }
    }

    fn as_cow(&self) -> &Cow<'static, str> {
        &self.0
    }

    fn from_string(name: String) -> Result<Self, String> {
        match Self::check_valid(&name) {
            Ok(()) => Ok(UnqualifiedName(Cow::Owned(name))),
            Err(msg) => Err(msg),
        }
    }
}

impl Name for ClassName {
    fn check_valid(name: impl AsRef<str>) -> Result<(), String> {
        let name = name.as_ref();
        if name.is_empty() {
            Err(format!("Class name '{}' is empty", name))
        } else {
            name.split('.')
                .map(|segment| {
                    if segment.is_empty() {
                        Err(format!("Class name '{}' has an empty segment", name))
                    } else if segment.contains(&[';', '[', '/', '<', '>'][..]) {
                        Err(format!(
                            "Class name '{}' contains an illegal character",
                            name
                        ))
                    } else {
                        Ok(())
                    }
                })
                .collect()
        }
    }

    fn as_cow(&self) -> &Cow<'static, str> {
        &self.0
    }

    fn from_string(name: String) -> Result<Self, String> {
        match Self::check_valid(&name) {
            Ok(()) => Ok(ClassName(Cow::Owned(name))),
            Err(msg) => Err(msg),
        }
    }
}

impl Debug for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}
impl Debug for ClassName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Display for UnqualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}
impl Display for ClassName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.0.as_ref())
    }
}

impl Serialize for ClassName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl UnqualifiedName {
    const fn name(value: &'static str) -> UnqualifiedName {
        UnqualifiedName(Cow::Borrowed(value))
    }

    // Special unqualified names - only these are allowed to have angle brackets in them
    pub const INIT: Self = Self::name("<init>");
    pub const CLINIT: Self = Self::name("<clinit>");
}

impl ClassName {
    /// Unqualified component of the name: everything after the last `.`
    ///
    /// A name in the default package is its own simple name.
    pub fn simple_name(&self) -> &str {
        let name = self.as_str();
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }

    /// Package component of the name: everything before the last `.`
    pub fn package(&self) -> Option<&str> {
        let name = self.as_str();
        name.rfind('.').map(|idx| &name[..idx])
    }

    /// Concatenate a raw suffix onto the end of the last segment of the name
    ///
    /// The suffix must not introduce a new segment (so no `.`), and the result is validated again.
    pub fn concat(&self, suffix: &str) -> Result<ClassName, String> {
        if suffix.contains('.') {
            return Err(format!(
                "Suffix '{}' would add a segment to class name '{}'",
                suffix, self
            ));
        }
        ClassName::from_string(format!("{}{}", self.as_str(), suffix))
    }

    /// Convert from the internal `/`-separated form used inside descriptors
    pub fn from_internal(internal: &str) -> Result<ClassName, String> {
        ClassName::from_string(internal.replace('/', "."))
    }

    /// Render into the internal `/`-separated form used inside descriptors
    pub fn to_internal(&self) -> String {
        self.as_str().replace('.', "/")
    }

    const fn name(value: &'static str) -> ClassName {
        ClassName(Cow::Borrowed(value))
    }

    // Default marker annotations
    pub const ADD_ANNOTATION: Self = Self::name("com.hotfix.annotation.Add");
    pub const MODIFY_ANNOTATION: Self = Self::name("com.hotfix.annotation.Modify");

    // JDK names
    pub const OBJECT: Self = Self::name("java.lang.Object");
    pub const STRING: Self = Self::name("java.lang.String");
}
