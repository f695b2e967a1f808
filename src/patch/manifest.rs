use crate::model::{ClassName, MethodSignature};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered set where re-inserting a value is a no-op
///
/// Iteration order is first-seen order, so repeated runs over the same input produce the same
/// sequence.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct OrderedSet<T: Hash + Eq>(IndexSet<T>);

impl<T: Hash + Eq> OrderedSet<T> {
    pub fn new() -> OrderedSet<T> {
        OrderedSet(IndexSet::new())
    }

    /// Append the value unless it is already present
    ///
    /// Returns whether the value was newly appended.
    pub fn append_if_absent(&mut self, value: T) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Hash + Eq> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet::new()
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Hash + Eq> PartialEq for OrderedSet<T> {
    /// Equal only if the same values were appended in the same order
    fn eq(&self, other: &OrderedSet<T>) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl<T: Hash + Eq> Eq for OrderedSet<T> {}

/// Result of classification, handed to bytecode emission
///
/// The sets are only ever appended to. Methods are recorded along with their declaring class so
/// later stages can group them without re-parsing long names.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize)]
pub struct PatchManifest {
    new_classes: OrderedSet<ClassName>,
    new_methods: OrderedSet<MethodSignature>,
    modified_methods: OrderedSet<MethodSignature>,
    modified_classes: OrderedSet<ClassName>,

    #[serde(skip)]
    method_owners: HashMap<MethodSignature, ClassName>,
}

impl PatchManifest {
    pub fn new() -> PatchManifest {
        PatchManifest::default()
    }

    /// Classes that are new in their entirety
    pub fn new_classes(&self) -> &OrderedSet<ClassName> {
        &self.new_classes
    }

    /// Methods added to classes that already existed
    pub fn new_methods(&self) -> &OrderedSet<MethodSignature> {
        &self.new_methods
    }

    /// Methods whose bodies changed
    pub fn modified_methods(&self) -> &OrderedSet<MethodSignature> {
        &self.modified_methods
    }

    /// Classes owning at least one modified method
    pub fn modified_classes(&self) -> &OrderedSet<ClassName> {
        &self.modified_classes
    }

    /// Declaring class of a new or modified method
    pub fn owner_of(&self, signature: &MethodSignature) -> Option<&ClassName> {
        self.method_owners.get(signature)
    }

    pub fn is_empty(&self) -> bool {
        self.new_classes.is_empty() && self.new_methods.is_empty() && self.modified_methods.is_empty()
    }

    pub fn add_new_class(&mut self, class: ClassName) -> bool {
        self.new_classes.append_if_absent(class)
    }

    pub fn add_new_method(&mut self, class: &ClassName, signature: MethodSignature) -> bool {
        self.method_owners
            .entry(signature.clone())
            .or_insert_with(|| class.clone());
        self.new_methods.append_if_absent(signature)
    }

    /// Record a modified method along with the class declaring it
    pub fn add_modified_method(&mut self, class: &ClassName, signature: MethodSignature) -> bool {
        self.method_owners
            .entry(signature.clone())
            .or_insert_with(|| class.clone());
        self.modified_classes.append_if_absent(class.clone());
        self.modified_methods.append_if_absent(signature)
    }
}
