use super::Error;
use crate::model::MethodSignature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// Evidence left behind by the code-insertion stage for one rewritten method
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertionRecord {
    /// Number the rewritten method dispatches on at runtime
    pub method_number: u32,
}

/// Read-only view of what the code-insertion stage rewrote
pub trait CodeInsertionLedger {
    /// Find the record for a method, if code was ever inserted into it
    fn insertion_for(&self, signature: &MethodSignature) -> Option<&InsertionRecord>;
}

/// Ledger backed by a hash map from method long name to record
#[derive(Default, Debug)]
pub struct InsertionLedger {
    records: HashMap<MethodSignature, InsertionRecord>,
}

impl InsertionLedger {
    pub fn new() -> InsertionLedger {
        InsertionLedger::default()
    }

    /// Record that code insertion ran for a method
    pub fn record(&mut self, signature: MethodSignature, record: InsertionRecord) {
        self.records.insert(signature, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read a ledger written as a JSON object from long name to method number
    ///
    /// ```json
    /// { "com.app.Bar.b()": 3 }
    /// ```
    pub fn from_json<R: Read>(reader: R) -> Result<InsertionLedger, Error> {
        let raw: HashMap<String, InsertionRecord> = serde_json::from_reader(reader)?;
        let records = raw
            .into_iter()
            .map(|(long_name, record)| (MethodSignature::new(long_name), record))
            .collect();
        Ok(InsertionLedger { records })
    }
}

impl CodeInsertionLedger for InsertionLedger {
    fn insertion_for(&self, signature: &MethodSignature) -> Option<&InsertionRecord> {
        self.records.get(signature)
    }
}

impl CodeInsertionLedger for HashMap<MethodSignature, InsertionRecord> {
    fn insertion_for(&self, signature: &MethodSignature) -> Option<&InsertionRecord> {
        self.get(signature)
    }
}
