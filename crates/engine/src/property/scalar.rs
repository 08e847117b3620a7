//! Scalar literal property

use crate::schema::{Cardinality, LiteralKind};
use propgraph_core::{
    Error, Identifier, PredicateTag, Result, Statement, StatementStore, Value,
};

/// Property holding literal values of one declared kind
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarProperty {
    predicate: PredicateTag,
    cardinality: Cardinality,
    kind: LiteralKind,
    values: Vec<Value>,
}

impl ScalarProperty {
    /// Create an empty scalar property
    pub fn new(predicate: PredicateTag, kind: LiteralKind, cardinality: Cardinality) -> Self {
        ScalarProperty {
            predicate,
            cardinality,
            kind,
            values: Vec::new(),
        }
    }

    /// Predicate naming this property
    pub fn predicate(&self) -> &PredicateTag {
        &self.predicate
    }

    /// Declared bounds
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Declared literal kind
    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    /// The single value of a singular property
    ///
    /// # Errors
    ///
    /// Returns `Error::Cardinality` on a multi-valued property; use
    /// [`ScalarProperty::values`] there.
    pub fn get(&self) -> Result<Option<&Value>> {
        if !self.cardinality.is_singular() {
            return Err(self.cardinality.violation(&self.predicate, self.values.len()));
        }
        Ok(self.values.first())
    }

    /// All held values in insertion order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of held values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value is held
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the value of a singular property, returning the previous one
    pub fn set(&mut self, value: impl Into<Value>) -> Result<Option<Value>> {
        if !self.cardinality.is_singular() {
            return Err(self.cardinality.violation(&self.predicate, self.values.len()));
        }
        let value = self.check_kind(value.into())?;
        let previous = self.values.pop();
        self.values.push(value);
        Ok(previous)
    }

    /// Append a value
    ///
    /// # Errors
    ///
    /// - `Error::TypeMismatch` if the value is not of the declared kind
    /// - `Error::Cardinality` if the upper bound is already reached
    pub fn add(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = self.check_kind(value.into())?;
        if !self.cardinality.has_room(self.values.len()) {
            return Err(self
                .cardinality
                .violation(&self.predicate, self.values.len() + 1));
        }
        self.values.push(value);
        Ok(())
    }

    /// Remove the first value equal to `value`; returns whether one was found
    ///
    /// Removal below the lower bound is allowed; [`ScalarProperty::validate`]
    /// reports it.
    pub fn remove(&mut self, value: &Value) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(idx) => {
                self.values.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove the value at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        if index < self.values.len() {
            Some(self.values.remove(index))
        } else {
            None
        }
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Check the held count against the declared bounds
    pub fn validate(&self) -> Result<()> {
        self.cardinality.check(&self.predicate, self.values.len())
    }

    /// Emit one statement per held value
    pub fn serialize_into(&self, store: &mut StatementStore, subject: &Identifier) -> Result<()> {
        self.validate()?;
        for value in &self.values {
            store.add(Statement::new(
                subject.clone(),
                self.predicate.clone(),
                value.clone(),
            ));
        }
        Ok(())
    }

    /// Read this predicate's statements about `subject`, replacing held values
    ///
    /// Values are coerced to the declared kind.
    pub fn deserialize_from(&mut self, store: &StatementStore, subject: &Identifier) -> Result<()> {
        self.values.clear();
        let predicate = self.predicate.clone();
        for value in store.objects(subject, &predicate) {
            let coerced = self.kind.coerce(value).ok_or_else(|| {
                Error::type_mismatch(&predicate, self.kind.name(), value.type_name())
            })?;
            self.add(coerced)?;
        }
        Ok(())
    }

    fn check_kind(&self, value: Value) -> Result<Value> {
        if self.kind.accepts(&value) {
            Ok(value)
        } else {
            Err(Error::type_mismatch(
                &self.predicate,
                self.kind.name(),
                value.type_name(),
            ))
        }
    }
}
