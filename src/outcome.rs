//! Outcome: a value, a reason it is missing, both, or neither.
//!
//! Command parsing uses this to report why an input did not match. The reason
//! is a [`Resource`] so it can be rendered in the invoking user's language.

use crate::i18n::{Language, Resource, ResourceError};

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    value: Option<T>,
    reason: Option<Resource>,
}

impl<T> Outcome<T> {
    /// An outcome holding `value`.
    pub fn of(value: T) -> Self {
        Self {
            value: Some(value),
            reason: None,
        }
    }

    /// An outcome holding both a value and a reason.
    pub fn with_reason(value: Option<T>, reason: Resource) -> Self {
        Self {
            value,
            reason: Some(reason),
        }
    }

    /// An outcome with no value, explained by `reason`.
    pub fn failed(reason: Resource) -> Self {
        Self {
            value: None,
            reason: Some(reason),
        }
    }

    /// An outcome with neither value nor reason.
    pub fn empty() -> Self {
        Self {
            value: None,
            reason: None,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn has_reason(&self) -> bool {
        self.reason.is_some()
    }

    pub fn is_value_absent(&self) -> bool {
        !self.has_value()
    }

    pub fn is_reason_absent(&self) -> bool {
        !self.has_reason()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_value() && !self.has_reason()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn reason(&self) -> Option<&Resource> {
        self.reason.as_ref()
    }

    /// `self`, or `alternative` if `self` is empty.
    pub fn if_empty(self, alternative: Outcome<T>) -> Outcome<T> {
        if self.is_empty() {
            alternative
        } else {
            self
        }
    }

    /// `self`, or the outcome produced by `supplier` if `self` is empty.
    pub fn if_empty_with(self, supplier: impl FnOnce() -> Outcome<T>) -> Outcome<T> {
        if self.is_empty() {
            supplier()
        } else {
            self
        }
    }

    /// The value, or `default` if there is none.
    pub fn or_else(self, default: T) -> T {
        self.value.unwrap_or(default)
    }

    /// Map the value, keeping the reason.
    pub fn map<U>(self, mapper: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: self.value.map(mapper),
            reason: self.reason,
        }
    }

    /// Replace the whole outcome with the one `mapper` builds from it.
    pub fn map_outcome<U>(self, mapper: impl FnOnce(Outcome<T>) -> Outcome<U>) -> Outcome<U> {
        mapper(self)
    }

    pub fn if_value_present(self, consumer: impl FnOnce(&T)) -> Self {
        if let Some(value) = &self.value {
            consumer(value);
        }
        self
    }

    pub fn if_reason_present(self, consumer: impl FnOnce(&Resource)) -> Self {
        if let Some(reason) = &self.reason {
            consumer(reason);
        }
        self
    }

    /// Split into a `Result`: the value if there is one, otherwise the
    /// reason (or `None` for an empty outcome).
    pub fn into_result(self) -> Result<T, Option<Resource>> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(self.reason),
        }
    }

    /// Render the reason in `language`, if there is one.
    pub fn render_reason(&self, language: Language) -> Option<Result<String, ResourceError>> {
        self.reason
            .as_ref()
            .map(|reason| reason.get_translation(language))
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Result<T, Resource>> for Outcome<T> {
    fn from(result: Result<T, Resource>) -> Self {
        match result {
            Ok(value) => Outcome::of(value),
            Err(reason) => Outcome::failed(reason),
        }
    }
}
