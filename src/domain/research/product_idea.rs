//! Product idea value object and its editable draft.
//!
//! The draft is the Input Model: feature entries are *slots*, so blank
//! entries survive editing and are only dropped when an idea is prepared
//! for submission.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Structured product description sent to the research service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductIdea {
    pub title: String,
    pub target_user: String,
    #[serde(default)]
    pub core_features: Vec<String>,
}

impl ProductIdea {
    /// Creates a new product idea.
    pub fn new(
        title: impl Into<String>,
        target_user: impl Into<String>,
        core_features: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            target_user: target_user.into(),
            core_features,
        }
    }

    /// Validates the idea and returns the copy that goes over the wire.
    ///
    /// Title and target user must be non-empty after trimming. Feature
    /// entries that are blank after trimming are dropped; the rest keep
    /// their original text and order.
    pub fn prepared_for_submission(&self) -> Result<ProductIdea, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if self.target_user.trim().is_empty() {
            return Err(ValidationError::empty_field("target_user"));
        }

        Ok(ProductIdea {
            title: self.title.clone(),
            target_user: self.target_user.clone(),
            core_features: self
                .core_features
                .iter()
                .filter(|feature| !feature.trim().is_empty())
                .cloned()
                .collect(),
        })
    }
}

/// Editable product idea with at least one feature slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdeaDraft {
    title: String,
    target_user: String,
    feature_slots: Vec<String>,
}

impl Default for ProductIdeaDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductIdeaDraft {
    /// Creates an empty draft with a single blank feature slot.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            target_user: String::new(),
            feature_slots: vec![String::new()],
        }
    }

    /// Builds a draft from an existing idea (e.g. a history entry).
    pub fn from_idea(idea: &ProductIdea) -> Self {
        let mut feature_slots = idea.core_features.clone();
        if feature_slots.is_empty() {
            feature_slots.push(String::new());
        }
        Self {
            title: idea.title.clone(),
            target_user: idea.target_user.clone(),
            feature_slots,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target_user(&self) -> &str {
        &self.target_user
    }

    pub fn feature_slots(&self) -> &[String] {
        &self.feature_slots
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_target_user(&mut self, target_user: impl Into<String>) {
        self.target_user = target_user.into();
    }

    /// Overwrites the slot at `index`. Out-of-range indices are ignored.
    ///
    /// Returns `true` when a slot was updated.
    pub fn set_feature_at(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.feature_slots.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Appends one empty slot.
    pub fn add_feature_slot(&mut self) {
        self.feature_slots.push(String::new());
    }

    /// Removes the slot at `index` unless it is the last remaining slot.
    ///
    /// Returns `true` when a slot was removed.
    pub fn remove_feature_slot(&mut self, index: usize) -> bool {
        if self.feature_slots.len() <= 1 || index >= self.feature_slots.len() {
            return false;
        }
        self.feature_slots.remove(index);
        true
    }

    /// Clears every field back to a fresh draft.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot of the draft, blank slots included.
    pub fn to_product_idea(&self) -> ProductIdea {
        ProductIdea {
            title: self.title.clone(),
            target_user: self.target_user.clone(),
            core_features: self.feature_slots.clone(),
        }
    }
}
