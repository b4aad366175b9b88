//! Catalogue items offered for booking.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ItemId, UserId};

/// Validation errors returned by [`NewItem::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    EmptyDescription,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::EmptyDescription => write!(f, "item description must not be empty"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Validated listing data awaiting an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    owner_id: UserId,
    name: String,
    description: String,
    available: bool,
}

impl NewItem {
    /// Validate listing fields.
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        available: bool,
    ) -> Result<Self, ItemValidationError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        Ok(Self {
            owner_id,
            name,
            description,
            available,
        })
    }

    /// Owning user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the item accepts bookings.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Attach the store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: ItemId) -> Item {
        Item {
            id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            available: self.available,
        }
    }
}

/// Owner edits to an item. Absent or blank text fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Catalogued item.
///
/// Owner and availability are read fresh from the catalogue whenever a
/// booking is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    owner_id: UserId,
    name: String,
    description: String,
    available: bool,
}

impl Item {
    /// Identifier.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Owning user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the item accepts bookings.
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    /// Apply an owner's edits.
    #[must_use]
    pub fn patched(mut self, patch: ItemPatch) -> Self {
        if let Some(name) = non_blank(patch.name) {
            self.name = name;
        }
        if let Some(description) = non_blank(patch.description) {
            self.description = description;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        self
    }

    /// Whether an available item's name or description contains `text`,
    /// ignoring case.
    #[must_use]
    pub fn matches_search(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.available
            && (self.name.to_lowercase().contains(&needle)
                || self.description.to_lowercase().contains(&needle))
    }
}
