//! Cart actions and undo history

use thiserror::Error;

use crate::products::ProductId;

/// Errors returned when undoing a cart action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UndoError {
    /// The undo history is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// A removal cannot be undone because the item has left the cart.
    ///
    /// Actions only record the product id, so there is nothing to re-insert from.
    #[error("product {0} is no longer in the cart; the removal cannot be undone")]
    ItemEvicted(ProductId),
}

/// A recorded cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Units were added to the cart.
    Add {
        /// Product the units were added for
        product: ProductId,

        /// Units added
        quantity: u32,
    },

    /// Units were removed from the cart.
    Remove {
        /// Product the units were removed for
        product: ProductId,

        /// Units actually removed (never more than were in the cart)
        quantity: u32,
    },
}

impl Action {
    /// Product affected by the action.
    pub fn product_id(&self) -> &ProductId {
        match self {
            Action::Add { product, .. } | Action::Remove { product, .. } => product,
        }
    }

    /// Quantity recorded by the action.
    pub fn quantity(&self) -> u32 {
        match self {
            Action::Add { quantity, .. } | Action::Remove { quantity, .. } => *quantity,
        }
    }
}

/// Last-in, first-out history of cart actions.
#[derive(Debug, Default)]
pub struct UndoHistory {
    actions: Vec<Action>,
}

impl UndoHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Take the most recent action.
    ///
    /// # Errors
    ///
    /// Returns [`UndoError::NothingToUndo`] if the history is empty.
    pub fn pop(&mut self) -> Result<Action, UndoError> {
        self.actions.pop().ok_or(UndoError::NothingToUndo)
    }

    /// The most recent action, if any.
    pub fn last(&self) -> Option<&Action> {
        self.actions.last()
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if there is anything to undo.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Forget every recorded action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
