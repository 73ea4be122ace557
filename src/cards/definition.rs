//! Card definitions - static card data.
//!
//! `CardData` holds the immutable properties of an event card: its text
//! and the ordered choices it offers. Each `CardChoice` carries the
//! conditions that gate it and the effects it applies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::{Condition, Effect};

/// Deck name. Decks are categories of cards drawn in rotation.
///
/// The engine doesn't interpret deck names; the catalog's declared order
/// is the rotation order. The four standard decks are provided as
/// constructors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(pub String);

impl DeckId {
    /// Create a new deck ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the deck name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cards that advance the realm.
    #[must_use]
    pub fn progression() -> Self {
        Self::new("Progression")
    }

    /// Cards that shore up resources.
    #[must_use]
    pub fn resource_support() -> Self {
        Self::new("ResourceSupport")
    }

    /// Cards that damage the realm.
    #[must_use]
    pub fn harm() -> Self {
        Self::new("Harm")
    }

    /// Rare, large events.
    #[must_use]
    pub fn big_event() -> Self {
        Self::new("BigEvent")
    }

    /// The standard decks in rotation order.
    #[must_use]
    pub fn standard() -> [DeckId; 4] {
        [
            Self::progression(),
            Self::resource_support(),
            Self::harm(),
            Self::big_event(),
        ]
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeckId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A labeled option on a card.
///
/// ## Example
///
/// ```
/// use capital_ccg::cards::CardChoice;
/// use capital_ccg::core::ResourceKind;
/// use capital_ccg::effects::{Condition, Effect};
///
/// let feast = CardChoice::new("Hold a feast")
///     .with_condition(Condition::resource_at_least(ResourceKind::Food, 10))
///     .with_effect(Effect::cost(ResourceKind::Food, 10));
///
/// assert_eq!(feast.effects.len(), 1);
/// assert_eq!(feast.conditions.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardChoice {
    /// Button text.
    pub label: String,

    /// Effects applied in order when taken.
    #[serde(default)]
    pub effects: SmallVec<[Effect; 4]>,

    /// Guards; all must hold for the choice to be available.
    #[serde(default)]
    pub conditions: SmallVec<[Condition; 2]>,
}

impl CardChoice {
    /// Create a choice with no effects and no conditions.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            effects: SmallVec::new(),
            conditions: SmallVec::new(),
        }
    }

    /// Add an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// A choice without conditions is always available.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Static card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    /// Identifier, unique within its deck.
    pub id: String,

    /// Card title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Flavor text.
    #[serde(default)]
    pub description: String,

    /// Choices in display order.
    #[serde(default)]
    pub choices: Vec<CardChoice>,
}

fn default_title() -> String {
    "No Title".to_string()
}

impl CardData {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            choices: Vec::new(),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a choice (builder pattern).
    #[must_use]
    pub fn with_choice(mut self, choice: CardChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Check if a choice is one this card offers.
    #[must_use]
    pub fn offers(&self, choice: &CardChoice) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}
