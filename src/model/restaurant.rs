use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::framework::Resource;

/// Server-assigned identifier of a restaurant.
///
/// The client never fabricates one: ids only ever come back from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub u64);

impl Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RestaurantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Price indicator shown on every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
}

impl PriceRange {
    pub const ALL: [PriceRange; 3] = [PriceRange::Budget, PriceRange::Moderate, PriceRange::Expensive];

    /// The wire symbol (`$`, `$$`, `$$$`).
    pub fn symbol(self) -> &'static str {
        match self {
            PriceRange::Budget => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Expensive => "$$$",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::Budget => "Budget-friendly",
            PriceRange::Moderate => "Moderate",
            PriceRange::Expensive => "Expensive",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.symbol() == symbol)
    }
}

impl Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A restaurant as returned by the API.
///
/// # Resource
/// This struct implements [`Resource`], so a
/// [`CacheActor`](crate::framework::CacheActor) can hold snapshots of it:
/// - Create payload: [`RestaurantDraft`]
/// - Update payload: [`RestaurantPatch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: RestaurantId,
    pub name: String,
    #[serde(rename = "type")]
    pub cuisine_type: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub location: String,
    pub rating: u8,
    /// The server stores a cleared description as `""`; that reads back as `None`.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(rename = "priceRange")]
    pub price_range: PriceRange,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|t| !t.is_empty()))
}

impl RestaurantRecord {
    /// The record without its id, e.g. to pre-fill an edit form.
    pub fn to_draft(&self) -> RestaurantDraft {
        RestaurantDraft {
            name: self.name.clone(),
            cuisine_type: self.cuisine_type.clone(),
            image_url: self.image_url.clone(),
            location: self.location.clone(),
            rating: self.rating,
            description: self.description.clone(),
            price_range: self.price_range,
        }
    }

    /// Attaches a server-assigned id to a draft.
    pub fn from_draft(id: RestaurantId, draft: RestaurantDraft) -> Self {
        Self {
            id,
            name: draft.name,
            cuisine_type: draft.cuisine_type,
            image_url: draft.image_url,
            location: draft.location,
            rating: draft.rating,
            description: draft.description,
            price_range: draft.price_range,
        }
    }

    /// Applies the supplied fields of a patch; the id never changes.
    pub fn apply(&mut self, patch: RestaurantPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(cuisine_type) = patch.cuisine_type {
            self.cuisine_type = cuisine_type;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(description) = patch.description {
            self.description = Some(description).filter(|d| !d.is_empty());
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
    }
}

impl Resource for RestaurantRecord {
    type Id = RestaurantId;
    type Create = RestaurantDraft;
    type Update = RestaurantPatch;

    const NAME: &'static str = "restaurant";

    fn id(&self) -> RestaurantId {
        self.id
    }
}

/// A restaurant being composed, before the server has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub cuisine_type: String,
    #[serde(rename = "image")]
    pub image_url: String,
    pub location: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "priceRange")]
    pub price_range: PriceRange,
}

/// Partial update: only `Some` fields are serialized and applied server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default, rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "priceRange", skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl RestaurantPatch {
    /// Only the fields of `draft` that differ from `record`.
    ///
    /// A description that was set on `record` but is absent from `draft` is
    /// sent as `""`, which clears it server-side.
    pub fn between(record: &RestaurantRecord, draft: &RestaurantDraft) -> Self {
        fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
            (old != new).then(|| new.clone())
        }

        let description = match (&record.description, &draft.description) {
            (old, Some(new)) if old.as_ref() != Some(new) => Some(new.clone()),
            (Some(_), None) => Some(String::new()),
            _ => None,
        };

        Self {
            name: changed(&record.name, &draft.name),
            cuisine_type: changed(&record.cuisine_type, &draft.cuisine_type),
            image_url: changed(&record.image_url, &draft.image_url),
            location: changed(&record.location, &draft.location),
            rating: changed(&record.rating, &draft.rating),
            description,
            price_range: changed(&record.price_range, &draft.price_range),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<RestaurantDraft> for RestaurantPatch {
    fn from(draft: RestaurantDraft) -> Self {
        Self {
            name: Some(draft.name),
            cuisine_type: Some(draft.cuisine_type),
            image_url: Some(draft.image_url),
            location: Some(draft.location),
            rating: Some(draft.rating),
            description: draft.description,
            price_range: Some(draft.price_range),
        }
    }
}
