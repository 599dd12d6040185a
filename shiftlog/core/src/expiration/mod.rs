use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tracked product as stored in the product collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductItem {
    /// Document id assigned by the store; empty until the item is persisted,
    /// immutable and unique afterwards.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    /// Product name
    pub name: String,
    /// Product barcode number
    pub barcode: String,
    /// Expiration date, if one was recorded
    pub expiration_date: Option<NaiveDate>,
}

/// How urgently a product needs attention, derived from its days until
/// expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Urgency {
    /// Expired, due today, or due within 3 days
    Critical,
    /// Due within 4 to 7 days
    Warning,
    /// Due in 8 days or more
    Normal,
    /// No expiration date recorded
    Neutral,
}

/// Display label and urgency tier for a product's expiration date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationStatus {
    /// Human-readable countdown, e.g. "D-5", "due today", "expired"
    pub label: String,
    pub urgency: Urgency,
}

impl ExpirationStatus {
    /// Classifies an expiration date relative to `today`.
    ///
    /// The day count is a whole-day difference and may be negative for
    /// already expired products. Inputs are validated before they reach
    /// this computation; there are no error conditions.
    pub fn classify(today: NaiveDate, expiration_date: Option<NaiveDate>) -> Self {
        let Some(date) = expiration_date else {
            return Self {
                label: "-".to_string(),
                urgency: Urgency::Neutral,
            };
        };

        let days = (date - today).num_days();
        let label = match days {
            d if d < 0 => "expired".to_string(),
            0 => "due today".to_string(),
            d => format!("D-{}", d),
        };
        let urgency = match days {
            d if d <= 3 => Urgency::Critical,
            d if d <= 7 => Urgency::Warning,
            _ => Urgency::Normal,
        };

        Self { label, urgency }
    }
}

/// Sorts products the way the store query presents them: ascending by
/// expiration date, with items lacking a date after all dated items.
/// The sort is stable, so otherwise-equal items keep their relative order.
pub fn sort_by_expiration(items: &mut [ProductItem]) {
    items.sort_by_key(|item| (item.expiration_date.is_none(), item.expiration_date));
}

/// Renders an expiration date as `yyyy.MM.dd`, or "no date" when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y.%m.%d").to_string(),
        None => "no date".to_string(),
    }
}
