use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business entity categories targeted by verified rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Quote,
    PurchaseOrder,
    Spa,
    Ticket,
    SalesOrder,
    Bid,
    Deal,
}

impl EntityCategory {
    /// Every category, in display order.
    pub const ALL: [EntityCategory; 7] = [
        EntityCategory::Quote,
        EntityCategory::PurchaseOrder,
        EntityCategory::Spa,
        EntityCategory::Ticket,
        EntityCategory::SalesOrder,
        EntityCategory::Bid,
        EntityCategory::Deal,
    ];

    /// Get a string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Quote => "quote",
            EntityCategory::PurchaseOrder => "purchase_order",
            EntityCategory::Spa => "spa",
            EntityCategory::Ticket => "ticket",
            EntityCategory::SalesOrder => "sales_order",
            EntityCategory::Bid => "bid",
            EntityCategory::Deal => "deal",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityCategory::Quote => "Quote",
            EntityCategory::PurchaseOrder => "Purchase order",
            EntityCategory::Spa => "Special pricing agreement",
            EntityCategory::Ticket => "Support ticket",
            EntityCategory::SalesOrder => "Sales order",
            EntityCategory::Bid => "Bid",
            EntityCategory::Deal => "Deal registration",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        EntityCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Unknown entity category: {}", s))
    }
}

/// Serialized form of a rule, as curated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub regex: String,
    pub label: String,
    pub base_confidence: f32,
    #[serde(default)]
    pub context_keywords: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A compiled, validated rule.
#[derive(Debug, Clone)]
pub struct VerifiedRule {
    /// `category:label`, used as the match source id
    pub id: String,
    pub category: EntityCategory,
    pub label: String,
    pub regex: Regex,
    pub base_confidence: f32,
    pub context_keywords: Vec<String>,
    pub examples: Vec<String>,
}

impl VerifiedRule {
    /// The source expression.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Back to the serialized form.
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            regex: self.pattern().to_string(),
            label: self.label.clone(),
            base_confidence: self.base_confidence,
            context_keywords: self.context_keywords.clone(),
            examples: self.examples.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("purchase_order".parse::<EntityCategory>(), Ok(EntityCategory::PurchaseOrder));
        assert_eq!("Sales-Order".parse::<EntityCategory>(), Ok(EntityCategory::SalesOrder));
        assert_eq!("SPA".parse::<EntityCategory>(), Ok(EntityCategory::Spa));
        assert!("invoice".parse::<EntityCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityCategory::PurchaseOrder).unwrap();
        assert_eq!(json, "\"purchase_order\"");
        for category in EntityCategory::ALL {
            assert_eq!(category.as_str().parse::<EntityCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_definition_defaults() {
        let def: RuleDefinition =
            serde_json::from_str(r#"{"regex": "\\bX-\\d+\\b", "label": "X", "base_confidence": 0.5}"#)
                .unwrap();
        assert!(def.context_keywords.is_empty());
        assert!(def.examples.is_empty());
    }
}
