use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Business meaning a column can play in an ERP export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SemanticRole {
    ArticleNumber,
    ProjectNumber,
    Quantity,
    Date,
    Status,
    /// Outstanding quantity of an order line; a narrower [`SemanticRole::Quantity`].
    RemainingQuantity,
}

impl SemanticRole {
    /// Roles the classifier always reports on, in report order.
    pub const BASE: [SemanticRole; 5] = [
        SemanticRole::ArticleNumber,
        SemanticRole::ProjectNumber,
        SemanticRole::Quantity,
        SemanticRole::Date,
        SemanticRole::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRole::ArticleNumber => "ArticleNumber",
            SemanticRole::ProjectNumber => "ProjectNumber",
            SemanticRole::Quantity => "Quantity",
            SemanticRole::Date => "Date",
            SemanticRole::Status => "Status",
            SemanticRole::RemainingQuantity => "RemainingQuantity",
        }
    }

    /// Heading used by the console reporter.
    pub fn title(&self) -> &'static str {
        match self {
            SemanticRole::ArticleNumber => "ARTICLE NUMBER",
            SemanticRole::ProjectNumber => "PROJECT NUMBER",
            SemanticRole::Quantity => "QUANTITY",
            SemanticRole::Date => "DATE",
            SemanticRole::Status => "STATUS",
            SemanticRole::RemainingQuantity => "REMAINING QUANTITY",
        }
    }

    pub fn parent(&self) -> Option<SemanticRole> {
        match self {
            SemanticRole::RemainingQuantity => Some(SemanticRole::Quantity),
            _ => None,
        }
    }

    /// Built-in bilingual (English/German) keyword set.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            SemanticRole::ArticleNumber => &["art", "item", "artikel", "material", "nummer"],
            SemanticRole::ProjectNumber => &["proj", "project", "auftrag", "order"],
            SemanticRole::Quantity => &["qty", "quantity", "menge", "anzahl", "rem"],
            SemanticRole::Date => &["date", "datum", "termin", "deadline"],
            SemanticRole::Status => &["status", "state", "zustand"],
            SemanticRole::RemainingQuantity => &[],
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticRole {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "articlenumber" | "article" => Ok(SemanticRole::ArticleNumber),
            "projectnumber" | "project" => Ok(SemanticRole::ProjectNumber),
            "quantity" => Ok(SemanticRole::Quantity),
            "date" => Ok(SemanticRole::Date),
            "status" => Ok(SemanticRole::Status),
            "remainingquantity" => Ok(SemanticRole::RemainingQuantity),
            _ => Err(anyhow!("Unknown semantic role '{value}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_accepts_display_and_snake_case() {
        for role in SemanticRole::BASE {
            assert_eq!(role.as_str().parse::<SemanticRole>().unwrap(), role);
        }
        assert_eq!(
            "remaining_quantity".parse::<SemanticRole>().unwrap(),
            SemanticRole::RemainingQuantity
        );
        assert!("colour".parse::<SemanticRole>().is_err());
    }

    #[test]
    fn remaining_quantity_specializes_quantity() {
        assert_eq!(
            SemanticRole::RemainingQuantity.parent(),
            Some(SemanticRole::Quantity)
        );
        assert!(SemanticRole::BASE.iter().all(|role| role.parent().is_none()));
    }
}
