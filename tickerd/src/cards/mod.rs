//! Recommendation card model.
//!
//! Cards are immutable values produced by the content generator and validated
//! by [`validation`] before they are cached, logged, or served. The wire
//! format is camelCase with a `type` tag, matching what the mobile client
//! renders.

pub mod prompts;
pub mod rotation;
pub mod validation;

use crate::types::Category;
use serde::{Deserialize, Serialize};

/// A linked reference shown under a card (news article, research page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSource {
    pub name: String,
    pub url: String,
}

/// A platform or tool suggestion for acting on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTool {
    pub name: String,
    pub description: String,
    pub url: String,
}

/// Fields common to both card variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBase {
    pub title: String,
    pub tagline: String,
    pub simple_explainer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_to_expect: Option<String>,
    pub good_reasons: Vec<String>,
    pub concerns: Vec<String>,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub beginner_tip: String,
    #[serde(default)]
    pub sources: Vec<CardSource>,
    #[serde(default)]
    pub get_started: Vec<CardTool>,
}

/// Stock recommendation. Identified by ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCard {
    #[serde(flatten)]
    pub base: CardBase,
    pub ticker: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub change_percent: String,
}

/// Business-idea recommendation. Identified by title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaCard {
    #[serde(flatten)]
    pub base: CardBase,
    /// Free-form industry label, e.g. "Healthcare Technology".
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub investment_range: String,
}

/// One recommendation card, tagged `stock` or `idea` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Stock(StockCard),
    Idea(IdeaCard),
}

impl Card {
    pub fn category(&self) -> Category {
        match self {
            Card::Stock(_) => Category::Stock,
            Card::Idea(_) => Category::Idea,
        }
    }

    /// Identifier used for seen-card deduplication: ticker for stocks,
    /// title for ideas.
    pub fn identifier(&self) -> &str {
        match self {
            Card::Stock(stock) => &stock.ticker,
            Card::Idea(idea) => &idea.base.title,
        }
    }

    pub fn base(&self) -> &CardBase {
        match self {
            Card::Stock(stock) => &stock.base,
            Card::Idea(idea) => &idea.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stock_card_round_trips_tagged_camel_case() {
        let value = json!({
            "type": "stock",
            "title": "NVIDIA",
            "ticker": "NVDA",
            "price": "$875.32",
            "changePercent": "+2.4%",
            "tagline": "Chips fueling AI innovation",
            "simpleExplainer": "NVIDIA powers AI technology used in self-driving cars and more.",
            "goodReasons": ["Leading AI chip manufacturer"],
            "concerns": ["High competition risk"],
            "timeline": "3-5 years",
            "riskLevel": "Medium-High",
            "beginnerTip": "Start small.",
            "sources": [{"name": "Yahoo Finance", "url": "https://finance.yahoo.com/quote/NVDA"}],
            "getStarted": [{"name": "Fidelity", "description": "Full-service broker", "url": "https://fidelity.com"}]
        });

        let card: Card = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(card.category(), Category::Stock);
        assert_eq!(card.identifier(), "NVDA");

        let back = serde_json::to_value(&card).unwrap();
        assert_eq!(back["type"], "stock");
        assert_eq!(back["changePercent"], "+2.4%");
        assert_eq!(back["simpleExplainer"], value["simpleExplainer"]);
    }

    #[test]
    fn idea_card_identifier_is_title() {
        let card: Card = serde_json::from_value(json!({
            "type": "idea",
            "title": "Telemedicine Platform for Seniors",
            "category": "Healthcare Technology",
            "investmentRange": "$20K - $50K",
            "tagline": "Connect seniors with doctors online",
            "simpleExplainer": "Seniors struggle to visit doctors. A virtual consultation app helps.",
            "goodReasons": ["Growing telemedicine market"],
            "concerns": ["Regulatory compliance"]
        }))
        .unwrap();

        assert_eq!(card.category(), Category::Idea);
        assert_eq!(card.identifier(), "Telemedicine Platform for Seniors");
        assert!(card.base().sources.is_empty());
    }
}
