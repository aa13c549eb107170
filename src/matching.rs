//! Keyword-weighted matching of free-text rental requests against a catalog.
//!
//! Scores are plain additive point rules. Results are sorted by descending
//! score, keep catalog order on ties, and drop anything at or below
//! [`MatchingConfig::min_score`].

use crate::amount::Amount;
use crate::catalog::{Catalog, CatalogItem};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "plus", "need", "want", "any", "some", "someone",
    "looking", "rent", "renting", "borrow", "please", "have", "anyone",
];

/// Point weights and the relevance threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    /// Whole normalized title appears in the request.
    pub exact_title: i32,
    /// Per item keyword found among request tokens.
    pub keyword: i32,
    /// Per significant title word found among request tokens.
    pub title_word: i32,
    /// Request mentions a word tied to the item's category. Applied once.
    pub category_hint: i32,
    /// Daily rate above the stated budget.
    pub over_budget: i32,
    /// Results must score strictly above this.
    pub min_score: i32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            exact_title: 50,
            keyword: 20,
            title_word: 5,
            category_hint: 15,
            over_budget: -25,
            min_score: 30,
        }
    }
}

/// A renter's "looking for" post.
#[derive(Debug, Clone, Default)]
pub struct ItemRequest {
    pub text: String,
    /// Maximum acceptable daily rate.
    pub budget: Option<Amount>,
}

impl ItemRequest {
    pub fn new(text: impl Into<String>) -> Self {
        ItemRequest {
            text: text.into(),
            budget: None,
        }
    }

    pub fn with_budget(mut self, budget: Amount) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// A catalog item with its relevance score and the rules that fired.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem<'a> {
    pub item: &'a CatalogItem,
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Lowercased alphanumeric tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Title words worth matching on: three letters or more, not a stop word.
pub(crate) fn significant_words(title: &str) -> Vec<String> {
    tokenize(title)
        .into_iter()
        .filter(|w| w.chars().count() >= 3 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Sorts descending by score (stable, so catalog order breaks ties) and
/// applies the threshold.
pub(crate) fn rank(mut scored: Vec<ScoredItem<'_>>, min_score: i32) -> Vec<ScoredItem<'_>> {
    scored.retain(|s| s.score > min_score);
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Scores every catalog item against `request` with the default weights.
pub fn match_request<'a>(request: &ItemRequest, catalog: &'a Catalog) -> Vec<ScoredItem<'a>> {
    match_request_with(&MatchingConfig::default(), request, catalog)
}

pub fn match_request_with<'a>(
    config: &MatchingConfig,
    request: &ItemRequest,
    catalog: &'a Catalog,
) -> Vec<ScoredItem<'a>> {
    let tokens = tokenize(&request.text);
    let token_set: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
    let padded_request = format!(" {} ", tokens.join(" "));

    let scored = catalog
        .items()
        .iter()
        .map(|item| score_item(config, item, request, &token_set, &padded_request))
        .collect();

    let ranked = rank(scored, config.min_score);
    debug!(
        "Request '{}' matched {} of {} items",
        request.text,
        ranked.len(),
        catalog.len()
    );
    ranked
}

fn score_item<'a>(
    config: &MatchingConfig,
    item: &'a CatalogItem,
    request: &ItemRequest,
    tokens: &BTreeSet<&str>,
    padded_request: &str,
) -> ScoredItem<'a> {
    let mut score = 0;
    let mut reasons = Vec::new();

    let title_tokens = tokenize(&item.title);
    if !title_tokens.is_empty() && padded_request.contains(&format!(" {} ", title_tokens.join(" ")))
    {
        score += config.exact_title;
        reasons.push("exact title".to_string());
    }

    for keyword in &item.keywords {
        if tokens.contains(keyword.as_str()) {
            score += config.keyword;
            reasons.push(format!("keyword '{}'", keyword));
        }
    }

    for word in significant_words(&item.title) {
        if tokens.contains(word.as_str()) {
            score += config.title_word;
            reasons.push(format!("title word '{}'", word));
        }
    }

    if let Some(hint) = item
        .category
        .signal_words()
        .iter()
        .find(|w| tokens.contains(**w))
    {
        score += config.category_hint;
        reasons.push(format!("{} hint '{}'", item.category, hint));
    }

    if let Some(budget) = request.budget {
        if item.daily_rate > budget {
            score += config.over_budget;
            reasons.push(format!("over budget ({} > {})", item.daily_rate, budget));
        }
    }

    ScoredItem {
        item,
        score,
        reasons,
    }
}
