//! Category suggestion for new listings.

use crate::catalog::Category;
use crate::matching::tokenize;
use serde::Serialize;

const TITLE_WEIGHT: u64 = 2;
const DESCRIPTION_WEIGHT: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySuggestion {
    pub category: Category,
    /// Share of all keyword weight that went to the winner, 0-100.
    pub confidence: u8,
}

/// Suggests a category from a listing's title and description.
///
/// Every token found in a category's signal words adds its weight to that
/// category. The heaviest category wins; on a tie the one declared first
/// wins. Returns `None` when nothing matched.
pub fn suggest_category(title: &str, description: &str) -> Option<CategorySuggestion> {
    let title_tokens = tokenize(title);
    let description_tokens = tokenize(description);

    let weights: Vec<(Category, u64)> = Category::ALL
        .iter()
        .map(|&category| {
            let words = category.signal_words();
            let hits = |tokens: &[String], weight: u64| -> u64 {
                let count = tokens
                    .iter()
                    .filter(|t| words.contains(&t.as_str()))
                    .count() as u64;
                count.saturating_mul(weight)
            };
            (
                category,
                hits(title_tokens.as_slice(), TITLE_WEIGHT)
                    .saturating_add(hits(description_tokens.as_slice(), DESCRIPTION_WEIGHT)),
            )
        })
        .collect();

    let total = weights
        .iter()
        .fold(0u64, |sum, &(_, w)| sum.saturating_add(w));
    if total == 0 {
        return None;
    }

    // First maximum wins
    let (category, best) = weights
        .iter()
        .fold((Category::Other, 0), |acc, &(c, w)| if w > acc.1 { (c, w) } else { acc });

    Some(CategorySuggestion {
        category,
        confidence: share_percent(best, total),
    })
}

/// `part` as a whole percentage of `total`, rounded down. `part <= total`.
fn share_percent(part: u64, total: u64) -> u8 {
    let percent = u128::from(part) * 100 / u128::from(total);
    u8::try_from(percent).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_is_books() {
        let suggestion = suggest_category("CLRS textbook", "").unwrap();
        assert_eq!(suggestion.category, Category::Books);
        assert_eq!(suggestion.confidence, 100);
    }

    #[test]
    fn test_title_outweighs_description() {
        let suggestion = suggest_category("Casio calculator", "comes with the manual book").unwrap();
        assert_eq!(suggestion.category, Category::Calculators);
        // casio + calculator in the title = 4 of 5
        assert_eq!(suggestion.confidence, 80);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let suggestion = suggest_category("lab kit", "").unwrap();
        assert_eq!(suggestion.category, Category::LabEquipment);
        assert_eq!(suggestion.confidence, 50);
    }

    #[test]
    fn test_share_percent_handles_large_counts() {
        assert_eq!(share_percent(u64::MAX, u64::MAX), 100);
        assert_eq!(share_percent(u64::MAX / 2, u64::MAX), 49);
        assert_eq!(share_percent(50_000_000, 100_000_000), 50);
        assert_eq!(share_percent(0, 7), 0);
    }

    #[test]
    fn test_long_title_keeps_full_confidence() {
        let title = "book ".repeat(200_000);
        let suggestion = suggest_category(&title, "lamp").unwrap();
        assert_eq!(suggestion.category, Category::Books);
        // 400000 of 400001
        assert_eq!(suggestion.confidence, 99);
    }

    #[test]
    fn test_no_signal() {
        assert!(suggest_category("Mystery box", "assorted things").is_none());
    }
}
