//! Dashboard recommendations from a student's context.
//!
//! Same additive scoring and threshold as request matching, but driven by
//! department, year of study, recent searches and the exam calendar instead
//! of a request string.

use crate::catalog::{Catalog, CatalogItem, Category};
use crate::matching::{rank, significant_words, tokenize, ScoredItem};
use log::debug;
use std::collections::BTreeSet;

const DEPARTMENT_KEYWORD: i32 = 20;
const DEPARTMENT_CATEGORY: i32 = 15;
const SEARCH_KEYWORD: i32 = 25;
const SEARCH_TITLE_WORD: i32 = 10;
const EXAM_SEASON: i32 = 15;
const FIRST_YEAR: i32 = 10;
const MIN_SCORE: i32 = 30;

struct DepartmentRule {
    aliases: &'static [&'static str],
    keywords: &'static [&'static str],
    categories: &'static [Category],
}

const DEPARTMENTS: &[DepartmentRule] = &[
    DepartmentRule {
        aliases: &["computer", "cse", "cs", "it", "software"],
        keywords: &["algorithms", "arduino", "raspberry", "linux", "microcontroller"],
        categories: &[Category::Books, Category::Electronics],
    },
    DepartmentRule {
        aliases: &["mechanical", "mech", "civil"],
        keywords: &["drafter", "drawing", "engineering", "graphics"],
        categories: &[Category::LabEquipment, Category::Calculators],
    },
    DepartmentRule {
        aliases: &["chemistry", "chem", "chemical", "biotech"],
        keywords: &["labcoat", "chemistry", "lab", "apron"],
        categories: &[Category::LabEquipment],
    },
    DepartmentRule {
        aliases: &["physics"],
        keywords: &["physics", "scientific", "calculator"],
        categories: &[Category::Books, Category::Calculators],
    },
    DepartmentRule {
        aliases: &["electrical", "electronics", "ece", "eee"],
        keywords: &["arduino", "microcontroller", "iot", "scientific"],
        categories: &[Category::Electronics, Category::Calculators],
    },
    DepartmentRule {
        aliases: &["media", "design", "journalism", "arts"],
        keywords: &["camera", "dslr", "photography"],
        categories: &[Category::Electronics],
    },
];

/// What the dashboard knows about the signed-in student.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub department: Option<String>,
    /// Year of study, 1-based.
    pub year: Option<u8>,
    pub recent_searches: Vec<String>,
    pub exam_season: bool,
}

fn department_rule(department: &str) -> Option<&'static DepartmentRule> {
    let tokens = tokenize(department);
    DEPARTMENTS
        .iter()
        .find(|rule| rule.aliases.iter().any(|a| tokens.iter().any(|t| t.as_str() == *a)))
}

/// Ranks catalog items for `context`, best first.
pub fn recommend_for<'a>(context: &UserContext, catalog: &'a Catalog) -> Vec<ScoredItem<'a>> {
    let rule = context.department.as_deref().and_then(department_rule);
    let search_terms: BTreeSet<String> = context
        .recent_searches
        .iter()
        .flat_map(|s| tokenize(s))
        .collect();

    let scored = catalog
        .items()
        .iter()
        .map(|item| score_item(item, context, rule, &search_terms))
        .collect();

    let ranked = rank(scored, MIN_SCORE);
    debug!(
        "Recommended {} of {} items (department rule: {})",
        ranked.len(),
        catalog.len(),
        rule.is_some()
    );
    ranked
}

fn score_item<'a>(
    item: &'a CatalogItem,
    context: &UserContext,
    rule: Option<&DepartmentRule>,
    search_terms: &BTreeSet<String>,
) -> ScoredItem<'a> {
    let mut score = 0;
    let mut reasons = Vec::new();

    if let Some(rule) = rule {
        for keyword in item.keywords.iter().filter(|k| rule.keywords.contains(&k.as_str())) {
            score += DEPARTMENT_KEYWORD;
            reasons.push(format!("department keyword '{}'", keyword));
        }
        if rule.categories.contains(&item.category) {
            score += DEPARTMENT_CATEGORY;
            reasons.push(format!("department category {}", item.category));
        }
    }

    let title_words = significant_words(&item.title);
    for term in search_terms {
        if item.keywords.contains(term) {
            score += SEARCH_KEYWORD;
            reasons.push(format!("recent search '{}'", term));
        } else if title_words.contains(term) {
            score += SEARCH_TITLE_WORD;
            reasons.push(format!("recent search '{}' in title", term));
        }
    }

    if context.exam_season && matches!(item.category, Category::Books | Category::Calculators) {
        score += EXAM_SEASON;
        reasons.push("exam season".to_string());
    }

    if context.year == Some(1)
        && matches!(item.category, Category::Furniture | Category::Electronics)
    {
        score += FIRST_YEAR;
        reasons.push("first-year essentials".to_string());
    }

    ScoredItem {
        item,
        score,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(results: &'a [ScoredItem<'_>]) -> Vec<&'a str> {
        results.iter().map(|s| s.item.id.as_str()).collect()
    }

    #[test]
    fn test_empty_context_recommends_nothing() {
        let catalog = Catalog::campus();
        assert!(recommend_for(&UserContext::default(), &catalog).is_empty());
    }

    #[test]
    fn test_department_drives_ranking() {
        let catalog = Catalog::campus();
        let context = UserContext {
            department: Some("Computer Science".to_string()),
            ..UserContext::default()
        };

        let results = recommend_for(&context, &catalog);
        let ranked = ids(&results);
        // three department keywords beat two, both in a department category
        assert_eq!(ranked[0], "el-rpi4");
        assert_eq!(ranked[1], "el-arduino");
        assert!(ranked.contains(&"bk-clrs"));
        assert!(!ranked.contains(&"sp-cricket"));
    }

    #[test]
    fn test_unknown_department_is_ignored() {
        let catalog = Catalog::campus();
        let context = UserContext {
            department: Some("Philosophy".to_string()),
            ..UserContext::default()
        };
        assert!(recommend_for(&context, &catalog).is_empty());
    }

    #[test]
    fn test_recent_searches_and_exam_season() {
        let catalog = Catalog::campus();
        let context = UserContext {
            recent_searches: vec!["physics textbook".to_string()],
            exam_season: true,
            ..UserContext::default()
        };

        let results = recommend_for(&context, &catalog);
        // physics + textbook keywords + exam season
        assert_eq!(results[0].item.id, "bk-hcv");
        assert_eq!(results[0].score, 25 + 25 + 15);
        // textbook keyword + exam season
        assert!(ids(&results).contains(&"bk-alg-unlocked"));
    }

    #[test]
    fn test_first_year_boost_alone_stays_below_threshold() {
        let catalog = Catalog::campus();
        let context = UserContext {
            year: Some(1),
            ..UserContext::default()
        };
        assert!(recommend_for(&context, &catalog).is_empty());

        let context = UserContext {
            year: Some(1),
            recent_searches: vec!["lamp".to_string()],
            ..UserContext::default()
        };
        assert_eq!(ids(&recommend_for(&context, &catalog)), vec!["fn-lamp"]);
    }
}
