//! Rental catalog: item model, CSV loading and the built-in campus inventory.

use crate::amount::Amount;
use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Item category. Declaration order breaks ties in category suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Books,
    Calculators,
    LabEquipment,
    Electronics,
    Sports,
    Furniture,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Books,
        Category::Calculators,
        Category::LabEquipment,
        Category::Electronics,
        Category::Sports,
        Category::Furniture,
        Category::Other,
    ];

    /// Words in free text that point at this category.
    pub fn signal_words(&self) -> &'static [&'static str] {
        match self {
            Category::Books => &[
                "book", "books", "textbook", "textbooks", "novel", "edition", "author", "guide",
                "reference",
            ],
            Category::Calculators => &[
                "calculator", "calculators", "calc", "graphing", "scientific", "casio",
            ],
            Category::LabEquipment => &[
                "lab", "labcoat", "coat", "practical", "apron", "goggles", "drafter", "drawing",
                "workshop",
            ],
            Category::Electronics => &[
                "electronics", "gadget", "laptop", "arduino", "raspberry", "camera", "circuit",
                "kit", "charger",
            ],
            Category::Sports => &[
                "sports", "sport", "racket", "bat", "ball", "cricket", "badminton", "gym",
                "tournament",
            ],
            Category::Furniture => &[
                "furniture", "table", "desk", "chair", "lamp", "hostel", "room", "shelf",
            ],
            Category::Other => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Books => "books",
            Category::Calculators => "calculators",
            Category::LabEquipment => "lab_equipment",
            Category::Electronics => "electronics",
            Category::Sports => "sports",
            Category::Furniture => "furniture",
            Category::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "books" | "book" => Ok(Category::Books),
            "calculators" | "calculator" => Ok(Category::Calculators),
            "lab_equipment" | "lab" => Ok(Category::LabEquipment),
            "electronics" => Ok(Category::Electronics),
            "sports" => Ok(Category::Sports),
            "furniture" => Ok(Category::Furniture),
            "other" => Ok(Category::Other),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// A rentable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Lowercase search keywords.
    pub keywords: Vec<String>,
    pub daily_rate: Amount,
    pub vendor_id: String,
}

impl CatalogItem {
    pub fn new(
        id: &str,
        title: &str,
        category: Category,
        keywords: &[&str],
        daily_rate: i64,
        vendor_id: &str,
    ) -> Self {
        CatalogItem {
            id: id.to_string(),
            title: title.to_string(),
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            daily_rate: Amount::rupees(daily_rate),
            vendor_id: vendor_id.to_string(),
        }
    }
}

/// Raw catalog row as read from CSV.
///
/// Columns: `id,title,category,keywords,daily_rate,vendor_id`, with
/// keywords separated by `;`.
#[derive(Debug, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    pub category: String,
    pub keywords: Option<String>,
    pub daily_rate: Option<String>,
    pub vendor_id: String,
}

impl CatalogRecord {
    /// Converts the row into an item. Returns the reason on failure.
    pub fn parse(&self) -> std::result::Result<CatalogItem, String> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err("empty id".to_string());
        }

        let title = self.title.trim();
        if title.is_empty() {
            return Err("empty title".to_string());
        }

        let vendor_id = self.vendor_id.trim();
        if vendor_id.is_empty() {
            return Err("empty vendor_id".to_string());
        }

        let category = Category::from_str(&self.category)?;

        let rate_str = self
            .daily_rate
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "missing daily_rate".to_string())?;
        let daily_rate = Amount::from_str(rate_str)
            .map_err(|e| format!("invalid daily_rate '{}': {}", rate_str, e))?;
        if daily_rate.is_negative() {
            return Err(format!("negative daily_rate {}", daily_rate));
        }

        let keywords = self
            .keywords
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Ok(CatalogItem {
            id: id.to_string(),
            title: title.to_string(),
            category,
            keywords,
            daily_rate,
            vendor_id: vendor_id.to_string(),
        })
    }
}

/// An ordered list of items. Order is the tie-breaker for equal scores.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Catalog { items }
    }

    /// Reads a catalog from CSV. Invalid rows and repeated ids are logged at
    /// warn level and skipped; the first row with a given id wins.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut items = Vec::new();
        let mut seen_ids = HashSet::new();
        for (row_idx, result) in csv_reader.deserialize::<CatalogRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, after the header

            match result {
                Ok(record) => match record.parse() {
                    Ok(item) => {
                        if !seen_ids.insert(item.id.clone()) {
                            warn!("Row {}: duplicate item id {}, ignoring", row_num, item.id);
                            continue;
                        }
                        debug!("Row {}: loaded item {}", row_num, item.id);
                        items.push(item);
                    }
                    Err(reason) => warn!("Row {}: skipping catalog item: {}", row_num, reason),
                },
                Err(e) => warn!("Row {}: CSV parse error: {}", row_num, e),
            }
        }

        Ok(Catalog { items })
    }

    /// The campus inventory shown on the browse page.
    pub fn campus() -> Self {
        use Category::*;

        Catalog::new(vec![
            CatalogItem::new(
                "bk-clrs",
                "Introduction to Algorithms (CLRS)",
                Books,
                &["algorithms", "clrs", "cormen", "textbook", "cs"],
                40,
                "vendor-library-club",
            ),
            CatalogItem::new(
                "bk-alg-unlocked",
                "Algorithms Unlocked",
                Books,
                &["algorithms", "textbook"],
                25,
                "vendor-library-club",
            ),
            CatalogItem::new(
                "bk-hcv",
                "Concepts of Physics by HC Verma",
                Books,
                &["physics", "verma", "hcverma", "textbook", "jee"],
                15,
                "vendor-ananya",
            ),
            CatalogItem::new(
                "calc-991ex",
                "Casio fx-991EX Scientific Calculator",
                Calculators,
                &["calculator", "casio", "scientific", "engineering", "exam"],
                15,
                "vendor-rohit",
            ),
            CatalogItem::new(
                "calc-ti84",
                "TI-84 Plus Graphing Calculator",
                Calculators,
                &["calculator", "graphing", "ti84", "statistics"],
                30,
                "vendor-rohit",
            ),
            CatalogItem::new(
                "lab-coat",
                "Chemistry Lab Coat (Medium)",
                LabEquipment,
                &["labcoat", "coat", "chemistry", "lab", "apron"],
                10,
                "vendor-ananya",
            ),
            CatalogItem::new(
                "lab-drafter",
                "Engineering Drawing Kit with Mini Drafter",
                LabEquipment,
                &["drafter", "drawing", "engineering", "graphics", "setsquare"],
                12,
                "vendor-meera",
            ),
            CatalogItem::new(
                "el-arduino",
                "Arduino Uno Starter Kit",
                Electronics,
                &["arduino", "microcontroller", "electronics", "kit", "iot"],
                35,
                "vendor-makers-hub",
            ),
            CatalogItem::new(
                "el-rpi4",
                "Raspberry Pi 4 (4GB)",
                Electronics,
                &["raspberry", "pi", "linux", "iot", "microcontroller"],
                45,
                "vendor-makers-hub",
            ),
            CatalogItem::new(
                "el-dslr",
                "Canon EOS 1500D DSLR Camera",
                Electronics,
                &["camera", "dslr", "canon", "photography"],
                150,
                "vendor-meera",
            ),
            CatalogItem::new(
                "sp-badminton",
                "Yonex Badminton Racket Pair",
                Sports,
                &["badminton", "racket", "yonex", "shuttle"],
                20,
                "vendor-sports-council",
            ),
            CatalogItem::new(
                "sp-cricket",
                "Cricket Kit with Bat and Pads",
                Sports,
                &["cricket", "bat", "pads", "tournament"],
                60,
                "vendor-sports-council",
            ),
            CatalogItem::new(
                "fn-table",
                "Foldable Study Table",
                Furniture,
                &["table", "desk", "study", "hostel"],
                25,
                "vendor-hostel-exchange",
            ),
            CatalogItem::new(
                "fn-lamp",
                "LED Study Lamp",
                Furniture,
                &["lamp", "light", "study", "led"],
                8,
                "vendor-hostel-exchange",
            ),
        ])
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
