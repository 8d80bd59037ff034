//! The fixed catalog of item names used when preparing transaction data.

/// Item labels a transaction's `item_name` is drawn from
pub const ITEM_CATALOG: [&str; 20] = [
    "Organic Apples",
    "Whole Grain Bread",
    "Almond Milk",
    "Free-Range Eggs",
    "Grass-Fed Beef",
    "Quinoa",
    "Fresh Spinach",
    "Avocado Oil",
    "Dark Chocolate",
    "Greek Yogurt",
    "Oatmeal",
    "Raw Honey",
    "Fresh Salmon",
    "Coconut Water",
    "Kale Chips",
    "Protein Powder",
    "Mixed Nuts",
    "Basmati Rice",
    "Spaghetti Pasta",
    "Extra Virgin Olive Oil",
];

/// Whether `name` is one of the catalog labels
pub fn is_catalog_item(name: &str) -> bool {
    ITEM_CATALOG.contains(&name)
}
