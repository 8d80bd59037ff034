//! # Data Loader Crate
//!
//! Loads, joins and validates the wholesale dataset: companies, customers
//! and their purchase transactions.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Company, Customer, Transaction, DataIndex)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Build the joined index, item statistics and integrity checks
//! - **catalog**: The fixed item-name catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let purchases = index.get_customer_transactions(1);
//! println!("Customer 1 made {} purchases", purchases.len());
//! ```

pub mod catalog;
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use catalog::ITEM_CATALOG;
pub use error::{DataLoadError, Result};
pub use index::DatasetPaths;
pub use types::{
    // Type aliases
    CompanyId,
    CustomerId,
    // Core types
    Company,
    Customer,
    DataIndex,
    ItemStats,
    Transaction,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (companies, customers, transactions) = index.counts();

        assert_eq!(companies, 0);
        assert_eq!(customers, 0);
        assert_eq!(transactions, 0);
    }

    #[test]
    fn test_insert_customer() {
        let mut index = DataIndex::new();

        index.insert_customer(Customer {
            customer_id: 1,
            name: "Acme Grocers".to_string(),
            location: "Austin".to_string(),
            business_type: "Retail".to_string(),
            credit_limit: Some(5000.0),
            company_id: None,
        });

        let retrieved = index.get_customer(1).unwrap();
        assert_eq!(retrieved.customer_id, 1);
        assert_eq!(retrieved.name, "Acme Grocers");
    }

    #[test]
    fn test_insert_transaction() {
        let mut index = DataIndex::new();

        index.insert_transaction(Transaction {
            transaction_id: Some(1),
            customer_id: 1,
            company_id: 1,
            item_name: "Raw Honey".to_string(),
            quantity: 4.0,
            total_amount: 36.0,
            inventory_value: 250.0,
        });

        assert_eq!(index.transactions().len(), 1);
        let purchases = index.get_customer_transactions(1);
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].item_name, "Raw Honey");
        assert_eq!(index.purchasing_customers().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_customer(999).is_none());
        assert!(index.get_company(999).is_none());
        assert!(index.get_customer_transactions(999).is_empty());
        assert!(index.get_item_stats("Quinoa").is_none());
    }
}
