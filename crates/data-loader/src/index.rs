//! DataIndex building, joining and validation.
//!
//! Loading happens in three steps:
//! 1. Parse the three CSV files in parallel
//! 2. Insert records (company and customer ids must be unique) and compute
//!    per-item statistics
//! 3. Validate the join (every transaction must reference a known company
//!    and a known customer) and the numeric fields

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Locations of the three dataset files
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub companies: PathBuf,
    pub customers: PathBuf,
    pub transactions: PathBuf,
}

impl DatasetPaths {
    /// Default file names inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            companies: data_dir.join(parser::COMPANIES_FILE),
            customers: data_dir.join(parser::CUSTOMERS_FILE),
            transactions: data_dir.join(parser::TRANSACTIONS_FILE),
        }
    }
}

impl DataIndex {
    /// Load the dataset from the default file names in `data_dir`
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        Self::load_from_paths(&DatasetPaths::in_dir(data_dir))
    }

    /// Load, join and validate the dataset
    #[instrument(skip_all)]
    pub fn load_from_paths(paths: &DatasetPaths) -> Result<Self> {
        info!(?paths, "Loading wholesale dataset");

        let ((companies, customers), transactions) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_companies(&paths.companies),
                    || parser::parse_customers(&paths.customers),
                )
            },
            || parser::parse_transactions(&paths.transactions),
        );

        let companies = companies?;
        let customers = customers?;
        let transactions = transactions?;

        info!(
            companies = companies.len(),
            customers = customers.len(),
            transactions = transactions.len(),
            "Parsed dataset files"
        );

        let index = Self::from_records(companies, customers, transactions)?;
        info!("DataIndex successfully built and validated");
        Ok(index)
    }

    /// Build a validated index from already-parsed records
    ///
    /// Transaction order is preserved; it determines the order of item names
    /// in each customer's profile.
    pub fn from_records(
        companies: Vec<Company>,
        customers: Vec<Customer>,
        transactions: Vec<Transaction>,
    ) -> Result<Self> {
        let mut index = DataIndex::new();

        for company in companies {
            let id = company.company_id;
            if index.insert_company(company).is_some() {
                return Err(DataLoadError::DuplicateId {
                    entity: "company".to_string(),
                    id,
                });
            }
        }
        for customer in customers {
            let id = customer.customer_id;
            if index.insert_customer(customer).is_some() {
                return Err(DataLoadError::DuplicateId {
                    entity: "customer".to_string(),
                    id,
                });
            }
        }
        for transaction in transactions {
            index.insert_transaction(transaction);
        }

        index.validate()?;
        index.compute_item_stats();

        Ok(index)
    }

    /// Compute statistics for every distinct item name
    pub fn compute_item_stats(&mut self) {
        let mut by_item: HashMap<&str, Vec<&Transaction>> = HashMap::new();
        for transaction in &self.transactions {
            by_item
                .entry(transaction.item_name.as_str())
                .or_default()
                .push(transaction);
        }

        let item_stats = by_item
            .par_iter()
            .map(|(&item_name, transactions)| {
                let stats = ItemStats {
                    transaction_count: transactions.len() as u32,
                    total_quantity: transactions.iter().map(|t| t.quantity).sum(),
                    max_inventory_value: transactions
                        .iter()
                        .map(|t| t.inventory_value)
                        .fold(f64::NEG_INFINITY, f64::max),
                };
                (item_name.to_string(), stats)
            })
            .collect();

        self.item_stats = item_stats;
        debug!(items = self.item_stats.len(), "Computed item statistics");
    }

    /// Validate data integrity
    ///
    /// Checks, in dataset order, that each transaction:
    /// - references an existing company and customer
    /// - names an item
    /// - has finite, non-negative quantity, total amount and inventory value
    pub fn validate(&self) -> Result<()> {
        for (row, transaction) in self.transactions.iter().enumerate() {
            if !self.companies.contains_key(&transaction.company_id) {
                return Err(DataLoadError::IntegrityError {
                    entity: "company".to_string(),
                    id: transaction.company_id,
                    row,
                });
            }
            if !self.customers.contains_key(&transaction.customer_id) {
                return Err(DataLoadError::IntegrityError {
                    entity: "customer".to_string(),
                    id: transaction.customer_id,
                    row,
                });
            }
            if transaction.item_name.trim().is_empty() {
                return Err(DataLoadError::InvalidValue {
                    field: "item_name".to_string(),
                    value: transaction.item_name.clone(),
                    row,
                });
            }
            for (field, value) in [
                ("quantity", transaction.quantity),
                ("total_amount", transaction.total_amount),
                ("inventory_value", transaction.inventory_value),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(DataLoadError::InvalidValue {
                        field: field.to_string(),
                        value: value.to_string(),
                        row,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(id: CompanyId) -> Company {
        Company {
            company_id: id,
            name: format!("Company {id}"),
            location: "Austin".to_string(),
        }
    }

    fn customer(id: CustomerId) -> Customer {
        Customer {
            customer_id: id,
            name: format!("Customer {id}"),
            location: "Dallas".to_string(),
            business_type: "Retail".to_string(),
            credit_limit: Some(1000.0),
            company_id: None,
        }
    }

    fn transaction(customer_id: CustomerId, item: &str, quantity: f64, inventory: f64) -> Transaction {
        Transaction {
            transaction_id: None,
            customer_id,
            company_id: 1,
            item_name: item.to_string(),
            quantity,
            total_amount: quantity * 2.0,
            inventory_value: inventory,
        }
    }

    #[test]
    fn test_from_records_builds_item_stats() {
        let index = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1), customer(2)],
            vec![
                transaction(1, "Quinoa", 2.0, 100.0),
                transaction(2, "Quinoa", 3.0, 400.0),
                transaction(2, "Oatmeal", 1.0, 50.0),
            ],
        )
        .unwrap();

        let quinoa = index.get_item_stats("Quinoa").unwrap();
        assert_eq!(quinoa.transaction_count, 2);
        assert_eq!(quinoa.total_quantity, 5.0);
        assert_eq!(quinoa.max_inventory_value, 400.0);
        assert!(quinoa.is_available(400.0));
        assert!(!quinoa.is_available(400.5));

        let items: Vec<&str> = index.item_names().collect();
        assert_eq!(items, vec!["Oatmeal", "Quinoa"]);
    }

    #[test]
    fn test_customer_transactions_keep_dataset_order() {
        let index = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1)],
            vec![
                transaction(1, "Quinoa", 1.0, 0.0),
                transaction(1, "Almond Milk", 1.0, 0.0),
                transaction(1, "Quinoa", 1.0, 0.0),
            ],
        )
        .unwrap();

        let names: Vec<&str> = index
            .get_customer_transactions(1)
            .iter()
            .map(|t| t.item_name.as_str())
            .collect();
        assert_eq!(names, vec!["Quinoa", "Almond Milk", "Quinoa"]);
    }

    #[test]
    fn test_unknown_customer_is_integrity_error() {
        let err = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1)],
            vec![transaction(1, "Quinoa", 1.0, 0.0), transaction(7, "Quinoa", 1.0, 0.0)],
        )
        .unwrap_err();

        match err {
            DataLoadError::IntegrityError { entity, id, row } => {
                assert_eq!(entity, "customer");
                assert_eq!(id, 7);
                assert_eq!(row, 1);
            }
            other => panic!("expected IntegrityError, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_company_is_integrity_error() {
        let mut bad = transaction(1, "Quinoa", 1.0, 0.0);
        bad.company_id = 42;

        let err = DataIndex::from_records(vec![company(1)], vec![customer(1)], vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::IntegrityError { ref entity, id: 42, .. } if entity == "company"
        ));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1)],
            vec![transaction(1, "Quinoa", -1.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_invalid_value_reports_row() {
        let err = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1)],
            vec![
                transaction(1, "Quinoa", 1.0, 0.0),
                transaction(1, "Quinoa", 1.0, 0.0),
                transaction(1, "Quinoa", 1.0, f64::NAN),
            ],
        )
        .unwrap_err();

        match err {
            DataLoadError::InvalidValue { field, row, .. } => {
                assert_eq!(field, "inventory_value");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }

        let err = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1)],
            vec![transaction(1, "Quinoa", 1.0, 0.0), transaction(1, "  ", 1.0, 0.0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidValue { ref field, row: 1, .. } if field == "item_name"
        ));
        assert!(err.to_string().contains("transaction 1"));
    }

    #[test]
    fn test_duplicate_customer_id_rejected() {
        let err = DataIndex::from_records(
            vec![company(1)],
            vec![customer(1), customer(2), customer(1)],
            vec![transaction(1, "Quinoa", 1.0, 0.0)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DataLoadError::DuplicateId { ref entity, id: 1 } if entity == "customer"
        ));
    }

    #[test]
    fn test_duplicate_company_id_rejected() {
        let err = DataIndex::from_records(
            vec![company(3), company(3)],
            vec![customer(1)],
            vec![],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DataLoadError::DuplicateId { ref entity, id: 3 } if entity == "company"
        ));
    }

    #[test]
    fn test_load_dataset() {
        // Sample dataset shipped at the workspace root
        let data_dir = Path::new("../../data");

        if data_dir.exists() {
            let index = DataIndex::load_from_files(data_dir).unwrap();
            let (companies, customers, transactions) = index.counts();

            assert!(companies > 0);
            assert!(customers > 0);
            assert!(transactions > 0);
        }
    }
}
