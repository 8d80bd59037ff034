//! Core domain types for the wholesale dataset.
//!
//! Three tables feed the recommender:
//! - companies: the wholesale suppliers
//! - customers: the businesses buying from them
//! - transactions: one row per purchase, naming the item bought
//!
//! The `DataIndex` owns all three after they have been joined and validated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a customer
pub type CustomerId = u32;

/// Unique identifier for a wholesale company
pub type CompanyId = u32;

// =============================================================================
// Reference Tables
// =============================================================================

/// A wholesale company (supplier).
///
/// Unknown CSV columns are ignored when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub company_id: CompanyId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

/// A wholesale customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub credit_limit: Option<f64>,
    /// Home company, when the customers file carries one
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

// =============================================================================
// Transactions
// =============================================================================

/// A single purchase of one catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<u64>,
    pub customer_id: CustomerId,
    pub company_id: CompanyId,
    pub item_name: String,
    pub quantity: f64,
    pub total_amount: f64,
    /// Stock value recorded alongside the purchase; drives the inventory filter
    pub inventory_value: f64,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed per-item statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub transaction_count: u32,
    pub total_quantity: f64,
    /// Highest inventory value seen on any transaction for this item.
    ///
    /// An item is available at threshold `t` iff some transaction has
    /// `inventory_value >= t`, which is the same as `max_inventory_value >= t`.
    pub max_inventory_value: f64,
}

impl ItemStats {
    /// Whether any transaction for this item meets the inventory threshold
    pub fn is_available(&self, min_inventory: f64) -> bool {
        self.max_inventory_value >= min_inventory
    }
}

// =============================================================================
// DataIndex - The Joined In-Memory Dataset
// =============================================================================

/// Holds the three tables plus the lookups the recommender needs.
///
/// Built once at startup by [`DataIndex::load_from_files`] (or by hand in
/// tests) and never mutated once shared.
#[derive(Debug)]
pub struct DataIndex {
    pub(crate) companies: HashMap<CompanyId, Company>,
    pub(crate) customers: HashMap<CustomerId, Customer>,

    /// Every transaction in dataset order
    pub(crate) transactions: Vec<Transaction>,
    /// Transactions grouped by customer, dataset order preserved per group
    pub(crate) customer_transactions: BTreeMap<CustomerId, Vec<Transaction>>,

    // Precomputed statistics, keyed by item name in sorted order
    pub(crate) item_stats: BTreeMap<String, ItemStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            companies: HashMap::new(),
            customers: HashMap::new(),
            transactions: Vec::new(),
            customer_transactions: BTreeMap::new(),
            item_stats: BTreeMap::new(),
        }
    }

    pub fn get_company(&self, id: CompanyId) -> Option<&Company> {
        self.companies.get(&id)
    }

    pub fn get_customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(&id)
    }

    /// All transactions in dataset order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions of one customer in dataset order
    ///
    /// Returns an empty slice for customers without purchases.
    pub fn get_customer_transactions(&self, customer_id: CustomerId) -> &[Transaction] {
        self.customer_transactions
            .get(&customer_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Customers that have at least one transaction, ascending by id
    pub fn purchasing_customers(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.customer_transactions.keys().copied()
    }

    /// Distinct item names across all transactions, ascending
    pub fn item_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.item_stats.keys().map(|s| s.as_str())
    }

    pub fn get_item_stats(&self, item_name: &str) -> Option<&ItemStats> {
        self.item_stats.get(item_name)
    }

    /// Insert a company, returning the one previously stored under its id
    pub fn insert_company(&mut self, company: Company) -> Option<Company> {
        self.companies.insert(company.company_id, company)
    }

    /// Insert a customer, returning the one previously stored under its id
    pub fn insert_customer(&mut self, customer: Customer) -> Option<Customer> {
        self.customers.insert(customer.customer_id, customer)
    }

    /// Append a transaction and update the per-customer grouping
    ///
    /// Item statistics are not touched; call `compute_item_stats` once all
    /// transactions are in.
    pub fn insert_transaction(&mut self, transaction: Transaction) {
        self.customer_transactions
            .entry(transaction.customer_id)
            .or_default()
            .push(transaction.clone());
        self.transactions.push(transaction);
    }

    /// (companies, customers, transactions)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.companies.len(),
            self.customers.len(),
            self.transactions.len(),
        )
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
