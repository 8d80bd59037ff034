//! Profile Builder
//!
//! Turns the joined dataset into the two per-customer views the recommender
//! works from:
//! - a text profile: the customer's item names in dataset order, joined by a
//!   single space (a bag of words for the vectorizer)
//! - the customer × item quantity matrix: summed quantity per pair, 0 where
//!   the customer never bought the item

use data_loader::{CustomerId, DataIndex};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Items purchased by one customer, in dataset order
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub items: Vec<String>,
}

impl CustomerProfile {
    /// The profile as a single space-separated document
    pub fn text(&self) -> String {
        self.items.join(" ")
    }
}

/// Dense customer × item matrix of summed quantities.
///
/// Rows are customers in ascending id order, columns are item names in
/// ascending order.
#[derive(Debug, Clone)]
pub struct CustomerItemMatrix {
    customers: Vec<CustomerId>,
    items: Vec<String>,
    customer_rows: HashMap<CustomerId, usize>,
    /// Row-major, `customers.len() * items.len()` cells
    values: Vec<f64>,
}

impl CustomerItemMatrix {
    pub fn customers(&self) -> &[CustomerId] {
        &self.customers
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.customers.len(), self.items.len())
    }

    /// One customer's quantities, aligned with [`items`](Self::items)
    pub fn row(&self, customer_id: CustomerId) -> Option<&[f64]> {
        let row = *self.customer_rows.get(&customer_id)?;
        let width = self.items.len();
        Some(&self.values[row * width..(row + 1) * width])
    }
}

/// Everything the Profile Builder produces
#[derive(Debug, Clone)]
pub struct CustomerProfiles {
    /// One profile per purchasing customer, ascending by id
    pub profiles: Vec<CustomerProfile>,
    pub item_matrix: CustomerItemMatrix,
}

/// Build text profiles and the quantity matrix from a validated index
#[instrument(skip_all)]
pub fn build_profiles(data_index: &DataIndex) -> CustomerProfiles {
    let items: Vec<String> = data_index.item_names().map(str::to_string).collect();
    let item_columns: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(col, name)| (name.clone(), col))
        .collect();

    let customers: Vec<CustomerId> = data_index.purchasing_customers().collect();
    let customer_rows: HashMap<CustomerId, usize> = customers
        .iter()
        .enumerate()
        .map(|(row, &id)| (id, row))
        .collect();

    let width = items.len();
    let mut values = vec![0.0; customers.len() * width];
    let mut profiles = Vec::with_capacity(customers.len());

    for (row, &customer_id) in customers.iter().enumerate() {
        let transactions = data_index.get_customer_transactions(customer_id);
        let mut purchased = Vec::with_capacity(transactions.len());

        for transaction in transactions {
            // Every item name in a transaction is a column by construction
            if let Some(&col) = item_columns.get(&transaction.item_name) {
                values[row * width + col] += transaction.quantity;
            }
            purchased.push(transaction.item_name.clone());
        }

        profiles.push(CustomerProfile {
            customer_id,
            items: purchased,
        });
    }

    debug!(
        customers = customers.len(),
        items = width,
        "Built customer profiles and item matrix"
    );

    CustomerProfiles {
        profiles,
        item_matrix: CustomerItemMatrix {
            customers,
            items,
            customer_rows,
            values,
        },
    }
}
