//! Integration tests for the pipeline.
//!
//! These tests run profile building, similarity, neighborhood scoring and
//! inventory filtering together on a small dataset.

use data_loader::{Company, Customer, DataIndex, Transaction};
use pipeline::FilterPipeline;
use pipeline::filters::MinimumInventoryFilter;
use similarity::{NeighborhoodSource, RecommendationRequest, SimilarityMatrix, build_profiles};
use std::sync::Arc;

fn create_test_setup() -> (Arc<DataIndex>, NeighborhoodSource) {
    let companies = vec![Company {
        company_id: 1,
        name: "Fresh Wholesale".to_string(),
        location: "Austin".to_string(),
    }];

    let customers = (1..=4)
        .map(|id| Customer {
            customer_id: id,
            name: format!("Customer {id}"),
            location: "Dallas".to_string(),
            business_type: "Restaurant".to_string(),
            credit_limit: Some(2500.0),
            company_id: Some(1),
        })
        .collect();

    let rows = [
        // (customer, item, quantity, inventory value)
        (1, "Quinoa", 2.0, 300.0),
        (1, "Raw Honey", 1.0, 40.0),
        (2, "Quinoa", 5.0, 300.0),
        (2, "Raw Honey", 3.0, 40.0),
        (2, "Greek Yogurt", 4.0, 900.0),
        (3, "Kale Chips", 9.0, 10.0),
        (4, "Quinoa", 1.0, 300.0),
        (4, "Fresh Salmon", 6.0, 150.0),
    ];
    let transactions = rows
        .iter()
        .map(|&(customer_id, item, quantity, inventory_value)| Transaction {
            transaction_id: None,
            customer_id,
            company_id: 1,
            item_name: item.to_string(),
            quantity,
            total_amount: quantity * 3.0,
            inventory_value,
        })
        .collect();

    let index = Arc::new(DataIndex::from_records(companies, customers, transactions).unwrap());
    let built = build_profiles(&index);
    let matrix = SimilarityMatrix::from_profiles(&built.profiles);
    let source = NeighborhoodSource::new(Arc::new(matrix), Arc::new(built.item_matrix));

    (index, source)
}

#[test]
fn test_full_pipeline_ranks_and_filters() {
    let (index, source) = create_test_setup();
    let pipeline = FilterPipeline::new().add_filter(MinimumInventoryFilter::new(index.clone()));

    let request = RecommendationRequest::new(1).with_top_n(1);
    let candidates = source.get_candidates(&request).unwrap();

    // Customer 2 has the same profile words plus one more item; it is the single neighbor
    assert_eq!(candidates[0].item_name, "Quinoa");
    assert_eq!(candidates[0].score, 5.0);

    let filtered = pipeline.apply(candidates, &request).unwrap();
    let names: Vec<&str> = filtered.iter().map(|c| c.item_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Quinoa", "Greek Yogurt", "Raw Honey", "Fresh Salmon", "Kale Chips"]
    );
}

#[test]
fn test_inventory_threshold_drops_low_stock_items() {
    let (index, source) = create_test_setup();
    let pipeline = FilterPipeline::new().add_filter(MinimumInventoryFilter::new(index.clone()));

    let request = RecommendationRequest::new(1).with_top_n(3).with_min_inventory(200.0);
    let candidates = source.get_candidates(&request).unwrap();
    let filtered = pipeline.apply(candidates, &request).unwrap();

    for candidate in &filtered {
        let stats = index.get_item_stats(&candidate.item_name).unwrap();
        assert!(stats.max_inventory_value >= 200.0);
    }
    let names: Vec<&str> = filtered.iter().map(|c| c.item_name.as_str()).collect();
    assert!(names.contains(&"Quinoa"));
    assert!(names.contains(&"Greek Yogurt"));
    assert!(!names.contains(&"Raw Honey"));
}
