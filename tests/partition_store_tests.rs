//! Partition store integration tests: provisioning, seeding, and the tenant
//! operations' invariants.

use anyhow::Result;
use chrono::Utc;

use posgate::repositories::{
    CategoryRepository, ConfigRepository, CreateProductRequest, OperatorRepository,
    ProductRepository, SaleOutcome, SaleRepository, StockRepository, UpdateProductRequest,
    config_entry::{DEFAULT_EXCHANGE_RATE, EXCHANGE_RATE_KEY},
};
use posgate::error::RepositoryError;
use posgate::models::product::Product;
use posgate::partition::PartitionId;
use posgate::store::PartitionStore;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{count_rows, provisioned_partition, setup_test_db, test_store};

async fn fixture_product(
    store: &PartitionStore,
    partition: &PartitionId,
    quantity: i32,
    price: i64,
) -> Result<Product> {
    let category = CategoryRepository::new(store, partition)
        .create("Fixtures")
        .await?;
    let product = ProductRepository::new(store, partition)
        .create(CreateProductRequest {
            name: "Fixture product".to_string(),
            price,
            quantity,
            category_id: category.id,
            image_path: None,
        })
        .await?;
    Ok(product)
}

#[tokio::test]
async fn initialize_twice_seeds_defaults_exactly_once() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = PartitionId::resolve("SEED-KEY");

    store.initialize(&partition).await?;
    store.initialize(&partition).await?;

    assert_eq!(count_rows(&db, &partition, "operators").await?, 1);
    assert_eq!(count_rows(&db, &partition, "categories").await?, 1);
    assert_eq!(count_rows(&db, &partition, "config_entries").await?, 1);
    Ok(())
}

#[tokio::test]
async fn seeded_admin_operator_authenticates() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "AUTH-KEY").await?;

    let repo = OperatorRepository::new(&store, &partition);

    let operator = repo.authenticate("admin", "admin").await?;
    assert_eq!(operator.unwrap().role, "admin");

    // Mismatches are quiet negative outcomes, not errors.
    assert!(repo.authenticate("admin", "wrong").await?.is_none());
    assert!(repo.authenticate("ghost", "admin").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn config_defaults_and_upsert() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "CONFIG-KEY").await?;

    let repo = ConfigRepository::new(&store, &partition);

    // Seeded exchange rate reads back as the documented default.
    assert_eq!(
        repo.get(EXCHANGE_RATE_KEY).await?.as_deref(),
        Some(DEFAULT_EXCHANGE_RATE)
    );

    // An unknown key with no documented default reads as absent.
    assert_eq!(repo.get("receipt_footer").await?, None);

    // Set-then-get round-trips, and repeated sets stay a single row.
    repo.set(EXCHANGE_RATE_KEY, "3100").await?;
    repo.set(EXCHANGE_RATE_KEY, "3200").await?;
    assert_eq!(repo.get(EXCHANGE_RATE_KEY).await?.as_deref(), Some("3200"));
    assert_eq!(count_rows(&db, &partition, "config_entries").await?, 1);

    repo.set("receipt_footer", "Thank you!").await?;
    assert_eq!(
        repo.get("receipt_footer").await?.as_deref(),
        Some("Thank you!")
    );
    Ok(())
}

#[tokio::test]
async fn stock_intake_increments_and_journals_atomically() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "INTAKE-KEY").await?;
    let product = fixture_product(&store, &partition, 0, 1500).await?;

    let stock = StockRepository::new(&store, &partition);
    let entry = stock.record_intake(product.id, 10).await?;

    assert_eq!(entry.quantity, 10);
    let product = ProductRepository::new(&store, &partition)
        .get(product.id)
        .await?;
    assert_eq!(product.quantity, 10);

    let journal = stock.journal().await?;
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].quantity, 10);
    assert_eq!(journal[0].product_name, "Fixture product");
    Ok(())
}

#[tokio::test]
async fn stock_intake_rejects_bad_input() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "INTAKE-BAD-KEY").await?;

    let stock = StockRepository::new(&store, &partition);

    let missing = stock.record_intake(Uuid::new_v4(), 5).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));

    let product = fixture_product(&store, &partition, 0, 100).await?;
    let non_positive = stock.record_intake(product.id, 0).await;
    assert!(matches!(non_positive, Err(RepositoryError::Validation(_))));

    // Neither attempt left a journal entry behind.
    assert_eq!(count_rows(&db, &partition, "stock_entries").await?, 0);
    Ok(())
}

#[tokio::test]
async fn sale_decrements_and_snapshots_price() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "SALE-KEY").await?;
    let product = fixture_product(&store, &partition, 5, 100).await?;

    let sales = SaleRepository::new(&store, &partition);
    let outcome = sales.sell(product.id, 3).await?;

    let sale = match outcome {
        SaleOutcome::Completed(sale) => sale,
        other => panic!("expected completed sale, got {:?}", other),
    };
    assert_eq!(sale.quantity, 3);
    assert_eq!(sale.unit_price, 100);

    let product = ProductRepository::new(&store, &partition)
        .get(product.id)
        .await?;
    assert_eq!(product.quantity, 2);
    Ok(())
}

#[tokio::test]
async fn oversell_changes_nothing() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "OVERSELL-KEY").await?;
    let product = fixture_product(&store, &partition, 2, 100).await?;

    let sales = SaleRepository::new(&store, &partition);
    let outcome = sales.sell(product.id, 10).await?;

    assert!(matches!(
        outcome,
        SaleOutcome::InsufficientStock {
            requested: 10,
            available: 2
        }
    ));

    let product = ProductRepository::new(&store, &partition)
        .get(product.id)
        .await?;
    assert_eq!(product.quantity, 2);
    assert_eq!(count_rows(&db, &partition, "sales").await?, 0);
    Ok(())
}

#[tokio::test]
async fn sale_of_unknown_product_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "SALE-MISS-KEY").await?;

    let sales = SaleRepository::new(&store, &partition);
    let result = sales.sell(Uuid::new_v4(), 1).await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn sales_report_orders_newest_first_and_keeps_snapshot_totals() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "REPORT-KEY").await?;
    let product = fixture_product(&store, &partition, 10, 250).await?;

    let sales = SaleRepository::new(&store, &partition);
    sales.sell(product.id, 2).await?;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    sales.sell(product.id, 3).await?;

    // A later price change must not rewrite already-recorded totals.
    ProductRepository::new(&store, &partition)
        .update(
            product.id,
            UpdateProductRequest {
                price: Some(999),
                ..Default::default()
            },
        )
        .await?;

    let today = Utc::now().date_naive();
    let rows = sales.report(today, today).await?;

    assert_eq!(rows.len(), 2);
    // Newest first: the 3-unit sale came second.
    assert_eq!(rows[0].quantity, 3);
    assert_eq!(rows[0].total, 3 * 250);
    assert_eq!(rows[1].quantity, 2);
    assert_eq!(rows[1].total, 2 * 250);
    assert!(rows[0].sold_at >= rows[1].sold_at);
    assert_eq!(rows[0].product_name, "Fixture product");
    Ok(())
}

#[tokio::test]
async fn sales_report_rejects_inverted_range() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "REPORT-RANGE-KEY").await?;

    let sales = SaleRepository::new(&store, &partition);
    let today = Utc::now().date_naive();
    let result = sales
        .report(today, today.pred_opt().unwrap_or(today))
        .await;

    assert!(matches!(result, Err(RepositoryError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn category_crud_and_unique_name() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "CATEGORY-KEY").await?;

    let repo = CategoryRepository::new(&store, &partition);

    let drinks = repo.create("Drinks").await?;
    let duplicate = repo.create("Drinks").await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    let renamed = repo.rename(drinks.id, "Cold Drinks").await?;
    assert_eq!(renamed.name, "Cold Drinks");

    // Seeded "General" plus the one created here.
    assert_eq!(repo.list().await?.len(), 2);

    repo.delete(drinks.id).await?;
    assert_eq!(repo.list().await?.len(), 1);

    let missing = repo.rename(drinks.id, "Gone").await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn product_crud_with_category_filter() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "PRODUCT-KEY").await?;

    let categories = CategoryRepository::new(&store, &partition);
    let food = categories.create("Food").await?;
    let drinks = categories.create("Drinks").await?;

    let products = ProductRepository::new(&store, &partition);
    products
        .create(CreateProductRequest {
            name: "Bread".to_string(),
            price: 500,
            quantity: 3,
            category_id: food.id,
            image_path: None,
        })
        .await?;
    let cola = products
        .create(CreateProductRequest {
            name: "Cola".to_string(),
            price: 700,
            quantity: 4,
            category_id: drinks.id,
            image_path: Some("images/cola.png".to_string()),
        })
        .await?;

    assert_eq!(products.list(None).await?.len(), 2);
    let filtered = products.list(Some(drinks.id)).await?;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Cola");

    let updated = products
        .update(
            cola.id,
            UpdateProductRequest {
                name: Some("Cola 0.5l".to_string()),
                price: Some(750),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.name, "Cola 0.5l");
    assert_eq!(updated.price, 750);
    // Catalog updates never touch the stock level.
    assert_eq!(updated.quantity, 4);

    let missing_category = products
        .create(CreateProductRequest {
            name: "Orphan".to_string(),
            price: 100,
            quantity: 0,
            category_id: Uuid::new_v4(),
            image_path: None,
        })
        .await;
    assert!(matches!(missing_category, Err(RepositoryError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn referenced_rows_restrict_deletion() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "RESTRICT-KEY").await?;
    let product = fixture_product(&store, &partition, 5, 100).await?;

    let categories = CategoryRepository::new(&store, &partition);
    let products = ProductRepository::new(&store, &partition);

    // The category still owns a product.
    let category_delete = categories.delete(product.category_id).await;
    assert!(matches!(category_delete, Err(RepositoryError::Conflict(_))));

    // The product gains ledger history and becomes undeletable.
    SaleRepository::new(&store, &partition)
        .sell(product.id, 1)
        .await?;
    let product_delete = products.delete(product.id).await;
    assert!(matches!(product_delete, Err(RepositoryError::Conflict(_))));
    assert_eq!(count_rows(&db, &partition, "products").await?, 1);

    // A fresh product with no history deletes cleanly.
    let disposable = products
        .create(CreateProductRequest {
            name: "Disposable".to_string(),
            price: 10,
            quantity: 0,
            category_id: product.category_id,
            image_path: None,
        })
        .await?;
    products.delete(disposable.id).await?;
    Ok(())
}

#[tokio::test]
async fn operator_create_and_list() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);
    let partition = provisioned_partition(&store, "OPERATOR-KEY").await?;

    let repo = OperatorRepository::new(&store, &partition);
    repo.create("cashier", "till123", "cashier").await?;

    let duplicate = repo.create("cashier", "other", "cashier").await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    let operators = repo.list().await?;
    assert_eq!(operators.len(), 2);
    assert_eq!(operators[0].username, "admin");
    assert_eq!(operators[1].username, "cashier");

    assert!(repo.authenticate("cashier", "till123").await?.is_some());
    Ok(())
}
