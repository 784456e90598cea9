//! Tests ensuring rows never leak between partitions.

use anyhow::Result;

use posgate::repositories::{CategoryRepository, CreateProductRequest, ProductRepository};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{provisioned_partition, setup_test_db, test_store};

#[tokio::test]
async fn products_are_invisible_across_partitions() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);

    let shop_a = provisioned_partition(&store, "ISOLATION-A").await?;
    let shop_b = provisioned_partition(&store, "ISOLATION-B").await?;
    assert_ne!(shop_a, shop_b);

    let category = CategoryRepository::new(&store, &shop_a)
        .create("Only in A")
        .await?;
    let product = ProductRepository::new(&store, &shop_a)
        .create(CreateProductRequest {
            name: "A-only product".to_string(),
            price: 100,
            quantity: 1,
            category_id: category.id,
            image_path: None,
        })
        .await?;

    // Partition B sees none of it.
    assert!(ProductRepository::new(&store, &shop_b)
        .list(None)
        .await?
        .is_empty());
    let cross_get = ProductRepository::new(&store, &shop_b).get(product.id).await;
    assert!(cross_get.is_err());

    // Partition A still does.
    assert_eq!(
        ProductRepository::new(&store, &shop_a).list(None).await?.len(),
        1
    );
    Ok(())
}

#[tokio::test]
async fn unique_names_are_scoped_to_their_partition() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);

    let shop_a = provisioned_partition(&store, "UNIQUE-A").await?;
    let shop_b = provisioned_partition(&store, "UNIQUE-B").await?;

    // The same category name may exist in both partitions; uniqueness only
    // binds within one.
    CategoryRepository::new(&store, &shop_a)
        .create("Beverages")
        .await?;
    CategoryRepository::new(&store, &shop_b)
        .create("Beverages")
        .await?;

    let duplicate = CategoryRepository::new(&store, &shop_a)
        .create("Beverages")
        .await;
    assert!(duplicate.is_err());
    Ok(())
}

#[tokio::test]
async fn both_partitions_carry_their_own_seeds() -> Result<()> {
    let db = setup_test_db().await?;
    let store = test_store(&db);

    let shop_a = provisioned_partition(&store, "SEEDS-A").await?;
    let shop_b = provisioned_partition(&store, "SEEDS-B").await?;

    for partition in [&shop_a, &shop_b] {
        let categories = CategoryRepository::new(&store, partition).list().await?;
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "General");
    }
    Ok(())
}
