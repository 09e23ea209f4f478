use wafi_domain::id::ProductId;
use wafi_domain::pagination::PageRequest;
use wafi_domain::product::ProductStatus;
use wafi_domain::user::UserRole;
use wafi_storefront::domain::types::ProductFilter;
use wafi_storefront::error::StorefrontError;
use wafi_storefront::usecase::product::{
    CreateProductUseCase, GetProductUseCase, ListCategoriesUseCase, ListProductsUseCase,
    PermanentDeleteProductUseCase, RestockLinkUseCase, SeedCatalogUseCase,
    SetProductStatusUseCase, UpdateStockUseCase,
};

use crate::helpers::{
    MockProductRepo, MockReservationRepo, MockStockRepo, MockUserRepo, draft, handoff,
    test_product, test_user,
};

fn catalog() -> MockProductRepo {
    MockProductRepo::new(vec![
        test_product(1, "Sérum", 4, ProductStatus::Active),
        test_product(2, "Crème", 0, ProductStatus::Active),
        test_product(3, "Ancien parfum", 2, ProductStatus::Archived),
        test_product(4, "Retiré", 1, ProductStatus::Deleted),
    ])
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_active_products_on_storefront() {
    let usecase = ListProductsUseCase { repo: catalog() };
    let products = usecase
        .execute(ProductFilter::storefront(None), None)
        .await
        .unwrap();
    let ids: Vec<i32> = products.iter().map(|p| p.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn should_list_every_status_for_admin() {
    let usecase = ListProductsUseCase { repo: catalog() };
    let products = usecase.execute(ProductFilter::admin(), None).await.unwrap();
    assert_eq!(products.len(), 4);
}

#[tokio::test]
async fn should_page_storefront_listing_when_requested() {
    let usecase = ListProductsUseCase { repo: catalog() };
    let page = PageRequest {
        per_page: 1,
        page: 2,
    };
    let products = usecase
        .execute(ProductFilter::storefront(None), Some(page))
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, ProductId(2));
}

#[tokio::test]
async fn should_group_active_products_into_category_summaries() {
    let mut products = vec![
        test_product(1, "Casque", 3, ProductStatus::Active),
        test_product(2, "Sérum", 3, ProductStatus::Active),
        test_product(3, "Rouge", 3, ProductStatus::Active),
        test_product(4, "Caché", 3, ProductStatus::Archived),
    ];
    products[0].category = "Électronique".to_string();
    products[2].category = "Accessoires".to_string();
    let usecase = ListCategoriesUseCase {
        repo: MockProductRepo::new(products),
    };

    let summaries = usecase.execute().await.unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Produits de Beauté", "Électronique", "Accessoires"]
    );
    assert!(summaries.iter().all(|s| s.product_count == 1));
}

// ── GetProduct ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_soft_deleted_product_from_customers_only() {
    let usecase = GetProductUseCase { repo: catalog() };

    let customer = usecase.execute(ProductId(4), false).await;
    assert!(matches!(customer, Err(StorefrontError::ProductNotFound)));

    let admin = usecase.execute(ProductId(4), true).await.unwrap();
    assert_eq!(admin.status, ProductStatus::Deleted);
}

#[tokio::test]
async fn should_still_show_archived_product_by_id() {
    let usecase = GetProductUseCase { repo: catalog() };
    let product = usecase.execute(ProductId(3), false).await.unwrap();
    assert_eq!(product.status, ProductStatus::Archived);
}

// ── CreateProduct ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_active_product_with_trimmed_fields() {
    let repo = MockProductRepo::default();
    let usecase = CreateProductUseCase { repo: repo.clone() };

    let mut input = draft("  Huile d'argan ", 5);
    input.image_urls.push("   ".to_string());
    let product = usecase.execute(input).await.unwrap();

    assert_eq!(product.name, "Huile d'argan");
    assert_eq!(product.image_urls.len(), 1);
    assert_eq!(product.status, ProductStatus::Active);
    assert_eq!(repo.products_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_product_with_negative_price() {
    let mut input = draft("Savon", 1);
    input.price = -10;
    let usecase = CreateProductUseCase {
        repo: MockProductRepo::default(),
    };

    let result = usecase.execute(input).await;
    let Err(StorefrontError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert_eq!(errors[0].field, "price");
}

// ── UpdateStock / status ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_negative_stock_as_zero() {
    let products = catalog();
    let usecase = UpdateStockUseCase {
        stock: MockStockRepo::sharing(&products, &MockReservationRepo::default()),
    };

    let product = usecase.execute(ProductId(1), -3).await.unwrap();
    assert_eq!(product.stock, 0);
    assert!(!product.in_stock());
}

#[tokio::test]
async fn should_return_not_found_when_updating_stock_of_unknown_product() {
    let usecase = UpdateStockUseCase {
        stock: MockStockRepo::sharing(&catalog(), &MockReservationRepo::default()),
    };
    let result = usecase.execute(ProductId(99), 3).await;
    assert!(matches!(result, Err(StorefrontError::ProductNotFound)));
}

#[tokio::test]
async fn should_restore_soft_deleted_product() {
    let usecase = SetProductStatusUseCase { repo: catalog() };
    let product = usecase
        .execute(ProductId(4), ProductStatus::Active)
        .await
        .unwrap();
    assert_eq!(product.status, ProductStatus::Active);
}

#[tokio::test]
async fn should_remove_product_permanently_once() {
    let products = catalog();
    let usecase = PermanentDeleteProductUseCase {
        repo: products.clone(),
    };

    usecase.execute(ProductId(2)).await.unwrap();
    assert!(
        products
            .products_handle()
            .lock()
            .unwrap()
            .iter()
            .all(|p| p.id != ProductId(2))
    );

    let again = usecase.execute(ProductId(2)).await;
    assert!(matches!(again, Err(StorefrontError::ProductNotFound)));
}

// ── RestockLink ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_build_restock_link_naming_the_signed_in_customer() {
    let user = test_user(UserRole::Customer);
    let usecase = RestockLinkUseCase {
        products: catalog(),
        users: MockUserRepo::new(vec![user.clone()]),
        handoff: handoff(),
    };

    let url = usecase.execute(ProductId(2), Some(user.id)).await.unwrap();
    assert!(url.starts_with("https://wa.me/221123456789?text="));
    let text = urlencoding::decode(url.split_once("text=").unwrap().1).unwrap();
    assert!(text.contains("Crème"));
    assert!(text.contains("Awa Diop"));
}

#[tokio::test]
async fn should_refuse_restock_link_for_deleted_product() {
    let usecase = RestockLinkUseCase {
        products: catalog(),
        users: MockUserRepo::default(),
        handoff: handoff(),
    };
    let result = usecase.execute(ProductId(4), None).await;
    assert!(matches!(result, Err(StorefrontError::ProductNotFound)));
}

// ── SeedCatalog ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_seed_only_an_empty_catalog() {
    let empty = MockProductRepo::default();
    let usecase = SeedCatalogUseCase { repo: empty.clone() };
    let inserted = usecase
        .execute(vec![draft("A", 1), draft("B", 0)])
        .await
        .unwrap();
    assert_eq!(inserted, 2);

    let again = usecase.execute(vec![draft("C", 1)]).await.unwrap();
    assert_eq!(again, 0);
    assert_eq!(empty.products_handle().lock().unwrap().len(), 2);
}
