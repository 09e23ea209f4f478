use wafi_domain::id::{ProductId, UserId};
use wafi_domain::product::ProductStatus;
use wafi_storefront::error::StorefrontError;
use wafi_storefront::usecase::reservation::{
    ClearReservationsUseCase, ListReservationsUseCase, ReserveProductUseCase,
};

use crate::helpers::{MockProductRepo, MockReservationRepo, MockStockRepo, test_product};

fn products() -> MockProductRepo {
    MockProductRepo::new(vec![
        test_product(1, "Crème", 0, ProductStatus::Active),
        test_product(2, "Sérum", 5, ProductStatus::Active),
        test_product(3, "Retiré", 0, ProductStatus::Deleted),
        test_product(4, "Archivé", 0, ProductStatus::Archived),
    ])
}

fn reserve(reservations: &MockReservationRepo) -> ReserveProductUseCase<MockStockRepo> {
    ReserveProductUseCase {
        stock: MockStockRepo::sharing(&products(), reservations),
    }
}

// ── ReserveProduct ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reserve_out_of_stock_product_once() {
    let reservations = MockReservationRepo::default();
    let user_id = UserId::generate();

    let first = reserve(&reservations)
        .execute(ProductId(1), user_id)
        .await
        .unwrap();
    let second = reserve(&reservations)
        .execute(ProductId(1), user_id)
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(reservations.reservations_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_return_stored_reservation_on_repeat() {
    let reservations = MockReservationRepo::default();
    let user_id = UserId::generate();

    let first = reserve(&reservations)
        .execute(ProductId(1), user_id)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let again = reserve(&reservations)
        .execute(ProductId(1), user_id)
        .await
        .unwrap();

    assert!(!again.created);
    assert_eq!(again.reservation, first.reservation);
}

#[tokio::test]
async fn should_refuse_reservation_while_in_stock() {
    let result = reserve(&MockReservationRepo::default())
        .execute(ProductId(2), UserId::generate())
        .await;
    assert!(
        matches!(result, Err(StorefrontError::ProductInStock)),
        "expected ProductInStock, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_deleted_or_unknown_product_as_missing() {
    let usecase = reserve(&MockReservationRepo::default());

    let deleted = usecase.execute(ProductId(3), UserId::generate()).await;
    let unknown = usecase.execute(ProductId(42), UserId::generate()).await;

    assert!(matches!(deleted, Err(StorefrontError::ProductNotFound)));
    assert!(matches!(unknown, Err(StorefrontError::ProductNotFound)));
}

#[tokio::test]
async fn should_allow_reserving_archived_product() {
    let out = reserve(&MockReservationRepo::default())
        .execute(ProductId(4), UserId::generate())
        .await
        .unwrap();
    assert!(out.created);
}

// ── List / Clear ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_reservations_per_user_or_all() {
    let reservations = MockReservationRepo::default();
    let awa = UserId::generate();
    let moussa = UserId::generate();
    for user_id in [awa, moussa] {
        reserve(&reservations)
            .execute(ProductId(1), user_id)
            .await
            .unwrap();
    }
    reserve(&reservations)
        .execute(ProductId(4), awa)
        .await
        .unwrap();

    let usecase = ListReservationsUseCase {
        repo: reservations.clone(),
    };
    assert_eq!(usecase.execute(None).await.unwrap().len(), 3);
    let mine = usecase.execute(Some(awa)).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r.user_id == awa));
}

#[tokio::test]
async fn should_clear_product_reservations_without_notifying() {
    let reservations = MockReservationRepo::default();
    for _ in 0..3 {
        reserve(&reservations)
            .execute(ProductId(1), UserId::generate())
            .await
            .unwrap();
    }
    reserve(&reservations)
        .execute(ProductId(4), UserId::generate())
        .await
        .unwrap();

    let usecase = ClearReservationsUseCase {
        repo: reservations.clone(),
    };
    assert_eq!(usecase.execute(ProductId(1)).await.unwrap(), 3);
    assert_eq!(usecase.execute(ProductId(1)).await.unwrap(), 0);

    assert_eq!(reservations.reservations_handle().lock().unwrap().len(), 1);
    assert!(reservations.notifications_handle().lock().unwrap().is_empty());
}
