use chrono::Utc;

use wafi_domain::id::{ProductId, UserId};
use wafi_domain::product::ProductStatus;
use wafi_storefront::domain::types::Reservation;
use wafi_storefront::error::StorefrontError;
use wafi_storefront::usecase::product::{EditProductUseCase, UpdateStockUseCase};

use crate::helpers::{MockProductRepo, MockReservationRepo, MockStockRepo, draft, test_product};

fn waiting(product_id: i32, users: &[UserId]) -> Vec<Reservation> {
    users
        .iter()
        .map(|&user_id| Reservation {
            product_id: ProductId(product_id),
            user_id,
            created_at: Utc::now(),
        })
        .collect()
}

fn update_stock(
    products: &MockProductRepo,
    reservations: &MockReservationRepo,
) -> UpdateStockUseCase<MockStockRepo> {
    UpdateStockUseCase {
        stock: MockStockRepo::sharing(products, reservations),
    }
}

#[tokio::test]
async fn should_notify_every_waiting_customer_when_stock_returns() {
    let users = [UserId::generate(), UserId::generate(), UserId::generate()];
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &users));

    update_stock(&products, &reservations)
        .execute(ProductId(1), 10)
        .await
        .unwrap();

    let notifications = reservations.notifications_handle();
    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 3);
    for user_id in users {
        let n = notifications
            .iter()
            .find(|n| n.user_id == user_id)
            .unwrap_or_else(|| panic!("no notification for {user_id}"));
        assert_eq!(n.product_id, ProductId(1));
        assert!(!n.read);
        assert!(n.message.contains("\"Crème\""));
    }
    assert!(reservations.reservations_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_leave_other_products_reservations_alone() {
    let products = MockProductRepo::new(vec![
        test_product(1, "Crème", 0, ProductStatus::Active),
        test_product(2, "Sérum", 0, ProductStatus::Active),
    ]);
    let mut waiting_list = waiting(1, &[UserId::generate()]);
    waiting_list.extend(waiting(2, &[UserId::generate(), UserId::generate()]));
    let reservations = MockReservationRepo::new(waiting_list);

    update_stock(&products, &reservations)
        .execute(ProductId(1), 2)
        .await
        .unwrap();

    assert_eq!(reservations.notifications_handle().lock().unwrap().len(), 1);
    let left = reservations.reservations_handle();
    let left = left.lock().unwrap();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|r| r.product_id == ProductId(2)));
}

#[tokio::test]
async fn should_not_fan_out_when_stock_was_already_positive() {
    let users = [UserId::generate()];
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 3, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &users));

    update_stock(&products, &reservations)
        .execute(ProductId(1), 8)
        .await
        .unwrap();

    assert!(reservations.notifications_handle().lock().unwrap().is_empty());
    assert_eq!(reservations.reservations_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_not_fan_out_when_stock_stays_at_zero() {
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &[UserId::generate()]));

    update_stock(&products, &reservations)
        .execute(ProductId(1), -5)
        .await
        .unwrap();

    assert!(reservations.notifications_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_consume_reservations_exactly_once() {
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &[UserId::generate()]));
    let usecase = update_stock(&products, &reservations);

    usecase.execute(ProductId(1), 4).await.unwrap();
    usecase.execute(ProductId(1), 0).await.unwrap();
    usecase.execute(ProductId(1), 4).await.unwrap();

    assert_eq!(reservations.notifications_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_notify_when_full_edit_restocks_product() {
    let users = [UserId::generate(), UserId::generate()];
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &users));
    let usecase = EditProductUseCase {
        stock: MockStockRepo::sharing(&products, &reservations),
    };

    let product = usecase
        .execute(ProductId(1), draft("Crème hydratante", 6))
        .await
        .unwrap();

    assert_eq!(product.name, "Crème hydratante");
    let notifications = reservations.notifications_handle();
    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications[0].message.contains("Crème hydratante"));
}

#[tokio::test]
async fn should_keep_stock_and_reservations_when_notifying_fails() {
    let users = [UserId::generate()];
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &users));
    let stock = MockStockRepo::sharing(&products, &reservations);
    let usecase = UpdateStockUseCase {
        stock: stock.clone(),
    };

    stock.fail_next_notify();
    let result = usecase.execute(ProductId(1), 5).await;
    assert!(
        matches!(result, Err(StorefrontError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    assert_eq!(products.products_handle().lock().unwrap()[0].stock, 0);
    assert_eq!(reservations.reservations_handle().lock().unwrap().len(), 1);
    assert!(reservations.notifications_handle().lock().unwrap().is_empty());

    // Retrying the same update still sees the 0 -> 5 transition.
    let product = usecase.execute(ProductId(1), 5).await.unwrap();
    assert_eq!(product.stock, 5);
    assert!(reservations.reservations_handle().lock().unwrap().is_empty());
    assert_eq!(reservations.notifications_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_reservation_once_restock_committed() {
    use wafi_storefront::usecase::reservation::ReserveProductUseCase;

    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::default();
    let stock = MockStockRepo::sharing(&products, &reservations);
    let reserve = ReserveProductUseCase {
        stock: stock.clone(),
    };

    reserve
        .execute(ProductId(1), UserId::generate())
        .await
        .unwrap();
    UpdateStockUseCase { stock }
        .execute(ProductId(1), 2)
        .await
        .unwrap();
    let late = reserve.execute(ProductId(1), UserId::generate()).await;

    assert!(matches!(late, Err(StorefrontError::ProductInStock)));
    assert!(reservations.reservations_handle().lock().unwrap().is_empty());
    assert_eq!(reservations.notifications_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_surface_restock_in_customer_unread_count() {
    use wafi_storefront::usecase::notification::CountUnreadUseCase;

    use crate::helpers::MockNotificationRepo;

    let user_id = UserId::generate();
    let products = MockProductRepo::new(vec![test_product(1, "Crème", 0, ProductStatus::Active)]);
    let reservations = MockReservationRepo::new(waiting(1, &[user_id]));
    let unread = CountUnreadUseCase {
        repo: MockNotificationRepo::sharing(&reservations),
    };
    assert_eq!(unread.execute(user_id).await.unwrap(), 0);

    update_stock(&products, &reservations)
        .execute(ProductId(1), 1)
        .await
        .unwrap();

    assert_eq!(unread.execute(user_id).await.unwrap(), 1);
}
