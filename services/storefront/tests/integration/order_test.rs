use wafi_auth_types::identity::Identity;
use wafi_domain::id::{OrderId, ProductId, UserId};
use wafi_domain::order::OrderStatus;
use wafi_domain::pagination::PageRequest;
use wafi_domain::product::ProductStatus;
use wafi_domain::user::UserRole;
use wafi_storefront::error::StorefrontError;
use wafi_storefront::usecase::order::{
    GetOrderUseCase, ListOrdersUseCase, OrderLineInput, PlaceOrderInput, PlaceOrderUseCase,
    UpdateOrderStatusUseCase,
};

use crate::helpers::{MockOrderRepo, MockProductRepo, contact, handoff, test_product};

fn products() -> MockProductRepo {
    let mut serum = test_product(1, "Sérum", 5, ProductStatus::Active);
    serum.price = 15_000;
    let mut casque = test_product(2, "Casque", 2, ProductStatus::Active);
    casque.price = 30_000;
    MockProductRepo::new(vec![
        serum,
        casque,
        test_product(3, "Épuisé", 0, ProductStatus::Active),
        test_product(4, "Archivé", 3, ProductStatus::Archived),
    ])
}

fn line(id: i32, quantity: u32) -> OrderLineInput {
    OrderLineInput {
        product_id: ProductId(id),
        quantity,
    }
}

fn place(orders: &MockOrderRepo) -> PlaceOrderUseCase<MockProductRepo, MockOrderRepo> {
    PlaceOrderUseCase {
        products: products(),
        orders: orders.clone(),
        handoff: handoff(),
    }
}

fn identity(user_id: UserId, role: UserRole) -> Identity {
    Identity { user_id, role }
}

// ── PlaceOrder ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_snapshot_lines_and_total_into_pending_order() {
    let orders = MockOrderRepo::default();
    let user_id = UserId::generate();

    let out = place(&orders)
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(1, 2), line(2, 1)],
            user_id: Some(user_id),
        })
        .await
        .unwrap();

    let order = &out.order;
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.user_id, Some(user_id));
    assert_eq!(order.total, 2 * 15_000 + 30_000);
    assert_eq!(order.items[0].name, "Sérum");
    assert_eq!(order.items[0].price, 15_000);
    assert_eq!(
        order.items[0].image_url.as_deref(),
        Some("https://img.example/1.jpg")
    );
    assert_eq!(orders.orders_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_hand_order_to_merchant_on_whatsapp() {
    let out = place(&MockOrderRepo::default())
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(2, 1)],
            user_id: None,
        })
        .await
        .unwrap();

    let (base, text) = out.whatsapp_url.split_once("?text=").unwrap();
    assert_eq!(base, "https://wa.me/221123456789");
    let text = urlencoding::decode(text).unwrap();
    assert!(text.contains("*Nouvelle Commande de Belleza*"));
    assert!(text.contains("*Client:* Awa Diop"));
    assert!(text.contains("*Casque* (x1)"));
    assert!(text.contains("http://localhost:5002/product/2"));
}

#[tokio::test]
async fn should_merge_repeated_lines_before_pricing() {
    let out = place(&MockOrderRepo::default())
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(1, 1), line(2, 1), line(1, 2)],
            user_id: None,
        })
        .await
        .unwrap();

    let lines: Vec<(i32, u32)> = out
        .order
        .items
        .iter()
        .map(|i| (i.product_id.0, i.quantity))
        .collect();
    assert_eq!(lines, vec![(1, 3), (2, 1)]);
}

#[tokio::test]
async fn should_refuse_out_of_stock_archived_or_unknown_products() {
    for id in [3, 4, 99] {
        let orders = MockOrderRepo::default();
        let result = place(&orders)
            .execute(PlaceOrderInput {
                customer: contact(),
                items: vec![line(1, 1), line(id, 1)],
                user_id: None,
            })
            .await;
        assert!(
            matches!(result, Err(StorefrontError::ProductUnavailable(p)) if p == ProductId(id)),
            "expected ProductUnavailable({id}), got {result:?}"
        );
        assert!(orders.orders_handle().lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn should_reject_zero_quantity_line() {
    let result = place(&MockOrderRepo::default())
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(1, 0)],
            user_id: None,
        })
        .await;
    let Err(StorefrontError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert_eq!(errors[0].field, "items");
}

#[tokio::test]
async fn should_reject_empty_order() {
    let result = place(&MockOrderRepo::default())
        .execute(PlaceOrderInput {
            customer: contact(),
            items: Vec::new(),
            user_id: None,
        })
        .await;
    assert!(matches!(result, Err(StorefrontError::EmptyOrder)));
}

#[tokio::test]
async fn should_reject_order_whose_total_overflows() {
    let mut luxe = test_product(1, "Montre", 5, ProductStatus::Active);
    luxe.price = 3_000_000_000;
    let orders = MockOrderRepo::default();
    let usecase = PlaceOrderUseCase {
        products: MockProductRepo::new(vec![luxe]),
        orders: orders.clone(),
        handoff: handoff(),
    };

    let result = usecase
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(1, u32::MAX)],
            user_id: None,
        })
        .await;

    let Err(StorefrontError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert_eq!(errors[0].field, "items");
    assert!(orders.orders_handle().lock().unwrap().is_empty());
}

// ── Read access ──────────────────────────────────────────────────────────────

async fn placed(orders: &MockOrderRepo, user_id: Option<UserId>) -> OrderId {
    place(orders)
        .execute(PlaceOrderInput {
            customer: contact(),
            items: vec![line(1, 1)],
            user_id,
        })
        .await
        .unwrap()
        .order
        .id
}

#[tokio::test]
async fn should_show_order_to_owner_and_admin_only() {
    let orders = MockOrderRepo::default();
    let owner = UserId::generate();
    let id = placed(&orders, Some(owner)).await;
    let usecase = GetOrderUseCase {
        repo: orders.clone(),
    };

    assert!(
        usecase
            .execute(id, &identity(owner, UserRole::Customer))
            .await
            .is_ok()
    );
    assert!(
        usecase
            .execute(id, &identity(UserId::generate(), UserRole::Admin))
            .await
            .is_ok()
    );
    let stranger = usecase
        .execute(id, &identity(UserId::generate(), UserRole::Customer))
        .await;
    assert!(matches!(stranger, Err(StorefrontError::Forbidden)));
}

#[tokio::test]
async fn should_show_guest_order_to_admin_only() {
    let orders = MockOrderRepo::default();
    let id = placed(&orders, None).await;
    let usecase = GetOrderUseCase {
        repo: orders.clone(),
    };

    let customer = usecase
        .execute(id, &identity(UserId::generate(), UserRole::Customer))
        .await;
    assert!(matches!(customer, Err(StorefrontError::Forbidden)));
    assert!(
        usecase
            .execute(id, &identity(UserId::generate(), UserRole::Admin))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn should_list_only_the_customers_own_orders() {
    let orders = MockOrderRepo::default();
    let awa = UserId::generate();
    placed(&orders, Some(awa)).await;
    placed(&orders, Some(awa)).await;
    placed(&orders, Some(UserId::generate())).await;
    placed(&orders, None).await;

    let usecase = ListOrdersUseCase {
        repo: orders.clone(),
    };
    let mine = usecase
        .execute(Some(awa), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    let all = usecase.execute(None, PageRequest::default()).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn should_move_order_to_confirmed() {
    let orders = MockOrderRepo::default();
    let id = placed(&orders, None).await;
    let usecase = UpdateOrderStatusUseCase {
        repo: orders.clone(),
    };

    let order = usecase.execute(id, OrderStatus::Confirmed).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);

    let missing = usecase
        .execute(OrderId::generate(), OrderStatus::Confirmed)
        .await;
    assert!(matches!(missing, Err(StorefrontError::OrderNotFound)));
}
