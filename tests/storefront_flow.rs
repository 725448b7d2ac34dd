// Full shopper journey against a real store file:
// register → login → cart → checkout → advance → track → notifications

use std::sync::Arc;

use storefront::db::get_connection;
use storefront::{
    create_connection_pool_at, initialize_database, seed_catalog, AddToCartRequest, AppError,
    AppState, DomainError, OrderStatus, PaymentMethod, RegisterRequest, ShippingAddress,
    StoreConfig,
};

fn open_store(dir: &tempfile::TempDir) -> AppState {
    let pool = create_connection_pool_at(&dir.path().join("store.db"), 4, 5000).unwrap();
    {
        let conn = get_connection(&pool).unwrap();
        initialize_database(&conn).unwrap();
    }
    let state = AppState::from_pool(Arc::new(pool), StoreConfig::default());
    seed_catalog(&state.catalog_service).unwrap();
    state
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Mara Quinn".to_string(),
        line1: "14 Rope Walk".to_string(),
        line2: None,
        city: "Bristol".to_string(),
        postal_code: "BS1 4QA".to_string(),
        country: "GB".to_string(),
        phone: "+44 117 496 0000".to_string(),
    }
}

#[test]
fn shopper_journey() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_store(&dir);

    state
        .auth_service
        .register(RegisterRequest {
            email: "mara@example.com".to_string(),
            display_name: "Mara".to_string(),
            password: "harbour99".to_string(),
        })
        .unwrap();
    let session = state.auth_service.login("MARA@example.com", "harbour99").unwrap();
    let user = state.auth_service.current_user(&session.token).unwrap();

    let shoes = state.catalog_service.search("trail").unwrap().remove(0);
    let stock_before = shoes.stock;

    let item = state
        .cart_service
        .add_item(AddToCartRequest {
            user_id: user.id,
            product_id: shoes.id,
            size: "42".to_string(),
            color: "Grey".to_string(),
            quantity: 1,
        })
        .unwrap();
    state.cart_service.update_quantity(item.id, 2).unwrap();

    let preview = state.checkout_service.preview(user.id).unwrap();
    assert_eq!(preview.item_count, 2);
    assert_eq!(preview.subtotal_cents, 2 * shoes.effective_price_cents());
    assert_eq!(preview.shipping_cents, 0);

    let order = state
        .checkout_service
        .place_order(user.id, address(), PaymentMethod::Card { last4: "4242".to_string() })
        .unwrap();
    assert_eq!(order.total_cents, preview.total_cents);
    assert_eq!(state.cart_service.item_count(user.id).unwrap(), 0);
    assert_eq!(
        state.catalog_service.get_product(shoes.id).unwrap().stock,
        stock_before - 2
    );

    for expected in [OrderStatus::Confirmed, OrderStatus::Shipped, OrderStatus::Delivered] {
        assert_eq!(state.order_service.advance_status(order.id).unwrap(), expected);
    }
    assert!(matches!(
        state.order_service.advance_status(order.id),
        Err(AppError::Domain(DomainError::InvalidStateTransition(_)))
    ));

    let tracking = state.order_service.track_order(order.id).unwrap();
    assert_eq!(tracking.len(), 1);
    let line = &tracking[0];
    assert!(line.is_delivered);
    assert!(!line.is_cancelled);
    assert_eq!(line.current_status, OrderStatus::Delivered);
    assert!(line.stages.iter().all(|stage| stage.is_reached()));
    assert_eq!(line.size, "42");

    // placed + confirmed + shipped + delivered
    let inbox = state.notification_service.list(user.id).unwrap();
    assert_eq!(inbox.len(), 4);
    assert_eq!(state.notification_service.unread_count(user.id).unwrap(), 4);
    state.notification_service.mark_all_read(user.id).unwrap();
    assert_eq!(state.notification_service.unread_count(user.id).unwrap(), 0);
}

#[test]
fn cancelled_order_restocks_and_tracks_separately_per_variant() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_store(&dir);

    let user = state
        .auth_service
        .register(RegisterRequest {
            email: "ivo@example.com".to_string(),
            display_name: "Ivo".to_string(),
            password: "lantern7x".to_string(),
        })
        .unwrap();

    let shirt = state.catalog_service.search("oxford").unwrap().remove(0);
    for (size, color) in [("M", "White"), ("L", "Blue")] {
        state
            .cart_service
            .add_item(AddToCartRequest {
                user_id: user.id,
                product_id: shirt.id,
                size: size.to_string(),
                color: color.to_string(),
                quantity: 1,
            })
            .unwrap();
    }

    let order = state
        .checkout_service
        .place_order(user.id, address(), PaymentMethod::CashOnDelivery)
        .unwrap();
    state.order_service.advance_status(order.id).unwrap();
    state.order_service.cancel_order(order.id).unwrap();

    assert_eq!(state.catalog_service.get_product(shirt.id).unwrap().stock, shirt.stock);

    let tracking = state.order_service.track_user_orders(user.id).unwrap();
    assert_eq!(tracking.len(), 2);
    for line in &tracking {
        assert!(line.is_cancelled);
        assert!(!line.is_delivered);
        assert_eq!(line.current_status, OrderStatus::Cancelled);
        assert!(line.stages[1].is_reached());
        assert!(!line.stages[2].is_reached());
    }

    let details = state.order_service.get_order(order.id).unwrap();
    assert_eq!(details.order.status, OrderStatus::Cancelled);
    assert_eq!(details.items.len(), 2);
}

#[test]
fn checkout_with_empty_cart_fails() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_store(&dir);

    let user = state
        .auth_service
        .register(RegisterRequest {
            email: "noor@example.com".to_string(),
            display_name: "Noor".to_string(),
            password: "meadow123".to_string(),
        })
        .unwrap();

    let result = state
        .checkout_service
        .place_order(user.id, address(), PaymentMethod::Wallet);
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(state.order_service.list_orders(user.id).unwrap().is_empty());
}
