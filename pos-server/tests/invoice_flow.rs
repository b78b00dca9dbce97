//! End-to-end invoicing workflow tests against an embedded database.
//! Run: cargo test -p pos-server --test invoice_flow

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use pos_server::auth::CurrentUser;
use pos_server::core::BusinessConfig;
use pos_server::db::define_schema;
use pos_server::db::models::{
    Bills, CustomerData, CustomerOverride, Invoice, InvoiceCreate, InvoiceFilter, InvoiceStatus,
    OrderCreate, OrderCustomer, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, Role,
    UserCreate,
};
use pos_server::db::repository::{
    InvoiceRepository, OrderRepository, SequenceRepository, UserRepository,
};
use pos_server::invoicing::InvoiceIssuer;
use pos_server::utils::AppError;

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    define_schema(&db).await.unwrap();
    (db, tmp)
}

fn business() -> BusinessConfig {
    BusinessConfig {
        name: "Mi Restaurante".to_string(),
        nit: "900000000-0".to_string(),
        address: "Dirección no configurada".to_string(),
        phone: None,
        email: None,
        default_customer_name: "CONSUMIDOR FINAL".to_string(),
        default_customer_nit: "222222222222".to_string(),
    }
}

fn cashier() -> CurrentUser {
    CurrentUser {
        id: "user:cashier1".to_string(),
        name: "Cashier One".to_string(),
        role: Role::Cashier,
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: "user:admin1".to_string(),
        name: "Admin One".to_string(),
        role: Role::Administrator,
    }
}

fn waiter() -> CurrentUser {
    CurrentUser {
        id: "user:waiter1".to_string(),
        name: "Waiter One".to_string(),
        role: Role::Waiter,
    }
}

/// Walk-in burger order: 2 x 10000 at 19% tax
fn burger_order() -> OrderCreate {
    OrderCreate {
        customer: OrderCustomer {
            user: None,
            name: String::new(),
            phone: String::new(),
            guests: 1,
        },
        items: vec![OrderItem {
            name: "Burger".to_string(),
            quantity: 2,
            price: 10000.0,
            code: Some("BRG-1".to_string()),
            tax_rate: 19.0,
            notes: None,
        }],
        bills: Bills {
            subtotal: 20000.0,
            tax: 3800.0,
            total: 23800.0,
        },
        table: None,
        waiter: None,
        notes: None,
    }
}

fn create_request(order_id: &surrealdb::RecordId) -> InvoiceCreate {
    InvoiceCreate {
        order_id: Some(order_id.clone()),
        payment_method: Some(PaymentMethod::Cash),
        payment_type: None,
        customer_data: None,
        is_electronic: false,
        notes: None,
    }
}

#[tokio::test]
async fn numbers_start_at_one_and_increment() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let first = orders.create(burger_order()).await.unwrap();
    let second = orders.create(burger_order()).await.unwrap();

    let (inv1, _) = issuer
        .create(&cashier(), create_request(first.id.as_ref().unwrap()))
        .await
        .unwrap();
    let (inv2, _) = issuer
        .create(&cashier(), create_request(second.id.as_ref().unwrap()))
        .await
        .unwrap();

    assert_eq!(inv1.invoice_number, "F-0001");
    assert_eq!(inv2.invoice_number, "F-0002");
}

#[tokio::test]
async fn walk_in_snapshot_uses_consumer_defaults() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let (invoice, _) = issuer
        .create(&cashier(), create_request(order.id.as_ref().unwrap()))
        .await
        .unwrap();

    assert_eq!(invoice.customer.name, "CONSUMIDOR FINAL");
    assert_eq!(invoice.customer.nit, "222222222222");
    assert!(invoice.customer.user.is_none());

    assert_eq!(invoice.issuer.business_name, "Mi Restaurante");
    assert_eq!(invoice.issuer.nit, "900000000-0");
    assert_eq!(invoice.issuer.address, "Dirección no configurada");

    assert_eq!(invoice.items.len(), 1);
    let line = &invoice.items[0];
    assert_eq!(line.description, "Burger");
    assert_eq!(line.quantity, 2);
    assert_eq!(line.code, "BRG-1");
    assert_eq!(line.unit_price, 10000.0);
    assert_eq!(line.subtotal, 20000.0);
    assert_eq!(line.tax_rate, 19.0);
    assert_eq!(line.tax_amount, 3800.0);

    assert_eq!(invoice.totals.subtotal, 20000.0);
    assert_eq!(invoice.totals.total_tax, 3800.0);
    assert_eq!(invoice.totals.total, 23800.0);
    assert_eq!(invoice.status, InvoiceStatus::Issued);
}

#[tokio::test]
async fn totals_copied_verbatim_even_when_inconsistent() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let mut request = burger_order();
    request.bills = Bills {
        subtotal: 1.0,
        tax: 2.0,
        total: 999.0,
    };
    let order = orders.create(request).await.unwrap();

    let (invoice, _) = issuer
        .create(&cashier(), create_request(order.id.as_ref().unwrap()))
        .await
        .unwrap();

    // Line-level amounts are derived, document totals are not
    assert_eq!(invoice.items[0].subtotal, 20000.0);
    assert_eq!(invoice.totals.subtotal, 1.0);
    assert_eq!(invoice.totals.total_tax, 2.0);
    assert_eq!(invoice.totals.total, 999.0);
}

#[tokio::test]
async fn registered_customer_snapshot_prefers_billing_data() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());
    let users = UserRepository::new(db.clone());

    let customer = users
        .create(UserCreate {
            name: "Jane Perez".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("3001234567".to_string()),
            password: "secret123".to_string(),
            role: Role::Customer,
            customer_data: Some(CustomerData {
                billing_name: Some("ACME SAS".to_string()),
                nit: Some("900123456-7".to_string()),
                address: Some("Calle 1 # 2-3".to_string()),
            }),
        })
        .await
        .unwrap();

    let mut request = burger_order();
    request.customer.user = customer.id.clone();
    let order = orders.create(request).await.unwrap();

    let (invoice, _) = issuer
        .create(&cashier(), create_request(order.id.as_ref().unwrap()))
        .await
        .unwrap();

    assert_eq!(invoice.customer.name, "ACME SAS");
    assert_eq!(invoice.customer.nit, "900123456-7");
    assert_eq!(invoice.customer.address.as_deref(), Some("Calle 1 # 2-3"));
    assert_eq!(invoice.customer.email.as_deref(), Some("jane@example.com"));
    assert_eq!(invoice.customer.user, customer.id);
}

#[tokio::test]
async fn request_override_snapshot_is_used_verbatim() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let mut request = create_request(order.id.as_ref().unwrap());
    request.customer_data = Some(CustomerOverride {
        name: "Pedro Gomez".to_string(),
        nit: None,
        address: None,
        phone: Some("3110000000".to_string()),
        email: None,
    });

    let (invoice, _) = issuer.create(&cashier(), request).await.unwrap();

    assert_eq!(invoice.customer.name, "Pedro Gomez");
    // Missing NIT falls back to the consumer default
    assert_eq!(invoice.customer.nit, "222222222222");
    assert_eq!(invoice.customer.phone.as_deref(), Some("3110000000"));
}

#[tokio::test]
async fn electronic_flag_is_carried_onto_the_invoice() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let mut request = create_request(order.id.as_ref().unwrap());
    request.is_electronic = true;

    let (invoice, _) = issuer.create(&cashier(), request).await.unwrap();
    assert!(invoice.electronic.is_electronic);
    // Fiscal fields stay empty until an integration fills them
    assert!(invoice.electronic.cufe.is_none());

    let plain = orders.create(burger_order()).await.unwrap();
    let (invoice, _) = issuer
        .create(&cashier(), create_request(plain.id.as_ref().unwrap()))
        .await
        .unwrap();
    assert!(!invoice.electronic.is_electronic);
}

#[tokio::test]
async fn issuing_marks_order_paid_and_links_invoice() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let (invoice, updated) = issuer
        .create(&cashier(), create_request(&order_id))
        .await
        .unwrap();

    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.order_status, OrderStatus::Paid);
    assert_eq!(updated.invoice, invoice.id);
    assert_eq!(invoice.order, order_id);
    assert_eq!(invoice.processed_by.to_string(), "user:cashier1");

    let reloaded = orders.find_by_id(&order_id.to_string()).await.unwrap().unwrap();
    assert_eq!(reloaded.invoice, invoice.id);
}

#[tokio::test]
async fn second_invoice_for_same_order_conflicts_without_writes() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let order_id = order.id.clone().unwrap();
    issuer
        .create(&cashier(), create_request(&order_id))
        .await
        .unwrap();

    let err = issuer
        .create(&cashier(), create_request(&order_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let all: Vec<Invoice> = db.query("SELECT * FROM invoice").await.unwrap().take(0).unwrap();
    assert_eq!(all.len(), 1);

    // The rejected attempt must not consume a number either
    let next = orders.create(burger_order()).await.unwrap();
    let (inv, _) = issuer
        .create(&cashier(), create_request(next.id.as_ref().unwrap()))
        .await
        .unwrap();
    assert_eq!(inv.invoice_number, "F-0002");
}

#[tokio::test]
async fn waiter_cannot_issue_and_nothing_is_written() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let err = issuer
        .create(&waiter(), create_request(&order_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let all: Vec<Invoice> = db.query("SELECT * FROM invoice").await.unwrap().take(0).unwrap();
    assert!(all.is_empty());

    let reloaded = orders.find_by_id(&order_id.to_string()).await.unwrap().unwrap();
    assert_eq!(reloaded.payment_status, PaymentStatus::Pending);
    assert_eq!(reloaded.order_status, OrderStatus::Pending);
    assert!(reloaded.invoice.is_none());
}

#[tokio::test]
async fn invoiced_order_conflicts_before_the_role_check() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let order_id = order.id.clone().unwrap();
    issuer
        .create(&cashier(), create_request(&order_id))
        .await
        .unwrap();

    // A waiter retrying an already-invoiced order sees the conflict,
    // not the role rejection
    let err = issuer
        .create(&waiter(), create_request(&order_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_fields_are_rejected_before_anything_else() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());

    let err = issuer
        .create(
            &cashier(),
            InvoiceCreate {
                order_id: None,
                payment_method: Some(PaymentMethod::Cash),
                payment_type: None,
                customer_data: None,
                is_electronic: false,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    let err = issuer
        .create(
            &cashier(),
            InvoiceCreate {
                order_id: Some("order:nope".parse().unwrap()),
                payment_method: None,
                payment_type: None,
                customer_data: None,
                is_electronic: false,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // With both fields present, an unknown order is a not-found
    let err = issuer
        .create(&cashier(), create_request(&"order:nope".parse().unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn voiding_reverts_the_order_and_is_terminal() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    let order = orders.create(burger_order()).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let (invoice, _) = issuer
        .create(&cashier(), create_request(&order_id))
        .await
        .unwrap();
    let invoice_id = invoice.id.clone().unwrap().to_string();

    // Non-admins cannot void
    let err = issuer
        .cancel(&cashier(), &invoice_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let voided = issuer
        .cancel(&admin(), &invoice_id, Some("customer complaint".to_string()))
        .await
        .unwrap();
    assert_eq!(voided.status, InvoiceStatus::Voided);
    assert_eq!(voided.notes.as_deref(), Some("customer complaint"));

    let reverted = orders.find_by_id(&order_id.to_string()).await.unwrap().unwrap();
    assert_eq!(reverted.payment_status, PaymentStatus::Pending);
    assert_eq!(reverted.order_status, OrderStatus::Delivered);
    // The link survives so the order cannot be re-invoiced
    assert_eq!(reverted.invoice, voided.id);

    let err = issuer
        .cancel(&admin(), &invoice_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn list_filters_and_customer_history() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());
    let users = UserRepository::new(db.clone());
    let invoices = InvoiceRepository::new(db.clone());

    let customer = users
        .create(UserCreate {
            name: "Jane Perez".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            password: "secret123".to_string(),
            role: Role::Customer,
            customer_data: Some(CustomerData {
                billing_name: None,
                nit: Some("900123456-7".to_string()),
                address: None,
            }),
        })
        .await
        .unwrap();

    // Two registered-customer invoices and one walk-in
    for _ in 0..2 {
        let mut request = burger_order();
        request.customer.user = customer.id.clone();
        let order = orders.create(request).await.unwrap();
        issuer
            .create(&cashier(), create_request(order.id.as_ref().unwrap()))
            .await
            .unwrap();
    }
    let walk_in = orders.create(burger_order()).await.unwrap();
    let (walk_in_invoice, _) = issuer
        .create(&cashier(), create_request(walk_in.id.as_ref().unwrap()))
        .await
        .unwrap();
    issuer
        .cancel(
            &admin(),
            &walk_in_invoice.id.clone().unwrap().to_string(),
            None,
        )
        .await
        .unwrap();

    let by_nit = invoices
        .find_filtered(InvoiceFilter {
            customer_nit: Some("900123456-7".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_nit.len(), 2);

    let voided = invoices
        .find_filtered(InvoiceFilter {
            status: Some(InvoiceStatus::Voided),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(voided.len(), 1);
    assert_eq!(voided[0].invoice_number, walk_in_invoice.invoice_number);

    let limited = invoices
        .find_filtered(InvoiceFilter {
            limit: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let history = invoices
        .find_by_customer(customer.id.as_ref().unwrap())
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert!(history[0].invoice_date >= history[1].invoice_date);
}

#[tokio::test]
async fn sequence_seeds_from_existing_invoices() {
    let (db, _tmp) = test_db().await;
    let issuer = InvoiceIssuer::new(db.clone(), business());
    let orders = OrderRepository::new(db.clone());

    db.query(
        "CREATE invoice SET invoiceNumber = 'F-0042', createdAt = '2026-01-01T00:00:00.000Z'",
    )
    .await
    .unwrap();

    InvoiceIssuer::seed_sequence(&db).await.unwrap();
    let sequences = SequenceRepository::new(db.clone());
    assert_eq!(sequences.current("invoice").await.unwrap(), Some(42));

    let order = orders.create(burger_order()).await.unwrap();
    let (invoice, _) = issuer
        .create(&cashier(), create_request(order.id.as_ref().unwrap()))
        .await
        .unwrap();
    assert_eq!(invoice.invoice_number, "F-0043");
}

#[tokio::test]
async fn concurrent_issuance_yields_unique_sequential_numbers() {
    let (db, _tmp) = test_db().await;
    let orders = OrderRepository::new(db.clone());

    let mut order_ids = Vec::new();
    for _ in 0..8 {
        let order = orders.create(burger_order()).await.unwrap();
        order_ids.push(order.id.unwrap());
    }

    let tasks = order_ids.into_iter().map(|order_id| {
        let db = db.clone();
        async move {
            let issuer = InvoiceIssuer::new(db, business());
            issuer.create(&cashier(), create_request(&order_id)).await
        }
    });
    let results = futures::future::join_all(tasks).await;

    let mut numbers: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().0.invoice_number)
        .collect();
    numbers.sort();

    let expected: Vec<String> = (1..=8).map(|n| format!("F-{:04}", n)).collect();
    assert_eq!(numbers, expected);
}
