use chrono::{Duration as ChronoDuration, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use std::sync::Arc;
use stockflow::analytics::{customers, overview, sales};
use stockflow::{
  InventoryService, LineItem, MemoryStore, NewOrder, NewProduct, Order, OrderLifecycle, OrderStatus, PaymentMethod,
  Product,
};
use tokio::runtime::Runtime; // To run async code within Criterion
use uuid::Uuid;

// --- Fixtures ---

fn catalog(store: &MemoryStore, size: usize, quantity: i32) -> Vec<Product> {
  (0..size)
    .map(|i| {
      let product = NewProduct {
        title: format!("product_{}", i),
        category: format!("category_{}", i % 4),
        price: Decimal::new(1999, 2),
        quantity,
      }
      .into_product(Uuid::new_v4(), Utc::now());
      store.import_product(product.clone());
      product
    })
    .collect()
}

fn cart_for(products: &[Product]) -> Vec<LineItem> {
  products
    .iter()
    .map(|p| LineItem {
      product_id: p.id,
      title: p.title.clone(),
      unit_price: p.price,
      ordered_quantity: 1,
      category: p.category.clone(),
    })
    .collect()
}

fn checkout(method: PaymentMethod, cart: Vec<LineItem>) -> NewOrder {
  NewOrder {
    total_amount: cart.iter().map(LineItem::line_total).sum(),
    cart,
    payment_method: method,
    sub_total: None,
    shipping_cost: Decimal::ZERO,
    discount: Decimal::ZERO,
    user_id: Uuid::new_v4(),
    customer_name: None,
  }
}

/// Checkout already persisted, as the store would hand it back.
fn pending_order(method: PaymentMethod, cart: Vec<LineItem>) -> Order {
  let new_order = checkout(method, cart);
  let now = Utc::now();
  Order {
    id: Uuid::new_v4(),
    invoice: 1,
    sub_total: new_order.resolved_sub_total(),
    cart: new_order.cart,
    status: OrderStatus::Pending,
    payment_method: new_order.payment_method,
    shipping_cost: new_order.shipping_cost,
    discount: new_order.discount,
    total_amount: new_order.total_amount,
    user_id: new_order.user_id,
    customer_name: new_order.customer_name,
    created_at: now,
    updated_at: now,
  }
}

/// A year of history spread over `customers` users, every fourth order cancelled.
fn history(size: usize, customers: usize) -> Vec<Order> {
  let users: Vec<Uuid> = (0..customers).map(|_| Uuid::new_v4()).collect();
  let products: Vec<Uuid> = (0..50).map(|_| Uuid::new_v4()).collect();
  let now = Utc::now();
  (0..size)
    .map(|i| {
      let created_at = now - ChronoDuration::hours((i % (365 * 24)) as i64);
      let line = LineItem {
        product_id: products[i % products.len()],
        title: format!("product_{}", i % products.len()),
        unit_price: Decimal::new(2500, 2),
        ordered_quantity: (i % 3) as i32 + 1,
        category: format!("category_{}", i % 5),
      };
      let total = line.line_total();
      Order {
        id: Uuid::new_v4(),
        invoice: i as i64 + 1,
        cart: vec![line],
        status: if i % 4 == 0 {
          OrderStatus::Cancel
        } else {
          OrderStatus::Delivered
        },
        payment_method: if i % 2 == 0 { PaymentMethod::Cod } else { PaymentMethod::Card },
        sub_total: total,
        shipping_cost: Decimal::ZERO,
        discount: Decimal::ZERO,
        total_amount: total,
        user_id: users[i % users.len()],
        customer_name: None,
        created_at,
        updated_at: created_at,
      }
    })
    .collect()
}

// --- Benchmark Functions ---

fn bench_card_checkout(c: &mut Criterion) {
  let mut group = c.benchmark_group("CardCheckout");
  let rt = Runtime::new().unwrap();

  for cart_size in [1usize, 5, 20].iter() {
    group.throughput(Throughput::Elements(*cart_size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(cart_size), cart_size, |b, &size| {
      b.to_async(&rt).iter_batched(
        || {
          let store = Arc::new(MemoryStore::new());
          let products = catalog(&store, size, 1_000);
          let inventory = InventoryService::new(store.clone());
          let lifecycle = OrderLifecycle::new(store, inventory);
          (lifecycle, checkout(PaymentMethod::Card, cart_for(&products)))
        },
        |(lifecycle, order)| async move { lifecycle.create_order(order).await.unwrap() },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

fn bench_cod_delivery(c: &mut Criterion) {
  let mut group = c.benchmark_group("CodDelivery");
  let rt = Runtime::new().unwrap();

  group.throughput(Throughput::Elements(1));
  group.bench_function("pending_to_delivered", |b| {
    b.to_async(&rt).iter_batched(
      || {
        let store = Arc::new(MemoryStore::new());
        let products = catalog(&store, 5, 1_000);
        let inventory = InventoryService::new(store.clone());
        let lifecycle = OrderLifecycle::new(store.clone(), inventory);
        let order = pending_order(PaymentMethod::Cod, cart_for(&products));
        let order_id = order.id;
        store.import_order(order);
        (lifecycle, order_id)
      },
      |(lifecycle, order_id)| async move {
        lifecycle
          .change_status(order_id, OrderStatus::Delivered)
          .await
          .unwrap()
      },
      criterion::BatchSize::SmallInput,
    );
  });
  group.finish();
}

fn bench_report_aggregation(c: &mut Criterion) {
  let mut group = c.benchmark_group("ReportAggregation");

  for size in [1_000usize, 10_000].iter() {
    let orders = history(*size, size / 10);
    let now = Utc::now();
    group.throughput(Throughput::Elements(*size as u64));
    group.bench_with_input(BenchmarkId::new("business_overview", size), &orders, |b, orders| {
      b.iter(|| overview::compute(orders, now))
    });
    group.bench_with_input(BenchmarkId::new("sales_products", size), &orders, |b, orders| {
      b.iter(|| sales::compute(orders, Decimal::new(40, 2), 10))
    });
    group.bench_with_input(BenchmarkId::new("customer_insights", size), &orders, |b, orders| {
      b.iter(|| customers::compute(orders, now, 10))
    });
  }
  group.finish();
}

criterion_group!(benches, bench_card_checkout, bench_cod_delivery, bench_report_aggregation);
criterion_main!(benches);
