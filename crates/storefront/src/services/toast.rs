//! "Added to cart" notifications.
//!
//! The [`ChangeNotifier`] compares each cart snapshot with the one it saw
//! last and reports net additions. The [`ToastService`] runs a notifier
//! against a cart store's change feed and keeps the current toast, hiding it
//! again after the display duration.
//!
//! The notifier only reads snapshots; it never touches the cart.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serene_home_core::{Addition, CartSnapshot, LineItem, detect_additions};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Image shown when the added product has none.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// How long a toast stays visible unless superseded.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_millis(2800);

/// The toast currently offered to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    pub visible: bool,
    pub title: String,
    pub image: String,
    /// When the toast was raised. `None` until the first addition.
    pub shown_at: Option<DateTime<Utc>>,
}

impl NotificationEvent {
    fn from_addition(addition: &Addition) -> Self {
        let image = if addition.image.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            addition.image.clone()
        };

        Self {
            visible: true,
            title: addition.title(),
            image,
            shown_at: Some(Utc::now()),
        }
    }
}

/// Diffs successive cart snapshots, remembering only the last one.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    last: Option<Vec<LineItem>>,
}

impl ChangeNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// A notifier that treats `snapshot` as already seen.
    #[must_use]
    pub fn with_baseline(snapshot: &CartSnapshot) -> Self {
        Self {
            last: Some(snapshot.items.clone()),
        }
    }

    /// Record `snapshot` and return a notification if it added anything.
    ///
    /// The first snapshot only establishes the baseline, so a cart restored
    /// from storage does not announce its existing items.
    pub fn observe(&mut self, snapshot: &CartSnapshot) -> Option<NotificationEvent> {
        let previous = self.last.replace(snapshot.items.clone())?;
        detect_additions(&previous, &snapshot.items).map(|addition| {
            debug!(
                total_added = addition.total_added,
                product = %addition.name,
                "Detected cart addition"
            );
            NotificationEvent::from_addition(&addition)
        })
    }
}

/// Spawns the background task that drives toasts.
pub struct ToastService;

impl ToastService {
    /// Start watching `changes` and publishing toasts.
    ///
    /// The snapshot held by `changes` at call time becomes the baseline.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(
        mut changes: watch::Receiver<Arc<CartSnapshot>>,
        display_duration: Duration,
    ) -> ToastHandle {
        let notifier = ChangeNotifier::with_baseline(&changes.borrow_and_update());

        let (toast, current) = watch::channel(NotificationEvent::default());
        let task = tokio::spawn(run(notifier, changes, toast, display_duration));

        ToastHandle { current, task }
    }
}

/// Single owner of the notifier and the expiry deadline.
///
/// A new toast resets the deadline, so only the most recently scheduled
/// expiry ever fires.
async fn run(
    mut notifier: ChangeNotifier,
    mut changes: watch::Receiver<Arc<CartSnapshot>>,
    toast: watch::Sender<NotificationEvent>,
    display_duration: Duration,
) {
    let expiry = sleep(display_duration);
    tokio::pin!(expiry);
    let mut pending = false;

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    debug!("Cart store dropped; stopping toast service");
                    break;
                }
                let snapshot = Arc::clone(&changes.borrow_and_update());
                if let Some(event) = notifier.observe(&snapshot) {
                    toast.send_replace(event);
                    expiry.as_mut().reset(Instant::now() + display_duration);
                    pending = true;
                }
            }
            () = &mut expiry, if pending => {
                pending = false;
                toast.send_modify(|event| event.visible = false);
            }
        }
    }
}

/// Read side of a running [`ToastService`].
///
/// Dropping the handle stops the background task.
pub struct ToastHandle {
    current: watch::Receiver<NotificationEvent>,
    task: JoinHandle<()>,
}

impl ToastHandle {
    /// The toast as it stands now.
    #[must_use]
    pub fn current(&self) -> NotificationEvent {
        self.current.borrow().clone()
    }

    /// Receive every change to the toast.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationEvent> {
        self.current.clone()
    }
}

impl Drop for ToastHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serene_home_core::{Price, Product, ProductId};

    use super::*;
    use crate::services::CartStore;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn product(id: i32, name: &str, image: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from_units(100),
            image: image.to_string(),
        }
    }

    fn lamp() -> Product {
        product(2, "Minimalist Lamp", "/images/lamp.jpg")
    }

    #[test]
    fn test_notifier_first_observation_is_baseline() {
        let mut cart = serene_home_core::CartState::new();
        cart.add(&lamp());
        cart.add(&lamp());

        let mut notifier = ChangeNotifier::new();
        assert_eq!(notifier.observe(&cart.snapshot()), None);

        cart.add(&lamp());
        let event = notifier.observe(&cart.snapshot()).unwrap();
        assert!(event.visible);
        assert_eq!(event.title, "Minimalist Lamp added to cart");
        assert_eq!(event.image, "/images/lamp.jpg");
        assert!(event.shown_at.is_some());
    }

    #[test]
    fn test_notifier_with_baseline_reports_next_addition() {
        let mut cart = serene_home_core::CartState::new();
        cart.add(&lamp());

        let mut notifier = ChangeNotifier::with_baseline(&cart.snapshot());
        assert_eq!(notifier.observe(&cart.snapshot()), None);

        cart.add(&product(4, "Ceramic Mug Set", "/images/mug.webp"));
        let event = notifier.observe(&cart.snapshot()).unwrap();
        assert_eq!(event.title, "Ceramic Mug Set added to cart");
    }

    #[test]
    fn test_notifier_ignores_decrease() {
        let mut cart = serene_home_core::CartState::new();
        cart.add(&lamp());
        cart.add(&lamp());

        let mut notifier = ChangeNotifier::new();
        let _ = notifier.observe(&cart.snapshot());
        cart.update_quantity(ProductId::new(2), 1);
        assert_eq!(notifier.observe(&cart.snapshot()), None);
    }

    #[test]
    fn test_notifier_uses_placeholder_image() {
        let mut cart = serene_home_core::CartState::new();
        let mut notifier = ChangeNotifier::new();
        let _ = notifier.observe(&cart.snapshot());

        cart.add(&product(7, "Table Runner", ""));
        let event = notifier.observe(&cart.snapshot()).unwrap();
        assert_eq!(event.image, PLACEHOLDER_IMAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_shows_then_expires() {
        let store = CartStore::open(Arc::new(MemoryStore::new()));
        let toasts = ToastService::spawn(store.subscribe(), DEFAULT_DISPLAY_DURATION);
        let mut rx = toasts.subscribe();

        let start = Instant::now();
        store.add(&lamp());

        rx.changed().await.unwrap();
        let shown = rx.borrow_and_update().clone();
        assert!(shown.visible);
        assert_eq!(shown.title, "Minimalist Lamp added to cart");

        rx.changed().await.unwrap();
        let hidden = rx.borrow_and_update().clone();
        assert!(!hidden.visible);
        assert_eq!(hidden.title, shown.title);
        assert!(start.elapsed() >= DEFAULT_DISPLAY_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_toast_restarts_expiry() {
        let store = CartStore::open(Arc::new(MemoryStore::new()));
        let toasts = ToastService::spawn(store.subscribe(), DEFAULT_DISPLAY_DURATION);
        let mut rx = toasts.subscribe();

        store.add(&lamp());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().visible);

        sleep(Duration::from_millis(2000)).await;
        assert!(toasts.current().visible);

        let second = Instant::now();
        store.add(&product(4, "Ceramic Mug Set", "/images/mug.webp"));
        rx.changed().await.unwrap();
        let event = rx.borrow_and_update().clone();
        assert!(event.visible);
        assert_eq!(event.title, "Ceramic Mug Set added to cart");

        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().visible);
        assert!(second.elapsed() >= DEFAULT_DISPLAY_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restored_cart_does_not_notify() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(
                crate::services::CART_STORAGE_KEY,
                r#"{"items":[{"id":1,"name":"Aesthetic Vase","price":499,"image":"","quantity":3}]}"#,
            )
            .unwrap();

        let store = CartStore::open(storage);
        assert_eq!(store.snapshot().count, 3);
        let toasts = ToastService::spawn(store.subscribe(), DEFAULT_DISPLAY_DURATION);
        let rx = toasts.subscribe();

        sleep(Duration::from_secs(5)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(toasts.current(), NotificationEvent::default());

        store.update_quantity(ProductId::new(1), 1);
        sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_does_not_notify() {
        let store = CartStore::open(Arc::new(MemoryStore::new()));
        store.add(&lamp());
        let toasts = ToastService::spawn(store.subscribe(), DEFAULT_DISPLAY_DURATION);
        let rx = toasts.subscribe();

        store.clear();
        sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
        assert!(!toasts.current().visible);
    }
}
