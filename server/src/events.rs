use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Map-update notifications with synchronous fan-out to registered listeners.
///
/// Listeners receive no payload; they pull a fresh snapshot themselves.
#[derive(Clone, Default)]
pub struct MapEvents {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl MapEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_map_update(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// Call every listener in registration order.
    ///
    /// Listeners run without the registry lock held, so they may register
    /// further listeners; those are first called on the next emit. A panicking
    /// listener is logged and skipped.
    pub fn emit(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (index, listener) in listeners.iter().enumerate() {
            if panic::catch_unwind(AssertUnwindSafe(|| listener())).is_err() {
                tracing::error!("Map update listener #{} panicked", index);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_emit_calls_listeners_in_order() {
        let events = MapEvents::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let calls = calls.clone();
            events.on_map_update(move || calls.lock().unwrap().push(id));
        }

        events.emit();
        events.emit();

        assert_eq!(events.listener_count(), 3);
        assert_eq!(*calls.lock().unwrap(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_clones_share_listeners() {
        let events = MapEvents::new();
        let clone = events.clone();
        let hits = Arc::new(Mutex::new(0));

        let counter = hits.clone();
        clone.on_map_update(move || *counter.lock().unwrap() += 1);
        events.emit();

        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_listener_can_register_listener() {
        let events = MapEvents::new();
        let inner = events.clone();
        events.on_map_update(move || inner.on_map_update(|| {}));

        let (done_tx, done_rx) = mpsc::channel();
        let worker = events.clone();
        std::thread::spawn(move || {
            worker.emit();
            let _ = done_tx.send(());
        });

        assert!(
            done_rx.recv_timeout(Duration::from_secs(3)).is_ok(),
            "emit blocked while a listener registered another"
        );
        assert_eq!(events.listener_count(), 2);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_fan_out() {
        let events = MapEvents::new();
        let hits = Arc::new(Mutex::new(0));

        events.on_map_update(|| panic!("listener failure"));
        let counter = hits.clone();
        events.on_map_update(move || *counter.lock().unwrap() += 1);

        events.emit();
        events.emit();

        assert_eq!(*hits.lock().unwrap(), 2);
    }
}
