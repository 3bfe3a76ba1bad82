use common::{RobotStateStore, StatusValue};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::TickError;
use crate::events::MapEvents;
use crate::mock_map::MockMap;

/// Wall-clock period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives the mock robot: refreshes its status once per tick and notifies
/// map-update listeners.
///
/// Ticks never move the robot; movement only happens through [`SimulationLoop::step`].
pub struct SimulationLoop {
    map: Arc<RwLock<MockMap>>,
    state: Arc<RwLock<RobotStateStore>>,
    events: MapEvents,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationLoop {
    pub fn new(
        map: Arc<RwLock<MockMap>>,
        state: Arc<RwLock<RobotStateStore>>,
        events: MapEvents,
    ) -> Self {
        Self {
            map,
            state,
            events,
            period: TICK_PERIOD,
            task: Mutex::new(None),
        }
    }

    pub fn events(&self) -> &MapEvents {
        &self.events
    }

    /// Run one tick: mirror the store's status into the robot state, then notify.
    ///
    /// A store without a status attribute fails the tick and nothing is emitted.
    pub async fn tick(&self) -> Result<StatusValue, TickError> {
        let status = self
            .state
            .read()
            .await
            .status()
            .map(|s| s.value)
            .ok_or(TickError::MissingStatus)?;

        {
            let mut map = self.map.write().await;
            map.robot_mut().set_status(status);
        }

        // Listeners may read the map, so the write lock must be gone by now
        self.events.emit();

        tracing::debug!("Tick complete, status {:?}", status);
        Ok(status)
    }

    /// Advance the robot `distance` map units, optionally turning to `heading` first.
    pub async fn step(&self, distance: f64, heading: Option<f64>) -> (f64, f64) {
        let mut map = self.map.write().await;
        let robot = map.robot_mut();
        if let Some(heading) = heading {
            robot.set_heading(heading);
        }
        robot.step(distance);
        robot.position()
    }

    /// Spawn the periodic tick task. Does nothing if it is already running.
    pub fn start(self: &Arc<Self>) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let this = Arc::clone(self);
        *task = Some(tokio::spawn(async move { this.run().await }));
        tracing::info!("Simulation loop started ({:?} period)", self.period);
    }

    pub fn stop(&self) {
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
            tracing::info!("Simulation loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    async fn run(&self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; the first update is due one period in
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = self.tick().await {
                tracing::warn!("Skipping map update: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use common::state::{StateAttribute, StatusStateAttribute};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn simulation(store: RobotStateStore) -> Arc<SimulationLoop> {
        let map = MockMap::new(&MapConfig {
            width: 10,
            height: 10,
            ..MapConfig::default()
        });
        Arc::new(SimulationLoop::new(
            Arc::new(RwLock::new(map)),
            Arc::new(RwLock::new(store)),
            MapEvents::new(),
        ))
    }

    fn counter(events: &MapEvents) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        events.on_map_update(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[tokio::test]
    async fn test_tick_mirrors_status_and_notifies() {
        let sim = simulation(RobotStateStore::docked());
        let hits = counter(sim.events());

        sim.state
            .write()
            .await
            .upsert_first_matching_attribute(StateAttribute::Status(StatusStateAttribute::new(
                StatusValue::Cleaning,
            )));

        let status = sim.tick().await.unwrap();

        assert_eq!(status, StatusValue::Cleaning);
        assert_eq!(sim.map.read().await.robot().status(), StatusValue::Cleaning);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tick_does_not_move_robot() {
        let sim = simulation(RobotStateStore::docked());
        let before = sim.map.read().await.robot().clone();

        sim.tick().await.unwrap();
        sim.tick().await.unwrap();

        let map = sim.map.read().await;
        assert_eq!(map.robot().position(), before.position());
        assert!(map.robot().path().is_empty());
    }

    #[tokio::test]
    async fn test_missing_status_skips_emission() {
        let sim = simulation(RobotStateStore::new());
        let hits = counter(sim.events());

        let result = sim.tick().await;

        assert!(matches!(result, Err(TickError::MissingStatus)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(sim.map.read().await.robot().status(), StatusValue::Docked);
    }

    #[tokio::test]
    async fn test_listener_sees_completed_tick() {
        let mut store = RobotStateStore::docked();
        store.upsert_first_matching_attribute(StateAttribute::Status(StatusStateAttribute::new(
            StatusValue::Paused,
        )));
        let sim = simulation(store);

        let observed = Arc::new(Mutex::new(None));
        let map = sim.map.clone();
        let seen = observed.clone();
        sim.events().on_map_update(move || {
            let status = map.try_read().ok().map(|m| m.robot().status());
            *seen.lock().unwrap() = status;
        });

        sim.tick().await.unwrap();

        assert_eq!(*observed.lock().unwrap(), Some(StatusValue::Paused));
    }

    #[tokio::test]
    async fn test_step_moves_along_heading() {
        let sim = simulation(RobotStateStore::docked());

        let (x, y) = sim.step(20.0, None).await;
        assert!((x - 25.0).abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);

        let (x, _) = sim.step(10.0, Some(90.0)).await;
        assert!((x - 35.0).abs() < 1e-9);

        let snapshot = sim.map.read().await.get_map();
        assert_eq!(snapshot.path().unwrap().points.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop() {
        let sim = simulation(RobotStateStore::docked());
        let hits = counter(sim.events());

        sim.start();
        sim.start();
        assert!(sim.is_running());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let ticked = hits.load(Ordering::SeqCst);
        assert!(ticked >= 2, "expected periodic ticks, got {ticked}");

        sim.stop();
        assert!(!sim.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), ticked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_listener_keeps_loop_running() {
        let sim = simulation(RobotStateStore::docked());
        sim.events().on_map_update(|| panic!("listener failure"));
        let hits = counter(sim.events());

        sim.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(sim.is_running());
        assert!(hits.load(Ordering::SeqCst) >= 2);
        sim.stop();
    }
}
