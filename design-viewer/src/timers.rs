//! Scoped timers for component instances.
//!
//! Each mounted instance owns one [`TimerSet`]. Every pending timer is a
//! tokio task held through an abort-on-drop guard, so dropping the set
//! (unmount, remount, viewer shutdown) cancels everything it scheduled.
//! Firings are sent on a shared channel tagged with the owning instance.

use std::collections::HashMap;
use std::time::Duration;

use design_core::{Effect, InstanceId, ObjectId, TimerKey};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A timer firing addressed to one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEvent {
    /// Component the timer belongs to.
    pub object: ObjectId,
    /// Mount that scheduled it.
    pub instance: InstanceId,
    /// Which timer fired.
    pub key: TimerKey,
}

/// Aborts its task when dropped.
#[derive(Debug)]
struct TimerTask(JoinHandle<()>);

impl Drop for TimerTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Timers owned by one component instance.
#[derive(Debug)]
pub struct TimerSet {
    object: ObjectId,
    instance: InstanceId,
    tx: mpsc::UnboundedSender<TimerEvent>,
    tasks: HashMap<TimerKey, TimerTask>,
}

impl TimerSet {
    /// Create an empty set sending firings on `tx`.
    #[must_use]
    pub fn new(object: ObjectId, instance: InstanceId, tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            object,
            instance,
            tx,
            tasks: HashMap::new(),
        }
    }

    /// Instance that owns these timers.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Apply effects requested by a state machine.
    ///
    /// Must be called inside a tokio runtime.
    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::Schedule { key, delay, repeat } => self.schedule(key, delay, repeat),
                Effect::Cancel(key) => {
                    self.cancel(key);
                }
            }
        }
    }

    /// Start a timer, replacing any pending timer with the same key.
    pub fn schedule(&mut self, key: TimerKey, delay: Duration, repeat: bool) {
        let event = TimerEvent {
            object: self.object.clone(),
            instance: self.instance,
            key,
        };
        let tx = self.tx.clone();
        let handle = if repeat {
            // interval_at panics on a zero period
            let period = delay.max(Duration::from_millis(1));
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if tx.send(event.clone()).is_err() {
                        break;
                    }
                }
            })
        } else {
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(event);
            })
        };

        tracing::trace!(
            "Scheduled {key:?} for {} in {}ms (repeat: {repeat})",
            self.object,
            delay.as_millis()
        );
        self.tasks.insert(key, TimerTask(handle));
    }

    /// Cancel a timer. Returns whether one was pending.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.tasks
            .remove(&key)
            .is_some_and(|task| !task.0.is_finished())
    }

    /// Whether a timer is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.tasks.get(&key).is_some_and(|task| !task.0.is_finished())
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.0.is_finished()).count()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        if !self.tasks.is_empty() {
            tracing::debug!(
                "Cancelling {} timer(s) of {} ({})",
                self.tasks.len(),
                self.object,
                self.instance
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::millis;

    fn assert_near(elapsed: Duration, expected: Duration) {
        assert!(
            elapsed >= expected && elapsed < expected + millis(5),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    fn set() -> (TimerSet, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TimerSet::new(ObjectId::new("carousel"), InstanceId::new(), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once() {
        let (mut timers, mut rx) = set();
        let started = Instant::now();
        timers.schedule(TimerKey::CrossfadeMidpoint, millis(150), false);

        let event = rx.recv().await.expect("fired");
        assert_eq!(event.key, TimerKey::CrossfadeMidpoint);
        assert_eq!(event.instance, timers.instance());
        assert_near(started.elapsed(), millis(150));
        assert!(tokio::time::timeout(millis(1000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_timer_keeps_cadence() {
        let (mut timers, mut rx) = set();
        let started = Instant::now();
        timers.apply(&[Effect::Schedule {
            key: TimerKey::AutoPlay,
            delay: millis(3000),
            repeat: true,
        }]);

        for tick in 1..=3u32 {
            rx.recv().await.expect("tick");
            assert_near(started.elapsed(), millis(3000) * tick);
        }
        assert!(timers.is_pending(TimerKey::AutoPlay));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_timer() {
        let (mut timers, mut rx) = set();
        let started = Instant::now();
        timers.schedule(TimerKey::AutoPlay, millis(1000), false);
        timers.schedule(TimerKey::AutoPlay, millis(2500), false);
        assert_eq!(timers.pending(), 1);

        rx.recv().await.expect("fired");
        assert_near(started.elapsed(), millis(2500));
        assert!(tokio::time::timeout(millis(5000), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_stop_firing() {
        let (mut timers, mut rx) = set();
        timers.schedule(TimerKey::AutoPlay, millis(100), true);
        assert!(timers.cancel(TimerKey::AutoPlay));
        assert!(!timers.cancel(TimerKey::AutoPlay));

        timers.schedule(TimerKey::AutoPlay, millis(100), true);
        timers.schedule(TimerKey::CrossfadeMidpoint, millis(50), false);
        drop(timers);
        // the channel closes once the aborted tasks release their senders
        let next = tokio::time::timeout(millis(10_000), rx.recv()).await;
        assert!(!matches!(next, Ok(Some(_))));
    }
}
