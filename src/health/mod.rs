//! Backend health check and background poller.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::Serialize;

use crate::api::ApiClient;

/// Default interval between background checks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy,
    Unhealthy(String),
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

/// One `GET /health` (5 s timeout). Anything but `{"status":"ok"}` is
/// unhealthy.
pub fn check(api: &ApiClient) -> HealthReport {
    match api.health() {
        Ok(body) if body.status == "ok" => HealthReport::Healthy,
        Ok(body) => HealthReport::Unhealthy(format!("backend reported status '{}'", body.status)),
        Err(e) => HealthReport::Unhealthy(e.to_string()),
    }
}

/// Runs a health check immediately and then every `interval` on a
/// background thread. Dropping the monitor stops and joins the thread.
pub struct HealthMonitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    pub fn spawn<C, F>(interval: Duration, check: C, mut on_result: F) -> Self
    where
        C: Fn() -> HealthReport + Send + 'static,
        F: FnMut(HealthReport) + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                on_result(check());
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Explicit stop or the monitor was dropped.
                    _ => break,
                }
            }
        });
        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Poll `api` with [`check`].
    pub fn watch<F>(api: ApiClient, interval: Duration, on_result: F) -> Self
    where
        F: FnMut(HealthReport) + Send + 'static,
    {
        Self::spawn(interval, move || check(&api), on_result)
    }

    /// Stop polling and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use super::*;
    use crate::api::testing::{ScriptedTransport, client};

    #[test]
    fn ok_body_is_healthy() {
        let t = ScriptedTransport::new();
        t.push(200, r#"{"status":"ok"}"#);
        assert_eq!(check(&client(&t)), HealthReport::Healthy);
    }

    #[test]
    fn other_status_or_failure_is_unhealthy() {
        let t = ScriptedTransport::new();
        t.push(200, r#"{"status":"degraded"}"#);
        t.push(503, "down");
        t.push_network_error();
        let api = client(&t);
        for _ in 0..3 {
            assert!(!check(&api).is_healthy());
        }
    }

    #[test]
    fn monitor_checks_immediately_and_stops_on_drop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let counter = calls.clone();
        let sink = seen.clone();
        let monitor = HealthMonitor::spawn(
            Duration::from_millis(10),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                HealthReport::Healthy
            },
            move |r| sink.lock().unwrap().push(r),
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        drop(monitor);

        let after_drop = calls.load(Ordering::SeqCst);
        assert!(after_drop >= 3);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
        assert!(seen.lock().unwrap().iter().all(HealthReport::is_healthy));
    }

    #[test]
    fn long_interval_still_stops_promptly() {
        let monitor = HealthMonitor::spawn(
            Duration::from_secs(3600),
            || HealthReport::Healthy,
            |_| {},
        );
        let start = Instant::now();
        monitor.stop();
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
