//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use mybckchk::config::{Command, ProbeConfig, Settings};
use mybckchk::connector::{Connector, ConnectorError};
use mybckchk::{Mode, Probe, Shutdown};

/// Behaviour of the fake database, changeable while the probe runs.
#[derive(Default)]
pub struct Script {
    /// Scalar returned by every query; `None` makes queries fail.
    pub reply: Mutex<Option<String>>,
    pub reachable: AtomicBool,
    pub connects: AtomicUsize,
    /// While set, queries park until [`Script::release`].
    pub hold: AtomicBool,
    blocked: Notify,
    released: Notify,
}

impl Script {
    pub fn new(reachable: bool, reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply.map(str::to_string)),
            reachable: AtomicBool::new(reachable),
            connects: AtomicUsize::new(0),
            ..Default::default()
        })
    }

    #[allow(dead_code)]
    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = Some(reply.to_string());
    }

    /// Park every following query until `release` is called.
    #[allow(dead_code)]
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Resolve once a query is parked.
    #[allow(dead_code)]
    pub async fn blocked(&self) {
        self.blocked.notified().await;
    }

    #[allow(dead_code)]
    pub fn release(&self) {
        self.hold.store(false, Ordering::SeqCst);
        self.released.notify_one();
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

pub struct ScriptedConnector(pub Arc<Script>);

#[async_trait]
impl Connector for ScriptedConnector {
    type Connection = ();

    async fn connect(&self) -> Result<(), ConnectorError> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        if self.0.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ConnectorError::Connect("connection refused".into()))
        }
    }

    async fn ping(&self, _conn: &mut ()) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn run_scalar(&self, _conn: &mut (), query: &str) -> Result<String, ConnectorError> {
        if self.0.hold.load(Ordering::SeqCst) {
            self.0.blocked.notify_one();
            self.0.released.notified().await;
        }
        self.0
            .reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ConnectorError::Query(format!("can't run {query}").into()))
    }
}

pub struct RunningProbe {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningProbe {
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.task.await.unwrap().unwrap();
    }
}

/// Start a probe on an ephemeral port with a 50ms check interval.
pub async fn start_probe(mode: Mode, commands: Vec<Command>, script: Arc<Script>) -> RunningProbe {
    start_probe_with_interval(mode, commands, script, Duration::from_millis(50)).await
}

pub async fn start_probe_with_interval(
    mode: Mode,
    commands: Vec<Command>,
    script: Arc<Script>,
    check_interval: Duration,
) -> RunningProbe {
    let config = ProbeConfig {
        settings: Settings {
            check_interval,
            ..Default::default()
        },
        commands,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let probe = Probe::new(mode, config, ScriptedConnector(script));
    let task = tokio::spawn(probe.run(listener, shutdown.clone()));

    RunningProbe {
        addr,
        shutdown,
        task,
    }
}

pub async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    let res = client
        .get(format!("http://{}{}", addr, path))
        .send()
        .await
        .expect("Probe unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

/// Poll until the endpoint answers `status`, or panic after `within`.
pub async fn wait_for_status(addr: SocketAddr, status: u16, within: Duration) -> (u16, String) {
    let deadline = Instant::now() + within;
    loop {
        let response = get(addr, "/").await;
        if response.0 == status {
            return response;
        }
        assert!(
            Instant::now() < deadline,
            "expected {status}, still {} after {:?}",
            response.0,
            within
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
