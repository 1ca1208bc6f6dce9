//! In-memory repository and scripted prober shared by the unit tests

use async_trait::async_trait;
use chrono::Utc;
use pulse_db::{
    DbError, NewServer, NewServerStatus, Server, ServerRepository, ServerStatus,
    StatusRepository,
};
use pulse_probe::{ProbeOutcome, Prober};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub fn server(id: i64, name: &str) -> Server {
    let now = Utc::now();
    Server {
        id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn status(id: i64, url: &str, server_id: i64) -> ServerStatus {
    status_input(url, server_id).into_status(id, Utc::now())
}

pub fn status_input(url: &str, server_id: i64) -> NewServerStatus {
    NewServerStatus {
        url: url.to_string(),
        is_available: true,
        message: "available".to_string(),
        server_id,
    }
}

#[derive(Default)]
struct State {
    servers: BTreeMap<i64, Server>,
    statuses: BTreeMap<i64, ServerStatus>,
    next_server_id: i64,
    next_status_id: i64,
    batches: Vec<Vec<String>>,
}

/// Repository backed by ordered maps; deleting a server cascades to its statuses
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryRepository {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// URLs of every `insert_statuses` call, in call order
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().batches.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert directly, bypassing counters
    pub fn seed_server(&self, name: &str) -> Server {
        let mut state = self.state.lock().unwrap();
        state.next_server_id += 1;
        let created = server(state.next_server_id, name);
        state.servers.insert(created.id, created.clone());
        created
    }

    /// Insert directly, bypassing counters
    pub fn seed_status(&self, input: NewServerStatus) -> ServerStatus {
        let mut state = self.state.lock().unwrap();
        Self::push_status(&mut state, input)
    }

    pub fn statuses_named(&self, name: &str) -> Vec<ServerStatus> {
        let state = self.state.lock().unwrap();
        Self::grouped(&state, name)
    }

    fn push_status(state: &mut State, input: NewServerStatus) -> ServerStatus {
        state.next_status_id += 1;
        let saved = input.into_status(state.next_status_id, Utc::now());
        state.statuses.insert(saved.id, saved.clone());
        saved
    }

    fn grouped(state: &State, name: &str) -> Vec<ServerStatus> {
        state
            .statuses
            .values()
            .filter(|s| {
                state
                    .servers
                    .get(&s.server_id)
                    .is_some_and(|owner| owner.name == name)
            })
            .cloned()
            .collect()
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }

    fn write(&self) -> Result<(), DbError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Connection(sqlx::Error::PoolTimedOut));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ServerRepository for MemoryRepository {
    async fn insert_server(&self, input: NewServer) -> Result<Server, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        state.next_server_id += 1;
        let created = server(state.next_server_id, &input.name);
        state.servers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_server(&self, updated: &Server) -> Result<Server, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .servers
            .get_mut(&updated.id)
            .ok_or_else(|| DbError::NotFound(format!("server {}", updated.id)))?;
        existing.name = updated.name.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn get_server(&self, id: i64) -> Result<Option<Server>, DbError> {
        self.read();
        Ok(self.state.lock().unwrap().servers.get(&id).cloned())
    }

    async fn list_servers(&self) -> Result<Vec<Server>, DbError> {
        self.read();
        Ok(self.state.lock().unwrap().servers.values().cloned().collect())
    }

    async fn delete_server(&self, id: i64) -> Result<bool, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        let removed = state.servers.remove(&id).is_some();
        state.statuses.retain(|_, s| s.server_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl StatusRepository for MemoryRepository {
    async fn insert_status(&self, input: NewServerStatus) -> Result<ServerStatus, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        Ok(Self::push_status(&mut state, input))
    }

    async fn insert_statuses(
        &self,
        inputs: Vec<NewServerStatus>,
    ) -> Result<Vec<ServerStatus>, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        state
            .batches
            .push(inputs.iter().map(|s| s.url.clone()).collect());
        Ok(inputs
            .into_iter()
            .map(|input| Self::push_status(&mut state, input))
            .collect())
    }

    async fn update_status(&self, updated: &ServerStatus) -> Result<ServerStatus, DbError> {
        self.write()?;
        let mut state = self.state.lock().unwrap();
        let existing = state
            .statuses
            .get_mut(&updated.id)
            .ok_or_else(|| DbError::NotFound(format!("server status {}", updated.id)))?;
        *existing = updated.clone();
        Ok(existing.clone())
    }

    async fn get_status(&self, id: i64) -> Result<Option<ServerStatus>, DbError> {
        self.read();
        Ok(self.state.lock().unwrap().statuses.get(&id).cloned())
    }

    async fn list_statuses(&self) -> Result<Vec<ServerStatus>, DbError> {
        self.read();
        Ok(self.state.lock().unwrap().statuses.values().cloned().collect())
    }

    async fn delete_status(&self, id: i64) -> Result<bool, DbError> {
        self.write()?;
        Ok(self.state.lock().unwrap().statuses.remove(&id).is_some())
    }

    async fn list_statuses_by_server_name(
        &self,
        name: &str,
    ) -> Result<Vec<ServerStatus>, DbError> {
        self.read();
        let state = self.state.lock().unwrap();
        Ok(Self::grouped(&state, name))
    }
}

/// Prober answering from a per-URL script; unknown URLs are unreachable
#[derive(Default)]
pub struct ScriptedProber {
    outcomes: HashMap<String, ProbeOutcome>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedProber {
    pub fn respond(mut self, url: &str, code: u16) -> Self {
        self.outcomes
            .insert(url.to_string(), ProbeOutcome::from_status(code));
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of probes observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.outcomes.get(url).cloned().unwrap_or_else(|| ProbeOutcome {
            available: false,
            message: "failed to connect: connection refused".to_string(),
            status_code: None,
        })
    }
}
