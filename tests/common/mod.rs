#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use quickhands_sync::applications::{
    Application, ApplicationStatus, ApplicationsApi, ClientJob, Decision,
};
use quickhands_sync::error::Error;
use quickhands_sync::notifications::{Notification, NotificationsApi};

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
}

pub fn notification(id: i64, read: bool) -> Notification {
    Notification {
        id,
        user_id: "user_1".to_string(),
        job_id: 9,
        message: format!("Specialist {} applied to your job", id),
        read,
        created_at: created_at(),
        application: None,
    }
}

pub fn application(id: i64, job_id: i64, status: ApplicationStatus) -> Application {
    Application {
        id,
        job_id,
        freelancer_clerk_id: format!("freelancer_{}", id),
        freelancer_name: format!("Freelancer {}", id),
        freelancer_email: format!("freelancer{}@example.com", id),
        quotation: Some("120".to_string()),
        conditions: None,
        status,
        created_at: created_at(),
    }
}

pub fn job(id: i64, applications: Vec<Application>) -> ClientJob {
    ClientJob {
        id,
        service_type: "Plumbing".to_string(),
        max_price: 150.0,
        applications,
    }
}

/// Let spawned tasks run to completion
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

type Step<T> = (Option<oneshot::Receiver<()>>, Result<T, String>);

/// Scripted responses; once the script runs out the fallback is returned
struct Script<T: Clone> {
    steps: Mutex<VecDeque<Step<T>>>,
    fallback: Mutex<Result<T, String>>,
}

impl<T: Clone> Script<T> {
    fn new(fallback: T) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(fallback)),
        }
    }

    fn push(&self, result: Result<T, String>) {
        self.steps.lock().unwrap().push_back((None, result));
    }

    fn push_gated(&self, result: Result<T, String>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back((Some(rx), result));
        tx
    }

    fn set_fallback(&self, result: Result<T, String>) {
        *self.fallback.lock().unwrap() = result;
    }

    async fn next(&self) -> Result<T, Error> {
        let step = self.steps.lock().unwrap().pop_front();
        let result = match step {
            Some((gate, result)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => {
                let fallback = self.fallback.lock().unwrap().clone();
                fallback
            }
        };
        result.map_err(|message| Error::api(500, message))
    }
}

pub struct FakeNotifications {
    calls: AtomicUsize,
    script: Script<Vec<Notification>>,
}

impl FakeNotifications {
    pub fn returning(notifications: Vec<Notification>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Script::new(notifications),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn push(&self, result: Result<Vec<Notification>, String>) {
        self.script.push(result);
    }

    pub fn push_gated(&self, result: Result<Vec<Notification>, String>) -> oneshot::Sender<()> {
        self.script.push_gated(result)
    }

    pub fn set_fallback(&self, result: Result<Vec<Notification>, String>) {
        self.script.set_fallback(result);
    }
}

#[async_trait]
impl NotificationsApi for FakeNotifications {
    async fn fetch_for_user(&self, _user_id: &str, _token: &str) -> Result<Vec<Notification>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.next().await
    }
}

pub struct FakeApplications {
    fetches: AtomicUsize,
    jobs: Script<Vec<ClientJob>>,
    status: Script<()>,
    patches: Mutex<Vec<(i64, Decision)>>,
}

impl FakeApplications {
    pub fn returning(jobs: Vec<ClientJob>) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            jobs: Script::new(jobs),
            status: Script::new(()),
            patches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn patches(&self) -> Vec<(i64, Decision)> {
        self.patches.lock().unwrap().clone()
    }

    pub fn push_jobs(&self, result: Result<Vec<ClientJob>, String>) {
        self.jobs.push(result);
    }

    pub fn push_jobs_gated(&self, result: Result<Vec<ClientJob>, String>) -> oneshot::Sender<()> {
        self.jobs.push_gated(result)
    }

    pub fn push_status(&self, result: Result<(), String>) {
        self.status.push(result);
    }

    pub fn push_status_gated(&self, result: Result<(), String>) -> oneshot::Sender<()> {
        self.status.push_gated(result)
    }
}

#[async_trait]
impl ApplicationsApi for FakeApplications {
    async fn fetch_client_jobs(&self, _token: &str) -> Result<Vec<ClientJob>, Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.jobs.next().await
    }

    async fn update_status(
        &self,
        application_id: i64,
        decision: Decision,
        _token: &str,
    ) -> Result<(), Error> {
        self.patches.lock().unwrap().push((application_id, decision));
        self.status.next().await
    }
}
