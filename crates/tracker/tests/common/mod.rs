//! Scripted `AudioService` used to drive tracker sessions without a
//! live server. Every call is recorded; outcomes are queued per method
//! (and per filename for status polls).

// Each test binary compiles this module and uses a different subset.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use soundforge_client::{ApiError, AudioService, ServiceErrorBody, SubmitResponse};
use soundforge_core::{GenerateRequest, JobStatus, StatusReport};

/// One scripted outcome for a service call.
pub enum Scripted<T> {
    Ok(T),
    ServiceErr {
        status: u16,
        error: &'static str,
        suggest: Option<&'static str>,
    },
    TransportErr,
}

impl<T> Scripted<T> {
    async fn materialize(self) -> Result<T, ApiError> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::ServiceErr {
                status,
                error,
                suggest,
            } => Err(ApiError::Service {
                status,
                body: ServiceErrorBody {
                    error: error.to_string(),
                    message: None,
                    detail: None,
                    suggest: suggest.map(str::to_string),
                },
            }),
            Scripted::TransportErr => Err(transport_error().await),
        }
    }
}

/// Manufacture a real `reqwest` transport error by dialing a closed
/// loopback port.
pub async fn transport_error() -> ApiError {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client
        .get("http://127.0.0.1:9/unreachable")
        .send()
        .await
        .unwrap_err();
    ApiError::Transport(err)
}

#[derive(Default)]
pub struct ScriptedService {
    submit_script: Mutex<VecDeque<Scripted<SubmitResponse>>>,
    submitted: Mutex<Vec<GenerateRequest>>,
    auto_filename: AtomicUsize,

    status_script: Mutex<HashMap<String, VecDeque<Scripted<StatusReport>>>>,
    /// Sticky last report per filename, replayed once its queue drains.
    status_sticky: Mutex<HashMap<String, StatusReport>>,
    status_calls: Mutex<Vec<String>>,

    cancel_script: Mutex<VecDeque<Scripted<()>>>,
    cancel_calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- scripting ----

    pub fn queue_submit_ok(&self, filename: &str) {
        self.submit_script
            .lock()
            .unwrap()
            .push_back(Scripted::Ok(SubmitResponse {
                status: JobStatus::Queued,
                filename: filename.to_string(),
                file_url: Some(format!("/audio/{filename}")),
                message: Some("Audio generation queued".to_string()),
                queue_position: Some(1),
            }));
    }

    pub fn fail_next_submit(&self, status: u16, error: &'static str, suggest: Option<&'static str>) {
        self.submit_script
            .lock()
            .unwrap()
            .push_back(Scripted::ServiceErr {
                status,
                error,
                suggest,
            });
    }

    pub fn fail_next_submit_transport(&self) {
        self.submit_script
            .lock()
            .unwrap()
            .push_back(Scripted::TransportErr);
    }

    /// Queue one status report for a filename. The last queued report
    /// becomes sticky: once the queue drains it is replayed forever.
    pub fn push_status(&self, filename: &str, report: StatusReport) {
        self.status_script
            .lock()
            .unwrap()
            .entry(filename.to_string())
            .or_default()
            .push_back(Scripted::Ok(report));
    }

    pub fn fail_next_status(&self, filename: &str) {
        self.status_script
            .lock()
            .unwrap()
            .entry(filename.to_string())
            .or_default()
            .push_back(Scripted::TransportErr);
    }

    pub fn fail_next_cancel(&self) {
        self.cancel_script
            .lock()
            .unwrap()
            .push_back(Scripted::TransportErr);
    }

    // ---- recorded calls ----

    pub fn submitted_requests(&self) -> Vec<GenerateRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn status_polls_for(&self, filename: &str) -> usize {
        self.status_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.as_str() == filename)
            .count()
    }

    pub fn cancel_requests(&self) -> Vec<String> {
        self.cancel_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioService for ScriptedService {
    async fn submit(&self, request: &GenerateRequest) -> Result<SubmitResponse, ApiError> {
        self.submitted.lock().unwrap().push(request.clone());

        let scripted = self.submit_script.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.materialize().await,
            None => {
                // Unscripted submits succeed with a generated filename.
                let n = self.auto_filename.fetch_add(1, Ordering::SeqCst) + 1;
                let filename = format!("generated_{n}.mp3");
                Ok(SubmitResponse {
                    status: JobStatus::Queued,
                    file_url: Some(format!("/audio/{filename}")),
                    filename,
                    message: None,
                    queue_position: None,
                })
            }
        }
    }

    async fn status(&self, filename: &str) -> Result<StatusReport, ApiError> {
        self.status_calls.lock().unwrap().push(filename.to_string());

        let scripted = self
            .status_script
            .lock()
            .unwrap()
            .get_mut(filename)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted::Ok(report)) => {
                self.status_sticky
                    .lock()
                    .unwrap()
                    .insert(filename.to_string(), report.clone());
                Ok(report)
            }
            Some(outcome) => outcome.materialize().await,
            None => {
                if let Some(report) = self.status_sticky.lock().unwrap().get(filename) {
                    return Ok(report.clone());
                }
                // Never scripted: the job just sits in the queue.
                Ok(StatusReport::status_only(JobStatus::Queued))
            }
        }
    }

    async fn cancel(&self, filename: &str) -> Result<(), ApiError> {
        self.cancel_calls.lock().unwrap().push(filename.to_string());

        let scripted = self.cancel_script.lock().unwrap().pop_front();
        match scripted {
            Some(outcome) => outcome.materialize().await,
            None => Ok(()),
        }
    }

    async fn version(&self) -> Result<serde_json::Value, ApiError> {
        Ok(serde_json::json!({"service": "soundforge", "version": "test"}))
    }
}

/// Drain every immediately-available event from a receiver.
pub fn drain_events(
    rx: &mut tokio::sync::broadcast::Receiver<soundforge_events::TrackerEvent>,
) -> Vec<soundforge_events::TrackerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
