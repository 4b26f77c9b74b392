//! Background layout computation. The worker owns a thread fed through a
//! request channel and answering on a result channel; only plain data
//! crosses the boundary, never shared state. The worker makes no ordering
//! promise: callers tag requests with a growing sequence number and discard
//! any result whose sequence is not the latest one they issued.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use crate::config::LayoutConfig;
use crate::layout::{self, LayoutMode};
use crate::snapshot::{ComputeResult, EdgeSpec, NodeSpec, build_graph};

#[derive(Debug, Clone)]
pub struct LayoutRequest {
    pub seq: u64,
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub mode: LayoutMode,
}

#[derive(Debug, Clone)]
pub struct LayoutResponse {
    pub seq: u64,
    pub result: ComputeResult,
}

pub struct LayoutWorker {
    sender: Option<mpsc::Sender<LayoutRequest>>,
    receiver: mpsc::Receiver<LayoutResponse>,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWorker {
    pub fn spawn(config: LayoutConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LayoutRequest>();
        let (response_tx, response_rx) = mpsc::channel::<LayoutResponse>();
        let handle = thread::Builder::new()
            .name("atlas-layout".to_string())
            .spawn(move || worker_loop(request_rx, response_tx, config))
            .expect("failed to spawn layout worker");
        Self {
            sender: Some(request_tx),
            receiver: response_rx,
            handle: Some(handle),
        }
    }

    /// Queue a computation. Returns false once the worker has shut down.
    pub fn submit(&self, request: LayoutRequest) -> bool {
        self.sender
            .as_ref()
            .map(|tx| tx.send(request).is_ok())
            .unwrap_or(false)
    }

    /// Block until the next result arrives. None when the worker is gone.
    pub fn recv(&self) -> Option<LayoutResponse> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<LayoutResponse> {
        self.receiver.try_recv().ok()
    }

    /// Drain every pending result and keep only the freshest one — the
    /// stale-result-discard pattern callers are expected to apply.
    pub fn drain_latest(&self) -> Option<LayoutResponse> {
        let mut latest: Option<LayoutResponse> = None;
        while let Ok(response) = self.receiver.try_recv() {
            match &latest {
                Some(kept) if kept.seq > response.seq => {}
                _ => latest = Some(response),
            }
        }
        latest
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        // Disconnecting the request channel ends the loop.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    requests: mpsc::Receiver<LayoutRequest>,
    responses: mpsc::Sender<LayoutResponse>,
    config: LayoutConfig,
) {
    while let Ok(request) = requests.recv() {
        let graph = build_graph(&request.nodes, &request.edges);
        let layout = layout::compute_layout(&graph, request.mode, &config);
        let response = LayoutResponse {
            seq: request.seq,
            result: ComputeResult::from_layout(&layout),
        };
        if responses.send(response).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_request;

    fn request(seq: u64, snapshot: &str) -> LayoutRequest {
        let parsed = parse_request(snapshot).unwrap();
        LayoutRequest {
            seq,
            mode: parsed.mode(),
            nodes: parsed.nodes,
            edges: parsed.edges,
        }
    }

    #[test]
    fn round_trips_a_request() {
        let worker = LayoutWorker::spawn(LayoutConfig::default());
        let ok = worker.submit(request(
            1,
            r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"source":"a","target":"b"}]}"#,
        ));
        assert!(ok);
        let response = worker.recv().unwrap();
        assert_eq!(response.seq, 1);
        assert_eq!(response.result.nodes.len(), 2);
        assert_eq!(response.result.geometry.len(), 2); // stem + drop
    }

    #[test]
    fn responses_echo_their_sequence_numbers() {
        let worker = LayoutWorker::spawn(LayoutConfig::default());
        for seq in 1..=3u64 {
            worker.submit(request(seq, r#"{"nodes":[{"id":"only"}],"edges":[]}"#));
        }
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(worker.recv().unwrap().seq);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn drain_latest_discards_stale_results() {
        let worker = LayoutWorker::spawn(LayoutConfig::default());
        for seq in 1..=4u64 {
            worker.submit(request(seq, r#"{"nodes":[{"id":"only"}],"edges":[]}"#));
        }
        // Wait for everything to land, then drain.
        let mut received = 0;
        let mut latest = None;
        while received < 4 {
            let response = worker.recv().unwrap();
            received += 1;
            latest = Some(response);
        }
        if let Some(extra) = worker.drain_latest() {
            latest = Some(extra);
        }
        assert_eq!(latest.unwrap().seq, 4);
    }

    #[test]
    fn empty_snapshot_yields_empty_result() {
        let worker = LayoutWorker::spawn(LayoutConfig::default());
        worker.submit(request(7, r#"{"nodes":[],"edges":[]}"#));
        let response = worker.recv().unwrap();
        assert_eq!(response.seq, 7);
        assert!(response.result.nodes.is_empty());
        assert!(response.result.geometry.is_empty());
    }
}
