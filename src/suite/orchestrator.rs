// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sequential execution of the benchmark suite
//!
//! Steps run strictly in declared order, one at a time. A failing step is
//! scored and the suite moves on; a run always reaches `Finished`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use super::companion::{companion_channel, CompanionLauncher, CompanionOutcome};
use super::state::{StepProgress, SuitePhase, SuiteRunState, SuiteView};
use super::step::{Category, Step, StepAction};
use super::summary::{StepScore, SuiteReport};
use crate::error::BenchError;
use crate::hardware::DeviceProfile;
use crate::inference::InferenceBenchmark;
use crate::report::ScoreReporter;
use crate::scoring::{score_from_companion, score_from_elapsed, FALLBACK_SCORE};
use crate::store::{ScoreStore, OVERALL_SCORE_KEY};
use crate::workload::{CapabilityProbe, WorkloadFactory};

const DEFAULT_COMPANION_TIMEOUT: Duration = Duration::from_secs(300);

pub struct SuiteOrchestrator {
    steps: Arc<Vec<Step>>,
    workloads: Arc<dyn WorkloadFactory>,
    capabilities: Arc<dyn CapabilityProbe>,
    store: Arc<dyn ScoreStore>,
    companion: Option<Arc<dyn CompanionLauncher>>,
    inference: Option<InferenceBenchmark>,
    reporter: Option<Arc<dyn ScoreReporter>>,
    version_code: u64,
    companion_timeout: Duration,
    device: Option<DeviceProfile>,
    state: Arc<watch::Sender<SuiteRunState>>,
}

impl SuiteOrchestrator {
    pub fn new(
        steps: Vec<Step>,
        workloads: Arc<dyn WorkloadFactory>,
        capabilities: Arc<dyn CapabilityProbe>,
        store: Arc<dyn ScoreStore>,
    ) -> Self {
        let (state, _) = watch::channel(SuiteRunState::default());
        Self {
            steps: Arc::new(steps),
            workloads,
            capabilities,
            store,
            companion: None,
            inference: None,
            reporter: None,
            version_code: 0,
            companion_timeout: DEFAULT_COMPANION_TIMEOUT,
            device: None,
            state: Arc::new(state),
        }
    }

    pub fn with_companion(mut self, launcher: Arc<dyn CompanionLauncher>, timeout: Duration) -> Self {
        self.companion = Some(launcher);
        self.companion_timeout = timeout;
        self
    }

    pub fn with_inference(mut self, benchmark: InferenceBenchmark) -> Self {
        self.inference = Some(benchmark);
        self
    }

    /// Submit the overall score when the run finishes
    pub fn with_reporter(mut self, reporter: Arc<dyn ScoreReporter>, version_code: u64) -> Self {
        self.reporter = Some(reporter);
        self.version_code = version_code;
        self
    }

    pub fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = Some(device);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Progress view; may be taken before or during a run
    pub fn view(&self) -> SuiteView {
        SuiteView::new(self.steps.clone(), self.state.subscribe())
    }

    /// Run every step to completion and persist the results.
    pub async fn run(&mut self) -> SuiteReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            target: "devbench.suite",
            "Suite run {} started with {} steps",
            run_id,
            self.steps.len()
        );

        self.state.send_replace(SuiteRunState::default());

        let steps = self.steps.clone();
        let mut scores = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            self.state.send_modify(|s| {
                s.phase = SuitePhase::Running { step: index };
                s.step_progress = 0.0;
            });
            tracing::info!(target: "devbench.suite", "[{}/{}] {}", index + 1, steps.len(), step.label);

            let score = self.execute(index, step).await;
            self.record(step, score).await;
            scores.push(StepScore {
                id: step.id.clone(),
                label: step.label.clone(),
                category: step.category,
                score,
            });
        }

        self.state.send_modify(|s| {
            s.phase = SuitePhase::Finished;
            s.step_progress = 0.0;
        });

        let categories = self.persist_totals().await;
        let overall: u64 = categories.values().sum();
        let submitted = self.submit(overall).await;

        tracing::info!(target: "devbench.suite", "Suite run {} finished: overall {}", run_id, overall);

        SuiteReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            device: self.device.clone(),
            steps: scores,
            categories,
            overall,
            submitted,
        }
    }

    async fn execute(&self, index: usize, step: &Step) -> u32 {
        if let Some(capability) = step.action.required_capability() {
            if !self.capabilities.supports(capability) {
                tracing::info!(
                    target: "devbench.suite",
                    "Skipping {}: {:?} not supported",
                    step.id,
                    capability
                );
                return 0;
            }
        }

        let progress = StepProgress::new(self.state.clone(), index);
        match step.action {
            StepAction::Native { kind, scale, .. } => {
                let operation = self.workloads.create(kind);
                let handle = progress.clone();
                match tokio::task::spawn_blocking(move || operation.run(&handle)).await {
                    Ok(Ok(elapsed_ms)) => {
                        tracing::debug!(target: "devbench.suite", "{} took {} ms", step.id, elapsed_ms);
                        score_from_elapsed(elapsed_ms, scale)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(target: "devbench.suite", "{} failed: {}", step.id, e);
                        FALLBACK_SCORE
                    }
                    Err(e) => {
                        tracing::warn!(target: "devbench.suite", "{} aborted: {}", step.id, e);
                        FALLBACK_SCORE
                    }
                }
            }
            StepAction::Companion { multiplier, .. } => self.run_companion(step, multiplier).await,
            StepAction::Inference => match &self.inference {
                Some(benchmark) => benchmark.run(&progress).await,
                None => {
                    tracing::warn!(target: "devbench.suite", "{}: no inference benchmark configured", step.id);
                    0
                }
            },
        }
    }

    async fn run_companion(&self, step: &Step, multiplier: u32) -> u32 {
        let Some(launcher) = &self.companion else {
            tracing::warn!(target: "devbench.suite", "{}: no companion configured", step.id);
            return 0;
        };

        let (results, mut receiver) = companion_channel();
        let handle = match launcher.launch(results).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(target: "devbench.suite", "{} failed to launch: {}", step.id, e);
                return FALLBACK_SCORE;
            }
        };

        let outcome = receiver.recv_timeout(self.companion_timeout).await;
        // The next step must not overlap a companion that is still running.
        handle.shutdown().await;

        match outcome {
            CompanionOutcome::Completed(frames) => score_from_companion(frames, multiplier),
            CompanionOutcome::Absent => 0,
        }
    }

    async fn record(&self, step: &Step, score: u32) {
        self.state.send_modify(|s| {
            s.results.insert(step.id.clone(), score);
            s.step_progress = 1.0;
        });
        tracing::info!(target: "devbench.suite", "{} scored {}", step.id, score);

        self.persist(&step.id, u64::from(score)).await;
    }

    async fn persist_totals(&self) -> BTreeMap<Category, u64> {
        let state = self.state.borrow().clone();
        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            let total = state.category_score(&self.steps, category);
            self.persist(category.store_key(), total).await;
            categories.insert(category, total);
        }

        let overall: u64 = categories.values().sum();
        self.persist(OVERALL_SCORE_KEY, overall).await;
        categories
    }

    /// Store writes are blocking file I/O, so they run off the async workers.
    async fn persist(&self, key: &str, value: u64) {
        let store = self.store.clone();
        let owned = key.to_string();
        let saved = tokio::task::spawn_blocking(move || store.save_score(&owned, value))
            .await
            .map_err(BenchError::from)
            .and_then(|result| result);
        if let Err(e) = saved {
            tracing::warn!(target: "devbench.suite", "Failed to persist {}: {}", key, e);
        }
    }

    async fn submit(&self, overall: u64) -> bool {
        let Some(reporter) = &self.reporter else {
            return false;
        };
        match reporter.submit(overall, self.version_code).await {
            Ok(ack) => {
                tracing::info!(target: "devbench.report", "Score submitted, accepted: {}", ack.accepted);
                ack.accepted
            }
            Err(e) => {
                tracing::warn!(target: "devbench.report", "Score submission failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BenchError, Result};
    use crate::report::{MockScoreReporter, SubmitAck};
    use crate::scoring::{CPU_SCALE, MAX_SCORE};
    use crate::store::MemoryScoreStore;
    use crate::suite::companion::{CompanionHandle, CompanionSender};
    use crate::suite::step::standard_steps;
    use crate::workload::{Capability, TimedOperation, WorkloadKind};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Clone, Copy)]
    enum Scripted {
        Elapsed(i64),
        Fail,
        Panic,
    }

    struct ScriptedOperation(Scripted);

    impl TimedOperation for ScriptedOperation {
        fn run(&self, progress: &StepProgress) -> Result<i64> {
            progress.report(0.5);
            match self.0 {
                Scripted::Elapsed(ms) => Ok(ms),
                Scripted::Fail => Err(BenchError::Workload("kernel crashed".to_string())),
                Scripted::Panic => panic!("kernel panicked"),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedFactory {
        scripts: HashMap<WorkloadKind, Scripted>,
        created: Mutex<Vec<WorkloadKind>>,
    }

    impl ScriptedFactory {
        fn with(mut self, kind: WorkloadKind, script: Scripted) -> Self {
            self.scripts.insert(kind, script);
            self
        }

        fn created(&self) -> Vec<WorkloadKind> {
            self.created.lock().unwrap().clone()
        }
    }

    impl WorkloadFactory for ScriptedFactory {
        fn create(&self, kind: WorkloadKind) -> Box<dyn TimedOperation> {
            self.created.lock().unwrap().push(kind);
            let script = self.scripts.get(&kind).copied().unwrap_or(Scripted::Elapsed(1000));
            Box::new(ScriptedOperation(script))
        }
    }

    struct Probe(HashSet<Capability>);

    impl CapabilityProbe for Probe {
        fn supports(&self, capability: Capability) -> bool {
            self.0.contains(&capability)
        }
    }

    fn probe(caps: &[Capability]) -> Arc<Probe> {
        Arc::new(Probe(caps.iter().copied().collect()))
    }

    enum LaunchBehavior {
        Reply(CompanionOutcome),
        Silent,
        FailToStart,
    }

    struct FakeLauncher {
        behavior: LaunchBehavior,
        held: Mutex<Option<CompanionSender>>,
        stopped: Arc<AtomicBool>,
    }

    impl FakeLauncher {
        fn new(behavior: LaunchBehavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                held: Mutex::new(None),
                stopped: Arc::new(AtomicBool::new(false)),
            })
        }
    }

    #[async_trait]
    impl CompanionLauncher for FakeLauncher {
        async fn launch(&self, results: CompanionSender) -> Result<CompanionHandle> {
            match &self.behavior {
                LaunchBehavior::Reply(outcome) => {
                    let outcome = *outcome;
                    tokio::spawn(async move { results.send(outcome) });
                    Ok(CompanionHandle::detached())
                }
                LaunchBehavior::Silent => {
                    *self.held.lock().unwrap() = Some(results);
                    let (cancel, cancelled) = oneshot::channel::<()>();
                    let stopped = self.stopped.clone();
                    let task = tokio::spawn(async move {
                        let _ = cancelled.await;
                        stopped.store(true, Ordering::SeqCst);
                    });
                    Ok(CompanionHandle::new(cancel, task))
                }
                LaunchBehavior::FailToStart => {
                    Err(BenchError::Companion("no such program".to_string()))
                }
            }
        }
    }

    /// Records whether the companion had stopped when each workload was created
    struct StopWitness {
        stopped: Arc<AtomicBool>,
        seen: Mutex<Vec<bool>>,
    }

    impl WorkloadFactory for StopWitness {
        fn create(&self, _kind: WorkloadKind) -> Box<dyn TimedOperation> {
            self.seen.lock().unwrap().push(self.stopped.load(Ordering::SeqCst));
            Box::new(ScriptedOperation(Scripted::Elapsed(1000)))
        }
    }

    fn native_only() -> Vec<Step> {
        standard_steps()
            .into_iter()
            .filter(|s| matches!(s.action, StepAction::Native { requires: None, .. }))
            .collect()
    }

    fn orchestrator(
        steps: Vec<Step>,
        factory: Arc<ScriptedFactory>,
        caps: &[Capability],
        store: Arc<MemoryScoreStore>,
    ) -> SuiteOrchestrator {
        SuiteOrchestrator::new(steps, factory, probe(caps), store)
    }

    #[tokio::test]
    async fn test_steps_run_in_declared_order() {
        let factory = Arc::new(ScriptedFactory::default());
        let store = Arc::new(MemoryScoreStore::new());
        let steps = native_only();
        let expected: Vec<WorkloadKind> = steps
            .iter()
            .filter_map(|s| match s.action {
                StepAction::Native { kind, .. } => Some(kind),
                _ => None,
            })
            .collect();

        let mut suite = orchestrator(steps, factory.clone(), &[], store);
        let report = suite.run().await;

        assert_eq!(factory.created(), expected);
        assert_eq!(report.steps.len(), expected.len());
        assert!(suite.view().snapshot().is_finished());
    }

    #[tokio::test]
    async fn test_native_score_conversions() {
        let factory = Arc::new(
            ScriptedFactory::default()
                .with(WorkloadKind::CpuMathSingle, Scripted::Elapsed(1000))
                .with(WorkloadKind::CpuMathMulti, Scripted::Elapsed(0))
                .with(WorkloadKind::CpuCryptoSingle, Scripted::Elapsed(-5))
                .with(WorkloadKind::CpuCryptoMulti, Scripted::Fail)
                .with(WorkloadKind::RamSeqWrite, Scripted::Panic),
        );
        let store = Arc::new(MemoryScoreStore::new());
        let mut suite = orchestrator(native_only(), factory, &[], store);

        let report = suite.run().await;
        let score = |id: &str| report.step(id).map(|s| s.score);

        assert_eq!(score("cpu_math_single"), Some((CPU_SCALE / 1000) as u32));
        assert_eq!(score("cpu_math_multi"), Some(MAX_SCORE));
        assert_eq!(score("cpu_crypto_single"), Some(0));
        assert_eq!(score("cpu_crypto_multi"), Some(FALLBACK_SCORE));
        assert_eq!(score("ram_seq_write"), Some(FALLBACK_SCORE));
        // The suite continues past failures.
        assert_eq!(score("rom_seq_read"), Some(10_000));
    }

    #[tokio::test]
    async fn test_unsupported_capability_skips_dispatch() {
        let factory = Arc::new(ScriptedFactory::default());
        let store = Arc::new(MemoryScoreStore::new());
        let steps: Vec<Step> = standard_steps()
            .into_iter()
            .filter(|s| s.category == Category::Gpu)
            .collect();

        let mut suite = orchestrator(steps, factory.clone(), &[], store.clone());
        let report = suite.run().await;

        assert!(factory.created().is_empty());
        assert_eq!(report.step("gpu_gemm").map(|s| s.score), Some(0));
        assert_eq!(report.step("gpu_rt").map(|s| s.score), Some(0));
        assert_eq!(store.get_score("GPU Benchmark"), 0);
    }

    #[tokio::test]
    async fn test_supported_gpu_compute_dispatches() {
        let factory = Arc::new(ScriptedFactory::default().with(WorkloadKind::GpuGemm, Scripted::Elapsed(50)));
        let store = Arc::new(MemoryScoreStore::new());
        let steps: Vec<Step> = standard_steps()
            .into_iter()
            .filter(|s| s.id == "gpu_gemm")
            .collect();

        let mut suite = orchestrator(steps, factory.clone(), &[Capability::GpuCompute], store);
        let report = suite.run().await;

        assert_eq!(factory.created(), vec![WorkloadKind::GpuGemm]);
        assert_eq!(report.overall, 2_000_000);
    }

    fn ray_tracing_only() -> Vec<Step> {
        standard_steps()
            .into_iter()
            .filter(|s| s.id == "gpu_rt")
            .collect()
    }

    #[tokio::test]
    async fn test_companion_result_is_multiplied() {
        let store = Arc::new(MemoryScoreStore::new());
        let mut suite = orchestrator(
            ray_tracing_only(),
            Arc::new(ScriptedFactory::default()),
            &[Capability::RayTracing],
            store.clone(),
        )
        .with_companion(
            FakeLauncher::new(LaunchBehavior::Reply(CompanionOutcome::Completed(321))),
            Duration::from_secs(5),
        );

        let report = suite.run().await;

        assert_eq!(report.step("gpu_rt").map(|s| s.score), Some(3210));
        assert_eq!(store.get_score("gpu_rt"), 3210);
        assert_eq!(store.get_score("GPU Benchmark"), 3210);
    }

    #[tokio::test]
    async fn test_companion_absent_scores_zero() {
        let mut suite = orchestrator(
            ray_tracing_only(),
            Arc::new(ScriptedFactory::default()),
            &[Capability::RayTracing],
            Arc::new(MemoryScoreStore::new()),
        )
        .with_companion(
            FakeLauncher::new(LaunchBehavior::Reply(CompanionOutcome::Absent)),
            Duration::from_secs(5),
        );

        assert_eq!(suite.run().await.overall, 0);
    }

    #[tokio::test]
    async fn test_companion_timeout_scores_zero() {
        let mut suite = orchestrator(
            ray_tracing_only(),
            Arc::new(ScriptedFactory::default()),
            &[Capability::RayTracing],
            Arc::new(MemoryScoreStore::new()),
        )
        .with_companion(
            FakeLauncher::new(LaunchBehavior::Silent),
            Duration::from_millis(50),
        );

        assert_eq!(suite.run().await.overall, 0);
    }

    #[tokio::test]
    async fn test_timed_out_companion_stops_before_next_step() {
        let launcher = FakeLauncher::new(LaunchBehavior::Silent);
        let factory = Arc::new(StopWitness {
            stopped: launcher.stopped.clone(),
            seen: Mutex::new(Vec::new()),
        });
        let mut steps = ray_tracing_only();
        steps.extend(native_only().into_iter().take(1));

        let mut suite = SuiteOrchestrator::new(
            steps,
            factory.clone(),
            probe(&[Capability::RayTracing]),
            Arc::new(MemoryScoreStore::new()),
        )
        .with_companion(launcher.clone(), Duration::from_millis(50));
        let report = suite.run().await;

        assert_eq!(report.step("gpu_rt").map(|s| s.score), Some(0));
        assert_eq!(*factory.seen.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_companion_launch_failure_scores_fallback() {
        let mut suite = orchestrator(
            ray_tracing_only(),
            Arc::new(ScriptedFactory::default()),
            &[Capability::RayTracing],
            Arc::new(MemoryScoreStore::new()),
        )
        .with_companion(
            FakeLauncher::new(LaunchBehavior::FailToStart),
            Duration::from_secs(5),
        );

        assert_eq!(suite.run().await.overall, u64::from(FALLBACK_SCORE));
    }

    #[tokio::test]
    async fn test_missing_inference_benchmark_scores_zero() {
        let steps: Vec<Step> = standard_steps()
            .into_iter()
            .filter(|s| s.category == Category::Ai)
            .collect();
        let mut suite = orchestrator(
            steps,
            Arc::new(ScriptedFactory::default()),
            &[],
            Arc::new(MemoryScoreStore::new()),
        );

        let report = suite.run().await;
        assert_eq!(report.step("ai_inference").map(|s| s.score), Some(0));
    }

    #[tokio::test]
    async fn test_category_and_overall_totals_are_persisted() {
        let factory = Arc::new(ScriptedFactory::default());
        let store = Arc::new(MemoryScoreStore::new());
        let mut suite = orchestrator(standard_steps(), factory, &[], store.clone());

        let report = suite.run().await;

        // Four CPU steps at 1000ms each, five memory steps at 1000ms each.
        assert_eq!(report.category(Category::Cpu), 4 * 100_000);
        assert_eq!(report.category(Category::Mem), 5 * 10_000);
        assert_eq!(report.category(Category::Gpu), 0);
        assert_eq!(report.category(Category::Ai), 0);
        assert_eq!(report.overall, 450_000);

        assert_eq!(store.get_score("CPU Benchmark"), 400_000);
        assert_eq!(store.get_score("Memory Test"), 50_000);
        assert_eq!(store.get_score(OVERALL_SCORE_KEY), 450_000);
        assert_eq!(store.get_score("cpu_math_multi"), 100_000);
        assert_eq!(store.all_scores().len(), 12 + 4 + 1);
    }

    /// Notes which thread each save ran on
    #[derive(Default)]
    struct ThreadRecordingStore {
        inner: MemoryScoreStore,
        threads: Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ScoreStore for ThreadRecordingStore {
        fn save_score(&self, key: &str, value: u64) -> Result<()> {
            self.threads.lock().unwrap().push(std::thread::current().id());
            self.inner.save_score(key, value)
        }

        fn get_score(&self, key: &str) -> u64 {
            self.inner.get_score(key)
        }

        fn all_scores(&self) -> BTreeMap<String, u64> {
            self.inner.all_scores()
        }
    }

    #[tokio::test]
    async fn test_scores_are_saved_off_the_runtime_thread() {
        let store = Arc::new(ThreadRecordingStore::default());
        let mut suite = SuiteOrchestrator::new(
            native_only(),
            Arc::new(ScriptedFactory::default()),
            probe(&[]),
            store.clone(),
        );

        suite.run().await;

        let runtime_thread = std::thread::current().id();
        let threads = store.threads.lock().unwrap();
        assert_eq!(threads.len(), native_only().len() + Category::ALL.len() + 1);
        assert!(threads.iter().all(|id| *id != runtime_thread));
        assert_eq!(store.get_score("cpu_math_single"), 100_000);
    }

    #[tokio::test]
    async fn test_overall_does_not_overflow() {
        let mut factory = ScriptedFactory::default();
        for kind in [
            WorkloadKind::CpuMathSingle,
            WorkloadKind::CpuMathMulti,
            WorkloadKind::CpuCryptoSingle,
            WorkloadKind::CpuCryptoMulti,
        ] {
            factory = factory.with(kind, Scripted::Elapsed(0));
        }
        let mut suite = orchestrator(
            native_only(),
            Arc::new(factory),
            &[],
            Arc::new(MemoryScoreStore::new()),
        );

        let report = suite.run().await;
        assert_eq!(report.category(Category::Cpu), 4 * u64::from(MAX_SCORE));
    }

    #[tokio::test]
    async fn test_submit_receives_overall_and_version() {
        let mut reporter = MockScoreReporter::new();
        reporter
            .expect_submit()
            .withf(|score, version| *score == 100_000 && *version == 104)
            .times(1)
            .returning(|_, _| Ok(SubmitAck { accepted: true }));

        let steps: Vec<Step> = standard_steps()
            .into_iter()
            .filter(|s| s.id == "cpu_math_single")
            .collect();
        let mut suite = orchestrator(
            steps,
            Arc::new(ScriptedFactory::default()),
            &[],
            Arc::new(MemoryScoreStore::new()),
        )
        .with_reporter(Arc::new(reporter), 104);

        assert!(suite.run().await.submitted);
    }

    #[tokio::test]
    async fn test_submit_failure_does_not_fail_run() {
        let mut reporter = MockScoreReporter::new();
        reporter
            .expect_submit()
            .times(1)
            .returning(|_, _| Err(BenchError::Report("connection refused".to_string())));

        let store = Arc::new(MemoryScoreStore::new());
        let mut suite = orchestrator(
            native_only(),
            Arc::new(ScriptedFactory::default()),
            &[],
            store.clone(),
        )
        .with_reporter(Arc::new(reporter), 1);

        let report = suite.run().await;
        assert!(!report.submitted);
        assert_eq!(store.get_score(OVERALL_SCORE_KEY), report.overall);
    }

    #[tokio::test]
    async fn test_overall_progress_is_monotonic() {
        let mut suite = orchestrator(
            native_only(),
            Arc::new(ScriptedFactory::default()),
            &[],
            Arc::new(MemoryScoreStore::new()),
        );
        let mut view = suite.view();

        let watcher = tokio::spawn(async move {
            let mut seen = vec![view.overall_progress()];
            while view.changed().await {
                seen.push(view.overall_progress());
                if view.snapshot().is_finished() {
                    break;
                }
            }
            seen
        });

        suite.run().await;
        let seen = watcher.await.unwrap();

        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{:?}", seen);
        assert_eq!(seen.last().copied(), Some(1.0));
    }

    #[tokio::test]
    async fn test_empty_suite_finishes_with_zero() {
        let store = Arc::new(MemoryScoreStore::new());
        let mut suite = orchestrator(Vec::new(), Arc::new(ScriptedFactory::default()), &[], store.clone());

        let report = suite.run().await;

        assert_eq!(report.overall, 0);
        assert!(suite.view().snapshot().is_finished());
        assert_eq!(store.get_score(OVERALL_SCORE_KEY), 0);
    }
}
