//! Amendment loop controller
//!
//! Runs the scan → filter → prompt → sleep cycle until the time-out elapses
//! or the session is cancelled, then writes the policy back if the operator
//! granted anything.
//!
//! ```text
//! Scanning ──> Prompting ──> Scanning ──> ... ──> Terminated
//! ```
//!
//! The time-out is checked at the top of every scan and never interrupts a
//! prompt. Cancellation interrupts both prompts and sleeps, and still goes
//! through the report/persist teardown.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::config::AmendConfig;
use crate::cli::{OperatorSurface, Verdict};
use crate::core::{AmendError, AmendResult, LoopState, TerminationReason};
use crate::graph::{collect_interactions, Interaction, TopologyProvider};
use crate::permissions::classify;
use crate::policy::{PolicyDocument, PolicyStore, Qualifier};
use crate::session::{filter_new, SeenCache, SessionReport};

/// Outcome of adjudicating one surfaced interaction
enum Adjudication {
    Resolved,
    Unanswered,
    Stop(TerminationReason),
}

/// One interactive amendment session
///
/// Owns the policy document and the seen-interaction cache for the whole
/// session; both are only touched from `run`.
pub struct AmendmentLoop<T, O> {
    config: AmendConfig,
    store: PolicyStore,
    document: PolicyDocument,
    cache: SeenCache,
    topology: T,
    operator: O,
    cancel: CancellationToken,
    state: LoopState,
    mutations: u64,
    last_batch: Vec<Interaction>,
    report: SessionReport,
}

impl<T, O> AmendmentLoop<T, O>
where
    T: TopologyProvider,
    O: OperatorSurface,
{
    /// Create a session, loading the policy named by `config`
    ///
    /// Fails with `PolicyFileNotFound` or `PolicyFileInvalid` before any
    /// scanning happens.
    pub fn new(config: AmendConfig, topology: T, operator: O) -> AmendResult<Self> {
        let store = PolicyStore::new();
        let document = store.load(&config.policy_path)?;
        Ok(Self::from_document(config, document, topology, operator))
    }

    /// Create a session around an already loaded document
    pub fn from_document(
        config: AmendConfig,
        document: PolicyDocument,
        topology: T,
        operator: O,
    ) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            "Creating amendment session {} for {}",
            session_id,
            config.policy_path.display()
        );

        Self {
            config,
            store: PolicyStore::new(),
            document,
            cache: SeenCache::new(),
            topology,
            operator,
            cancel: CancellationToken::new(),
            state: LoopState::Scanning,
            mutations: 0,
            last_batch: Vec::new(),
            report: SessionReport::new(session_id),
        }
    }

    /// Token that ends the session when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current loop state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The policy document as amended so far
    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    /// Interactions resolved so far
    pub fn cache(&self) -> &SeenCache {
        &self.cache
    }

    /// Session configuration
    pub fn config(&self) -> &AmendConfig {
        &self.config
    }

    /// The operator surface
    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Run the session to completion
    ///
    /// Returns the report once `Terminated` is reached. Only a failure to
    /// write the amended policy is returned as an error.
    pub async fn run(&mut self) -> AmendResult<SessionReport> {
        if self.state.is_terminal() {
            return Ok(self.report.clone());
        }

        let started = Instant::now();
        self.report.started_at = chrono::Utc::now();
        tracing::info!(
            "Starting amendment loop (interval {:?}, time-out {:?})",
            self.config.scan_interval,
            self.config.timeout
        );

        let reason = loop {
            if self.cancel.is_cancelled() {
                break TerminationReason::Cancelled;
            }
            if self.config.timeout.is_some_and(|t| started.elapsed() >= t) {
                break TerminationReason::Timeout;
            }

            self.state = LoopState::Scanning;
            let observed = match collect_interactions(&self.topology).await {
                Ok(observed) => observed,
                Err(e) => {
                    tracing::warn!("{}; treating scan as empty", e);
                    Vec::new()
                }
            };
            self.report.scans += 1;

            let surfaced = filter_new(&observed, &mut self.cache, &self.document);
            self.last_batch = observed;
            tracing::debug!(
                "Scan {}: {} interactions, {} need adjudication",
                self.report.scans,
                self.last_batch.len(),
                surfaced.len()
            );

            let mut stop = None;
            for interaction in surfaced {
                match self.adjudicate(interaction).await {
                    Adjudication::Stop(reason) => {
                        stop = Some(reason);
                        break;
                    }
                    Adjudication::Resolved | Adjudication::Unanswered => {}
                }
            }
            if let Some(reason) = stop {
                break reason;
            }

            self.state = LoopState::Scanning;
            let pause = match self.config.timeout {
                Some(t) => self
                    .config
                    .scan_interval
                    .min(t.saturating_sub(started.elapsed())),
                None => self.config.scan_interval,
            };
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break TerminationReason::Cancelled,
                _ = tokio::time::sleep(pause) => {}
            }
        };

        self.terminate(reason)
    }

    /// Ask the operator about one surfaced interaction
    async fn adjudicate(&mut self, interaction: Interaction) -> Adjudication {
        // An acceptance earlier in this pass may already cover it
        if self.cache.contains(&interaction) {
            return Adjudication::Resolved;
        }
        let current = classify(&self.document, &interaction);
        if current.is_allowed() {
            tracing::debug!("Allowed by an earlier answer: {}", interaction);
            self.cache.insert(interaction);
            return Adjudication::Resolved;
        }

        self.state = LoopState::Prompting;
        let answer = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            answer = self.operator.prompt(&interaction, current) => Some(answer),
        };

        match answer {
            None => Adjudication::Stop(TerminationReason::Cancelled),
            Some(Ok(Verdict::Accept)) => {
                if self.document.add_permission(&interaction, Qualifier::Allow) {
                    self.mutations += 1;
                }
                tracing::info!("Operator accepted {}", interaction);
                self.report.prompts += 1;
                self.report.accepted += 1;
                self.cache.insert(interaction);
                Adjudication::Resolved
            }
            Some(Ok(Verdict::Reject)) => {
                tracing::info!("Operator rejected {}", interaction);
                self.report.prompts += 1;
                self.report.rejected += 1;
                self.cache.insert(interaction);
                Adjudication::Resolved
            }
            Some(Err(AmendError::InputClosed)) => {
                tracing::info!("Operator input closed");
                Adjudication::Stop(TerminationReason::InputClosed)
            }
            Some(Err(e)) => {
                tracing::warn!("Could not prompt for {}: {}", interaction, e);
                Adjudication::Unanswered
            }
        }
    }

    /// Enter `Terminated`: count leftovers and persist if anything was granted
    fn terminate(&mut self, reason: TerminationReason) -> AmendResult<SessionReport> {
        self.state = LoopState::Terminated;
        self.report.reason = reason;
        self.report.finished_at = chrono::Utc::now();

        let mut counted = std::collections::HashSet::new();
        self.report.unresolved = self
            .last_batch
            .iter()
            .filter(|i| !self.cache.contains(i) && counted.insert(*i))
            .count();

        tracing::info!(
            "Amendment loop terminated ({}): {} unresolved, {} rules added",
            reason,
            self.report.unresolved,
            self.mutations
        );

        if self.mutations > 0 {
            let path = self.config.save_path().to_path_buf();
            self.store.save(&self.document, &path)?;
            self.report.saved_to = Some(path);
        }

        Ok(self.report.clone())
    }
}
