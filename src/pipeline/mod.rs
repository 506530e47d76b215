/*!
 * The translation pipeline.
 *
 * Two layers:
 * - `coordinator`: drives one record/language pair through translate,
 *   assess and bounded retry until it is accepted or escalated
 * - `orchestrator`: fans the coordinator out over all records and
 *   languages, emits outcomes in canonical order and supports resuming
 */

pub mod coordinator;
pub mod orchestrator;

pub use coordinator::{
    CoordinatorConfig, OutcomeStatus, RetryCoordinator, TranslationOutcome,
};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunState, RunSummary};
