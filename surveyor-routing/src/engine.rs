//! RoutingDecisionEngine: fuse, decide, execute, log.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use tracing::warn;

use surveyor_core::config::RoutingConfig;
use surveyor_core::errors::{SurveyorError, SurveyorResult};
use surveyor_core::models::{
    AssessmentRequest, DamagePrediction, DegradationEvent, ModelRegistryEntry, Route,
    RoutingDecision,
};
use surveyor_core::traits::{
    IDecisionStorage, IExternalAssessor, IInternalPredictor, IModelRegistry,
};
use surveyor_fusion::FusionEngine;
use surveyor_observability::degradation::TrackedDegradation;
use surveyor_observability::tracing_setup::events;
use surveyor_observability::DegradationTracker;

use crate::agreement::agreement_score;
use crate::confidence::{ConfidenceEstimator, CoverageConfidenceEstimator};
use crate::policy::{decide_route, RouteInputs};
use crate::safety::check_safety;

const INTERNAL_FALLBACK_TAG: &str = "internal_failed_fallback_external";
const EXTERNAL_FALLBACK_TAG: &str = "external_failed_internal_result";

/// The assessment of record plus the decision that produced it.
#[derive(Debug, Clone)]
pub struct RoutedAssessment {
    pub prediction: DamagePrediction,
    pub decision: RoutingDecision,
    /// False when the decision log write failed.
    pub persisted: bool,
}

/// Routes each request to the internal classifier, the external assessor,
/// or both. Stateless across requests apart from the degradation log.
pub struct RoutingDecisionEngine {
    config: RoutingConfig,
    fusion: Arc<FusionEngine>,
    registry: Arc<dyn IModelRegistry>,
    decisions: Arc<dyn IDecisionStorage>,
    internal: Arc<dyn IInternalPredictor>,
    external: Arc<dyn IExternalAssessor>,
    estimator: Box<dyn ConfidenceEstimator>,
    degradation: Mutex<DegradationTracker>,
}

/// Outcome of executing a route, before it becomes a decision record.
struct Execution {
    route: Route,
    internal: Option<DamagePrediction>,
    external: Option<DamagePrediction>,
    fallback: Option<&'static str>,
}

impl RoutingDecisionEngine {
    pub fn new(
        config: RoutingConfig,
        fusion: Arc<FusionEngine>,
        registry: Arc<dyn IModelRegistry>,
        decisions: Arc<dyn IDecisionStorage>,
        internal: Arc<dyn IInternalPredictor>,
        external: Arc<dyn IExternalAssessor>,
    ) -> Self {
        Self {
            config,
            fusion,
            registry,
            decisions,
            internal,
            external,
            estimator: Box::new(CoverageConfidenceEstimator),
            degradation: Mutex::new(DegradationTracker::new()),
        }
    }

    /// Replace the default `(1 − σ) × coverage` estimator.
    pub fn with_estimator(mut self, estimator: Box<dyn ConfidenceEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Snapshot of every degradation recorded so far.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.degradation
            .lock()
            .map(|t| t.events().to_vec())
            .unwrap_or_default()
    }

    /// Fuse evidence, pick a route, run it, and log the decision.
    pub fn assess(&self, request: &AssessmentRequest) -> SurveyorResult<RoutedAssessment> {
        let _span = surveyor_observability::routing_span!(request.request_id).entered();
        let started = Instant::now();

        let (evidence, fusion) = self.fusion.fuse_raw(&request.evidence);
        if fusion.degraded {
            self.record_degradation("fusion", "fusion failed", "conservative estimate");
        } else {
            self.mark_recovered("fusion");
        }

        let model = self.active_model();
        let base_weights = self.fusion.base_weights();
        let internal_confidence = self.estimator.estimate(&fusion, &evidence, &base_weights);
        let safety = check_safety(&request.safety, &request.evidence);

        let choice = decide_route(
            &RouteInputs {
                has_active_model: model.is_some(),
                sources_available: evidence.available_count(),
                safety,
                internal_confidence,
            },
            &self.config,
        );
        if let Some(trigger) = safety {
            if choice.route == Route::External {
                events::safety_override(&request.request_id, trigger.as_str());
            }
        }

        let execution = match (choice.route, model.as_ref()) {
            (Route::Internal, Some(model)) => self.run_internal(request, model)?,
            (Route::Hybrid, Some(model)) => self.run_hybrid(request, model)?,
            _ => Execution {
                route: Route::External,
                internal: None,
                external: Some(self.external.assess(request)?),
                fallback: None,
            },
        };

        let agreement_score = match (&execution.internal, &execution.external) {
            (Some(i), Some(e)) => Some(agreement_score(i, e)),
            _ => None,
        };
        let reasoning = match execution.fallback {
            Some(tag) => format!("{}:{tag}", choice.reason),
            None => choice.reason.to_string(),
        };

        let decision = RoutingDecision {
            id: uuid::Uuid::new_v4().to_string(),
            request_id: request.request_id.clone(),
            route: execution.route,
            confidence: internal_confidence,
            reasoning,
            internal_prediction: execution.internal,
            external_prediction: execution.external,
            agreement_score,
            inference_time_ms: started.elapsed().as_millis() as u64,
            model_version: model.map(|m| m.version),
            fusion: Some(fusion),
            evidence: Some(evidence),
            created_at: Utc::now(),
        };

        let prediction = decision
            .prediction_of_record()
            .cloned()
            .ok_or_else(|| SurveyorError::PredictorFailed {
                predictor: "routing".to_string(),
                reason: "no prediction produced".to_string(),
            })?;

        let persisted = match self.decisions.insert_decision(&decision) {
            Ok(()) => {
                self.mark_recovered("decision_log");
                true
            }
            Err(e) => {
                events::decision_persist_failed(&decision.id, &e.to_string());
                self.record_degradation("decision_log", &e.to_string(), "decision not persisted");
                false
            }
        };

        events::route_selected(
            &request.request_id,
            decision.route.as_str(),
            decision.confidence,
            &decision.reasoning,
        );

        Ok(RoutedAssessment {
            prediction,
            decision,
            persisted,
        })
    }

    /// Active internal model, or None when routing is disabled, no model is
    /// active, or the registry cannot be read.
    fn active_model(&self) -> Option<ModelRegistryEntry> {
        if !self.config.internal_routing_enabled {
            return None;
        }
        match self.registry.active_model(&self.config.internal_model_type) {
            Ok(model) => model,
            Err(e) => {
                self.record_degradation("model_registry", &e.to_string(), "external route");
                None
            }
        }
    }

    fn run_internal(
        &self,
        request: &AssessmentRequest,
        model: &ModelRegistryEntry,
    ) -> SurveyorResult<Execution> {
        match self.internal.predict(request, model) {
            Ok(prediction) => {
                self.mark_recovered("internal_predictor");
                Ok(Execution {
                    route: Route::Internal,
                    internal: Some(prediction),
                    external: None,
                    fallback: None,
                })
            }
            Err(e) => {
                self.record_degradation("internal_predictor", &e.to_string(), "external route");
                Ok(Execution {
                    route: Route::External,
                    internal: None,
                    external: Some(self.external.assess(request)?),
                    fallback: Some(INTERNAL_FALLBACK_TAG),
                })
            }
        }
    }

    /// Both predictors run concurrently and are joined before scoring.
    fn run_hybrid(
        &self,
        request: &AssessmentRequest,
        model: &ModelRegistryEntry,
    ) -> SurveyorResult<Execution> {
        let (internal, external) = rayon::join(
            || self.internal.predict(request, model),
            || self.external.assess(request),
        );

        match (internal, external) {
            (Ok(i), Ok(e)) => Ok(Execution {
                route: Route::Hybrid,
                internal: Some(i),
                external: Some(e),
                fallback: None,
            }),
            (Ok(i), Err(e)) => {
                self.record_degradation("external_assessor", &e.to_string(), "internal result");
                Ok(Execution {
                    route: Route::Hybrid,
                    internal: Some(i),
                    external: None,
                    fallback: Some(EXTERNAL_FALLBACK_TAG),
                })
            }
            (Err(ie), Ok(e)) => {
                self.record_degradation("internal_predictor", &ie.to_string(), "external result");
                Ok(Execution {
                    route: Route::Hybrid,
                    internal: None,
                    external: Some(e),
                    fallback: Some(INTERNAL_FALLBACK_TAG),
                })
            }
            (Err(ie), Err(e)) => {
                warn!(internal_error = %ie, "both predictors failed on hybrid route");
                Err(e)
            }
        }
    }

    fn record_degradation(&self, component: &str, failure: &str, fallback: &str) {
        let event = DegradationEvent {
            component: component.to_string(),
            failure: failure.to_string(),
            fallback_used: fallback.to_string(),
            timestamp: Utc::now(),
        };
        match self.degradation.lock() {
            Ok(mut tracker) => tracker.record(event),
            Err(poisoned) => poisoned.into_inner().record(event),
        }
    }

    fn mark_recovered(&self, component: &str) {
        match self.degradation.lock() {
            Ok(mut tracker) => tracker.mark_recovered(component),
            Err(poisoned) => poisoned.into_inner().mark_recovered(component),
        };
    }
}
