use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::extraction::Extractor;
use crate::llm::Llm;
use crate::prompts::DimensionPrompts;
use crate::scoring::Scorer;
use crate::types::{DimensionKey, DimensionResult, EvaluationReport};

pub const DEFAULT_CONCURRENCY: usize = 3;

/// The extractor/scorer pair for one dimension.
#[derive(Clone)]
pub struct DimensionAgents {
    pub extractor: Extractor,
    pub scorer: Scorer,
}

impl DimensionAgents {
    pub fn new(key: DimensionKey, llm: Arc<dyn Llm>, prompts: DimensionPrompts) -> Self {
        Self {
            extractor: Extractor::new(key, llm.clone(), prompts.extract),
            scorer: Scorer::new(key, llm, prompts.score),
        }
    }
}

/// Owns the three dimension pairs and the oracle client they share.
#[derive(Clone)]
pub struct Evaluator {
    reach: DimensionAgents,
    magnitude: DimensionAgents,
    impact: DimensionAgents,
    concurrency: usize,
}

impl Evaluator {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self::with_prompts(llm, DimensionPrompts::for_dimension)
    }

    /// Default prompts with model and/or temperature replaced on every agent.
    pub fn with_overrides(llm: Arc<dyn Llm>, model: Option<&str>, temperature: Option<f32>) -> Self {
        Self::with_prompts(llm, |key| DimensionPrompts::for_dimension(key).overridden(model, temperature))
    }

    pub fn with_prompts(llm: Arc<dyn Llm>, prompts: impl Fn(DimensionKey) -> DimensionPrompts) -> Self {
        let agents = |key| DimensionAgents::new(key, llm.clone(), prompts(key));
        Self {
            reach: agents(DimensionKey::Reach),
            magnitude: agents(DimensionKey::Magnitude),
            impact: agents(DimensionKey::Impact),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Maximum number of dimensions in flight at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn agents(&self, key: DimensionKey) -> &DimensionAgents {
        match key {
            DimensionKey::Reach => &self.reach,
            DimensionKey::Magnitude => &self.magnitude,
            DimensionKey::Impact => &self.impact,
        }
    }

    /// Extract then score for a single dimension.
    pub async fn evaluate_dimension(&self, key: DimensionKey, profile: &str) -> Result<DimensionResult> {
        let agents = self.agents(key);
        let categorized = agents
            .extractor
            .run(profile)
            .await
            .with_context(|| format!("{key} extraction failed"))?;
        let score = agents
            .scorer
            .run(&categorized)
            .await
            .with_context(|| format!("{key} scoring failed"))?;
        Ok(DimensionResult { categorized, score })
    }

    /// Runs every dimension; the first oracle failure aborts the run.
    pub async fn evaluate(&self, profile: &str) -> Result<EvaluationReport> {
        let started = Instant::now();
        tracing::info!(chars = profile.trim().chars().count(), "evaluating profile");

        let tasks = DimensionKey::ALL.into_iter().map(|key| async move {
            let result = self.evaluate_dimension(key, profile).await?;
            Ok::<_, anyhow::Error>((key, result))
        });
        let outcomes = stream::iter(tasks)
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut results = BTreeMap::new();
        for outcome in outcomes {
            let (key, result) = outcome?;
            results.insert(key, result);
        }
        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "evaluation finished");
        Ok(EvaluationReport { results })
    }
}
