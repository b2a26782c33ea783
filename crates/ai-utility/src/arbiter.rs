use ai_core::WorldView;

/// Scores one option for an agent.
///
/// `bias` is a fixed per-agent personality multiplier; implementations fold it into
/// `desirability`, whose result is expected in `[0, 1]` before biasing.
pub trait Evaluator<W: WorldView + ?Sized> {
    fn bias(&self) -> f32;

    fn desirability(&self, agent: W::Agent, world: &W) -> f32;
}

impl<W, E> Evaluator<W> for Box<E>
where
    W: WorldView + ?Sized,
    E: Evaluator<W> + ?Sized,
{
    fn bias(&self) -> f32 {
        (**self).bias()
    }

    fn desirability(&self, agent: W::Agent, world: &W) -> f32 {
        (**self).desirability(agent, world)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbiterConfig {
    /// Minimum score required to select an option.
    ///
    /// If every option scores below this threshold, nothing is selected and the caller keeps
    /// whatever it was doing.
    pub min_score: f32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Position of the winner in the evaluator slice.
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct UtilityArbiter {
    config: ArbiterConfig,
    last_choice: Option<usize>,
    last_best_score: Option<f32>,
    last_scores: Vec<f32>,
}

impl UtilityArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ArbiterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> ArbiterConfig {
        self.config
    }

    pub fn last_choice(&self) -> Option<usize> {
        self.last_choice
    }

    pub fn last_best_score(&self) -> Option<f32> {
        self.last_best_score
    }

    /// Scores from the most recent [`UtilityArbiter::select`], in evaluator order.
    pub fn last_scores(&self) -> &[f32] {
        &self.last_scores
    }

    /// Score every evaluator and return the strictly highest. The first declared evaluator wins
    /// ties.
    pub fn select<W, E>(&mut self, evaluators: &[E], agent: W::Agent, world: &W) -> Option<Selection>
    where
        W: WorldView + ?Sized,
        E: Evaluator<W>,
    {
        self.last_scores.clear();

        let mut best: Option<Selection> = None;
        for (index, evaluator) in evaluators.iter().enumerate() {
            let score = score(evaluator, agent, world);
            self.last_scores.push(score);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Selection { index, score });
            }
        }

        let best = best.filter(|b| b.score.is_finite() && b.score >= self.config.min_score);
        self.last_best_score = best.map(|b| b.score);
        self.last_choice = best.map(|b| b.index);

        if best.is_none() && !evaluators.is_empty() {
            tracing::trace!(?agent, min_score = self.config.min_score, "no option cleared threshold");
        }
        best
    }
}

/// Evaluator score with NaN mapped to negative infinity so it can never win.
pub fn score<W, E>(evaluator: &E, agent: W::Agent, world: &W) -> f32
where
    W: WorldView + ?Sized,
    E: Evaluator<W> + ?Sized,
{
    let s = evaluator.desirability(agent, world);
    if s.is_nan() {
        f32::NEG_INFINITY
    } else {
        s
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero.
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
