//! Annealing control loop.

use super::config::AnnealConfig;
use super::progress::{NullSink, ProgressSample, ProgressSink};
use crate::cost::{CostBreakdown, CostEvaluator};
use crate::error::Result;
use crate::neighbor::NeighborGenerator;
use crate::problem::ProblemDefinition;
use crate::random::{create_rng, resolve_seed};
use crate::schedule::Schedule;
use log::{debug, info};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Controller state.
///
/// `Initializing -> Running -> {Converged | Exhausted | Cancelled}`.
/// A run whose initial schedule already meets the target goes straight
/// from `Initializing` to `Converged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnnealState {
    Initializing,
    Running,
    /// Best cost reached `target_cost`.
    Converged,
    /// Iteration budget spent without reaching `target_cost`.
    Exhausted,
    /// Stopped by the external cancellation flag.
    Cancelled,
}

impl AnnealState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AnnealState::Converged | AnnealState::Exhausted | AnnealState::Cancelled
        )
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    /// The best schedule found.
    pub best: Schedule,

    /// Cost of the best schedule.
    pub cost: CostBreakdown,

    /// Terminal state the run ended in.
    pub state: AnnealState,

    /// Iterations executed (equals the number of progress samples emitted).
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Total cost of the initial random schedule.
    pub initial_cost: f64,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Seed the run was driven by; replaying it reproduces the run.
    pub seed: u64,

    pub elapsed: Duration,
}

/// Executes the annealing loop.
///
/// # Usage
///
/// ```
/// use u_timetable::anneal::{AnnealConfig, AnnealState, Annealer};
/// use u_timetable::problem::{Course, ProblemDefinition, Room, Slot, Teacher};
///
/// let problem = ProblemDefinition::builder()
///     .with_courses([Course::new("A", 1), Course::new("B", 1)])
///     .with_teacher(Teacher::new("T"))
///     .with_room(Room::new("R"))
///     .with_slots([Slot::new("Mon-0", 0, 0), Slot::new("Tue-0", 1, 0)])
///     .with_assignment("A", "T")
///     .with_assignment("B", "T")
///     .build()
///     .unwrap();
///
/// let config = AnnealConfig::default().with_max_iterations(2_000).with_seed(7);
/// let outcome = Annealer::run(&problem, &config).unwrap();
/// assert_eq!(outcome.state, AnnealState::Converged);
/// assert_eq!(outcome.cost.total, 0.0);
/// ```
pub struct Annealer;

impl Annealer {
    /// Runs annealing, discarding progress samples.
    pub fn run(problem: &ProblemDefinition, config: &AnnealConfig) -> Result<AnnealOutcome> {
        Self::run_with_cancel(problem, config, &mut NullSink, None)
    }

    /// Runs annealing, emitting one progress sample per iteration.
    pub fn run_with_sink<S: ProgressSink + ?Sized>(
        problem: &ProblemDefinition,
        config: &AnnealConfig,
        sink: &mut S,
    ) -> Result<AnnealOutcome> {
        Self::run_with_cancel(problem, config, sink, None)
    }

    /// Runs annealing with an optional cancellation token.
    ///
    /// The flag is checked once per iteration, before the next proposal.
    /// A cancelled run still returns the best schedule found so far.
    pub fn run_with_cancel<S: ProgressSink + ?Sized>(
        problem: &ProblemDefinition,
        config: &AnnealConfig,
        sink: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealOutcome> {
        config.validate()?;

        let started = Instant::now();
        let seed = resolve_seed(config.seed);
        let mut rng = create_rng(seed);
        let evaluator = CostEvaluator::new(problem);
        let generator = NeighborGenerator::new(problem);

        info!(
            "annealing {} sessions over {} slots and {} rooms (seed {seed})",
            problem.total_sessions(),
            problem.slots().len(),
            problem.rooms().len()
        );

        // Initialize
        let mut state = AnnealState::Initializing;
        let mut current = Schedule::random_biased(problem, config.preference_bias, &mut rng);
        let mut current_cost = evaluator.evaluate(&current);
        let initial_cost = current_cost.total;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.initial_temperature;
        let mut iteration = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        debug_assert_eq!(state, AnnealState::Initializing);
        state = if best_cost.total <= config.target_cost {
            AnnealState::Converged
        } else {
            AnnealState::Running
        };

        while state == AnnealState::Running {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    state = AnnealState::Cancelled;
                    break;
                }
            }

            iteration += 1;

            let candidate = generator.propose(&current, &mut rng);
            let candidate_cost = evaluator.evaluate(&candidate);
            let delta = candidate_cost.total - current_cost.total;

            // Metropolis acceptance criterion
            let accept = if delta <= 0.0 {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                true
            } else if temperature > 0.0 {
                let probability = (-delta / temperature).exp();
                rng.random_range(0.0..1.0) < probability
            } else {
                false
            };

            if accept {
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;

                if current_cost.total < best_cost.total {
                    best = current.clone();
                    best_cost = current_cost;
                    debug!(
                        "iteration {iteration}: new best {:.2} (hard {}, T {:.4})",
                        best_cost.total, best_cost.hard_count, temperature
                    );
                }
            }

            // Cool down
            if iteration.is_multiple_of(config.iterations_per_temperature) {
                temperature *= config.cooling_rate;
            }

            sink.record(ProgressSample {
                iteration,
                current_cost: current_cost.total,
                best_cost: best_cost.total,
            });

            if best_cost.total <= config.target_cost {
                state = AnnealState::Converged;
            } else if iteration >= config.max_iterations {
                state = AnnealState::Exhausted;
            }
        }

        let elapsed = started.elapsed();
        info!(
            "annealing {state:?} after {iteration} iterations in {elapsed:.2?}: \
             best {:.2} (hard {}, soft {})",
            best_cost.total, best_cost.hard_count, best_cost.soft_count
        );

        Ok(AnnealOutcome {
            best,
            cost: best_cost,
            state,
            iterations: iteration,
            accepted_moves,
            improving_moves,
            initial_cost,
            final_temperature: temperature,
            seed,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::FnSink;
    use crate::cost::CostWeights;
    use crate::problem::{Course, Room, Slot, Teacher};
    use proptest::prelude::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A, B taught by T1, C by T2; one room; three slots on separate days.
    fn three_course_problem() -> ProblemDefinition {
        ProblemDefinition::builder()
            .with_courses(["A", "B", "C"].map(|id| Course::new(id, 1)))
            .with_teachers([Teacher::new("T1"), Teacher::new("T2")])
            .with_room(Room::new("R1"))
            .with_slots([
                Slot::new("Mon", 0, 0),
                Slot::new("Tue", 1, 0),
                Slot::new("Wed", 2, 0),
            ])
            .with_assignment("A", "T1")
            .with_assignment("B", "T1")
            .with_assignment("C", "T2")
            .build()
            .unwrap()
    }

    /// Two courses of one teacher and a single slot: infeasible.
    fn infeasible_problem() -> ProblemDefinition {
        ProblemDefinition::builder()
            .with_courses([Course::new("A", 1), Course::new("B", 1)])
            .with_teacher(Teacher::new("T"))
            .with_rooms([Room::new("R0"), Room::new("R1")])
            .with_slot(Slot::new("Only", 0, 0))
            .with_assignment("A", "T")
            .with_assignment("B", "T")
            .build()
            .unwrap()
    }

    /// A larger instance that rarely converges quickly.
    fn busy_problem() -> ProblemDefinition {
        ProblemDefinition::builder()
            .with_courses((0..8).map(|c| Course::new(format!("C{c}"), 3)))
            .with_teachers((0..3).map(|t| {
                Teacher::new(format!("T{t}")).with_preferred_slots([format!("D{t}-0")])
            }))
            .with_rooms([Room::new("R0"), Room::new("R1")])
            .with_slots((0..5u32).flat_map(|d| {
                (0..4u32).map(move |p| Slot::new(format!("D{d}-{p}"), d, p))
            }))
            .with_weights(CostWeights::default().with_max_sessions_per_day(2))
            .with_assignment("C0", "T0")
            .with_assignment("C1", "T0")
            .with_assignment("C2", "T0")
            .with_assignment("C3", "T1")
            .with_assignment("C4", "T1")
            .with_assignment("C5", "T1")
            .with_assignment("C6", "T2")
            .with_assignment("C7", "T2")
            .build()
            .unwrap()
    }

    #[test]
    fn test_three_courses_converge() {
        init_logger();
        let problem = three_course_problem();
        let config = AnnealConfig::default()
            .with_max_iterations(10_000)
            .with_seed(42);

        let outcome = Annealer::run(&problem, &config).unwrap();

        assert_eq!(outcome.state, AnnealState::Converged);
        assert_eq!(outcome.cost.total, 0.0);
        assert!(outcome.cost.is_feasible());

        let slots: std::collections::HashSet<usize> =
            outcome.best.sessions().iter().map(|s| s.slot).collect();
        assert_eq!(slots.len(), 3, "A, B, C must use three distinct slots");
        assert_eq!(CostEvaluator::new(&problem).evaluate(&outcome.best), outcome.cost);
    }

    #[test]
    fn test_infeasible_exhausts() {
        init_logger();
        let problem = infeasible_problem();
        let config = AnnealConfig::default().with_max_iterations(500).with_seed(1);

        let mut samples = Vec::new();
        let outcome = Annealer::run_with_sink(&problem, &config, &mut samples).unwrap();

        assert_eq!(outcome.state, AnnealState::Exhausted);
        assert!(outcome.cost.hard_count >= 1);
        assert_eq!(outcome.iterations, 500);
        assert_eq!(samples.len(), 500);
    }

    #[test]
    fn test_single_slot_single_room_still_terminates() {
        let problem = ProblemDefinition::builder()
            .with_courses([Course::new("A", 1), Course::new("B", 1)])
            .with_teacher(Teacher::new("T"))
            .with_room(Room::new("R"))
            .with_slot(Slot::new("Only", 0, 0))
            .with_assignment("A", "T")
            .with_assignment("B", "T")
            .build()
            .unwrap();
        let config = AnnealConfig::default().with_max_iterations(50).with_seed(3);
        let outcome = Annealer::run(&problem, &config).unwrap();

        assert_eq!(outcome.state, AnnealState::Exhausted);
        // teacher pair + room pair
        assert_eq!(outcome.cost.hard_count, 2);
        assert_eq!(outcome.iterations, 50);
    }

    #[test]
    fn test_sample_count_and_order() {
        let problem = busy_problem();
        let config = AnnealConfig::default().with_max_iterations(300).with_seed(9);

        let mut samples = Vec::new();
        let outcome = Annealer::run_with_sink(&problem, &config, &mut samples).unwrap();

        assert_eq!(samples.len(), outcome.iterations);
        match outcome.state {
            AnnealState::Exhausted => assert_eq!(samples.len(), 300),
            AnnealState::Converged => assert!(samples.len() <= 300),
            other => panic!("unexpected terminal state {other:?}"),
        }
        for (i, s) in samples.iter().enumerate() {
            assert_eq!(s.iteration, i + 1);
        }
        let last = samples.last().unwrap();
        assert_eq!(last.best_cost, outcome.cost.total);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let problem = busy_problem();
        let config = AnnealConfig::default().with_max_iterations(1_000).with_seed(1234);

        let mut first = Vec::new();
        let a = Annealer::run_with_sink(&problem, &config, &mut first).unwrap();
        let mut second = Vec::new();
        let b = Annealer::run_with_sink(&problem, &config, &mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(a.best, b.best);
        assert_eq!(a.cost, b.cost);
        assert_eq!(a.seed, 1234);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = three_course_problem();
        let config = AnnealConfig::default().with_cooling_rate(1.0);
        assert!(matches!(
            Annealer::run(&problem, &config),
            Err(crate::TimetableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cancellation() {
        let problem = busy_problem();
        let config = AnnealConfig::default().with_seed(5);

        // Set before running so cancellation is deterministic.
        let cancel = Arc::new(AtomicBool::new(true));
        let mut samples = Vec::new();
        let outcome =
            Annealer::run_with_cancel(&problem, &config, &mut samples, Some(cancel)).unwrap();

        assert!(matches!(
            outcome.state,
            AnnealState::Cancelled | AnnealState::Converged
        ));
        if outcome.state == AnnealState::Cancelled {
            assert_eq!(outcome.iterations, 0);
            assert!(samples.is_empty());
        }
        assert_eq!(outcome.best.len(), problem.total_sessions());
    }

    #[test]
    fn test_cancel_from_sink() {
        let problem = busy_problem();
        let config = AnnealConfig::default().with_seed(77).with_max_iterations(10_000);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let mut sink = FnSink(move |s: ProgressSample| {
            if s.iteration == 25 {
                flag.store(true, Ordering::Relaxed);
            }
        });
        let outcome =
            Annealer::run_with_cancel(&problem, &config, &mut sink, Some(cancel)).unwrap();

        if outcome.state == AnnealState::Cancelled {
            assert_eq!(outcome.iterations, 25);
        } else {
            assert_eq!(outcome.state, AnnealState::Converged);
            assert!(outcome.iterations <= 25);
        }
    }

    #[test]
    fn test_already_optimal_start_converges_without_iterating() {
        let problem = ProblemDefinition::builder()
            .with_course(Course::new("A", 1))
            .with_teacher(Teacher::new("T"))
            .with_room(Room::new("R"))
            .with_slot(Slot::new("S", 0, 0))
            .with_assignment("A", "T")
            .build()
            .unwrap();
        let mut samples = Vec::new();
        let outcome =
            Annealer::run_with_sink(&problem, &AnnealConfig::default().with_seed(0), &mut samples)
                .unwrap();
        assert_eq!(outcome.state, AnnealState::Converged);
        assert_eq!(outcome.iterations, 0);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_uphill_moves_accepted_when_hot() {
        let problem = busy_problem();
        let config = AnnealConfig::default()
            .with_initial_temperature(1e9)
            .with_cooling_rate(0.999_999)
            .with_max_iterations(2_000)
            .with_seed(42);
        let outcome = Annealer::run(&problem, &config).unwrap();
        if outcome.state == AnnealState::Exhausted {
            let ratio = outcome.accepted_moves as f64 / outcome.iterations as f64;
            assert!(ratio > 0.9, "expected high acceptance when hot, got {ratio}");
            assert!(outcome.accepted_moves > outcome.improving_moves);
        }
    }

    #[test]
    fn test_temperature_cools_per_step() {
        let problem = infeasible_problem();
        let config = AnnealConfig::default()
            .with_initial_temperature(100.0)
            .with_cooling_rate(0.5)
            .with_iterations_per_temperature(2)
            .with_max_iterations(6)
            .with_seed(0);
        let outcome = Annealer::run(&problem, &config).unwrap();
        assert_eq!(outcome.iterations, 6);
        assert!((outcome.final_temperature - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_preference_bias_shapes_initial_schedule() {
        let problem = busy_problem();
        let config = AnnealConfig::default()
            .with_preference_bias(1.0)
            .with_seed(11);

        // Cancel before the first move so the best is the initial schedule.
        let cancel = Arc::new(AtomicBool::new(true));
        let outcome =
            Annealer::run_with_cancel(&problem, &config, &mut NullSink, Some(cancel)).unwrap();

        assert_eq!(outcome.state, AnnealState::Cancelled);
        for session in outcome.best.sessions() {
            let teacher = session.teacher.unwrap();
            assert_eq!(problem.preferred_slots(teacher), &[session.slot]);
        }
    }

    #[test]
    fn test_unmapped_course_never_converges() {
        init_logger();
        let problem = ProblemDefinition::builder()
            .with_courses([Course::new("A", 1), Course::new("Orphan", 1)])
            .with_teacher(Teacher::new("T"))
            .with_rooms([Room::new("R0"), Room::new("R1")])
            .with_slots([Slot::new("Mon", 0, 0), Slot::new("Tue", 1, 0)])
            .with_assignment("A", "T")
            .build()
            .unwrap();
        let config = AnnealConfig::default().with_max_iterations(300).with_seed(4);

        let outcome = Annealer::run(&problem, &config).unwrap();

        assert_eq!(outcome.state, AnnealState::Exhausted);
        assert_eq!(outcome.iterations, 300);
        assert!(outcome.cost.hard_count >= 1);
        assert_eq!(
            CostEvaluator::new(&problem).counts(&outcome.best).missing_teacher,
            1
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_best_cost_non_increasing(seed in any::<u64>()) {
            let problem = busy_problem();
            let config = AnnealConfig::default().with_max_iterations(400).with_seed(seed);
            let mut samples = Vec::new();
            let outcome = Annealer::run_with_sink(&problem, &config, &mut samples).unwrap();

            for w in samples.windows(2) {
                prop_assert!(w[1].best_cost <= w[0].best_cost);
                prop_assert!(w[1].iteration == w[0].iteration + 1);
            }
            for s in &samples {
                prop_assert!(s.best_cost <= s.current_cost);
            }
            prop_assert!(outcome.cost.total <= outcome.initial_cost);
            prop_assert!(outcome.iterations <= 400);
        }
    }
}
