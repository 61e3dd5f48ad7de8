//! Criterion benchmarks for u-timetable.
//!
//! Uses synthetic timetables of increasing size to measure cost
//! evaluation, neighbor proposal, and short annealing runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_timetable::anneal::{AnnealConfig, Annealer};
use u_timetable::cost::CostEvaluator;
use u_timetable::neighbor::NeighborGenerator;
use u_timetable::problem::{Course, ProblemDefinition, Room, Slot, Teacher};
use u_timetable::random::create_rng;
use u_timetable::schedule::Schedule;

// ===========================================================================
// Synthetic problem: `courses` courses of 3 sessions, one teacher per
// 4 courses, a 5-day x 6-period week
// ===========================================================================

fn synthetic(courses: usize, rooms: usize) -> ProblemDefinition {
    let teachers = courses.div_ceil(4);
    let mut builder = ProblemDefinition::builder()
        .with_courses((0..courses).map(|c| Course::new(format!("C{c}"), 3)))
        .with_teachers((0..teachers).map(|t| {
            Teacher::new(format!("T{t}")).with_preferred_slots([format!("D{}-1", t % 5)])
        }))
        .with_rooms((0..rooms).map(|r| Room::new(format!("R{r}"))))
        .with_slots(
            (0..5u32).flat_map(|d| (0..6u32).map(move |p| Slot::new(format!("D{d}-{p}"), d, p))),
        );
    for c in 0..courses {
        builder = builder.with_assignment(format!("C{c}"), format!("T{}", c / 4));
    }
    builder.build().expect("synthetic problem is well-formed")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for &(courses, rooms) in &[(10usize, 3usize), (40, 6), (120, 12)] {
        let problem = synthetic(courses, rooms);
        let schedule = Schedule::random(&problem, &mut create_rng(42));
        group.bench_with_input(
            BenchmarkId::from_parameter(courses),
            &(problem, schedule),
            |b, (p, s)| {
                let evaluator = CostEvaluator::new(p);
                b.iter(|| black_box(evaluator.evaluate(black_box(s))))
            },
        );
    }
    group.finish();
}

fn bench_propose(c: &mut Criterion) {
    let mut group = c.benchmark_group("propose");

    for &(courses, rooms) in &[(10usize, 3usize), (120, 12)] {
        let problem = synthetic(courses, rooms);
        let schedule = Schedule::random(&problem, &mut create_rng(42));
        group.bench_with_input(
            BenchmarkId::from_parameter(courses),
            &(problem, schedule),
            |b, (p, s)| {
                let generator = NeighborGenerator::new(p);
                let mut rng = create_rng(7);
                b.iter(|| black_box(generator.propose(black_box(s), &mut rng)))
            },
        );
    }
    group.finish();
}

fn bench_anneal(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal");
    group.sample_size(10);

    for &(courses, rooms) in &[(10usize, 3usize), (40, 6)] {
        let problem = synthetic(courses, rooms);
        let config = AnnealConfig::default()
            .with_max_iterations(5_000)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(courses),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = Annealer::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_propose, bench_anneal);
criterion_main!(benches);
