use std::sync::{Arc, Mutex};

use u_tour::constructive::{CheapestInsertionGenerator, RandomTourGenerator};
use u_tour::distance::WeightMatrix;
use u_tour::evaluation::{Candidate, Objective, SelectiveObjective, TourWeightObjective};
use u_tour::ga::Eax;
use u_tour::local_search::{
    best_insertion, CheapestInsertion, Random1Shift, ThreeOpt, TurnOptimizer,
};
use u_tour::models::{DirectedTspProblem, TourProblem, TspProblem};
use u_tour::random::RandomGenerator;
use u_tour::solver::solve_vns;
use u_tour::strategies::{
    CrossOverOperator, GaConfig, GaStrategy, Operator, OperatorChain, TournamentSelector,
    VnsConfig, VnsStrategy,
};
use u_tour::tours::{directed, Tour, Turn};

type Weight = TourWeightObjective<TspProblem>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unit cost along `0 → 1 → … → 4`, plus `4 → 0` when `closing`; 10 elsewhere.
fn chain(closing: bool) -> impl Fn(usize, usize) -> f64 + Copy {
    move |i, j| {
        if j == i + 1 || (closing && i == 4 && j == 0) {
            1.0
        } else {
            10.0
        }
    }
}

fn scattered(i: usize, j: usize) -> f64 {
    ((i * 7 + j * 13) % 23) as f64 + 1.0
}

#[test]
fn test_three_opt_solves_ring() {
    init_logging();
    let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), chain(true)).expect("valid"));
    let objective = Arc::new(Weight::new());
    let tour = Tour::new([0, 2, 1, 3, 4], Some(0)).expect("valid");
    let mut c = Candidate::new(problem, objective, tour);

    assert!(ThreeOpt::new().apply(&mut c, &mut RandomGenerator::new(0)));
    assert_eq!(c.tour().to_vec(), vec![0, 1, 2, 3, 4]);
    assert!((c.fitness() - 5.0).abs() < 1e-10);
}

#[test]
fn test_eax_solves_ring() {
    init_logging();
    let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), chain(true)).expect("valid"));
    let objective = Arc::new(Weight::new());
    let a = Candidate::new(
        Arc::clone(&problem),
        Arc::clone(&objective),
        Tour::new([0, 1, 2, 4, 3], Some(0)).expect("valid"),
    );
    let b = Candidate::new(problem, objective, Tour::new([0, 3, 4, 1, 2], Some(0)).expect("valid"));

    let child = Eax::default().apply(&a, &b, &mut RandomGenerator::new(11));
    assert_eq!(child.tour().to_vec(), vec![0, 1, 2, 3, 4]);
    assert!((child.fitness() - 5.0).abs() < 1e-10);
}

#[test]
fn test_insertion_into_open_tour() {
    let problem = TspProblem::from_fn(5, 0, None, chain(false)).expect("valid");
    let mut tour = Tour::with_capacity(5, [0, 2, 3], None).expect("valid");

    let best = best_insertion(&problem, &tour, 1).expect("insertable");
    assert_eq!((best.after, best.before), (0, Some(2)));
    assert!((best.cost + 8.0).abs() < 1e-10);

    tour.insert_after(best.after, 1).expect("valid");
    assert_eq!(tour.to_vec(), vec![0, 1, 2, 3]);
}

#[test]
fn test_insertion_operator_completes_open_tour() {
    let problem = Arc::new(TspProblem::from_fn(4, 0, None, chain(false)).expect("valid"));
    let objective = Arc::new(Weight::new());
    let op = CheapestInsertion::inserting_new(1);

    for seed in 0..50 {
        let tour = Tour::with_capacity(4, [0, 2, 3], None).expect("valid");
        let mut c = Candidate::new(Arc::clone(&problem), Arc::clone(&objective), tour);
        assert!((c.fitness() - 11.0).abs() < 1e-10);

        let (delta, improved) = op.insert(&mut c, &mut RandomGenerator::new(seed));
        assert!(improved);
        assert!((delta + 8.0).abs() < 1e-10);
        assert_eq!(c.tour().to_vec(), vec![0, 1, 2, 3]);
        assert!((c.fitness() - 3.0).abs() < 1e-10);
    }
}

#[test]
fn test_random_shift_deltas() {
    let problem = Arc::new(TspProblem::from_fn(5, 0, Some(0), chain(true)).expect("valid"));
    let objective = Arc::new(Weight::new());
    let tour = Tour::new([0, 1, 2, 3, 4], Some(0)).expect("valid");
    let mut c = Candidate::new(problem, Arc::clone(&objective), tour);
    let mut random = RandomGenerator::new(2024);

    for _ in 0..1000 {
        let before = *c.fitness();
        let delta = Random1Shift::new().shift(&mut c, &mut random);
        let after = objective.calculate(c.problem(), c.tour());
        assert!((delta - (after - before)).abs() < 1e-7);
        assert!((c.fitness() - after).abs() < 1e-7);

        let mut visits = c.tour().to_vec();
        visits.sort_unstable();
        assert_eq!(visits, vec![0, 1, 2, 3, 4]);
        assert_eq!(c.tour().count(), 5);
    }
}

#[test]
fn test_vns_reports_non_worsening_sequence() {
    init_logging();
    let problem = Arc::new(TspProblem::from_fn(15, 0, Some(0), scattered).expect("valid"));
    let objective = Arc::new(Weight::new());
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);

    let vns = VnsStrategy::new(RandomTourGenerator::new(), Random1Shift::new(), ThreeOpt::new())
        .with_config(VnsConfig::default().with_max_iterations(200).with_max_level(4))
        .with_observer(move |c: &Candidate<Weight>| {
            sink.lock().expect("not poisoned").push(*c.fitness());
        });
    let best = vns.search(&problem, &objective, &mut RandomGenerator::new(9));

    let reported = reported.lock().expect("not poisoned");
    assert!(!reported.is_empty());
    assert!(reported.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(reported.last().copied(), Some(*best.fitness()));
}

#[test]
fn test_ga_reports_non_worsening_sequence() {
    init_logging();
    let problem = Arc::new(TspProblem::from_fn(12, 0, Some(0), scattered).expect("valid"));
    let objective = Arc::new(Weight::new());
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);

    let selector = TournamentSelector::default();
    let ga = GaStrategy::new(RandomTourGenerator::new(), Eax::default(), selector)
        .with_mutation(ThreeOpt::new())
        .with_config(GaConfig::default().with_population_size(12).with_max_generations(150))
        .with_observer(move |c: &Candidate<Weight>| {
            sink.lock().expect("not poisoned").push(*c.fitness());
        });
    let best = ga.search(&problem, &objective, &mut RandomGenerator::new(5));

    let reported = reported.lock().expect("not poisoned");
    assert!(reported.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(reported.last().copied(), Some(*best.fitness()));
    let mut visits = best.tour().to_vec();
    visits.sort_unstable();
    assert_eq!(visits, (0..12).collect::<Vec<_>>());
}

#[test]
fn test_selective_tour_stays_within_budget() {
    let line = |i: usize, j: usize| (i as f64 - j as f64).abs();
    let problem = Arc::new(
        TspProblem::from_fn(10, 0, Some(0), line)
            .expect("valid")
            .with_max(8.0),
    );
    let objective = Arc::new(SelectiveObjective::<TspProblem>::new());
    let config = VnsConfig::default().with_max_iterations(100).with_seed(6);
    let best = solve_vns(&problem, &objective, config);

    assert!(best.tour().weight(line) <= 8.0 + 1e-10);
    assert_eq!(best.tour().count(), 5);
    assert!(problem.is_selective());
}

#[test]
fn test_directed_tour_with_turns() {
    init_logging();
    // Four locations on a line; each has a forward and a backward side.
    let sides = WeightMatrix::from_fn(8, |i, j| ((i / 2) as f64 - (j / 2) as f64).abs());
    let problem = Arc::new(
        DirectedTspProblem::new(0, Some(0), sides, |t: Turn| if t.is_u_turn() { 5.0 } else { 0.0 })
            .expect("valid"),
    );
    let objective = Arc::new(TourWeightObjective::<DirectedTspProblem>::new());

    let vns = VnsStrategy::new(
        CheapestInsertionGenerator::new(),
        Random1Shift::new(),
        OperatorChain::new().then(ThreeOpt::new()).then(TurnOptimizer::new()),
    )
    .with_config(VnsConfig::default().with_max_iterations(50));
    let best = vns.search(&problem, &objective, &mut RandomGenerator::new(3));

    let mut visits: Vec<usize> = best.tour().iter().map(directed::visit_of).collect();
    visits.sort_unstable();
    assert_eq!(visits, vec![0, 1, 2, 3]);
    assert!((best.fitness() - best.tour().weight(|a, b| problem.weight(a, b))).abs() < 1e-10);
    assert!(best.tour().iter().all(|id| !directed::turn_of(id).is_u_turn()));
}
