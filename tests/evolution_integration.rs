use std::sync::Arc;
use treegp::functions::{boolean, numeric};
use treegp::{
    ConsoleLogger, DepthLimit, EvolutionConfig, EvolutionEngine, Expr, InitMethod, MutUniform,
    Population, PrimitiveSet, TreeGenerator,
};

/// Least squares fit to x^4 + x^3 + x^2 + x over [-1, 1], mapped into [0, 1]
fn quartic_fitness(code: &Expr<f64>) -> (f64, bool) {
    let mut diff = 0.0;
    for step in 0..=20 {
        let x = -1.0 + step as f64 * 0.1;
        let value = code.eval(&[x]);
        let target = x * x * x * x + x * x * x + x * x + x;
        diff += (value - target) * (value - target);
    }
    if !diff.is_finite() {
        return (0.0, true);
    }
    (1.0 / (1.0 + diff), true)
}

fn numeric_pset() -> Arc<PrimitiveSet<f64>> {
    let mut pset = PrimitiveSet::new(1, &["x"]);
    pset.add_all(vec![
        numeric::add(),
        numeric::sub(),
        numeric::mul(),
        numeric::div(),
        numeric::neg(),
        numeric::constant(0.0),
        numeric::constant(1.0),
    ])
    .unwrap();
    Arc::new(pset)
}

fn regression_config(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 200,
        threads: 4,
        seed: Some(seed),
        tournament_size: 3,
        init_method: InitMethod::Full,
        init_min_depth: 1,
        init_max_depth: 3,
        ..Default::default()
    }
}

/// Best fitness of each generation for a fixed number of generations
fn best_by_generation(seed: u64, generations: usize) -> Vec<f64> {
    let mut engine = EvolutionEngine::new(regression_config(seed), numeric_pset(), quartic_fitness).unwrap();
    let mut history = Vec::new();
    engine
        .run(|pop: &Population<f64>, generation: usize, _: usize| {
            history.push(pop.best().unwrap().fitness());
            generation >= generations
        })
        .unwrap();
    history
}

#[test]
fn test_symbolic_regression_improves() {
    let history = best_by_generation(1, 15);
    assert_eq!(history.len(), 16);
    let first = history[0];
    let best = history.iter().cloned().fold(f64::MIN, f64::max);
    assert!(best > first, "no improvement on initial best {}", first);
    assert!(history.iter().all(|f| (0.0..=1.0).contains(f)));
}

#[test]
fn test_same_seed_same_run() {
    assert_eq!(best_by_generation(42, 5), best_by_generation(42, 5));
}

#[test]
fn test_evaluation_counts_reported() {
    let mut engine = EvolutionEngine::new(regression_config(3), numeric_pset(), quartic_fitness).unwrap();
    let mut counts = Vec::new();
    engine
        .run(|pop: &Population<f64>, generation: usize, evals: usize| {
            counts.push(evals);
            assert!(pop.iter().all(|ind| ind.fitness_valid()));
            generation == 4
        })
        .unwrap();

    assert_eq!(counts[0], 200);
    // unchanged copies keep their fitness
    assert!(counts[1..].iter().all(|&evals| evals <= 200));
}

#[test]
fn test_custom_operators_and_decorators() {
    let pset = numeric_pset();
    let mutation = MutUniform::new(Arc::new(TreeGenerator::full(Arc::clone(&pset), 2, 2).unwrap()));
    let mut engine = EvolutionEngine::new(regression_config(9), Arc::clone(&pset), quartic_fitness)
        .unwrap()
        .with_mutation(Box::new(mutation));
    engine.add_decorator(Arc::new(DepthLimit::new(5)));
    engine.set_mutation_prob(0.8).unwrap();

    let population = engine.run(ConsoleLogger::new(6, 1.0)).unwrap();
    assert_eq!(population.len(), 200);
    assert!(population.iter().all(|ind| ind.depth() <= 5));
}

#[test]
fn test_three_input_parity_run() {
    let mut pset = PrimitiveSet::new(3, &[]);
    pset.add_all(vec![boolean::and(), boolean::or(), boolean::xor(), boolean::not()])
        .unwrap();

    let fitness = |code: &Expr<bool>| {
        let mut correct = 0;
        for i in 0..8u32 {
            let inputs = [i & 4 != 0, i & 2 != 0, i & 1 != 0];
            let even = i.count_ones() % 2 == 0;
            if code.eval(&inputs) == even {
                correct += 1;
            }
        }
        (correct as f64 / 8.0, true)
    };

    let config = EvolutionConfig {
        population_size: 300,
        threads: 2,
        seed: Some(5),
        ..Default::default()
    };
    let mut engine = EvolutionEngine::new(config, Arc::new(pset), fitness).unwrap();
    let population = engine.run(ConsoleLogger::new(30, 1.0)).unwrap();
    let best = population.best().unwrap();
    assert!(best.fitness() >= 0.5);
    assert!(best.code().is_well_formed());
}
