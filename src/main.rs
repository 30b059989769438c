use anyhow::Result;
use log::info;
use std::sync::Arc;
use treegp::functions::boolean;
use treegp::{ConfigManager, ConsoleLogger, EvolutionConfig, EvolutionEngine, Expr, InitMethod, PrimitiveSet};

const PARITY_FANIN: usize = 6;

/// Every input combination with its even parity bit.
fn parity_cases() -> Vec<(Vec<bool>, bool)> {
    (0..1usize << PARITY_FANIN)
        .map(|i| {
            let inputs: Vec<bool> = (0..PARITY_FANIN)
                .map(|bit| i & (1 << (PARITY_FANIN - 1 - bit)) != 0)
                .collect();
            let even = inputs.iter().filter(|&&b| b).count() % 2 == 0;
            (inputs, even)
        })
        .collect()
}

fn load_config() -> Result<EvolutionConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let manager = ConfigManager::new();
            manager.load_from_file(&path)?;
            Ok(manager.get()?.evolution)
        }
        None => Ok(EvolutionConfig {
            init_method: InitMethod::Full,
            init_min_depth: 3,
            init_max_depth: 5,
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    let logger = ConsoleLogger::new(config.max_generations, config.target_fitness);

    let mut pset = PrimitiveSet::new(PARITY_FANIN, &[]);
    pset.add_all(vec![
        boolean::and(),
        boolean::or(),
        boolean::xor(),
        boolean::not(),
        boolean::constant(true),
        boolean::constant(false),
    ])?;

    let cases = parity_cases();
    let fitness = move |code: &Expr<bool>| {
        let correct = cases
            .iter()
            .filter(|(inputs, expected)| code.eval(inputs) == *expected)
            .count();
        (correct as f64 / cases.len() as f64, true)
    };

    info!("== Even parity problem for {} inputs ==", PARITY_FANIN);
    let mut engine = EvolutionEngine::new(config, Arc::new(pset), fitness)?;
    let population = engine.run(logger)?;

    let best = population.best()?;
    println!("{}", best);
    Ok(())
}
