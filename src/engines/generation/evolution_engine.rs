use crate::config::{EvolutionConfig, InitMethod};
use crate::config::traits::ConfigSection;
use crate::engines::evaluation::Evaluator;
use crate::engines::generation::{
    generator::{Generator, Strategy, TreeGenerator},
    operators::{var_and, CxOnePoint, Decorator, DepthLimit, MutUniform, SizeLimit, Variation},
    population::Population,
    progress::GenerationLogger,
    selection::{Selector, Tournament},
};
use crate::error::{GpError, Result};
use crate::functions::registry::PrimitiveSet;
use crate::types::Value;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

enum State<V> {
    Initializing,
    Stepping {
        population: Population<V>,
        generation: usize,
    },
}

/// Drives one evolutionary run.
///
/// The first [`step`](Self::step) creates and evaluates the initial
/// population; every later step selects offspring, varies them and evaluates
/// the result. When to stop is left to the caller or to the logger passed to
/// [`run`](Self::run).
pub struct EvolutionEngine<V> {
    config: EvolutionConfig,
    pset: Arc<PrimitiveSet<V>>,
    generator: Arc<dyn Generator<V>>,
    selector: Box<dyn Selector<V>>,
    crossover: Box<dyn Variation<V>>,
    mutation: Box<dyn Variation<V>>,
    decorators: Vec<Arc<dyn Decorator<V>>>,
    evaluator: Box<dyn Evaluator<V>>,
    seed: u64,
    rng: StdRng,
    state: State<V>,
}

impl<V: Value> EvolutionEngine<V> {
    /// Build an engine with the operators described by `config`.
    pub fn new<E>(config: EvolutionConfig, pset: Arc<PrimitiveSet<V>>, evaluator: E) -> Result<Self>
    where
        E: Evaluator<V> + 'static,
    {
        config.validate()?;

        let generator = TreeGenerator::new(
            Arc::clone(&pset),
            match config.init_method {
                InitMethod::Full => Strategy::Full,
                InitMethod::Grow => Strategy::Grow,
                InitMethod::Ramped => Strategy::Ramped,
            },
            config.init_min_depth,
            config.init_max_depth,
        )?;
        let mutation_generator =
            TreeGenerator::grow(Arc::clone(&pset), config.mutation_min_depth, config.mutation_max_depth)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        info!("set random seed: {}", seed);

        let mut engine = Self {
            generator: Arc::new(generator),
            selector: Box::new(Tournament::new(config.tournament_size)),
            crossover: Box::new(CxOnePoint::new()),
            mutation: Box::new(MutUniform::new(Arc::new(mutation_generator))),
            decorators: Vec::new(),
            evaluator: Box::new(evaluator),
            seed,
            rng: StdRng::seed_from_u64(seed),
            state: State::Initializing,
            pset,
            config,
        };

        if let Some(max) = engine.config.depth_limit {
            engine.add_decorator(Arc::new(DepthLimit::new(max)));
        }
        if let Some(max) = engine.config.size_limit {
            engine.add_decorator(Arc::new(SizeLimit::new(max)));
        }
        Ok(engine)
    }

    pub fn with_generator(mut self, generator: Arc<dyn Generator<V>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_selector(mut self, selector: Box<dyn Selector<V>>) -> Self {
        self.selector = selector;
        self
    }

    /// Replace the crossover operator. Decorators already added to the
    /// engine are applied to it as well.
    pub fn with_crossover(mut self, mut crossover: Box<dyn Variation<V>>) -> Self {
        for decorator in &self.decorators {
            crossover.add_decorator(Arc::clone(decorator));
        }
        self.crossover = crossover;
        self
    }

    /// Replace the mutation operator. Decorators already added to the
    /// engine are applied to it as well.
    pub fn with_mutation(mut self, mut mutation: Box<dyn Variation<V>>) -> Self {
        for decorator in &self.decorators {
            mutation.add_decorator(Arc::clone(decorator));
        }
        self.mutation = mutation;
        self
    }

    /// Guard both crossover and mutation with `decorator`.
    pub fn add_decorator(&mut self, decorator: Arc<dyn Decorator<V>>) {
        self.crossover.add_decorator(Arc::clone(&decorator));
        self.mutation.add_decorator(Arc::clone(&decorator));
        self.decorators.push(decorator);
    }

    pub fn set_crossover_prob(&mut self, prob: f64) -> Result<()> {
        self.config.crossover_prob = check_probability("crossover", prob)?;
        Ok(())
    }

    pub fn set_mutation_prob(&mut self, prob: f64) -> Result<()> {
        self.config.mutation_prob = check_probability("mutation", prob)?;
        Ok(())
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn primitive_set(&self) -> &PrimitiveSet<V> {
        &self.pset
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The current population, once the run has started.
    pub fn population(&self) -> Option<&Population<V>> {
        match &self.state {
            State::Initializing => None,
            State::Stepping { population, .. } => Some(population),
        }
    }

    /// Number of completed generations, 0 being the initial population.
    pub fn generation(&self) -> Option<usize> {
        match &self.state {
            State::Initializing => None,
            State::Stepping { generation, .. } => Some(*generation),
        }
    }

    pub fn log_params(&self) {
        info!("primitives:     {}", self.pset);
        info!("population:     {}", self.config.population_size);
        info!("threads:        {}", self.config.threads);
        info!(
            "initial trees:  {:?} depth {}..={}",
            self.config.init_method, self.config.init_min_depth, self.config.init_max_depth
        );
        info!("tournament:     {}", self.config.tournament_size);
        info!("crossover prob: {}", self.config.crossover_prob);
        info!(
            "mutation prob:  {} (subtree depth {}..={})",
            self.config.mutation_prob, self.config.mutation_min_depth, self.config.mutation_max_depth
        );
        if let Some(max) = self.config.depth_limit {
            info!("depth limit:    {}", max);
        }
        if let Some(max) = self.config.size_limit {
            info!("size limit:     {}", max);
        }
    }

    /// Generate and evaluate a fresh initial population, restarting the run.
    ///
    /// Returns the number of evaluations made.
    pub fn start(&mut self) -> Result<usize> {
        let mut population =
            Population::generate(self.config.population_size, self.generator.as_ref(), &mut self.rng);
        let evals = self.evaluate(&mut population)?;
        self.state = State::Stepping {
            population,
            generation: 0,
        };
        Ok(evals)
    }

    /// Advance the run by one generation, starting it if necessary.
    ///
    /// Returns the number of evaluations made.
    pub fn step(&mut self) -> Result<usize> {
        let (population, generation) = match &self.state {
            State::Initializing => return self.start(),
            State::Stepping { population, generation } => (population, *generation),
        };

        let selected = self
            .selector
            .select(population, self.config.population_size, &mut self.rng)?;
        let mut offspring = var_and(
            &selected,
            self.crossover.as_ref(),
            self.mutation.as_ref(),
            self.config.crossover_prob,
            self.config.mutation_prob,
            &mut self.rng,
        );
        let evals = self.evaluate(&mut offspring)?;

        self.state = State::Stepping {
            population: offspring,
            generation: generation + 1,
        };
        Ok(evals)
    }

    /// Step until `logger` asks to stop and return the final population.
    pub fn run<L: GenerationLogger<V>>(&mut self, mut logger: L) -> Result<Population<V>> {
        self.log_params();
        loop {
            let evals = self.step()?;
            if let State::Stepping { population, generation } = &self.state {
                if logger.on_generation(population, *generation, evals) {
                    return Ok(population.clone());
                }
            }
        }
    }

    fn evaluate(&self, population: &mut Population<V>) -> Result<usize> {
        let evals = population.evaluate(self.evaluator.as_ref(), self.config.threads)?;
        debug!("{} evaluations on {} threads", evals, self.config.threads);
        if self.config.verbose {
            population.log_individuals();
        }
        Ok(evals)
    }
}

fn check_probability(name: &str, prob: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(GpError::Configuration(format!(
            "{} probability {} must be between 0 and 1",
            name, prob
        )));
    }
    Ok(prob)
}
