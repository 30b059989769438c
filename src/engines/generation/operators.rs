use crate::engines::generation::generator::Generator;
use crate::engines::generation::individual::Individual;
use crate::engines::generation::population::Population;
use crate::types::Value;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Guard applied to the output of a variation.
///
/// Returns either the candidate or, when the candidate breaks a constraint, a
/// copy of the original individual it was derived from.
pub trait Decorator<V>: Send + Sync {
    fn decorate(&self, original: &Individual<V>, candidate: Individual<V>) -> Individual<V>;
}

/// Reject children with more than `max` opcodes.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimit {
    pub max: usize,
}

impl SizeLimit {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl<V: Value> Decorator<V> for SizeLimit {
    fn decorate(&self, original: &Individual<V>, candidate: Individual<V>) -> Individual<V> {
        if candidate.size() > self.max {
            return original.clone();
        }
        candidate
    }
}

/// Reject children deeper than `max`.
#[derive(Debug, Clone, Copy)]
pub struct DepthLimit {
    pub max: usize,
}

impl DepthLimit {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl<V: Value> Decorator<V> for DepthLimit {
    fn decorate(&self, original: &Individual<V>, candidate: Individual<V>) -> Individual<V> {
        if candidate.depth() > self.max {
            return original.clone();
        }
        candidate
    }
}

/// Genetic operator turning parents into the same number of children.
///
/// Parents are never modified. Children which differ from their parent come
/// back without a valid fitness.
pub trait Variation<V>: Send + Sync {
    fn variate(&self, parents: &[Individual<V>], rng: &mut dyn RngCore) -> Vec<Individual<V>>;

    fn add_decorator(&mut self, decorator: Arc<dyn Decorator<V>>);
}

/// Chain of decorators run in insertion order, each one seeing the result
/// accepted by the previous one.
struct DecoratorChain<V> {
    decorators: Vec<Arc<dyn Decorator<V>>>,
}

impl<V: Value> DecoratorChain<V> {
    fn new() -> Self {
        Self { decorators: Vec::new() }
    }

    fn push(&mut self, decorator: Arc<dyn Decorator<V>>) {
        self.decorators.push(decorator);
    }

    fn apply(&self, parents: &[Individual<V>], mut children: Vec<Individual<V>>) -> Vec<Individual<V>> {
        for decorator in &self.decorators {
            children = parents
                .iter()
                .zip(children)
                .map(|(parent, child)| decorator.decorate(parent, child))
                .collect();
        }
        children
    }
}

// --- Mutation ---
/// Uniform mutation: replace a random subtree with a freshly generated one.
pub struct MutUniform<V> {
    generator: Arc<dyn Generator<V>>,
    decorators: DecoratorChain<V>,
}

impl<V: Value> MutUniform<V> {
    pub fn new(generator: Arc<dyn Generator<V>>) -> Self {
        Self {
            generator,
            decorators: DecoratorChain::new(),
        }
    }
}

impl<V: Value> Variation<V> for MutUniform<V> {
    fn variate(&self, parents: &[Individual<V>], rng: &mut dyn RngCore) -> Vec<Individual<V>> {
        assert_eq!(parents.len(), 1, "mutation takes exactly one individual");
        let parent = &parents[0];
        if parent.size() == 0 {
            return vec![parent.clone()];
        }

        let pos = rng.gen_range(0..parent.size());
        let subtree = self.generator.generate(rng).into_code();
        let child = Individual::new(parent.code().replace_subtree(pos, &subtree));
        self.decorators.apply(parents, vec![child])
    }

    fn add_decorator(&mut self, decorator: Arc<dyn Decorator<V>>) {
        self.decorators.push(decorator);
    }
}

// --- Crossover ---
/// One point crossover: swap a random subtree of each parent.
pub struct CxOnePoint<V> {
    decorators: DecoratorChain<V>,
}

impl<V: Value> CxOnePoint<V> {
    pub fn new() -> Self {
        Self {
            decorators: DecoratorChain::new(),
        }
    }
}

impl<V: Value> Default for CxOnePoint<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> Variation<V> for CxOnePoint<V> {
    fn variate(&self, parents: &[Individual<V>], rng: &mut dyn RngCore) -> Vec<Individual<V>> {
        assert_eq!(parents.len(), 2, "crossover takes exactly two individuals");
        let (first, second) = (&parents[0], &parents[1]);
        if first.size() < 2 || second.size() < 2 {
            return parents.to_vec();
        }

        let (pos1, subtree1) = first.code().random_subtree(rng);
        let (pos2, subtree2) = second.code().random_subtree(rng);
        let children = vec![
            Individual::new(first.code().replace_subtree(pos1, &subtree2)),
            Individual::new(second.code().replace_subtree(pos2, &subtree1)),
        ];
        self.decorators.apply(parents, children)
    }

    fn add_decorator(&mut self, decorator: Arc<dyn Decorator<V>>) {
        self.decorators.push(decorator);
    }
}

/// Build offspring from `population`: crossover over consecutive pairs, then
/// mutation of each individual, each applied with its own probability.
pub fn var_and<V: Value>(
    population: &Population<V>,
    crossover: &dyn Variation<V>,
    mutation: &dyn Variation<V>,
    crossover_prob: f64,
    mutation_prob: f64,
    rng: &mut dyn RngCore,
) -> Population<V> {
    let mut offspring = population.clone().into_individuals();

    for i in (1..offspring.len()).step_by(2) {
        if rng.gen::<f64>() < crossover_prob {
            let children = crossover.variate(&offspring[i - 1..=i], rng);
            for (slot, child) in offspring[i - 1..=i].iter_mut().zip(children) {
                *slot = child;
            }
        }
    }

    for i in 0..offspring.len() {
        if rng.gen::<f64>() < mutation_prob {
            if let Some(child) = mutation.variate(&offspring[i..=i], rng).pop() {
                offspring[i] = child;
            }
        }
    }

    Population::new(offspring)
}
