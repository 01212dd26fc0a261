//! Evolve XOR with a minimal generational loop.
//!
//! Run with `cargo run --example xor`. Set `RUST_LOG=neat_innovation=debug`
//! to watch the registry mint innovations.

use neat_innovation::{Activation, Genome, Neat, NeatConfig, Network, NodeRole};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const POPULATION: usize = 150;
const GENERATIONS: usize = 200;
const ELITE: usize = 30;
const TARGET: f32 = 3.9;

const CASES: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn fitness(genome: &Genome) -> f32 {
    let Ok(mut network) = Network::new(genome) else {
        return 0.0;
    };
    let mut error = 0.0;
    for (inputs, expected) in CASES {
        // Third input is a constant bias.
        match network.evaluate(&[inputs[0], inputs[1], 1.0]) {
            Ok(output) => error += (output[0] - expected).powi(2),
            Err(_) => return 0.0,
        }
    }
    4.0 - error
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NeatConfig {
        activation: Activation::Sigmoid,
        mutate_link_chance: 0.3,
        mutate_node_chance: 0.05,
        weight_random_strength: 4.0,
        ..NeatConfig::default()
    };
    let neat = Neat::with_config(3, 1, POPULATION, config);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut population: Vec<Genome> = (0..POPULATION)
        .map(|_| {
            let mut genome = neat.empty_genome();
            genome.mutate_link(&mut rng);
            genome
        })
        .collect();

    for generation in 0..GENERATIONS {
        let mut scored: Vec<(f32, Genome)> = population
            .drain(..)
            .map(|genome| (fitness(&genome), genome))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let (best_fitness, champion) = &scored[0];
        let spread = scored
            .iter()
            .filter_map(|(_, genome)| champion.distance(genome).ok())
            .sum::<f32>()
            / scored.len() as f32;
        info!(
            generation,
            best = *best_fitness,
            hidden = champion.nodes_with_role(NodeRole::Hidden).count(),
            connections = champion.connections().len(),
            spread,
            "generation done"
        );

        if *best_fitness >= TARGET {
            info!(generation, fitness = *best_fitness, "solved");
            for (inputs, expected) in CASES {
                let output = Network::new(champion)
                    .and_then(|mut network| network.evaluate(&[inputs[0], inputs[1], 1.0]));
                info!(?inputs, expected, ?output, "champion");
            }
            return;
        }

        scored.truncate(ELITE);
        population = scored.iter().map(|(_, genome)| genome.clone()).collect();
        while population.len() < POPULATION {
            let (f1, p1) = &scored[rng.random_range(0..scored.len())];
            let (f2, p2) = &scored[rng.random_range(0..scored.len())];
            let mut child = Genome::crossover(p1, *f1, p2, *f2, &mut rng)
                .unwrap_or_else(|_| p1.clone());
            child.mutate(&mut rng);
            population.push(child);
        }
    }

    info!(generations = GENERATIONS, "target not reached");
}
