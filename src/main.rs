//! HOM-GP CLI - Run a generational search from a JSON run file.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use hom_gp::{
    schema::{SearchConfig, TargetMethod, UnitTest},
    search::{LandscapeConfig, LandscapeLoader, LandscapeRunner, Orchestrator, RuntimeFitness},
};

/// Everything needed for one run.
#[derive(Debug, Serialize, Deserialize)]
struct RunFile {
    #[serde(default)]
    search: SearchConfig,
    #[serde(default)]
    landscape: LandscapeConfig,
    methods: Vec<TargetMethod>,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <run.json>", args[0]);
        eprintln!();
        eprintln!("Run generational search over the methods listed in a JSON run file.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  run.json  Path to run file (search config, landscape, methods)");
        eprintln!();
        eprintln!("Example run file is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_run();
        return;
    }

    let run_path = PathBuf::from(&args[1]);

    let run_str = fs::read_to_string(&run_path).unwrap_or_else(|e| {
        eprintln!("Error reading run file: {}", e);
        std::process::exit(1);
    });

    let run: RunFile = serde_json::from_str(&run_str).unwrap_or_else(|e| {
        eprintln!("Error parsing run file: {}", e);
        std::process::exit(1);
    });

    println!("HOM-GP Search");
    println!("=============");
    println!("Edit types: {}", run.search.edit_type);
    println!(
        "Generations: {}, individuals: {}",
        run.search.generations, run.search.individuals
    );
    println!(
        "Seeds: mutation={}, individual={}",
        run.search.mutation_seed, run.search.individual_seed
    );
    if run.search.hom_enabled {
        println!(
            "HOM seeding: {} samples, size {}",
            run.search.patch_number, run.search.hom_size
        );
    }
    println!("Methods: {}", run.methods.len());
    println!("Results: {}", run.search.output_file.display());
    println!();

    let mut orchestrator = Orchestrator::new(
        run.search,
        LandscapeLoader::new(run.landscape),
        LandscapeRunner,
        RuntimeFitness::new(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let outcomes = orchestrator.run(&run.methods).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    for outcome in &outcomes {
        let gain = relative_gain(outcome.baseline_fitness, outcome.best_fitness);
        println!("{}", outcome.method);
        println!(
            "  Baseline: {:.3} ms, best: {:.3} ms ({:+.2}%)",
            outcome.baseline_fitness,
            outcome.best_fitness,
            gain * 100.0
        );
        println!("  Best patch: {}", outcome.best_patch);
        println!(
            "  Evaluations: {}, final population: {}",
            outcome.evaluations, outcome.population_size
        );
    }

    let evaluations: usize = outcomes.iter().map(|o| o.evaluations).sum();
    println!();
    println!(
        "Time: {:.2}s ({:.1} evaluations/s)",
        elapsed.as_secs_f32(),
        evaluations as f32 / elapsed.as_secs_f32()
    );
}

/// Fractional runtime reduction of `best` against `baseline`; zero for a zero-time baseline.
fn relative_gain(baseline: f64, best: f64) -> f64 {
    if baseline > 0.0 {
        (baseline - best) / baseline
    } else {
        0.0
    }
}

fn print_example_run() {
    let run = RunFile {
        search: SearchConfig {
            edit_type: "LINE,STATEMENT".into(),
            generations: 10,
            individuals: 20,
            ..Default::default()
        },
        landscape: LandscapeConfig::default(),
        methods: vec![
            TargetMethod::new("org.example.Sorter", "sort(int[])").with_tests(vec![
                UnitTest::new("org.example.SorterTest", "sortsEmpty"),
                UnitTest::new("org.example.SorterTest", "sortsReversed"),
            ]),
        ],
    };

    match serde_json::to_string_pretty(&run) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_gain() {
        assert!((relative_gain(100.0, 90.0) - 0.1).abs() < 1e-12);
        assert_eq!(relative_gain(100.0, 100.0), 0.0);
        assert_eq!(relative_gain(0.0, 0.0), 0.0);
        assert!(relative_gain(0.0, 5.0).is_finite());
    }
}
