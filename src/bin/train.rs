//! Train a feedforward classifier on a CSV dataset
//!
//! Usage: cargo run --bin train -- --data train.csv --hidden 5 --epochs 100

use anyhow::{ensure, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_nn_classifier::{
    data::{load_weight_table, Dataset},
    nn::{xavier_tables, Network},
    AppConfig, EvaluationReport,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = AppConfig::default();
    let mut data_path = "train.csv".to_string();
    let mut model_path = "model.json".to_string();
    let mut hidden_weights_path: Option<String> = None;
    let mut output_weights_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.get(i + 1) {
                    config = AppConfig::from_file(path)?;
                }
                i += 2;
            }
            "--data" | "-d" => {
                data_path = args.get(i + 1).cloned().unwrap_or(data_path);
                i += 2;
            }
            "--model" | "-m" => {
                model_path = args.get(i + 1).cloned().unwrap_or(model_path);
                i += 2;
            }
            "--hidden" => {
                config.training.hidden_units = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(config.training.hidden_units);
                i += 2;
            }
            "--lr" => {
                config.training.learning_rate = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(config.training.learning_rate);
                i += 2;
            }
            "--epochs" | "-e" => {
                config.training.max_epochs = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(config.training.max_epochs);
                i += 2;
            }
            "--seed" => {
                config.training.seed = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(config.training.seed);
                i += 2;
            }
            "--split" => {
                config.data.train_fraction = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(config.data.train_fraction);
                i += 2;
            }
            "--classes" => {
                config.data.num_classes = args.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "--header" => {
                config.data.has_header = true;
                i += 1;
            }
            "--hidden-weights" => {
                hidden_weights_path = args.get(i + 1).cloned();
                i += 2;
            }
            "--output-weights" => {
                output_weights_path = args.get(i + 1).cloned();
                i += 2;
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                i += 1;
            }
        }
    }

    println!("═══════════════════════════════════════════════════════════════");
    println!("              Feedforward Classifier Training");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    println!("Loading data from {}...", data_path);
    let dataset = Dataset::load_csv(&data_path, config.data.num_classes, config.data.has_header)?;
    println!(
        "Loaded {} examples with {} attributes and {} classes",
        dataset.len(),
        dataset.num_attributes(),
        dataset.num_classes()
    );

    let (train_set, test_set) = dataset.split(config.data.train_fraction);
    ensure!(!train_set.is_empty(), "training split is empty");
    println!("\nDataset split:");
    println!("  Training examples: {}", train_set.len());
    println!("  Held-out examples: {}", test_set.len());

    let num_attributes = train_set.num_attributes();
    let num_classes = train_set.num_classes();
    let hidden_units = config.training.hidden_units;

    let mut rng = StdRng::seed_from_u64(config.training.seed);
    let (hidden_weights, output_weights) =
        match (&hidden_weights_path, &output_weights_path) {
            (Some(hidden_path), Some(output_path)) => {
                println!("\nLoading initial weights from {} and {}...", hidden_path, output_path);
                (
                    load_weight_table(hidden_path, hidden_units, num_attributes + 1)?,
                    load_weight_table(output_path, num_classes, hidden_units + 1)?,
                )
            }
            (None, None) => {
                println!("\nInitializing weights randomly (seed {})...", config.training.seed);
                xavier_tables(num_attributes, hidden_units, num_classes, &mut rng)
            }
            _ => anyhow::bail!("--hidden-weights and --output-weights must be given together"),
        };

    let mut network = Network::new(
        train_set,
        hidden_units,
        config.training.learning_rate,
        config.training.max_epochs,
        rng,
        &hidden_weights,
        &output_weights,
    )?;

    println!("\nNetwork: {} -> {} -> {} (plus bias units)", num_attributes, hidden_units, num_classes);
    println!(
        "Training for {} epochs at learning rate {}...",
        config.training.max_epochs, config.training.learning_rate
    );
    println!("─────────────────────────────────────────────────────────────────");

    let pb = ProgressBar::new(config.training.max_epochs as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut losses = Vec::with_capacity(config.training.max_epochs);
    for epoch in 0..config.training.max_epochs {
        let loss = network.run_epoch(epoch);
        losses.push(loss);
        pb.set_position(epoch as u64 + 1);
        pb.set_message(format!("loss: {:.6}", loss));
    }
    pb.finish_with_message("Training complete!");

    println!("─────────────────────────────────────────────────────────────────");
    println!();
    println!("  Initial Loss: {:.6}", losses.first().unwrap_or(&0.0));
    println!("  Final Loss:   {:.6}", losses.last().unwrap_or(&0.0));

    println!("\nEvaluating on held-out examples...");
    if test_set.is_empty() {
        println!("  (no held-out examples; use --split to reserve some)");
    } else {
        let report = EvaluationReport::from_network(&mut network, &test_set);
        println!("{}", report);
    }

    println!("Saving model to {}...", model_path);
    network.save(&model_path)?;
    println!("Model saved successfully!");

    Ok(())
}

fn print_help() {
    println!("Train a three-layer feedforward classifier");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin train -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -d, --data <PATH>            Input CSV file (attributes, then class label)");
    println!("    -c, --config <PATH>          JSON configuration file");
    println!("    -m, --model <PATH>           Output model file (default: model.json)");
    println!("        --hidden <N>             Hidden unit count (default: 5)");
    println!("        --lr <RATE>              Learning rate (default: 0.01)");
    println!("    -e, --epochs <N>             Number of training epochs (default: 100)");
    println!("        --seed <N>               RNG seed for init and shuffling (default: 42)");
    println!("        --split <FRACTION>       Training share of the data (default: 0.8)");
    println!("        --classes <N>            Class count (default: inferred from labels)");
    println!("        --header                 Skip a CSV header row");
    println!("        --hidden-weights <PATH>  Initial hidden weight table file");
    println!("        --output-weights <PATH>  Initial output weight table file");
    println!("        --help                   Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin train -- --data iris.csv --hidden 8 --epochs 200");
    println!("    cargo run --bin train -- -d digits.csv --lr 0.05 --seed 7 -m digits.json");
}
