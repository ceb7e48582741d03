//! Evaluate a saved model on a CSV dataset
//!
//! Usage: cargo run --bin evaluate -- --model model.json --data test.csv

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_nn_classifier::{
    data::Dataset,
    nn::Network,
    EvaluationReport,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut model_path = "model.json".to_string();
    let mut data_path = "test.csv".to_string();
    let mut num_classes: Option<usize> = None;
    let mut has_header = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--model" | "-m" => {
                model_path = args.get(i + 1).cloned().unwrap_or(model_path);
                i += 2;
            }
            "--data" | "-d" => {
                data_path = args.get(i + 1).cloned().unwrap_or(data_path);
                i += 2;
            }
            "--classes" => {
                num_classes = args.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "--header" => {
                has_header = true;
                i += 1;
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

    println!("Loading model from {}...", model_path);
    let (hidden_weights, output_weights) = Network::load_weights(&model_path)?;
    let hidden_units = hidden_weights.nrows();

    println!("Loading data from {}...", data_path);
    let dataset = Dataset::load_csv(&data_path, num_classes, has_header)?;
    println!("Loaded {} examples", dataset.len());

    // The learning rate and epoch count are unused for pure evaluation.
    let mut network = Network::new(
        dataset.clone(),
        hidden_units,
        0.01,
        0,
        StdRng::seed_from_u64(0),
        &hidden_weights,
        &output_weights,
    )?;

    let report = EvaluationReport::from_network(&mut network, &dataset);
    println!();
    println!("{}", report);

    Ok(())
}

fn print_help() {
    println!("Evaluate a saved classifier on a CSV dataset");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin evaluate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -m, --model <PATH>     Saved model file (default: model.json)");
    println!("    -d, --data <PATH>      CSV dataset to evaluate on (default: test.csv)");
    println!("        --classes <N>      Class count (default: inferred from labels)");
    println!("        --header           Skip a CSV header row");
    println!("        --help             Print help information");
}
