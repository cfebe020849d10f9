use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use log::info;
use ndarray::Array1;

use scrawl::{
    metrics::{accuracy, confusion_matrix},
    Activation, LayerSpec, Network, NetworkDocument, OneHotEncoder,
};

/// 28x28 grayscale pixels per digit image.
const PIXELS: usize = 784;
const DIGITS: usize = 10;

const DEFAULT_EPOCHS: usize = 3;
const DEFAULT_LEARNING_RATE: f64 = 0.01;

const USAGE: &str = "usage: scrawl train <train.csv> <model.json> [epochs] [learning-rate]
       scrawl recognize <model.json> <test.csv>";

fn main() -> Result<()> {
    env_logger::init();

    let args = env::args().skip(1).collect::<Vec<_>>();
    match args.first().map(String::as_str) {
        Some("train") if args.len() >= 3 => {
            let epochs = match args.get(3) {
                Some(raw) => raw.parse().context("epochs must be an integer")?,
                None => DEFAULT_EPOCHS,
            };
            let learning_rate = match args.get(4) {
                Some(raw) => raw.parse().context("learning-rate must be a number")?,
                None => DEFAULT_LEARNING_RATE,
            };
            train(&args[1], &args[2], epochs, learning_rate)
        }
        Some("recognize") if args.len() >= 3 => recognize(&args[1], &args[2]),
        _ => bail!("{USAGE}"),
    }
}

/// Load digit images from an MNIST-style CSV: one row per image, a 0-9 label
/// in the first column followed by 784 pixels in 0-255, header row skipped.
/// Pixels are normalized to [0, 1].
fn load_digits(path: impl AsRef<Path>) -> Result<Vec<(Array1<f64>, usize)>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut examples = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to read row {index}"))?;
        ensure!(
            row.len() == PIXELS + 1,
            "row {index} has {} columns, expected {}",
            row.len(),
            PIXELS + 1
        );

        let label = row[0]
            .parse::<usize>()
            .with_context(|| format!("bad label in row {index}"))?;
        ensure!(label < DIGITS, "label {label} in row {index} is not a digit");

        let pixels = row
            .iter()
            .skip(1)
            .map(|pixel| Ok(pixel.parse::<f64>()? / 255.0))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("bad pixel in row {index}"))?;
        examples.push((Array1::from(pixels), label));
    }
    ensure!(!examples.is_empty(), "{} contains no rows", path.display());

    Ok(examples)
}

fn train(
    train_path: &str,
    model_path: &str,
    epochs: usize,
    learning_rate: f64,
) -> Result<()> {
    let examples = load_digits(train_path)?;
    info!("loaded {} training images from {train_path}", examples.len());

    let specs = [
        LayerSpec::new(PIXELS, Activation::LeakyReLU),
        LayerSpec::new(128, Activation::LeakyReLU),
        LayerSpec::new(DIGITS, Activation::Softmax),
    ];
    let mut network = Network::new(&specs, None)?;
    let encoder = OneHotEncoder::new((0..DIGITS).collect());

    for epoch in 0..epochs {
        let mut total_loss = 0.0;
        for (pixels, label) in &examples {
            let expected = encoder.encode(label);
            network
                .set_input_signals(pixels.view())?
                .forward()
                .backward(expected.view(), learning_rate)?;
            total_loss += network.calculate_loss(expected.view())?;
        }
        info!(
            "epoch {epoch}: mean loss = {:.6}",
            total_loss / examples.len() as f64
        );
    }

    let file = File::create(model_path)
        .with_context(|| format!("failed to create {model_path}"))?;
    serde_json::to_writer(BufWriter::new(file), &network.to_document())
        .context("failed to write the model document")?;
    info!("saved model to {model_path}");

    Ok(())
}

fn recognize(model_path: &str, test_path: &str) -> Result<()> {
    let file = File::open(model_path)
        .with_context(|| format!("failed to open {model_path}"))?;
    let document: NetworkDocument = serde_json::from_reader(BufReader::new(file))
        .context("failed to parse the model document")?;
    let mut network = Network::from_document(&document)?;
    info!("loaded model from {model_path}");

    let examples = load_digits(test_path)?;
    let encoder = OneHotEncoder::new((0..DIGITS).collect());

    let mut y_true = Vec::with_capacity(examples.len());
    let mut y_pred = Vec::with_capacity(examples.len());
    for (pixels, label) in &examples {
        network.set_input_signals(pixels.view())?.forward();
        y_true.push(*label);
        y_pred.push(encoder.decode(network.output().view()));
    }

    info!(
        "recognized {} images with accuracy {:.4}",
        examples.len(),
        accuracy(&y_true, &y_pred)
    );
    let digits = (0..DIGITS).collect::<Vec<_>>();
    for (digit, row) in digits.iter().zip(confusion_matrix(&y_true, &y_pred, &digits)) {
        info!("{digit}: {row:?}");
    }

    Ok(())
}
