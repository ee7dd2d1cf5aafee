//! Validates a prediction file and prints all report tables
//!
//! ```text
//! cargo run --example validate -- <terms> <term2term> <annotations> <predictions> [network]
//! ```
//!
//! Without arguments, the small tables in `tests/` are used.
//! Set `RUST_LOG=debug` for more details.

use gopredict::parser::{read_network, PredictionReader, TsvAnnotations, TsvOntology};
use gopredict::redundancy::RedundancyStrategy;
use gopredict::stats::cutoff::CutoffPolicy;
use gopredict::{Branch, GoDag, KnownAnnotations, Settings, Validation};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().env().init().unwrap();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let file = |idx: usize, default: &str| args.get(idx).cloned().unwrap_or(default.to_string());

    let source = TsvOntology::from_files(
        file(0, "tests/terms.tsv"),
        file(1, "tests/term2term.tsv"),
    )
    .unwrap();
    let dag = GoDag::from_source(&source, Branch::BiologicalProcess).unwrap();

    let annotations = TsvAnnotations::from_file(file(2, "tests/annotations.tsv")).unwrap();
    let known = KnownAnnotations::from_source(&annotations, &dag).unwrap();

    let predictions = PredictionReader::open(file(3, "tests/predictions.tsv")).unwrap();

    let mut settings = Settings::default().cutoff(CutoffPolicy::AccuracyTarget(0.5));
    let network = match args.get(4) {
        Some(path) => Some(read_network(path).unwrap()),
        None if args.is_empty() => Some(read_network("tests/network.tsv").unwrap()),
        None => None,
    };
    if network.is_some() {
        settings = settings.redundancy(RedundancyStrategy::NetworkTopology {
            radius: 1,
            min_overlap: 0.8,
        });
    }

    let mut validation = Validation::new(&dag, &known, settings);
    if let Some(network) = &network {
        validation = validation.with_network(network);
    }
    let report = validation.run(predictions).unwrap();

    println!("{}", report.cell_table());
    println!("{}", report.summary_table());
    print!("{}", report.gene_table());
}
