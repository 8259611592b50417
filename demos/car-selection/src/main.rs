//! Car Selection Example
//!
//! Five cars are compared on price, power, fuel consumption and a comfort
//! rating, several of them known only approximately. The example ranks the
//! cars with SMAA-2 under uniform and ordinal weights, then sorts them into
//! "reject", "shortlist" and "buy" with deterministic and stochastic
//! ELECTRE TRI.
//!
//! Run settings come from `smaa.toml` (or the path given as the first
//! argument).

use std::collections::HashMap;
use std::env;

use smaa::prelude::*;
use smaa::{AlternativeId, CriterionId, Performance, Result};

struct Problem {
    matrix: ImpactMatrix,
    criteria: Vec<Criterion>,
}

/// Builds the impact matrix with outranking criteria so both methods can use it.
fn build_problem() -> Result<Problem> {
    let price = Criterion::outranking(
        "price (kEUR)",
        Direction::Descending,
        OutrankingThresholds::new(1.0, 4.0, 12.0)?,
    );
    let power = Criterion::outranking(
        "power (kW)",
        Direction::Ascending,
        OutrankingThresholds::new(5.0, 20.0, 60.0)?,
    );
    let fuel = Criterion::outranking(
        "fuel (l/100km)",
        Direction::Descending,
        OutrankingThresholds::new(0.3, 1.0, 3.0)?,
    );
    let comfort = Criterion::outranking(
        "comfort (1-10)",
        Direction::Ascending,
        OutrankingThresholds::new(0.5, 2.0, 5.0)?,
    );

    let rows: [(&str, [Measurement; 4]); 5] = [
        (
            "Civic",
            [
                Measurement::exact(27.0)?,
                Measurement::exact(95.0)?,
                Measurement::interval(5.8, 6.6)?,
                Measurement::gaussian(6.5, 0.8)?,
            ],
        ),
        (
            "Golf",
            [
                Measurement::exact(30.0)?,
                Measurement::exact(110.0)?,
                Measurement::interval(5.5, 6.3)?,
                Measurement::gaussian(7.2, 0.6)?,
            ],
        ),
        (
            "Model 3",
            [
                Measurement::interval(40.0, 46.0)?,
                Measurement::exact(208.0)?,
                Measurement::exact(0.0)?,
                Measurement::gaussian(7.8, 1.0)?,
            ],
        ),
        (
            "Octavia",
            [
                Measurement::exact(29.0)?,
                Measurement::exact(110.0)?,
                Measurement::interval(5.2, 6.0)?,
                Measurement::gaussian(7.0, 0.5)?,
            ],
        ),
        (
            "Panda",
            [
                Measurement::exact(15.0)?,
                Measurement::exact(51.0)?,
                Measurement::log_normal(1.6, 0.1)?,
                Measurement::gaussian(4.0, 1.0)?,
            ],
        ),
    ];

    let criteria = vec![price, power, fuel, comfort];
    let alternatives: Vec<Alternative> = rows.iter().map(|(name, _)| Alternative::new(*name)).collect();
    let mut matrix = ImpactMatrix::with_entities(alternatives.clone(), criteria.clone())?;
    for (alternative, (_, values)) in alternatives.iter().zip(rows) {
        for (criterion, value) in criteria.iter().zip(values) {
            matrix.set_measurement(criterion.id(), alternative.id(), value)?;
        }
    }

    Ok(Problem { matrix, criteria })
}

/// Category descriptors, worst first, with upper boundary profiles.
fn categories(criteria: &[Criterion]) -> (Vec<Alternative>, HashMap<AlternativeId, Performance>) {
    let reject = Alternative::new("reject");
    let shortlist = Alternative::new("shortlist");
    let buy = Alternative::new("buy");

    let profile = |values: [f64; 4]| -> HashMap<CriterionId, f64> {
        criteria.iter().map(Criterion::id).zip(values).collect()
    };
    let boundaries = HashMap::from([
        (reject.id(), profile([38.0, 70.0, 7.0, 5.5])),
        (shortlist.id(), profile([30.0, 100.0, 5.8, 7.0])),
    ]);

    (vec![reject, shortlist, buy], boundaries)
}

fn print_rank_table(title: &str, results: &SimulationResults) -> Result<()> {
    let n = results.alternatives().len();
    println!("\n{title}");
    print!("{:<10}", "");
    for rank in 1..=n {
        print!("{:>8}", format!("#{rank}"));
    }
    println!("{:>10}", "conf.");
    for alternative in results.alternatives() {
        print!("{:<10}", alternative.name());
        for acceptability in results.rank_acceptabilities(alternative.id())? {
            print!("{:>8.3}", acceptability);
        }
        match results.confidence_factor(alternative.id())? {
            Some(cf) => println!("{:>10.3}", cf),
            None => println!("{:>10}", "-"),
        }
    }
    Ok(())
}

fn print_central_weights(results: &SimulationResults) -> Result<()> {
    println!("\nCentral weights");
    for alternative in results.alternatives() {
        let Some(weights) = results.central_weights(alternative.id())? else {
            continue;
        };
        let formatted: Vec<String> = results
            .criteria()
            .iter()
            .zip(weights)
            .map(|(c, w)| format!("{} {:.2}", c.name(), w))
            .collect();
        println!("{:<10} {}", alternative.name(), formatted.join(", "));
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| smaa::CONFIG_FILE.to_string());
    let config = SimulationConfig::load(&path).unwrap_or_default();

    let problem = build_problem()?;
    let matrix = &problem.matrix;

    // SMAA-2 without preference information
    let uniform = analyze_with_config(matrix, WeightPolicy::Uniform, &config)?;
    print_rank_table("Rank acceptability, no weight information", &uniform)?;
    print_central_weights(&uniform)?;

    // price matters most, then fuel, comfort and power
    let order = [0, 2, 3, 1].map(|i| problem.criteria[i].id()).to_vec();
    let ordinal = analyze_with_config(matrix, WeightPolicy::Ordinal(order), &config)?;
    print_rank_table("Rank acceptability, price > fuel > comfort > power", &ordinal)?;

    // Deterministic ELECTRE TRI on expected values
    let (categories, boundaries) = categories(&problem.criteria);
    let electre = config.electre.clone().unwrap_or_default();
    let sorter = ElectreTri::new(
        &problem.criteria,
        &categories,
        &boundaries,
        &[0.35, 0.15, 0.3, 0.2],
        electre.lambda,
    )?
    .with_rule(electre.rule.into())
    .with_veto(electre.veto);
    let assignments = sorter.classify_matrix(matrix)?;

    println!("\nELECTRE TRI, lambda {:.2}", electre.lambda);
    for alternative in matrix.alternatives() {
        let category = assignments[&alternative.id()];
        let name = categories
            .iter()
            .find(|c| c.id() == category)
            .map(Alternative::name)
            .unwrap_or("?");
        println!("{:<10} {}", alternative.name(), name);
    }

    // Stochastic ELECTRE TRI over measurements, weights and lambda
    let tri = SmaaTriSimulation::from_config(
        matrix,
        &categories,
        &boundaries,
        WeightPolicy::Uniform,
        &config,
    )?
    .run();

    println!("\nCategory acceptability");
    print!("{:<10}", "");
    for category in &categories {
        print!("{:>11}", category.name());
    }
    println!();
    for alternative in matrix.alternatives() {
        print!("{:<10}", alternative.name());
        for acceptability in tri.category_acceptabilities(alternative.id())? {
            print!("{:>11.3}", acceptability);
        }
        println!();
    }

    Ok(())
}
