//! Simple herding simulation with a small population

use herding_abm::{HerdingModel, PopulationConfig, SeededSource};

fn main() -> Result<(), herding_abm::AbmError> {
    println!("=== Herding ABM Simulation ===\n");

    let config = PopulationConfig {
        n_fundamentalists: 50,
        n_chartists: 50,
        base_event_rate: 0.005,
        alpha: 2.0,
        initial_mood: 0.75,
        ..Default::default()
    };
    println!(
        "Population: {} fundamentalists, {} chartists (alpha = {})",
        config.n_fundamentalists, config.n_chartists, config.alpha
    );

    let mut model = HerdingModel::new(SeededSource::new(42), 1.0, 30000.0, 30000.0);
    model.reset_population(&config)?;

    println!("\nRunning simulation for 1000 ticks...\n");
    println!("{:>6} {:>12} {:>10} {:>6} {:>8}", "tick", "price", "chartists", "mood", "trades");

    let mut old_price = model.last_price();
    let mut max_abs_return: f64 = 0.0;
    for tick in 1..=1000 {
        model.step()?;
        let ret = (model.last_price() / old_price).ln();
        max_abs_return = max_abs_return.max(ret.abs());
        old_price = model.last_price();

        if tick % 100 == 0 {
            let snapshot = model.snapshot();
            println!(
                "{:>6} {:>12.2} {:>10} {:>6} {:>8}",
                tick, snapshot.price, snapshot.chartists, snapshot.mood, snapshot.trade_events
            );
        }
    }

    println!("\n=== Results ===");
    println!("Events processed: {}", model.events_processed());
    println!("Trade events:     {}", model.trade_events());
    println!("Max |return|:     {:.6}", max_abs_return);
    if let Some(spread) = model.book().spread() {
        println!("Final spread:     {:.2}", spread);
    }

    Ok(())
}
