//! Basic example of using the Switches engine

use switches_core::{
    parse_command, PuzzleConfig, PuzzleSeeds, RuleSet, SwitchModule, ToggleOutcome,
};

fn main() -> switches_core::Result<()> {
    // Rules of the published manual
    let config = PuzzleConfig::classic();
    let rules = RuleSet::from_seed(1, &config)?;
    println!("Forbidden configurations for rule seed 1:");
    for config in rules.forbidden().iter() {
        println!("  {}", config);
    }

    // A different rule seed gives a different manual
    let other = RuleSet::from_seed(42, &config)?;
    println!("\nRule seed 42 forbids {:?}\n", other.forbidden().values());

    // Set up one module
    let seeds = PuzzleSeeds {
        rule_seed: 1,
        instance_seed: 2024,
    };
    let mut module = SwitchModule::from_seeds(seeds, &config, 1)?;
    println!("Switches start at: {}", module.current_configuration());
    println!("Goal:              {}", module.goal_configuration());

    // Solve it
    let flips = module.solve()?;
    let numbers: Vec<String> = flips.iter().map(|i| (i + 1).to_string()).collect();
    println!("\nSolution: flip {}\n", numbers.join(" "));

    for index in flips {
        match module.toggle(index)? {
            ToggleOutcome::Moved(config) => println!("Flipped {} -> {}", index + 1, config),
            ToggleOutcome::Solved => println!("Flipped {} -> solved!", index + 1),
            ToggleOutcome::Strike { attempted } => println!("Strike at {}", attempted),
            ToggleOutcome::Inert => {}
        }
    }

    // Parse a chat command
    println!("\n--- Parsing a command ---\n");
    match parse_command("flip 1 5 3 2", module.switch_count()) {
        Ok(flips) => println!("Parsed indices: {:?}", flips),
        Err(err) => println!("{}", err),
    }
    if let Err(err) = parse_command("flip 7", module.switch_count()) {
        println!("Rejected: {}", err);
    }

    Ok(())
}
