//! Habitat runtime binary for Chroma Companions.
//!
//! This is the main entry point that wires together the day clock, the
//! habitat tick cycle, and a demo keeper routine. It loads
//! configuration, adopts a companion, and runs the habitat loop for a
//! bounded number of ticks, caring for the companion and exercising its
//! abilities as they unlock.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `chroma-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the day clock and habitat
//! 4. Adopt the demo companion
//! 5. Run the habitat loop
//! 6. Log the result

mod error;
mod sink;

use std::path::Path;
use std::sync::Arc;

use chroma_companion::abilities::Activation;
use chroma_companion::{CompanionKeeper, SpeciesProfile};
use chroma_core::clock::DayClock;
use chroma_core::config::RuntimeConfig;
use chroma_core::tick::Habitat;
use chroma_types::{AbilityId, ItemCategory, PetId};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::sink::TracingSink;

/// Application entry point for the habitat runtime.
///
/// # Errors
///
/// Returns an error if configuration loading, clock construction, or
/// the habitat loop fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("chroma-engine starting");
    info!(
        ticks_per_day = config.habitat.ticks_per_day,
        night_fraction_pct = config.habitat.night_fraction_pct,
        max_ticks = config.run.max_ticks,
        seed = config.run.seed,
        "Configuration loaded"
    );

    // 3. Create the day clock and habitat.
    let clock = DayClock::new(config.habitat.ticks_per_day, config.habitat.night_fraction_pct)
        .map_err(EngineError::from)?;
    let mut habitat = Habitat::new(clock);
    info!("Habitat initialized");

    // 4. Adopt the demo companion.
    let profile = Arc::new(SpeciesProfile::owl());
    let mut keeper = CompanionKeeper::new();
    let (pet, state) = keeper
        .adopt(String::from("Hoot"), &profile)
        .map_err(EngineError::from)?;
    let pet_id = pet.id;
    info!(pet_id = %pet_id, name = pet.name, species = profile.species, "Companion adopted");
    habitat
        .add_resident(pet, state, Arc::clone(&profile))
        .map_err(EngineError::from)?;

    // 5. Run the habitat loop.
    let mut sink = TracingSink::new();
    let mut rng = SmallRng::seed_from_u64(config.run.seed);
    run_habitat(
        &mut habitat,
        pet_id,
        config.run.max_ticks,
        &mut sink,
        &mut rng,
    )?;

    // 6. Log the result.
    if let Some(resident) = habitat.resident(pet_id) {
        info!(
            pet_id = %pet_id,
            day = habitat.clock().day(),
            level = resident.state.level,
            health = resident.state.health,
            energy = resident.state.energy,
            happiness = resident.state.happiness,
            unlocked = resident.state.unlocked.len(),
            coins_total = sink.coins_total(),
            "chroma-engine shutdown complete"
        );
    }

    Ok(())
}

/// Drive the habitat for `max_ticks` ticks, interleaving a scripted
/// keeper routine: regular meals and play to keep the companion fed and
/// happy, and ability activations as their tags unlock.
fn run_habitat(
    habitat: &mut Habitat,
    pet: PetId,
    max_ticks: u64,
    sink: &mut TracingSink,
    rng: &mut SmallRng,
) -> Result<(), EngineError> {
    for step in 0..max_ticks {
        if step.checked_rem(40) == Some(0) {
            let outcome = habitat.give_item(pet, ItemCategory::Meal, sink)?;
            debug!(pet_id = %pet, level = outcome.new_level, "meal served");
        }
        if step.checked_rem(25) == Some(0) {
            let outcome = habitat.play(pet, sink)?;
            debug!(pet_id = %pet, level = outcome.new_level, "play session");
        }
        if step.checked_rem(15) == Some(0) {
            habitat.give_item(pet, ItemCategory::Puzzle, sink)?;
        }

        exercise_abilities(habitat, pet, step, sink, rng)?;

        let summary = habitat.run_tick(sink, rng)?;
        if summary.day_rolled {
            info!(
                tick = summary.tick,
                day = habitat.clock().day(),
                rollovers = summary.rollovers,
                "day rolled over"
            );
        }
    }
    Ok(())
}

/// Try each unlocked ability on its own cadence. Refusals are expected
/// (window still open, daily cap reached) and logged at debug.
fn exercise_abilities(
    habitat: &mut Habitat,
    pet: PetId,
    step: u64,
    sink: &mut TracingSink,
    rng: &mut SmallRng,
) -> Result<(), EngineError> {
    let unlocked: Vec<AbilityId> = habitat
        .resident(pet)
        .map(|r| r.state.unlocked.iter().copied().collect())
        .unwrap_or_default();

    for ability in unlocked {
        let cadence = match ability {
            AbilityId::WisdomAura => continue, // passive, runs on its own
            AbilityId::NightVision => 50,
            AbilityId::Prophecy => 80,
            AbilityId::SilentHunt => 200,
        };
        if step.checked_rem(cadence) != Some(0) {
            continue;
        }
        match habitat.activate(pet, ability, sink, rng)? {
            Activation::Performed { .. } => {
                info!(pet_id = %pet, ?ability, step, "ability activated");
            }
            Activation::Refused { reason } => {
                debug!(pet_id = %pet, ?ability, ?reason, "activation refused");
            }
        }
    }
    Ok(())
}

/// Load the runtime configuration from `chroma-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// falls back to defaults when the file is absent.
fn load_config() -> Result<RuntimeConfig, EngineError> {
    let config_path = Path::new("chroma-config.yaml");
    if config_path.exists() {
        let config = RuntimeConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(RuntimeConfig::default())
    }
}
