//! CorePlugin wires the simulation clock and the shared simulation context.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

use crate::{dialogue::settings::DialogueSettings, npc::roster::ActorRoster};

use super::context::SimulationContext;

/// Longest delta a single tick may apply. Stalls (window drags, breakpoints)
/// would otherwise teleport actors and expire response timeouts at once.
const DEFAULT_MAX_TICK_DELTA: Duration = Duration::from_millis(250);

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Tracks simulation time derived from clamped frame deltas.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    max_delta: Duration,
    last_real_delta: Duration,
    last_delta: Duration,
    elapsed: Duration,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(max_delta: Duration) -> Self {
        Self {
            max_delta,
            last_real_delta: Duration::ZERO,
            last_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Last real (unclamped) delta reported by Bevy's Time resource.
    #[cfg_attr(not(feature = "core_debug"), allow(dead_code))]
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Delta applied by the latest tick.
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    /// Total simulated duration since start-up.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, real_delta: Duration) {
        self.last_real_delta = real_delta;
        self.last_delta = real_delta.min(self.max_delta);
        self.elapsed += self.last_delta;
        self.ticks = self.ticks.saturating_add(1);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TICK_DELTA)
    }
}

/// Registers the clock, loads configuration, and builds the simulation context.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let settings = DialogueSettings::load_or_default();
        let registry = ActorRoster::load_or_default().into_registry();
        info!(
            "CorePlugin initialised with {} NPCs (engagement radius {:.1}, tie-break {:?})",
            registry.npcs().len(),
            settings.proximity.engagement_radius,
            settings.proximity.tie_break
        );

        app.insert_resource(SimulationClock::default())
            .insert_resource(SimulationContext::new(registry, &settings))
            .add_systems(Update, update_simulation_clock);

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_simulation_ticks);
        }
    }
}

pub fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

#[cfg(feature = "core_debug")]
fn log_simulation_ticks(
    mut timer: ResMut<DebugTickTimer>,
    clock: Res<SimulationClock>,
    context: Res<SimulationContext>,
) {
    if timer.timer.tick(clock.last_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Sim elapsed: {:.2}s | ticks: {} | real dt: {:.4}s | dt: {:.4}s | mode: {} | pending: {:?}",
            clock.elapsed().as_secs_f32(),
            clock.ticks(),
            clock.last_real_delta().as_secs_f32(),
            clock.last_delta().as_secs_f32(),
            context.session().mode().label(),
            context.session().pending_token(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_deltas() {
        let mut clock = SimulationClock::default();
        clock.tick(Duration::from_millis(16));
        clock.tick(Duration::from_millis(20));

        assert_eq!(clock.ticks(), 2);
        assert_eq!(clock.last_delta(), Duration::from_millis(20));
        assert_eq!(clock.elapsed(), Duration::from_millis(36));
    }

    #[test]
    fn clock_clamps_long_stalls() {
        let mut clock = SimulationClock::new(Duration::from_millis(100));
        clock.tick(Duration::from_secs(3));

        assert_eq!(clock.last_real_delta(), Duration::from_secs(3));
        assert_eq!(clock.last_delta(), Duration::from_millis(100));
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
    }
}
