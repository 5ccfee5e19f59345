//! Simulation clock: speed control and accumulated simulated time
//!
//! The effective speed multiplier is the product of two inputs supplied by
//! the UI collaborator:
//! - a discrete slider index mapped through a fixed multiplier table,
//! - a base rate derived from the view zoom factor (closer zoom runs
//!   simulated time slower so nearby motion stays legible)

/// Discrete speed multipliers addressed by slider index. The slider runs
/// -13..=13 and is offset by +13 into this table; index 13 is 1x.
pub const SPEED_MULTIPLIERS: [f64; 27] = [
    0.0, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.5, 2.0, 2.5, 3.0,
    4.0, 5.0, 6.0, 8.0, 10.0, 15.0, 20.0, 25.0, 30.0,
];

/// Smallest and largest accepted slider values
pub const SLIDER_MIN: i32 = -13;
pub const SLIDER_MAX: i32 = 13;

#[derive(Debug, Clone)]
pub struct SimulationClock {
    slider_index: i32, // discrete speed selection, SLIDER_MIN..=SLIDER_MAX
    zoom_factor: f64, // current view zoom, > 0
    elapsed: f64, // accumulated simulated seconds
}

impl SimulationClock {
    pub fn new(slider_index: i32, zoom_factor: f64) -> Self {
        let mut clock = Self {
            slider_index: 0,
            zoom_factor: 1.0,
            elapsed: 0.0,
        };
        clock.set_slider_index(slider_index);
        clock.set_zoom_factor(zoom_factor);
        clock
    }

    /// Select a speed multiplier. Out-of-range values are clamped.
    pub fn set_slider_index(&mut self, index: i32) {
        self.slider_index = index.clamp(SLIDER_MIN, SLIDER_MAX);
    }

    pub fn slider_index(&self) -> i32 {
        self.slider_index
    }

    /// Update the view zoom the base rate derives from
    pub fn set_zoom_factor(&mut self, zoom: f64) {
        self.zoom_factor = zoom;
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// Multiplier selected by the current slider position
    pub fn multiplier(&self) -> f64 {
        SPEED_MULTIPLIERS[(self.slider_index + 13) as usize]
    }

    /// Zoom-dependent base rate: inverse relation to the zoom factor, so
    /// a closer view slows simulated time
    pub fn base_rate(&self) -> f64 {
        1.0 / self.zoom_factor.sqrt() / 10.0
    }

    /// Effective speed multiplier applied to every timestep this frame
    pub fn simulation_speed(&self) -> f64 {
        self.base_rate() * self.multiplier()
    }

    /// Record `dt_sim` simulated seconds as elapsed
    pub fn advance(&mut self, dt_sim: f64) {
        self.elapsed += dt_sim;
    }

    /// Total simulated seconds since the clock started
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0, 1.0)
    }
}
