use crate::convert::{
    derive_distance, derive_pace, derive_time, format_clock, format_pace, parse_clock,
    parse_float_prefix, parse_pace, try_parse_pace,
};
use crate::preset::Preset;
use clap::ValueEnum;

/// The three quantities of a running effort. Doubles as the calculate-mode
/// selector: exactly one field is the derived one at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Distance,
    Pace,
    Time,
}

/// How a field should be presented: the derived one, the one the user last
/// typed into, or a held constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Calculated,
    Edited,
    Constant,
}

pub const DISTANCE_ERROR: &str = "Must be positive";
pub const PACE_ERROR: &str = "MM:SS format";
pub const TIME_ERROR: &str = "HH:MM:SS format";

/// Per-field validation messages; `None` means the field is clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    distance: Option<&'static str>,
    pace: Option<&'static str>,
    time: Option<&'static str>,
}

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Distance => self.distance,
            Field::Pace => self.pace,
            Field::Time => self.time,
        }
    }

    fn set(&mut self, field: Field, message: &'static str) {
        *self.slot(field) = Some(message);
    }

    fn clear(&mut self, field: Field) {
        *self.slot(field) = None;
    }

    fn slot(&mut self, field: Field) -> &mut Option<&'static str> {
        match field {
            Field::Distance => &mut self.distance,
            Field::Pace => &mut self.pace,
            Field::Time => &mut self.time,
        }
    }
}

/// Stepper magnitudes for the increment/decrement actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizes {
    pub distance_km: f64,
    pub pace_seconds: i64,
    pub time_seconds: i64,
}

impl Default for StepSizes {
    fn default() -> Self {
        Self {
            distance_km: 0.5,
            pace_seconds: 10,
            time_seconds: 60,
        }
    }
}

/// Holds the three field texts and recomputes the derived one on every edit.
///
/// All mutation goes through `on_change` / `apply_preset` / the steppers /
/// `set_mode`; nothing else writes the fields, so a renderer can read the
/// state at any point between events.
#[derive(Debug, Clone)]
pub struct Calculator {
    distance: String,
    pace: String,
    time: String,
    mode: Field,
    errors: ValidationErrors,
    edited: Option<Field>,
    steps: StepSizes,
}

impl Calculator {
    pub fn new(mode: Field, steps: StepSizes) -> Self {
        Self::with_values("10.00", "05:30", "00:55:00", mode, steps)
    }

    /// Seed the session with explicit field texts. The texts are taken as-is;
    /// validation and recomputation only kick in on the first edit.
    pub fn with_values(
        distance: &str,
        pace: &str,
        time: &str,
        mode: Field,
        steps: StepSizes,
    ) -> Self {
        Self {
            distance: distance.to_string(),
            pace: pace.to_string(),
            time: time.to_string(),
            mode,
            errors: ValidationErrors::default(),
            edited: None,
            steps,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Distance => &self.distance,
            Field::Pace => &self.pace,
            Field::Time => &self.time,
        }
    }

    pub fn mode(&self) -> Field {
        self.mode
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(field)
    }

    /// Presentation state of a field. Before anything has been typed the
    /// non-derived fields all count as edited.
    pub fn field_state(&self, field: Field) -> FieldState {
        if field == self.mode {
            FieldState::Calculated
        } else {
            match self.edited {
                None => FieldState::Edited,
                Some(edited) if edited == field => FieldState::Edited,
                Some(_) => FieldState::Constant,
            }
        }
    }

    /// Single entry point for a field edit: echo the raw text, validate,
    /// and recompute the derived field when possible.
    pub fn on_change(&mut self, field: Field, value: &str) {
        *self.value_mut(field) = value.to_string();
        self.edited = Some(field);
        self.errors.clear(field);

        // the derived field is display-only; edits to it never feed back
        if field == self.mode {
            return;
        }

        if let Err(message) = validate(field, value) {
            self.errors.set(field, message);
            return;
        }

        self.recompute();
    }

    /// Switch which field is derived. No recompute happens until the next
    /// edit; the previously derived field simply becomes editable.
    pub fn set_mode(&mut self, mode: Field) {
        self.mode = mode;
    }

    /// Apply a race preset: distance takes the preset's literal text and,
    /// whenever pace resolves positive, time is recomputed. The calculate
    /// mode is left untouched.
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.distance = preset.distance.to_string();
        self.errors.clear(Field::Distance);

        let pace_seconds = parse_pace(&self.pace);
        if pace_seconds > 0 {
            let distance_km = parse_float_prefix(preset.distance).unwrap_or(0.0);
            self.time = derive_time(distance_km, pace_seconds);
        }
    }

    /// Step a field up by its configured increment, routed through
    /// `on_change` so validation and recompute are not duplicated.
    pub fn increment(&mut self, field: Field) {
        match field {
            Field::Distance => {
                if let Some(km) = parse_float_prefix(&self.distance) {
                    let text = format!("{:.2}", km + self.steps.distance_km);
                    self.on_change(Field::Distance, &text);
                }
            }
            Field::Pace => {
                if let Some(seconds) = try_parse_pace(&self.pace) {
                    let text = format_pace(seconds + self.steps.pace_seconds);
                    self.on_change(Field::Pace, &text);
                }
            }
            Field::Time => {
                let seconds = parse_clock(&self.time) + self.steps.time_seconds;
                self.on_change(Field::Time, &format_clock(seconds));
            }
        }
    }

    /// Step a field down, refusing to go to or below zero (distance) or to
    /// or below the step itself (pace, time).
    pub fn decrement(&mut self, field: Field) {
        match field {
            Field::Distance => {
                if let Some(km) = parse_float_prefix(&self.distance) {
                    if km > self.steps.distance_km {
                        let text = format!("{:.2}", km - self.steps.distance_km);
                        self.on_change(Field::Distance, &text);
                    }
                }
            }
            Field::Pace => {
                let seconds = parse_pace(&self.pace);
                if seconds > self.steps.pace_seconds {
                    self.on_change(Field::Pace, &format_pace(seconds - self.steps.pace_seconds));
                }
            }
            Field::Time => {
                let seconds = parse_clock(&self.time);
                if seconds > self.steps.time_seconds {
                    self.on_change(Field::Time, &format_clock(seconds - self.steps.time_seconds));
                }
            }
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Distance => &mut self.distance,
            Field::Pace => &mut self.pace,
            Field::Time => &mut self.time,
        }
    }

    /// Recompute the derived field from the two independent ones. A missing
    /// or non-positive companion skips the recompute silently; the field
    /// being edited was already validated and is not at fault.
    fn recompute(&mut self) {
        match self.mode {
            Field::Distance => {
                let time_seconds = parse_clock(&self.time);
                let pace_seconds = parse_pace(&self.pace);
                if time_seconds > 0 && pace_seconds > 0 {
                    self.distance = derive_distance(time_seconds, pace_seconds);
                }
            }
            Field::Pace => {
                let time_seconds = parse_clock(&self.time);
                let distance_km = parse_float_prefix(&self.distance).unwrap_or(0.0);
                if time_seconds > 0 && distance_km > 0.0 {
                    self.pace = derive_pace(time_seconds, distance_km);
                }
            }
            Field::Time => {
                let distance_km = parse_float_prefix(&self.distance).unwrap_or(0.0);
                let pace_seconds = parse_pace(&self.pace);
                if distance_km > 0.0 && pace_seconds > 0 {
                    self.time = derive_time(distance_km, pace_seconds);
                }
            }
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(Field::Time, StepSizes::default())
    }
}

fn validate(field: Field, value: &str) -> Result<(), &'static str> {
    match field {
        Field::Distance => match parse_float_prefix(value) {
            Some(km) if km.is_finite() && km > 0.0 => Ok(()),
            _ => Err(DISTANCE_ERROR),
        },
        Field::Pace => {
            let parts: Vec<&str> = value.split(':').collect();
            let [minutes, seconds] = parts[..] else {
                return Err(PACE_ERROR);
            };
            if !is_digits(minutes) || !is_two_digits(seconds) {
                return Err(PACE_ERROR);
            }
            let minutes: i64 = minutes.parse().map_err(|_| PACE_ERROR)?;
            let seconds: i64 = seconds.parse().map_err(|_| PACE_ERROR)?;
            if seconds < 60 && (minutes > 0 || seconds > 0) {
                Ok(())
            } else {
                Err(PACE_ERROR)
            }
        }
        Field::Time => {
            let parts: Vec<&str> = value.split(':').collect();
            let [hours, minutes, seconds] = parts[..] else {
                return Err(TIME_ERROR);
            };
            if !is_digits(hours) || !is_two_digits(minutes) || !is_two_digits(seconds) {
                return Err(TIME_ERROR);
            }
            let hours: i64 = hours.parse().map_err(|_| TIME_ERROR)?;
            let minutes: i64 = minutes.parse().map_err(|_| TIME_ERROR)?;
            let seconds: i64 = seconds.parse().map_err(|_| TIME_ERROR)?;
            if minutes < 60 && seconds < 60 && (hours > 0 || minutes > 0 || seconds > 0) {
                Ok(())
            } else {
                Err(TIME_ERROR)
            }
        }
    }
}

fn is_digits(component: &str) -> bool {
    !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit())
}

// MM and SS components are written zero-padded; "5:3" is a typo, "5:30" is not.
fn is_two_digits(component: &str) -> bool {
    component.len() == 2 && is_digits(component)
}
