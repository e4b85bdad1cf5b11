/// A named race distance, fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub label: &'static str,
    pub distance: &'static str,
}

/// The classic road-race distances, bound to F1..F4 in the UI.
pub const DEFAULT_PRESETS: [Preset; 4] = [
    Preset {
        label: "5K",
        distance: "5.00",
    },
    Preset {
        label: "10K",
        distance: "10.00",
    },
    Preset {
        label: "Half Marathon",
        distance: "21.10",
    },
    Preset {
        label: "Marathon",
        distance: "42.20",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::parse_float_prefix;

    #[test]
    fn test_preset_distances_parse_positive() {
        for preset in DEFAULT_PRESETS {
            let km = parse_float_prefix(preset.distance).unwrap();
            assert!(km > 0.0, "{} should be positive", preset.label);
        }
    }

    #[test]
    fn test_preset_labels_unique() {
        for (i, a) in DEFAULT_PRESETS.iter().enumerate() {
            for b in &DEFAULT_PRESETS[i + 1..] {
                assert_ne!(a.label, b.label);
            }
        }
    }
}
