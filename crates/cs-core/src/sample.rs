//! Timestamped signal samples.

use std::collections::BTreeMap;

/// One timestep of simulated output: a timestamp plus named scalar signals.
///
/// Signal names are namespaced, e.g. `"NMC811.voltage_v"` or
/// `"drive.speed_kph"`. The map is ordered so two runs over the same inputs
/// produce identical samples.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSample {
    pub timestamp: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub signals: BTreeMap<String, f64>,
}

impl SignalSample {
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            signals: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.signals.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.signals.get(name).copied()
    }

    pub fn signal_names(&self) -> impl Iterator<Item = &str> {
        self.signals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut sample = SignalSample::new(1.5);
        sample.insert("drive.speed_kph", 50.0);
        sample.insert("cell.soc", 0.9);

        assert_eq!(sample.get("drive.speed_kph"), Some(50.0));
        assert_eq!(sample.get("missing"), None);
        assert_eq!(sample.len(), 2);
        let names: Vec<&str> = sample.signal_names().collect();
        assert_eq!(names, vec!["cell.soc", "drive.speed_kph"]);
    }
}
