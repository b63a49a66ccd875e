use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color mapping: location label → Color32
// ---------------------------------------------------------------------------

/// Assigns each selected location a stable colour, shared by the chart,
/// the selection list and the snapshot table.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given labels, in selection order.  Hues
    /// are spread evenly around the wheel so each line stays distinct.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let step = 360.0 / labels.len().max(1) as f32;
        let mapping = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let rgb: Srgb = Hsl::new(i as f32 * step, 0.75, 0.55).into_color();
                let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c * 255.0) as u8);
                (label.to_string(), Color32::from_rgb(r, g, b))
            })
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label; grey for unknown labels.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_gets_its_own_colour() {
        let labels = ["Knox, Ohio", "Lake, Ohio", "Teton, Wyoming", "Albany, Wyoming"];
        let cm = ColorMap::new(labels);
        let mut colours: Vec<Color32> = labels.iter().map(|l| cm.color_for(l)).collect();
        colours.dedup();
        assert_eq!(colours.len(), 4);
        assert!(!colours.contains(&Color32::GRAY));
        assert_eq!(ColorMap::new(Vec::<&str>::new()).color_for("Knox, Ohio"), Color32::GRAY);
    }

    #[test]
    fn unknown_label_is_grey() {
        let cm = ColorMap::new(["Knox, Ohio", "Lake, Ohio"]);
        assert_ne!(cm.color_for("Knox, Ohio"), cm.color_for("Lake, Ohio"));
        assert_eq!(cm.color_for("Teton, Wyoming"), Color32::GRAY);
    }
}
