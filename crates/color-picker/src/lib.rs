//! HSV color picker
//!
//! [`ColorPicker`] composes a hue wheel, a saturation/value panel and an
//! alpha bar into a single ARGB color. The widgets are wired one way, hue
//! into the panel and panel color into the alpha bar, and the composite
//! reads the final color back from the panel and the bar.

pub mod hsv;
mod widgets;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use widgets::{
    AlphaBar, AlphaListener, ColorListener, HueListener, HueWheel, SaturationValuePanel,
};

/// The picker's color split by owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorState {
    /// Degrees, `[0, 360)`
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
    pub alpha: f32,
}

pub struct ColorPicker {
    hue_wheel: HueWheel,
    panel: Rc<RefCell<SaturationValuePanel>>,
    alpha_bar: Rc<RefCell<AlphaBar>>,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker {
    pub fn new() -> Self {
        let alpha_bar = Rc::new(RefCell::new(AlphaBar::new()));
        let panel = Rc::new(RefCell::new(SaturationValuePanel::new()));
        panel.borrow_mut().set_on_color_change(alpha_bar.clone());

        let mut hue_wheel = HueWheel::new();
        hue_wheel.set_on_hue_change(panel.clone());

        Self {
            hue_wheel,
            panel,
            alpha_bar,
        }
    }

    /// Push each part of `argb` to the widget that owns it
    pub fn set_color(&mut self, argb: u32) {
        let [hue, _, _] = hsv::argb_to_hsv(argb);
        self.hue_wheel.set_hue(hue);
        self.panel.borrow_mut().set_color(argb);
        self.alpha_bar
            .borrow_mut()
            .set_alpha(hsv::alpha(argb) as f32 / 255.0);
        debug!("Color picker set to {:#010x}", argb);
    }

    /// Panel RGB with the alpha bar's alpha
    pub fn color(&self) -> u32 {
        let rgb = self.panel.borrow().color();
        let a = (self.alpha_bar.borrow().alpha() * 255.0).round() as u8;
        hsv::with_alpha(rgb, a)
    }

    pub fn state(&self) -> ColorState {
        let panel = self.panel.borrow();
        ColorState {
            hue: self.hue_wheel.hue(),
            saturation: panel.saturation(),
            value: panel.value(),
            alpha: self.alpha_bar.borrow().alpha(),
        }
    }

    /// Host hook for alpha changes; hue and RGB stay internal to the chain
    pub fn set_on_alpha_change(&mut self, listener: Rc<RefCell<dyn AlphaListener>>) {
        self.alpha_bar.borrow_mut().set_on_alpha_change(listener);
    }

    // Touch routing, coordinates local to each widget

    pub fn touch_hue_wheel(&mut self, x: f32, y: f32) {
        self.hue_wheel.set_hue_from_angle(x, y);
    }

    pub fn touch_panel(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.panel.borrow_mut().touch_at(x, y, width, height);
    }

    pub fn touch_alpha_bar(&mut self, x: f32, width: f32) {
        self.alpha_bar.borrow_mut().touch_at(x, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut picker = ColorPicker::new();
        for argb in [0xFFFF_0000, 0x0000_0000, 0x8080_8080, 0xC012_3456, 0x01FE_DCBA] {
            picker.set_color(argb);
            assert_eq!(picker.color(), argb, "{argb:#010x}");
        }
    }

    #[test]
    fn test_state_split() {
        let mut picker = ColorPicker::new();
        picker.set_color(0x8000_FF00);
        let state = picker.state();
        assert_eq!(state.hue, 120.0);
        assert_eq!(state.saturation, 1.0);
        assert_eq!(state.value, 1.0);
        assert!((state.alpha - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_touch_updates_color() {
        let mut picker = ColorPicker::new();
        picker.set_color(0xFFFF_0000);

        // Straight up on the wheel is hue 90
        picker.touch_hue_wheel(0.0, -40.0);
        assert_eq!(picker.color(), 0xFF80_FF00);

        picker.touch_alpha_bar(0.0, 100.0);
        assert_eq!(picker.color(), 0x0080_FF00);

        picker.touch_panel(0.0, 0.0, 100.0, 100.0);
        assert_eq!(picker.color(), 0x00FF_FFFF);
    }

    #[test]
    fn test_alpha_listener() {
        struct Last(f32);
        impl AlphaListener for Last {
            fn on_alpha_changed(&mut self, alpha: f32) {
                self.0 = alpha;
            }
        }

        let last = Rc::new(RefCell::new(Last(-1.0)));
        let mut picker = ColorPicker::new();
        picker.set_on_alpha_change(last.clone());
        picker.touch_alpha_bar(30.0, 120.0);
        assert_eq!(last.borrow().0, 0.25);
    }

    #[test]
    fn test_state_serializes() {
        let mut picker = ColorPicker::new();
        picker.set_color(0xFF00_00FF);
        let json = serde_json::to_string(&picker.state()).unwrap();
        let back: ColorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, picker.state());
    }
}
