//! The three picker widgets and the observer traits that chain them
//!
//! Notifications flow one way: hue wheel -> saturation/value panel -> alpha
//! bar. Each widget owns exactly one part of the color.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::hsv::{self, hsv_to_rgb};

pub trait HueListener {
    fn on_hue_changed(&mut self, hue: f32);
}

pub trait ColorListener {
    /// `rgb` is opaque `0xFFRRGGBB`
    fn on_color_changed(&mut self, rgb: u32);
}

pub trait AlphaListener {
    fn on_alpha_changed(&mut self, alpha: f32);
}

/// Owns the hue, in degrees `[0, 360)`
#[derive(Default)]
pub struct HueWheel {
    hue: f32,
    listener: Option<Rc<RefCell<dyn HueListener>>>,
}

impl HueWheel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn set_on_hue_change(&mut self, listener: Rc<RefCell<dyn HueListener>>) {
        self.listener = Some(listener);
    }

    pub fn set_hue(&mut self, hue: f32) {
        if !hue.is_finite() {
            return;
        }
        self.hue = match hue.rem_euclid(360.0) {
            h if h >= 360.0 => 0.0,
            h => h,
        };
        trace!("hue = {}", self.hue);
        if let Some(listener) = &self.listener {
            listener.borrow_mut().on_hue_changed(self.hue);
        }
    }

    /// Touch on the wheel at `(x, y)` relative to its center, y pointing
    /// down. Red sits at 3 o'clock and hue grows counter-clockwise.
    pub fn set_hue_from_angle(&mut self, x: f32, y: f32) {
        if x == 0.0 && y == 0.0 {
            return;
        }
        self.set_hue((-y).atan2(x).to_degrees());
    }
}

/// Owns saturation and value, and follows the hue wheel
pub struct SaturationValuePanel {
    hue: f32,
    saturation: f32,
    value: f32,
    listener: Option<Rc<RefCell<dyn ColorListener>>>,
}

impl Default for SaturationValuePanel {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 1.0,
            value: 1.0,
            listener: None,
        }
    }
}

impl SaturationValuePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_color_change(&mut self, listener: Rc<RefCell<dyn ColorListener>>) {
        self.listener = Some(listener);
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Opaque RGB for the current hue, saturation and value
    pub fn color(&self) -> u32 {
        hsv_to_rgb(self.hue, self.saturation, self.value)
    }

    /// Take saturation and value from `argb`. Hue stays with the wheel.
    pub fn set_color(&mut self, argb: u32) {
        let [_, saturation, value] = hsv::argb_to_hsv(argb);
        self.set_saturation_value(saturation, value);
    }

    pub fn set_saturation_value(&mut self, saturation: f32, value: f32) {
        if !(saturation.is_finite() && value.is_finite()) {
            return;
        }
        self.saturation = saturation.clamp(0.0, 1.0);
        self.value = value.clamp(0.0, 1.0);
        self.publish();
    }

    /// Touch at `(x, y)` on a `width` x `height` panel: saturation grows to
    /// the right, value grows upwards.
    pub fn touch_at(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.set_saturation_value(x / width, 1.0 - y / height);
    }

    fn publish(&self) {
        let rgb = self.color();
        trace!("sv color = {:#010x}", rgb);
        if let Some(listener) = &self.listener {
            listener.borrow_mut().on_color_changed(rgb);
        }
    }
}

impl HueListener for SaturationValuePanel {
    fn on_hue_changed(&mut self, hue: f32) {
        self.hue = hue;
        self.publish();
    }
}

/// Owns the alpha, and follows the panel color to tint its track
pub struct AlphaBar {
    alpha: f32,
    color: u32,
    listener: Option<Rc<RefCell<dyn AlphaListener>>>,
}

impl Default for AlphaBar {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            color: 0xFFFF_0000,
            listener: None,
        }
    }
}

impl AlphaBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_alpha_change(&mut self, listener: Rc<RefCell<dyn AlphaListener>>) {
        self.listener = Some(listener);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Opaque color the track fades out
    pub fn track_color(&self) -> u32 {
        self.color
    }

    /// Track color at `position` along the bar, 0 transparent to 1 opaque
    pub fn track_color_at(&self, position: f32) -> u32 {
        let a = (position.clamp(0.0, 1.0) * 255.0).round() as u8;
        hsv::with_alpha(self.color, a)
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        if !alpha.is_finite() {
            return;
        }
        self.alpha = alpha.clamp(0.0, 1.0);
        if let Some(listener) = &self.listener {
            listener.borrow_mut().on_alpha_changed(self.alpha);
        }
    }

    /// Touch at `x` on a bar `width` long
    pub fn touch_at(&mut self, x: f32, width: f32) {
        if width <= 0.0 {
            return;
        }
        self.set_alpha(x / width);
    }
}

impl ColorListener for AlphaBar {
    fn on_color_changed(&mut self, rgb: u32) {
        self.color = rgb;
    }
}
