use chrono::FixedOffset;

use crate::assets::bitmap::Bitmap;
use crate::assets::transform::desaturate;
use crate::engine::timer::TimerToken;
use crate::foundation::core::DisplayShape;
use crate::sync::message::WeatherSnapshot;

/// Device capability flags delivered by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceProperties {
    /// The display uses fewer bits per color in ambient mode; anti-aliasing is disabled there.
    pub low_bit_ambient: bool,
    /// The display needs burn-in protection in ambient mode.
    pub burn_in_protection: bool,
}

/// Per-display engine state, created on activation and dropped on deactivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineState {
    pub visible: bool,
    pub ambient: bool,
    pub low_bit_ambient: bool,
    pub burn_in_protection: bool,
    pub time_zone_receiver_registered: bool,
    pub pending_timer: Option<TimerToken>,
    /// Completed taps; drives presentation toggles only.
    pub tap_count: u32,
    pub shape: DisplayShape,
    pub time_zone: FixedOffset,
}

impl EngineState {
    pub(crate) fn new(shape: DisplayShape, time_zone: FixedOffset) -> Self {
        Self {
            visible: false,
            ambient: false,
            low_bit_ambient: false,
            burn_in_protection: false,
            time_zone_receiver_registered: false,
            pending_timer: None,
            tap_count: 0,
            shape,
            time_zone,
        }
    }

    /// The interactive timer runs only while visible and not ambient.
    pub fn should_timer_run(&self) -> bool {
        self.visible && !self.ambient
    }

    pub fn anti_alias(&self) -> bool {
        !(self.ambient && self.low_bit_ambient)
    }
}

/// Which icon a render pass used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconChoice {
    /// No weather has been applied yet.
    None,
    Interactive,
    Ambient,
    /// Ambient mode, but the desaturated icon was not computed yet.
    InteractiveFallback,
}

/// Icon bitmaps for the current snapshot.
///
/// `ambient` is always derived from `interactive`; replacing `interactive` means building a new
/// `DecodedIcon`, which drops the old ambient variant with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedIcon {
    interactive: Bitmap,
    ambient: Option<Bitmap>,
}

impl DecodedIcon {
    pub(crate) fn new(interactive: Bitmap) -> Self {
        Self {
            interactive,
            ambient: None,
        }
    }

    pub fn interactive(&self) -> &Bitmap {
        &self.interactive
    }

    pub fn ambient(&self) -> Option<&Bitmap> {
        self.ambient.as_ref()
    }

    /// Compute the ambient variant if it is missing. Returns `true` when it was computed now.
    pub(crate) fn ensure_ambient(&mut self) -> bool {
        if self.ambient.is_some() {
            return false;
        }
        self.ambient = Some(desaturate(&self.interactive));
        true
    }

    /// Pick the bitmap for a render pass, falling back to the interactive one when the ambient
    /// variant is not ready.
    pub fn for_mode(&self, ambient: bool) -> (&Bitmap, IconChoice) {
        if !ambient {
            return (&self.interactive, IconChoice::Interactive);
        }
        match &self.ambient {
            Some(bmp) => (bmp, IconChoice::Ambient),
            None => (&self.interactive, IconChoice::InteractiveFallback),
        }
    }
}

/// The applied snapshot together with its icon. Replaced as a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentWeather {
    pub snapshot: WeatherSnapshot,
    pub icon: DecodedIcon,
}
